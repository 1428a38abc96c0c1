//! # pgo-msgs
//!
//! Wire messages exchanged between the `pgo` client and the API server.
//!
//! ## Shape of an exchange
//!
//! Every request embeds an [`Addressing`] block: the namespace to operate
//! in, the client version tag, and one of three addressing modes (explicit
//! names, a label selector, or "all").
//!
//! Every response is a [`ResponseEnvelope`]: an application [`Status`]
//! sub-object plus operation-specific payload fields at the top level.
//!
//! ```json
//! {
//!   "Status": { "Code": "ok", "Msg": "" },
//!   "Results": ["cluster hippo deleted"]
//! }
//! ```
//!
//! The application status is a second layer on top of HTTP: a response that
//! arrived with HTTP 200 can still carry `"Code": "error"` when the server
//! rejected the operation for business reasons. The payload is only
//! meaningful when the code is `ok`.

mod addressing;
mod de;
mod error;
mod status;

pub mod access;
pub mod backup;
pub mod cluster;
pub mod namespace;
pub mod pgadmin;
pub mod pgbouncer;
pub mod policy;
pub mod schedule;
pub mod system;
pub mod user;

pub use addressing::{Addressing, AddressingMode, ClusterSelection};
pub use error::{AddressingError, ApplicationError};
pub use status::{MessagesResult, ResponseEnvelope, Status, StatusCode};

/// Version tag sent with every request so the server can reject
/// incompatible clients.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");
