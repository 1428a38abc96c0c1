//! Typed API server operations.
//!
//! Each function is one [`Call`] through [`Session::execute`]. Results come
//! back as envelopes; callers check the application status with
//! [`ResponseEnvelope::into_result`] before using the payload.

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

use pgo_msgs::ResponseEnvelope;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CallError;
use crate::executor::Call;
use crate::session::Session;

/// Outcome of one API operation.
pub type ApiResult<T> = Result<ResponseEnvelope<T>, CallError>;

/// JSON-body write or query.
async fn post<B, R>(session: &Session, path: &str, body: &B) -> ApiResult<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    send(session, Call::post(path), body).await
}

/// `call` with `body` as its JSON payload, whatever the verb.
async fn send<B, R>(session: &Session, call: Call, body: &B) -> ApiResult<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    session.execute(call.json(body)?).await
}
