//! Application status and the response envelope.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Outcome code embedded in every response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    #[default]
    #[serde(alias = "Ok", alias = "OK")]
    Ok,
    #[serde(alias = "Error", alias = "ERROR")]
    Error,
}

/// Application-level status: the server's verdict on the operation itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "Code", alias = "code")]
    pub code: StatusCode,

    #[serde(rename = "Msg", alias = "msg", alias = "message", default)]
    pub msg: String,
}

impl Status {
    /// An `ok` status with no message.
    pub fn ok() -> Self {
        Self::default()
    }

    /// An `error` status carrying a message.
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            code: StatusCode::Error,
            msg: msg.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

/// Decoded response body: application status plus payload fields.
///
/// The payload is flattened, so a `T` with a `Results` field decodes from
/// `{"Status": {...}, "Results": [...]}`. Most server responses embed the
/// status instead, putting `Code` and `Msg` at the top level next to the
/// payload; both shapes decode to the same envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope<T> {
    #[serde(rename = "Status")]
    pub status: Status,

    #[serde(flatten)]
    pub payload: T,
}

/// Wire form accepting either status placement.
#[derive(Deserialize)]
struct WireEnvelope<T> {
    #[serde(rename = "Status", alias = "status", default)]
    status: Option<Status>,

    #[serde(rename = "Code", alias = "code", default)]
    code: Option<StatusCode>,

    #[serde(rename = "Msg", alias = "msg", default)]
    msg: Option<String>,

    #[serde(flatten)]
    payload: T,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ResponseEnvelope<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = WireEnvelope::<T>::deserialize(deserializer)?;
        let status = match (wire.status, wire.code) {
            (Some(status), _) => status,
            (None, Some(code)) => Status {
                code,
                msg: wire.msg.unwrap_or_default(),
            },
            (None, None) => return Err(de::Error::missing_field("Status")),
        };
        Ok(Self {
            status,
            payload: wire.payload,
        })
    }
}

impl<T> ResponseEnvelope<T> {
    /// Wrap a payload with an `ok` status.
    pub fn ok(payload: T) -> Self {
        Self {
            status: Status::ok(),
            payload,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Borrow the payload if the server accepted the operation.
    pub fn payload(&self) -> Result<&T, ApplicationError> {
        match self.status.code {
            StatusCode::Ok => Ok(&self.payload),
            StatusCode::Error => Err(ApplicationError::new(self.status.msg.clone())),
        }
    }

    /// Consume the envelope, yielding the payload or the server's rejection.
    pub fn into_result(self) -> Result<T, ApplicationError> {
        match self.status.code {
            StatusCode::Ok => Ok(self.payload),
            StatusCode::Error => Err(ApplicationError::new(self.status.msg)),
        }
    }
}

/// Payload of operations that answer with a list of human-readable lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesResult {
    #[serde(rename = "Results", alias = "results", default, deserialize_with = "crate::de::nullable")]
    pub results: Vec<String>,
}
