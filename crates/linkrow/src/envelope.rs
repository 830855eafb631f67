use crate::Error;

use serde::{Deserialize, Serialize};

/// The `{code, msg, data}` body returned to callers. `code` 0 is success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    pub code: i32,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub const OK: i32 = 0;

    pub fn ok() -> Envelope<T> {
        Envelope {
            code: Self::OK,
            msg: "ok".to_string(),
            data: None,
        }
    }

    pub fn ok_with(data: T) -> Envelope<T> {
        Envelope {
            data: Some(data),
            ..Envelope::ok()
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> Envelope<T> {
        Envelope {
            code,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Self::OK
    }
}

impl<T> From<&Error> for Envelope<T> {
    fn from(err: &Error) -> Envelope<T> {
        let code = if err.is_invalid_parameter() || err.is_parse() {
            400
        } else if err.is_record_not_found() {
            404
        } else {
            500
        };

        Envelope::error(code, err.to_string())
    }
}

impl<T> From<Error> for Envelope<T> {
    fn from(err: Error) -> Envelope<T> {
        Envelope::from(&err)
    }
}
