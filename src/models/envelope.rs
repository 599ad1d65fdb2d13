//! Response envelope shared by every endpoint

use crate::api::ApiError;
use serde::Deserialize;

/// `{code, data, msg}` wrapper. `code == 0` is the only success signal.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    pub data: Option<T>,
    pub msg: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload of a successful response.
    ///
    /// A success code without `data` counts as a rejection too.
    pub fn into_data(self) -> Result<T, ApiError> {
        match (self.code, self.data) {
            (0, Some(data)) => Ok(data),
            (code, _) => Err(ApiError::Rejected {
                code,
                msg: self.msg,
            }),
        }
    }

    /// Check the code of a response whose payload is irrelevant
    pub fn into_ack(self) -> Result<(), ApiError> {
        if self.code == 0 {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                code: self.code,
                msg: self.msg,
            })
        }
    }
}
