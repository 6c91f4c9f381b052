use std::collections::HashMap;

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;

use crate::store::StoreError;

/// Errors that are caused by the request itself and carry their own status.
pub trait ApiRequestError: std::error::Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn code(&self) -> &'static str {
        "ERR"
    }
}

#[derive(Debug)]
pub enum ServerError {
    StoreError(StoreError),
}

impl Serialize for ServerError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        use serde::ser::SerializeMap;
        match self {
            ServerError::StoreError(e) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("message", &e.to_string())?;
                map.end()
            }
        }
    }
}

pub enum AppError {
    ServerError {
        error: ServerError,

        #[cfg(debug_assertions)]
        backtrace: Option<backtrace::Backtrace>,
    },
    RequestError {
        status: StatusCode,
        code: &'static str,
        msg: String,
    },
}

const SERVER_ERR: &str = "SERVER_ERR";
const SERVER_ERR_MSG: &str = "Internal server error";

#[derive(Serialize)]
struct ErrorResponse {
    code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<String>,

    #[cfg(debug_assertions)]
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_info: Option<HashMap<&'static str, Value>>,
}

impl AppError {
    pub fn request(error: &impl ApiRequestError) -> Self {
        AppError::RequestError {
            status: error.status_code(),
            code: error.code(),
            msg: error.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RequestError { status, .. } => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        let error_response = match self {
            AppError::ServerError {
                error,
                #[cfg(debug_assertions)]
                backtrace,
            } => {
                tracing::error!(error = ?error, "Server error while handling request");

                #[cfg(debug_assertions)]
                {
                    let mut debug_info = HashMap::from([(
                        "error",
                        serde_json::to_value(&error).unwrap_or(Value::Null),
                    )]);
                    if let Some(backtrace) = backtrace.as_ref() {
                        debug_info.insert(
                            "backtrace",
                            serde_json::to_value(filter_backtrace(backtrace))
                                .unwrap_or(Value::Null),
                        );
                    }
                    ErrorResponse {
                        code: SERVER_ERR.into(),
                        msg: Some(SERVER_ERR_MSG.into()),
                        debug_info: Some(debug_info),
                    }
                }
                #[cfg(not(debug_assertions))]
                {
                    ErrorResponse {
                        code: SERVER_ERR.into(),
                        msg: Some(SERVER_ERR_MSG.into()),
                    }
                }
            }
            AppError::RequestError { code, msg, .. } => ErrorResponse {
                code: code.into(),
                msg: Some(msg),
                #[cfg(debug_assertions)]
                debug_info: None,
            },
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        if e.is_not_found() {
            return AppError::RequestError {
                status: StatusCode::NOT_FOUND,
                code: "NOT_FOUND",
                msg: e.to_string(),
            };
        }

        AppError::ServerError {
            error: ServerError::StoreError(e),

            #[cfg(debug_assertions)]
            backtrace: Some(backtrace::Backtrace::new()),
        }
    }
}

impl From<(&'static str, StatusCode)> for AppError {
    fn from((msg, status): (&'static str, StatusCode)) -> Self {
        AppError::RequestError {
            status,
            code: "ERR",
            msg: msg.into(),
        }
    }
}

impl From<(String, StatusCode)> for AppError {
    fn from((msg, status): (String, StatusCode)) -> Self {
        AppError::RequestError {
            status,
            code: "ERR",
            msg,
        }
    }
}

#[cfg(debug_assertions)]
#[derive(Serialize, Debug)]
struct FrameInfo {
    name: String,
    loc: String,
}

#[cfg(debug_assertions)]
fn filter_backtrace(backtrace: &backtrace::Backtrace) -> Vec<FrameInfo> {
    const MODULE_PREFIX: &str = concat!(env!("CARGO_PKG_NAME"), "::");
    let mut frames_info: Vec<FrameInfo> = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            if let (Some(name), Some(filename), Some(lineno)) = (
                symbol.name().map(|n| n.to_string()),
                symbol.filename(),
                symbol.lineno(),
            ) {
                if name.contains(MODULE_PREFIX) {
                    frames_info.push(FrameInfo {
                        name,
                        loc: format!("{}:{}", filename.display(), lineno),
                    });
                }
            }
        }
    }

    frames_info
}
