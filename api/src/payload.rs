use axum::{
    extract::{FromRequest, Request},
    http::{StatusCode, header},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

// Request bodies arrive either as url-encoded forms from plain HTML pages or as
// JSON from scripts. Both are decoded into the same type and rejected with our
// own error instead of axum's plain-text rejections.
pub struct Payload<T>(pub T);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"))
}

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(&req) {
            match axum::Json::<T>::from_request(req, state).await {
                Ok(value) => Ok(Self(value.0)),
                Err(rejection) => {
                    Err((rejection.body_text(), StatusCode::UNPROCESSABLE_ENTITY).into())
                }
            }
        } else {
            match axum::Form::<T>::from_request(req, state).await {
                Ok(value) => Ok(Self(value.0)),
                Err(rejection) => {
                    Err((rejection.body_text(), StatusCode::UNPROCESSABLE_ENTITY).into())
                }
            }
        }
    }
}
