use axum::http::request::Parts;

use crate::{App, error::AppError};

use self::models::user::User;

pub mod access;
pub mod models;

pub const COOKIE_NAME: &str = "auth_token";

#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    #[error("Authentication required, but no cookie `{COOKIE_NAME}` found in headers.")]
    NoCookie,

    #[error(
        "Unauthorized, please check if you're logged in by refreshing the \
         page. This could be due to an expired session or token has became invalid."
    )]
    Unauthorized,
}

/// The user behind the request's session cookie, if any. Handlers decide
/// what an anonymous request may do through [`access`].
pub struct MaybeAuthUser(pub Result<User, AuthenticationError>);

impl MaybeAuthUser {
    pub fn into_user(self) -> Option<User> {
        match self.0 {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(reason = %e, "Request is not authenticated");
                None
            }
        }
    }
}

impl axum::extract::FromRequestParts<App> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let jar = axum_extra::extract::cookie::CookieJar::from_headers(&parts.headers);

        let session_token: &str = if let Some(t) = jar.get(COOKIE_NAME) {
            t.value()
        } else {
            return Ok(MaybeAuthUser(Err(AuthenticationError::NoCookie)));
        };

        let user = state.store.find_session_user(session_token).await?;

        Ok(MaybeAuthUser(user.ok_or(AuthenticationError::Unauthorized)))
    }
}
