//! One-shot notices that survive a redirect.
//!
//! A notice is written into the `flash` cookie when a handler sets it and is
//! removed by the next handler that renders a page.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::App;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
}

impl FlashMessage {
    fn encode(&self) -> Option<String> {
        let json = serde_json::to_vec(self).ok()?;
        Some(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(value: &str) -> Option<Self> {
        let json = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(value)
            .ok()?;
        serde_json::from_slice(&json).ok()
    }
}

pub struct Flash {
    jar: CookieJar,
    secure: bool,
}

impl Flash {
    pub fn new(jar: CookieJar, secure: bool) -> Self {
        Flash { jar, secure }
    }

    pub fn error(self, message: impl Into<String>) -> Self {
        self.set(Level::Error, message)
    }

    pub fn set(self, level: Level, message: impl Into<String>) -> Self {
        let notice = FlashMessage {
            level,
            message: message.into(),
        };

        let Some(value) = notice.encode() else {
            tracing::error!(?notice, "Could not encode flash notice");
            return self;
        };

        let cookie = Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax);

        Flash {
            jar: self.jar.add(cookie),
            secure: self.secure,
        }
    }

    /// Reads the pending notice and schedules its removal.
    pub fn take(self) -> (Self, Option<FlashMessage>) {
        let Some(cookie) = self.jar.get(FLASH_COOKIE) else {
            return (self, None);
        };

        let notice = FlashMessage::decode(cookie.value());
        if notice.is_none() {
            tracing::debug!(value = cookie.value(), "Discarding malformed flash cookie");
        }

        let jar = self.jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
        (
            Flash {
                jar,
                secure: self.secure,
            },
            notice,
        )
    }
}

impl FromRequestParts<App> for Flash {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        Ok(Flash::new(
            CookieJar::from_headers(&parts.headers),
            state.config.secure_cookies,
        ))
    }
}

impl IntoResponseParts for Flash {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

#[cfg(test)]
mod test {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::*;

    fn jar_with(cookie: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn set_then_take_returns_the_notice() {
        let flash = Flash::new(CookieJar::new(), false).error("Could not update comment: boom");
        let value = flash.jar.get(FLASH_COOKIE).unwrap().value().to_string();

        let (_, notice) = Flash::new(jar_with(&format!("{FLASH_COOKIE}={value}")), false).take();
        assert_eq!(
            notice,
            Some(FlashMessage {
                level: Level::Error,
                message: "Could not update comment: boom".into(),
            })
        );
    }

    #[test]
    fn take_without_cookie_is_empty() {
        let (_, notice) = Flash::new(CookieJar::new(), false).take();
        assert!(notice.is_none());
    }

    #[test]
    fn malformed_cookie_is_ignored() {
        let (_, notice) = Flash::new(jar_with("flash=%%%not-base64"), false).take();
        assert!(notice.is_none(), "Garbage in the cookie must not surface as a notice");
    }
}
