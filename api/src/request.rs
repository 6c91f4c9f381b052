use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

pub const X_REQUESTED_WITH: &str = "x-requested-with";

/// Whether the request was made by in-page scripting (`X-Requested-With:
/// XMLHttpRequest`) and expects JSON instead of a page or a redirect.
pub struct Xhr(pub bool);

pub fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get(X_REQUESTED_WITH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}

impl<S: Send + Sync> FromRequestParts<S> for Xhr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Ok(Xhr(is_xhr(&parts.headers)))
    }
}

/// The path of the page that sent the request, taken from the `Referer`
/// header. Only the path and query are kept so redirecting "back" never
/// leaves the site.
pub struct Referer(pub Option<String>);

impl Referer {
    pub fn or(self, fallback: String) -> String {
        self.0.unwrap_or(fallback)
    }
}

fn referer_path(value: &str) -> Option<String> {
    let path = if value.starts_with('/') {
        value.to_string()
    } else {
        let url = url::Url::parse(value).ok()?;
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    };

    // Browsers read `//host` and `/\host` as another origin.
    is_local_path(&path).then_some(path)
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !matches!(path.as_bytes().get(1), Some(b'/' | b'\\'))
}

impl<S: Send + Sync> FromRequestParts<S> for Referer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        Ok(Referer(
            parts
                .headers
                .get(header::REFERER)
                .and_then(|v| v.to_str().ok())
                .and_then(referer_path),
        ))
    }
}

#[cfg(test)]
mod test {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn xhr_header_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        assert!(!is_xhr(&headers));

        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("xmlhttprequest"));
        assert!(is_xhr(&headers));

        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("fetch"));
        assert!(!is_xhr(&headers));
    }

    #[test]
    fn referer_keeps_only_path_and_query() {
        assert_eq!(
            referer_path("https://evil.example/campgrounds/3?page=2"),
            Some("/campgrounds/3?page=2".to_string())
        );
        assert_eq!(referer_path("/campgrounds/3"), Some("/campgrounds/3".to_string()));
        assert_eq!(
            referer_path("//evil.example/x"),
            None,
            "Protocol-relative URLs are not valid paths"
        );
        assert_eq!(referer_path("not a url"), None);
    }

    #[test]
    fn referer_never_points_off_site() {
        assert_eq!(referer_path("https://x//evil.example/x"), None);
        assert_eq!(referer_path("https://x/\\evil.example/x"), None);
        assert_eq!(referer_path("/\\evil.example/x"), None);
        assert_eq!(
            referer_path("https://x/campgrounds/3//comments"),
            Some("/campgrounds/3//comments".to_string())
        );
    }
}
