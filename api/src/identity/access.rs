//! Authorization checks for the comment routes.
//!
//! The checks only decide; turning a denial into a response is left to
//! [`DenyReason::respond`] so handlers can run them in the order they need.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    campground::models::comment::Comment,
    error::{ApiRequestError, AppError},
    flash::Flash,
    store::{Store, StoreError},
};

use super::models::user::User;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug)]
pub enum Access<T> {
    Allow(T),
    Deny(DenyReason),
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    #[error("You need to be logged in to do that")]
    NotLoggedIn,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("You don't have permission to do that")]
    NotOwner,
}

impl ApiRequestError for DenyReason {
    fn status_code(&self) -> StatusCode {
        match self {
            DenyReason::NotLoggedIn => StatusCode::UNAUTHORIZED,
            DenyReason::CommentNotFound => StatusCode::NOT_FOUND,
            DenyReason::NotOwner => StatusCode::FORBIDDEN,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            DenyReason::NotLoggedIn => "UNAUTHENTICATED",
            DenyReason::CommentNotFound => "NOT_FOUND",
            DenyReason::NotOwner => "FORBIDDEN",
        }
    }
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        AppError::request(&reason)
    }
}

impl DenyReason {
    /// XHR callers get a JSON error. Everyone else gets a flash notice and is
    /// sent to the login page, or `back` for the other reasons.
    pub fn respond(self, flash: Flash, xhr: bool, back: String) -> Response {
        if xhr {
            return AppError::from(self).into_response();
        }

        let target = match self {
            DenyReason::NotLoggedIn => LOGIN_PATH.to_string(),
            DenyReason::CommentNotFound | DenyReason::NotOwner => back,
        };

        (flash.error(self.to_string()), Redirect::to(&target)).into_response()
    }
}

pub fn ensure_authenticated(user: Option<User>) -> Access<User> {
    match user {
        Some(user) => Access::Allow(user),
        None => Access::Deny(DenyReason::NotLoggedIn),
    }
}

/// Allows the request only if `user` wrote the comment. The comment that was
/// looked up is handed back on success.
pub async fn check_comment_ownership(
    store: &dyn Store,
    user: Option<User>,
    comment_id: i32,
) -> Result<Access<(User, Comment)>, StoreError> {
    let user = match ensure_authenticated(user) {
        Access::Allow(user) => user,
        Access::Deny(reason) => return Ok(Access::Deny(reason)),
    };

    let comment = match store.find_comment(comment_id).await {
        Ok(comment) => comment,
        Err(e) if e.is_not_found() => return Ok(Access::Deny(DenyReason::CommentNotFound)),
        Err(e) => return Err(e),
    };

    if !comment.is_authored_by(user.id) {
        tracing::warn!(
            user_id = user.id,
            comment_id,
            author_id = comment.author.id,
            "Rejected access to a comment by a non-owner"
        );
        return Ok(Access::Deny(DenyReason::NotOwner));
    }

    Ok(Access::Allow((user, comment)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{campground::models::comment::NewComment, store::memory::MemoryStore};

    async fn store_with_comment() -> (MemoryStore, User, Comment) {
        let store = MemoryStore::default();
        let author = store.insert_user("alice").await;
        let comment = store
            .create_comment(NewComment {
                text: "Lovely site".into(),
                created_at: chrono::Utc::now().naive_utc(),
                author_id: author.id,
                author_username: author.username.clone(),
            })
            .await
            .unwrap();
        (store, author, comment)
    }

    #[test]
    fn anonymous_users_are_denied() {
        assert!(matches!(
            ensure_authenticated(None),
            Access::Deny(DenyReason::NotLoggedIn)
        ));
    }

    #[tokio::test]
    async fn author_is_allowed() {
        let (store, author, comment) = store_with_comment().await;
        let access = check_comment_ownership(&store, Some(author.clone()), comment.id)
            .await
            .unwrap();
        match access {
            Access::Allow((user, found)) => {
                assert_eq!(user, author);
                assert_eq!(found, comment);
            }
            Access::Deny(reason) => panic!("Author was denied: {reason}"),
        }
    }

    #[tokio::test]
    async fn other_users_are_denied() {
        let (store, _, comment) = store_with_comment().await;
        let intruder = store.insert_user("mallory").await;
        let access = check_comment_ownership(&store, Some(intruder), comment.id)
            .await
            .unwrap();
        assert!(matches!(access, Access::Deny(DenyReason::NotOwner)));
    }

    #[tokio::test]
    async fn missing_comment_is_denied_as_not_found() {
        let (store, author, _) = store_with_comment().await;
        let access = check_comment_ownership(&store, Some(author), 12345)
            .await
            .unwrap();
        assert!(matches!(access, Access::Deny(DenyReason::CommentNotFound)));
    }

    #[test]
    fn denial_status_codes() {
        assert_eq!(DenyReason::NotLoggedIn.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(DenyReason::NotOwner.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(DenyReason::CommentNotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
