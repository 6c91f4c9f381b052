//! Persistence for campgrounds, their comments and the sessions used to
//! authenticate commenters.
//!
//! Every operation touches a single document/row. Operations that span a
//! comment and its campground (create + push, pull + remove) are sequenced by
//! the caller and are not atomic together.

pub mod memory;
pub mod postgres;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    campground::models::{
        campground::Campground,
        comment::{Comment, CommentPatch, NewComment},
    },
    identity::models::user::User,
};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{entity} with id `{id}` not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error(transparent)]
    Database(#[from] diesel::result::Error),

    #[error("could not get a database connection: {0}")]
    Pool(#[from] diesel_async::pooled_connection::deadpool::PoolError),

    #[error("write rejected: {0}")]
    Rejected(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. } | StoreError::Database(diesel::result::Error::NotFound)
        )
    }
}

/// Result of removing a comment reference from a campground.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PullOutcome {
    /// Number of campgrounds matching the id.
    pub matched: u64,
    /// Number of campgrounds whose comment list actually changed.
    pub modified: u64,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_campground(&self, id: i32) -> Result<Campground, StoreError>;

    /// Appends `comment_id` to the campground's comment references.
    async fn push_campground_comment(
        &self,
        campground_id: i32,
        comment_id: i32,
    ) -> Result<(), StoreError>;

    /// Removes every occurrence of `comment_id` from the campground's comment
    /// references. A missing campground is not an error, it matches nothing.
    async fn pull_campground_comment(
        &self,
        campground_id: i32,
        comment_id: i32,
    ) -> Result<PullOutcome, StoreError>;

    async fn find_comment(&self, id: i32) -> Result<Comment, StoreError>;

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError>;

    /// Replaces the mutable fields of a comment and returns the updated comment.
    async fn find_and_update_comment(
        &self,
        id: i32,
        patch: CommentPatch,
    ) -> Result<Comment, StoreError>;

    /// Deletes a comment and returns it as it was before deletion.
    async fn find_and_remove_comment(&self, id: i32) -> Result<Comment, StoreError>;

    /// Resolves an active session token to its user.
    async fn find_session_user(&self, token: &str) -> Result<Option<User>, StoreError>;
}
