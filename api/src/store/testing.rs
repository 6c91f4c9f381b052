use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::{
    campground::models::{
        campground::Campground,
        comment::{Comment, CommentPatch, NewComment},
    },
    identity::models::user::User,
};

use super::{PullOutcome, Store, StoreError, memory::MemoryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    FindCampground,
    PushCampgroundComment,
    PullCampgroundComment,
    FindComment,
    CreateComment,
    UpdateComment,
    RemoveComment,
}

/// Wraps a [`MemoryStore`] and rejects the selected operations, optionally
/// after letting a number of calls through.
pub struct FailingStore {
    pub inner: Arc<MemoryStore>,
    failing: HashMap<Op, AtomicUsize>,
}

impl FailingStore {
    pub fn new(inner: Arc<MemoryStore>, failing: impl IntoIterator<Item = Op>) -> Self {
        FailingStore {
            inner,
            failing: failing
                .into_iter()
                .map(|op| (op, AtomicUsize::new(0)))
                .collect(),
        }
    }

    /// Lets `allowed` calls of `op` succeed before it starts failing.
    pub fn failing_after(mut self, op: Op, allowed: usize) -> Self {
        self.failing.insert(op, AtomicUsize::new(allowed));
        self
    }

    fn check(&self, op: Op) -> Result<(), StoreError> {
        let Some(allowed) = self.failing.get(&op) else {
            return Ok(());
        };
        let passed = allowed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if passed {
            return Ok(());
        }
        Err(StoreError::Rejected(format!("{op:?} is failing")))
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn find_campground(&self, id: i32) -> Result<Campground, StoreError> {
        self.check(Op::FindCampground)?;
        self.inner.find_campground(id).await
    }

    async fn push_campground_comment(
        &self,
        campground_id: i32,
        comment_id: i32,
    ) -> Result<(), StoreError> {
        self.check(Op::PushCampgroundComment)?;
        self.inner.push_campground_comment(campground_id, comment_id).await
    }

    async fn pull_campground_comment(
        &self,
        campground_id: i32,
        comment_id: i32,
    ) -> Result<PullOutcome, StoreError> {
        self.check(Op::PullCampgroundComment)?;
        self.inner.pull_campground_comment(campground_id, comment_id).await
    }

    async fn find_comment(&self, id: i32) -> Result<Comment, StoreError> {
        self.check(Op::FindComment)?;
        self.inner.find_comment(id).await
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        self.check(Op::CreateComment)?;
        self.inner.create_comment(comment).await
    }

    async fn find_and_update_comment(
        &self,
        id: i32,
        patch: CommentPatch,
    ) -> Result<Comment, StoreError> {
        self.check(Op::UpdateComment)?;
        self.inner.find_and_update_comment(id, patch).await
    }

    async fn find_and_remove_comment(&self, id: i32) -> Result<Comment, StoreError> {
        self.check(Op::RemoveComment)?;
        self.inner.find_and_remove_comment(id).await
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_session_user(token).await
    }
}
