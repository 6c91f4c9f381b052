use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;

use crate::{
    campground::models::{
        campground::Campground,
        comment::{Comment, CommentPatch, NewComment},
    },
    identity::models::user::User,
};

use super::{PullOutcome, Store, StoreError};

/// Keeps everything in process memory. Used for local development when no
/// `DATABASE_URL` is configured, and by the tests.
pub struct MemoryStore {
    campgrounds: scc::HashMap<i32, Campground>,
    comments: scc::HashMap<i32, Comment>,
    users: scc::HashMap<i32, User>,
    sessions: scc::HashMap<String, i32>,
    next_id: AtomicI32,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            campgrounds: scc::HashMap::new(),
            comments: scc::HashMap::new(),
            users: scc::HashMap::new(),
            sessions: scc::HashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

impl MemoryStore {
    /// A store with one campground and, when a token is given, a user logged in
    /// with that token.
    pub async fn seeded(auth_token: Option<&str>) -> Self {
        let store = MemoryStore::default();
        let campground = store.insert_campground("Granite Hill").await;
        tracing::info!(campground_id = campground.id, "Seeded in-memory campground");

        if let Some(token) = auth_token {
            let user = store.insert_user("camper").await;
            store.insert_session(token, user.id).await;
            tracing::info!(user_id = user.id, "Seeded in-memory session");
        }

        store
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn insert_campground(&self, name: &str) -> Campground {
        let campground = Campground {
            id: self.next_id(),
            name: name.to_string(),
            comments: vec![],
        };
        let _ = self
            .campgrounds
            .insert_async(campground.id, campground.clone())
            .await;
        campground
    }

    pub async fn insert_user(&self, username: &str) -> User {
        let user = User {
            id: self.next_id(),
            username: username.to_string(),
        };
        let _ = self.users.insert_async(user.id, user.clone()).await;
        user
    }

    pub async fn insert_session(&self, token: &str, user_id: i32) {
        let _ = self.sessions.insert_async(token.to_string(), user_id).await;
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_campground(&self, id: i32) -> Result<Campground, StoreError> {
        self.campgrounds
            .read_async(&id, |_, c| c.clone())
            .await
            .ok_or(StoreError::NotFound {
                entity: "campground",
                id,
            })
    }

    async fn push_campground_comment(
        &self,
        campground_id: i32,
        comment_id: i32,
    ) -> Result<(), StoreError> {
        self.campgrounds
            .update_async(&campground_id, |_, c| c.comments.push(comment_id))
            .await
            .ok_or(StoreError::NotFound {
                entity: "campground",
                id: campground_id,
            })
    }

    async fn pull_campground_comment(
        &self,
        campground_id: i32,
        comment_id: i32,
    ) -> Result<PullOutcome, StoreError> {
        let modified = self
            .campgrounds
            .update_async(&campground_id, |_, c| {
                let before = c.comments.len();
                c.comments.retain(|id| *id != comment_id);
                before != c.comments.len()
            })
            .await;

        Ok(match modified {
            Some(modified) => PullOutcome {
                matched: 1,
                modified: u64::from(modified),
            },
            None => PullOutcome::default(),
        })
    }

    async fn find_comment(&self, id: i32) -> Result<Comment, StoreError> {
        self.comments
            .read_async(&id, |_, c| c.clone())
            .await
            .ok_or(StoreError::NotFound {
                entity: "comment",
                id,
            })
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let comment = comment.into_comment(self.next_id());
        self.comments
            .insert_async(comment.id, comment.clone())
            .await
            .map_err(|(id, _)| StoreError::Rejected(format!("duplicate comment id `{id}`")))?;
        Ok(comment)
    }

    async fn find_and_update_comment(
        &self,
        id: i32,
        patch: CommentPatch,
    ) -> Result<Comment, StoreError> {
        self.comments
            .update_async(&id, |_, c| {
                c.text = patch.text;
                c.created_at = patch.created_at;
                c.clone()
            })
            .await
            .ok_or(StoreError::NotFound {
                entity: "comment",
                id,
            })
    }

    async fn find_and_remove_comment(&self, id: i32) -> Result<Comment, StoreError> {
        self.comments
            .remove_async(&id)
            .await
            .map(|(_, c)| c)
            .ok_or(StoreError::NotFound {
                entity: "comment",
                id,
            })
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<User>, StoreError> {
        let Some(user_id) = self.sessions.read_async(token, |_, id| *id).await else {
            return Ok(None);
        };
        Ok(self.users.read_async(&user_id, |_, u| u.clone()).await)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn new_comment(author: &User, text: &str) -> NewComment {
        NewComment {
            text: text.into(),
            created_at: chrono::Utc::now().naive_utc(),
            author_id: author.id,
            author_username: author.username.clone(),
        }
    }

    #[tokio::test]
    async fn pull_reports_matched_and_modified() {
        let store = MemoryStore::default();
        let campground = store.insert_campground("Salmon Creek").await;
        store.push_campground_comment(campground.id, 42).await.unwrap();

        let outcome = store.pull_campground_comment(campground.id, 42).await.unwrap();
        assert_eq!(outcome, PullOutcome { matched: 1, modified: 1 });

        let outcome = store.pull_campground_comment(campground.id, 42).await.unwrap();
        assert_eq!(
            outcome,
            PullOutcome { matched: 1, modified: 0 },
            "Pulling an absent reference matches but does not modify"
        );

        let outcome = store.pull_campground_comment(9999, 42).await.unwrap();
        assert_eq!(outcome, PullOutcome::default(), "Unknown campground matches nothing");
    }

    #[tokio::test]
    async fn pull_removes_every_occurrence() {
        let store = MemoryStore::default();
        let campground = store.insert_campground("Salmon Creek").await;
        for id in [3, 4, 3] {
            store.push_campground_comment(campground.id, id).await.unwrap();
        }

        store.pull_campground_comment(campground.id, 3).await.unwrap();
        let campground = store.find_campground(campground.id).await.unwrap();
        assert_eq!(campground.comments, vec![4]);
    }

    #[tokio::test]
    async fn push_to_unknown_campground_is_not_found() {
        let store = MemoryStore::default();
        let err = store.push_campground_comment(77, 1).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn comment_lifecycle() {
        let store = MemoryStore::default();
        let author = store.insert_user("alice").await;

        let created = store.create_comment(new_comment(&author, "first")).await.unwrap();
        assert_eq!(created.author.username, "alice");
        assert_eq!(store.find_comment(created.id).await.unwrap(), created);

        let later = created.created_at + chrono::Duration::try_seconds(5).unwrap();
        let updated = store
            .find_and_update_comment(
                created.id,
                CommentPatch {
                    text: "edited".into(),
                    created_at: later,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "edited");
        assert_eq!(updated.created_at, later);
        assert_eq!(updated.author, created.author, "Author is never rewritten");

        let removed = store.find_and_remove_comment(created.id).await.unwrap();
        assert_eq!(removed, updated);
        assert!(store.find_comment(created.id).await.unwrap_err().is_not_found());
        assert!(store.find_and_remove_comment(created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn sessions_resolve_to_users() {
        let store = MemoryStore::seeded(Some("token-1")).await;
        let user = store.find_session_user("token-1").await.unwrap();
        assert_eq!(user.map(|u| u.username), Some("camper".to_string()));
        assert!(store.find_session_user("nope").await.unwrap().is_none());
    }
}
