use std::time::Duration;

use async_trait::async_trait;
use diesel::{
    prelude::*,
    sql_types::{Integer, Nullable},
};
use diesel_async::{
    AsyncPgConnection, RunQueryDsl,
    pooled_connection::{
        AsyncDieselConnectionManager,
        deadpool::{BuildError, Pool},
    },
};

use crate::{
    campground::models::{
        campground::Campground,
        comment::{Comment, CommentPatch, CommentRow, NewComment},
    },
    identity::models::user::User,
    schema::{campgrounds, comments, sessions, users},
};

use super::{PullOutcome, Store, StoreError};

pub struct PgStore {
    pool: Pool<AsyncPgConnection>,
}

impl PgStore {
    pub fn connect(database_url: &str) -> Result<Self, BuildError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(manager)
            .max_size(10)
            .runtime(deadpool_runtime::Runtime::Tokio1)
            .wait_timeout(Some(Duration::from_secs(10)))
            .create_timeout(Some(Duration::from_secs(10)))
            .build()?;

        Ok(PgStore { pool })
    }
}

#[derive(QueryableByName)]
struct Removed {
    #[diesel(sql_type = Nullable<Integer>)]
    removed: Option<i32>,
}

#[async_trait]
impl Store for PgStore {
    async fn find_campground(&self, id: i32) -> Result<Campground, StoreError> {
        let mut conn = self.pool.get().await?;

        campgrounds::table
            .find(id)
            .select(Campground::as_select())
            .first(&mut conn)
            .await
            .optional()?
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
        let mut conn = self.pool.get().await?;

        let updated = diesel::sql_query(
            "
            UPDATE campgrounds SET comments = array_append(comments, $1)
            WHERE id = $2;
            ",
        )
        .bind::<Integer, _>(comment_id)
        .bind::<Integer, _>(campground_id)
        .execute(&mut conn)
        .await?;

        if updated == 0 {
            return Err(StoreError::NotFound {
                entity: "campground",
                id: campground_id,
            });
        }

        Ok(())
    }

    async fn pull_campground_comment(
        &self,
        campground_id: i32,
        comment_id: i32,
    ) -> Result<PullOutcome, StoreError> {
        let mut conn = self.pool.get().await?;

        // `before` holds the row as it was prior to the update so the number of
        // removed references can be reported back.
        let removed = diesel::sql_query(
            "
            WITH before AS (
                SELECT id, comments FROM campgrounds WHERE id = $2 FOR UPDATE
            )
            UPDATE campgrounds SET comments = array_remove(before.comments, $1)
            FROM before
            WHERE campgrounds.id = before.id
            RETURNING cardinality(before.comments) - cardinality(campgrounds.comments) AS removed;
            ",
        )
        .bind::<Integer, _>(comment_id)
        .bind::<Integer, _>(campground_id)
        .get_result::<Removed>(&mut conn)
        .await
        .optional()?;

        Ok(match removed {
            Some(Removed { removed }) => PullOutcome {
                matched: 1,
                modified: u64::from(removed.unwrap_or(0) > 0),
            },
            None => PullOutcome::default(),
        })
    }

    async fn find_comment(&self, id: i32) -> Result<Comment, StoreError> {
        let mut conn = self.pool.get().await?;

        comments::table
            .find(id)
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()?
            .map(Comment::from)
            .ok_or(StoreError::NotFound {
                entity: "comment",
                id,
            })
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut conn = self.pool.get().await?;

        let row = diesel::insert_into(comments::table)
            .values(&comment)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(row.into())
    }

    async fn find_and_update_comment(
        &self,
        id: i32,
        patch: CommentPatch,
    ) -> Result<Comment, StoreError> {
        let mut conn = self.pool.get().await?;

        diesel::update(comments::table.find(id))
            .set(&patch)
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .map(Comment::from)
            .ok_or(StoreError::NotFound {
                entity: "comment",
                id,
            })
    }

    async fn find_and_remove_comment(&self, id: i32) -> Result<Comment, StoreError> {
        let mut conn = self.pool.get().await?;

        diesel::delete(comments::table.find(id))
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .map(Comment::from)
            .ok_or(StoreError::NotFound {
                entity: "comment",
                id,
            })
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = sessions::table
            .inner_join(users::table)
            .filter(sessions::token.eq(token))
            .filter(sessions::active.eq(true))
            .filter(sessions::expires_at.gt(diesel::dsl::now))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(user)
    }
}
