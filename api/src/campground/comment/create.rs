use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tokio::task::JoinHandle;

use crate::{
    App,
    campground::models::comment::{Comment, NewComment},
    error::AppError,
    flash::Flash,
    identity::{
        MaybeAuthUser,
        access::{self, Access},
    },
    payload::Payload,
    request::{Referer, Xhr},
    store::{Store, StoreError},
};

use super::{CampgroundPath, CommentSubmission, campground_path};

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("{0}")]
    Create(StoreError),

    /// The comment exists but its campground does not reference it.
    #[error("comment {comment_id} was saved but not linked to campground {campground_id}: {source}")]
    Link {
        comment_id: i32,
        campground_id: i32,
        source: StoreError,
    },

    #[error("comment write did not finish: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

/// The two writes that publish a new comment: inserting the comment and then
/// appending its id to the campground. They run on their own task so a
/// request can answer before they finish; [`CommentWrite::wait`] lets the
/// caller wait for the outcome instead.
pub struct CommentWrite(JoinHandle<Result<Comment, WriteError>>);

impl CommentWrite {
    pub fn spawn(store: Arc<dyn Store>, campground_id: i32, comment: NewComment) -> Self {
        CommentWrite(tokio::spawn(async move {
            let comment = store.create_comment(comment).await.map_err(|e| {
                tracing::error!(campground_id, error = %e, "Could not create new comment");
                WriteError::Create(e)
            })?;

            if let Err(e) = store.push_campground_comment(campground_id, comment.id).await {
                tracing::error!(
                    campground_id,
                    comment_id = comment.id,
                    error = %e,
                    "Could not add comment reference to campground"
                );
                return Err(WriteError::Link {
                    comment_id: comment.id,
                    campground_id,
                    source: e,
                });
            }

            tracing::debug!(campground_id, comment_id = comment.id, "Comment created");
            Ok(comment)
        }))
    }

    pub async fn wait(self) -> Result<Comment, WriteError> {
        self.0.await?
    }
}

#[debug_handler(state = App)]
pub async fn create_comment(
    State(ctx): State<App>,
    Path(CampgroundPath { id }): Path<CampgroundPath>,
    Xhr(xhr): Xhr,
    referer: Referer,
    flash: Flash,
    auth_user: MaybeAuthUser,
    submission: Result<Payload<CommentSubmission>, AppError>,
) -> Response {
    let user = match access::ensure_authenticated(auth_user.into_user()) {
        Access::Allow(user) => user,
        Access::Deny(reason) => return reason.respond(flash, xhr, referer.or(campground_path(id))),
    };

    let input = match submission.and_then(|Payload(submission)| {
        submission
            .validate()
            .map_err(|e| (e, axum::http::StatusCode::UNPROCESSABLE_ENTITY).into())
    }) {
        Ok(input) => input,
        Err(e) => return e.into_response(),
    };

    let campground = match ctx.store.find_campground(id).await {
        Ok(campground) => campground,
        Err(e) => {
            tracing::warn!(campground_id = id, error = %e, "Could not find campground");
            let flash = flash.error(format!("Could not find campground with id: {id}"));
            return (flash, Redirect::to("/")).into_response();
        }
    };

    let write = CommentWrite::spawn(
        ctx.store.clone(),
        campground.id,
        NewComment {
            text: input.text,
            created_at: chrono::Utc::now().naive_utc(),
            author_id: user.id,
            author_username: user.username,
        },
    );

    let mut flash = flash;
    if ctx.config.await_comment_writes {
        // Linking failures are only logged, like when nobody waits.
        if let Err(e @ (WriteError::Create(_) | WriteError::Aborted(_))) = write.wait().await {
            flash = flash.error(format!("Could not create new comment: {e}"));
        }
    }

    (flash, Redirect::to(&campground_path(campground.id))).into_response()
}
