use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    App,
    campground::models::comment::CommentPatch,
    error::AppError,
    flash::Flash,
    identity::{
        MaybeAuthUser,
        access::{Access, check_comment_ownership},
    },
    payload::Payload,
    request::{Referer, Xhr},
};

use super::{CommentPath, CommentSubmission, campground_path, empty_response};

#[debug_handler(state = App)]
pub async fn update_comment(
    State(ctx): State<App>,
    Path(CommentPath { id, comment_id }): Path<CommentPath>,
    Xhr(xhr): Xhr,
    referer: Referer,
    flash: Flash,
    auth_user: MaybeAuthUser,
    submission: Result<Payload<CommentSubmission>, AppError>,
) -> Result<Response, AppError> {
    let access =
        check_comment_ownership(ctx.store.as_ref(), auth_user.into_user(), comment_id).await?;
    if let Access::Deny(reason) = access {
        return Ok(reason.respond(flash, xhr, referer.or(campground_path(id))));
    }

    let Payload(submission) = submission?;
    let input = submission
        .validate()
        .map_err(|e| (e, StatusCode::UNPROCESSABLE_ENTITY))?;

    let patch = CommentPatch {
        text: input.text,
        created_at: chrono::Utc::now().naive_utc(),
    };

    match ctx.store.find_and_update_comment(comment_id, patch).await {
        Ok(comment) => {
            if xhr {
                Ok(Json(comment).into_response())
            } else {
                Ok(Redirect::to(&campground_path(id)).into_response())
            }
        }
        Err(e) => {
            tracing::error!(campground_id = id, comment_id, error = %e, "Could not update comment");
            let flash = flash.error(format!("Could not update comment: {e}"));
            Ok((flash, empty_response(&e)).into_response())
        }
    }
}
