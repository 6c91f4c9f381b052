use axum::{
    Json, debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    App,
    error::AppError,
    flash::Flash,
    identity::{
        MaybeAuthUser,
        access::{Access, check_comment_ownership},
    },
    request::{Referer, Xhr},
    store::PullOutcome,
};

use super::{CommentPath, campground_path};

/// Removes the comment reference from the campground first and deletes the
/// comment only if that worked, so a failure never leaves a reference to a
/// deleted comment behind.
///
/// XHR callers get the deleted comment. When either step fails they get the
/// result of the first step instead (`null` if that step itself failed),
/// never an error object.
#[debug_handler(state = App)]
pub async fn delete_comment(
    State(ctx): State<App>,
    Path(CommentPath { id, comment_id }): Path<CommentPath>,
    Xhr(xhr): Xhr,
    referer: Referer,
    flash: Flash,
    auth_user: MaybeAuthUser,
) -> Result<Response, AppError> {
    let access =
        check_comment_ownership(ctx.store.as_ref(), auth_user.into_user(), comment_id).await?;
    if let Access::Deny(reason) = access {
        return Ok(reason.respond(flash, xhr, referer.or(campground_path(id))));
    }

    let back = Redirect::to(&campground_path(id));

    let pulled = match ctx.store.pull_campground_comment(id, comment_id).await {
        Ok(pulled) => pulled,
        Err(e) => {
            tracing::error!(
                campground_id = id,
                comment_id,
                error = %e,
                "Could not remove comment reference from campground"
            );
            if xhr {
                return Ok(Json(Option::<PullOutcome>::None).into_response());
            }
            let flash = flash.error(format!(
                "Could not find or delete comment from campground list. {e}"
            ));
            return Ok((flash, back).into_response());
        }
    };

    match ctx.store.find_and_remove_comment(comment_id).await {
        Ok(deleted) => {
            tracing::debug!(campground_id = id, comment_id, ?pulled, "Comment deleted");
            if xhr {
                Ok(Json(deleted).into_response())
            } else {
                Ok(back.into_response())
            }
        }
        Err(e) => {
            tracing::error!(campground_id = id, comment_id, error = %e, "Could not remove comment");
            if xhr {
                Ok(Json(pulled).into_response())
            } else {
                let flash = flash.error(format!("Could not remove comment: {e}"));
                Ok((flash, back).into_response())
            }
        }
    }
}
