use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    App,
    campground::views::render_edit_comment,
    error::AppError,
    flash::Flash,
    identity::{
        MaybeAuthUser,
        access::{Access, check_comment_ownership},
    },
    request::{Referer, Xhr},
};

use super::{CommentPath, campground_path, empty_response};

#[debug_handler(state = App)]
pub async fn edit_comment(
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

    // The comment is read again so the form shows it as stored right now.
    match ctx.store.find_comment(comment_id).await {
        Ok(comment) => {
            let (flash, notice) = flash.take();
            let page = render_edit_comment(id, &comment, notice.as_ref());
            Ok((flash, Html(page)).into_response())
        }
        Err(e) => {
            tracing::error!(
                campground_id = id,
                comment_id,
                error = %e,
                "lookup comment: could not find comment"
            );
            let flash = flash.error(format!("Could not find comment: {e}"));
            Ok((flash, empty_response(&e)).into_response())
        }
    }
}
