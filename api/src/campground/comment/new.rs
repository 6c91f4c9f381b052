use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    App,
    campground::views::render_new_comment,
    flash::Flash,
    identity::{
        MaybeAuthUser,
        access::{self, Access},
    },
    request::{Referer, Xhr},
};

use super::{CampgroundPath, campground_path, empty_response};

#[debug_handler(state = App)]
pub async fn new_comment(
    State(ctx): State<App>,
    Path(CampgroundPath { id }): Path<CampgroundPath>,
    Xhr(xhr): Xhr,
    referer: Referer,
    flash: Flash,
    auth_user: MaybeAuthUser,
) -> Response {
    let user = match access::ensure_authenticated(auth_user.into_user()) {
        Access::Allow(user) => user,
        Access::Deny(reason) => return reason.respond(flash, xhr, referer.or(campground_path(id))),
    };

    match ctx.store.find_campground(id).await {
        Ok(campground) => {
            let (flash, notice) = flash.take();
            let page = render_new_comment(&campground, &user, notice.as_ref());
            (flash, Html(page)).into_response()
        }
        Err(e) => {
            tracing::error!(
                campground_id = id,
                error = %e,
                "/campgrounds/{{id}}/comments/new - could not find campground"
            );
            empty_response(&e)
        }
    }
}
