use axum::{
    Router,
    extract::{Query, Request, State},
    handler::Handler,
    response::Response,
    routing::{get, post},
};
use serde::Deserialize;

use crate::App;

use super::comment::{
    create::create_comment, delete::delete_comment, edit::edit_comment, new::new_comment,
    update::update_comment,
};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/{id}/comments/new", get(new_comment))
        .route("/{id}/comments", post(create_comment))
        .route("/{id}/comments/{comment_id}/edit", get(edit_comment))
        .route(
            "/{id}/comments/{comment_id}",
            post(override_comment_method)
                .put(update_comment)
                .delete(delete_comment),
        )
}

#[derive(Deserialize, Debug, Clone, Copy)]
enum OverriddenMethod {
    #[serde(rename = "PUT", alias = "put")]
    Put,
    #[serde(rename = "DELETE", alias = "delete")]
    Delete,
}

#[derive(Deserialize)]
struct MethodOverride {
    #[serde(rename = "_method")]
    method: OverriddenMethod,
}

// HTML forms can only GET or POST, so the edit page posts with `?_method=`.
async fn override_comment_method(
    State(ctx): State<App>,
    Query(MethodOverride { method }): Query<MethodOverride>,
    req: Request,
) -> Response {
    tracing::debug!(?method, uri = %req.uri(), "Overriding request method");
    match method {
        OverriddenMethod::Put => update_comment.call(req, ctx).await,
        OverriddenMethod::Delete => delete_comment.call(req, ctx).await,
    }
}
