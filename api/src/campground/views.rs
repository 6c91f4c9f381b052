use crate::{
    flash::FlashMessage,
    identity::models::user::User,
    utils::{escape_html, render_template},
};

use super::models::{campground::Campground, comment::Comment};

const COMMENT_NEW_TEMPLATE: &str = include_str!("templates/comment_new.html");
const COMMENT_EDIT_TEMPLATE: &str = include_str!("templates/comment_edit.html");

fn render_notice(notice: Option<&FlashMessage>) -> String {
    match notice {
        Some(notice) => format!(
            "<div class=\"alert alert-{}\" role=\"alert\">{}</div>",
            notice.level.as_str(),
            escape_html(&notice.message)
        ),
        None => String::new(),
    }
}

pub fn render_new_comment(
    campground: &Campground,
    user: &User,
    notice: Option<&FlashMessage>,
) -> String {
    // user-provided values go last so nothing they contain is substituted again
    render_template(
        COMMENT_NEW_TEMPLATE,
        &[
            ("{{campground_id}}", &campground.id.to_string()),
            ("{{flash}}", &render_notice(notice)),
            ("{{campground_name}}", &escape_html(&campground.name)),
            ("{{username}}", &escape_html(&user.username)),
        ],
    )
}

pub fn render_edit_comment(
    campground_id: i32,
    comment: &Comment,
    notice: Option<&FlashMessage>,
) -> String {
    render_template(
        COMMENT_EDIT_TEMPLATE,
        &[
            ("{{campground_id}}", &campground_id.to_string()),
            ("{{comment_id}}", &comment.id.to_string()),
            ("{{flash}}", &render_notice(notice)),
            ("{{comment_text}}", &escape_html(&comment.text)),
        ],
    )
}
