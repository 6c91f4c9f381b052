pub mod create;
pub mod delete;
pub mod edit;
pub mod new;
pub mod update;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::store::StoreError;

pub const MAX_COMMENT_LENGTH: usize = 5000;

#[derive(Deserialize)]
pub struct CampgroundPath {
    pub id: i32,
}

#[derive(Deserialize)]
pub struct CommentPath {
    pub id: i32,
    pub comment_id: i32,
}

pub fn campground_path(id: i32) -> String {
    format!("/campgrounds/{id}")
}

/// Comment fields as submitted, either by the forms (`comment[text]=...`) or
/// by scripts (`{"comment": {"text": "..."}}`).
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum CommentSubmission {
    Nested {
        comment: CommentFields,
    },
    Flat {
        #[serde(rename = "comment[text]", alias = "text")]
        text: String,
    },
}

#[derive(Deserialize, Debug)]
pub struct CommentFields {
    text: String,
}

/// A validated comment body.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentInput {
    pub text: String,
}

impl CommentSubmission {
    pub fn validate(self) -> Result<CommentInput, &'static str> {
        let text = match self {
            CommentSubmission::Nested { comment } => comment.text,
            CommentSubmission::Flat { text } => text,
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err("No content provided");
        }

        if text.chars().count() > MAX_COMMENT_LENGTH {
            return Err("Content too long (max 5000 characters)");
        }

        Ok(CommentInput { text })
    }
}

// The lookup failures of the form pages and the failed update leave the
// client without a page or a redirect; only the status tells what happened.
pub fn empty_response(e: &StoreError) -> Response {
    if e.is_not_found() {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nested_json_submission() {
        let submission: CommentSubmission =
            serde_json::from_str(r#"{"comment": {"text": "  Great views  "}}"#).unwrap();
        assert_eq!(
            submission.validate(),
            Ok(CommentInput {
                text: "Great views".into()
            })
        );
    }

    #[test]
    fn flat_json_submission() {
        let submission: CommentSubmission =
            serde_json::from_str(r#"{"text": "Too many mosquitos"}"#).unwrap();
        assert_eq!(submission.validate().unwrap().text, "Too many mosquitos");
    }

    #[test]
    fn blank_text_is_rejected() {
        let submission: CommentSubmission =
            serde_json::from_str(r#"{"comment": {"text": "   "}}"#).unwrap();
        assert_eq!(submission.validate(), Err("No content provided"));
    }

    #[test]
    fn overlong_text_is_rejected() {
        let submission = CommentSubmission::Flat {
            text: "a".repeat(MAX_COMMENT_LENGTH + 1),
        };
        assert!(submission.validate().is_err());

        let submission = CommentSubmission::Flat {
            text: "é".repeat(MAX_COMMENT_LENGTH),
        };
        assert!(
            submission.validate().is_ok(),
            "The limit counts characters, not bytes"
        );
    }
}
