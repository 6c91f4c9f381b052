use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// A comment as it is handed to templates and returned to XHR callers.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub author: Author,
}

/// Copied from the commenting user when the comment is created.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Author {
    pub id: i32,
    pub username: String,
}

impl Comment {
    pub fn is_authored_by(&self, user_id: i32) -> bool {
        self.author.id == user_id
    }
}

// The model that maps to the database table
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub author_username: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            text: row.text,
            created_at: row.created_at,
            author: Author {
                id: row.author_id,
                username: row.author_username,
            },
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub author_username: String,
}

impl NewComment {
    pub fn into_comment(self, id: i32) -> Comment {
        Comment {
            id,
            text: self.text,
            created_at: self.created_at,
            author: Author {
                id: self.author_id,
                username: self.author_username,
            },
        }
    }
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct CommentPatch {
    pub text: String,
    pub created_at: NaiveDateTime,
}
