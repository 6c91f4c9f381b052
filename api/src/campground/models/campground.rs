use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::schema::campgrounds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Campground {
    pub id: i32,
    pub name: String,
    /// Ids of the comments posted on this campground, oldest first.
    pub comments: Vec<i32>,
}
