pub mod campground;
pub mod comment;
