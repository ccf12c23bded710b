pub mod bookmark;
pub mod manga;
pub mod rating;
