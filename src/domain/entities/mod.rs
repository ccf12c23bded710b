pub mod bookmark;
pub mod category;
pub mod chapter;
pub mod manga;
pub mod rating;
pub mod user;
