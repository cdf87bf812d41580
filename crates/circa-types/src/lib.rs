pub mod api;
pub mod feed;
pub mod time;
