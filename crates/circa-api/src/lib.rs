pub mod auth;
pub mod feed;
pub mod friends;
pub mod middleware;
pub mod notifications;
pub mod status;
pub mod wall;
