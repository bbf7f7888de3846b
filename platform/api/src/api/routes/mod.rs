pub mod flights;
pub mod health;
pub mod text;
pub mod upload;
pub mod videos;
