pub mod admin;
pub mod auth;
pub mod resources;
pub mod submit;
