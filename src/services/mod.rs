pub mod auth_service;
pub mod resource_service;

pub use auth_service::{AuthApi, AuthService};
pub use resource_service::{ResourceApi, ResourceService};
