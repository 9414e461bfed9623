pub mod app;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod media;
pub mod services;
pub mod session;
pub mod types;
pub mod views;

pub use app::AppContext;
pub use error::ClientError;

#[cfg(test)]
pub mod testing;
