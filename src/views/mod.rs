//! Per-page view-state controllers.
//!
//! Each controller owns the transient state of one page (loading flag, error
//! message, fetched data, form fields) and drives the services. Failures are
//! logged with their cause and rendered as one fixed message per action.

pub mod admin;
pub mod detail;
pub mod edit;
pub mod login;
pub mod resources;
pub mod routes;
pub mod submit;

pub use admin::AdminView;
pub use detail::ResourceDetailView;
pub use edit::ResourceEditView;
pub use login::LoginView;
pub use resources::ResourceListView;
pub use routes::Route;
pub use submit::{SubmitView, VideoSource};

/// Fetch lifecycle of a page
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Shown when a resource has no poster
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/600x400";
pub const FALLBACK_WIDTH: u32 = 600;
pub const FALLBACK_HEIGHT: u32 = 400;
