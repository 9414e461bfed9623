use std::sync::Arc;

use super::Route;
use crate::services::AuthApi;
use crate::types::User;

pub const MISSING_CREDENTIALS: &str = "Please enter a username and password";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password, please try again";

/// The `/login` page
pub struct LoginView {
    auth: Arc<dyn AuthApi>,
    pub username: String,
    pub password: String,
    redirect: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl LoginView {
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        Self {
            auth,
            username: String::new(),
            password: String::new(),
            redirect: None,
            loading: false,
            error: None,
        }
    }

    /// Page opened from a route, keeping its `redirect` target
    pub fn for_route(auth: Arc<dyn AuthApi>, route: &Route) -> Self {
        let mut view = Self::new(auth);
        if let Route::Login { redirect } = route {
            view.redirect = redirect.clone();
        }
        view
    }

    pub fn redirect_target(&self) -> &str {
        self.redirect.as_deref().unwrap_or("/")
    }

    /// Attempt the login. On success returns the logged-in user and the page
    /// to continue to.
    pub async fn submit(&mut self) -> Option<(User, String)> {
        if self.username.is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_CREDENTIALS.to_string());
            return None;
        }

        self.loading = true;
        self.error = None;

        let outcome = match self.auth.login(&self.username, &self.password).await {
            Ok(user) => Some((user, self.redirect_target().to_string())),
            Err(e) => {
                tracing::error!("login failed: {}", e);
                self.error = Some(INVALID_CREDENTIALS.to_string());
                None
            }
        };

        self.loading = false;
        outcome
    }
}
