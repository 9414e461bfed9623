use std::sync::Arc;

use super::Route;
use crate::services::{AuthApi, ResourceApi};
use crate::types::{Resource, ResourceFilter, ResourceId};

pub const LOAD_FAILED: &str = "Failed to load resources, please try again later";
pub const DELETE_FAILED: &str = "Failed to delete resource, please try again later";

/// The `/admin` page: full resource table with a two-step delete.
///
/// Mutations keep the previously loaded list on failure; only a confirmed,
/// successful delete changes it.
pub struct AdminView {
    api: Arc<dyn ResourceApi>,
    pub resources: Vec<Resource>,
    pub loading: bool,
    pub error: Option<String>,
    pending_delete: Option<ResourceId>,
}

impl AdminView {
    pub const PAGE_SIZE: u32 = 100;

    /// Open the page, or get the login route to send an anonymous visitor to.
    pub fn open(auth: &dyn AuthApi, api: Arc<dyn ResourceApi>) -> Result<Self, Route> {
        if !auth.is_logged_in() {
            return Err(Route::admin_login());
        }
        Ok(Self {
            api,
            resources: Vec::new(),
            loading: false,
            error: None,
            pending_delete: None,
        })
    }

    pub async fn load(&mut self) {
        self.loading = true;
        let filter = ResourceFilter::new().page(1).limit(Self::PAGE_SIZE);
        match self.api.list(&filter).await {
            Ok(resources) => {
                self.resources = resources;
                self.error = None;
            }
            Err(e) => {
                tracing::error!("failed to fetch resources for admin: {}", e);
                self.error = Some(LOAD_FAILED.to_string());
            }
        }
        self.loading = false;
    }

    pub fn pending_delete(&self) -> Option<ResourceId> {
        self.pending_delete
    }

    /// Arm the confirmation for `id`; nothing is sent yet.
    pub fn request_delete(&mut self, id: ResourceId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the armed id. Returns true when the server accepted it.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete else {
            return false;
        };

        self.loading = true;
        let deleted = match self.api.delete(id).await {
            Ok(_) => {
                self.resources.retain(|resource| resource.id != id);
                self.pending_delete = None;
                true
            }
            Err(e) => {
                tracing::error!("failed to delete resource {}: {}", id, e);
                self.error = Some(DELETE_FAILED.to_string());
                false
            }
        };
        self.loading = false;
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_resource, sample_user, Call, FakeAuthApi, FakeResourceApi};
    use crate::types::ResourceKind;

    fn logged_in() -> FakeAuthApi {
        let auth = FakeAuthApi::new("admin", "secret");
        auth.session.set_session("t", &sample_user("admin")).unwrap();
        auth
    }

    fn three_resources() -> Arc<FakeResourceApi> {
        Arc::new(FakeResourceApi::with(vec![
            sample_resource(1, ResourceKind::Image),
            sample_resource(2, ResourceKind::Video),
            sample_resource(3, ResourceKind::Image),
        ]))
    }

    #[test]
    fn anonymous_visit_redirects_to_login() {
        let auth = FakeAuthApi::new("admin", "secret");
        let err = AdminView::open(&auth, three_resources()).err().unwrap();
        assert_eq!(err, Route::admin_login());
        assert_eq!(err.to_string(), "/login?redirect=%2Fadmin");
    }

    #[tokio::test]
    async fn loads_first_hundred() {
        let api = three_resources();
        let mut view = AdminView::open(&logged_in(), api.clone()).unwrap();
        view.load().await;
        assert_eq!(view.resources.len(), 3);
        assert_eq!(api.calls(), vec![Call::List(ResourceFilter::new().page(1).limit(100))]);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_exactly_one_entry() {
        let api = three_resources();
        let mut view = AdminView::open(&logged_in(), api.clone()).unwrap();
        view.load().await;

        view.request_delete(2);
        assert_eq!(view.pending_delete(), Some(2));
        assert_eq!(api.calls().len(), 1, "arming must not hit the API");

        assert!(view.confirm_delete().await);
        let ids: Vec<_> = view.resources.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(view.pending_delete(), None);
    }

    #[tokio::test]
    async fn cancel_has_no_side_effect() {
        let api = three_resources();
        let mut view = AdminView::open(&logged_in(), api.clone()).unwrap();
        view.load().await;

        view.request_delete(1);
        view.cancel_delete();
        assert!(!view.confirm_delete().await);
        assert_eq!(view.resources.len(), 3);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_keeps_list_and_reports() {
        let api = three_resources();
        let mut view = AdminView::open(&logged_in(), api.clone()).unwrap();
        view.load().await;

        view.request_delete(42);
        assert!(!view.confirm_delete().await);
        assert_eq!(view.resources.len(), 3);
        assert_eq!(view.error.as_deref(), Some(DELETE_FAILED));
        assert_eq!(view.pending_delete(), Some(42));
    }
}
