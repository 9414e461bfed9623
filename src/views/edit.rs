use std::sync::Arc;

use super::ViewState;
use crate::services::ResourceApi;
use crate::types::{Resource, ResourceId, ResourcePatch};

pub const LOAD_FAILED: &str = "Failed to load resource, please try again later";
pub const SAVE_FAILED: &str = "Failed to save resource, please try again later";

/// Editable subset of a resource
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditForm {
    pub title: String,
    pub title_en: String,
    pub description: String,
    pub author: String,
    pub source: String,
    pub tags: Vec<String>,
    pub poster_image: String,
    pub is_approved: bool,
}

impl From<&Resource> for EditForm {
    fn from(resource: &Resource) -> Self {
        Self {
            title: resource.title.clone(),
            title_en: resource.title_en.clone(),
            description: resource.description.clone(),
            author: resource.author.clone().unwrap_or_default(),
            source: resource.source.clone(),
            tags: resource.tags.clone(),
            poster_image: resource.poster_image.clone(),
            is_approved: resource.is_approved,
        }
    }
}

impl EditForm {
    /// Fields that differ from `original`
    pub fn diff(&self, original: &Resource) -> ResourcePatch {
        fn changed<T: PartialEq + Clone>(new: &T, old: &T) -> Option<T> {
            (new != old).then(|| new.clone())
        }

        let original_author = original.author.clone().unwrap_or_default();
        ResourcePatch {
            title: changed(&self.title, &original.title),
            title_en: changed(&self.title_en, &original.title_en),
            description: changed(&self.description, &original.description),
            author: changed(&self.author, &original_author),
            source: changed(&self.source, &original.source),
            tags: changed(&self.tags, &original.tags),
            poster_image: changed(&self.poster_image, &original.poster_image),
            is_approved: changed(&self.is_approved, &original.is_approved),
            ..Default::default()
        }
    }
}

/// The `/admin/edit/{id}` page
pub struct ResourceEditView {
    api: Arc<dyn ResourceApi>,
    id: ResourceId,
    pub state: ViewState<Resource>,
    pub form: EditForm,
    pub saving: bool,
    pub error: Option<String>,
}

impl ResourceEditView {
    pub fn new(api: Arc<dyn ResourceApi>, id: ResourceId) -> Self {
        Self {
            api,
            id,
            state: ViewState::Idle,
            form: EditForm::default(),
            saving: false,
            error: None,
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        self.state = match self.api.get(self.id).await {
            Ok(resource) => {
                self.form = EditForm::from(&resource);
                ViewState::Loaded(resource)
            }
            Err(e) => {
                tracing::error!("failed to fetch resource {} for editing: {}", self.id, e);
                ViewState::Error(LOAD_FAILED.to_string())
            }
        };
    }

    pub fn pending_changes(&self) -> ResourcePatch {
        self.state
            .data()
            .map(|original| self.form.diff(original))
            .unwrap_or_default()
    }

    /// Send the changed fields. Returns true when the server accepted them.
    pub async fn save(&mut self) -> bool {
        if self.state.data().is_none() {
            return false;
        }
        let patch = self.pending_changes();

        self.saving = true;
        self.error = None;
        let saved = match self.api.update(self.id, &patch).await {
            Ok(updated) => {
                self.form = EditForm::from(&updated);
                self.state = ViewState::Loaded(updated);
                true
            }
            Err(e) => {
                tracing::error!("failed to update resource {}: {}", self.id, e);
                self.error = Some(SAVE_FAILED.to_string());
                false
            }
        };
        self.saving = false;
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_resource, Call, FakeResourceApi};
    use crate::types::ResourceKind;

    #[tokio::test]
    async fn save_sends_only_changed_fields() {
        let api = Arc::new(FakeResourceApi::with(vec![sample_resource(8, ResourceKind::Image)]));
        let mut view = ResourceEditView::new(api.clone(), 8);
        view.load().await;

        view.form.title = "Renamed".into();
        view.form.is_approved = true;
        assert!(view.save().await);

        let expected = ResourcePatch {
            title: Some("Renamed".into()),
            is_approved: Some(true),
            ..Default::default()
        };
        assert_eq!(api.calls().last(), Some(&Call::Update(8, expected)));
        assert!(view.pending_changes().is_empty());
        assert_eq!(view.state.data().map(|r| r.title.as_str()), Some("Renamed"));
    }

    #[tokio::test]
    async fn untouched_form_sends_empty_patch() {
        let api = Arc::new(FakeResourceApi::with(vec![sample_resource(8, ResourceKind::Image)]));
        let mut view = ResourceEditView::new(api.clone(), 8);
        view.load().await;
        assert!(view.save().await);
        assert_eq!(api.calls().last(), Some(&Call::Update(8, ResourcePatch::default())));
    }

    #[tokio::test]
    async fn save_without_loaded_resource_is_refused() {
        let api = Arc::new(FakeResourceApi::failing());
        let mut view = ResourceEditView::new(api.clone(), 8);
        view.load().await;
        assert_eq!(view.state.error(), Some(LOAD_FAILED));
        assert!(!view.save().await);
        assert_eq!(api.calls().len(), 1);
    }
}
