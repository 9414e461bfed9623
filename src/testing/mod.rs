use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::error::ClientError;
use crate::media::{ImageCompressor, MediaFile};
use crate::services::{AuthApi, ResourceApi};
use crate::session::Session;
use crate::types::{
    Links, NewResource, Resource, ResourceFilter, ResourceId, ResourceKind, ResourcePage, ResourcePatch, User,
};

pub fn sample_user(username: &str) -> User {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    User {
        id: 1,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        is_admin: true,
        created_at: at,
        updated_at: at,
    }
}

pub fn sample_resource(id: ResourceId, kind: ResourceKind) -> Resource {
    let at = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
    Resource {
        id,
        title: format!("resource {id}"),
        title_en: format!("resource {id}"),
        description: String::new(),
        resource_type: kind,
        author: None,
        source: String::new(),
        tags: Vec::new(),
        poster_image: String::new(),
        images: Vec::new(),
        videos: Vec::new(),
        links: Links::empty(),
        tmdb_id: None,
        stickers: Vec::new(),
        media_type: Some(kind),
        liked_by: Vec::new(),
        is_approved: false,
        created_at: at,
        updated_at: at,
    }
}

/// Service call observed by a fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ResourceFilter),
    Get(ResourceId),
    Create(NewResource),
    Update(ResourceId, ResourcePatch),
    Delete(ResourceId),
}

/// In-memory resource API that records every call
#[derive(Debug, Default)]
pub struct FakeResourceApi {
    pub resources: Mutex<Vec<Resource>>,
    pub calls: Mutex<Vec<Call>>,
    pub fail_all: bool,
}

impl FakeResourceApi {
    pub fn with(resources: Vec<Resource>) -> Self {
        Self {
            resources: Mutex::new(resources),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        if self.fail_all {
            return Err(ClientError::HttpStatus {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(id: ResourceId) -> ClientError {
        ClientError::HttpStatus {
            status: 404,
            message: format!("resource {id} not found"),
        }
    }
}

#[async_trait]
impl ResourceApi for FakeResourceApi {
    async fn list_page(&self, filter: &ResourceFilter) -> Result<ResourcePage, ClientError> {
        self.record(Call::List(filter.clone()))?;
        let data: Vec<Resource> = self
            .resources
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.kind.map_or(true, |kind| r.resource_type == kind))
            .cloned()
            .collect();
        Ok(ResourcePage {
            total: data.len() as u64,
            page: filter.page.unwrap_or(1),
            limit: filter.limit.unwrap_or(20),
            data,
        })
    }

    async fn get(&self, id: ResourceId) -> Result<Resource, ClientError> {
        self.record(Call::Get(id))?;
        self.resources
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, resource: &NewResource) -> Result<Resource, ClientError> {
        self.record(Call::Create(resource.clone()))?;
        let mut resources = self.resources.lock().unwrap();
        let id = resources.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let mut stored = sample_resource(id, resource.resource_type);
        stored.title = resource.title.clone();
        stored.images = resource.images.clone();
        stored.videos = resource.videos.clone();
        resources.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: ResourceId, patch: &ResourcePatch) -> Result<Resource, ClientError> {
        self.record(Call::Update(id, patch.clone()))?;
        let mut resources = self.resources.lock().unwrap();
        let resource = resources.iter_mut().find(|r| r.id == id).ok_or_else(|| Self::not_found(id))?;
        if let Some(title) = &patch.title {
            resource.title = title.clone();
        }
        if let Some(description) = &patch.description {
            resource.description = description.clone();
        }
        if let Some(tags) = &patch.tags {
            resource.tags = tags.clone();
        }
        if let Some(approved) = patch.is_approved {
            resource.is_approved = approved;
        }
        Ok(resource.clone())
    }

    async fn delete(&self, id: ResourceId) -> Result<bool, ClientError> {
        self.record(Call::Delete(id))?;
        let mut resources = self.resources.lock().unwrap();
        let before = resources.len();
        resources.retain(|r| r.id != id);
        if resources.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(true)
    }
}

/// Auth API accepting a single username/password pair
pub struct FakeAuthApi {
    pub session: Session,
    pub username: String,
    pub password: String,
    pub login_attempts: Mutex<u32>,
}

impl FakeAuthApi {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            session: Session::in_memory(),
            username: username.to_string(),
            password: password.to_string(),
            login_attempts: Mutex::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        *self.login_attempts.lock().unwrap()
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn login(&self, username: &str, password: &str) -> Result<User, ClientError> {
        *self.login_attempts.lock().unwrap() += 1;
        if username != self.username || password != self.password {
            return Err(ClientError::HttpStatus {
                status: 401,
                message: "invalid credentials".to_string(),
            });
        }
        let user = sample_user(username);
        self.session.set_session("fake-token", &user)?;
        Ok(user)
    }

    async fn register(&self, username: &str, email: &str, _password: &str) -> Result<User, ClientError> {
        let mut user = sample_user(username);
        user.email = email.to_string();
        Ok(user)
    }

    fn logout(&self) -> Result<(), ClientError> {
        self.session.clear_session()
    }

    fn current_user(&self) -> Option<User> {
        self.session.user()
    }

    fn is_logged_in(&self) -> bool {
        self.session.is_authenticated()
    }

    async fn refresh_token(&self) -> Result<String, ClientError> {
        self.session.set_token("fake-token-2")?;
        Ok("fake-token-2".to_string())
    }
}

/// Compressor that tags images so tests can see it ran
#[derive(Debug, Default)]
pub struct MarkingCompressor {
    pub fail: bool,
}

#[async_trait]
impl ImageCompressor for MarkingCompressor {
    async fn compress(&self, mut file: MediaFile) -> Result<MediaFile, ClientError> {
        if self.fail {
            return Err(ClientError::media("corrupt image"));
        }
        file.data.truncate(file.data.len() / 2);
        file.mime_type = "image/jpeg".to_string();
        Ok(file)
    }
}

pub fn media_file(name: &str, mime_type: &str, len: usize) -> MediaFile {
    MediaFile {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        data: vec![0u8; len],
        preview_url: format!("file:///tmp/{name}"),
    }
}
