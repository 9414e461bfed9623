/// Shared types exchanged with the resource API

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Server-assigned resource identifier
pub type ResourceId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Image,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(ResourceKind::Image),
            "video" => Ok(ResourceKind::Video),
            _ => Err(ClientError::validation("resource_type")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub mime_type: String,
    /// Uploaded from a local file rather than linked by URL
    #[serde(default)]
    pub is_local: bool,
}

impl VideoInfo {
    /// An externally hosted video known only by its URL
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            width: 0,
            height: 0,
            size: 0,
            mime_type: "video/mp4".to_string(),
            is_local: false,
        }
    }
}

/// Download links grouped by provider, each provider keeping its URL order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, Vec<String>>);

impl Links {
    pub const PROVIDERS: [&'static str; 14] = [
        "magnet", "ed2k", "uc", "mobile", "tianyi", "quark", "115", "aliyun", "pikpak", "baidu",
        "123", "xunlei", "online", "others",
    ];

    /// Every known provider present with an empty list
    pub fn empty() -> Self {
        Self(
            Self::PROVIDERS
                .iter()
                .map(|provider| (provider.to_string(), Vec::new()))
                .collect(),
        )
    }

    pub fn get(&self, provider: &str) -> &[String] {
        self.0.get(provider).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of URLs across all providers
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub description: String,
    pub resource_type: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub poster_image: String,
    #[serde(default)]
    pub images: Vec<ImageInfo>,
    #[serde(default)]
    pub videos: Vec<VideoInfo>,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub stickers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<ResourceKind>,
    #[serde(default)]
    pub liked_by: Vec<i64>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    /// The media list that `resource_type` says is active is the only populated one.
    pub fn media_is_consistent(&self) -> bool {
        match self.resource_type {
            ResourceKind::Image => self.videos.is_empty(),
            ResourceKind::Video => self.images.is_empty(),
        }
    }

    /// Number of entries in the media list selected by `resource_type`
    pub fn active_media_count(&self) -> usize {
        match self.resource_type {
            ResourceKind::Image => self.images.len(),
            ResourceKind::Video => self.videos.len(),
        }
    }
}

/// Payload for creating a resource; the server assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResource {
    pub title: String,
    pub title_en: String,
    pub description: String,
    pub resource_type: ResourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub source: String,
    pub tags: Vec<String>,
    pub poster_image: String,
    pub images: Vec<ImageInfo>,
    pub videos: Vec<VideoInfo>,
    pub links: Links,
    pub tmdb_id: Option<i64>,
    pub stickers: Vec<String>,
    pub media_type: ResourceKind,
    pub liked_by: Vec<i64>,
    pub is_approved: bool,
}

/// Partial update: only `Some` fields are sent and changed server-side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourcePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stickers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<ResourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked_by: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
}

impl ResourcePatch {
    pub fn is_empty(&self) -> bool {
        *self == ResourcePatch::default()
    }
}

impl From<&Resource> for ResourcePatch {
    /// Every mutable field of `resource`, so sending it back is a no-op update.
    fn from(resource: &Resource) -> Self {
        Self {
            title: Some(resource.title.clone()),
            title_en: Some(resource.title_en.clone()),
            description: Some(resource.description.clone()),
            resource_type: Some(resource.resource_type),
            author: resource.author.clone(),
            source: Some(resource.source.clone()),
            tags: Some(resource.tags.clone()),
            poster_image: Some(resource.poster_image.clone()),
            images: Some(resource.images.clone()),
            videos: Some(resource.videos.clone()),
            links: Some(resource.links.clone()),
            tmdb_id: resource.tmdb_id,
            stickers: Some(resource.stickers.clone()),
            media_type: resource.media_type,
            liked_by: Some(resource.liked_by.clone()),
            is_approved: Some(resource.is_approved),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Title,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
        }
    }
}

impl FromStr for SortField {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            _ => Err(ClientError::validation("sort")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ClientError::validation("order")),
        }
    }
}

/// Options for listing resources. Unset options are left out of the query
/// so the API applies its own defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceFilter {
    pub kind: Option<ResourceKind>,
    /// 1-based
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
}

impl ResourceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: ResourceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some(field);
        self.order = Some(order);
        self
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(kind) = self.kind {
            query.push(("type", kind.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(sort) = self.sort {
            query.push(("sort", sort.as_str().to_string()));
        }
        if let Some(order) = self.order {
            query.push(("order", order.as_str().to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePage {
    pub data: Vec<Resource>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

/// `{ "data": ... }` wrapper used by most endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub data: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Accepts RFC 3339 and the naive `YYYY-MM-DDTHH:MM:SS[.f]` form the backend
/// emits (read as UTC); always writes RFC 3339.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
