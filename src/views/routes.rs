use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::error::ClientError;
use crate::types::ResourceId;

/// Client-visible pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Resources,
    ResourceDetail(ResourceId),
    Submit,
    Login { redirect: Option<String> },
    Admin,
    AdminEdit(ResourceId),
}

impl Route {
    /// Where an unauthenticated visit to the admin page is sent
    pub fn admin_login() -> Self {
        Route::Login {
            redirect: Some(Route::Admin.to_string()),
        }
    }

    /// The home page has no content of its own and forwards to the listing
    pub fn resolve(self) -> Self {
        match self {
            Route::Home => Route::Resources,
            other => other,
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Admin | Route::AdminEdit(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Resources => write!(f, "/resources"),
            Route::ResourceDetail(id) => write!(f, "/resources/{id}"),
            Route::Submit => write!(f, "/submit"),
            Route::Login { redirect: None } => write!(f, "/login"),
            Route::Login { redirect: Some(target) } => {
                let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
                write!(f, "/login?redirect={encoded}")
            }
            Route::Admin => write!(f, "/admin"),
            Route::AdminEdit(id) => write!(f, "/admin/edit/{id}"),
        }
    }
}

fn parse_id(raw: &str) -> Result<ResourceId, ClientError> {
    match raw.parse::<ResourceId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ClientError::validation("id")),
    }
}

impl FromStr for Route {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, query) = match s.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (s, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["resources"] => Ok(Route::Resources),
            ["resources", id] => Ok(Route::ResourceDetail(parse_id(id)?)),
            ["submit"] => Ok(Route::Submit),
            ["login"] => {
                let redirect = query.and_then(|q| {
                    form_urlencoded::parse(q.as_bytes())
                        .find(|(key, _)| key == "redirect")
                        .map(|(_, value)| value.into_owned())
                        .filter(|value| !value.is_empty())
                });
                Ok(Route::Login { redirect })
            }
            ["admin"] => Ok(Route::Admin),
            ["admin", "edit", id] => Ok(Route::AdminEdit(parse_id(id)?)),
            _ => Err(ClientError::validation(format!("route {s}"))),
        }
    }
}
