//! Remote data gateway.
//!
//! Thin wrapper over the hosted backend: auth endpoints, PostgREST-style
//! table access and the object-storage bucket. It owns the HTTP client and
//! the current session, nothing else — every row lives on the backend.

use crate::config::Config;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// Storage bucket holding avatar and cover images.
pub const AVATAR_BUCKET: &str = "avatars";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Url error {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid header value")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Backend responded {status}: {body}")]
    Backend {
        status: reqwest::StatusCode,
        body: String,
    },
}

// we must manually implement serde::Serialize
impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: AuthUser,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Avatar,
    Cover,
}

impl ImageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Avatar => "avatar",
            ImageKind::Cover => "cover",
        }
    }
}

pub struct Gateway {
    http: reqwest::Client,
    base: Url,
    anon_key: String,
    session: Mutex<Option<Session>>,
}

impl Gateway {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut base = Url::parse(&config.backend_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Gateway {
            http: reqwest::Client::new(),
            base,
            anon_key: config.anon_key.clone(),
            session: Mutex::new(None),
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The identity carried by the current session, if any. Reads local
    /// state only; the backend is the one enforcing row access.
    pub async fn session_user(&self) -> Option<AuthUser> {
        self.session.lock().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn require_user(&self) -> Result<AuthUser, Error> {
        self.session_user().await.ok_or(Error::NotAuthenticated)
    }

    // ---- auth -----------------------------------------------------------

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, Error> {
        let url = self.base.join("auth/v1/token")?;
        let res = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .header(HeaderName::from_static("apikey"), self.anon_value()?)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let res = Self::check(res).await?;
        let session: Session = serde_json::from_str(&res.text().await?)?;
        let user = session.user.clone();
        info!("Signed in as {}", user.id);
        *self.session.lock().await = Some(session);
        Ok(user)
    }

    /// Signs up and seeds the minimal profile row (`id` + `email`) so the
    /// rest of the app always has something to load.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, Error> {
        let url = self.base.join("auth/v1/signup")?;
        let res = self
            .http
            .post(url)
            .header(HeaderName::from_static("apikey"), self.anon_value()?)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let res = Self::check(res).await?;
        let value: serde_json::Value = serde_json::from_str(&res.text().await?)?;
        // With auto-confirm the endpoint answers with a full session, plain
        // sign-up answers with the bare user object.
        let user: AuthUser = match value.get("user") {
            Some(user) => serde_json::from_value(user.clone())?,
            None => serde_json::from_value(value.clone())?,
        };
        if let Some(token) = value.get("access_token").and_then(|t| t.as_str()) {
            *self.session.lock().await = Some(Session {
                access_token: token.to_string(),
                user: user.clone(),
            });
        }
        let seed = serde_json::json!({ "id": user.id, "email": user.email });
        self.insert("profiles", &seed).await?;
        info!("Created account {}", user.id);
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), Error> {
        let token = {
            let mut session = self.session.lock().await;
            session.take().map(|s| s.access_token)
        };
        if let Some(token) = token {
            let url = self.base.join("auth/v1/logout")?;
            let res = self
                .http
                .post(url)
                .header(HeaderName::from_static("apikey"), self.anon_value()?)
                .header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?)
                .send()
                .await?;
            Self::check(res).await?;
        }
        Ok(())
    }

    // ---- tables ---------------------------------------------------------

    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<Option<T>, Error> {
        let url = self.table_url(table)?;
        let filter = format!("eq.{id}");
        let res = self
            .http
            .get(url)
            .headers(self.auth_headers().await?)
            .query(&[("id", filter.as_str()), ("select", "*"), ("limit", "1")])
            .send()
            .await?;
        let res = Self::check(res).await?;
        let rows: Vec<T> = serde_json::from_str(&res.text().await?)?;
        Ok(rows.into_iter().next())
    }

    /// Rows owned by `user_id`, newest first.
    pub async fn select_recent<T: DeserializeOwned>(
        &self,
        table: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<T>, Error> {
        let url = self.table_url(table)?;
        let filter = format!("eq.{user_id}");
        let limit = limit.to_string();
        let res = self
            .http
            .get(url)
            .headers(self.auth_headers().await?)
            .query(&[
                ("user_id", filter.as_str()),
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        let res = Self::check(res).await?;
        Ok(serde_json::from_str(&res.text().await?)?)
    }

    pub async fn exists(&self, table: &str, id: &str) -> Result<bool, Error> {
        let row: Option<serde_json::Value> = self.select_one(table, id).await?;
        Ok(row.is_some())
    }

    pub async fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), Error> {
        let url = self.table_url(table)?;
        debug!("Inserting into {table}");
        let res = self
            .http
            .post(url)
            .headers(self.auth_headers().await?)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    pub async fn update<T: Serialize>(&self, table: &str, id: &str, row: &T) -> Result<(), Error> {
        let url = self.table_url(table)?;
        let filter = format!("eq.{id}");
        debug!("Updating {table} row {id}");
        let res = self
            .http
            .patch(url)
            .headers(self.auth_headers().await?)
            .header("Prefer", "return=minimal")
            .query(&[("id", filter.as_str())])
            .json(row)
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    pub async fn delete(&self, table: &str, id: &str) -> Result<(), Error> {
        let url = self.table_url(table)?;
        let filter = format!("eq.{id}");
        debug!("Deleting {table} row {id}");
        let res = self
            .http
            .delete(url)
            .headers(self.auth_headers().await?)
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    // ---- storage --------------------------------------------------------

    /// Uploads a JPEG under `{userId}/{timestamp}_{kind}.jpg` and returns
    /// the public URL to store on the profile.
    pub async fn upload_image(
        &self,
        user_id: &str,
        kind: ImageKind,
        bytes: Vec<u8>,
    ) -> Result<String, Error> {
        let object = format!(
            "{user_id}/{}_{}.jpg",
            Utc::now().timestamp_millis(),
            kind.as_str()
        );
        let url = self
            .base
            .join(&format!("storage/v1/object/{AVATAR_BUCKET}/{object}"))?;
        let res = self
            .http
            .post(url)
            .headers(self.auth_headers().await?)
            .header(CONTENT_TYPE, "image/jpeg")
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        Self::check(res).await?;
        info!("Uploaded {} image for {user_id}", kind.as_str());
        self.public_image_url(&object)
    }

    pub async fn remove_image(&self, public_url: &str) -> Result<(), Error> {
        let Some(object) = storage_object_path(public_url) else {
            return Ok(());
        };
        let url = self
            .base
            .join(&format!("storage/v1/object/{AVATAR_BUCKET}/{object}"))?;
        let res = self
            .http
            .delete(url)
            .headers(self.auth_headers().await?)
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    pub fn public_image_url(&self, object: &str) -> Result<String, Error> {
        Ok(self
            .base
            .join(&format!("storage/v1/object/public/{AVATAR_BUCKET}/{object}"))?
            .to_string())
    }

    // ---- plumbing -------------------------------------------------------

    fn table_url(&self, table: &str) -> Result<Url, Error> {
        Ok(self.base.join(&format!("rest/v1/{table}"))?)
    }

    fn anon_value(&self) -> Result<HeaderValue, Error> {
        Ok(HeaderValue::from_str(&self.anon_key)?)
    }

    async fn auth_headers(&self) -> Result<HeaderMap, Error> {
        let token = {
            let session = self.session.lock().await;
            session.as_ref().map(|s| s.access_token.clone())
        };
        let bearer = token.unwrap_or_else(|| self.anon_key.clone());
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("apikey"), self.anon_value()?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {bearer}"))?,
        );
        Ok(headers)
    }

    async fn check(res: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(Error::Backend { status, body })
    }
}

/// The object path is the last two URL segments, `userId/file.jpg`.
fn storage_object_path(public_url: &str) -> Option<String> {
    let parts: Vec<&str> = public_url.split('/').collect();
    if parts.len() < 2 {
        return None;
    }
    Some(parts[parts.len() - 2..].join("/"))
}
