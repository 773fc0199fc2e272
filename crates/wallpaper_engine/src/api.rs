//! Provider API client: password-grant authentication and listing requests.

use std::fmt;

use engine_logging::{engine_debug, engine_info};
use serde::Deserialize;
use wallpaper_core::{parse_listing, FetchMode, ListingPage, DEFAULT_PAGE_LIMIT};

use crate::fetch::map_reqwest_error;
use crate::{FailureKind, FetchError, FetchSettings};

/// Product token that leads every `User-Agent` header.
pub const PRODUCT_TOKEN: &str = "wallpaper_server/0.1";

/// `User-Agent` in the form the provider requires: `<product>/<version> by /u/<owner>`.
pub fn user_agent_for(owner: &str) -> String {
    format!("{PRODUCT_TOKEN} by /u/{owner}")
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub auth_base: String,
    pub oauth_base: String,
    /// Sent on every request; the provider answers 403 without it.
    pub user_agent: String,
    pub page_limit: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            auth_base: "https://www.reddit.com/api/v1".to_string(),
            oauth_base: "https://oauth.reddit.com".to_string(),
            user_agent: user_agent_for("wallpaper_server"),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Bearer token, held in memory for one run only.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("auth request failed: {0}")]
    Request(#[from] FetchError),
    #[error("auth endpoint returned http status {0}")]
    Status(u16),
    #[error("auth endpoint rejected the credentials: {0}")]
    Rejected(String),
    #[error("auth response could not be parsed: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<serde_json::Value>,
}

#[async_trait::async_trait]
pub trait ListingApi: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken, AuthError>;

    /// Fetch one page of a collection, resuming after `cursor` (empty for the head).
    async fn fetch_page(
        &self,
        token: &AccessToken,
        collection: &str,
        mode: &FetchMode,
        cursor: &str,
    ) -> Result<ListingPage, FetchError>;

    fn page_limit(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct RedditClient {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl RedditClient {
    pub fn new(settings: ApiSettings, transport: &FetchSettings) -> Result<Self, FetchError> {
        let transport = FetchSettings {
            user_agent: Some(settings.user_agent.clone()),
            ..transport.clone()
        };
        let client = transport.build_client()?;
        Ok(Self { settings, client })
    }

    fn listing_url(&self, collection: &str, mode: &FetchMode) -> Result<reqwest::Url, FetchError> {
        let base = self.settings.oauth_base.trim_end_matches('/');
        let raw = match mode {
            FetchMode::Browse => format!("{base}/r/{collection}.json"),
            FetchMode::Search { .. } => format!("{base}/r/{collection}/search.json"),
        };
        reqwest::Url::parse(&raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn listing_query(&self, mode: &FetchMode, cursor: &str) -> Vec<(&'static str, String)> {
        let limit = self.settings.page_limit.to_string();
        match mode {
            FetchMode::Browse => vec![("limit", limit), ("after", cursor.to_string())],
            FetchMode::Search { query } => vec![
                ("q", query.clone()),
                ("restrict_sr", "on".to_string()),
                ("include_over_18", "on".to_string()),
                ("limit", limit),
                ("sort", "new".to_string()),
                ("t", "all".to_string()),
                ("after", cursor.to_string()),
            ],
        }
    }
}

#[async_trait::async_trait]
impl ListingApi for RedditClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken, AuthError> {
        let url = format!(
            "{}/access_token",
            self.settings.auth_base.trim_end_matches('/')
        );
        let form = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let parsed: TokenResponse = serde_json::from_slice(&body)
            .map_err(|err| AuthError::Malformed(err.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(AuthError::Rejected(error.to_string()));
        }
        let token = parsed
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::Malformed("missing access_token".to_string()))?;

        engine_info!("Authenticated as {}", credentials.username);
        Ok(AccessToken(token))
    }

    async fn fetch_page(
        &self,
        token: &AccessToken,
        collection: &str,
        mode: &FetchMode,
        cursor: &str,
    ) -> Result<ListingPage, FetchError> {
        let url = self.listing_url(collection, mode)?;
        engine_debug!("Fetching {} after {:?}", url, cursor);

        let response = self
            .client
            .get(url)
            .bearer_auth(token.secret())
            .query(&self.listing_query(mode, cursor))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        parse_listing(&body).map_err(|err| FetchError::new(FailureKind::Parse, err.to_string()))
    }

    fn page_limit(&self) -> usize {
        self.settings.page_limit
    }
}
