//! HTTP client for the hosted backend (Supabase-compatible REST surface).
//!
//! Thin wrapper over `reqwest`: auth under `/auth/v1`, tables under
//! `/rest/v1`, objects under `/storage/v1`. URL building and error-body
//! parsing are pure functions so they can be tested without a server.

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;

use std::sync::Mutex;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use super::query::{Delete, Select, Update};
use super::{Backend, SignUpMetadata};
use crate::config::ClientConfig;
use crate::error::BackendError;
use crate::models::{AuthSession, AuthUser};

const PREFER_REPRESENTATION: &str = "return=representation";

// =============================================================================
// CLIENT
// =============================================================================

pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: Mutex<Option<String>>,
}

impl RestBackend {
    /// Build a client from config. No request is made until first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(std::time::Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(std::time::Duration::from_secs(config.timeouts.connect_secs));
        let http = builder.build().map_err(|e| BackendError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.backend_url.clone(),
            anon_key: config.anon_key.clone(),
            access_token: Mutex::new(None),
        })
    }

    /// Reuse a previously issued access token.
    #[must_use]
    pub fn with_access_token(self, token: Option<String>) -> Self {
        self.set_access_token(token);
        self
    }

    /// The access token currently attached to requests, if any.
    pub fn access_token(&self) -> Option<String> {
        self.access_token.lock().ok().and_then(|guard| guard.clone())
    }

    fn set_access_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.access_token.lock() {
            *guard = token;
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self.access_token().unwrap_or_else(|| self.anon_key.clone());
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }
}

/// Fail non-success responses with the backend's own message.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status { status: status.as_u16(), message: parse_error_message(&body) })
}

/// Read a JSON array body; an empty body counts as no rows.
async fn rows(response: Response) -> Result<Vec<Value>, BackendError> {
    let text = check(response).await?.text().await?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Ok(vec![other]),
    }
}

#[async_trait::async_trait(?Send)]
impl Backend for RestBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        if self.access_token().is_none() {
            return Ok(None);
        }
        let response = self.request(Method::GET, &auth_endpoint(&self.base_url, "user")).send().await?;
        if response.status().as_u16() == 401 {
            tracing::debug!("stored session rejected by auth service");
            self.set_access_token(None);
            return Ok(None);
        }
        let user = check(response).await?.json::<AuthUser>().await?;
        Ok(Some(user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let url = auth_endpoint(&self.base_url, "token?grant_type=password");
        let payload = serde_json::json!({ "email": email, "password": password });
        let response = self.request(Method::POST, &url).json(&payload).send().await?;
        let session = check(response).await?.json::<AuthSession>().await?;
        self.set_access_token(Some(session.access_token.clone()));
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<(), BackendError> {
        let payload = serde_json::json!({ "email": email, "password": password, "data": metadata });
        let response = self
            .request(Method::POST, &auth_endpoint(&self.base_url, "signup"))
            .json(&payload)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.access_token().is_some() {
            let response = self.request(Method::POST, &auth_endpoint(&self.base_url, "logout")).send().await?;
            // An already-expired session is as good as signed out.
            if response.status().as_u16() != 401 {
                check(response).await?;
            }
        }
        self.set_access_token(None);
        Ok(())
    }

    async fn select(&self, query: &Select) -> Result<Vec<Value>, BackendError> {
        let url = rest_endpoint(&self.base_url, &query.table);
        let response = self.request(Method::GET, &url).query(&query.to_query_pairs()).send().await?;
        rows(response).await
    }

    async fn insert(&self, table: &str, rows_in: Value) -> Result<Vec<Value>, BackendError> {
        let url = rest_endpoint(&self.base_url, table);
        let response = self
            .request(Method::POST, &url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(&rows_in)
            .send()
            .await?;
        rows(response).await
    }

    async fn update(&self, update: &Update) -> Result<Vec<Value>, BackendError> {
        let url = rest_endpoint(&self.base_url, &update.table);
        let response = self
            .request(Method::PATCH, &url)
            .header("Prefer", PREFER_REPRESENTATION)
            .query(&update.to_query_pairs())
            .json(&update.values)
            .send()
            .await?;
        rows(response).await
    }

    async fn delete(&self, delete: &Delete) -> Result<Vec<Value>, BackendError> {
        let url = rest_endpoint(&self.base_url, &delete.table);
        let response = self
            .request(Method::DELETE, &url)
            .header("Prefer", PREFER_REPRESENTATION)
            .query(&delete.to_query_pairs())
            .send()
            .await?;
        rows(response).await
    }

    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, BackendError> {
        let url = storage_object_endpoint(&self.base_url, bucket, key);
        let response = self
            .request(Method::POST, &url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        check(response).await?;
        Ok(key.to_owned())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.base_url, bucket, path)
    }
}

// =============================================================================
// URLS AND PARSING
// =============================================================================

fn auth_endpoint(base: &str, path: &str) -> String {
    format!("{base}/auth/v1/{path}")
}

fn rest_endpoint(base: &str, table: &str) -> String {
    format!("{base}/rest/v1/{table}")
}

fn storage_object_endpoint(base: &str, bucket: &str, key: &str) -> String {
    format!("{base}/storage/v1/object/{bucket}/{key}")
}

fn public_object_url(base: &str, bucket: &str, path: &str) -> String {
    format!("{base}/storage/v1/object/public/{bucket}/{path}")
}

/// Pull a human-readable message out of an error body. The auth, table and
/// storage services each use a different field name.
fn parse_error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_owned();
    };
    ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|key| json.get(key).and_then(Value::as_str))
        .map_or_else(|| body.trim().to_owned(), str::to_owned)
}
