//! Client surface of the hosted backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend owns authentication, the `events`/`profiles` tables and the
//! poster bucket. Page controllers only see the [`Backend`] trait:
//! `rest` talks to the real service over HTTP, `memory` keeps rows in a map
//! for tests and offline demos.
//!
//! DESIGN
//! ======
//! Futures are `?Send` so the same trait runs under `spawn_local` in the
//! browser and under a current-thread runtime natively. Table calls trade in
//! `serde_json::Value` rows; typed decoding happens in [`decode_rows`] so
//! every implementation reports malformed rows the same way.

pub mod memory;
pub mod query;
pub mod rest;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::BackendError;
use crate::models::{AuthSession, AuthUser};
pub use query::{Delete, Embed, Filter, Select, Update};

/// Extra user metadata stored with a new account.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SignUpMetadata {
    pub full_name: String,
    pub university: String,
}

/// Auth, table and storage operations offered by the hosted backend.
#[async_trait::async_trait(?Send)]
pub trait Backend {
    /// The signed-in user, or `None` when there is no valid session.
    ///
    /// # Errors
    ///
    /// Returns an error only when the auth service could not be reached.
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError>;

    /// Exchange email and password for a session and keep it for later calls.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Status`] when the credentials are refused.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    /// Register a new account carrying profile metadata.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Status`] when the auth service refuses the
    /// registration (duplicate email, weak password).
    async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<(), BackendError>;

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the auth service could not be reached.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Read rows.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a refused query.
    async fn select(&self, query: &Select) -> Result<Vec<Value>, BackendError>;

    /// Insert rows, returning the rows as stored.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a policy rejection.
    async fn insert(&self, table: &str, rows: Value) -> Result<Vec<Value>, BackendError>;

    /// Update matching rows, returning the rows actually changed.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a policy rejection. A policy
    /// that silently filters the update yields `Ok` with no rows.
    async fn update(&self, update: &Update) -> Result<Vec<Value>, BackendError>;

    /// Delete matching rows, returning the rows reported as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a policy rejection.
    async fn delete(&self, delete: &Delete) -> Result<Vec<Value>, BackendError>;

    /// Store a file, returning its object path inside the bucket.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage service refuses the object.
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, BackendError>;

    /// Public URL for an object path.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Decode JSON rows into typed records.
///
/// # Errors
///
/// Returns [`BackendError::Decode`] naming the first row that fails.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, BackendError> {
    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| serde_json::from_value(row).map_err(|e| BackendError::Decode(format!("row {idx}: {e}"))))
        .collect()
}
