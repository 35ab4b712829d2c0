//! In-memory backend for tests and offline demos.
//!
//! DESIGN
//! ======
//! Rows are stored as JSON and queried through the same [`Select`] semantics
//! the REST encoding uses. A [`Policy`] switchboard reproduces the failure
//! signatures a real backend shows under row-level policies: writes refused
//! outright, writes accepted but filtered to zero rows, uploads refused.

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::query::{Delete, Select, Update};
use super::{Backend, SignUpMetadata};
use crate::error::BackendError;
use crate::models::{AuthSession, AuthUser, PROFILES_TABLE};

/// Failure switches applied to every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    /// Table reads fail with a server error.
    pub fail_reads: bool,
    /// Inserts, updates and deletes are refused with 403.
    pub reject_writes: bool,
    /// Updates succeed but match no rows.
    pub ignore_updates: bool,
    /// Deletes succeed but remove nothing.
    pub ignore_deletes: bool,
    /// Uploads are refused.
    pub reject_uploads: bool,
}

struct Account {
    password: String,
    user: AuthUser,
}

struct Inner {
    tables: HashMap<String, Vec<Value>>,
    objects: HashMap<String, Vec<u8>>,
    accounts: HashMap<String, Account>,
    session: Option<AuthUser>,
    policy: Policy,
    next_id: i64,
    clock: DateTime<Utc>,
    selects: usize,
}

pub struct MemoryBackend {
    inner: Mutex<Inner>,
    base_url: String,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        let clock = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default();
        Self {
            inner: Mutex::new(Inner {
                tables: HashMap::new(),
                objects: HashMap::new(),
                accounts: HashMap::new(),
                session: None,
                policy: Policy::default(),
                next_id: 1,
                clock,
                selects: 0,
            }),
            base_url: "memory://storage".to_owned(),
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Act as `user` for subsequent calls.
    pub fn sign_in_as(&self, user: AuthUser) {
        self.inner().session = Some(user);
    }

    pub fn set_policy(&self, policy: Policy) {
        self.inner().policy = policy;
    }

    /// Seed a row, filling `id` and `created_at` when absent. Each seeded row
    /// is one second newer than the previous one. Returns the row's id.
    pub fn seed(&self, table: &str, row: Value) -> Value {
        let mut inner = self.inner();
        let row = inner.stamp(row);
        let id = row.get("id").cloned().unwrap_or(Value::Null);
        inner.tables.entry(table.to_owned()).or_default().push(row);
        id
    }

    /// Snapshot of a table's rows in insertion order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.inner().tables.get(table).cloned().unwrap_or_default()
    }

    /// Bytes stored under `bucket/key`, if any.
    #[must_use]
    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.inner().objects.get(&format!("{bucket}/{key}")).cloned()
    }

    /// Number of table reads served so far.
    #[must_use]
    pub fn select_count(&self) -> usize {
        self.inner().selects
    }
}

impl Inner {
    fn stamp(&mut self, row: Value) -> Value {
        let mut object = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if !object.contains_key("id") {
            object.insert("id".to_owned(), Value::from(self.next_id));
            self.next_id += 1;
        }
        if !object.contains_key("created_at") {
            self.clock += TimeDelta::seconds(1);
            object.insert("created_at".to_owned(), Value::from(self.clock.to_rfc3339()));
        }
        Value::Object(object)
    }

    fn check_write(&self) -> Result<(), BackendError> {
        if self.policy.reject_writes {
            return Err(BackendError::Status { status: 403, message: "row-level policy violation".to_owned() });
        }
        Ok(())
    }

    fn embed_rows(&self, query: &Select, row: &Value) -> Value {
        let mut out = project(row, &query.columns);
        for embed in &query.embeds {
            let key = row.get(&embed.foreign_key).filter(|v| !v.is_null());
            let joined = key.and_then(|key| {
                self.tables
                    .get(&embed.table)
                    .and_then(|rows| rows.iter().find(|r| r.get("id") == Some(key)))
                    .map(|r| project(r, &embed.columns.join(",")))
            });
            if let Value::Object(map) = &mut out {
                map.insert(embed.table.clone(), joined.unwrap_or(Value::Null));
            }
        }
        out
    }
}

/// Keep only the listed columns; `*` keeps everything.
fn project(row: &Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row.clone();
    }
    let mut map = Map::new();
    for column in columns.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some(value) = row.get(column) {
            map.insert(column.to_owned(), value.clone());
        }
    }
    Value::Object(map)
}

fn merge(row: &mut Value, values: &Value) {
    if let (Value::Object(target), Value::Object(source)) = (row, values) {
        for (k, v) in source {
            target.insert(k.clone(), v.clone());
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Backend for MemoryBackend {
    async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        Ok(self.inner().session.clone())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let mut inner = self.inner();
        let user = match inner.accounts.get(&email.to_lowercase()) {
            Some(account) if account.password == password => account.user.clone(),
            _ => {
                return Err(BackendError::Status { status: 400, message: "Invalid login credentials".to_owned() });
            }
        };
        inner.session = Some(user.clone());
        Ok(AuthSession { access_token: format!("memory-{}", user.id), user })
    }

    async fn sign_up(&self, email: &str, password: &str, metadata: &SignUpMetadata) -> Result<(), BackendError> {
        let mut inner = self.inner();
        let email = email.to_lowercase();
        if inner.accounts.contains_key(&email) {
            return Err(BackendError::Status { status: 422, message: "User already registered".to_owned() });
        }
        let user = AuthUser { id: Uuid::new_v4(), email: Some(email.clone()) };
        // Mirrors the profile row the backend creates for every new account.
        let profile = serde_json::json!({
            "id": user.id,
            "full_name": metadata.full_name,
            "university": metadata.university,
            "phone_number": null,
            "role": "user",
        });
        inner.tables.entry(PROFILES_TABLE.to_owned()).or_default().push(profile);
        inner.accounts.insert(email, Account { password: password.to_owned(), user });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.inner().session = None;
        Ok(())
    }

    async fn select(&self, query: &Select) -> Result<Vec<Value>, BackendError> {
        let mut inner = self.inner();
        inner.selects += 1;
        if inner.policy.fail_reads {
            return Err(BackendError::Status { status: 500, message: "read failed".to_owned() });
        }
        let mut matched: Vec<&Value> = inner
            .tables
            .get(&query.table)
            .map(|rows| rows.iter().filter(|r| query.matches(r)).collect())
            .unwrap_or_default();
        matched.sort_by(|a, b| query.compare(a, b));
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(matched.into_iter().take(limit).map(|r| inner.embed_rows(query, r)).collect())
    }

    async fn insert(&self, table: &str, rows: Value) -> Result<Vec<Value>, BackendError> {
        let mut inner = self.inner();
        inner.check_write()?;
        let rows = match rows {
            Value::Array(rows) => rows,
            single => vec![single],
        };
        let stored: Vec<Value> = rows.into_iter().map(|r| inner.stamp(r)).collect();
        inner.tables.entry(table.to_owned()).or_default().extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(&self, update: &Update) -> Result<Vec<Value>, BackendError> {
        let mut inner = self.inner();
        inner.check_write()?;
        if inner.policy.ignore_updates {
            return Ok(Vec::new());
        }
        let Some(rows) = inner.tables.get_mut(&update.table) else {
            return Ok(Vec::new());
        };
        let mut changed = Vec::new();
        for row in rows.iter_mut().filter(|r| update.filters.iter().all(|f| f.matches(r))) {
            merge(row, &update.values);
            changed.push(row.clone());
        }
        Ok(changed)
    }

    async fn delete(&self, delete: &Delete) -> Result<Vec<Value>, BackendError> {
        let mut inner = self.inner();
        inner.check_write()?;
        if inner.policy.ignore_deletes {
            return Ok(Vec::new());
        }
        let Some(rows) = inner.tables.get_mut(&delete.table) else {
            return Ok(Vec::new());
        };
        let (removed, kept): (Vec<Value>, Vec<Value>) =
            rows.drain(..).partition(|r| delete.filters.iter().all(|f| f.matches(r)));
        *rows = kept;
        Ok(removed)
    }

    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<String, BackendError> {
        let mut inner = self.inner();
        if inner.policy.reject_uploads {
            return Err(BackendError::Status { status: 403, message: "bucket policy violation".to_owned() });
        }
        let path = format!("{bucket}/{key}");
        if inner.objects.contains_key(&path) {
            return Err(BackendError::Status { status: 409, message: "The resource already exists".to_owned() });
        }
        inner.objects.insert(path, bytes);
        Ok(key.to_owned())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/public/{bucket}/{path}", self.base_url)
    }
}
