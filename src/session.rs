//! Page-load session guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page calls [`guard`] before fetching data. Public pages always pass;
//! authenticated pages need a user; the admin page additionally needs a
//! profile whose role is `admin`. A failed profile fetch counts as "not
//! authorized". There are no retries: a denied guard means navigate away.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use uuid::Uuid;

use crate::backend::{Backend, Select, decode_rows};
use crate::error::Error;
use crate::models::{AuthUser, PROFILE_COLUMNS, PROFILES_TABLE, Profile};
use crate::nav::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Admin,
}

/// What the guard learned about the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: Option<AuthUser>,
    pub profile: Option<Profile>,
}

impl Session {
    /// The signed-in user; pages behind `Authenticated` can rely on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthenticated`] for anonymous sessions.
    pub fn require_user(&self) -> Result<&AuthUser, Error> {
        self.user.as_ref().ok_or(Error::Unauthenticated)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(Profile::is_admin)
    }
}

/// A failed guard: where to send the visitor and what to tell them first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denied {
    pub redirect: Page,
    pub message: Option<&'static str>,
    pub reason: Error,
}

pub const LOGIN_REQUIRED_MESSAGE: &str = "You must be signed in to open this page.";
pub const ADMIN_REQUIRED_MESSAGE: &str = "Access denied. You are not an admin.";

/// Check the visitor against `requirement`.
///
/// # Errors
///
/// Returns [`Denied`] pointing at the login page when a user is required but
/// missing, or at the owner dashboard when admin is required but the role
/// check fails for any reason.
pub async fn guard<B: Backend + ?Sized>(backend: &B, requirement: Requirement) -> Result<Session, Denied> {
    let user = match backend.current_user().await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "session lookup failed; treating visitor as anonymous");
            None
        }
    };

    if requirement == Requirement::Public {
        return Ok(Session { user, profile: None });
    }

    let Some(user) = user else {
        return Err(Denied {
            redirect: Page::Login,
            message: Some(LOGIN_REQUIRED_MESSAGE),
            reason: Error::Unauthenticated,
        });
    };

    if requirement == Requirement::Authenticated {
        let profile = fetch_profile(backend, user.id).await.ok().flatten();
        return Ok(Session { user: Some(user), profile });
    }

    match fetch_profile(backend, user.id).await {
        Ok(Some(profile)) if profile.is_admin() => Ok(Session { user: Some(user), profile: Some(profile) }),
        outcome => {
            if let Err(e) = &outcome {
                tracing::warn!(user_id = %user.id, error = %e, "role lookup failed; denying admin access");
            }
            Err(Denied { redirect: Page::Dashboard, message: Some(ADMIN_REQUIRED_MESSAGE), reason: Error::Forbidden })
        }
    }
}

/// Load a profile row by user id.
///
/// # Errors
///
/// Returns an error when the query fails or the row cannot be decoded.
pub async fn fetch_profile<B: Backend + ?Sized>(backend: &B, user_id: Uuid) -> Result<Option<Profile>, Error> {
    let query = Select::from(PROFILES_TABLE).columns(PROFILE_COLUMNS).eq("id", user_id).limit(1);
    let rows = backend.select(&query).await?;
    Ok(decode_rows::<Profile>(rows)?.into_iter().next())
}
