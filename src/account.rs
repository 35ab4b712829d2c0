//! Sign-up, sign-in and profile completion.
//!
//! SYSTEM CONTEXT
//! ==============
//! New accounts carry `full_name` and `university` as sign-up metadata; the
//! backend creates the matching profile row. A user whose profile has no name
//! is sent to the completion form, which writes the two fields back to their
//! own profile row.

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;

use serde_json::json;
use uuid::Uuid;

use crate::backend::{Backend, SignUpMetadata, Update};
use crate::error::Error;
use crate::models::{AuthSession, PROFILES_TABLE};
use crate::nav::Page;
use crate::session::fetch_profile;

pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// PASSWORD RULES
// =============================================================================

/// Live checklist shown under the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordChecks {
    pub long_enough: bool,
    pub has_uppercase: bool,
    pub has_digit: bool,
}

impl PasswordChecks {
    #[must_use]
    pub fn of(password: &str) -> Self {
        Self {
            long_enough: password.chars().count() >= MIN_PASSWORD_LEN,
            has_uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            has_digit: password.chars().any(|c| c.is_ascii_digit()),
        }
    }

    #[must_use]
    pub fn all_met(&self) -> bool {
        self.long_enough && self.has_uppercase && self.has_digit
    }
}

/// Confirmation field state; nothing is shown until something is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMatch {
    Empty,
    Matches,
    Mismatch,
}

#[must_use]
pub fn password_match(password: &str, confirmation: &str) -> PasswordMatch {
    if confirmation.is_empty() {
        PasswordMatch::Empty
    } else if password == confirmation {
        PasswordMatch::Matches
    } else {
        PasswordMatch::Mismatch
    }
}

// =============================================================================
// SIGN-UP AND SIGN-IN
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub full_name: String,
    pub university: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a missing email, mismatched
    /// confirmation or a password that breaks the rules.
    pub fn validate(&self) -> Result<(), Error> {
        if self.email.trim().is_empty() {
            return Err(Error::Validation("Email is required.".to_owned()));
        }
        if password_match(&self.password, &self.confirmation) != PasswordMatch::Matches {
            return Err(Error::Validation("Passwords do not match.".to_owned()));
        }
        if !PasswordChecks::of(&self.password).all_met() {
            return Err(Error::Validation(
                "Password must be at least 6 characters and contain an uppercase letter and a digit.".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Register an account. On success the user should verify their email and
/// then sign in.
///
/// # Errors
///
/// Returns [`Error::Validation`] before any request, or the auth service's
/// refusal.
pub async fn sign_up<B: Backend + ?Sized>(backend: &B, form: &SignupForm) -> Result<Page, Error> {
    form.validate()?;
    let metadata =
        SignUpMetadata { full_name: form.full_name.trim().to_owned(), university: form.university.trim().to_owned() };
    backend.sign_up(form.email.trim(), &form.password, &metadata).await?;
    tracing::info!("account registered");
    Ok(Page::Login)
}

/// Sign in and pick the landing page: home for complete profiles, the
/// completion form otherwise.
///
/// # Errors
///
/// Returns the auth service's refusal.
pub async fn sign_in<B: Backend + ?Sized>(backend: &B, email: &str, password: &str) -> Result<(AuthSession, Page), Error> {
    let session = backend.sign_in(email.trim(), password).await?;
    let complete = match fetch_profile(backend, session.user.id).await {
        Ok(profile) => profile.is_some_and(|p| p.is_complete()),
        Err(e) => {
            tracing::warn!(user_id = %session.user.id, error = %e, "profile lookup after sign-in failed");
            false
        }
    };
    tracing::info!(user_id = %session.user.id, "signed in");
    Ok((session, if complete { Page::Home } else { Page::CompleteProfile }))
}

// =============================================================================
// PROFILE COMPLETION
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub university: String,
}

/// Write name and university to the caller's profile row.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a blank name, [`Error::NoRowsAffected`]
/// when the update matched no row, or the backend error.
pub async fn complete_profile<B: Backend + ?Sized>(backend: &B, user: Uuid, form: &ProfileForm) -> Result<Page, Error> {
    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        return Err(Error::Validation("Full name is required.".to_owned()));
    }
    let values = json!({ "full_name": full_name, "university": form.university.trim() });
    let update = Update::table(PROFILES_TABLE, values).eq("id", user);
    if backend.update(&update).await?.is_empty() {
        tracing::warn!(user_id = %user, "profile update accepted but no rows changed");
        return Err(Error::NoRowsAffected);
    }
    tracing::info!(user_id = %user, "profile completed");
    Ok(Page::Home)
}
