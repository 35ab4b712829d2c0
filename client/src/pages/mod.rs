//! Page modules, one per HTML document.
//!
//! ARCHITECTURE
//! ============
//! Each page runs its session guard on mount, owns fetching and mutation, and
//! delegates card rendering to `components`.

pub mod admin;
pub mod complete_profile;
pub mod dashboard;
pub mod event_detail;
pub mod listing;
pub mod login;
pub mod signup;
pub mod submit;
