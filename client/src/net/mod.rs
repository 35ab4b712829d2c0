//! Networking for the browser build.
//!
//! SYSTEM CONTEXT
//! ==============
//! `backend` owns the single REST client shared by every component on a page
//! and persists the session token across page loads.

pub mod backend;
