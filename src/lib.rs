//! # eventboard
//!
//! Client-side logic for an event submission and moderation app. Users submit
//! events, admins approve, reject or delete them, and a public listing shows
//! approved events.
//!
//! SYSTEM CONTEXT
//! ==============
//! Persistence, authentication and file storage live in a hosted backend
//! reached through the [`backend::Backend`] trait. Everything in this crate is
//! a client of that trait: page controllers (`session`, `listing`,
//! `moderation`, `submission`, `header`, `owner`, `account`) issue requests
//! and hand plain data to the pure view-model mappers in [`view`].
//!
//! The crate compiles for native targets (the `evmod` CLI, tests) and for
//! `wasm32` (the Leptos browser client).

pub mod account;
pub mod backend;
pub mod config;
pub mod error;
pub mod header;
pub mod listing;
pub mod models;
pub mod moderation;
pub mod nav;
pub mod owner;
pub mod session;
pub mod submission;
pub mod view;

pub use error::{Error, ErrorCode};
