//! Reactive state shared between a page and its components.

pub mod auth;
