//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render view models from `eventboard::view`; pages own fetching
//! and mutation.

pub mod admin_card;
pub mod event_card;
pub mod site_header;
