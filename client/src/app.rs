//! Page selection and mounting.
//!
//! SYSTEM CONTEXT
//! ==============
//! The hosting HTML names its page (`mount_page("admin")`); this module maps
//! the name to a root component and mounts it on `<body>`.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageName {
    Index,
    Home,
    EventDetail,
    Login,
    Signup,
    CompleteProfile,
    Dashboard,
    Submit,
    Admin,
}

impl FromStr for PageName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "index" | "" => Ok(Self::Index),
            "home" => Ok(Self::Home),
            "event-detail" | "detail" => Ok(Self::EventDetail),
            "login" => Ok(Self::Login),
            "signup" => Ok(Self::Signup),
            "complete-profile" | "profile" => Ok(Self::CompleteProfile),
            "dashboard" => Ok(Self::Dashboard),
            "submit-event" | "submit" => Ok(Self::Submit),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown page: {other}")),
        }
    }
}

/// Mount the page called `name` on `<body>`. Unknown names mount the index.
#[cfg(feature = "csr")]
pub fn mount(name: &str) {
    use leptos::prelude::*;

    use crate::pages::{
        admin::AdminPage, complete_profile::CompleteProfilePage, dashboard::DashboardPage,
        event_detail::EventDetailPage, listing::ListingPage, login::LoginPage, signup::SignupPage,
        submit::SubmitPage,
    };

    let page = name.parse::<PageName>().unwrap_or_else(|e| {
        log::warn!("{e}; mounting index");
        PageName::Index
    });
    log::debug!("mounting {page:?}");

    leptos::mount::mount_to_body(move || {
        leptos_meta::provide_meta_context();
        match page {
            PageName::Index => view! { <ListingPage signed_in_home=false/> }.into_any(),
            PageName::Home => view! { <ListingPage signed_in_home=true/> }.into_any(),
            PageName::EventDetail => view! { <EventDetailPage/> }.into_any(),
            PageName::Login => view! { <LoginPage/> }.into_any(),
            PageName::Signup => view! { <SignupPage/> }.into_any(),
            PageName::CompleteProfile => view! { <CompleteProfilePage/> }.into_any(),
            PageName::Dashboard => view! { <DashboardPage/> }.into_any(),
            PageName::Submit => view! { <SubmitPage/> }.into_any(),
            PageName::Admin => view! { <AdminPage/> }.into_any(),
        }
    });
}
