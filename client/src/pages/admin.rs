//! Moderation panel: status tabs with counts and per-event actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Admin-only. The page holds an `AdminController` in a signal. Loads enter
//! the loading state synchronously, fetch under a ticket and complete in a
//! second update. A busy flag keeps two actions from interleaving.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use leptos::prelude::*;

use eventboard::listing::Ticket;
use eventboard::models::{EventId, EventStatus};
use eventboard::moderation::{Action, AdminController, StatusCounts};
use eventboard::view::AdminCard;

use crate::components::admin_card::AdminCardView;
use crate::components::site_header::SiteHeader;

/// Tabs in display order; `None` is "all".
pub const TABS: [Option<EventStatus>; 4] =
    [None, Some(EventStatus::Pending), Some(EventStatus::Approved), Some(EventStatus::Rejected)];

/// `"Pending (3)"`; the count is omitted until counts have loaded.
#[must_use]
pub fn tab_label(tab: Option<EventStatus>, counts: Option<StatusCounts>) -> String {
    let name = match tab {
        None => "All",
        Some(EventStatus::Pending) => "Pending",
        Some(EventStatus::Approved) => "Approved",
        Some(EventStatus::Rejected) => "Rejected",
    };
    match counts {
        Some(counts) => format!("{name} ({})", counts.for_tab(tab)),
        None => name.to_owned(),
    }
}

/// Put the panel into its loading state, then fetch the tab (and the counts
/// when `with_counts`) and complete it.
fn start_load(
    admin: RwSignal<AdminController>,
    busy: RwSignal<bool>,
    begin: impl FnOnce(&mut AdminController) -> Ticket,
    with_counts: bool,
) {
    let Some(ticket) = admin.try_update(begin) else {
        return;
    };
    busy.set(true);
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        use eventboard::moderation::{fetch_counts, fetch_tab};

        let (result, counts) = match crate::net::backend::handle() {
            Ok(handle) => {
                let counts = if with_counts { Some(fetch_counts(&*handle.backend).await) } else { None };
                (fetch_tab(&*handle.backend, &ticket).await, counts)
            }
            Err(e) => (Err(e), None),
        };
        admin.update(|a| {
            a.complete(&ticket, result);
            match counts {
                Some(Ok(counts)) => a.record_counts(counts),
                Some(Err(e)) => log::warn!("status counts failed: {e}"),
                None => {}
            }
        });
        busy.set(false);
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = (ticket, with_counts);
        busy.set(false);
    }
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let admin = RwSignal::new(AdminController::new());
    let busy = RwSignal::new(true);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        use eventboard::session::Requirement;

        if crate::util::guard::enter(Requirement::Admin).await.is_none() {
            return;
        }
        start_load(admin, busy, AdminController::begin_refresh, true);
    });

    let select_tab = move |tab: Option<EventStatus>| {
        if busy.get_untracked() || admin.get_untracked().tab() == tab {
            return;
        }
        start_load(admin, busy, move |a| a.begin_tab(tab), false);
    };

    let on_action = Callback::new(move |(id, action): (EventId, Action)| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use eventboard::moderation::Outcome;

            use crate::util::browser::{BrowserPrompt, navigate};

            if let Ok(handle) = crate::net::backend::handle() {
                let controller = admin.get_untracked();
                match controller.perform(&*handle.backend, &BrowserPrompt, id, action).await {
                    Ok(Outcome::Applied) => {
                        start_load(admin, busy, AdminController::begin_refresh, true);
                        return;
                    }
                    Ok(Outcome::Open(page)) => navigate(page),
                    // Failures were already shown through the prompt.
                    Ok(Outcome::Cancelled) | Err(_) => {}
                }
            }
            busy.set(false);
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (id, action);
        }
    });

    let tabs = TABS
        .iter()
        .map(|&tab| {
            view! {
                <button
                    class="admin-tab"
                    class:admin-tab--active=move || admin.get().tab() == tab
                    on:click=move |_| select_tab(tab)
                >
                    {move || tab_label(tab, admin.get().counts())}
                </button>
            }
        })
        .collect_view();

    let cards = move || {
        admin
            .get()
            .events()
            .iter()
            .map(|event| view! { <AdminCardView card=AdminCard::from(event) on_action=on_action/> })
            .collect_view()
    };

    view! {
        <SiteHeader/>
        <main class="admin-page">
            <h1>"Event moderation"</h1>
            <nav class="admin-tabs">{tabs}</nav>
            {move || admin.get().list().message().map(|m| view! { <p class="admin-page__message">{m}</p> })}
            <div class="admin-page__cards" class:admin-page__cards--busy=move || busy.get()>{cards}</div>
        </main>
    }
}
