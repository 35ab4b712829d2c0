//! Owner dashboard: welcome header, per-status tiles and own events.
//!
//! SYSTEM CONTEXT
//! ==============
//! Requires a session. Data comes from `eventboard::owner::Dashboard`; a
//! verified delete reloads the whole dashboard so tiles and list agree.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use uuid::Uuid;

use eventboard::header::avatar_url;
use eventboard::models::{EventId, Profile};
use eventboard::moderation::StatusCounts;
use eventboard::nav::Page;
use eventboard::owner::Dashboard;
use eventboard::view::DashboardItem;

use crate::components::site_header::SiteHeader;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DashState {
    Loading,
    Ready(Dashboard),
    Failed(String),
}

/// Statistic tiles in display order.
#[must_use]
pub fn stat_tiles(stats: &StatusCounts) -> [(&'static str, usize); 4] {
    [
        ("Total Events", stats.total()),
        ("Pending Review", stats.pending),
        ("Published", stats.approved),
        ("Rejected", stats.rejected),
    ]
}

fn reload(state: RwSignal<DashState>, user: RwSignal<Option<(Uuid, Option<Profile>)>>) {
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        let Some((user_id, profile)) = user.get_untracked() else {
            return;
        };
        let Ok(handle) = crate::net::backend::handle() else {
            return;
        };
        match Dashboard::load(&*handle.backend, user_id, profile.as_ref()).await {
            Ok(dashboard) => state.set(DashState::Ready(dashboard)),
            Err(e) => state.set(DashState::Failed(format!("Failed to load your events: {e}"))),
        }
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = (state, user);
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = RwSignal::new(DashState::Loading);
    let user = RwSignal::new(None::<(Uuid, Option<Profile>)>);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        use eventboard::session::Requirement;

        let Some((_, session)) = crate::util::guard::enter(Requirement::Authenticated).await else {
            return;
        };
        let Some(auth_user) = session.user else {
            return;
        };
        user.set(Some((auth_user.id, session.profile)));
        reload(state, user);
    });

    let on_delete = Callback::new(move |id: EventId| {
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use eventboard::moderation::Outcome;

            let (Some((user_id, _)), Ok(handle)) = (user.get_untracked(), crate::net::backend::handle()) else {
                return;
            };
            let outcome =
                eventboard::owner::delete_own(&*handle.backend, &crate::util::browser::BrowserPrompt, user_id, id).await;
            if let Ok(Outcome::Applied) = outcome {
                reload(state, user);
            }
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = id;
        }
    });

    let body = move || match state.get() {
        DashState::Loading => view! { <p class="dashboard-page__message">"Loading dashboard..."</p> }.into_any(),
        DashState::Failed(message) => {
            view! { <p class="dashboard-page__message dashboard-page__message--error">{message}</p> }.into_any()
        }
        DashState::Ready(dashboard) => {
            let header = dashboard.header.clone();
            let tiles = stat_tiles(&dashboard.stats)
                .into_iter()
                .map(|(label, value)| {
                    view! {
                        <div class="stat-tile">
                            <span class="stat-tile__value">{value}</span>
                            <span class="stat-tile__label">{label}</span>
                        </div>
                    }
                })
                .collect_view();
            let items = dashboard
                .events
                .iter()
                .map(|event| {
                    let DashboardItem { id, title, image, badge, submitted, view_href, edit_href } =
                        DashboardItem::from(event);
                    let alt = title.clone();
                    view! {
                        <li class="dashboard-item">
                            <img class="dashboard-item__thumb" src=image alt=alt/>
                            <div class="dashboard-item__body">
                                <h3>{title}</h3>
                                <span class=format!("status {}", badge.class)>{badge.label}</span>
                                <p class="dashboard-item__submitted">{submitted}</p>
                            </div>
                            <div class="dashboard-item__actions">
                                <a class="btn" href=view_href>"View"</a>
                                <a class="btn" href=edit_href>"Edit"</a>
                                <button class="btn btn--danger" on:click=move |_| on_delete.run(id)>"Delete"</button>
                            </div>
                        </li>
                    }
                })
                .collect_view();
            view! {
                <section class="dashboard-header">
                    <img class="dashboard-header__avatar" src=avatar_url(&header.initials) alt=header.initials.clone()/>
                    <div>
                        <h1>{header.welcome}</h1>
                        <p>{header.university}</p>
                    </div>
                    <a class="btn" href=Page::Submit.href()>"Submit Event"</a>
                    {header
                        .show_admin_shortcut
                        .then(|| view! { <a class="btn btn--admin" href=Page::Admin.href()>"Admin Panel"</a> })}
                </section>
                <section class="dashboard-stats">{tiles}</section>
                {dashboard.empty_message().map(|m| view! { <p class="dashboard-page__message">{m}</p> })}
                <ul class="dashboard-items">{items}</ul>
            }
            .into_any()
        }
    };

    view! {
        <SiteHeader/>
        <main class="dashboard-page">{body}</main>
    }
}
