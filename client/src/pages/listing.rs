//! Landing and signed-in home listing with search, categories and paging.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both `index.html` and `main/home.html` mount this page; the home variant
//! requires a session. Every filter change starts a new fetch ticket on the
//! shared `ListController`, so a slow response for an old filter is dropped.

#[cfg(test)]
#[path = "listing_test.rs"]
mod listing_test;

use leptos::prelude::*;

use eventboard::config::DEFAULT_PAGE_SIZE;
use eventboard::listing::{ListController, ListFilter};
use eventboard::nav::Page;
use eventboard::view::EventCard;

use crate::components::event_card::EventCardView;
use crate::components::site_header::SiteHeader;

/// Category shortcuts offered above the grid. `"all"` clears the filter.
pub const CATEGORIES: [&str; 6] = ["all", "Technology", "Music", "Sports", "Arts", "Education"];

/// Where the "Join the community" button leads.
#[must_use]
pub fn community_target(signed_in: bool) -> Page {
    if signed_in { Page::Dashboard } else { Page::Login }
}

/// Label for a category shortcut.
#[must_use]
pub fn category_label(category: &str) -> &str {
    if category.eq_ignore_ascii_case("all") { "All" } else { category }
}

/// `"Showing 12 of 30 events"`, or nothing when the list is empty.
#[must_use]
pub fn counts_line((shown, total): (usize, usize)) -> Option<String> {
    (total > 0).then(|| format!("Showing {shown} of {total} events"))
}

fn start_fetch(list: RwSignal<ListController>, filter: ListFilter) {
    let Some(ticket) = list.try_update(|l| l.begin(filter)) else {
        return;
    };
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        use eventboard::listing::{fetch_events, university_embed};

        let result = match crate::net::backend::handle() {
            Ok(handle) => fetch_events(&*handle.backend, ticket.filter(), Some(university_embed())).await,
            Err(e) => Err(e),
        };
        list.update(|l| {
            l.complete(&ticket, result);
        });
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = ticket;
    }
}

#[component]
pub fn ListingPage(signed_in_home: bool) -> impl IntoView {
    let page_size = crate::net::backend::handle().map_or(DEFAULT_PAGE_SIZE, |h| h.config.page_size);
    let list = RwSignal::new(ListController::new(ListFilter::approved(), page_size));
    let search = RwSignal::new(String::new());
    let signed_in = RwSignal::new(false);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        use eventboard::session::Requirement;

        let requirement = if signed_in_home { Requirement::Authenticated } else { Requirement::Public };
        let Some((_, session)) = crate::util::guard::enter(requirement).await else {
            return;
        };
        signed_in.set(session.user.is_some());
        start_fetch(list, ListFilter::approved());
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = signed_in_home;
    }

    let run_search = move || {
        let filter = list.get_untracked().filter().clone().with_search(&search.get_untracked());
        start_fetch(list, filter);
    };

    let select_category = move |category: &'static str| {
        let filter = list.get_untracked().filter().clone().with_category(category);
        start_fetch(list, filter);
    };

    let category_links = CATEGORIES
        .iter()
        .map(|&category| {
            let active = move || {
                let current = list.get().filter().category.clone();
                match current {
                    Some(c) => c == category,
                    None => category == "all",
                }
            };
            view! {
                <button
                    class="category-link"
                    class:category-link--active=active
                    on:click=move |_| select_category(category)
                >
                    {category_label(category)}
                </button>
            }
        })
        .collect_view();

    let featured = move || {
        list.get()
            .featured()
            .iter()
            .map(|event| view! { <EventCardView card=EventCard::from(event) featured=true/> })
            .collect_view()
    };

    let grid = move || {
        list.get()
            .visible()
            .iter()
            .map(|event| view! { <EventCardView card=EventCard::from(event)/> })
            .collect_view()
    };

    view! {
        <SiteHeader/>
        <main class="listing-page">
            <section class="hero">
                <h1>"Discover campus events"</h1>
                <a class="btn hero__primary" href="#all-events">"Browse events"</a>
                <button
                    class="btn hero__secondary"
                    on:click=move |_| crate::util::browser::navigate(community_target(signed_in.get_untracked()))
                >
                    "Join the community"
                </button>
            </section>

            <div class="listing-page__search">
                <input
                    class="search-input"
                    type="search"
                    placeholder="Search events..."
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            run_search();
                        }
                    }
                />
                <button class="btn search-button" on:click=move |_| run_search()>"Search"</button>
            </div>

            <nav class="category-links">{category_links}</nav>

            <Show when=move || !list.get().featured().is_empty()>
                <section class="featured-events">
                    <h2>"Featured"</h2>
                    <div class="featured-events__grid">{featured}</div>
                </section>
            </Show>

            <section id="all-events" class="all-events">
                <h2>"All events"</h2>
                {move || list.get().message().map(|m| view! { <p class="listing-page__message">{m}</p> })}
                <div class="all-events__grid">{grid}</div>
                {move || counts_line(list.get().counts()).map(|line| view! { <p class="listing-page__counts">{line}</p> })}
                <Show when=move || list.get().has_more()>
                    <button
                        class="btn load-more-button"
                        on:click=move |_| {
                            list.update(|l| {
                                l.load_more();
                            });
                        }
                    >
                        "Load more"
                    </button>
                </Show>
            </section>
        </main>
    }
}
