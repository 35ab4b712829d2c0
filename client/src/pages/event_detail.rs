//! Single event, addressed by `?id=`. Visitors see approved events; admins
//! and the submitter also see pending or rejected ones.

#[cfg(test)]
#[path = "event_detail_test.rs"]
mod event_detail_test;

use leptos::prelude::*;

use eventboard::Error;
use eventboard::view::EventDetailView;

use crate::components::site_header::SiteHeader;

#[derive(Debug, Clone, PartialEq, Eq)]
enum DetailState {
    Loading,
    Ready(EventDetailView),
    Failed(String),
}

/// Message shown in place of the event when it cannot be loaded.
#[must_use]
pub fn failure_message(error: &Error) -> String {
    match error {
        Error::NotFound => "Event not found.".to_owned(),
        other => format!("Could not load event: {other}"),
    }
}

#[component]
pub fn EventDetailPage() -> impl IntoView {
    let state = RwSignal::new(DetailState::Loading);
    let revealed = RwSignal::new(false);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        use eventboard::listing::fetch_detail;
        use eventboard::nav::event_id_param;
        use eventboard::session::Requirement;

        use crate::util::browser::{location_search, set_document_title};

        let Some((handle, session)) = crate::util::guard::enter(Requirement::Public).await else {
            return;
        };
        let id = event_id_param(&location_search(), "id");
        match fetch_detail(&*handle.backend, &session, id).await {
            Ok(event) => {
                let detail = EventDetailView::from(&event);
                set_document_title(&detail.page_title);
                state.set(DetailState::Ready(detail));
            }
            Err(e) => {
                log::warn!("event detail failed: {e}");
                state.set(DetailState::Failed(failure_message(&e)));
            }
        }
    });

    let body = move || match state.get() {
        DetailState::Loading => view! { <p class="event-detail__message">"Loading event..."</p> }.into_any(),
        DetailState::Failed(message) => {
            view! { <p class="event-detail__message event-detail__message--error">{message}</p> }.into_any()
        }
        DetailState::Ready(detail) => {
            let EventDetailView { title, description, category, date, location, organizer_name, organizer_contact, image, .. } =
                detail;
            let alt = title.clone();
            view! {
                <article class="event-detail">
                    {image.map(|src| view! { <img class="event-detail__image" src=src alt=alt/> })}
                    <div class="event-detail__content">
                        {category.map(|c| view! { <span class="tag">{c}</span> })}
                        <h1 class="event-detail__title">{title}</h1>
                        <p class="event-detail__date">{date}</p>
                        <p class="event-detail__location">{location}</p>
                        <p class="event-detail__description">{description}</p>
                    </div>
                    <aside class="event-detail__sidebar">
                        <p class="event-detail__organizer">{organizer_name}</p>
                        <Show
                            when=move || revealed.get()
                            fallback=move || {
                                view! {
                                    <button class="btn register-button" on:click=move |_| revealed.set(true)>
                                        "Register"
                                    </button>
                                }
                            }
                        >
                            <p class="event-detail__contact">{organizer_contact.clone()}</p>
                        </Show>
                    </aside>
                </article>
            }
            .into_any()
        }
    };

    view! {
        <SiteHeader/>
        <main class="event-detail-page">{body}</main>
    }
}
