//! Event submission form, also used for editing with `?edit=<id>`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Requires a session. In edit mode the owned event is loaded into the form
//! first, and submitting stays locked until it has. A missing or foreign id
//! leaves the form locked with an error. The poster is read from the file
//! input only at submit time.

#[cfg(test)]
#[path = "submit_test.rs"]
mod submit_test;

use leptos::prelude::*;
use uuid::Uuid;

use eventboard::nav::query_param;
use eventboard::submission::{EventForm, FormPhase, Mode};

use crate::components::site_header::SiteHeader;
use crate::util::browser::location_search;

#[must_use]
pub fn heading(mode: &Mode) -> &'static str {
    match mode {
        Mode::Create => "Submit an Event",
        Mode::Edit { .. } => "Edit Event",
    }
}

/// Alert shown after a successful write, before leaving for the dashboard.
#[must_use]
pub fn success_message(mode: &Mode) -> &'static str {
    match mode {
        Mode::Create => "Event submitted. It will appear once an admin approves it.",
        Mode::Edit { .. } => "Changes saved. The event is back in review.",
    }
}

/// True while the form must not be sent: a write is in flight, or an
/// `?edit=` target has not resolved into edit mode.
#[must_use]
pub fn submit_blocked(edit_requested: bool, mode: &Mode, phase: &FormPhase) -> bool {
    phase.is_disabled() || (edit_requested && *mode == Mode::Create)
}

#[component]
pub fn SubmitPage() -> impl IntoView {
    let form = RwSignal::new(EventForm::default());
    let mode = RwSignal::new(Mode::Create);
    let phase = RwSignal::new(FormPhase::Idle);
    let user = RwSignal::new(None::<Uuid>);
    let file_input: NodeRef<leptos::html::Input> = NodeRef::new();
    let edit_requested = query_param(&location_search(), "edit").is_some();

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        use eventboard::Error;
        use eventboard::nav::event_id_param;
        use eventboard::session::Requirement;
        use eventboard::submission::load_for_edit;

        let Some((handle, session)) = crate::util::guard::enter(Requirement::Authenticated).await else {
            return;
        };
        let Some(auth_user) = session.user else {
            return;
        };
        user.set(Some(auth_user.id));
        if !edit_requested {
            return;
        }
        let loaded = match event_id_param(&location_search(), "edit") {
            Some(id) => load_for_edit(&*handle.backend, id, auth_user.id).await,
            None => Err(Error::NotFound),
        };
        match loaded {
            Ok((loaded, edit_mode)) => {
                form.set(loaded);
                mode.set(edit_mode);
            }
            Err(e) => {
                log::warn!("could not load event for editing: {e}");
                phase.set(FormPhase::Failed(format!("Could not load the event to edit: {e}")));
            }
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submit_blocked(edit_requested, &mode.get_untracked(), &phase.get_untracked()) {
            return;
        }
        let Some(user_id) = user.get_untracked() else {
            return;
        };
        phase.set(FormPhase::Submitting);

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use eventboard::moderation::Prompt as _;
            use eventboard::nav::Page;
            use eventboard::submission::submit;

            use crate::util::browser::{BrowserPrompt, navigate, now_ms, read_picked_file};

            let handle = match crate::net::backend::handle() {
                Ok(handle) => handle,
                Err(e) => {
                    phase.set(FormPhase::Failed(e.to_string()));
                    return;
                }
            };
            let mut values = form.get_untracked();
            if let Some(input) = file_input.get_untracked() {
                match read_picked_file(&input).await {
                    Ok(image) => values.image = image,
                    Err(e) => {
                        phase.set(FormPhase::Failed(e));
                        return;
                    }
                }
            }
            let current_mode = mode.get_untracked();
            let result =
                submit(&*handle.backend, &handle.config.bucket, user_id, &values, &current_mode, now_ms()).await;
            phase.set(FormPhase::after(&result));
            if result.is_ok() {
                BrowserPrompt.notify(success_message(&current_mode));
                navigate(Page::Dashboard);
            }
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (user_id, file_input);
        }
    };

    view! {
        <SiteHeader/>
        <main class="submit-page">
            <h1>{move || heading(&mode.get())}</h1>
            <form class="event-form" on:submit=on_submit>
                <label>
                    "Event name"
                    <input
                        type="text"
                        required
                        prop:value=move || form.get().title
                        on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Description"
                    <textarea
                        prop:value=move || form.get().description
                        on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                    ></textarea>
                </label>
                <label>
                    "Date and time"
                    <input
                        type="datetime-local"
                        required
                        prop:value=move || form.get().event_date
                        on:input=move |ev| form.update(|f| f.event_date = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Category"
                    <input
                        type="text"
                        prop:value=move || form.get().category
                        on:input=move |ev| form.update(|f| f.category = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Venue"
                    <input
                        type="text"
                        prop:value=move || form.get().venue
                        on:input=move |ev| form.update(|f| f.venue = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Address"
                    <input
                        type="text"
                        prop:value=move || form.get().address
                        on:input=move |ev| form.update(|f| f.address = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Organizer"
                    <input
                        type="text"
                        prop:value=move || form.get().organizer_name
                        on:input=move |ev| form.update(|f| f.organizer_name = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Organizer contact"
                    <input
                        type="text"
                        prop:value=move || form.get().organizer_contact
                        on:input=move |ev| form.update(|f| f.organizer_contact = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Poster"
                    <input type="file" accept="image/*" node_ref=file_input/>
                </label>
                {move || phase.get().error().map(|e| view! { <p class="event-form__error">{e.to_owned()}</p> })}
                <button
                    class="btn event-form__submit"
                    type="submit"
                    disabled=move || submit_blocked(edit_requested, &mode.get(), &phase.get())
                >
                    {move || phase.get().button_label(&mode.get())}
                </button>
            </form>
        </main>
    }
}
