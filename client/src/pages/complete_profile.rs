//! Profile completion: name and university for a fresh account.

#[cfg(test)]
#[path = "complete_profile_test.rs"]
mod complete_profile_test;

use leptos::prelude::*;
use uuid::Uuid;

use eventboard::account::ProfileForm;
use eventboard::models::Profile;

/// Prefill from an existing, possibly partial, profile row.
#[must_use]
pub fn prefill(profile: Option<&Profile>) -> ProfileForm {
    ProfileForm {
        full_name: profile.and_then(|p| p.full_name.clone()).unwrap_or_default(),
        university: profile.and_then(|p| p.university.clone()).unwrap_or_default(),
    }
}

#[component]
pub fn CompleteProfilePage() -> impl IntoView {
    let form = RwSignal::new(ProfileForm::default());
    let user = RwSignal::new(None::<Uuid>);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        use eventboard::session::Requirement;

        let Some((_, session)) = crate::util::guard::enter(Requirement::Authenticated).await else {
            return;
        };
        form.set(prefill(session.profile.as_ref()));
        user.set(session.user.map(|u| u.id));
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let Some(user_id) = user.get() else {
            return;
        };
        let values = form.get();
        busy.set(true);
        info.set("Saving...".to_owned());

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = match crate::net::backend::handle() {
                Ok(handle) => eventboard::account::complete_profile(&*handle.backend, user_id, &values).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(page) => crate::util::browser::navigate(page),
                Err(e) => {
                    info.set(format!("Could not save profile: {e}"));
                    busy.set(false);
                }
            }
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = (user_id, values);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Complete your profile"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Full name"
                        prop:value=move || form.get().full_name
                        on:input=move |ev| form.update(|f| f.full_name = event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="text"
                        placeholder="University"
                        prop:value=move || form.get().university
                        on:input=move |ev| form.update(|f| f.university = event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Save"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
