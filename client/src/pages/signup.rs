//! Account registration with a live password checklist.
//!
//! After a successful sign-up the page shows a verification notice and moves
//! on to the login page after a short pause.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;

use eventboard::account::{PasswordChecks, PasswordMatch, SignupForm, password_match};
use eventboard::nav::Page;

/// Pause before leaving for the login page.
pub const REDIRECT_DELAY_MS: u32 = 3_000;

pub const SUCCESS_MESSAGE: &str = "Account created. Check your email to verify it, then sign in.";

/// Checklist rows: label and whether the rule is met.
#[must_use]
pub fn checklist(password: &str) -> [(&'static str, bool); 3] {
    let checks = PasswordChecks::of(password);
    [
        ("At least 6 characters", checks.long_enough),
        ("One uppercase letter", checks.has_uppercase),
        ("One number", checks.has_digit),
    ]
}

/// Hint under the confirmation field, if any.
#[must_use]
pub fn match_hint(state: PasswordMatch) -> Option<(&'static str, &'static str)> {
    match state {
        PasswordMatch::Empty => None,
        PasswordMatch::Matches => Some(("Passwords match", "hint hint--ok")),
        PasswordMatch::Mismatch => Some(("Passwords do not match", "hint hint--error")),
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let form = RwSignal::new(SignupForm::default());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let values = form.get();
        if let Err(e) = values.validate() {
            info.set(e.to_string());
            return;
        }
        busy.set(true);
        info.set("Creating account...".to_owned());

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let result = match crate::net::backend::handle() {
                Ok(handle) => eventboard::account::sign_up(&*handle.backend, &values).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(page) => {
                    info.set(SUCCESS_MESSAGE.to_owned());
                    gloo_timers::future::TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    crate::util::browser::navigate(page);
                }
                Err(e) => {
                    info.set(format!("Sign-up failed: {e}"));
                    busy.set(false);
                }
            }
        });
        #[cfg(not(feature = "csr"))]
        {
            let _ = values;
        }
    };

    let rules = move || {
        checklist(&form.get().password)
            .into_iter()
            .map(|(label, met)| view! { <li class="password-rule" class:password-rule--met=met>{label}</li> })
            .collect_view()
    };

    let hint = move || {
        let values = form.get();
        match_hint(password_match(&values.password, &values.confirmation))
            .map(|(text, class)| view! { <p class=class>{text}</p> })
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create an account"</h1>
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
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || form.get().email
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || form.get().password
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    />
                    <ul class="password-rules">{rules}</ul>
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Confirm password"
                        prop:value=move || form.get().confirmation
                        on:input=move |ev| form.update(|f| f.confirmation = event_target_value(&ev))
                    />
                    {hint}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign Up"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "Already registered? "
                    <a href=Page::Login.href()>"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
