//! Site header with login state, avatar and account menu.
//!
//! DESIGN
//! ======
//! The header resolves its own state instead of reading the page's guard
//! result, so public pages get it without a guard and every page recomputes
//! it when restored from the back/forward cache.

use leptos::prelude::*;

use eventboard::header::{HeaderState, MenuTarget};
use eventboard::nav::Page;

use crate::state::auth::AuthState;
use crate::util::browser::on_page_restored;

#[component]
pub fn SiteHeader() -> impl IntoView {
    let auth = RwSignal::new(AuthState::default());
    let menu_open = RwSignal::new(false);

    let refresh = move || {
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            let header = match crate::net::backend::handle() {
                Ok(handle) => {
                    let header = eventboard::header::resolve(&*handle.backend).await;
                    crate::net::backend::sync_token(&handle.backend);
                    header
                }
                Err(e) => {
                    log::error!("{e}");
                    HeaderState::LoggedOut
                }
            };
            auth.set(AuthState::resolved(header));
        });
    };
    refresh();
    on_page_restored(refresh);

    let on_logout = Callback::new(move |()| {
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            use eventboard::moderation::Prompt as _;

            let Ok(handle) = crate::net::backend::handle() else {
                return;
            };
            match eventboard::header::logout(&*handle.backend).await {
                Ok(page) => {
                    crate::net::backend::sync_token(&handle.backend);
                    crate::util::browser::navigate(page);
                }
                Err(e) => crate::util::browser::BrowserPrompt.notify(&format!("Logout failed: {e}")),
            }
        });
    });

    let avatar = move || match auth.get().header {
        HeaderState::Complete { display_name, .. } => {
            let src = auth.get().header.avatar_url().unwrap_or_default();
            view! {
                <img
                    class="site-header__avatar"
                    src=src
                    alt=display_name
                    on:click=move |_| menu_open.update(|open| *open = !*open)
                />
            }
            .into_any()
        }
        HeaderState::LoggedOut | HeaderState::IncompleteProfile => ().into_any(),
    };

    let menu = move || {
        auth.get()
            .menu()
            .into_iter()
            .map(|item| match item.target {
                MenuTarget::Page(page) => view! {
                    <a class="site-header__link" href=page.href()>{item.label}</a>
                }
                .into_any(),
                MenuTarget::Logout => view! {
                    <a
                        class="site-header__link site-header__link--logout"
                        href="#"
                        on:click=move |ev: leptos::ev::MouseEvent| {
                            ev.prevent_default();
                            on_logout.run(());
                        }
                    >
                        {item.label}
                    </a>
                }
                .into_any(),
            })
            .collect_view()
    };

    let is_complete = move || matches!(auth.get().header, HeaderState::Complete { .. });

    view! {
        <header class="site-header">
            <a class="site-header__brand" href=Page::Index.href()>"EventBoard"</a>
            <nav class="site-header__nav">
                {avatar}
                <div
                    class="site-header__menu"
                    class:site-header__menu--dropdown=is_complete
                    class:site-header__menu--open=move || !is_complete() || menu_open.get()
                >
                    {menu}
                </div>
            </nav>
        </header>
    }
}
