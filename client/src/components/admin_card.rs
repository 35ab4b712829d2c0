//! Moderation card with status badge and per-status action buttons.

use leptos::prelude::*;

use eventboard::models::EventId;
use eventboard::moderation::Action;
use eventboard::view::AdminCard;

#[component]
pub fn AdminCardView(card: AdminCard, on_action: Callback<(EventId, Action)>) -> impl IntoView {
    let AdminCard { id, title, description, image, when, location, submitter, category, submitted, badge, actions } =
        card;
    let alt = title.clone();

    let buttons = actions
        .iter()
        .map(|&action| {
            view! {
                <button
                    class=format!("btn admin-card__action admin-card__action--{}", action.label().to_ascii_lowercase())
                    on:click=move |_| on_action.run((id, action))
                >
                    {action.label()}
                </button>
            }
        })
        .collect_view();

    view! {
        <article class="admin-card">
            <img class="admin-card__image" src=image alt=alt/>
            <div class="admin-card__body">
                <header class="admin-card__header">
                    <h3 class="admin-card__title">{title}</h3>
                    <span class=format!("badge {}", badge.class)>{badge.label}</span>
                </header>
                <p class="admin-card__description">{description}</p>
                <ul class="admin-card__meta">
                    <li>{when}</li>
                    <li>{location}</li>
                    <li>{category}</li>
                    <li>{submitter}</li>
                </ul>
                <footer class="admin-card__footer">
                    <span class="admin-card__submitted">{submitted}</span>
                    <div class="admin-card__actions">{buttons}</div>
                </footer>
            </div>
        </article>
    }
}
