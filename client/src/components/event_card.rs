//! Public event card used by the landing and home listings.

use leptos::prelude::*;

use eventboard::view::EventCard;

#[component]
pub fn EventCardView(card: EventCard, #[prop(optional)] featured: bool) -> impl IntoView {
    let EventCard { title, description, category, date, location, university, image, detail_href, .. } = card;
    let alt = title.clone();

    view! {
        <a class="event-card" class:event-card--featured=featured href=detail_href>
            {image.map(|src| view! { <img class="event-card__image" src=src alt=alt/> })}
            <div class="event-card__body">
                <span class="event-card__category">{category}</span>
                <h3 class="event-card__title">{title}</h3>
                <p class="event-card__date">{date}</p>
                {(!location.is_empty()).then(|| view! { <p class="event-card__location">{location}</p> })}
                <p class="event-card__description">{description}</p>
                <p class="event-card__university">{university}</p>
            </div>
        </a>
    }
}
