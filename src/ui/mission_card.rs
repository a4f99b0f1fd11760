use crate::model::MissionConfig;
use leptos::prelude::*;

/// A selectable mission summary. Reports the choice through `on_select`.
#[component]
pub fn MissionCard(
    mission: MissionConfig,
    #[prop(into)] on_select: Callback<MissionConfig>,
) -> impl IntoView {
    view! {
        <div
            class="mission-card"
            role="button"
            tabindex="0"
            on:click=move |_| on_select.run(mission)
            on:keydown=move |ev| {
                if ev.key() == "Enter" {
                    on_select.run(mission);
                }
            }
        >
            <div
                class="mission-card__image"
                style=format!("background-image: url({})", mission.image_url)
            ></div>
            <div class="mission-card__shade"></div>
            <div
                class="mission-card__glow"
                style=format!("background: {}", mission.gradient)
            ></div>

            <div class="mission-card__body">
                <div class="mission-card__top">
                    <div class="mission-card__icon" style=format!("color: {}", mission.color)>
                        {mission.icon}
                    </div>
                    <div class="mission-card__play">"▶"</div>
                </div>

                <div>
                    <h3 class="mission-card__title">{mission.title}</h3>
                    <p class="mission-card__description">{mission.description}</p>
                    <span class="mission-card__cta">
                        "Start mission" <span class="mission-card__arrow">"→"</span>
                    </span>
                </div>
            </div>
        </div>
    }
}
