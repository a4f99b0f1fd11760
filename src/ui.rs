mod mission_card;
mod problem_solver;

pub use mission_card::MissionCard;
pub use problem_solver::ProblemSolver;

use crate::missions::MISSIONS;
use crate::model::{Difficulty, MathProblem, MissionConfig, MissionId};
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes, A},
    hooks::{use_navigate, use_params_map},
    path,
};

#[cfg(feature = "ssr")]
fn server_error(msg: impl Into<String>) -> ServerFnError {
    use leptos::server_fn::error::NoCustomError;
    ServerFnError::<NoCustomError>::ServerError(msg.into())
}

#[cfg(feature = "ssr")]
fn gemini_client() -> Result<std::sync::Arc<crate::gemini::GeminiClient>, ServerFnError> {
    use_context::<std::sync::Arc<crate::gemini::GeminiClient>>()
        .ok_or_else(|| server_error("Gemini client missing from server context"))
}

#[server(GenerateProblem, "/api")]
pub async fn generate_problem(
    mission: MissionId,
    difficulty: Difficulty,
) -> Result<MathProblem, ServerFnError> {
    let client = gemini_client()?;
    log::info!("Generating {difficulty} problem for mission {mission}");

    tokio::task::spawn_blocking(move || client.generate_problem(mission, difficulty))
        .await
        .map_err(|e| server_error(format!("Problem generation task failed: {e}")))?
        .map_err(|e| {
            log::warn!("Failed to generate {mission} problem: {e}");
            server_error(format!("Failed to generate problem: {e}"))
        })
}

#[server(AskTutor, "/api")]
pub async fn ask_tutor(message: String, context: String) -> Result<String, ServerFnError> {
    let client = gemini_client()?;
    log::debug!("Tutor question ({} chars)", message.len());

    tokio::task::spawn_blocking(move || client.ask_tutor(&message, &context))
        .await
        .map_err(|e| server_error(format!("Tutor task failed: {e}")))?
        .map_err(|e| {
            log::warn!("Tutor request failed: {e}");
            server_error(format!("Tutor unavailable: {e}"))
        })
}

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
                <meta name="color-scheme" content="dark"/>
                <link rel="shortcut icon" type="image/ico" href="/favicon.ico"/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root component: the mission list at `/` and the solver under `/mission/..`.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/math-tutor.css"/>
        <Title text="Math Missions"/>
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("") view=MissionSelect/>
                    <Route path=path!("/mission/:mission/:difficulty") view=SolverPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MissionSelect() -> impl IntoView {
    let (difficulty, set_difficulty) = signal(Difficulty::default());
    let navigate = use_navigate();

    let on_select = Callback::new(move |mission: MissionConfig| {
        let target = format!("/mission/{}/{}", mission.id, difficulty.get_untracked());
        navigate(&target, Default::default());
    });

    view! {
        <section class="mission-select">
            <header class="mission-select__header">
                <h1>"Math Missions"</h1>
                <p>"Choose a mission. Every problem is fresh, and the AI tutor is there when you get stuck."</p>
            </header>

            <div class="difficulty-picker" role="radiogroup">
                {Difficulty::ALL
                    .into_iter()
                    .map(|d| {
                        view! {
                            <button
                                class=move || {
                                    if difficulty.get() == d { "chip chip--active" } else { "chip" }
                                }
                                role="radio"
                                aria-checked=move || (difficulty.get() == d).to_string()
                                on:click=move |_| set_difficulty.set(d)
                            >
                                {d.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <div class="mission-grid">
                {MISSIONS
                    .into_iter()
                    .map(|mission| view! { <MissionCard mission on_select/> })
                    .collect_view()}
            </div>
        </section>
    }
}

/// Parses the route params and mounts a fresh solver for each mission/difficulty pair.
#[component]
fn SolverPage() -> impl IntoView {
    let params = use_params_map();
    let route = Memo::new(move |_| {
        params.with(|p| {
            let mission = p.get("mission")?.parse::<MissionId>().ok()?;
            let difficulty = p.get("difficulty")?.parse::<Difficulty>().ok()?;
            Some((mission, difficulty))
        })
    });

    let navigate = use_navigate();
    let on_back = Callback::new(move |()| navigate("/", Default::default()));

    move || match route.get() {
        Some((mission, difficulty)) => {
            view! { <ProblemSolver mission difficulty on_back/> }.into_any()
        }
        None => view! { <NotFound/> }.into_any(),
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="panel panel--error">
            <h2>"Mission not found"</h2>
            <p>"That mission or difficulty does not exist."</p>
            <A href="/">"Back to missions"</A>
        </div>
    }
}
