use super::{ask_tutor, generate_problem};
use crate::model::{ChatRole, ChatTurn, Difficulty, MissionId, Tone};
use crate::session::SolverSession;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Chips under the tutor input; clicking one fills the input with its text.
const QUICK_PROMPTS: [&str; 3] = [
    "Give me a hint",
    "What formula do I need?",
    "Explain step by step",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Failed,
    Ready,
}

fn badge_class(difficulty: Difficulty) -> &'static str {
    match difficulty.tone() {
        Tone::Green => "badge badge--green",
        Tone::Yellow => "badge badge--yellow",
        Tone::Red => "badge badge--red",
    }
}

fn answer_input_class(is_correct: Option<bool>) -> &'static str {
    match is_correct {
        Some(true) => "answer-input answer-input--correct",
        Some(false) => "answer-input answer-input--wrong",
        None => "answer-input",
    }
}

/// The problem-solving screen: fetches a problem for `mission` at `difficulty`,
/// checks answers locally and hosts the tutor chat.
#[component]
pub fn ProblemSolver(
    mission: MissionId,
    difficulty: Difficulty,
    #[prop(into)] on_back: Callback<()>,
) -> impl IntoView {
    let session = RwSignal::new(SolverSession::new());

    let load_new_problem = move || {
        let Some(generation) = session.try_update(|s| s.begin_load()) else {
            return;
        };
        spawn_local(async move {
            let result = generate_problem(mission, difficulty).await.map_err(|e| {
                error!("Failed to load {mission} problem: {e}");
                e.to_string()
            });
            session.try_update(|s| s.finish_load(generation, result));
        });
    };

    // Effects only run in the browser, so SSR renders the loading state.
    Effect::new(move |_| load_new_problem());

    let phase = Memo::new(move |_| {
        session.with(|s| match (s.loading, &s.problem) {
            (true, _) => Phase::Loading,
            (false, Some(_)) => Phase::Ready,
            (false, None) => Phase::Failed,
        })
    });

    move || match phase.get() {
        Phase::Loading => view! {
            <div class="loading">
                <div class="spinner"></div>
                <p class="loading__text">"AI is generating your problem…"</p>
            </div>
        }
        .into_any(),
        Phase::Failed => view! {
            <div class="panel panel--error">
                <p>"Something went wrong while loading the problem."</p>
                <button class="link-button" on:click=move |_| on_back.run(())>
                    "Back to missions"
                </button>
            </div>
        }
        .into_any(),
        Phase::Ready => view! {
            <div class="solver">
                <div class="solver__top-bar">
                    <button class="back-button" on:click=move |_| on_back.run(())>
                        "← Leave problem"
                    </button>
                    <span class="solver__mission">{crate::missions::mission(mission).title}</span>
                    <span class=badge_class(difficulty)>{difficulty.label()}</span>
                </div>

                <div class="solver__grid">
                    <div class="solver__main">
                        <ProblemPanel session/>
                        <ExplanationPanel session on_next=Callback::new(move |()| load_new_problem())/>
                    </div>
                    <TutorSidebar session/>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
fn ProblemPanel(session: RwSignal<SolverSession>) -> impl IntoView {
    let problem = Memo::new(move |_| session.with(|s| s.problem.clone()));
    let question = move || problem.with(|p| p.as_ref().map(|p| p.question.clone()));
    let sequence = move || problem.with(|p| p.as_ref().and_then(|p| p.sequence_data.clone()));
    let unit = move || problem.with(|p| p.as_ref().and_then(|p| p.variable_unit.clone()));

    let is_correct = move || session.with(|s| s.is_correct);
    let check = move || session.update(|s| s.check());

    view! {
        <div class="panel problem">
            <h2 class="problem__heading">"Question"</h2>
            <p class="problem__question">{question}</p>
            {move || {
                sequence().map(|data| view! { <div class="problem__sequence">{data}</div> })
            }}

            <label class="problem__label" for="answer">"Your answer"</label>
            <div class="problem__answer-row">
                <div class="problem__answer-box">
                    <input
                        id="answer"
                        type="number"
                        placeholder="0"
                        class=move || answer_input_class(is_correct())
                        prop:value=move || session.with(|s| s.answer.clone())
                        prop:disabled=move || is_correct() == Some(true)
                        on:input=move |ev| session.update(|s| s.answer = event_target_value(&ev))
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                check();
                            }
                        }
                    />
                    {move || unit().map(|u| view! { <span class="problem__unit">{u}</span> })}
                </div>
                <button
                    class=move || {
                        if is_correct() == Some(true) {
                            "submit-button submit-button--done"
                        } else {
                            "submit-button"
                        }
                    }
                    prop:disabled=move || !session.with(|s| s.can_check())
                    on:click=move |_| check()
                >
                    {move || if is_correct() == Some(true) { "✓ Correct" } else { "Submit" }}
                </button>
            </div>

            <Show when=move || is_correct() == Some(false)>
                <div class="problem__wrong">
                    "✗ Not quite. Try again, or ask the AI tutor on the right."
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ExplanationPanel(
    session: RwSignal<SolverSession>,
    #[prop(into)] on_next: Callback<()>,
) -> impl IntoView {
    let steps = Memo::new(move |_| {
        session.with(|s| {
            s.problem
                .as_ref()
                .map(|p| p.explanation_steps.clone())
                .unwrap_or_default()
        })
    });

    view! {
        <Show
            when=move || session.with(|s| s.show_explanation)
            fallback=move || {
                view! {
                    <Show when=move || session.with(|s| s.can_give_up())>
                        <div class="give-up">
                            <button
                                class="link-button"
                                on:click=move |_| session.update(|s| s.reveal_explanation())
                            >
                                "Give up and show the solution"
                            </button>
                        </div>
                    </Show>
                }
            }
        >
            <div class="panel explanation">
                <h3 class="explanation__heading">"Worked solution"</h3>
                <ol class="explanation__steps">
                    {move || {
                        steps
                            .get()
                            .into_iter()
                            .enumerate()
                            .map(|(index, step)| {
                                view! {
                                    <li class="explanation__step">
                                        <span class="explanation__index">{index + 1}</span>
                                        <p>{step}</p>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ol>
                <div class="explanation__actions">
                    <button class="next-button" on:click=move |_| on_next.run(())>
                        "Next problem ↻"
                    </button>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn TutorSidebar(session: RwSignal<SolverSession>) -> impl IntoView {
    let chat_end = NodeRef::<leptos::html::Div>::new();

    Effect::new(move |_| {
        session.with(|s| (s.chat.len(), s.asking_tutor));
        if let Some(el) = chat_end.get() {
            el.scroll_into_view();
        }
    });

    let turns = move || session.with(|s| s.chat.iter().cloned().enumerate().collect::<Vec<_>>());

    let ask = move || {
        let Some(request) = session.try_update(|s| s.begin_ask()).flatten() else {
            return;
        };
        spawn_local(async move {
            let generation = request.generation;
            let reply = ask_tutor(request.message, request.context)
                .await
                .map_err(|e| {
                    error!("Tutor request failed: {e}");
                    e.to_string()
                });
            session.try_update(|s| s.finish_ask(generation, reply));
        });
    };

    view! {
        <aside class="tutor">
            <div class="tutor__header">
                <div class="tutor__avatar">"🤖"</div>
                <div>
                    <h3 class="tutor__title">"AI Math Tutor"</h3>
                    <p class="tutor__status">"Online"</p>
                </div>
            </div>

            <div class="tutor__transcript">
                <div class="bubble bubble--ai">
                    "Hi! I'm your AI math tutor. Stuck somewhere or want a hint? Just ask below."
                </div>
                <For
                    each=turns
                    key=|(index, _)| *index
                    children=move |(_, turn)| view! { <ChatBubble turn/> }
                />
                <Show when=move || session.with(|s| s.asking_tutor)>
                    <div class="bubble bubble--ai bubble--typing">
                        <span class="dot"></span>
                        <span class="dot"></span>
                        <span class="dot"></span>
                    </div>
                </Show>
                <div node_ref=chat_end></div>
            </div>

            <div class="tutor__composer">
                <div class="tutor__chips">
                    {QUICK_PROMPTS
                        .into_iter()
                        .map(|prompt| {
                            view! {
                                <button
                                    class="chip"
                                    on:click=move |_| session.update(|s| s.set_quick_prompt(prompt))
                                >
                                    {prompt}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <div class="tutor__input-row">
                    <input
                        type="text"
                        placeholder="Type a message…"
                        class="tutor__input"
                        prop:value=move || session.with(|s| s.tutor_input.clone())
                        on:input=move |ev| {
                            session.update(|s| s.tutor_input = event_target_value(&ev))
                        }
                        on:keydown=move |ev| {
                            if ev.key() == "Enter" {
                                ask();
                            }
                        }
                    />
                    <button
                        class="send-button"
                        prop:disabled=move || !session.with(|s| s.can_ask())
                        on:click=move |_| ask()
                    >
                        "➤"
                    </button>
                </div>
            </div>
        </aside>
    }
}

#[component]
fn ChatBubble(turn: ChatTurn) -> impl IntoView {
    let (row, bubble) = match turn.role {
        ChatRole::User => ("chat-row chat-row--user", "bubble bubble--user"),
        ChatRole::Ai => ("chat-row", "bubble bubble--ai"),
    };
    view! {
        <div class=row>
            <div class=bubble>{turn.text}</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_prompts_fill_tutor_input() {
        assert_eq!(
            QUICK_PROMPTS,
            ["Give me a hint", "What formula do I need?", "Explain step by step"]
        );

        let mut session = SolverSession::new();
        session.set_quick_prompt(QUICK_PROMPTS[1]);
        assert_eq!(session.tutor_input, "What formula do I need?");
    }
}
