//! # Solver session
//!
//! State behind one problem-solver screen. The view keeps a `SolverSession`
//! in a single signal and mutates it only through the methods below; the
//! async parts (fetching a problem, asking the tutor) are split into a
//! `begin_*` call before the request and a `finish_*` call with its result.
//!
//! ```text
//! SolverSession
//! ├── problem: Option<MathProblem>   // None while loading or after a failed load
//! ├── loading: bool
//! ├── load_error: Option<String>
//! ├── generation: u64                // bumped by every begin_load
//! ├── answer: String                 // raw answer box text
//! ├── is_correct: Option<bool>       // None = not checked yet
//! ├── show_explanation: bool
//! ├── chat: Vec<ChatTurn>
//! ├── tutor_input: String
//! └── asking_tutor: bool
//! ```

use crate::grading;
use crate::model::{ChatTurn, MathProblem};

/// Shown in the transcript when the tutor could not be reached.
pub const TUTOR_UNAVAILABLE: &str =
    "Sorry, I couldn't reach the tutor just now. Please try asking again in a moment.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolverSession {
    pub problem: Option<MathProblem>,
    pub loading: bool,
    pub load_error: Option<String>,
    pub generation: u64,
    pub answer: String,
    pub is_correct: Option<bool>,
    pub show_explanation: bool,
    pub chat: Vec<ChatTurn>,
    pub tutor_input: String,
    pub asking_tutor: bool,
}

/// A question ready to send to the tutor.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorRequest {
    pub message: String,
    pub context: String,
    /// Load generation the question was asked under.
    pub generation: u64,
}

impl SolverSession {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Clears everything tied to the previous problem and returns the generation
    /// the matching `finish_load` must present.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.load_error = None;
        self.problem = None;
        self.answer.clear();
        self.is_correct = None;
        self.show_explanation = false;
        self.chat.clear();
        self.asking_tutor = false;
        self.generation
    }

    /// Returns false if the result was dropped because a newer load started.
    pub fn finish_load(&mut self, generation: u64, result: Result<MathProblem, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        match result {
            Ok(problem) => self.problem = Some(problem),
            Err(e) => self.load_error = Some(e),
        }
        true
    }

    pub fn can_check(&self) -> bool {
        !self.answer.is_empty() && self.is_correct != Some(true)
    }

    pub fn check(&mut self) {
        let Some(problem) = &self.problem else {
            return;
        };
        if self.is_correct == Some(true) {
            return;
        }
        let Some(correct) = grading::check_answer(&self.answer, problem.correct_answer) else {
            return;
        };
        self.is_correct = Some(correct);
        if correct {
            self.show_explanation = true;
        }
    }

    pub fn reveal_explanation(&mut self) {
        if self.problem.is_some() {
            self.show_explanation = true;
        }
    }

    /// "Give up" is offered only while the solution is hidden and unsolved.
    pub fn can_give_up(&self) -> bool {
        !self.show_explanation && self.is_correct != Some(true)
    }

    pub fn can_ask(&self) -> bool {
        !self.asking_tutor && !self.tutor_input.trim().is_empty()
    }

    pub fn set_quick_prompt(&mut self, text: &str) {
        self.tutor_input = text.to_string();
    }

    pub fn begin_ask(&mut self) -> Option<TutorRequest> {
        if !self.can_ask() {
            return None;
        }
        let problem = self.problem.as_ref()?;
        let context = format!(
            "Problem: {}. Correct Answer: {}. User's input so far: {}",
            problem.question, problem.correct_answer, self.answer
        );
        let message = std::mem::take(&mut self.tutor_input);
        self.chat.push(ChatTurn::user(message.clone()));
        self.asking_tutor = true;
        Some(TutorRequest {
            message,
            context,
            generation: self.generation,
        })
    }

    /// Returns false if the reply was dropped because a new problem was loaded
    /// while the question was in flight.
    pub fn finish_ask(&mut self, generation: u64, reply: Result<String, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        let text = reply.unwrap_or_else(|_| TUTOR_UNAVAILABLE.to_string());
        self.chat.push(ChatTurn::ai(text));
        self.asking_tutor = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChatRole;

    fn problem(answer: f64) -> MathProblem {
        MathProblem {
            question: "What is 7 x 6?".into(),
            sequence_data: None,
            correct_answer: answer,
            explanation_steps: vec!["7 x 6 = 42".into()],
            variable_unit: None,
        }
    }

    fn loaded(answer: f64) -> SolverSession {
        let mut s = SolverSession::new();
        let g = s.begin_load();
        s.finish_load(g, Ok(problem(answer)));
        s
    }

    #[test]
    fn new_session_starts_loading() {
        let s = SolverSession::new();
        assert!(s.loading);
        assert!(s.problem.is_none());
    }

    #[test]
    fn begin_load_resets_previous_problem() {
        let mut s = loaded(42.0);
        s.answer = "41".into();
        s.check();
        s.tutor_input = "hint?".into();
        let req = s.begin_ask().expect("request");
        s.finish_ask(req.generation, Ok("Think about 7 x 5".into()));

        s.begin_load();
        assert!(s.loading);
        assert!(s.problem.is_none());
        assert!(s.answer.is_empty());
        assert_eq!(s.is_correct, None);
        assert!(!s.show_explanation);
        assert!(s.chat.is_empty());
    }

    #[test]
    fn stale_load_is_ignored() {
        let mut s = SolverSession::new();
        let first = s.begin_load();
        let second = s.begin_load();
        assert!(!s.finish_load(first, Ok(problem(1.0))));
        assert!(s.loading);
        assert!(s.finish_load(second, Ok(problem(2.0))));
        assert_eq!(s.problem.as_ref().map(|p| p.correct_answer), Some(2.0));
    }

    #[test]
    fn failed_load_leaves_error_state() {
        let mut s = SolverSession::new();
        let g = s.begin_load();
        s.finish_load(g, Err("service unavailable".into()));
        assert!(!s.loading);
        assert!(s.problem.is_none());
        assert_eq!(s.load_error.as_deref(), Some("service unavailable"));
    }

    #[test]
    fn correct_answer_reveals_explanation_and_locks() {
        let mut s = loaded(42.0);
        s.answer = "42.004".into();
        assert!(s.can_check());
        s.check();
        assert_eq!(s.is_correct, Some(true));
        assert!(s.show_explanation);
        assert!(!s.can_check());
        assert!(!s.can_give_up());

        s.answer = "1".into();
        s.check();
        assert_eq!(s.is_correct, Some(true));
    }

    #[test]
    fn wrong_answer_keeps_explanation_hidden() {
        let mut s = loaded(42.0);
        s.answer = "40".into();
        s.check();
        assert_eq!(s.is_correct, Some(false));
        assert!(!s.show_explanation);
        assert!(s.can_give_up());

        s.reveal_explanation();
        assert!(s.show_explanation);
    }

    #[test]
    fn unparseable_answer_is_a_no_op() {
        let mut s = loaded(42.0);
        s.answer = "forty".into();
        s.check();
        assert_eq!(s.is_correct, None);
    }

    #[test]
    fn check_without_problem_does_nothing() {
        let mut s = SolverSession::new();
        s.answer = "3".into();
        s.check();
        assert_eq!(s.is_correct, None);
    }

    #[test]
    fn ask_builds_context_and_appends_turns() {
        let mut s = loaded(42.0);
        s.answer = "40".into();
        s.set_quick_prompt("Give me a hint");

        let req = s.begin_ask().expect("request");
        assert_eq!(req.message, "Give me a hint");
        assert_eq!(
            req.context,
            "Problem: What is 7 x 6?. Correct Answer: 42. User's input so far: 40"
        );
        assert_eq!(req.generation, s.generation);
        assert!(s.tutor_input.is_empty());
        assert!(s.asking_tutor);
        assert_eq!(s.chat, vec![ChatTurn::user("Give me a hint")]);

        assert!(s.finish_ask(req.generation, Ok("Try counting by sevens.".into())));
        assert!(!s.asking_tutor);
        assert_eq!(s.chat[1].role, ChatRole::Ai);
        assert_eq!(s.chat[1].text, "Try counting by sevens.");
    }

    #[test]
    fn ask_is_refused_when_blank_busy_or_unloaded() {
        let mut s = loaded(1.0);
        s.tutor_input = "   ".into();
        assert_eq!(s.begin_ask(), None);

        s.tutor_input = "why?".into();
        s.begin_ask().expect("first question");
        s.tutor_input = "and now?".into();
        assert_eq!(s.begin_ask(), None);
        assert_eq!(s.chat.len(), 1);

        let mut unloaded = SolverSession::new();
        unloaded.tutor_input = "hello".into();
        assert_eq!(unloaded.begin_ask(), None);
        assert_eq!(unloaded.tutor_input, "hello");
    }

    #[test]
    fn failed_ask_appends_apology() {
        let mut s = loaded(1.0);
        s.tutor_input = "help".into();
        let req = s.begin_ask().expect("request");
        s.finish_ask(req.generation, Err("timeout".into()));
        assert_eq!(s.chat.last().map(|t| t.text.as_str()), Some(TUTOR_UNAVAILABLE));
        assert!(!s.asking_tutor);
    }

    #[test]
    fn reply_for_previous_problem_is_dropped() {
        let mut s = loaded(42.0);
        s.tutor_input = "hint for this one?".into();
        let stale = s.begin_ask().expect("request");

        let g = s.begin_load();
        assert!(!s.finish_ask(stale.generation, Ok("hint about the old problem".into())));
        s.finish_load(g, Ok(problem(7.0)));
        assert!(s.chat.is_empty());

        s.tutor_input = "and for this one?".into();
        let fresh = s.begin_ask().expect("request");
        assert!(!s.finish_ask(stale.generation, Ok("late reply".into())));
        assert!(s.asking_tutor);
        assert_eq!(s.chat, vec![ChatTurn::user("and for this one?")]);

        assert!(s.finish_ask(fresh.generation, Ok("Try 7 x 1.".into())));
        assert_eq!(s.chat.last(), Some(&ChatTurn::ai("Try 7 x 1.")));
    }
}
