//! Local answer checking. The expected value always comes from the generator;
//! this module only decides whether the learner's input is close enough.

/// Answers within this distance of the expected value count as correct.
pub const ANSWER_TOLERANCE: f64 = 0.01;

/// Parses the answer box. `None` for blank, non-numeric or non-finite input.
pub fn parse_answer(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn is_correct(value: f64, expected: f64) -> bool {
    (value - expected).abs() < ANSWER_TOLERANCE
}

/// `None` means the input could not be graded at all.
pub fn check_answer(input: &str, expected: f64) -> Option<bool> {
    parse_answer(input).map(|value| is_correct(value, expected))
}
