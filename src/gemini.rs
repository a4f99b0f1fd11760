use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use ureq::Agent;
use url::Url;

use crate::config::TutorConfig;
use crate::model::{Difficulty, MathProblem, MissionId};

/// Minimal blocking wrapper of the Gemini `generateContent` endpoint.
/// Call it from `spawn_blocking` when inside async code.
#[derive(Clone)]
pub struct GeminiClient {
    agent: Agent,
    config: TutorConfig,
}

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned status {code}: {body}")]
    Status { code: u16, body: String },
    #[error("service returned no text")]
    EmptyResponse,
    #[error("problem is not valid JSON: {0}")]
    MalformedProblem(#[from] serde_json::Error),
    #[error("problem rejected: {0}")]
    InvalidProblem(&'static str),
    #[error("base url `{0}` cannot take a path")]
    Url(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl Content {
    fn system(text: String) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: Some(text) }],
        }
    }

    fn user(text: String) -> Self {
        Self {
            role: Some("user"),
            parts: vec![Part { text: Some(text) }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

fn problem_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "question": { "type": "STRING" },
            "sequenceData": { "type": "STRING" },
            "correctAnswer": { "type": "NUMBER" },
            "explanationSteps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "variableUnit": { "type": "STRING" }
        },
        "required": ["question", "correctAnswer", "explanationSteps"]
    })
}

fn problem_request(language: &str, mission: MissionId, difficulty: Difficulty) -> GenerateRequest {
    let system = format!(
        "You write math practice problems for a tutoring app. Write every text field in \
         {language}. Reply with one JSON object that follows the response schema. \
         correctAnswer must be a single number, rounded to two decimal places when it is \
         not exact. Leave sequenceData and variableUnit empty when they do not apply."
    );
    let prompt = format!(
        "Create one {} problem about {}. Make it {}. Give explanationSteps as short ordered \
         steps that end with the final answer.",
        difficulty.label().to_lowercase(),
        mission.topic_brief(),
        difficulty.generator_brief(),
    );
    GenerateRequest {
        system_instruction: Content::system(system),
        contents: vec![Content::user(prompt)],
        generation_config: GenerationConfig {
            temperature: 0.9,
            response_mime_type: Some("application/json"),
            response_schema: Some(problem_schema()),
        },
    }
}

fn tutor_request(language: &str, message: &str, context: &str) -> GenerateRequest {
    let system = format!(
        "You are a friendly, encouraging math tutor helping a student with a single \
         problem. Answer in {language}, in at most four short sentences of plain text. \
         Guide with hints and questions; give the final answer only when the student asks \
         for it outright."
    );
    GenerateRequest {
        system_instruction: Content::system(system),
        contents: vec![Content::user(format!(
            "Context: {context}\n\nStudent: {message}"
        ))],
        generation_config: GenerationConfig {
            temperature: 0.7,
            response_mime_type: None,
            response_schema: None,
        },
    }
}

fn first_candidate_text(resp: GenerateResponse) -> Result<String, GeminiError> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(GeminiError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Models sometimes wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_problem(text: &str) -> Result<MathProblem, GeminiError> {
    let mut problem: MathProblem = serde_json::from_str(strip_code_fence(text))?;

    problem.question = problem.question.trim().to_string();
    problem.sequence_data = blank_to_none(problem.sequence_data);
    problem.variable_unit = blank_to_none(problem.variable_unit);
    problem.explanation_steps = problem
        .explanation_steps
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if problem.question.is_empty() {
        return Err(GeminiError::InvalidProblem("empty question"));
    }
    if !problem.correct_answer.is_finite() {
        return Err(GeminiError::InvalidProblem("answer is not a finite number"));
    }
    if problem.explanation_steps.is_empty() {
        return Err(GeminiError::InvalidProblem("no explanation steps"));
    }
    Ok(problem)
}

impl GeminiClient {
    pub fn new(config: TutorConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(concat!("math-tutor/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent, config }
    }

    fn endpoint(&self) -> Result<Url, GeminiError> {
        let mut url = self.config.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GeminiError::Url(self.config.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .push("models")
                .push(&format!("{}:generateContent", self.config.model));
        }
        Ok(url)
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String, GeminiError> {
        let url = self.endpoint()?;
        debug!("POST {url}");

        let resp = match self
            .agent
            .post(url.as_str())
            .set("x-goog-api-key", &self.config.api_key)
            .send_json(request)
        {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                return Err(GeminiError::Status { code, body });
            }
            Err(ureq::Error::Transport(e)) => return Err(GeminiError::Transport(e.to_string())),
        };

        let data: GenerateResponse = resp
            .into_json()
            .map_err(|e| GeminiError::Transport(format!("failed to read response body: {e}")))?;
        first_candidate_text(data)
    }

    pub fn generate_problem(
        &self,
        mission: MissionId,
        difficulty: Difficulty,
    ) -> Result<MathProblem, GeminiError> {
        let request = problem_request(&self.config.language, mission, difficulty);
        let text = self.generate(&request)?;
        debug!("Got {} bytes of problem JSON", text.len());
        parse_problem(&text)
    }

    pub fn ask_tutor(&self, message: &str, context: &str) -> Result<String, GeminiError> {
        let request = tutor_request(&self.config.language, message, context);
        self.generate(&request)
    }
}
