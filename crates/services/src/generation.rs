use std::env;
use std::fmt;

use reqwest::Client;
use reqwest::multipart;
use serde::{Deserialize, Serialize};

use quiz_core::model::{Question, QuizSet};

use crate::error::GenerationError;

/// Requested quiz difficulty, sent to the generation service verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
}

impl GenerationConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("STUDY_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let bearer_token = env::var("STUDY_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Some(Self {
            base_url,
            bearer_token,
        })
    }
}

/// HTTP client for the external content-generation service.
///
/// The service owns PDF parsing and question/notes generation; this client
/// only moves data across the boundary and validates what comes back.
#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    config: Option<GenerationConfig>,
}

impl GenerationClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GenerationConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GenerationConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    fn config(&self) -> Result<&GenerationConfig, GenerationError> {
        self.config.as_ref().ok_or(GenerationError::Disabled)
    }

    fn endpoint(config: &GenerationConfig, path: &str) -> String {
        format!("{}/{path}", config.base_url.trim_end_matches('/'))
    }

    fn authorize(
        config: &GenerationConfig,
        request: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        match &config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Upload a PDF for the generation service to index.
    ///
    /// Returns the path the service stored the document under.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::UnsupportedDocument` for non-PDF file
    /// names, `GenerationError::Disabled` without configuration, and
    /// request/transport failures otherwise. The service reports indexing
    /// failures inside a 200 response; those surface as
    /// `GenerationError::UploadFailed`.
    pub async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, GenerationError> {
        if !file_name.to_ascii_lowercase().ends_with(".pdf") {
            return Err(GenerationError::UnsupportedDocument {
                file_name: file_name.to_owned(),
            });
        }
        let config = self.config()?;

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let request = self
            .client
            .post(Self::endpoint(config, "upload_pdf"))
            .multipart(form);
        let response = Self::authorize(config, request).send().await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let receipt: UploadReceipt = response.json().await?;
        if let Some(error) = receipt.error {
            return Err(GenerationError::UploadFailed(error));
        }
        receipt
            .file_path
            .ok_or(GenerationError::UploadFailed(receipt.message))
    }

    /// Request a multiple-choice quiz over the uploaded document.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Disabled` without configuration, transport
    /// and status failures, and the invalid-data errors of
    /// [`parse_mcq_response`] for unusable payloads.
    pub async fn generate_quiz(&self, difficulty: Difficulty) -> Result<QuizSet, GenerationError> {
        let config = self.config()?;

        let request = self
            .client
            .post(Self::endpoint(config, "generate_mcq"))
            .json(&McqRequest {
                difficulty_level: difficulty,
            });
        let response = Self::authorize(config, request).send().await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let raw = response.text().await?;
        parse_mcq_response(&raw)
    }

    /// Request a study-notes document over the uploaded document.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Disabled` without configuration,
    /// `GenerationError::EmptyResponse` for blank notes, and transport or
    /// status failures otherwise.
    pub async fn generate_notes(&self) -> Result<String, GenerationError> {
        let config = self.config()?;

        let request = self.client.get(Self::endpoint(config, "generate_notes"));
        let response = Self::authorize(config, request).send().await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: NotesEnvelope = response.json().await?;
        let notes = body.notes.trim();
        if notes.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(notes.to_owned())
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct McqRequest {
    difficulty_level: Difficulty,
}

#[derive(Debug, Deserialize)]
struct McqEnvelope {
    mcq: QuizPayload,
}

#[derive(Debug, Deserialize)]
struct QuizPayload {
    questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct NotesEnvelope {
    notes: String,
}

#[derive(Debug, Deserialize)]
struct UploadReceipt {
    message: String,
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse a generation response into a validated quiz.
///
/// Accepts the service's `{"mcq": {"questions": [...]}}` envelope as well
/// as a bare `{"questions": [...]}` payload, and tolerates raw assistant
/// output wrapped in Markdown code fences. Anything else is the
/// invalid-quiz-data failure path: missing `questions`, a non-array value,
/// wrong element shape, or an empty list.
///
/// # Errors
///
/// Returns `GenerationError::EmptyResponse` for blank input,
/// `GenerationError::MalformedPayload` for unparseable JSON, and
/// `GenerationError::InvalidQuiz` when the parsed questions fail
/// validation.
pub fn parse_mcq_response(raw: &str) -> Result<QuizSet, GenerationError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let payload = match serde_json::from_str::<McqEnvelope>(cleaned) {
        Ok(envelope) => envelope.mcq,
        Err(_) => serde_json::from_str::<QuizPayload>(cleaned)?,
    };
    Ok(QuizSet::new(payload.questions)?)
}

/// Strip a Markdown code fence (with optional `json` tag) around a payload.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizDataError;

    const PAYLOAD: &str = r#"{
        "questions": [
            {
                "question": "Capital of France?",
                "options": ["Paris", "Lyon"],
                "answer": "Paris",
                "explanation": "Paris is the capital."
            }
        ]
    }"#;

    #[test]
    fn parses_bare_payload() {
        let quiz = parse_mcq_response(PAYLOAD).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.question(0).unwrap().correct_answer, "Paris");
    }

    #[test]
    fn parses_service_envelope() {
        let raw = format!(r#"{{"mcq": {PAYLOAD}}}"#);
        let quiz = parse_mcq_response(&raw).unwrap();
        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn strips_code_fences_with_json_tag() {
        let raw = format!("```json\n{PAYLOAD}\n```");
        let quiz = parse_mcq_response(&raw).unwrap();
        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn blank_response_is_empty() {
        assert!(matches!(
            parse_mcq_response("   ").unwrap_err(),
            GenerationError::EmptyResponse
        ));
        assert!(matches!(
            parse_mcq_response("```json\n```").unwrap_err(),
            GenerationError::EmptyResponse
        ));
    }

    #[test]
    fn missing_questions_key_is_malformed() {
        assert!(matches!(
            parse_mcq_response(r#"{"items": []}"#).unwrap_err(),
            GenerationError::MalformedPayload(_)
        ));
    }

    #[test]
    fn non_array_questions_are_malformed() {
        assert!(matches!(
            parse_mcq_response(r#"{"questions": "oops"}"#).unwrap_err(),
            GenerationError::MalformedPayload(_)
        ));
    }

    #[test]
    fn empty_question_list_is_invalid_quiz() {
        let err = parse_mcq_response(r#"{"questions": []}"#).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidQuiz(QuizDataError::Empty)
        ));
    }

    #[test]
    fn answer_outside_options_is_invalid_quiz() {
        let raw = r#"{
            "questions": [
                {
                    "question": "Q",
                    "options": ["A", "B"],
                    "answer": "C",
                    "explanation": "?"
                }
            ]
        }"#;
        assert!(matches!(
            parse_mcq_response(raw).unwrap_err(),
            GenerationError::InvalidQuiz(QuizDataError::Question { index: 0, .. })
        ));
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let body = serde_json::to_string(&McqRequest {
            difficulty_level: Difficulty::Hard,
        })
        .unwrap();
        assert_eq!(body, r#"{"difficulty_level":"hard"}"#);
        assert_eq!(Difficulty::Easy.to_string(), "easy");
    }

    #[tokio::test]
    async fn upload_rejects_non_pdf_before_dialing_out() {
        let client = GenerationClient::new(None);
        let err = client
            .upload_document("notes.txt", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnsupportedDocument { .. }));
    }

    #[tokio::test]
    async fn unconfigured_client_is_disabled() {
        let client = GenerationClient::new(None);
        assert!(!client.enabled());
        assert!(matches!(
            client.generate_quiz(Difficulty::Medium).await.unwrap_err(),
            GenerationError::Disabled
        ));
        assert!(matches!(
            client.generate_notes().await.unwrap_err(),
            GenerationError::Disabled
        ));
    }
}
