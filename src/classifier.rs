//! Jurisdiction classification through a chat-completion service.
//!
//! One outbound call per document, sent with a closed-ended prompt. The
//! reply is matched by substring so verbose model output still lands on a
//! label. Any transport or response-shape failure falls back to the
//! primary jurisdiction instead of blocking the run; segmentation then
//! proceeds on pattern matching alone.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::provision::Jurisdiction;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b:free";

/// Characters of extracted text sent with the prompt.
const SAMPLE_CHARS: usize = 1000;
const MAX_TOKENS: u32 = 50;

/// What the classifier concluded about a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentClass {
    Philippine,
    HongKong,
    /// Not recognized as labor-law text. The pipeline rejects these.
    Generic,
}

impl DocumentClass {
    pub fn jurisdiction(self) -> Option<Jurisdiction> {
        match self {
            DocumentClass::Philippine => Some(Jurisdiction::Philippine),
            DocumentClass::HongKong => Some(Jurisdiction::HongKong),
            DocumentClass::Generic => None,
        }
    }
}

/// Chat-completion client for jurisdiction detection.
#[derive(Debug, Clone)]
pub struct Classifier {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl Classifier {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Classify a document from its extracted text. Never fails: errors are
    /// logged and collapse to [`DocumentClass::Philippine`], the primary
    /// jurisdiction.
    pub async fn classify(&self, text: &str) -> DocumentClass {
        match self.request_label(sample_of(text)).await {
            Ok(reply) => {
                debug!("classifier replied: {reply}");
                label_to_class(&reply)
            }
            Err(e) => {
                warn!("classification unavailable, assuming PH: {e}");
                DocumentClass::Philippine
            }
        }
    }

    async fn request_label(&self, sample: &str) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt_for(sample),
            }],
            max_tokens: MAX_TOKENS,
        };
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("reply carried no choices"))
    }
}

fn prompt_for(sample: &str) -> String {
    format!(
        "Task: Determine the jurisdiction of this legal labor document. \
         Respond with ONLY ONE of these: 'PHILIPPINES', 'HONG_KONG', or 'GENERIC'. \
         Look for: Republic Act numbers (PH), Labor Code of the Philippines (PH), \
         Employment Ordinance (HK), Hong Kong legal references (HK). \
         Text: {sample}"
    )
}

/// Substring membership against each allowed label. A bare "LABOR" verdict
/// reads as Philippine labor content.
fn label_to_class(reply: &str) -> DocumentClass {
    let reply = reply.trim().to_uppercase();
    if reply.contains("HONG_KONG") || reply.contains("HK") {
        DocumentClass::HongKong
    } else if reply.contains("PHILIPPINE") || reply.contains("LABOR") {
        DocumentClass::Philippine
    } else {
        DocumentClass::Generic
    }
}

fn sample_of(text: &str) -> &str {
    match text.char_indices().nth(SAMPLE_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

// ── Tests ──────────────────────────────────────────────────────────
