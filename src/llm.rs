use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for an e-commerce platform. \
You can help users with product information, orders, and general questions. \
If you need more information to provide a helpful answer, ask clarifying questions. \
Be concise and friendly in your responses.";

/// Reply used when no credential was configured at startup.
pub const UNAVAILABLE_REPLY: &str = "I apologize, but the AI service is currently unavailable. \
Please check your API configuration.";

/// Reply used when the completion call itself fails.
pub const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble processing your request \
right now. Please try again later.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("invalid API credential: {0}")]
    InvalidCredential(#[from] reqwest::header::InvalidHeaderValue),

    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("completion API returned no choices")]
    EmptyResponse,
}

/// Completion dependency injected into the chat handler. The `Unavailable`
/// variant stands in for a missing or rejected credential so the rest of the
/// system never has to reason about a nullable client.
#[derive(Clone)]
pub enum CompletionClient {
    Ready(GroqClient),
    Unavailable,
}

impl CompletionClient {
    pub fn from_config(api_key: Option<&str>, model: &str) -> Self {
        match api_key {
            Some(key) if !key.is_empty() => match GroqClient::new(key, model) {
                Ok(client) => CompletionClient::Ready(client),
                Err(err) => {
                    tracing::warn!(error = %err, "completion client initialization failed");
                    CompletionClient::Unavailable
                }
            },
            _ => {
                tracing::warn!("GROQ_API_KEY not set; completion client disabled");
                CompletionClient::Unavailable
            }
        }
    }

    /// Produce the reply text for one user message. This is the sole
    /// error-containment boundary: every failure becomes a fallback string.
    pub async fn reply(&self, user_message: &str, context: &str) -> String {
        match self {
            CompletionClient::Unavailable => UNAVAILABLE_REPLY.to_string(),
            CompletionClient::Ready(client) => {
                let system = build_system_prompt(context);
                match client.chat_completion(&system, user_message).await {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!(error = %err, "completion call failed");
                        FALLBACK_REPLY.to_string()
                    }
                }
            }
        }
    }
}

/// Non-streaming client for the Groq OpenAI-compatible chat endpoint.
#[derive(Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: &str, model: &str) -> Result<Self, CompletionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            model: model.to_string(),
        })
    }

    /// Send a single (system, user) turn and return the assistant text.
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            max_tokens: u32,
            temperature: f32,
        }
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: OutMsg,
        }
        #[derive(Deserialize)]
        struct OutMsg {
            content: String,
        }

        let body = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let resp = self.http.post(GROQ_API_URL).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, message });
        }

        let data: Resp = resp.json().await?;
        data.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}

fn build_system_prompt(context: &str) -> String {
    if context.is_empty() {
        SYSTEM_PROMPT.to_string()
    } else {
        format!("{SYSTEM_PROMPT}\n\nHere's relevant information from our database:\n{context}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_without_context_is_bare() {
        assert_eq!(build_system_prompt(""), SYSTEM_PROMPT);
    }

    #[test]
    fn system_prompt_appends_context_block() {
        let prompt = build_system_prompt("Available products:\n- Laptop: $999.99 (50 in stock)");
        assert!(prompt.starts_with(SYSTEM_PROMPT));
        assert!(prompt.contains("Here's relevant information from our database:"));
        assert!(prompt.contains("Laptop"));
    }

    #[tokio::test]
    async fn unavailable_client_returns_fixed_reply() {
        let client = CompletionClient::Unavailable;
        let reply = client.reply("What is the price of a Laptop?", "").await;
        assert_eq!(reply, UNAVAILABLE_REPLY);
    }

    #[test]
    fn missing_key_yields_unavailable_variant() {
        let client = CompletionClient::from_config(None, "llama3-8b-8192");
        assert!(matches!(client, CompletionClient::Unavailable));

        let client = CompletionClient::from_config(Some(""), "llama3-8b-8192");
        assert!(matches!(client, CompletionClient::Unavailable));
    }

    #[test]
    fn configured_key_yields_ready_variant() {
        let client = CompletionClient::from_config(Some("gsk_test"), "llama3-8b-8192");
        assert!(matches!(client, CompletionClient::Ready(_)));
    }
}
