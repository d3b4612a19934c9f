// src/summarize/openai.rs
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::SummaryProvider;

const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are a crypto and tech news editor who writes punchy, factual social posts. No hashtags, no emojis.";

/// OpenAI provider (Chat Completions API).
pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: crate::http::build_client(30),
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: Option<String>,
}

/// First non-blank completion in a chat response body.
pub fn parse_completion(body: &str) -> Option<String> {
    let resp: Resp = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "openai summary response could not be decoded");
            return None;
        }
    };
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
}

impl SummaryProvider for OpenAiSummarizer {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            if self.api_key.is_empty() {
                return None;
            }

            let req = Req {
                model: &self.model,
                messages: vec![
                    Msg {
                        role: "system",
                        content: SYSTEM_PROMPT,
                    },
                    Msg {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: 0.7,
                max_tokens: 200,
            };

            let resp = match self
                .http
                .post(CHAT_URL)
                .bearer_auth(&self.api_key)
                .json(&req)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!(error = %e, "openai summary request failed");
                    return None;
                }
            };

            if !resp.status().is_success() {
                tracing::error!(status = %resp.status(), "openai summary returned an error status");
                return None;
            }
            let body = match resp.text().await {
                Ok(b) => b,
                Err(e) => {
                    tracing::error!(error = %e, "openai summary response could not be read");
                    return None;
                }
            };
            parse_completion(&body)
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_key_short_circuits() {
        let s = OpenAiSummarizer::new(String::new(), "gpt-4o-mini".into());
        assert!(s.complete("anything").await.is_none());
    }

    #[test]
    fn completion_body_parsing() {
        let ok = r#"{"choices":[{"message":{"role":"assistant","content":"HEADLINE: x"}}]}"#;
        assert_eq!(parse_completion(ok).as_deref(), Some("HEADLINE: x"));

        assert_eq!(parse_completion(r#"{"choices":[{"message":{"content":"  "}}]}"#), None);
        assert_eq!(parse_completion(r#"{"choices":[]}"#), None);
    }

    #[test]
    fn undecodable_body_is_none() {
        assert_eq!(parse_completion("<html>502 Bad Gateway</html>"), None);
    }
}
