use std::fmt;
use std::time::Duration;

use crate::config::Config;

/// Fixed instruction sent ahead of every user question.
const SYSTEM_PROMPT: &str = "You are a compassionate and knowledgeable mental health educator assistant for students. Your role is to:

1. Provide accurate, helpful information about stress, anxiety, and mental wellness
2. Offer practical coping strategies and techniques
3. Be empathetic and supportive in your responses
4. Encourage professional help when appropriate
5. Keep responses concise but informative (2-3 paragraphs max)
6. Focus on evidence-based approaches
7. Never provide medical diagnoses or replace professional therapy

Always maintain a warm, supportive tone and remind users that while you can provide information and support, professional help should be sought for serious mental health concerns.";

/// Canned answers keyed by substring, checked in order.
const FALLBACK_RESPONSES: [(&str, &str); 3] = [
    (
        "stress",
        "Stress is your body's natural response to challenges or demands. It can be helpful in small amounts, but chronic stress can affect your physical and mental health. Try deep breathing exercises, regular physical activity, and maintaining a consistent sleep schedule to help manage stress levels.",
    ),
    (
        "anxiety",
        "Anxiety is a feeling of worry, nervousness, or unease about something with an uncertain outcome. It's normal to feel anxious sometimes, but if it interferes with daily life, consider talking to a counselor. Techniques like mindfulness, progressive muscle relaxation, and grounding exercises can help manage anxiety symptoms.",
    ),
    (
        "study",
        "Academic stress is common among students. Break large tasks into smaller, manageable parts, create a study schedule, take regular breaks, and don't forget to maintain social connections. Remember that seeking help from teachers, tutors, or counselors is a sign of strength, not weakness.",
    ),
];

const GENERIC_FALLBACK: &str = "I'm here to help you learn about stress management and mental wellness. While I'm having some technical difficulties right now, I encourage you to explore our resources section or connect with our community chat for support. Remember, it's always okay to reach out to a counselor or trusted adult when you need help.";

/// Keyword-matched canned answer for when the provider is unreachable.
pub fn fallback_response(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    for (key, response) in FALLBACK_RESPONSES {
        if lower.contains(key) {
            return response;
        }
    }
    GENERIC_FALLBACK
}

#[derive(Debug)]
enum GeminiError {
    Request(reqwest::Error),
    MalformedResponse,
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeminiError::Request(e) => write!(f, "request failed: {}", e),
            GeminiError::MalformedResponse => write!(f, "malformed provider response"),
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        GeminiError::Request(e)
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key: config.gemini_api_key.clone(),
            endpoint: config.gemini_api_url.clone(),
        }
    }

    /// Infallible from the caller's view: provider errors degrade to a
    /// canned response.
    pub async fn ask(&self, message: &str) -> String {
        match self.generate(message).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Gemini AI error: {}", e);
                fallback_response(message).to_string()
            }
        }
    }

    async fn generate(&self, message: &str) -> Result<String, GeminiError> {
        let full_prompt = format!("{}\n\nUser question: {}", SYSTEM_PROMPT, message);

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": full_prompt }] }]
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let value: serde_json::Value = resp.json().await?;
        let text = value
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|t| t.as_str())
            .ok_or(GeminiError::MalformedResponse)?;

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_keyword_match() {
        assert!(fallback_response("how do I handle exam STRESS?").starts_with("Stress is"));
        assert!(fallback_response("i have anxiety about tests").starts_with("Anxiety is"));
        assert!(fallback_response("tips to study better").starts_with("Academic stress"));
    }

    #[test]
    fn test_fallback_precedence() {
        // first key in table order wins when several match
        assert!(fallback_response("study stress").starts_with("Stress is"));
    }

    #[test]
    fn test_fallback_generic() {
        assert_eq!(fallback_response("hello there"), GENERIC_FALLBACK);
    }
}
