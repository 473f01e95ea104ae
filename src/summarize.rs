//! Ollama API interaction with exponential backoff retry logic.
//!
//! Talks to a local Ollama instance over its HTTP API: a version probe, a
//! model-availability check with automatic pull, and text generation. The
//! generation path is wrapped in a retry decorator so transient failures
//! (model loading, socket hiccups) don't lose a summarization run.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait for sending text and receiving a response
//! - [`RetryAsk`]: decorator adding exponential backoff with jitter to any
//!   `AskAsync` implementation
//! - [`OllamaClient`]: the concrete HTTP client
//!
//! # Retry Strategy
//!
//! - Maximum 5 retry attempts
//! - Exponential backoff starting at 1 second, capped at 30 seconds
//! - Random jitter (0-250ms) added on top of each delay

use crate::utils::truncate_for_log;
use rand::{rng, Rng};
use serde::Deserialize;
use serde_json::json;
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Trait for async model interaction.
///
/// Implementors send text to a model and receive a response. The
/// abstraction exists so decorators (like retry logic) compose over any
/// backend.
pub trait AskAsync {
    type Response;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Decorator adding exponential backoff retry logic to an [`AskAsync`]
/// implementation.
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    type Response = T::Response;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.ask(text).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        warn!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u128,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP client for a local Ollama instance.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            http: reqwest::Client::builder().build()?,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Probe the Ollama version endpoint to confirm the server is up.
    #[instrument(level = "info", skip(self), fields(base_url = %self.base_url))]
    pub async fn check_connection(&self) -> Result<(), Box<dyn Error>> {
        let url = format!("{}/api/version", self.base_url);
        let response = self
            .http
            .get(&url)
            .timeout(StdDuration::from_secs(5))
            .send()
            .await?
            .error_for_status()?;
        info!(status = %response.status(), "Connected to Ollama");
        Ok(())
    }

    /// Verify the configured model is available, pulling it when missing.
    #[instrument(level = "info", skip(self), fields(model = %self.model))]
    pub async fn ensure_model(&self) -> Result<(), Box<dyn Error>> {
        let url = format!("{}/api/tags", self.base_url);
        let tags: TagsResponse = self
            .http
            .get(&url)
            .timeout(StdDuration::from_secs(10))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let available: Vec<&str> = tags.models.iter().map(|m| m.name.as_str()).collect();
        if available.contains(&self.model.as_str()) {
            info!("Model is available");
            return Ok(());
        }

        warn!(?available, "Model not found; attempting to pull");
        self.pull_model().await
    }

    /// Pull the model; this can take minutes on first use.
    async fn pull_model(&self) -> Result<(), Box<dyn Error>> {
        let url = format!("{}/api/pull", self.base_url);
        self.http
            .post(&url)
            .timeout(StdDuration::from_secs(300))
            .json(&json!({ "name": self.model, "stream": false }))
            .send()
            .await?
            .error_for_status()?;
        info!("Model pulled");
        Ok(())
    }

    /// Run one non-streaming generation and return the response text.
    #[instrument(level = "info", skip_all)]
    pub async fn generate(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let url = format!("{}/api/generate", self.base_url);
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": 0.7, "top_p": 0.9 },
        });

        let t0 = Instant::now();
        let parsed: GenerateResponse = self
            .http
            .post(&url)
            .timeout(StdDuration::from_secs(120))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u128,
            chars = parsed.response.len(),
            "Generation complete"
        );
        debug!(preview = %truncate_for_log(&parsed.response, 300), "Model response");
        Ok(parsed.response)
    }
}

/// Adapter making [`OllamaClient::generate`] usable behind [`AskAsync`].
struct GenerateRequest<'a> {
    client: &'a OllamaClient,
}

impl<'a> AskAsync for GenerateRequest<'a> {
    type Response = String;

    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        self.client.generate(text).await
    }
}

/// Generation with the standard retry policy applied.
pub async fn generate_with_backoff(
    client: &OllamaClient,
    prompt: &str,
) -> Result<String, Box<dyn Error>> {
    let api = RetryAsk::new(GenerateRequest { client }, 5, StdDuration::from_secs(1));
    api.ask(prompt).await
}

/// One summarized digest, carried into the final report.
#[derive(Debug, Clone)]
pub struct DigestSummary {
    /// Digest label, usually the output filename.
    pub label: String,
    pub summary: String,
    /// Character count of the digest that was summarized.
    pub original_size: usize,
}

/// Map a shorthand language code to its display name.
///
/// Unrecognized values pass through unchanged so full names keep working.
pub fn language_display_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "chinese" | "mandarin" | "zh" => "Chinese (中文)".to_string(),
        "japanese" | "ja" | "jp" => "Japanese (日本語)".to_string(),
        "korean" | "ko" | "kr" => "Korean (한국어)".to_string(),
        "spanish" | "es" => "Spanish (Español)".to_string(),
        "french" | "fr" => "French (Français)".to_string(),
        "german" | "de" => "German (Deutsch)".to_string(),
        "italian" | "it" => "Italian (Italiano)".to_string(),
        "portuguese" | "pt" => "Portuguese (Português)".to_string(),
        "russian" | "ru" => "Russian (Русский)".to_string(),
        "arabic" | "ar" => "Arabic (العربية)".to_string(),
        "hindi" | "hi" => "Hindi (हिन्दी)".to_string(),
        "thai" | "th" => "Thai (ไทย)".to_string(),
        "vietnamese" | "vi" => "Vietnamese (Tiếng Việt)".to_string(),
        "indonesian" | "id" => "Indonesian (Bahasa Indonesia)".to_string(),
        "malay" | "ms" => "Malay (Bahasa Melayu)".to_string(),
        _ => code.to_string(),
    }
}

fn digest_summary_prompt(language: Option<&str>) -> String {
    let base = "Please provide a concise summary of this news content. Focus on:\n\
        1. Key headlines and main stories\n\
        2. Important dates and events\n\
        3. Major announcements or decisions\n\
        4. Community impact or significance\n\n\
        Keep the summary factual and well-organized. Aim for 3-5 bullet points per major story.";
    match language {
        None => base.to_string(),
        Some(lang) => format!(
            "{base}\n\nIMPORTANT: Write the entire summary in {lang}, including all headings, \
             bullet points, and explanations."
        ),
    }
}

fn comprehensive_prompt(language: Option<&str>) -> String {
    let base = "You are analyzing news summaries from multiple Australian government and news \
        sources. Please create a comprehensive overview that:\n\n\
        1. Identifies the most important stories across all sources\n\
        2. Groups related stories or themes together\n\
        3. Highlights any major trends or patterns\n\
        4. Provides context about the significance of events\n\
        5. Notes any conflicting information or different perspectives\n\n\
        Structure your response with clear headings and bullet points. Focus on what matters \
        most to Australian citizens and communities.";
    match language {
        None => base.to_string(),
        Some(lang) => format!(
            "{base}\n\nIMPORTANT: Write the entire comprehensive summary in {lang}, including \
             all headings, bullet points, analysis, and conclusions."
        ),
    }
}

/// Summarize one digest.
#[instrument(level = "info", skip(client, content), fields(label = %label, chars = content.len()))]
pub async fn summarize_digest(
    client: &OllamaClient,
    label: &str,
    content: &str,
    language: Option<&str>,
) -> Result<DigestSummary, Box<dyn Error>> {
    let prompt = format!(
        "{}\n\nContent to analyze:\n{}",
        digest_summary_prompt(language),
        content
    );
    let summary = generate_with_backoff(client, &prompt).await?;
    Ok(DigestSummary {
        label: label.to_string(),
        summary,
        original_size: content.chars().count(),
    })
}

/// Build the cross-source overview from the individual summaries.
#[instrument(level = "info", skip_all, fields(sources = summaries.len()))]
pub async fn comprehensive_summary(
    client: &OllamaClient,
    summaries: &[DigestSummary],
    language: Option<&str>,
) -> Result<String, Box<dyn Error>> {
    let combined = summaries
        .iter()
        .map(|s| format!("## {}\n{}", s.label, s.summary))
        .collect::<Vec<_>>()
        .join("\n\n");
    let prompt = format!(
        "{}\n\nContent to analyze:\n{}",
        comprehensive_prompt(language),
        combined
    );
    generate_with_backoff(client, &prompt).await
}
