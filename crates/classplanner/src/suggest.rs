//! Schedule suggestions from a text-generation service.
//!
//! The saved offerings are written into a prompt, sent to an
//! OpenAI-compatible chat-completions endpoint, and the reply is parsed
//! from its one-line-per-day format:
//!
//! ```text
//! Mon CS 0445(10:00-11:15)!MATH 0220(12:00-12:50)!
//! Tue ...
//! ```

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SuggestionConfig;
use crate::error::{Result, ScheduleError};
use crate::types::{Offering, Weekday};

const INSTRUCTIONS: &str = "\
You are helping a university student plan a weekly timetable. Below is every \
course offering the student has saved. Each line is one offering: the course, \
its lecture days and time, and optionally its recitation days and time. Pick at \
most one offering per course so that no two chosen meetings overlap on the same \
day. Reply with exactly five lines, for Mon, Tue, Wed, Thu and Fri in that \
order, and nothing else. Each line is the day label, a space, then every class \
meeting that day as Class(StartTime-EndTime) followed by '!', ordered by start \
time, using 24-hour HH:MM times. Leave the rest of the line empty when a day \
has no classes.

Saved offerings:
";

static DAY_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Mon|Tue|Wed|Thu|Fri)[a-z]*:?\s*(.*)$").unwrap());
static CLASS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^!(),][^!()]*?)\s*\(\s*(\d{1,2}:\d{2})\s*-\s*(\d{1,2}:\d{2})\s*\)").unwrap()
});

/// One class meeting in a suggested day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedClass {
    pub name: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySuggestion {
    pub day: Weekday,
    pub classes: Vec<SuggestedClass>,
}

/// The service's reply, verbatim and parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub raw: String,
    pub days: Vec<DaySuggestion>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Describes one offering on a single prompt line.
pub fn describe_offering(offering: &Offering) -> String {
    let mut line = format!(
        "{} lecture {} {}",
        offering.course_label(),
        offering.lecture.days,
        offering.lecture.span()
    );
    if let Some(recitation) = &offering.recitation {
        line.push_str(&format!(
            ", recitation {} {}",
            recitation.days,
            recitation.span()
        ));
    }
    line
}

/// Full prompt: the fixed instructions then one line per offering.
pub fn build_prompt(offerings: &[Offering]) -> String {
    let mut prompt = INSTRUCTIONS.to_string();
    for offering in offerings {
        prompt.push_str(&describe_offering(offering));
        prompt.push('\n');
    }
    prompt
}

/// Parses the `Day Class(Start-End)!...` reply. Lines without a Mon..Fri
/// label are skipped.
pub fn parse_suggestion(raw: &str) -> Vec<DaySuggestion> {
    raw.lines()
        .filter_map(|line| {
            let caps = DAY_LINE_REGEX.captures(line.trim())?;
            let day: Weekday = caps.get(1)?.as_str().parse().ok()?;
            let rest = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            let classes = CLASS_REGEX
                .captures_iter(rest)
                .map(|c| SuggestedClass {
                    name: c[1].trim().to_string(),
                    start: c[2].to_string(),
                    end: c[3].to_string(),
                })
                .collect();

            Some(DaySuggestion { day, classes })
        })
        .collect()
}

/// Client for the text-generation service.
pub struct SuggestionClient {
    client: Client,
    config: SuggestionConfig,
    api_key: Option<String>,
}

impl SuggestionClient {
    /// Creates a client, reading the API key from the configured environment
    /// variable. A missing key only fails once a suggestion is requested.
    pub fn from_config(config: SuggestionConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            warn!(
                env = %config.api_key_env,
                "No API key for the suggestion service; /suggest will fail"
            );
        }
        Self::new(config, api_key)
    }

    pub fn new(config: SuggestionConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScheduleError::Suggestion {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Asks the service for a timetable built from `offerings`.
    pub async fn suggest(&self, offerings: &[Offering]) -> Result<Suggestion> {
        let api_key = self.api_key.as_deref().ok_or_else(|| ScheduleError::Suggestion {
            message: format!("{} is not set", self.config.api_key_env),
        })?;

        let prompt = build_prompt(offerings);
        debug!(prompt_len = prompt.len(), "Built suggestion prompt");
        info!(
            model = %self.config.model,
            offerings = offerings.len(),
            "Requesting schedule suggestion"
        );

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScheduleError::Suggestion {
                message: format!("HTTP error: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScheduleError::Suggestion {
                message: format!("Service returned {}: {}", status, error_text),
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| ScheduleError::Suggestion {
            message: format!("Unexpected response shape: {}", e),
        })?;

        let raw = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ScheduleError::Suggestion {
                message: "Service returned an empty reply".to_string(),
            })?;

        let days = parse_suggestion(&raw);
        info!(days = days.len(), "Received schedule suggestion");

        Ok(Suggestion { raw, days })
    }
}
