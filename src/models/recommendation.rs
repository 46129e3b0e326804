use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::Show;

/// Why an assisted pick degraded to a random one
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    MissingCredential,
    PromptTooLarge { bytes: usize, limit: usize },
    Timeout,
    Network { message: String },
    BadStatus { status: u16 },
    MalformedResponse { message: String },
    UnmatchedTitle { title: String },
    RequestInFlight,
}

impl Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::MissingCredential => write!(f, "no API key configured"),
            FallbackReason::PromptTooLarge { bytes, limit } => {
                write!(f, "prompt of {} bytes exceeds the {} byte limit", bytes, limit)
            }
            FallbackReason::Timeout => write!(f, "the AI service timed out"),
            FallbackReason::Network { message } => write!(f, "network error: {}", message),
            FallbackReason::BadStatus { status } => {
                write!(f, "the AI service answered with status {}", status)
            }
            FallbackReason::MalformedResponse { message } => {
                write!(f, "unreadable AI response: {}", message)
            }
            FallbackReason::UnmatchedTitle { title } => {
                write!(f, "suggested title \"{}\" is not a candidate", title)
            }
            FallbackReason::RequestInFlight => {
                write!(f, "another AI request is still in progress")
            }
        }
    }
}

/// How the recommended show was chosen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PickSource {
    Random,
    Assisted {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Fallback { reason: FallbackReason },
}

/// Outcome of one recommend action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// `None` only when there were no candidates
    pub show: Option<Show>,
    pub source: PickSource,
}

impl Recommendation {
    pub fn random(show: Option<Show>) -> Self {
        Self {
            show,
            source: PickSource::Random,
        }
    }

    pub fn fallback(show: Option<Show>, reason: FallbackReason) -> Self {
        Self {
            show,
            source: PickSource::Fallback { reason },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, PickSource::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match &self.source {
            PickSource::Fallback { reason } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_serialization() {
        let rec = Recommendation::fallback(
            None,
            FallbackReason::BadStatus { status: 503 },
        );
        let value = serde_json::to_value(&rec).unwrap();

        assert_eq!(value["source"]["mode"], "fallback");
        assert_eq!(value["source"]["reason"]["kind"], "bad_status");
        assert_eq!(value["source"]["reason"]["status"], 503);
        assert!(value["show"].is_null());
    }

    #[test]
    fn test_fallback_reason_accessor() {
        let rec = Recommendation::random(Some(Show::new("Alien", "movie", "completed")));
        assert!(!rec.is_fallback());
        assert_eq!(rec.fallback_reason(), None);

        let rec = Recommendation::fallback(None, FallbackReason::Timeout);
        assert!(rec.is_fallback());
        assert_eq!(rec.fallback_reason(), Some(&FallbackReason::Timeout));
    }
}
