use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::Rng;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    models::{FallbackReason, PickSource, Recommendation, Show},
    services::providers::{GenerationError, TextGenerator},
};

/// Characters of each candidate's blurb included in the prompt
const PROMPT_SUMMARY_CHARS: usize = 140;

/// Limits applied to assisted selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistLimits {
    pub max_candidates: usize,
    pub max_prompt_bytes: usize,
}

impl From<&Config> for AssistLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_candidates: config.ai_max_candidates,
            max_prompt_bytes: config.ai_max_prompt_bytes,
        }
    }
}

/// Uniform pick over the candidates; `None` only when there are none
pub fn pick_random<R: Rng + ?Sized>(candidates: &[Show], rng: &mut R) -> Option<Show> {
    candidates.choose(rng).cloned()
}

/// Prompt listing each candidate's title and a short blurb
pub fn build_prompt(candidates: &[Show]) -> String {
    let mut prompt = String::from(
        "You help someone decide what to watch next. Choose exactly one title from the list below.\n\
         Reply with a single JSON object and nothing else, in the form \
         {\"title\": \"<title exactly as listed>\", \"reason\": \"<one short sentence>\"}.\n\n\
         Candidates:\n",
    );

    for (index, show) in candidates.iter().enumerate() {
        prompt.push_str(&format!("{}. {}", index + 1, show.title));
        if let Some(summary) = show.summary() {
            prompt.push_str(" - ");
            prompt.push_str(&clip(summary, PROMPT_SUMMARY_CHARS));
        }
        prompt.push('\n');
    }

    prompt
}

fn clip(text: &str, max_chars: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match single_line.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", single_line[..cut].trim_end()),
        None => single_line,
    }
}

/// Exact, case-insensitive title match against the offered candidates
pub fn match_suggestion<'a>(candidates: &'a [Show], title: &str) -> Option<&'a Show> {
    let wanted = title.to_lowercase();
    candidates
        .iter()
        .find(|show| show.title.to_lowercase() == wanted)
}

impl From<GenerationError> for FallbackReason {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::MissingCredential => FallbackReason::MissingCredential,
            GenerationError::Timeout => FallbackReason::Timeout,
            GenerationError::Network(message) => FallbackReason::Network { message },
            GenerationError::Status(status) => FallbackReason::BadStatus { status },
            GenerationError::Malformed(message) => FallbackReason::MalformedResponse { message },
        }
    }
}

/// Chooses one show, either uniformly or by asking a text generator
#[derive(Clone)]
pub struct Selector {
    generator: Arc<dyn TextGenerator>,
    limits: AssistLimits,
    /// Held for the duration of an assisted request
    in_flight: Arc<Mutex<()>>,
}

impl Selector {
    pub fn new(generator: Arc<dyn TextGenerator>, limits: AssistLimits) -> Self {
        Self {
            generator,
            limits,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    pub fn limits(&self) -> AssistLimits {
        self.limits
    }

    pub fn has_credential(&self) -> bool {
        self.generator.has_credential()
    }

    pub fn pick_random<R: Rng + ?Sized>(&self, candidates: &[Show], rng: &mut R) -> Recommendation {
        Recommendation::random(pick_random(candidates, rng))
    }

    /// Asks the generator to choose; any failure degrades to a random pick
    ///
    /// The RNG is only touched on the fallback path, so a fallback returns
    /// exactly what `pick_random` would have returned with the same RNG state.
    pub async fn pick_assisted<R: Rng + ?Sized>(
        &self,
        candidates: &[Show],
        rng: &mut R,
    ) -> Recommendation {
        if candidates.is_empty() {
            return Recommendation::random(None);
        }

        let Ok(_guard) = self.in_flight.try_lock() else {
            return self.fall_back(candidates, rng, FallbackReason::RequestInFlight);
        };

        if !self.generator.has_credential() {
            return self.fall_back(candidates, rng, FallbackReason::MissingCredential);
        }

        let offered = &candidates[..candidates.len().min(self.limits.max_candidates)];
        let prompt = build_prompt(offered);
        if prompt.len() >= self.limits.max_prompt_bytes {
            return self.fall_back(
                candidates,
                rng,
                FallbackReason::PromptTooLarge {
                    bytes: prompt.len(),
                    limit: self.limits.max_prompt_bytes,
                },
            );
        }

        let suggestion = match self.generator.suggest(&prompt).await {
            Ok(suggestion) => suggestion,
            Err(e) => return self.fall_back(candidates, rng, e.into()),
        };

        match match_suggestion(offered, &suggestion.title) {
            Some(show) => {
                tracing::info!(
                    title = %show.title,
                    offered = offered.len(),
                    provider = self.generator.name(),
                    "Assisted pick"
                );
                Recommendation {
                    show: Some(show.clone()),
                    source: PickSource::Assisted {
                        reason: suggestion.reason,
                    },
                }
            }
            None => self.fall_back(
                candidates,
                rng,
                FallbackReason::UnmatchedTitle {
                    title: suggestion.title,
                },
            ),
        }
    }

    fn fall_back<R: Rng + ?Sized>(
        &self,
        candidates: &[Show],
        rng: &mut R,
        reason: FallbackReason,
    ) -> Recommendation {
        tracing::warn!(
            reason = %reason,
            candidates = candidates.len(),
            provider = self.generator.name(),
            "Assisted pick failed, picking at random"
        );
        Recommendation::fallback(pick_random(candidates, rng), reason)
    }
}
