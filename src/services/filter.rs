use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{normalize_tags, Show};

/// Value of the category/status selectors that disables that filter
pub const ANY: &str = "all";

/// Current state of the filter controls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub search: String,
    /// Tags a show must carry, all of them
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl FilterSelection {
    /// Builds a selection, normalizing the selected tags like show tags
    pub fn new<'a>(
        category: impl Into<String>,
        status: impl Into<String>,
        search: impl Into<String>,
        tags: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            category: category.into(),
            status: status.into(),
            search: search.into(),
            tags: normalize_tags(tags).into_iter().collect(),
        }
    }

    /// Parses the comma-joined tag list used in query strings
    pub fn with_joined_tags(mut self, joined: &str) -> Self {
        self.tags.extend(normalize_tags(joined.split(',')));
        self
    }

    pub fn matches(&self, show: &Show) -> bool {
        self.matches_category(show)
            && self.matches_status(show)
            && self.matches_tags(show)
            && self.matches_search(show)
    }

    fn matches_category(&self, show: &Show) -> bool {
        is_any(&self.category) || show.category == self.category
    }

    fn matches_status(&self, show: &Show) -> bool {
        is_any(&self.status) || show.status == self.status
    }

    fn matches_tags(&self, show: &Show) -> bool {
        // Selected tags may come straight from a JSON body, so compare normalized
        self.tags
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .all(|tag| show.has_tag(&tag))
    }

    fn matches_search(&self, show: &Show) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(show.title.as_str()),
            show.description.as_deref(),
            show.notes.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

fn is_any(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ANY)
}

/// Shows passing every active filter, most recently updated first
///
/// Shows without a timestamp go last; ties keep collection order.
pub fn filter_shows(shows: &[Show], selection: &FilterSelection) -> Vec<Show> {
    let mut matching: Vec<Show> = shows
        .iter()
        .filter(|show| selection.matches(show))
        .cloned()
        .collect();

    // Option orders None first, so reversing puts missing timestamps last
    matching.sort_by_key(|show| Reverse(show.updated_at));

    tracing::debug!(
        total = shows.len(),
        matching = matching.len(),
        category = %selection.category,
        status = %selection.status,
        tag_count = selection.tags.len(),
        "Filtered shows"
    );

    matching
}
