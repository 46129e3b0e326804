use std::collections::BTreeSet;

use crate::models::Show;

/// Every tag used across the collection, deduplicated and sorted
pub fn extract_tags(shows: &[Show]) -> Vec<String> {
    shows
        .iter()
        .flat_map(|show| show.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty categories, sorted, for the category selector
pub fn distinct_categories(shows: &[Show]) -> Vec<String> {
    distinct(shows.iter().map(|show| show.category.as_str()))
}

/// Distinct non-empty statuses, sorted, for the status selector
pub fn distinct_statuses(shows: &[Show]) -> Vec<String> {
    distinct(shows.iter().map(|show| show.status.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shows() -> Vec<Show> {
        serde_json::from_value(json!([
            { "title": "Arrival", "type": "movie", "status": "completed", "tags": "Sci-Fi, drama" },
            { "title": "Fargo", "type": "series", "status": "watching", "tags": ["crime", "DRAMA"] },
            { "title": "Paddington", "type": "movie", "status": "", "tags": null },
        ]))
        .unwrap()
    }

    #[test]
    fn test_extract_tags_sorted_and_deduplicated() {
        assert_eq!(extract_tags(&shows()), vec!["crime", "drama", "sci-fi"]);
    }

    #[test]
    fn test_extract_tags_empty_collection() {
        assert!(extract_tags(&[]).is_empty());
    }

    #[test]
    fn test_distinct_categories_and_statuses() {
        let shows = shows();
        assert_eq!(distinct_categories(&shows), vec!["movie", "series"]);
        assert_eq!(distinct_statuses(&shows), vec!["completed", "watching"]);
    }
}
