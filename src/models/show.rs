use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A tracked movie or series, as owned by the main application
///
/// Tags and timestamps are normalized while deserializing, so the rest of the
/// crate only ever sees one representation of each.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub title: String,
    /// Category, e.g. "movie" or "series"
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_data_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Show {
    pub fn new(title: impl Into<String>, category: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            status: status.into(),
            tags: Vec::new(),
            description: None,
            notes: None,
            overview: None,
            poster_url: None,
            poster_data_url: None,
            updated_at: None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// First non-blank blurb among description, overview and notes
    pub fn summary(&self) -> Option<&str> {
        [&self.description, &self.overview, &self.notes]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    /// Poster source for rendering, an inline data URL wins over a remote one
    pub fn poster(&self) -> Option<&str> {
        self.poster_data_url
            .as_deref()
            .or(self.poster_url.as_deref())
            .filter(|src| !src.trim().is_empty())
    }
}

/// Lower-cases and trims tags, dropping empties and repeats
pub fn normalize_tags<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<Value>),
    Other(Value),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<RawTags>::deserialize(deserializer)? {
        Some(RawTags::Joined(joined)) => normalize_tags(joined.split(',')),
        Some(RawTags::List(items)) => normalize_tags(items.iter().filter_map(Value::as_str)),
        Some(RawTags::Other(_)) | None => Vec::new(),
    };
    Ok(tags)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
    Other(Value),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let timestamp = match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Millis(ms)) => DateTime::from_timestamp_millis(ms),
        Some(RawTimestamp::FractionalMillis(ms)) => DateTime::from_timestamp_millis(ms as i64),
        Some(RawTimestamp::Text(text)) => parse_timestamp_text(&text),
        Some(RawTimestamp::Other(_)) | None => None,
    };
    Ok(timestamp)
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    text.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_joined_and_list_tags_normalize_identically() {
        let joined: Show = serde_json::from_value(json!({
            "title": "Dark",
            "type": "series",
            "status": "watching",
            "tags": " Sci-Fi, mystery ,,German"
        }))
        .unwrap();
        let list: Show = serde_json::from_value(json!({
            "title": "Dark",
            "type": "series",
            "status": "watching",
            "tags": ["sci-fi", "  Mystery", "GERMAN", ""]
        }))
        .unwrap();

        assert_eq!(joined.tags, vec!["sci-fi", "mystery", "german"]);
        assert_eq!(joined.tags, list.tags);
    }

    #[test]
    fn test_unrecognized_tags_contribute_nothing() {
        let numeric: Show = serde_json::from_value(json!({ "title": "A", "tags": 42 })).unwrap();
        let missing: Show = serde_json::from_value(json!({ "title": "B" })).unwrap();
        let null: Show = serde_json::from_value(json!({ "title": "C", "tags": null })).unwrap();
        let mixed: Show =
            serde_json::from_value(json!({ "title": "D", "tags": ["x", 1, null, "x"] })).unwrap();

        assert!(numeric.tags.is_empty());
        assert!(missing.tags.is_empty());
        assert!(null.tags.is_empty());
        assert_eq!(mixed.tags, vec!["x"]);
    }

    #[test]
    fn test_updated_at_accepts_millis_and_rfc3339() {
        let millis: Show =
            serde_json::from_value(json!({ "title": "A", "updatedAt": 1_700_000_000_000i64 }))
                .unwrap();
        let text: Show = serde_json::from_value(
            json!({ "title": "B", "updatedAt": "2023-11-14T22:13:20Z" }),
        )
        .unwrap();
        let garbage: Show =
            serde_json::from_value(json!({ "title": "C", "updatedAt": "last tuesday" })).unwrap();

        let expected = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(millis.updated_at, Some(expected));
        assert_eq!(text.updated_at, Some(expected));
        assert_eq!(garbage.updated_at, None);
    }

    #[test]
    fn test_summary_and_poster_preference() {
        let mut show = Show::new("Severance", "series", "planned");
        assert_eq!(show.summary(), None);
        assert_eq!(show.poster(), None);

        show.description = Some("   ".to_string());
        show.overview = Some("Office workers split their memories.".to_string());
        show.poster_url = Some("https://img.example/severance.jpg".to_string());
        show.poster_data_url = Some("data:image/png;base64,AAAA".to_string());

        assert_eq!(show.summary(), Some("Office workers split their memories."));
        assert_eq!(show.poster(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_serializes_with_camel_case_names() {
        let mut show = Show::new("Heat", "movie", "completed");
        show.poster_url = Some("https://img.example/heat.jpg".to_string());
        let value = serde_json::to_value(&show).unwrap();

        assert_eq!(value["type"], "movie");
        assert_eq!(value["posterUrl"], "https://img.example/heat.jpg");
        assert!(value.get("notes").is_none());
    }
}
