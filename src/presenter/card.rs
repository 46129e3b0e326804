use std::fmt::Write;

use reqwest::Url;

use super::{escape_html, ids, truncate_sentences};
use crate::models::{FallbackReason, PickSource, Recommendation, Show};

/// Sentences of the blurb shown on the card
const CARD_SENTENCES: usize = 2;

/// Link handing `show` to the main application's detail view
pub fn detail_link(detail_url: &str, show: &Show) -> String {
    // Only used for its query serializer, so the base is irrelevant
    let query = match Url::parse("http://localhost/") {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("title", &show.title);
            url.query().unwrap_or_default().to_string()
        }
        Err(_) => String::new(),
    };
    let separator = if detail_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", detail_url, separator, query)
}

/// Result panel contents: a card for the pick, or the empty-state message
pub fn render_result(recommendation: &Recommendation, detail_url: &str) -> String {
    match &recommendation.show {
        Some(show) => {
            let mut html = render_card(show, &recommendation.source, detail_url);
            if let Some(reason) = recommendation.fallback_reason() {
                html.push_str(&render_notice(reason));
            }
            html
        }
        None => render_empty_state(false),
    }
}

pub(super) fn render_empty_state(hidden: bool) -> String {
    format!(
        r#"<div id="{}" class="empty-state"{}>No shows match the current filters.</div>"#,
        ids::EMPTY_STATE,
        if hidden { " hidden" } else { "" }
    )
}

fn render_card(show: &Show, source: &PickSource, detail_url: &str) -> String {
    let mut html = String::from(r#"<article class="result-card">"#);

    if let Some(poster) = show.poster() {
        let _ = write!(
            html,
            r#"<img class="poster" src="{}" alt="{}">"#,
            escape_html(poster),
            escape_html(&show.title)
        );
    }

    let _ = write!(html, "<h2>{}</h2>", escape_html(&show.title));

    if let Some(summary) = show.summary() {
        let _ = write!(
            html,
            r#"<p class="description">{}</p>"#,
            escape_html(truncate_sentences(summary, CARD_SENTENCES))
        );
    }

    if let PickSource::Assisted {
        reason: Some(reason),
    } = source
    {
        let _ = write!(html, r#"<p class="ai-reason">{}</p>"#, escape_html(reason));
    }

    let _ = write!(
        html,
        r#"<a id="{}" class="button" href="{}">View details</a></article>"#,
        ids::DETAIL_LINK,
        escape_html(&detail_link(detail_url, show))
    );

    html
}

/// Transient, non-blocking notice that the AI pick was replaced
fn render_notice(reason: &FallbackReason) -> String {
    format!(
        r#"<div id="{}" class="toast" role="status">AI suggestion unavailable ({}), picked at random instead.</div>"#,
        ids::NOTICE,
        escape_html(&reason.to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show() -> Show {
        let mut show = Show::new("Tom & Jerry <Live>", "series", "watching");
        show.description = Some("A cat chases a mouse. The mouse wins. Again and again.".into());
        show.poster_url = Some("https://img.example/tj.jpg".into());
        show
    }

    #[test]
    fn test_empty_recommendation_renders_empty_state() {
        let html = render_result(&Recommendation::random(None), "/detail");
        assert!(html.contains(r#"id="empty-state""#));
        assert!(!html.contains("result-card"));
    }

    #[test]
    fn test_card_escapes_and_truncates() {
        let html = render_result(&Recommendation::random(Some(show())), "/detail");

        assert!(html.contains("<h2>Tom &amp; Jerry &lt;Live&gt;</h2>"));
        assert!(html.contains(r#"<p class="description">A cat chases a mouse. The mouse wins.</p>"#));
        assert!(!html.contains("Again and again"));
        assert!(html.contains(r#"src="https://img.example/tj.jpg""#));
        assert!(!html.contains("toast"));
    }

    #[test]
    fn test_card_without_poster_or_description() {
        let plain = Show::new("Plain", "movie", "planned");
        let html = render_result(&Recommendation::random(Some(plain)), "/detail");
        assert!(!html.contains("<img"));
        assert!(!html.contains("description"));
    }

    #[test]
    fn test_fallback_renders_notice() {
        let rec = Recommendation::fallback(Some(show()), FallbackReason::Timeout);
        let html = render_result(&rec, "/detail");
        assert!(html.contains(r#"id="notice""#));
        assert!(html.contains("timed out"));
    }

    #[test]
    fn test_assisted_reason_is_shown() {
        let rec = Recommendation {
            show: Some(show()),
            source: PickSource::Assisted {
                reason: Some("Light & quick".into()),
            },
        };
        let html = render_result(&rec, "/detail");
        assert!(html.contains(r#"<p class="ai-reason">Light &amp; quick</p>"#));
    }

    #[test]
    fn test_detail_link_encodes_title() {
        assert_eq!(
            detail_link("/shows/detail", &show()),
            "/shows/detail?title=Tom+%26+Jerry+%3CLive%3E"
        );
        assert_eq!(
            detail_link("/app?view=detail", &Show::new("Ran", "movie", "planned")),
            "/app?view=detail&title=Ran"
        );
    }
}
