//! HTML rendering for the picker page.
//!
//! The page is the contract with the surrounding application: scripts and
//! styles there address the controls by the identifiers in [`ids`].

mod card;
mod page;

pub use card::{detail_link, render_result};
pub use page::{render_alert, render_page, PageView};

/// Fixed element identifiers of the picker page
pub mod ids {
    pub const CATEGORY_SELECT: &str = "category-filter";
    pub const STATUS_SELECT: &str = "status-filter";
    pub const SEARCH_INPUT: &str = "search-input";
    pub const TAG_CONTAINER: &str = "tag-filters";
    pub const AI_TOGGLE: &str = "use-ai";
    pub const RECOMMEND_BUTTON: &str = "recommend-btn";
    pub const RESULT_PANEL: &str = "result";
    pub const EMPTY_STATE: &str = "empty-state";
    pub const BACK_BUTTON: &str = "back-btn";
    pub const NOTICE: &str = "notice";
    pub const ALERT: &str = "alert";
    pub const DETAIL_LINK: &str = "view-details";

    pub const ALL: [&str; 9] = [
        CATEGORY_SELECT,
        STATUS_SELECT,
        SEARCH_INPUT,
        TAG_CONTAINER,
        AI_TOGGLE,
        RECOMMEND_BUTTON,
        RESULT_PANEL,
        EMPTY_STATE,
        BACK_BUTTON,
    ];
}

/// Escapes text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Keeps the first `count` sentences of `text`
///
/// A sentence ends at a run of `.`, `!` or `?`. Text with fewer sentences is
/// returned whole.
pub fn truncate_sentences(text: &str, count: usize) -> &str {
    let text = text.trim();
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if !is_sentence_end(c) {
            continue;
        }
        let next_is_end = chars.peek().is_some_and(|&(_, next)| is_sentence_end(next));
        if next_is_end {
            continue;
        }
        seen += 1;
        if seen == count {
            return &text[..index + c.len_utf8()];
        }
    }

    text
}
