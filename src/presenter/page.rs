use std::fmt::Write;

use super::card::{render_empty_state, render_result};
use super::{escape_html, ids};
use crate::{
    models::Recommendation,
    services::{
        catalog::Catalog,
        filter::{FilterSelection, ANY},
        tags::{distinct_categories, distinct_statuses},
    },
};

/// Everything the picker page shows for one request
pub struct PageView<'a> {
    pub catalog: &'a Catalog,
    pub selection: &'a FilterSelection,
    pub assisted: bool,
    pub candidate_count: usize,
    pub recommendation: Option<&'a Recommendation>,
    pub detail_url: &'a str,
    pub app_url: &'a str,
}

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
.filters{display:grid;gap:.75rem}.tags label{margin-right:.75rem}\
.result-card{border:1px solid #ccc;border-radius:8px;padding:1rem;margin-top:1rem}\
.poster{max-width:10rem;float:right;margin-left:1rem}\
.toast{background:#fff4ce;padding:.5rem;margin-top:.5rem;border-radius:4px}\
.empty-state{color:#666;margin-top:1rem}";

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{}</style></head><body>{}</body></html>",
        escape_html(title),
        STYLE,
        body
    )
}

fn hidden(flag: bool) -> &'static str {
    if flag {
        " hidden"
    } else {
        ""
    }
}

fn render_select(id: &str, name: &str, label: &str, values: &[String], current: &str) -> String {
    let current = current.trim();
    let mut html = format!(
        r#"<label for="{id}">{label}</label><select id="{id}" name="{name}"><option value="{ANY}">All</option>"#
    );
    for value in values {
        let selected = if value == current { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{0}"{1}>{0}</option>"#,
            escape_html(value),
            selected
        );
    }
    html.push_str("</select>");
    html
}

fn render_tag_checkboxes(tags: &[String], selection: &FilterSelection) -> String {
    let mut html = format!(r#"<fieldset id="{}" class="tags"><legend>Tags</legend>"#, ids::TAG_CONTAINER);
    for tag in tags {
        let checked = if selection.tags.contains(tag) { " checked" } else { "" };
        let _ = write!(
            html,
            r#"<label><input type="checkbox" name="tag" value="{0}"{1}> {0}</label>"#,
            escape_html(tag),
            checked
        );
    }
    html.push_str("</fieldset>");
    html
}

/// The full picker page
pub fn render_page(view: &PageView<'_>) -> String {
    let shows = &view.catalog.shows;
    let mut body = String::from("<h1>What should I watch?</h1>");

    let _ = write!(
        body,
        r#"<form class="filters" method="get" action="/picker" onsubmit="setTimeout(function(){{document.getElementById('{}').disabled=true}})">"#,
        ids::RECOMMEND_BUTTON
    );
    body.push_str(&render_select(
        ids::CATEGORY_SELECT,
        "category",
        "Category",
        &distinct_categories(shows),
        &view.selection.category,
    ));
    body.push_str(&render_select(
        ids::STATUS_SELECT,
        "status",
        "Status",
        &distinct_statuses(shows),
        &view.selection.status,
    ));
    let _ = write!(
        body,
        r#"<label for="{0}">Search</label><input id="{0}" type="search" name="search" value="{1}" placeholder="Title, description or notes">"#,
        ids::SEARCH_INPUT,
        escape_html(&view.selection.search)
    );
    body.push_str(&render_tag_checkboxes(&view.catalog.tags, view.selection));
    let _ = write!(
        body,
        r#"<label><input id="{}" type="checkbox" name="ai" value="on"{}> Ask AI to choose</label>"#,
        ids::AI_TOGGLE,
        if view.assisted { " checked" } else { "" }
    );
    let _ = write!(
        body,
        r#"<p class="count">{} matching</p><button type="submit" name="action" value="filter">Apply filters</button><button id="{}" type="submit" name="action" value="recommend">Recommend</button></form>"#,
        view.candidate_count,
        ids::RECOMMEND_BUTTON
    );

    let picked = view.recommendation.filter(|rec| rec.show.is_some());
    let show_empty = view.candidate_count == 0 || (view.recommendation.is_some() && picked.is_none());

    body.push_str(&render_empty_state(!show_empty));

    let _ = write!(body, r#"<section id="{}"{}>"#, ids::RESULT_PANEL, hidden(picked.is_none()));
    if let Some(rec) = picked {
        body.push_str(&render_result(rec, view.detail_url));
    }
    body.push_str("</section>");

    let _ = write!(
        body,
        r#"<p><a id="{}" href="{}">Back</a></p>"#,
        ids::BACK_BUTTON,
        escape_html(view.app_url)
    );

    document("Pick something to watch", &body)
}

/// Blocking alert shown when there is no show data to work with
pub fn render_alert(message: &str, app_url: &str) -> String {
    let body = format!(
        r#"<div id="{}" role="alert"><h1>Cannot load your shows</h1><p>{}</p></div><p><a id="{}" href="{}">Back</a></p>"#,
        ids::ALERT,
        escape_html(message),
        ids::BACK_BUTTON,
        escape_html(app_url)
    );
    document("Cannot load your shows", &body)
}
