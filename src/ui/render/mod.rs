mod announcement;
mod downloadable;
mod list;

pub use announcement::event_status;
pub use list::{empty_state, render_list};

use crate::utils::text_processing::html_escape;

/// Shown for optional fields the server left empty.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Shown for dates the server has not published yet.
pub const TO_BE_ANNOUNCED: &str = "To be announced";

/// Escaped field value, or the placeholder when missing or blank.
fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => html_escape(value),
        None => placeholder.to_string(),
    }
}

/// Escaped link target when it uses a scheme safe to put in an `href`.
fn safe_href(url: &str) -> Option<String> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("mailto:")
        || (url.starts_with('/') && !url.starts_with("//"));
    allowed.then(|| html_escape(url))
}

/// Render label/value rows as a definition list; values must be escaped.
fn detail_list(rows: &[(&str, String)]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let mut html = String::from("  <dl class=\"card-details\">\n");
    for (label, value) in rows {
        html.push_str(&format!(
            "    <dt>{}</dt><dd>{}</dd>\n",
            html_escape(label),
            value
        ));
    }
    html.push_str("  </dl>\n");
    html
}

/// Lowercase, dash separated form of a code for CSS class names.
fn slug(code: &str) -> String {
    code.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}
