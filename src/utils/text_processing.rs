//! Text processing utilities.
//!
//! This module contains the markup helpers shared by the filter engine and the
//! renderer: stripping tags down to searchable plain text, escaping text for
//! HTML output and truncating rich text to a word budget without cutting
//! through a tag.

use regex::Regex;
use std::sync::OnceLock;

/// Marker appended to truncated excerpts.
pub const ELLIPSIS: &str = "...";

/// Elements whose boundaries separate words in the rendered text.
const BLOCK_ELEMENTS: [&str; 22] = [
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "p", "section", "td",
];

/// Elements that never take a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

fn open_tag_pattern() -> &'static Regex {
    static OPEN_TAG: OnceLock<Regex> = OnceLock::new();
    OPEN_TAG.get_or_init(|| {
        Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)[^>]*?(/?)>").expect("open tag pattern is valid")
    })
}

/// Return the plain text of a markup fragment: tags removed, common
/// character references decoded.
///
/// Inline elements join their neighbours without a space, block elements
/// (paragraphs, list items, line breaks) separate words.
pub fn strip_markup(markup: &str) -> String {
    let without_tags = tag_pattern().replace_all(markup, |caps: &regex::Captures| {
        if is_block_tag(&caps[0]) {
            " "
        } else {
            ""
        }
    });
    decode_entities(without_tags.trim()).trim().to_string()
}

/// Lowercased element name of a tag such as `<p class="x">` or `</P>`.
fn tag_name(tag: &str) -> Option<String> {
    let inner = tag.strip_prefix('<')?;
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    (!name.is_empty()).then(|| name.to_ascii_lowercase())
}

fn is_block_tag(tag: &str) -> bool {
    tag_name(tag).map_or(false, |name| BLOCK_ELEMENTS.contains(&name.as_str()))
}

/// Decode the named and numeric character references the portal emits.
/// Unknown references are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with('&') {
            if let Some((ch, len)) = entity_at(rest) {
                result.push(ch);
                i += len;
                continue;
            }
        }
        let ch = match rest.chars().next() {
            Some(ch) => ch,
            None => break,
        };
        result.push(ch);
        i += ch.len_utf8();
    }
    result
}

/// Decode the character reference at the start of `text`, returning the
/// character and the byte length of the reference.
fn entity_at(text: &str) -> Option<(char, usize)> {
    let semi = text.bytes().take(12).position(|b| b == b';')?;
    let name = &text[1..semi];
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };
    Some((ch, semi + 1))
}

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Count the whitespace separated words of the plain text of `markup`.
pub fn word_count(markup: &str) -> usize {
    strip_markup(markup).split_whitespace().count()
}

/// Truncate rich text to at most `word_limit` words.
///
/// When the plain text fits, the markup is returned unchanged. Otherwise the
/// markup is cut right after the last allowed word, [`ELLIPSIS`] is appended
/// and every element still open at the cut is closed again, so the result is
/// never cut inside a tag or inside a word.
pub fn truncate_markup(markup: &str, word_limit: usize) -> String {
    if word_count(markup) <= word_limit {
        return markup.to_string();
    }

    let head = &markup[..word_cut_offset(markup, word_limit)];
    let mut truncated = String::with_capacity(head.len() + 16);
    truncated.push_str(head);
    truncated.push_str(ELLIPSIS);
    for tag in open_tags(head).iter().rev() {
        truncated.push_str("</");
        truncated.push_str(tag);
        truncated.push('>');
    }
    truncated
}

/// Byte offset in `markup` just past the end of word number `limit`.
fn word_cut_offset(markup: &str, limit: usize) -> usize {
    let mut words = 0;
    let mut in_word = false;
    let mut cut = 0;
    let mut i = 0;

    while i < markup.len() {
        let rest = &markup[i..];
        if rest.starts_with('<') {
            if let Some(end) = rest.find('>') {
                if is_block_tag(&rest[..=end]) {
                    in_word = false;
                }
                i += end + 1;
                continue;
            }
        }

        let (ch, len) = match rest.starts_with('&').then(|| entity_at(rest)).flatten() {
            Some(entity) => entity,
            None => match rest.chars().next() {
                Some(ch) => (ch, ch.len_utf8()),
                None => break,
            },
        };

        if ch.is_whitespace() {
            in_word = false;
        } else {
            if !in_word {
                words += 1;
                in_word = true;
                if words > limit {
                    break;
                }
            }
            cut = i + len;
        }
        i += len;
    }
    cut
}

/// Names of the elements left open at the end of `markup`, outermost first.
fn open_tags(markup: &str) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    for caps in open_tag_pattern().captures_iter(markup) {
        let closing = caps.get(1).map_or(false, |m| !m.as_str().is_empty());
        let self_closing = caps.get(3).map_or(false, |m| !m.as_str().is_empty());
        let name = match caps.get(2) {
            Some(name) => name.as_str().to_ascii_lowercase(),
            None => continue,
        };

        if closing {
            if let Some(pos) = stack.iter().rposition(|open| *open == name) {
                stack.truncate(pos);
            }
        } else if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
            stack.push(name);
        }
    }
    stack
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_removes_tags() {
        assert_eq!(
            strip_markup("<p>Enrollment <strong>opens</strong> Monday</p>"),
            "Enrollment opens Monday"
        );
    }

    #[test]
    fn test_strip_markup_decodes_entities() {
        assert_eq!(strip_markup("<p>Q&amp;A &lt;today&gt;</p>"), "Q&A <today>");
        assert_eq!(strip_markup("caf&#233; &#x41;"), "café A");
    }

    #[test]
    fn test_decode_entities_keeps_unknown_references() {
        assert_eq!(decode_entities("&bogus; & done"), "&bogus; & done");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_truncate_markup_keeps_open_tag_and_appends_ellipsis() {
        assert_eq!(
            truncate_markup("<p>one two three four five</p>", 3),
            "<p>one two three...</p>"
        );
    }

    #[test]
    fn test_truncate_markup_within_limit_is_unchanged() {
        let markup = "<p>one <em>two</em> three</p>";
        assert_eq!(truncate_markup(markup, 3), markup);
        assert_eq!(truncate_markup(markup, 10), markup);
    }

    #[test]
    fn test_truncate_markup_closes_nested_tags() {
        assert_eq!(
            truncate_markup("<div><p>alpha <strong>beta gamma</strong> delta</p></div>", 2),
            "<div><p>alpha <strong>beta...</strong></p></div>"
        );
    }

    #[test]
    fn test_truncate_markup_skips_tags_after_last_word() {
        assert_eq!(
            truncate_markup("<p>one two</p><p>three four</p>", 2),
            "<p>one two...</p>"
        );
    }

    #[test]
    fn test_truncate_markup_ignores_void_elements() {
        assert_eq!(
            truncate_markup("<p>one<br>two three<img src=\"a.png\"/> four</p>", 2),
            "<p>one<br>two...</p>"
        );
    }

    #[test]
    fn test_inline_tags_do_not_split_words() {
        assert_eq!(strip_markup("re<em>enroll</em>ment"), "reenrollment");
        assert_eq!(truncate_markup("re<em>enroll</em>ment now later", 1), "re<em>enroll</em>ment...");
    }

    #[test]
    fn test_truncate_markup_treats_nbsp_as_space() {
        assert_eq!(truncate_markup("one&nbsp;two three", 2), "one&nbsp;two...");
    }

    #[test]
    fn test_truncate_plain_text() {
        assert_eq!(truncate_markup("a b c d", 2), "a b...");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("<p>one</p> <p>two three</p>"), 3);
        assert_eq!(word_count(""), 0);
    }
}
