//! HTML and text helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    decode_entities(&result)
}

/// Undo the entity escaping pulldown-cmark applies to text
fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Truncate to at most `length` characters without splitting a word.
///
/// `omission` is appended only when something was cut.
pub fn truncate_words(s: &str, length: usize, omission: &str) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }

    let cut: String = s.chars().take(length).collect();
    let at_boundary = s
        .chars()
        .nth(length)
        .map(char::is_whitespace)
        .unwrap_or(true);

    let kept = if at_boundary {
        cut.as_str()
    } else {
        cut.rsplit_once(char::is_whitespace)
            .map(|(head, _)| head)
            .unwrap_or(cut.as_str())
    };

    format!("{}{}", kept.trim_end(), omission)
}

/// Collapse rendered HTML into a single line of text, truncated to `length`
pub fn plain_text_excerpt(html: &str, length: usize) -> String {
    let text = strip_html(html);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_words(&collapsed, length, "…")
}
