pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Localized date + time for display (browser runtime).
pub(crate) fn format_local_time(ms: i64) -> String {
    let d = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ms as f64));
    String::from(d.to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED))
}

/// Strip markup from editor HTML and collapse whitespace.
pub(crate) fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => out.push(c),
        }
    }

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of the note's text, with an ellipsis when cut.
pub(crate) fn preview(markup: &str, max_chars: usize) -> String {
    let text = plain_text(markup);
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_strips_tags_and_entities() {
        let html = "<h1>Groceries</h1><p>milk &amp; eggs</p><ul><li>bread</li></ul>";
        assert_eq!(plain_text(html), "Groceries milk & eggs bread");
    }

    #[test]
    fn test_plain_text_keeps_plain_input() {
        assert_eq!(plain_text("just text"), "just text");
        assert_eq!(plain_text(""), "");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "<p>".to_string() + &"é".repeat(60) + "</p>";
        let p = preview(&long, 50);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), 53);
    }

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("<p>hi</p>", 50), "hi");
    }
}
