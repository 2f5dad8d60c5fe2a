//! Minimal HTML rendering helpers.

use axum::response::Html;

const STYLE: &str = "body{font-family:sans-serif;max-width:1100px;margin:2rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:.4rem;vertical-align:top}\
img.thumb{max-width:160px}.error{color:#a00}.ok{color:#070}label{display:block;margin:.5rem 0}";

/// Escape text for use in HTML content and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap `body` (already-escaped HTML) in a full page.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{STYLE}</style></head><body><h1>{title}</h1>{body}</body></html>",
        title = escape(title),
    ))
}

pub fn error_page(message: &str) -> Html<String> {
    page(
        "Something went wrong",
        &format!(
            "<p class=\"error\">{}</p><p><a href=\"/\">Back</a></p>",
            escape(message)
        ),
    )
}

/// A `<select>` over `options`, pre-selecting `selected` when present.
/// An empty option renders as "(none)".
pub fn select(name: &str, options: &[&str], selected: Option<&str>) -> String {
    let mut out = format!("<select name=\"{}\">", escape(name));
    for opt in options {
        let sel = if Some(*opt) == selected { " selected" } else { "" };
        let text = if opt.is_empty() { "(none)" } else { opt };
        out.push_str(&format!(
            "<option value=\"{}\"{sel}>{}</option>",
            escape(opt),
            escape(text)
        ));
    }
    out.push_str("</select>");
    out
}

/// Render an optional value, or `-` when absent.
pub fn or_dash(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_else(|| "-".to_string())
}
