//! HTML helper functions

/// Generate an anchor tag; `text` must already be escaped
///
/// # Examples
/// ```ignore
/// link_to("/guides/intro/", "Intro") // -> <a href="/guides/intro/">Intro</a>
/// ```
pub fn link_to(href: &str, text: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noreferrer">{}</a>"#,
            html_escape(href),
            text
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, html_escape(href), text)
    }
}

/// Generate an image tag
pub fn image_tag(src: &str, alt: &str, title: Option<&str>) -> String {
    let title_attr = title
        .filter(|t| !t.is_empty())
        .map(|t| format!(r#" title="{}""#, html_escape(t)))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}"{}>"#,
        html_escape(src),
        html_escape(alt),
        title_attr
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
