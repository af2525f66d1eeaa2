//! HTML escaping for substituted values and sanitizing for stored templates.

/// Escape text for insertion into HTML element content or attribute values.
/// Only markup-significant characters change; whitespace and `/` pass through.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Clean a template the way post HTML is cleaned: formatting tags and links
/// stay, scripts, event handlers and unknown tags go. Placeholders survive
/// because they are plain text (or relative URLs inside `href`).
pub fn sanitize_template(html: &str) -> String {
    ammonia::Builder::default().clean(html).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("Tom&Jerry"), "Tom&amp;Jerry");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_escape_leaves_spaces_and_slashes() {
        assert_eq!(escape_html("Bob <B>"), "Bob &lt;B&gt;");
        assert_eq!(escape_html("</i> and/or"), "&lt;/i&gt; and/or");
        assert_eq!(
            escape_html(r#"say "hi" & 'bye'"#),
            "say &quot;hi&quot; &amp; &#039;bye&#039;"
        );
    }

    #[test]
    fn test_escape_keeps_placeholder_braces() {
        // Braces are not markup; the renderer never re-scans values anyway
        assert_eq!(escape_html("{{username}}"), "{{username}}");
    }

    #[test]
    fn test_sanitize_strips_script() {
        let cleaned = sanitize_template("<p>Hello {{username}}</p><script>alert(1)</script>");
        assert_eq!(cleaned, "<p>Hello {{username}}</p>");
    }

    #[test]
    fn test_sanitize_keeps_link_placeholder() {
        let cleaned = sanitize_template("<a href=\"{{post_url}}\" onclick=\"x()\">{{post_title}}</a>");
        assert!(cleaned.contains("href=\"{{post_url}}\""));
        assert!(cleaned.contains("{{post_title}}"));
        assert!(!cleaned.contains("onclick"));
    }
}
