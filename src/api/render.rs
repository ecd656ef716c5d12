//! HTML rendering for the image endpoint

/// Escape text for safe interpolation into HTML attributes and body content.
///
/// Ampersands first so entity prefixes are not double-escaped.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render the image page returned on a successful generation or cache hit.
pub fn render_image_page(url: &str, prompt: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body> <img src=\"{}\" alt=\"AI Generated Picture {}\" width=\"460\" height=\"345\"> </body> </html>",
        escape_html(url),
        escape_html(prompt)
    )
}

/// Render a minimal error page for browser clients.
pub fn render_error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body> <p>{}</p> </body> </html>",
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(escape_html("a red bicycle"), "a red bicycle");
    }

    #[test]
    fn test_escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<b>"fish" & 'chips'</b>"#),
            "&lt;b&gt;&quot;fish&quot; &amp; &#x27;chips&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_ampersand_is_not_double_escaped() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_image_page_structure() {
        let html = render_image_page("https://img.example/cat.png", "a red bicycle");

        assert_eq!(
            html,
            "<!DOCTYPE html><html><body> <img src=\"https://img.example/cat.png\" alt=\"AI Generated Picture a red bicycle\" width=\"460\" height=\"345\"> </body> </html>"
        );
    }

    #[test]
    fn test_image_page_escapes_prompt() {
        let html = render_image_page("https://img.example/x.png", "<script>alert(1)</script>");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_image_page_escapes_url() {
        let html = render_image_page("https://img.example/x.png?a=1&b=\"2\"", "cat");

        assert!(html.contains("src=\"https://img.example/x.png?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = render_error_page("upstream <failure>");

        assert_eq!(
            html,
            "<!DOCTYPE html><html><body> <p>upstream &lt;failure&gt;</p> </body> </html>"
        );
    }
}
