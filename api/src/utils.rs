// replace placeholder in template with data
pub fn render_template(template: &str, data: &[(&str, &str)]) -> String {
    let mut result = String::from(template);

    for (placeholder, value) in data {
        result = result.replace(placeholder, value);
    }

    result
}

// escape text for interpolation into HTML, including the braces used by
// template placeholders
pub fn escape_html(text: &str) -> String {
    let mut s = String::with_capacity(text.len());
    for char in text.chars() {
        match char {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&#39;"),
            '{' => s.push_str("&#123;"),
            '}' => s.push_str("&#125;"),
            c => s.push(c),
        }
    }
    s
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn render_template_replaces_every_placeholder() {
        let out = render_template("<a href=\"/{{id}}\">{{id}}</a>", &[("{{id}}", "7")]);
        assert_eq!(out, "<a href=\"/7\">7</a>");
    }

    #[test]
    fn escaped_values_cannot_inject_placeholders() {
        let escaped = escape_html("<b>{{flash}}</b>");
        assert_eq!(escaped, "&lt;b&gt;&#123;&#123;flash&#125;&#125;&lt;/b&gt;");

        let out = render_template(
            "{{text}}|{{flash}}",
            &[("{{text}}", &escaped), ("{{flash}}", "notice")],
        );
        assert!(!out.contains("{{"), "Escaped text must survive later replacements");
    }
}
