// ABOUTME: HTML escaping utilities to prevent XSS in server-rendered templates
// ABOUTME: Provides escaping for identity claims and error text injected into result pages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Escape a string for safe insertion into HTML.
///
/// Replaces the five HTML-special characters (`&`, `<`, `>`, `"`, `'`) with their
/// corresponding HTML entities. Safe for element text and for double-quoted
/// attribute values, which is everywhere the result pages inject
/// provider-controlled values such as claims and error descriptions.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(ch),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(escape_html("hello world"), "hello world");
    }

    #[test]
    fn escapes_quotes() {
        assert_eq!(
            escape_html(r#"value"with"quotes"#),
            "value&quot;with&quot;quotes"
        );
    }

    #[test]
    fn escapes_script_payload() {
        assert_eq!(
            escape_html(r#""><script>alert(1)</script>"#),
            "&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn escapes_ampersand() {
        assert_eq!(escape_html("a&b=c"), "a&amp;b=c");
    }

    #[test]
    fn escapes_single_quote() {
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }
}
