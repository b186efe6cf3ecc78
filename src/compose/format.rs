//! Output-dialect dispatch for injected markup.
//!
//! Everything format-specific in the composed instruction funnels through
//! this enum, so the section builders never compare option-id strings.

use serde::{Deserialize, Serialize};

/// The two dialects the console can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Inline-styled HTML for web publishing
    #[default]
    Html,
    /// Portable lightweight markup
    Markdown,
}

impl OutputFormat {
    /// Map a catalog option id onto a dialect, defaulting to HTML for
    /// anything unrecognized.
    pub fn from_option_id(id: Option<&str>) -> Self {
        match id {
            Some("markdown") => OutputFormat::Markdown,
            _ => OutputFormat::Html,
        }
    }

    /// The embed snippet for one image slot, anchor-wrapped when a
    /// click-through link is present.
    pub fn image_snippet(&self, url: &str, link: &str) -> String {
        let link = link.trim();
        match self {
            OutputFormat::Html => {
                if link.is_empty() {
                    format!(r#"<img src="{url}" style="max-width:100%;" />"#)
                } else {
                    format!(
                        r#"<a href="{link}"><img src="{url}" style="max-width:100%;" /></a>"#
                    )
                }
            }
            OutputFormat::Markdown => {
                if link.is_empty() {
                    format!("![image]({url})")
                } else {
                    format!("[![image]({url})]({link})")
                }
            }
        }
    }

    /// The call-to-action snippet: a styled button block in HTML, a
    /// block-quoted link line in Markdown.
    pub fn cta_snippet(&self, label: &str, url: &str) -> String {
        match self {
            OutputFormat::Html => format!(
                r#"<div style="text-align:center;margin:24px 0;"><a href="{url}" style="display:inline-block;padding:12px 32px;background:#2563eb;color:#ffffff;border-radius:6px;text-decoration:none;font-weight:600;">{label}</a></div>"#
            ),
            OutputFormat::Markdown => format!("> **[{label}]({url})**"),
        }
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn test_FMT_001_from_option_id() {
        assert_eq!(OutputFormat::from_option_id(Some("html")), OutputFormat::Html);
        assert_eq!(
            OutputFormat::from_option_id(Some("markdown")),
            OutputFormat::Markdown
        );
        assert_eq!(OutputFormat::from_option_id(None), OutputFormat::Html);
        assert_eq!(OutputFormat::from_option_id(Some("unknown")), OutputFormat::Html);
    }

    #[test]
    fn test_FMT_002_html_image_with_and_without_link() {
        let bare = OutputFormat::Html.image_snippet("https://cdn.example.com/a.png", "");
        assert!(bare.starts_with("<img"));
        assert!(!bare.contains("<a "));

        let linked = OutputFormat::Html
            .image_snippet("https://cdn.example.com/a.png", "https://example.com/lp");
        assert!(linked.starts_with("<a href=\"https://example.com/lp\""));
        assert!(linked.contains("<img"));
    }

    #[test]
    fn test_FMT_003_markdown_image_with_and_without_link() {
        let bare = OutputFormat::Markdown.image_snippet("https://cdn.example.com/a.png", "");
        assert_eq!(bare, "![image](https://cdn.example.com/a.png)");

        let linked = OutputFormat::Markdown
            .image_snippet("https://cdn.example.com/a.png", "https://example.com/lp");
        assert_eq!(
            linked,
            "[![image](https://cdn.example.com/a.png)](https://example.com/lp)"
        );
    }

    #[test]
    fn test_FMT_004_cta_snippets() {
        let html = OutputFormat::Html.cta_snippet("Start a free trial", "https://example.com/try");
        assert!(html.contains("<div"));
        assert!(html.contains(">Start a free trial</a>"));

        let md = OutputFormat::Markdown.cta_snippet("Start a free trial", "https://example.com/try");
        assert_eq!(md, "> **[Start a free trial](https://example.com/try)**");
    }
}
