//! # Code Renderer
//!
//! Turns an example's raw source into a highlighted `CodeBlock` for display.
//!
//! Component identifiers in example sources carry a `{id}-x-` namespace prefix.
//! It only exists to keep examples apart inside the dispatcher, so it is removed
//! before highlighting and the reader sees the local names.
//!
//! Highlighting is done by `syntect` with the Rust grammar. The output is plain
//! data (text + RGB), so any front end can draw it.

use std::sync::LazyLock;

use log::warn;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::core::callbacks::ComponentId;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    pub text: String,
    pub rgb: (u8, u8, u8),
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBlock {
    pub lines: Vec<Vec<CodeSpan>>,
}

impl CodeBlock {
    /// The displayed text without styling, one `\n` per line.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            for span in line {
                out.push_str(&span.text);
            }
            out.push('\n');
        }
        out
    }

    /// The block as 24-bit ANSI escaped text.
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            for span in line {
                let (r, g, b) = span.rgb;
                out.push_str(&format!("\x1b[38;2;{r};{g};{b}m{}", span.text));
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }
}

/// Removes every `{id}-x-` from `source`.
pub fn strip_namespace(source: &str, id: &str) -> String {
    source.replace(&ComponentId::prefix(id), "")
}

/// Names of the bundled highlighting themes.
pub fn available_themes() -> Vec<&'static str> {
    THEME_SET.themes.keys().map(String::as_str).collect()
}

fn theme(name: &str) -> &'static Theme {
    match THEME_SET.themes.get(name) {
        Some(theme) => theme,
        None => {
            warn!("Unknown code theme '{}', falling back to {}", name, DEFAULT_THEME);
            &THEME_SET.themes[DEFAULT_THEME]
        }
    }
}

/// Strips the namespace prefix and highlights the result.
pub fn render_code(source: &str, id: &str, theme_name: &str) -> CodeBlock {
    let text = strip_namespace(source, id).replace('\t', "    ");
    let syntax = SYNTAX_SET
        .find_syntax_by_extension("rs")
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme(theme_name));

    let mut block = CodeBlock::default();
    for line in LinesWithEndings::from(&text) {
        let spans = match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => ranges
                .into_iter()
                .filter_map(|(style, fragment)| {
                    let fragment = fragment.trim_end_matches(['\n', '\r']);
                    if fragment.is_empty() {
                        return None;
                    }
                    Some(CodeSpan {
                        text: fragment.to_string(),
                        rgb: (style.foreground.r, style.foreground.g, style.foreground.b),
                        bold: style.font_style.contains(FontStyle::BOLD),
                        italic: style.font_style.contains(FontStyle::ITALIC),
                    })
                })
                .collect(),
            Err(e) => {
                warn!("Highlighting failed for '{}': {}", id, e);
                vec![CodeSpan {
                    text: line.trim_end_matches(['\n', '\r']).to_string(),
                    rgb: (255, 255, 255),
                    bold: false,
                    italic: false,
                }]
            }
        };
        block.lines.push(spans);
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "let a = Node::input(\"demo-x-lambda\", \"lambda\", 4);\nlet b = Node::graph(\"demo-x-histogram\");\n";

    #[test]
    fn test_strip_namespace_removes_every_prefix() {
        let stripped = strip_namespace(SOURCE, "demo");
        assert!(!stripped.contains("demo-x-"));
        assert!(stripped.contains("\"lambda\""));
        assert!(stripped.contains("\"histogram\""));
    }

    #[test]
    fn test_strip_namespace_leaves_other_namespaces() {
        let stripped = strip_namespace("other-x-a demo-x-b", "demo");
        assert_eq!(stripped, "other-x-a b");
    }

    #[test]
    fn test_render_code_plain_text_matches_stripped_source() {
        let block = render_code(SOURCE, "demo", DEFAULT_THEME);
        assert_eq!(block.lines.len(), 2);
        assert_eq!(block.plain_text(), strip_namespace(SOURCE, "demo"));
    }

    #[test]
    fn test_render_code_is_deterministic() {
        let first = render_code(SOURCE, "demo", DEFAULT_THEME);
        let second = render_code(SOURCE, "demo", DEFAULT_THEME);
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_code_colors_tokens() {
        let block = render_code("fn main() {}\n", "demo", DEFAULT_THEME);
        let colors: std::collections::HashSet<_> = block.lines[0].iter().map(|s| s.rgb).collect();
        assert!(colors.len() > 1, "expected several token colors, got {:?}", colors);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let fallback = render_code(SOURCE, "demo", "no-such-theme");
        let default = render_code(SOURCE, "demo", DEFAULT_THEME);
        assert_eq!(fallback, default);
    }

    #[test]
    fn test_available_themes_include_default() {
        assert!(available_themes().contains(&DEFAULT_THEME));
    }

    #[test]
    fn test_ansi_output_resets_each_line() {
        let block = render_code("let x = 1;\n", "demo", DEFAULT_THEME);
        let ansi = block.to_ansi();
        assert!(ansi.contains("\x1b[38;2;"));
        assert!(ansi.ends_with("\x1b[0m\n"));
    }
}
