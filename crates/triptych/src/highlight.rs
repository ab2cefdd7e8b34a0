use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use pagecore::SourceKind;

pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();

        let fallback = "base16-ocean.dark";
        let theme = theme_set
            .themes
            .get(theme_name)
            .cloned()
            .or_else(|| theme_set.themes.get(fallback).cloned())
            .unwrap_or_else(|| theme_set.themes.values().next().cloned().unwrap());

        Self { syntax_set, theme }
    }

    pub fn syntax_for_kind(&self, kind: SourceKind) -> &SyntaxReference {
        let ext = match kind {
            SourceKind::Html => "html",
            SourceKind::Css => "css",
            SourceKind::Js => "js",
        };
        self.syntax_set
            .find_syntax_by_extension(ext)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// The composed preview is always highlighted as HTML.
    pub fn syntax_for_preview(&self) -> &SyntaxReference {
        self.syntax_for_kind(SourceKind::Html)
    }

    pub fn highlight_lines_to_ratatui(
        &self,
        lines: &[String],
        syntax: &SyntaxReference,
    ) -> Vec<Line<'static>> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        lines
            .iter()
            .map(|line| {
                let line_no_nl = line.trim_end_matches('\n');
                let regions = highlighter
                    .highlight_line(line_no_nl, &self.syntax_set)
                    .unwrap_or_else(|_| vec![(SynStyle::default(), line_no_nl)]);

                let spans: Vec<Span> = regions
                    .into_iter()
                    .map(|(style, text)| {
                        Span::styled(text.to_string(), syn_style_to_ratatui(style))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn syn_style_to_ratatui(style: SynStyle) -> Style {
    let fg = style.foreground;
    let bg = style.background;
    let mut s = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if !(bg.r == 0 && bg.g == 0 && bg.b == 0) {
        s = s.bg(Color::Rgb(bg.r, bg.g, bg.b));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_per_kind() {
        let h = Highlighter::new("base16-ocean.dark");
        assert_ne!(
            h.syntax_for_kind(SourceKind::Html).name,
            h.syntax_for_kind(SourceKind::Css).name
        );
        assert_eq!(
            h.syntax_for_preview().name,
            h.syntax_for_kind(SourceKind::Html).name
        );
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let h = Highlighter::new("no-such-theme");
        let lines = vec!["<p>hi</p>".to_string()];
        let rendered = h.highlight_lines_to_ratatui(&lines, h.syntax_for_preview());
        assert_eq!(rendered.len(), 1);
    }
}
