// Plain-text output for bookmarks, optionally colored from the theme palette
use linkvault_core::theme::{Color, Palette};
use linkvault_core::Bookmark;

/// Descriptions longer than this are cut in listings
pub const DESCRIPTION_PREVIEW_CHARS: usize = 120;

/// Listings go to stdout and errors to stderr, so each stream decides on
/// color separately.
pub struct Renderer {
    palette: Option<Palette>,
    error_palette: Option<Palette>,
}

impl Renderer {
    /// Renderer that emits 24-bit color escapes on both streams
    pub fn colored(palette: Palette) -> Self {
        Self::for_streams(palette, true, true)
    }

    pub fn plain() -> Self {
        Self {
            palette: None,
            error_palette: None,
        }
    }

    pub fn for_streams(palette: Palette, color_stdout: bool, color_stderr: bool) -> Self {
        Self {
            palette: color_stdout.then_some(palette),
            error_palette: color_stderr.then_some(palette),
        }
    }

    fn paint(&self, text: &str, pick: fn(&Palette) -> Color) -> String {
        paint_with(self.palette.as_ref(), text, pick)
    }

    pub fn bookmark(&self, bookmark: &Bookmark) -> String {
        let mut out = format!(
            "{} {}\n  {}\n",
            self.paint(&bookmark.title, |p| p.title),
            self.paint(&format!("[{}]", bookmark.id), |p| p.muted),
            self.paint(&bookmark.url, |p| p.link),
        );

        if !bookmark.description.is_empty() {
            out.push_str(&format!(
                "  {}\n",
                truncate(&bookmark.description, DESCRIPTION_PREVIEW_CHARS)
            ));
        }

        if !bookmark.tags.is_empty() {
            let tags: Vec<String> = bookmark
                .tags
                .iter()
                .map(|t| self.paint(&format!("#{}", t), |p| p.tag))
                .collect();
            out.push_str(&format!("  {}\n", tags.join(" ")));
        }

        out
    }

    /// Header plus every bookmark, or the empty-state line
    pub fn listing(&self, shown: &[&Bookmark], label: &str, tag: Option<&str>) -> String {
        let mut out = format!("Showing {}\n", label);
        let hint = match tag {
            Some(tag) => format!("Filtered by tag: {}", tag),
            None => "Use --tag to filter".to_string(),
        };
        out.push_str(&self.paint(&hint, |p| p.muted));
        out.push_str("\n\n");

        if shown.is_empty() {
            out.push_str("No bookmarks yet.\n");
            return out;
        }

        let blocks: Vec<String> = shown.iter().map(|b| self.bookmark(b)).collect();
        out.push_str(&blocks.join("\n"));
        out
    }

    pub fn error(&self, message: &str) -> String {
        paint_with(self.error_palette.as_ref(), message, |p| p.error)
    }
}

fn paint_with(palette: Option<&Palette>, text: &str, pick: fn(&Palette) -> Color) -> String {
    match palette {
        Some(palette) => {
            let c = pick(palette);
            format!("\x1b[38;2;{};{};{}m{}\x1b[0m", c.r, c.g, c.b, text)
        }
        None => text.to_string(),
    }
}

/// Cut to `max` chars and mark the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkvault_core::Theme;

    fn sample() -> Bookmark {
        Bookmark {
            id: "12".into(),
            url: "https://docs.rs".to_string(),
            title: "Docs.rs".to_string(),
            description: "x".repeat(130),
            tags: vec!["rust".to_string(), "docs".to_string()],
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 120), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ééé", 3), "ééé");
    }

    #[test]
    fn test_plain_bookmark() {
        let text = Renderer::plain().bookmark(&sample());
        let expected = format!(
            "Docs.rs [12]\n  https://docs.rs\n  {}...\n  #rust #docs\n",
            "x".repeat(120)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_listing() {
        let text = Renderer::plain().listing(&[], "0 of 0", None);
        assert!(text.starts_with("Showing 0 of 0\n"));
        assert!(text.ends_with("No bookmarks yet.\n"));
    }

    #[test]
    fn test_listing_with_tag() {
        let b = sample();
        let text = Renderer::plain().listing(&[&b], "1 of 4", Some("rust"));
        assert!(text.contains("Filtered by tag: rust"));
        assert!(text.contains("Docs.rs [12]"));
    }

    #[test]
    fn test_colored_output_uses_palette() {
        let renderer = Renderer::colored(Theme::Dark.palette());
        let text = renderer.error("boom");
        // rose-200 from the dark palette
        assert_eq!(text, "\x1b[38;2;254;205;211mboom\x1b[0m");
    }

    #[test]
    fn test_redirected_stderr_gets_plain_errors() {
        let renderer = Renderer::for_streams(Theme::Dark.palette(), true, false);
        assert_eq!(renderer.error("boom"), "boom");
        assert!(renderer.bookmark(&sample()).contains("\x1b[38;2;"));

        let renderer = Renderer::for_streams(Theme::Dark.palette(), false, true);
        assert!(!renderer.bookmark(&sample()).contains('\x1b'));
        assert!(renderer.error("boom").starts_with("\x1b[38;2;"));
    }
}
