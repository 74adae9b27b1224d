use crossterm::style::{Color, Stylize};
use std::io::IsTerminal;

/// Semantic marker on a rendered piece of text, independent of how it looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Plain,
    Header,
    Label,
    Value,
    Important,
    Fixed,
    Critical,
    High,
    Medium,
}

/// Text plus the emphasis it should be shown with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tag: Tag,
}

impl Cell {
    pub fn new<S: Into<String>>(text: S, tag: Tag) -> Self {
        Cell {
            text: text.into(),
            tag,
        }
    }

    pub fn plain<S: Into<String>>(text: S) -> Self {
        Cell::new(text, Tag::Plain)
    }

    pub fn value<S: Into<String>>(text: S) -> Self {
        Cell::new(text, Tag::Value)
    }

    pub fn empty() -> Self {
        Cell::plain("")
    }
}

/// Maps tags to terminal styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presenter {
    Color,
    Plain,
}

impl Presenter {
    /// Colors are used for a terminal on stdout unless disabled by flag or `NO_COLOR`.
    pub fn detect(no_color: bool) -> Self {
        if !no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal() {
            Presenter::Color
        } else {
            Presenter::Plain
        }
    }

    pub fn paint(&self, text: &str, tag: Tag) -> String {
        if *self == Presenter::Plain || text.is_empty() {
            return text.to_string();
        }

        let styled = match tag {
            Tag::Plain => return text.to_string(),
            Tag::Header => text.with(Color::Cyan).bold(),
            Tag::Label => text.with(Color::Yellow).bold(),
            Tag::Value => text.with(Color::White),
            Tag::Important | Tag::Critical => text.with(Color::Red).bold(),
            Tag::Fixed => text.with(Color::Green).bold(),
            Tag::High => text.with(Color::Magenta).bold(),
            Tag::Medium => text.with(Color::Yellow).bold(),
        };
        styled.to_string()
    }

    pub fn paint_cell(&self, cell: &Cell) -> String {
        self.paint(&cell.text, cell.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_strips_tags() {
        let p = Presenter::Plain;
        assert_eq!(p.paint("YES", Tag::Important), "YES");
        assert_eq!(p.paint_cell(&Cell::new("9.8", Tag::Critical)), "9.8");
    }

    #[test]
    fn test_color_wraps_text() {
        let p = Presenter::Color;
        let out = p.paint("YES", Tag::Important);
        assert!(out.contains("YES"));
        assert!(out.starts_with('\x1b'));
        assert_ne!(out, "YES");
    }

    #[test]
    fn test_color_leaves_plain_and_empty_alone() {
        let p = Presenter::Color;
        assert_eq!(p.paint("no", Tag::Plain), "no");
        assert_eq!(p.paint("", Tag::Critical), "");
    }
}
