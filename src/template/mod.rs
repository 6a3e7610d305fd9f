use crate::markdown::escape_html;

pub const DEFAULT_TITLE: &str = "Portfolio Documentation - Complete Guide";

const PRINT_CSS: &str = include_str!("print.css");
const SCREEN_CSS: &str = include_str!("screen.css");

/// The page a rendered markdown fragment is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// A4 pages with numbered footers, for the PDF renderer.
    Print,
    /// A centered column for browsers, keeping the page break rules for
    /// the browser's own print to PDF.
    Screen,
}

impl Template {
    pub fn css(&self) -> &'static str {
        match self {
            Template::Print => PRINT_CSS,
            Template::Screen => SCREEN_CSS,
        }
    }

    /// Build a complete HTML document around `fragment`.
    pub fn render(&self, fragment: &str, title: &str) -> String {
        let css = self.css();

        let mut doc = String::with_capacity(fragment.len() + css.len() + 256);
        doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        doc.push_str("<meta charset=\"utf-8\">\n");
        doc.push_str("<title>");
        doc.push_str(&escape_html(title));
        doc.push_str("</title>\n<style>\n");
        doc.push_str(css);
        doc.push_str("</style>\n</head>\n<body>\n");
        doc.push_str(fragment);
        if !fragment.ends_with('\n') {
            doc.push('\n');
        }
        doc.push_str("</body>\n</html>\n");
        doc
    }
}
