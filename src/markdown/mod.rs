pub mod codehilite;
pub mod toc;

use tracing::debug;

use crate::error::ConvertError;

/// Turns markdown source into an HTML fragment.
pub trait MarkdownRenderer {
    fn to_html(&self, markdown: &str) -> Result<String, ConvertError>;
}

/// GitHub flavoured markdown with the code highlighting and table of
/// contents extensions applied to the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gfm;

impl MarkdownRenderer for Gfm {
    #[cfg(feature = "markdown")]
    fn to_html(&self, markdown: &str) -> Result<String, ConvertError> {
        let options = ::markdown::Options {
            parse: ::markdown::ParseOptions::gfm(),
            compile: ::markdown::CompileOptions {
                // Raw HTML in the document is kept as is.
                allow_dangerous_html: true,
                ..::markdown::CompileOptions::gfm()
            },
        };

        let html = ::markdown::to_html_with_options(markdown, &options)
            .map_err(|e| ConvertError::Markdown(e.to_string()))?;

        let html = codehilite::apply(&html);
        let html = toc::apply(&html);

        debug!("rendered {} bytes of markdown into {} bytes of html", markdown.len(), html.len());

        Ok(html)
    }

    #[cfg(not(feature = "markdown"))]
    fn to_html(&self, _markdown: &str) -> Result<String, ConvertError> {
        Err(ConvertError::missing(
            "markdown",
            "built without the `markdown` feature",
        ))
    }
}

/// Replace the characters that are significant in HTML text.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode the entities [`escape_html`] and the markdown compiler produce.
pub(crate) fn unescape_html(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
