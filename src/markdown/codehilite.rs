//! Code block highlighting: every block is wrapped in `<div class="codehilite">`
//! and blocks in a known language get `hl-` prefixed class spans for each
//! token. Blocks without a fenced language may name one on their first line
//! with `:::lang` or `#!lang`.

use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;
use syntect::html::ClassStyle;
use syntect::html::ClassedHTMLGenerator;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tracing::debug;

use super::unescape_html;

/// Prefix of every token class, `hl-keyword`, `hl-string` and so on.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<pre><code(?: class="language-([^"]*)")?>(.*?)</code></pre>"#).unwrap()
});

/// `:::python` or `#!python` alone on the first line. A `#!` line holding a
/// path, like `#!/bin/sh`, is part of the code.
static LANG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?::::|#!)([\w+#.-]+)[ \t]*(?:\n|$)").unwrap());

pub fn apply(html: &str) -> String {
    CODE_BLOCK
        .replace_all(html, |caps: &Captures| {
            let fenced = caps.get(1).map(|m| m.as_str().to_string());
            let body = &caps[2];

            let (lang, body) = match fenced {
                Some(lang) => (Some(lang), body),
                None => match LANG_LINE.captures(body) {
                    Some(line) => (Some(line[1].to_string()), &body[line[0].len()..]),
                    None => (None, body),
                },
            };

            let class = lang
                .as_ref()
                .map(|l| format!(r#" class="language-{}""#, l))
                .unwrap_or_default();

            let code = lang
                .as_deref()
                .and_then(|l| highlight(l, body))
                .unwrap_or_else(|| body.to_string());

            format!(r#"<div class="codehilite"><pre><code{class}>{code}</code></pre></div>"#)
        })
        .into_owned()
}

/// Token spans for the escaped code `body`, or `None` when `lang` is not a
/// known syntax.
fn highlight(lang: &str, body: &str) -> Option<String> {
    let syntax = SYNTAXES.find_syntax_by_token(lang)?;

    let code = unescape_html(body);
    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, CLASS_STYLE);

    for line in LinesWithEndings::from(&code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            debug!("highlighting {} failed, keeping plain code: {}", lang, e);
            return None;
        }
    }

    Some(generator.finalize())
}
