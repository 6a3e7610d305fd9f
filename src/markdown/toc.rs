//! Table of contents: gives every heading an anchor id and expands a
//! `[TOC]` paragraph into a nested list of links to those anchors.

use std::collections::HashSet;
use std::sync::LazyLock;

use deunicode::deunicode;
use regex::Captures;
use regex::Regex;

use super::escape_html;
use super::unescape_html;

/// The paragraph markdown renders for a line holding only `[TOC]`.
const MARKER: &str = "<p>[TOC]</p>";

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h([1-6])>(.*?)</h[1-6]>").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static NOT_SLUG_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*)_([0-9]+)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    /// Plain text of the heading, tags stripped and entities decoded.
    pub text: String,
}

/// Add ids to the headings of `html` and replace every `[TOC]` marker.
pub fn apply(html: &str) -> String {
    let (html, headings) = assign_ids(html);

    if !html.contains(MARKER) {
        return html;
    }

    html.replace(MARKER, &render(&headings))
}

/// Headings of an HTML fragment, in document order, with the ids [`apply`]
/// would give them.
pub fn headings(html: &str) -> Vec<Heading> {
    assign_ids(html).1
}

fn assign_ids(html: &str) -> (String, Vec<Heading>) {
    let mut headings = Vec::new();
    let mut used = HashSet::new();

    let out = HEADING
        .replace_all(html, |caps: &Captures| {
            let level: u8 = caps[1].parse().unwrap_or(1);
            let inner = &caps[2];
            let text = text_content(inner);
            let id = unique(slugify(&text), &mut used);

            let tag = format!(r#"<h{level} id="{id}">{inner}</h{level}>"#);
            headings.push(Heading { level, id, text });
            tag
        })
        .into_owned();

    (out, headings)
}

/// A heading and the indices of the headings listed under it.
struct Entry<'a> {
    heading: &'a Heading,
    children: Vec<usize>,
}

/// Arrange headings into a tree. A heading goes under the closest earlier
/// heading of a shallower level, so skipped levels do not push later,
/// shallower headings out of their parent.
///
/// Returns every entry plus the indices of the top level ones.
fn nest(headings: &[Heading]) -> (Vec<Entry<'_>>, Vec<usize>) {
    let mut entries: Vec<Entry> = Vec::with_capacity(headings.len());
    let mut roots = Vec::new();

    let Some(first) = headings.first() else {
        return (entries, roots);
    };

    entries.push(Entry {
        heading: first,
        children: Vec::new(),
    });
    roots.push(0);

    let mut last = 0;
    let mut levels = vec![first.level];
    // Entries whose sublist is open, outermost first.
    let mut parents: Vec<usize> = Vec::new();

    for heading in &headings[1..] {
        let idx = entries.len();
        let level = heading.level;
        entries.push(Entry {
            heading,
            children: Vec::new(),
        });

        if levels.last().is_some_and(|&l| level < l) {
            levels.pop();
            let to_pop = parents
                .iter()
                .rev()
                .take_while(|&&p| level <= entries[p].heading.level)
                .count();
            levels.truncate(levels.len().saturating_sub(to_pop));
            parents.truncate(parents.len() - to_pop);
            levels.push(level);
        }

        if levels.last() == Some(&level) {
            match parents.last() {
                Some(&p) => entries[p].children.push(idx),
                None => roots.push(idx),
            }
        } else {
            entries[last].children.push(idx);
            parents.push(last);
            levels.push(level);
        }

        last = idx;
    }

    (entries, roots)
}

/// Build the `<div class="toc">` block.
fn render(headings: &[Heading]) -> String {
    let (entries, roots) = nest(headings);

    let mut out = String::from("<div class=\"toc\">\n");
    if !roots.is_empty() {
        render_list(&entries, &roots, &mut out);
    }
    out.push_str("</div>");
    out
}

fn render_list(entries: &[Entry], list: &[usize], out: &mut String) {
    out.push_str("<ul>\n");

    for &idx in list {
        let entry = &entries[idx];
        out.push_str(&format!(
            r##"<li><a href="#{}">{}</a>"##,
            entry.heading.id,
            escape_html(&entry.heading.text)
        ));

        if !entry.children.is_empty() {
            out.push('\n');
            render_list(entries, &entry.children, out);
        }

        out.push_str("</li>\n");
    }

    out.push_str("</ul>\n");
}

fn text_content(html: &str) -> String {
    unescape_html(&TAG.replace_all(html, ""))
}

/// Transliterate to ASCII, drop everything but word characters, spaces and
/// hyphens, lowercase, and join words with `-`.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let kept = NOT_SLUG_CHAR.replace_all(&ascii, "");
    let lowered = kept.trim().to_lowercase();

    SEPARATORS.replace_all(&lowered, "-").into_owned()
}

/// `id` if it is free and not empty, otherwise the first free one of
/// `id_1`, `id_2`, ... A trailing `_<n>` already on `id` is counted up.
fn unique(id: String, used: &mut HashSet<String>) -> String {
    let mut id = id;

    while id.is_empty() || used.contains(&id) {
        let next = match NUMBERED.captures(&id) {
            Some(c) => format!("{}_{}", &c[1], c[2].parse::<u64>().unwrap_or(0) + 1),
            None => format!("{id}_1"),
        };
        id = next;
    }

    used.insert(id.clone());
    id
}
