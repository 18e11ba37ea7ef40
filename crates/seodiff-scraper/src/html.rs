//! Single-pass HTML tag scanner.
//!
//! Walks the document once, tracking open heading and `<title>` elements and
//! collecting the attributes of every `<meta>` tag. This is not a conforming
//! HTML parser: there is no implicit tag closing, and an end tag closes the
//! most recent open element of the same name together with anything opened
//! after it. Elements left open run to the end of the document.
//!
//! Text inside comments, `<script>` and `<style>` is skipped. Element text is
//! entity-decoded once the scan is complete.

use std::sync::LazyLock;

use regex::Regex;

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?"#)
        .expect("valid attribute regex")
});

/// Elements whose rendered text the extractor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrackedTag {
    Heading(u8),
    Title,
}

impl TrackedTag {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "h1" => Some(Self::Heading(1)),
            "h2" => Some(Self::Heading(2)),
            "h3" => Some(Self::Heading(3)),
            "h4" => Some(Self::Heading(4)),
            "h5" => Some(Self::Heading(5)),
            "h6" => Some(Self::Heading(6)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextElement {
    pub tag: TrackedTag,
    /// All descendant text, entity-decoded, untrimmed.
    pub text: String,
}

/// Lowercased attribute name with its decoded value (empty for bare attributes).
pub(crate) type Attributes = Vec<(String, String)>;

#[derive(Debug, Default)]
pub(crate) struct ScannedDocument {
    /// Tracked elements in document (opening) order.
    pub elements: Vec<TextElement>,
    /// Attributes of each `<meta>` tag in document order.
    pub metas: Vec<Attributes>,
}

/// Returns the value of `name` on a tag. With duplicates the last one wins.
pub(crate) fn attr<'a>(attrs: &'a Attributes, name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

pub(crate) fn scan(html: &str) -> ScannedDocument {
    let mut doc = ScannedDocument::default();
    // Indices into `doc.elements` of the elements currently open.
    let mut open: Vec<usize> = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        let Some(rel) = html[pos..].find('<') else {
            append_text(&mut doc, &open, &html[pos..]);
            break;
        };
        let lt = pos + rel;
        append_text(&mut doc, &open, &html[pos..lt]);
        let rest = &html[lt..];

        if let Some(comment) = rest.strip_prefix("<!--") {
            pos = comment.find("-->").map_or(html.len(), |i| lt + 4 + i + 3);
            continue;
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = rest.find('>').map_or(html.len(), |i| lt + i + 1);
            continue;
        }

        if let Some(after) = rest.strip_prefix("</") {
            let name = tag_name(after);
            if name.is_empty() {
                append_text(&mut doc, &open, "<");
                pos = lt + 1;
                continue;
            }
            pos = rest.find('>').map_or(html.len(), |i| lt + i + 1);
            if let Some(tag) = TrackedTag::from_name(&name) {
                close(&doc, &mut open, tag);
            }
            continue;
        }

        let name = tag_name(&rest[1..]);
        if name.is_empty() {
            append_text(&mut doc, &open, "<");
            pos = lt + 1;
            continue;
        }

        let body_start = lt + 1 + name.len();
        let Some(gt) = find_tag_end(html, body_start) else {
            // Unterminated start tag reads as text.
            append_text(&mut doc, &open, "<");
            pos = lt + 1;
            continue;
        };
        let body = &html[body_start..gt];
        let self_closing = body.trim_end().ends_with('/');
        pos = gt + 1;

        match name.as_str() {
            "script" | "style" => {
                if !self_closing {
                    let closing = format!("</{name}");
                    pos = find_ascii_ci(html, pos, &closing).unwrap_or(html.len());
                }
            }
            "meta" => doc.metas.push(parse_attributes(body)),
            _ => {
                if let Some(tag) = TrackedTag::from_name(&name) {
                    doc.elements.push(TextElement {
                        tag,
                        text: String::new(),
                    });
                    if !self_closing {
                        open.push(doc.elements.len() - 1);
                    }
                }
            }
        }
    }

    for element in &mut doc.elements {
        if element.text.contains('&') {
            element.text = html_escape::decode_html_entities(&element.text).into_owned();
        }
    }

    doc
}

fn append_text(doc: &mut ScannedDocument, open: &[usize], text: &str) {
    if text.is_empty() {
        return;
    }
    for &idx in open {
        doc.elements[idx].text.push_str(text);
    }
}

fn close(doc: &ScannedDocument, open: &mut Vec<usize>, tag: TrackedTag) {
    if let Some(depth) = open.iter().rposition(|&idx| doc.elements[idx].tag == tag) {
        open.truncate(depth);
    }
}

/// Lowercased tag name at the start of `s`; empty unless it starts with a letter.
fn tag_name(s: &str) -> String {
    if !s.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return String::new();
    }
    s.chars()
        .take_while(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Byte offset of the `>` that ends a start tag.
///
/// A quote opens a quoted value only right after `=` (whitespace allowed in
/// between); a quote inside an unquoted value such as `alt=Don't` is literal.
fn find_tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut after_eq = false;
    for (offset, &b) in html.as_bytes()[from..].iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
                after_eq = false;
            }
            continue;
        }
        match b {
            b'>' => return Some(from + offset),
            b'"' | b'\'' if after_eq => quote = Some(b),
            _ if b.is_ascii_whitespace() => {}
            _ => after_eq = b == b'=',
        }
    }
    None
}

/// Case-insensitive search for an ASCII `needle` starting at byte `from`.
fn find_ascii_ci(html: &str, from: usize, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    html.as_bytes()[from..]
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|i| from + i)
}

fn parse_attributes(body: &str) -> Attributes {
    ATTR_RE
        .captures_iter(body)
        .filter_map(|cap| {
            let name = cap.get(1)?.as_str().to_ascii_lowercase();
            let raw = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map_or("", |m| m.as_str());
            let value = html_escape::decode_html_entities(raw).into_owned();
            Some((name, value))
        })
        .collect()
}
