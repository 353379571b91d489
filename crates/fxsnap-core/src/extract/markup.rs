//! Forward-only scanner that pulls table rows out of an HTML document.
//!
//! Only `<tr>`, `<td>`, `</td>` and `</tr>` change state. Every other tag is
//! skipped, text inside a cell is concatenated across interleaved markup, and
//! comments, `<script>` and `<style>` bodies are never treated as cell text.

use std::borrow::Cow;

/// Streaming table-row scanner.
#[derive(Debug, Default)]
pub struct TableScanner {
    row: Vec<String>,
    cell: String,
    in_cell: bool,
}

impl TableScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans a complete document and returns every closed row's cleaned cells.
    pub fn scan(html: &str) -> Vec<Vec<String>> {
        let mut scanner = Self::new();
        let mut rows = Vec::new();
        let mut rest = html;

        while let Some(open) = rest.find('<') {
            scanner.on_text(&rest[..open]);
            let markup = &rest[open..];

            if !starts_tag(markup) {
                scanner.on_text("<");
                rest = &markup[1..];
                continue;
            }

            if let Some(after) = markup.strip_prefix("<!--") {
                rest = after.find("-->").map_or("", |end| &after[end + 3..]);
                continue;
            }

            let Some(close) = markup.find('>') else {
                // Unterminated tag at end of input.
                rest = "";
                break;
            };

            let tag = &markup[1..close];
            rest = &markup[close + 1..];

            if let Some(raw_text) = raw_text_element(tag) {
                rest = skip_raw_text(rest, raw_text);
                continue;
            }

            if let Some(row) = scanner.on_tag(tag) {
                rows.push(row);
            }
        }

        scanner.on_text(rest);
        rows
    }

    fn on_text(&mut self, text: &str) {
        if self.in_cell && !text.is_empty() {
            self.cell.push_str(&decode_entities(text));
        }
    }

    fn on_tag(&mut self, tag: &str) -> Option<Vec<String>> {
        let (closing, body) = match tag.strip_prefix('/') {
            Some(body) => (true, body),
            None => (false, tag),
        };
        let name_end = body
            .find(|ch: char| !ch.is_ascii_alphanumeric())
            .unwrap_or(body.len());
        let name = &body[..name_end];

        if name.eq_ignore_ascii_case("tr") {
            if closing {
                self.in_cell = false;
                self.cell.clear();
                return Some(std::mem::take(&mut self.row));
            }
            self.row.clear();
            self.cell.clear();
        } else if name.eq_ignore_ascii_case("td") {
            if closing {
                self.in_cell = false;
                let cell = std::mem::take(&mut self.cell);
                self.row.push(clean_cell(&cell));
            } else {
                self.in_cell = true;
                self.cell.clear();
            }
        }

        None
    }
}

fn starts_tag(markup: &str) -> bool {
    markup[1..]
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '/' || ch == '!' || ch == '?')
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    let name_end = tag
        .find(|ch: char| !ch.is_ascii_alphanumeric())
        .unwrap_or(tag.len());
    let name = &tag[..name_end];
    if tag.ends_with('/') {
        return None;
    }
    if name.eq_ignore_ascii_case("script") {
        Some("</script")
    } else if name.eq_ignore_ascii_case("style") {
        Some("</style")
    } else {
        None
    }
}

fn skip_raw_text<'a>(rest: &'a str, closing: &str) -> &'a str {
    let lowered = rest.to_ascii_lowercase();
    match lowered.find(closing) {
        Some(start) => {
            let after = &rest[start..];
            after.find('>').map_or("", |end| &after[end + 1..])
        }
        None => "",
    }
}

/// Non-breaking spaces become plain spaces, then surrounding whitespace is trimmed.
pub fn clean_cell(raw: &str) -> String {
    raw.replace('\u{a0}', " ").trim().to_owned()
}

/// Decodes the character references that show up in rate tables.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match candidate.find(';').filter(|end| *end <= 10) {
            Some(end) => match decode_reference(&candidate[1..end]) {
                Some(ch) => {
                    decoded.push(ch);
                    rest = &candidate[end + 1..];
                }
                None => {
                    decoded.push('&');
                    rest = &candidate[1..];
                }
            },
            None => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }

    decoded.push_str(rest);
    Cow::Owned(decoded)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "nbsp" => Some('\u{a0}'),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}
