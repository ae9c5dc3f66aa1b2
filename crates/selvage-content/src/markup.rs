#![forbid(unsafe_code)]

//! Minimal inline-markup parser feeding a [`FragmentBuilder`].
//!
//! The accepted grammar is the subset editable regions actually contain:
//! text, character entities (`&amp;`, `&#233;`, `&#x2014;`), void `<br>`
//! elements, and balanced inline wrappers like `<b>` or `<a href="...">`.
//! Attributes are skipped, tag names are matched case-insensitively, and
//! anything malformed is an error rather than a best-effort guess.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `UnexpectedClose` | Close tag with no matching open | Error with tag and byte position |
//! | `MismatchedClose` | Close tag for a different open | Error naming both tags |
//! | `UnclosedTag` | Input ends inside an open element | Error with the open position |
//! | `UnterminatedTag` | `<` never reaches `>` | Error at the `<` |
//! | `EmptyTag` | `<>` or `</>` | Error at the `<` |
//! | `TooDeep` | Wrapper nesting past the parser's cap | Error at the open tag |
//! | `BadEntity` | `&` without a known entity and `;` | Error at the `&` |

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::fragment::FragmentBuilder;

/// Errors produced while parsing markup into a fragment.
///
/// Positions are byte offsets into the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// A close tag appeared with no element open.
    UnexpectedClose { tag: String, at: usize },
    /// A close tag did not match the innermost open element.
    MismatchedClose {
        expected: String,
        found: String,
        at: usize,
    },
    /// The input ended while an element was still open.
    UnclosedTag { tag: String, at: usize },
    /// A `<` was never terminated by `>`.
    UnterminatedTag { at: usize },
    /// A tag had no name.
    EmptyTag { at: usize },
    /// Wrapper nesting went past the parser's depth cap.
    TooDeep { at: usize },
    /// An `&` did not introduce a recognized entity.
    BadEntity { at: usize },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedClose { tag, at } => {
                write!(f, "close tag '{tag}' at byte {at} with nothing open")
            }
            Self::MismatchedClose {
                expected,
                found,
                at,
            } => {
                write!(
                    f,
                    "close tag '{found}' at byte {at} does not match open tag '{expected}'"
                )
            }
            Self::UnclosedTag { tag, at } => {
                write!(f, "tag '{tag}' opened at byte {at} is never closed")
            }
            Self::UnterminatedTag { at } => write!(f, "tag at byte {at} is never terminated"),
            Self::EmptyTag { at } => write!(f, "tag at byte {at} has no name"),
            Self::TooDeep { at } => {
                write!(f, "tag at byte {at} nests deeper than {MAX_NESTING_DEPTH} levels")
            }
            Self::BadEntity { at } => write!(f, "unrecognized entity at byte {at}"),
        }
    }
}

impl std::error::Error for MarkupError {}

/// Named entities the parser resolves. Numeric forms are handled separately.
fn entity_table() -> &'static FxHashMap<&'static str, char> {
    static TABLE: OnceLock<FxHashMap<&'static str, char>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = FxHashMap::default();
        table.insert("amp", '&');
        table.insert("lt", '<');
        table.insert("gt", '>');
        table.insert("quot", '"');
        table.insert("apos", '\'');
        table.insert("nbsp", '\u{a0}');
        table
    })
}

/// Longest entity body the parser will scan before giving up.
const MAX_ENTITY_LEN: usize = 32;

/// Deepest wrapper nesting the parser accepts; the build that follows
/// recurses once per level.
const MAX_NESTING_DEPTH: usize = 256;

/// Parse `source` into `builder`.
///
/// On success the builder holds the parsed tree with all elements closed.
/// On error the builder's contents are unspecified and it should be
/// discarded.
pub(crate) fn parse_into(source: &str, builder: &mut FragmentBuilder) -> Result<(), MarkupError> {
    let bytes = source.as_bytes();
    let mut pos = 0;
    // Open elements with the byte position of their '<', for error reporting.
    let mut open: Vec<(String, usize)> = Vec::new();
    let mut text = String::new();

    while pos < bytes.len() {
        match bytes[pos] {
            b'<' => {
                flush_text(&mut text, builder);
                pos = parse_tag(source, pos, &mut open, builder)?;
            }
            b'&' => {
                let (ch, next) = parse_entity(source, pos)?;
                text.push(ch);
                pos = next;
            }
            _ => {
                let run_end = next_special(bytes, pos);
                text.push_str(&source[pos..run_end]);
                pos = run_end;
            }
        }
    }

    flush_text(&mut text, builder);

    if let Some((tag, at)) = open.pop() {
        return Err(MarkupError::UnclosedTag { tag, at });
    }
    Ok(())
}

fn flush_text(text: &mut String, builder: &mut FragmentBuilder) {
    if !text.is_empty() {
        builder.text(std::mem::take(text));
    }
}

/// Byte index of the next `<` or `&`, or the end of input.
fn next_special(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'<' || b == b'&')
        .map_or(bytes.len(), |i| from + i)
}

/// Parse one tag starting at the `<` at `start`. Returns the byte index
/// just past the closing `>`.
fn parse_tag(
    source: &str,
    start: usize,
    open: &mut Vec<(String, usize)>,
    builder: &mut FragmentBuilder,
) -> Result<usize, MarkupError> {
    let bytes = source.as_bytes();
    let mut pos = start + 1;
    let closing = pos < bytes.len() && bytes[pos] == b'/';
    if closing {
        pos += 1;
    }

    let name_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
        pos += 1;
    }
    if pos == name_start {
        // Distinguish "no name" from "never terminated": `<>` and `</>`
        // have a visible terminator, a bare `<` at EOF does not.
        return if pos < bytes.len() && bytes[pos] == b'>' {
            Err(MarkupError::EmptyTag { at: start })
        } else {
            Err(MarkupError::UnterminatedTag { at: start })
        };
    }
    let name = source[name_start..pos].to_ascii_lowercase();

    // Skip attributes (or trailing junk on a close tag), honoring quotes.
    let mut self_closing = false;
    let mut quote: Option<u8> = None;
    loop {
        let Some(&b) = bytes.get(pos) else {
            return Err(MarkupError::UnterminatedTag { at: start });
        };
        pos += 1;
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'>' => break,
                b'"' | b'\'' => quote = Some(b),
                b'/' if bytes.get(pos) == Some(&b'>') => {
                    self_closing = true;
                    pos += 1;
                    break;
                }
                _ => {}
            },
        }
    }

    if closing {
        match open.pop() {
            None => {
                return Err(MarkupError::UnexpectedClose {
                    tag: name,
                    at: start,
                });
            }
            Some((expected, _)) if expected != name => {
                return Err(MarkupError::MismatchedClose {
                    expected,
                    found: name,
                    at: start,
                });
            }
            Some(_) => builder.close(),
        };
        return Ok(pos);
    }

    if name == "br" {
        // Void element; `<br>`, `<br/>`, and `<br />` all mean the same.
        builder.line_break();
    } else if self_closing {
        // Self-closed wrapper with no content. Open and close so empty
        // wrappers normalize away uniformly.
        builder.open(name);
        builder.close();
    } else {
        if open.len() >= MAX_NESTING_DEPTH {
            return Err(MarkupError::TooDeep { at: start });
        }
        open.push((name.clone(), start));
        builder.open(name);
    }
    Ok(pos)
}

/// Parse one entity starting at the `&` at `start`. Returns the decoded
/// character and the byte index just past the `;`.
fn parse_entity(source: &str, start: usize) -> Result<(char, usize), MarkupError> {
    let bytes = source.as_bytes();
    let body_start = start + 1;
    let mut pos = body_start;

    while pos < bytes.len() && bytes[pos] != b';' {
        if pos - body_start >= MAX_ENTITY_LEN || bytes[pos] == b'<' || bytes[pos] == b'&' {
            return Err(MarkupError::BadEntity { at: start });
        }
        pos += 1;
    }
    if pos >= bytes.len() {
        return Err(MarkupError::BadEntity { at: start });
    }

    let body = &source[body_start..pos];
    let ch = decode_entity(body).ok_or(MarkupError::BadEntity { at: start })?;
    Ok((ch, pos + 1))
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = if let Some(hex) = numeric.strip_prefix(['x', 'X']) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            numeric.parse::<u32>().ok()?
        };
        return char::from_u32(code);
    }
    entity_table().get(body).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;

    fn flat(source: &str) -> String {
        Fragment::from_markup(source)
            .expect("markup parse failed")
            .text()
    }

    fn err(source: &str) -> MarkupError {
        Fragment::from_markup(source).expect_err("expected parse error")
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(flat("just words"), "just words");
    }

    #[test]
    fn br_flattens_to_newline() {
        assert_eq!(flat("one<br>two"), "one\ntwo");
        assert_eq!(flat("one<br/>two"), "one\ntwo");
        assert_eq!(flat("one<br />two"), "one\ntwo");
    }

    #[test]
    fn inline_wrappers_are_transparent() {
        assert_eq!(flat("a <b>bold</b> word"), "a bold word");
        assert_eq!(flat("<i><b>deep</b></i>"), "deep");
    }

    #[test]
    fn attributes_are_skipped() {
        assert_eq!(flat(r#"<a href="/x" title='q>u<o&t'>link</a>"#), "link");
    }

    #[test]
    fn close_tags_match_case_insensitively() {
        assert_eq!(flat("<B>loud</b>"), "loud");
        assert_eq!(flat("one<BR>two"), "one\ntwo");
    }

    #[test]
    fn named_entities_decode() {
        assert_eq!(flat("fish &amp; chips"), "fish & chips");
        assert_eq!(flat("&lt;br&gt;"), "<br>");
        assert_eq!(flat("&quot;hi&quot; isn&apos;t"), "\"hi\" isn't");
        assert_eq!(flat("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn numeric_entities_decode() {
        assert_eq!(flat("caf&#233;"), "café");
        assert_eq!(flat("dash&#x2014;here"), "dash\u{2014}here");
        assert_eq!(flat("&#X42;"), "B");
    }

    #[test]
    fn unexpected_close_is_reported() {
        assert_eq!(
            err("text</b>"),
            MarkupError::UnexpectedClose {
                tag: "b".into(),
                at: 4
            }
        );
    }

    #[test]
    fn mismatched_close_names_both_tags() {
        assert_eq!(
            err("<b>text</i>"),
            MarkupError::MismatchedClose {
                expected: "b".into(),
                found: "i".into(),
                at: 7
            }
        );
    }

    #[test]
    fn unclosed_tag_points_at_open() {
        assert_eq!(
            err("ab<b>cd"),
            MarkupError::UnclosedTag {
                tag: "b".into(),
                at: 2
            }
        );
    }

    #[test]
    fn unterminated_tag_is_reported() {
        assert_eq!(err("text <b"), MarkupError::UnterminatedTag { at: 5 });
        assert_eq!(err("text <"), MarkupError::UnterminatedTag { at: 5 });
    }

    #[test]
    fn empty_tag_is_reported() {
        assert_eq!(err("a<>b"), MarkupError::EmptyTag { at: 1 });
        assert_eq!(err("a</>b"), MarkupError::EmptyTag { at: 1 });
    }

    #[test]
    fn bad_entities_are_reported() {
        assert_eq!(err("fish & chips"), MarkupError::BadEntity { at: 5 });
        assert_eq!(err("&bogus;"), MarkupError::BadEntity { at: 0 });
        assert_eq!(err("&#x110000;"), MarkupError::BadEntity { at: 0 });
        assert_eq!(err("&unterminated"), MarkupError::BadEntity { at: 0 });
    }

    #[test]
    fn nesting_past_the_depth_cap_is_reported() {
        let source = "<b>".repeat(MAX_NESTING_DEPTH + 1);
        assert_eq!(
            err(&source),
            MarkupError::TooDeep {
                at: MAX_NESTING_DEPTH * 3
            }
        );
    }

    #[test]
    fn nesting_at_the_depth_cap_parses() {
        let opens = "<b>".repeat(MAX_NESTING_DEPTH);
        let closes = "</b>".repeat(MAX_NESTING_DEPTH);
        assert_eq!(flat(&format!("{opens}x{closes}")), "x");
    }

    #[test]
    fn error_display_is_positioned() {
        let msg = err("<b>text</i>").to_string();
        assert!(msg.contains("'i'"), "{msg}");
        assert!(msg.contains("'b'"), "{msg}");
        assert!(msg.contains("byte 7"), "{msg}");
    }
}
