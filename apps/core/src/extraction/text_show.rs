//! Primary strategy: collect the strings shown inside `BT ... ET` text objects.

use super::filter::join_filtered;
use super::literal::{decode_text, parse_hex, parse_literal};
use super::{Recovered, ScanInput};
use crate::models::ExtractionMethod;

/// Operators that show exactly one string operand.
const SINGLE_SHOW_OPERATORS: &[&[u8]] = &[b"Tj", b"'", b"\""];
const ARRAY_SHOW_OPERATOR: &[u8] = b"TJ";
/// Strings longer than this are kept even when no show operator follows them.
const CATCH_ALL_MIN_CHARS: usize = 2;

enum ArrayItem {
    Text(String),
    Adjust(f64),
}

pub fn scan(input: &ScanInput<'_>) -> Option<Recovered> {
    let mut pieces = Vec::new();
    for block in text_blocks(input.bytes) {
        collect_block(block, input.config.kerning_space_threshold, &mut pieces);
    }

    let text = join_filtered(pieces);
    (!text.is_empty()).then_some(Recovered {
        method: ExtractionMethod::Primary,
        text,
    })
}

/// Bodies of every text object, in document order. An unterminated final
/// object runs to the end of the buffer.
pub fn text_blocks(src: &[u8]) -> Vec<&[u8]> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while let Some(start) = find_operator(src, i, b"BT") {
        let body = start + 2;
        match find_block_end(src, body) {
            Some(end) => {
                blocks.push(&src[body..end]);
                i = end + 2;
            }
            None => {
                blocks.push(&src[body..]);
                break;
            }
        }
    }

    blocks
}

fn collect_block(block: &[u8], kerning_space_threshold: f64, pieces: &mut Vec<String>) {
    let mut i = 0;

    while i < block.len() {
        match block[i] {
            b'(' => {
                let Some((raw, next)) = parse_literal(block, i) else {
                    i += 1;
                    continue;
                };
                push_string(block, next, decode_text(&raw), pieces);
                i = next;
            }
            b'<' if block.get(i + 1) == Some(&b'<') => i += 2,
            b'<' => match parse_hex(block, i) {
                Some((raw, next)) => {
                    push_string(block, next, decode_text(&raw), pieces);
                    i = next;
                }
                None => i += 1,
            },
            b'[' => {
                let (items, next) = parse_array(block, i);
                if followed_by(block, next, &[ARRAY_SHOW_OPERATOR]) {
                    pieces.push(glue(&items, kerning_space_threshold));
                } else {
                    for item in items {
                        if let ArrayItem::Text(text) = item {
                            if text.chars().count() > CATCH_ALL_MIN_CHARS {
                                pieces.push(text);
                            }
                        }
                    }
                }
                i = next;
            }
            _ => i += 1,
        }
    }
}

fn push_string(block: &[u8], next: usize, text: String, pieces: &mut Vec<String>) {
    if followed_by(block, next, SINGLE_SHOW_OPERATORS)
        || text.chars().count() > CATCH_ALL_MIN_CHARS
    {
        pieces.push(text);
    }
}

/// Parses a `[ ... ]` array of strings and kerning adjustments starting at `src[start]`.
fn parse_array(src: &[u8], start: usize) -> (Vec<ArrayItem>, usize) {
    let mut items = Vec::new();
    let mut i = start + 1;

    while i < src.len() {
        match src[i] {
            b']' => return (items, i + 1),
            b'(' => match parse_literal(src, i) {
                Some((raw, next)) => {
                    items.push(ArrayItem::Text(decode_text(&raw)));
                    i = next;
                }
                None => i += 1,
            },
            b'<' => match parse_hex(src, i) {
                Some((raw, next)) => {
                    items.push(ArrayItem::Text(decode_text(&raw)));
                    i = next;
                }
                None => i += 1,
            },
            b'-' | b'+' | b'.' | b'0'..=b'9' => {
                let end = src[i..]
                    .iter()
                    .position(|b| !matches!(b, b'-' | b'+' | b'.' | b'0'..=b'9'))
                    .map_or(src.len(), |p| i + p);
                if let Some(value) = std::str::from_utf8(&src[i..end])
                    .ok()
                    .and_then(|s| s.parse::<f64>().ok())
                {
                    items.push(ArrayItem::Adjust(value));
                }
                i = end;
            }
            _ => i += 1,
        }
    }

    (items, src.len())
}

/// Kerned fragments of one `TJ` run belong together; only large negative
/// adjustments stand for a word gap.
fn glue(items: &[ArrayItem], kerning_space_threshold: f64) -> String {
    let mut out = String::new();
    for item in items {
        match item {
            ArrayItem::Text(text) => out.push_str(text),
            ArrayItem::Adjust(value) if *value < kerning_space_threshold => out.push(' '),
            ArrayItem::Adjust(_) => {}
        }
    }
    out
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace()
        || matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        )
}

/// True when `op` occurs at `src[i]` as a standalone token.
fn operator_at(src: &[u8], i: usize, op: &[u8]) -> bool {
    src[i..].starts_with(op)
        && (i == 0 || is_delimiter(src[i - 1]))
        && src.get(i + op.len()).map_or(true, |&b| is_delimiter(b))
}

fn find_operator(src: &[u8], from: usize, op: &[u8]) -> Option<usize> {
    (from..src.len()).find(|&i| operator_at(src, i, op))
}

/// Finds the `ET` closing a text object, skipping over string literals so
/// that an "ET" inside shown text does not end the block.
fn find_block_end(src: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < src.len() {
        if src[i] == b'(' {
            i = parse_literal(src, i).map_or(src.len(), |(_, next)| next);
        } else if operator_at(src, i, b"ET") {
            return Some(i);
        } else {
            i += 1;
        }
    }
    None
}

fn followed_by(src: &[u8], from: usize, operators: &[&[u8]]) -> bool {
    let Some(offset) = src[from.min(src.len())..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
    else {
        return false;
    };
    let at = from + offset;
    operators.iter().any(|op| operator_at(src, at, op))
}
