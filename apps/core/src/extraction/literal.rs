//! Decoding of PDF string objects: `( ... )` literals and `< ... >` hex strings.
//! Every byte of the source is treated as one character.

/// Parses the literal string whose opening `(` sits at `src[start]`.
/// Returns the unescaped bytes and the index just past the closing `)`.
/// Unterminated literals run to the end of the buffer.
pub fn parse_literal(src: &[u8], start: usize) -> Option<(Vec<u8>, usize)> {
    if src.get(start) != Some(&b'(') {
        return None;
    }

    let mut out = Vec::new();
    let mut depth = 1usize;
    let mut i = start + 1;

    while i < src.len() {
        match src[i] {
            b'\\' => {
                i = unescape_at(src, i, &mut out);
                continue;
            }
            b'(' => {
                depth += 1;
                out.push(b'(');
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((out, i + 1));
                }
                out.push(b')');
            }
            b => out.push(b),
        }
        i += 1;
    }

    Some((out, src.len()))
}

/// Unescapes the body of a literal whose delimiters were already stripped.
pub fn unescape(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        if body[i] == b'\\' {
            i = unescape_at(body, i, &mut out);
        } else {
            out.push(body[i]);
            i += 1;
        }
    }
    out
}

/// Handles the escape sequence starting at the backslash `src[i]`.
/// Returns the index of the first byte after the sequence.
fn unescape_at(src: &[u8], i: usize, out: &mut Vec<u8>) -> usize {
    let Some(&next) = src.get(i + 1) else {
        return i + 1;
    };
    match next {
        b'n' => out.push(b'\n'),
        b'r' => out.push(b'\r'),
        b't' => out.push(b'\t'),
        b'b' => out.push(0x08),
        b'f' => out.push(0x0c),
        b'0'..=b'7' => {
            let mut value: u32 = 0;
            let mut j = i + 1;
            while j < src.len() && j < i + 4 && (b'0'..=b'7').contains(&src[j]) {
                value = value * 8 + u32::from(src[j] - b'0');
                j += 1;
            }
            out.push((value & 0xff) as u8);
            return j;
        }
        // Line continuation.
        b'\r' => {
            if src.get(i + 2) == Some(&b'\n') {
                return i + 3;
            }
        }
        b'\n' => {}
        other => out.push(other),
    }
    i + 2
}

/// Parses the hex string whose opening `<` sits at `src[start]`.
/// Whitespace is ignored and an odd trailing digit is padded with zero.
///
/// The scan stops at the first byte that is neither a hex digit nor
/// whitespace, so a failed parse only ever reads the run it rejects.
pub fn parse_hex(src: &[u8], start: usize) -> Option<(Vec<u8>, usize)> {
    if src.get(start) != Some(&b'<') {
        return None;
    }

    let mut digits = Vec::new();
    let mut end = None;
    for (i, &b) in src.iter().enumerate().skip(start + 1) {
        match b {
            b'>' => {
                end = Some(i);
                break;
            }
            b if b.is_ascii_hexdigit() => digits.push(b),
            b if b.is_ascii_whitespace() => {}
            _ => return None,
        }
    }
    let end = end?;

    let out = digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0]);
            let lo = pair.get(1).map(|&d| hex_value(d)).unwrap_or(0);
            (hi << 4) | lo
        })
        .collect();
    Some((out, end + 1))
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Turns raw string bytes into text. UTF-16BE when the `FE FF` marker is
/// present, UTF-8 when the bytes happen to be valid non-ASCII UTF-8, Latin-1
/// otherwise.
pub fn decode_text(raw: &[u8]) -> String {
    if let Some(utf16) = raw.strip_prefix(&[0xfe_u8, 0xff]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if !raw.is_ascii() {
        if let Ok(s) = std::str::from_utf8(raw) {
            return s.to_string();
        }
    }
    latin1(raw)
}

pub fn latin1(raw: &[u8]) -> String {
    raw.iter().map(|&b| b as char).collect()
}
