/// Returns the slice starting at the first `open` byte and ending where the
/// nesting depth of `open`/`close` returns to zero.
///
/// Brackets inside JSON strings are skipped first. If that never closes
/// (stray quotes in model output can desynchronise string tracking) the scan
/// is repeated counting every bracket.
pub fn balanced_span(text: &str, open: u8, close: u8) -> Option<&str> {
    let start = text.bytes().position(|b| b == open)?;
    let end = depth_scan(text.as_bytes(), start, open, close, true)
        .or_else(|| depth_scan(text.as_bytes(), start, open, close, false))?;
    Some(&text[start..=end])
}

fn depth_scan(bytes: &[u8], start: usize, open: u8, close: u8, skip_strings: bool) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        if b == b'"' && skip_strings {
            in_string = true;
        } else if b == open {
            depth += 1;
        } else if b == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }

    None
}
