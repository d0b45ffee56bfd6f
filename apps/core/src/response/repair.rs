//! Targeted repair of stray quotes inside known free-text fields.
//!
//! Models quote things inside explanations (`"explanation": "use "led" not
//! "helped""`), which breaks JSON. Escaping is applied only to the value of
//! each named field; the rest of the payload is left untouched.

use std::sync::LazyLock;

use regex::Regex;

/// `"key": "<value>"` where the value ends at the first quote that is followed
/// by another key, or by the end of the enclosing object/array.
static FIELD_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)("([A-Za-z_][A-Za-z0-9_]*)"\s*:\s*")(.*?)("\s*(?:,\s*"[A-Za-z_][A-Za-z0-9_]*"\s*:|\}|\]))"#,
    )
    .expect("valid regex")
});

/// Escapes interior quotes (and raw control characters) inside the string
/// values of `fields`. Values of other keys are left as they are.
pub fn repair_quotes(candidate: &str, fields: &[String]) -> String {
    let mut out = String::with_capacity(candidate.len() + 16);
    let mut pos = 0;

    // Each search resumes right after the value, so the key that terminated
    // one match can open the next.
    while let Some(caps) = FIELD_VALUE.captures_at(candidate, pos) {
        let (Some(key), Some(value)) = (caps.get(2), caps.get(3)) else {
            break;
        };
        out.push_str(&candidate[pos..value.start()]);
        if fields.iter().any(|f| f == key.as_str()) {
            out.push_str(&escape_interior(value.as_str()));
        } else {
            out.push_str(value.as_str());
        }
        pos = value.end();
    }

    out.push_str(&candidate[pos..]);
    out
}

fn escape_interior(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
