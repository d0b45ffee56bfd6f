use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::{normalize_key, scale};

/// A label of words joined by spaces, tabs, `_` or `-`, kept on one line.
const LABEL: &str = r"([A-Za-z][A-Za-z0-9]*(?:[ \t_-]+[A-Za-z0-9]+)*)";
/// A number, optionally negative or fractional, optionally followed by `%`.
const NUMBER: &str = r"(-?\d+(?:\.\d+)?)\s*%?";

/// Label/value layouts models use for scores, most specific first.
static LAYOUTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#""{label}"\s*:\s*"?{num}"#,
        r"\b{label}\s*:\s*{num}",
        r"\b{label}\s+-\s+{num}",
        r"\b{label}\s+score\s*:\s*{num}",
        r"\b{label}\s*=\s*{num}",
    ]
    .iter()
    .map(|layout| {
        let pattern = layout.replace("{label}", LABEL).replace("{num}", NUMBER);
        Regex::new(&format!("(?i){pattern}")).expect("valid regex")
    })
    .collect()
});

/// Pulls a raw value for each category out of free text. Matching is case
/// insensitive and treats `_`, `-` and whitespace inside a category name as
/// interchangeable. A label may carry leading words ("Overall clarity: 7").
/// The earliest layout with a match decides a category; within a layout the
/// first occurrence wins. Categories with no match are left out.
pub fn raw_scores_from_text(text: &str, categories: &[String]) -> BTreeMap<String, f64> {
    let wanted: Vec<(String, &String)> = categories
        .iter()
        .map(|c| (normalize_key(c), c))
        .filter(|(key, _)| !key.is_empty())
        .collect();

    let mut found = BTreeMap::new();
    for layout in LAYOUTS.iter() {
        if found.len() == wanted.len() {
            break;
        }
        for caps in layout.captures_iter(text) {
            let (Some(label), Some(number)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Some(category) = matching_category(&normalize_key(label.as_str()), &wanted) else {
                continue;
            };
            if found.contains_key(category) {
                continue;
            }
            if let Some(value) = scale::parse_str(number.as_str()) {
                found.insert(category.clone(), value);
            }
        }
    }
    found
}

pub fn raw_score_for(text: &str, category: &str) -> Option<f64> {
    raw_scores_from_text(text, &[category.to_string()])
        .into_values()
        .next()
}

/// The longest category whose normalized name is the label or ends it.
fn matching_category<'a>(label: &str, wanted: &[(String, &'a String)]) -> Option<&'a String> {
    wanted
        .iter()
        .filter(|(key, _)| {
            label == key
                || label
                    .strip_suffix(key.as_str())
                    .is_some_and(|rest| rest.ends_with('_'))
        })
        .max_by_key(|(key, _)| key.len())
        .map(|(_, category)| *category)
}
