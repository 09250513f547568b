use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#+)[ \t]*").unwrap());

/// Normalize raw model output for display.
///
/// Whitespace runs inside each line collapse to a single space, blank lines
/// survive as empty lines, and every line-leading run of `#` is followed by
/// exactly one space. Applying it twice gives the same text.
pub fn clean_response(text: &str) -> String {
    let collapsed = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    HEADING_MARKER_REGEX
        .replace_all(&collapsed, "${1} ")
        .into_owned()
}
