//! Utility helpers used across the application (name formatting, text layout).
//! Keep helpers small and well-documented for readability.

/// Capitalize a name the way records are keyed: first letter upper, the
/// rest lower.
///
/// Examples: `pikachu` -> `Pikachu`, `PIKACHU` -> `Pikachu`.
pub fn capitalize(s: &str) -> String {
    let mut chs = s.chars();
    match chs.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chs.as_str().to_lowercase(),
    }
}

/// Format an API identifier into a human-friendly form.
///
/// Examples: `lightning-rod` -> `Lightning Rod`, `mr-mime` -> `Mr Mime`.
pub fn format_name(name: &str) -> String {
    let replaced = name.replace('-', " ").replace('_', " ");
    let parts: Vec<String> = replaced.split_whitespace().map(capitalize).collect();
    parts.join(" ")
}

/// Format a stat identifier: separators become spaces, the whole name is
/// upper-cased.
///
/// Examples: `special-attack` -> `SPECIAL ATTACK`, `hp` -> `HP`.
pub fn stat_case(name: &str) -> String {
    name.replace('-', " ").replace('_', " ").to_uppercase()
}

/// Wrap text into lines no longer than `width` (simple greedy algorithm).
pub fn text_to_lines(s: &str, width: usize) -> Vec<String> {
    let mut lines = vec![];
    let mut current = String::new();
    for word in s.split_whitespace() {
        if current.len() + word.len() + 1 > width && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
