use regex::Regex;

/// Strip the Project Gutenberg header and footer around the body of an ebook.
///
/// Looks for the standard `*** START OF ... ***` / `*** END OF ... ***`
/// markers. When a marker is missing, falls back to a chapter-heading
/// heuristic for the start and a trailing `*** END OF` heuristic for the end.
pub fn strip_gutenberg_markers(text: &str) -> String {
    let start_re =
        Regex::new(r"(?is)\*\*\* *START OF (THIS|THE) PROJECT GUTENBERG EBOOK.*?\*\*\*").unwrap();
    let end_re =
        Regex::new(r"(?is)\*\*\* *END OF (THIS|THE) PROJECT GUTENBERG EBOOK.*?\*\*\*").unwrap();

    let start_idx = match start_re.find(text) {
        Some(m) => m.end(),
        None => Regex::new(r"(?i)(?:^|\n)(chapter|i\.)\s+[A-Z0-9.\- ]{2,}")
            .unwrap()
            .find(text)
            .map(|m| m.start())
            .unwrap_or(0),
    };

    let end_idx = match end_re.find(text) {
        Some(m) => m.start(),
        None => Regex::new(r"(?is)\*\*\* *END OF .{0,80}$")
            .unwrap()
            .find(text)
            .map(|m| m.start())
            .unwrap_or(text.len()),
    };

    if start_idx >= end_idx {
        return String::new();
    }

    text[start_idx..end_idx].trim().to_string()
}
