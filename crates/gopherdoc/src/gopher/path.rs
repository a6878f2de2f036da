//! Slash-separated path helpers for selectors.

/// Lexically cleans a slash-separated path.
///
/// Repeated separators collapse, `.` segments disappear, `..` removes the
/// preceding segment, and trailing separators are dropped. A rooted path stays
/// rooted and `..` cannot climb above its root. An empty result becomes `.`.
pub(crate) fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if rooted {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_owned()
    } else {
        joined
    }
}

/// Joins path elements with `/` and cleans the result.
///
/// Empty elements are ignored; joining only empty elements yields an empty
/// string.
pub(crate) fn join(elements: &[&str]) -> String {
    let parts: Vec<&str> = elements
        .iter()
        .copied()
        .filter(|element| !element.is_empty())
        .collect();
    if parts.is_empty() {
        return String::new();
    }
    clean(&parts.join("/"))
}

/// Last element of a path, ignoring trailing separators.
pub(crate) fn base(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
