use crate::schema::NAME_SEPARATOR;

/// Whether `name` matches the setting pattern `pattern`.
///
/// Segments are compared one by one. A `*` segment stands for one non-empty
/// segment of word characters; when it is the last segment of the pattern it
/// also takes any further segments, so `systemProp.*` covers
/// `systemProp.http.proxyHost`.
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    let pattern_parts: Vec<&str> = pattern.split(NAME_SEPARATOR).collect();
    let name_parts: Vec<&str> = name.split(NAME_SEPARATOR).collect();
    let open_ended = pattern_parts.last() == Some(&"*");

    if name_parts.len() < pattern_parts.len()
        || (!open_ended && name_parts.len() != pattern_parts.len())
    {
        return false;
    }

    let head_matches = pattern_parts
        .iter()
        .zip(&name_parts)
        .all(|(expected, part)| (*expected == "*" && is_word(part)) || expected == part);

    head_matches && name_parts[pattern_parts.len()..].iter().all(|part| is_word(part))
}

fn is_word(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_single_segment_matches() {
        assert!(matches_pattern("git.name", "git.name"));
        assert!(matches_pattern("templates.mappings.*", "templates.mappings.spring_boot"));
        assert!(matches_pattern("a.*.c", "a.b.c"));

        assert!(!matches_pattern("git.name", "git.names"));
        assert!(!matches_pattern("a.*.c", "a.b.d"));
        assert!(!matches_pattern("a.*.c", "a.b.x.c"));
    }

    #[test]
    fn test_trailing_wildcard_is_open_ended() {
        assert!(matches_pattern("systemProp.*", "systemProp.http.proxyHost"));
        assert!(matches_pattern("templates.mappings.*", "templates.mappings.a.b"));

        assert!(!matches_pattern("templates.mappings.*", "templates.mappings"));
        assert!(!matches_pattern("templates.mappings.*", "templates.mappings."));
        assert!(!matches_pattern("templates.mappings.*", "templates.mappings.a-b"));
        assert!(!matches_pattern("systemProp.*", "systemProp.http..port"));
    }
}
