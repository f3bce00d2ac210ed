const MAX_STEM_LEN: usize = 80;

/// Deterministic destination names for one harvest run.
///
/// Every file is `{sanitized_query}_{ordinal}{extension}`; the ordinal keeps
/// names distinct within a run even when two items share a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPolicy {
    stem: String,
}

impl NamingPolicy {
    pub fn for_query(query: &str) -> Self {
        Self {
            stem: sanitize_query(query),
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn filename(&self, ordinal: u32, extension: &str) -> String {
        let extension = extension.trim_start_matches('.');
        format!("{}_{}.{}", self.stem, ordinal, extension)
    }
}

/// Windows-safe stem: whitespace and forbidden characters become `_`.
fn sanitize_query(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| {
            if c.is_whitespace() || is_forbidden(c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', '.'][..]);

    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }

    if compacted.is_empty() {
        compacted = "query".to_string();
    }
    if compacted.len() > MAX_STEM_LEN {
        let mut end = MAX_STEM_LEN;
        while !compacted.is_char_boundary(end) {
            end -= 1;
        }
        compacted.truncate(end);
    }
    if is_reserved_windows_name(&compacted) {
        compacted.push('_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::sanitize_query;

    #[test]
    fn spaces_and_separators_collapse_to_single_underscores() {
        assert_eq!(sanitize_query("red  panda / cubs"), "red_panda_cubs");
        assert_eq!(sanitize_query("  what?  "), "what");
    }

    #[test]
    fn empty_and_reserved_stems_are_patched() {
        assert_eq!(sanitize_query("???"), "query");
        assert_eq!(sanitize_query("con"), "con_");
    }

    #[test]
    fn long_multibyte_queries_truncate_on_char_boundary() {
        let stem = sanitize_query(&"é".repeat(60));
        assert!(stem.len() <= 80);
        assert_eq!(stem.chars().count(), 40);
    }
}
