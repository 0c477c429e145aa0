//! Count formatting for log lines.

/// `"1 page"`, `"3 artifacts"`, `"0 entries"`.
///
/// Nouns ending in a consonant + `y` take `ies`.
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        return format!("1 {noun}");
    }
    let consonant_y = noun
        .strip_suffix('y')
        .and_then(|stem| stem.chars().last())
        .is_some_and(|c| !"aeiou".contains(c));
    match noun.strip_suffix('y') {
        Some(stem) if consonant_y => format!("{count} {stem}ies"),
        _ => format!("{count} {noun}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(1, "page"), "1 page");
        assert_eq!(plural_count(0, "page"), "0 pages");
        assert_eq!(plural_count(3, "artifact"), "3 artifacts");
        assert_eq!(plural_count(2, "entry"), "2 entries");
        assert_eq!(plural_count(1, "entry"), "1 entry");
        assert_eq!(plural_count(4, "day"), "4 days");
    }
}
