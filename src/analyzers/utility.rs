/// Mean of a summed count over `count` rows. Returns 0.0 for an empty group.
pub fn mean(sum: u64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

/// Case-sensitive literal substring match used by the search boxes.
///
/// An empty needle matches everything, but callers treat empty search text as
/// "no search" before getting here.
pub fn matches_search(haystack: &str, needle: &str) -> bool {
    haystack.contains(needle)
}

/// An empty search box means no search at all. Other input is used verbatim.
pub fn normalize_search(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_group() {
        assert_eq!(mean(100, 0), 0.0);
    }

    #[test]
    fn test_mean_normal_values() {
        assert_eq!(mean(300, 2), 150.0);
        assert_eq!(mean(1, 4), 0.25);
    }

    #[test]
    fn test_matches_search_is_case_sensitive() {
        assert!(matches_search("Line 2", "Line"));
        assert!(!matches_search("Line 2", "line"));
        assert!(matches_search("2호선", "호선"));
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search(None), None);
        assert_eq!(normalize_search(Some("")), None);
        assert_eq!(normalize_search(Some(" 강남")), Some(" 강남"));
    }
}
