/// Orders registry names case-insensitively and drops exact duplicates.
///
/// Names that differ only by case keep a deterministic order by falling back
/// to a byte comparison.
pub fn sort_registry(mut names: Vec<String>) -> Vec<String> {
    names.sort_by_cached_key(|name| (name.to_lowercase(), name.clone()));
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn sorts_case_insensitively() {
        let sorted = sort_registry(owned(&["banana", "Apple", "cherry"]));
        assert_eq!(sorted, owned(&["Apple", "banana", "cherry"]));
    }

    #[test]
    fn removes_duplicates_but_keeps_case_variants() {
        let sorted = sort_registry(owned(&["b.pdf", "a.pdf", "B.pdf", "a.pdf"]));
        assert_eq!(sorted, owned(&["a.pdf", "B.pdf", "b.pdf"]));
    }

    #[test]
    fn empty_stays_empty() {
        assert!(sort_registry(Vec::new()).is_empty());
    }
}
