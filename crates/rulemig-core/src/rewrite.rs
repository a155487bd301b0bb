use crate::mapping::RenameMapping;

/// Apply a rename mapping to rule text.
///
/// This is iterative whole-string substitution, not a tokenizer: for each
/// entry in mapping order, every occurrence of `old` in the *current* text
/// is replaced with `new`, so a replacement made by entry `k` can itself be
/// matched and replaced by entry `k+1`. Migrated output depends on that
/// cascade order, so it must not be reordered or collapsed into a single
/// pass. Matching is plain substring matching with no word-boundary or
/// regex semantics. Inert entries (empty `new`) are skipped.
pub fn rewrite(text: &str, mapping: &RenameMapping) -> String {
    let mut out = text.to_string();
    for entry in mapping.entries() {
        if entry.is_inert() {
            continue;
        }
        out = out.replace(&entry.old, &entry.new);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::RenameEntry;

    fn mapping(pairs: &[(&str, &str)]) -> RenameMapping {
        RenameMapping::from_entries(
            pairs
                .iter()
                .map(|(old, new)| RenameEntry {
                    old: old.to_string(),
                    new: new.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn replaces_every_occurrence() {
        let m = mapping(&[("amount", "billing__invoice__amount")]);
        assert_eq!(
            rewrite("amount > 0 && amount < limit", &m),
            "billing__invoice__amount > 0 && billing__invoice__amount < limit"
        );
    }

    #[test]
    fn entries_cascade_in_order() {
        // A replacement's output is visible to later entries.
        let m = mapping(&[("A", "B"), ("B", "C")]);
        assert_eq!(rewrite("A", &m), "C");
    }

    #[test]
    fn reversed_order_does_not_cascade() {
        let m = mapping(&[("B", "C"), ("A", "B")]);
        assert_eq!(rewrite("A", &m), "B");
    }

    #[test]
    fn non_colliding_mapping_is_idempotent() {
        let m = mapping(&[("foo", "crm__lead__foo"), ("bar", "crm__lead__bar")]);
        let once = rewrite("foo + bar", &m);
        assert_eq!(rewrite(&once, &m), once);
    }

    #[test]
    fn colliding_mapping_is_not_idempotent() {
        // "new" of the first entry contains the "old" of itself: repeated
        // application keeps growing the text.
        let m = mapping(&[("x", "xx")]);
        let once = rewrite("x", &m);
        let twice = rewrite(&once, &m);
        assert_eq!(once, "xx");
        assert_eq!(twice, "xxxx");
        assert_ne!(once, twice);
    }

    #[test]
    fn empty_new_leaves_token_unchanged() {
        let m = mapping(&[("keepme", "")]);
        assert_eq!(rewrite("keepme == 1", &m), "keepme == 1");
    }

    #[test]
    fn duplicate_old_tokens_apply_in_sequence() {
        let m = mapping(&[("a", "b"), ("a", "c")]);
        // First entry consumes every "a"; the second finds nothing left.
        assert_eq!(rewrite("a a", &m), "b b");
    }

    #[test]
    fn substring_matches_inside_longer_identifiers() {
        // No word-boundary semantics: "id" matches inside "valid".
        let m = mapping(&[("id", "ID")]);
        assert_eq!(rewrite("valid id", &m), "valID ID");
    }

    #[test]
    fn empty_mapping_is_identity() {
        let m = mapping(&[]);
        assert_eq!(rewrite("unchanged", &m), "unchanged");
    }
}
