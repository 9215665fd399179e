/// Edit distance between two comparison keys.
///
/// Unit cost for each insertion, deletion and substitution, counted over
/// Unicode scalar values.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_distances() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("widgetone", "widget one"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn test_identity_and_symmetry() {
        let words = ["", "a", "acme", "acme corp", "ACME", "ăcme", "corp acme"];
        for a in words {
            assert_eq!(edit_distance(a, a), 0);
            for b in words {
                assert_eq!(edit_distance(a, b), edit_distance(b, a), "{a:?} vs {b:?}");
                if a != b {
                    assert!(edit_distance(a, b) > 0);
                }
            }
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(edit_distance("ă", "a"), 1);
        assert_eq!(edit_distance("șțâ", "sta"), 3);
    }

    #[test]
    fn test_near_miss_keys() {
        assert_eq!(edit_distance("acme widget 30", "acme widget x30"), 1);
        assert_eq!(edit_distance("paracetamol 500 mg", "paracetamol 500mg"), 1);
        assert_eq!(edit_distance("gamma", "grammar"), 2);
    }
}
