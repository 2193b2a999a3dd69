/// Levenshtein distance over Unicode scalar values.
///
/// Case-sensitive; callers lower-case both sides when they want otherwise.
/// Only the previous DP row is read, so two rows are kept.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut cur = vec![0usize; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            cur[j + 1] = if ca == *cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b_len]
}

/// Distance with absent strings read as empty.
pub fn levenshtein_opt(a: Option<&str>, b: Option<&str>) -> usize {
    levenshtein(a.unwrap_or_default(), b.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_strings_have_zero_distance() {
        assert_eq!(levenshtein("строка", "строка"), 0);
        assert_eq!(levenshtein("", ""), 0);
    }

    #[test]
    fn counts_chars_not_bytes() {
        assert_eq!(levenshtein("строка", "строкаа"), 1);
        assert_eq!(levenshtein("кот", "кит"), 1);
        assert_eq!(levenshtein("строка", "собака"), 3);
        assert_eq!(levenshtein("строка", "вафля"), 6);
    }

    #[test]
    fn empty_side_costs_other_length() {
        assert_eq!(levenshtein("", "petrov"), 6);
        assert_eq!(levenshtein("петров", ""), 6);
    }

    #[test]
    fn classic_examples() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("ivanov", "ivann"), 2);
    }

    #[test]
    fn is_case_sensitive() {
        assert_eq!(levenshtein("Ivan", "ivan"), 1);
    }

    #[test]
    fn absent_reads_as_empty() {
        assert_eq!(levenshtein_opt(None, Some("abc")), 3);
        assert_eq!(levenshtein_opt(Some("abc"), None), 3);
        assert_eq!(levenshtein_opt(None, None), 0);
    }

    proptest! {
        #[test]
        fn distance_to_self_is_zero(s in "\\PC{0,24}") {
            prop_assert_eq!(levenshtein(&s, &s), 0);
        }

        #[test]
        fn distance_from_empty_is_length(s in "\\PC{0,24}") {
            let len = s.chars().count();
            prop_assert_eq!(levenshtein("", &s), len);
            prop_assert_eq!(levenshtein(&s, ""), len);
        }

        #[test]
        fn distance_is_symmetric(a in "[a-dа-г]{0,12}", b in "[a-dа-г]{0,12}") {
            prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
        }

        #[test]
        fn triangle_inequality_holds(
            a in "[a-d]{0,10}",
            b in "[a-d]{0,10}",
            c in "[a-d]{0,10}",
        ) {
            prop_assert!(levenshtein(&a, &c) <= levenshtein(&a, &b) + levenshtein(&b, &c));
        }

        #[test]
        fn agrees_with_strsim(a in "\\PC{0,16}", b in "\\PC{0,16}") {
            prop_assert_eq!(levenshtein(&a, &b), strsim::levenshtein(&a, &b));
        }
    }
}
