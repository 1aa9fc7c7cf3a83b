//! Natural ("human") string ordering: `item2` sorts before `item10`.

use std::cmp::Ordering;

/// Compare two strings naturally.
///
/// Runs of ASCII digits compare by numeric value, everything else compares
/// byte-wise and case-sensitively. Strings that tie (e.g. `a01` and `a1`) fall
/// back to plain byte order so the result is total.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (is_digits(x), is_digits(y)) {
                    (true, true) => compare_numeric(x, y),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Sort `names` naturally in place.
pub fn natural_sort(names: &mut [String]) {
    names.sort_by(|a, b| natural_cmp(a, b));
}

fn is_digits(chunk: &str) -> bool {
    chunk.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// Compare digit runs of arbitrary length without overflowing.
fn compare_numeric(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Splits a string into alternating digit and non-digit runs.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            rest: s,
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.as_bytes().first()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .bytes()
            .position(|b| b.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(input: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = input.iter().map(|s| (*s).to_string()).collect();
        natural_sort(&mut names);
        names
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert_eq!(
            sorted(&["item10", "item2", "item1", "item20"]),
            ["item1", "item2", "item10", "item20"]
        );
        assert_eq!(sorted(&["WP_1_10", "WP_1_9", "WP_1_100"]), ["WP_1_9", "WP_1_10", "WP_1_100"]);
    }

    #[test]
    fn test_case_sensitive_like_byte_order() {
        assert_eq!(sorted(&["b", "B", "a", "A"]), ["A", "B", "a", "b"]);
        assert_eq!(
            sorted(&["WP_Widget", "WC_Product", "Walker"]),
            ["WC_Product", "WP_Widget", "Walker"]
        );
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(sorted(&["abc1", "abc", "ab"]), ["ab", "abc", "abc1"]);
    }

    #[test]
    fn test_leading_zeros_and_huge_numbers() {
        assert_eq!(natural_cmp("a01", "a1"), "a01".cmp("a1"));
        assert_eq!(natural_cmp("v99999999999999999999999", "v100000000000000000000000"), Ordering::Less);
    }

    #[test]
    fn test_namespaced_names() {
        assert_eq!(
            sorted(&["Foo\\Bar10", "Foo\\Bar9", "Foo", "Bar\\Baz"]),
            ["Bar\\Baz", "Foo", "Foo\\Bar9", "Foo\\Bar10"]
        );
    }
}
