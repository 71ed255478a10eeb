use core::cmp::Ordering;

/// Comparator variant for canonically ordering encoded map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// RFC 7049 rule: shorter encoded key sorts first, then bytewise.
    #[default]
    LengthFirst,
    /// RFC 8949 rule: plain lexicographic byte comparison.
    Bytewise,
}

/// Compare two encoded map keys under the selected canonical ordering rule.
#[inline]
#[must_use]
pub fn cmp_encoded_keys(order: KeyOrder, a: &[u8], b: &[u8]) -> Ordering {
    match order {
        KeyOrder::LengthFirst => match a.len().cmp(&b.len()) {
            Ordering::Equal => a.cmp(b),
            other => other,
        },
        KeyOrder::Bytewise => a.cmp(b),
    }
}

/// Returns true iff `prev < curr` under the selected ordering (by encoded bytes).
#[inline]
#[must_use]
pub fn is_strictly_ascending(order: KeyOrder, prev: &[u8], curr: &[u8]) -> bool {
    cmp_encoded_keys(order, prev, curr) == Ordering::Less
}
