//! Natural ordering of identifiers.
//!
//! Block, item, and customer ids usually mix letters and numbers (`b2`,
//! `b10`, `p7`). Every deterministic tie-break in the crate compares ids
//! with [`natural_cmp`] so that `b2` sorts before `b10`.

use std::cmp::Ordering;

/// Compares two identifiers, treating runs of ASCII digits as numbers.
///
/// Equal numeric runs with different leading zeros fall back to plain
/// string comparison so the ordering stays total.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use u_slotting::ids::natural_cmp;
///
/// assert_eq!(natural_cmp("b2", "b10"), Ordering::Less);
/// assert_eq!(natural_cmp("b10", "b10"), Ordering::Equal);
/// assert_eq!(natural_cmp("a9", "b1"), Ordering::Less);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (ab, bb) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let si = i;
            while i < ab.len() && ab[i].is_ascii_digit() {
                i += 1;
            }
            let sj = j;
            while j < bb.len() && bb[j].is_ascii_digit() {
                j += 1;
            }
            let na = trim_zeros(&ab[si..i]);
            let nb = trim_zeros(&bb[sj..j]);
            let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = ab[i].cmp(&bb[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (ab.len() - i).cmp(&(bb.len() - j)).then_with(|| a.cmp(b))
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let start = digits
        .iter()
        .position(|&d| d != b'0')
        .unwrap_or(digits.len());
    &digits[start..]
}

/// Stable sort of `items` by the natural order of the id `key` extracts.
///
/// ```
/// use u_slotting::ids::sort_natural_by;
///
/// let mut rows = vec![("b10", 1), ("b2", 2), ("b2", 0)];
/// sort_natural_by(&mut rows, |row| row.0);
/// assert_eq!(rows, vec![("b2", 2), ("b2", 0), ("b10", 1)]);
/// ```
pub fn sort_natural_by<T, K: AsRef<str>>(items: &mut [T], key: impl Fn(&T) -> K) {
    items.sort_by(|a, b| natural_cmp(key(a).as_ref(), key(b).as_ref()));
}
