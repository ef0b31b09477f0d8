use std::cmp::min;

use arbitrary::Arbitrary;

/// Implemented by types that have a length in characters.
///
/// All of the [`Op`] variants implement it, as do strings (counting Unicode
/// scalar values, never bytes) and plain counts, which lets
/// [`Operation::delete`](crate::Operation::delete) accept either a count or
/// the text being deleted.
pub trait Len {
    /// Should return the exact length of the receiver, in characters.
    fn len(&self) -> usize;
}

impl Len for usize {
    fn len(&self) -> usize {
        *self
    }
}

/// A possibly-signed count; a negative count stands for the same number of
/// characters as its absolute value.
impl Len for i32 {
    fn len(&self) -> usize {
        self.unsigned_abs() as usize
    }
}

impl Len for &str {
    fn len(&self) -> usize {
        self.chars().count()
    }
}

impl Len for String {
    fn len(&self) -> usize {
        self.chars().count()
    }
}

/// Implemented by types that can split their value in two at any given index.
pub trait Split {
    /// Removes and returns the first `len` items from this value, leaving the
    /// remainder in place.
    fn split(&mut self, len: usize) -> Self;
}

/// Splits the front off both actions at the length of the shorter one, so the
/// two fronts cover the same span. The remainders (one of which is empty)
/// stay behind for the next round of a merge walk.
pub(crate) fn split<T, U>(lhs: &mut T, rhs: &mut U) -> (T, U)
where
    T: Len + Split,
    U: Len + Split,
{
    let len = min(lhs.len(), rhs.len());

    (lhs.split(len), rhs.split(len))
}

/// Individual retain, insert or delete action within an
/// [`Operation`](crate::Operation).
///
/// Lengths are measured in characters. An action of length zero carries no
/// edit; the [`Operation`](crate::Operation) builders never store one.
#[derive(Arbitrary, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    /// Advance over a run of characters, copying them unchanged.
    Retain(usize),

    /// Insert the given text at the current position.
    Insert(String),

    /// Remove a run of characters at the current position.
    Delete(usize),
}

impl Default for Op {
    fn default() -> Self {
        Op::Retain(0)
    }
}

impl Len for Op {
    fn len(&self) -> usize {
        match self {
            Op::Retain(n) => *n,
            Op::Insert(text) => text.chars().count(),
            Op::Delete(n) => *n,
        }
    }
}

impl Split for Op {
    fn split(&mut self, len: usize) -> Op {
        let len = min(self.len(), len);

        match self {
            Op::Retain(n) => {
                *n -= len;
                Op::Retain(len)
            }
            Op::Insert(text) => {
                let at = text
                    .char_indices()
                    .nth(len)
                    .map(|(index, _)| index)
                    .unwrap_or(text.len());
                let rest = text.split_off(at);

                Op::Insert(std::mem::replace(text, rest))
            }
            Op::Delete(n) => {
                *n -= len;
                Op::Delete(len)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{split, Op, Split};

    #[test]
    fn test_split_insert_start() {
        let mut a = Op::Insert("abc".to_owned());
        let b = a.split(0);

        assert_eq!(a, Op::Insert("abc".to_owned()));
        assert_eq!(b, Op::Insert("".to_owned()));
    }

    #[test]
    fn test_split_insert_mid() {
        let mut a = Op::Insert("abc".to_owned());
        let b = a.split(1);

        assert_eq!(a, Op::Insert("bc".to_owned()));
        assert_eq!(b, Op::Insert("a".to_owned()));
    }

    #[test]
    fn test_split_insert_end() {
        let mut a = Op::Insert("abc".to_owned());
        let b = a.split(3);

        assert_eq!(a, Op::Insert("".to_owned()));
        assert_eq!(b, Op::Insert("abc".to_owned()));
    }

    #[test]
    fn test_split_insert_oob() {
        let mut a = Op::Insert("abc".to_owned());
        let b = a.split(4);

        assert_eq!(a, Op::Insert("".to_owned()));
        assert_eq!(b, Op::Insert("abc".to_owned()));
    }

    #[test]
    fn test_split_insert_multibyte() {
        let mut a = Op::Insert("héllo".to_owned());
        let b = a.split(2);

        assert_eq!(a, Op::Insert("llo".to_owned()));
        assert_eq!(b, Op::Insert("hé".to_owned()));
    }

    #[test]
    fn test_split_delete_mid() {
        let mut a = Op::Delete(3);
        let b = a.split(1);

        assert_eq!(a, Op::Delete(2));
        assert_eq!(b, Op::Delete(1));
    }

    #[test]
    fn test_split_retain_end() {
        let mut a = Op::Retain(3);
        let b = a.split(3);

        assert_eq!(a, Op::Retain(0));
        assert_eq!(b, Op::Retain(3));
    }

    #[test]
    fn test_split_pair_takes_min() {
        let mut a = Op::Retain(5);
        let mut b = Op::Delete(2);
        let (front_a, front_b) = split(&mut a, &mut b);

        assert_eq!(front_a, Op::Retain(2));
        assert_eq!(front_b, Op::Delete(2));
        assert_eq!(a, Op::Retain(3));
        assert_eq!(b, Op::Delete(0));
    }
}
