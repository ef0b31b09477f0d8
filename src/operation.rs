use serde::{Deserialize, Serialize};

use super::{Error, Len, Op};

/// Implemented by edit scripts that act between two document lengths.
///
/// The base length is the character length a document must have for the edit
/// to apply; the target length is the character length of the result. The
/// [`Client`](crate::Client) relies on this seam to sanity-check incoming
/// operations without caring whether they are wrapped.
pub trait Spans {
    /// Character length of the documents this edit applies to.
    fn base_len(&self) -> usize;

    /// Character length of the documents this edit produces.
    fn target_len(&self) -> usize;
}

/// An edit script over a linear character sequence: an ordered series of
/// retain, insert and delete actions together with the document lengths it
/// acts between.
///
/// An operation is constructed through the append-style builders and treated
/// as immutable afterwards. [`apply`](Operation::apply),
/// [`invert`](Operation::invert), [`Compose`](crate::Compose) and
/// [`Transform`](crate::Transform) never mutate their inputs and return fresh
/// operations.
///
/// ```
/// use weft::{Operation, Spans};
///
/// let op = Operation::new().retain(3).insert(", world").delete(1);
///
/// assert_eq!(op.base_len(), 4);
/// assert_eq!(op.target_len(), 10);
/// assert_eq!(op.apply("foo!").unwrap(), "foo, world");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "crate::wire::Record",
    try_from = "crate::wire::Record"
)]
pub struct Operation {
    ops: Vec<Op>,
    base_len: usize,
    target_len: usize,
}

impl Operation {
    /// Returns a new empty operation (the identity edit of the empty
    /// document).
    pub fn new() -> Operation {
        Operation::default()
    }

    /// Character length of the documents this operation applies to.
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    /// Character length of the documents this operation produces.
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    /// Returns `true` if applying this operation leaves every document
    /// unchanged, i.e. it is empty or a single retain.
    pub fn is_noop(&self) -> bool {
        matches!(self.ops.as_slice(), [] | [Op::Retain(_)])
    }

    pub(crate) fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Returns a new operation that additionally advances over `n`
    /// characters unchanged. `retain(0)` is a no-op.
    pub fn retain(mut self, n: usize) -> Self {
        self.push(Op::Retain(n));
        self
    }

    /// Returns a new operation that additionally inserts the given text.
    /// Inserting the empty string is a no-op.
    pub fn insert(mut self, text: impl Into<String>) -> Self {
        self.push(Op::Insert(text.into()));
        self
    }

    /// Returns a new operation that additionally removes a run of
    /// characters. Accepts either a count or the text being deleted (taking
    /// its character length); `delete(0)` is a no-op.
    pub fn delete(mut self, what: impl Len) -> Self {
        self.push(Op::Delete(what.len()));
        self
    }

    /// Appends the given action, maintaining the derived lengths and the
    /// coalescing invariant: adjacent actions of the same kind merge, and an
    /// insert pushed after a trailing delete slides in front of it (the two
    /// orders denote the same edit, so one canonical form is kept).
    ///
    /// Zero-length actions are dropped.
    pub fn push(&mut self, op: Op) {
        if op.len() == 0 {
            return;
        }

        match &op {
            Op::Retain(n) => {
                self.base_len += n;
                self.target_len += n;
            }
            Op::Insert(text) => self.target_len += text.chars().count(),
            Op::Delete(n) => self.base_len += n,
        }

        let unmerged = match (self.ops.as_mut_slice(), op) {
            ([.., Op::Retain(last)], Op::Retain(n)) => {
                *last += n;
                return;
            }
            ([.., Op::Insert(last)], Op::Insert(text)) => {
                last.push_str(&text);
                return;
            }
            ([.., Op::Delete(last)], Op::Delete(n)) => {
                *last += n;
                return;
            }
            ([.., Op::Insert(before), Op::Delete(_)], Op::Insert(text)) => {
                before.push_str(&text);
                return;
            }
            ([.., last @ Op::Delete(_)], insert @ Op::Insert(_)) => {
                std::mem::replace(last, insert)
            }
            (_, op) => op,
        };

        self.ops.push(unmerged);
    }

    /// Applies this operation to a document, returning the edited document.
    ///
    /// The document must have exactly [`base_len`](Operation::base_len)
    /// characters; the result has exactly
    /// [`target_len`](Operation::target_len).
    pub fn apply(&self, document: &str) -> Result<String, Error> {
        let len = document.chars().count();

        if len != self.base_len {
            return Err(Error::BaseLengthMismatch {
                expected: self.base_len,
                actual: len,
            });
        }

        let mut output = String::with_capacity(document.len());
        let mut chars = document.chars();
        let mut consumed = 0;

        for op in &self.ops {
            match op {
                Op::Retain(n) => {
                    if consumed + n > len {
                        return Err(Error::RetainOverflow);
                    }

                    output.extend(chars.by_ref().take(*n));
                    consumed += n;
                }
                Op::Insert(text) => output.push_str(text),
                Op::Delete(n) => {
                    for _ in 0..*n {
                        chars.next();
                    }

                    consumed += n;
                }
            }
        }

        if consumed != len {
            return Err(Error::IncompleteApply);
        }

        Ok(output)
    }

    /// Computes the inverse of this operation against the document it was
    /// made for, such that `inverse.apply(&op.apply(document)?)` restores
    /// `document`. Retains stay retains, an insert becomes a delete of its
    /// length, and a delete becomes an insert of the deleted slice.
    pub fn invert(&self, document: &str) -> Operation {
        let mut inverse = Operation::new();
        let mut chars = document.chars();

        for op in &self.ops {
            match op {
                Op::Retain(n) => {
                    inverse.push(Op::Retain(*n));

                    for _ in 0..*n {
                        chars.next();
                    }
                }
                Op::Insert(text) => inverse.push(Op::Delete(text.chars().count())),
                Op::Delete(n) => {
                    inverse.push(Op::Insert(chars.by_ref().take(*n).collect()));
                }
            }
        }

        inverse
    }
}

impl Spans for Operation {
    fn base_len(&self) -> usize {
        self.base_len
    }

    fn target_len(&self) -> usize {
        self.target_len
    }
}

impl Extend<Op> for Operation {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Op>,
    {
        iter.into_iter().for_each(|op| self.push(op))
    }
}

impl FromIterator<Op> for Operation {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Op>,
    {
        let mut operation = Operation::new();
        operation.extend(iter);
        operation
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Op, Operation};

    #[test]
    fn test_push_retain_retain() {
        let op = Operation::new().retain(1).retain(2);

        assert_eq!(op.ops(), [Op::Retain(3)]);
        assert_eq!(op.base_len, 3);
        assert_eq!(op.target_len, 3);
    }

    #[test]
    fn test_push_insert_insert() {
        let op = Operation::new().insert("a").insert("b");

        assert_eq!(op.ops(), [Op::Insert("ab".to_owned())]);
        assert_eq!(op.base_len, 0);
        assert_eq!(op.target_len, 2);
    }

    #[test]
    fn test_push_delete_delete() {
        let op = Operation::new().delete(1).delete(2);

        assert_eq!(op.ops(), [Op::Delete(3)]);
        assert_eq!(op.base_len, 3);
        assert_eq!(op.target_len, 0);
    }

    #[test]
    fn test_push_retain_insert() {
        let op = Operation::new().retain(1).insert("a");

        assert_eq!(op.ops(), [Op::Retain(1), Op::Insert("a".to_owned())]);
    }

    #[test]
    fn test_push_insert_after_delete_slides_in_front() {
        let op = Operation::new().delete(1).insert("a");

        assert_eq!(op.ops(), [Op::Insert("a".to_owned()), Op::Delete(1)]);
    }

    #[test]
    fn test_push_insert_after_insert_delete_merges_across() {
        let op = Operation::new().insert("a").delete(1).insert("b");

        assert_eq!(op.ops(), [Op::Insert("ab".to_owned()), Op::Delete(1)]);
    }

    #[test]
    fn test_push_zero_length_actions_are_noops() {
        let op = Operation::new().retain(0).insert("").delete(0usize);

        assert_eq!(op, Operation::new());
        assert!(op.is_noop());
    }

    #[test]
    fn test_delete_accepts_text() {
        assert_eq!(
            Operation::new().delete("héllo"),
            Operation::new().delete(5usize),
        );
    }

    #[test]
    fn test_lengths() {
        let op = Operation::new().retain(5).insert("abc").retain(2).delete(2usize);

        assert_eq!(op.base_len, 9);
        assert_eq!(op.target_len, 10);
    }

    #[test]
    fn test_equality_is_structural() {
        let a = Operation::new().delete(1).insert("lo").retain(2).retain(3);
        let b = Operation::new().delete(1).insert("l").insert("o").retain(5);

        assert_eq!(a, b);
        assert_ne!(a.clone().delete(1), b.retain(1));
    }

    #[test]
    fn test_apply() {
        let op = Operation::new().retain(3).insert(", world").delete(1);

        assert_eq!(op.apply("foo!").unwrap(), "foo, world");
    }

    #[test]
    fn test_apply_multibyte() {
        let op = Operation::new().retain(1).delete(1).insert("ö").retain(2);

        assert_eq!(op.apply("h😀lo").unwrap(), "hölo");
    }

    #[test]
    fn test_apply_base_length_mismatch() {
        let op = Operation::new().retain(2);

        assert_eq!(
            op.apply("abc"),
            Err(Error::BaseLengthMismatch {
                expected: 2,
                actual: 3,
            }),
        );
    }

    #[test]
    fn test_apply_result_has_target_length() {
        let op = Operation::new().retain(2).insert("xy").delete(1);

        let result = op.apply("abc").unwrap();
        assert_eq!(result.chars().count(), op.target_len);
    }

    #[test]
    fn test_invert_round_trip() {
        let document = "hello";
        let op = Operation::new().delete(5usize).insert("world");

        let inverse = op.invert(document);
        let applied = op.apply(document).unwrap();

        assert_eq!(applied, "world");
        assert_eq!(inverse.apply(&applied).unwrap(), document);
    }

    #[test]
    fn test_invert_swaps_lengths() {
        let op = Operation::new().retain(2).insert("ab").delete(3usize);
        let inverse = op.invert("xxyyz");

        assert_eq!(inverse.base_len, op.target_len);
        assert_eq!(inverse.target_len, op.base_len);
    }

    #[test]
    fn test_is_noop() {
        assert!(Operation::new().is_noop());
        assert!(Operation::new().retain(5).is_noop());
        assert!(!Operation::new().insert("x").is_noop());
    }

    #[test]
    fn test_from_iter_rebuilds_canonical_form() {
        let op: Operation = vec![
            Op::Retain(1),
            Op::Retain(2),
            Op::Delete(1),
            Op::Insert("a".to_owned()),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            op.ops(),
            [Op::Retain(3), Op::Insert("a".to_owned()), Op::Delete(1)],
        );
    }
}
