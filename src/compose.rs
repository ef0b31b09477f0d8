use std::mem::take;

use super::iter::Cursor;
use super::op::split;
use super::{Error, Op, Operation};

/// Implemented by types that can combine two values applied in sequence into
/// one with the equivalent effect.
///
/// For operations this is sequential composition: for every document `s` of
/// the right length, `a.compose(&b)?.apply(s) == b.apply(&a.apply(s)?)?`.
/// Metadata types implement it too, which is how
/// [`WrappedOperation`](crate::WrappedOperation) decides what the metadata of
/// a composition looks like.
pub trait Compose<Rhs = Self> {
    /// Output type that composing the receiver with `rhs` produces.
    type Output;

    /// Composes the receiver (applied first) with `rhs` (applied second).
    fn compose(&self, rhs: &Rhs) -> Self::Output;
}

/// The unit metadata composes to itself.
impl Compose for () {
    type Output = ();

    fn compose(&self, _rhs: &()) -> Self::Output {}
}

impl Compose for Operation {
    type Output = Result<Operation, Error>;

    /// Merge walk over both action sequences. A delete from the first
    /// operation refers to input the second never sees, so it is emitted
    /// outright; an insert from the second operation is output the first
    /// never saw, so it is emitted outright too. Everything else pairs up
    /// span for span:
    ///
    /// | first ↓ second → | Retain | Delete |
    /// |:-----------------|:-------|:-------|
    /// | **Retain**       | retain | delete |
    /// | **Insert**       | insert | cancel |
    fn compose(&self, rhs: &Operation) -> Self::Output {
        if self.target_len() != rhs.base_len() {
            return Err(Error::ComposeLengthMismatch {
                expected: self.target_len(),
                actual: rhs.base_len(),
            });
        }

        let mut first = Cursor::new(self.ops().to_vec());
        let mut second = Cursor::new(rhs.ops().to_vec());
        let mut output = Operation::new();

        loop {
            match (first.next_mut(), second.next_mut()) {
                (None, None) => break,
                (Some(op @ Op::Delete(_)), _) => output.push(take(op)),
                (_, Some(op @ Op::Insert(_))) => output.push(take(op)),
                (None, Some(_)) | (Some(_), None) => return Err(Error::ComposeStructural),
                (Some(first_op), Some(second_op)) => {
                    match split(first_op, second_op) {
                        (Op::Retain(n), Op::Retain(_)) => output.push(Op::Retain(n)),
                        (Op::Retain(n), Op::Delete(_)) => output.push(Op::Delete(n)),
                        (Op::Insert(text), Op::Retain(_)) => output.push(Op::Insert(text)),
                        (Op::Insert(_), Op::Delete(_)) => {}
                        _ => return Err(Error::ComposeStructural),
                    }
                }
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::{Compose, Error, Operation};

    #[test]
    fn test_insert_insert() {
        let a = Operation::new().insert("A");
        let b = Operation::new().insert("B").retain(1);

        assert_eq!(a.compose(&b).unwrap(), Operation::new().insert("BA"));
    }

    #[test]
    fn test_insert_retain() {
        let a = Operation::new().insert("A");
        let b = Operation::new().retain(1);

        assert_eq!(a.compose(&b).unwrap(), Operation::new().insert("A"));
    }

    #[test]
    fn test_insert_delete() {
        let a = Operation::new().insert("A");
        let b = Operation::new().delete(1);

        assert_eq!(a.compose(&b).unwrap(), Operation::new());
    }

    #[test]
    fn test_retain_insert() {
        let a = Operation::new().retain(1);
        let b = Operation::new().insert("B").retain(1);

        assert_eq!(
            a.compose(&b).unwrap(),
            Operation::new().insert("B").retain(1),
        );
    }

    #[test]
    fn test_retain_retain() {
        let a = Operation::new().retain(2);
        let b = Operation::new().retain(2);

        assert_eq!(a.compose(&b).unwrap(), Operation::new().retain(2));
    }

    #[test]
    fn test_retain_delete() {
        let a = Operation::new().retain(1);
        let b = Operation::new().delete(1);

        assert_eq!(a.compose(&b).unwrap(), Operation::new().delete(1));
    }

    #[test]
    fn test_delete_insert() {
        let a = Operation::new().delete(1);
        let b = Operation::new().insert("B");

        assert_eq!(
            a.compose(&b).unwrap(),
            Operation::new().insert("B").delete(1),
        );
    }

    #[test]
    fn test_delete_retain() {
        let a = Operation::new().delete(1).retain(1);
        let b = Operation::new().retain(1);

        assert_eq!(a.compose(&b).unwrap(), Operation::new().delete(1).retain(1));
    }

    #[test]
    fn test_delete_delete() {
        let a = Operation::new().delete(1);
        let b = Operation::new().delete(2);

        assert_eq!(
            Operation::new().delete(1).retain(2).compose(&b).unwrap(),
            Operation::new().delete(3),
        );
        assert_eq!(a.compose(&Operation::new()).unwrap(), a);
    }

    #[test]
    fn test_insert_cancelled_by_delete_then_retained() {
        let a = Operation::new().insert("hi").retain(3);
        let b = Operation::new().delete(2).retain(3);

        let composed = a.compose(&b).unwrap();

        assert_eq!(composed, Operation::new().retain(3));
        assert_eq!(composed.base_len(), 3);
        assert_eq!(composed.target_len(), 3);
        assert_eq!(composed.apply("foo").unwrap(), "foo");
    }

    #[test]
    fn test_splits_longer_action() {
        let a = Operation::new().insert("Hello");
        let b = Operation::new().retain(3).insert("X").retain(2);

        assert_eq!(a.compose(&b).unwrap(), Operation::new().insert("HelXlo"));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let a = Operation::new().insert("ab");
        let b = Operation::new().retain(3);

        assert_eq!(
            a.compose(&b),
            Err(Error::ComposeLengthMismatch {
                expected: 2,
                actual: 3,
            }),
        );

        let short = Operation::new().retain(1);
        assert_eq!(
            a.compose(&short),
            Err(Error::ComposeLengthMismatch {
                expected: 2,
                actual: 1,
            }),
        );
    }

    #[test]
    fn test_compose_law_on_sample() {
        let document = "operational";
        let a = Operation::new().retain(2).delete(3).retain(6).insert("!");
        let b = Operation::new().insert(">").retain(4).delete(5);

        let sequential = b.apply(&a.apply(document).unwrap()).unwrap();
        let composed = a.compose(&b).unwrap().apply(document).unwrap();

        assert_eq!(sequential, composed);
    }

    #[test]
    fn test_associativity_on_sample() {
        let a = Operation::new().retain(3).insert("ab");
        let b = Operation::new().delete(2).retain(3).insert("c");
        let c = Operation::new().retain(2).delete(2).insert("d");

        let left = a.compose(&b).unwrap().compose(&c).unwrap();
        let right = a.compose(&b.compose(&c).unwrap()).unwrap();

        assert_eq!(left, right);
    }
}
