use std::cmp::min;
use std::mem::take;

use super::iter::Cursor;
use super::op::split;
use super::{Error, Len, Op, Operation};

/// Implemented by types that can transform a concurrent value so the two
/// commute.
///
/// For operations: given `a` and `b` made concurrently against the same
/// document, `a.transform(&b)?` produces `(a', b')` such that applying
/// `a` then `b'` and applying `b` then `a'` yield the same document.
/// When both sides insert at the same position, the receiver's insert ends
/// up first in both resulting documents — callers put their own operation on
/// the left, which is what makes every participant converge on one order.
pub trait Transform<Rhs = Self> {
    /// Output type that transforming `rhs` with the receiver produces.
    type Output;

    /// Transforms the given concurrent value against the receiver.
    fn transform(&self, rhs: &Rhs) -> Self::Output;
}

impl Transform for Operation {
    type Output = Result<(Operation, Operation), Error>;

    /// Symmetric merge walk. Inserts only ever add output, so each one is
    /// emitted into its own side and retained by the other; the remaining
    /// pairs all consume base input and split span for span:
    ///
    /// | left ↓ right → | Retain         | Delete          |
    /// |:---------------|:---------------|:----------------|
    /// | **Retain**     | retain both    | delete into `b'`|
    /// | **Delete**     | delete into `a'` | cancel        |
    fn transform(&self, rhs: &Operation) -> Self::Output {
        if self.base_len() != rhs.base_len() {
            return Err(Error::TransformLengthMismatch {
                left: self.base_len(),
                right: rhs.base_len(),
            });
        }

        let mut left = Cursor::new(self.ops().to_vec());
        let mut right = Cursor::new(rhs.ops().to_vec());
        let mut a_prime = Operation::new();
        let mut b_prime = Operation::new();

        loop {
            match (left.next_mut(), right.next_mut()) {
                (None, None) => break,
                (Some(op @ Op::Insert(_)), _) => {
                    let len = op.len();
                    a_prime.push(take(op));
                    b_prime.push(Op::Retain(len));
                }
                (_, Some(op @ Op::Insert(_))) => {
                    let len = op.len();
                    a_prime.push(Op::Retain(len));
                    b_prime.push(take(op));
                }
                (None, Some(_)) | (Some(_), None) => return Err(Error::TransformIncompatible),
                (Some(left_op), Some(right_op)) => {
                    match split(left_op, right_op) {
                        (Op::Retain(n), Op::Retain(_)) => {
                            a_prime.push(Op::Retain(n));
                            b_prime.push(Op::Retain(n));
                        }
                        (Op::Delete(_), Op::Delete(_)) => {}
                        (Op::Delete(n), Op::Retain(_)) => a_prime.push(Op::Delete(n)),
                        (Op::Retain(n), Op::Delete(_)) => b_prime.push(Op::Delete(n)),
                        _ => return Err(Error::TransformIncompatible),
                    }
                }
            }
        }

        Ok((a_prime, b_prime))
    }
}

impl Operation {
    /// Carries a character index (a cursor or selection endpoint) through
    /// this operation.
    ///
    /// Inserts before the index push it right and deletes before it pull it
    /// left. An insert exactly at the index pushes it right only when the
    /// operation does not have `priority`; an operation transformed with
    /// priority leaves a cursor sitting at its own insertion point in place.
    pub fn transform_index(&self, index: usize, priority: bool) -> usize {
        let mut index = index;
        let mut offset = 0;

        for op in self.ops() {
            if offset > index {
                break;
            }

            match op {
                Op::Insert(text) => {
                    let len = text.chars().count();

                    if offset < index || !priority {
                        index += len;
                    }

                    offset += len;
                }
                Op::Retain(n) => offset += n,
                Op::Delete(n) => index -= min(*n, index - offset),
            }
        }

        index
    }
}
