//! Wire representation of operations.
//!
//! An [`Operation`] travels as a record of its actions plus the two document
//! lengths it acts between. Deserialization rebuilds the operation through
//! the builders, so every structural invariant is re-established, and then
//! checks the declared lengths against the rebuilt ones — a corrupted or
//! hand-rolled record never enters the algebra.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Error, Op, Operation};

/// Serialized form of an [`Operation`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Record {
    ops: Vec<Action>,
    base_length: usize,
    target_length: usize,
}

/// Serialized form of a single action: exactly one of `{"retain": n}`,
/// `{"insert": s}` or `{"delete": n}`. Extraneous fields are ignored; any
/// other record is preserved for error reporting.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Action {
    Retain {
        retain: i64,
    },
    Insert {
        insert: String,
    },
    Delete {
        delete: i64,
    },
    Unknown(Map<String, Value>),
}

impl From<Operation> for Record {
    fn from(operation: Operation) -> Record {
        let ops = operation
            .ops()
            .iter()
            .map(|op| match op {
                Op::Retain(n) => Action::Retain { retain: *n as i64 },
                Op::Insert(text) => Action::Insert {
                    insert: text.clone(),
                },
                Op::Delete(n) => Action::Delete { delete: *n as i64 },
            })
            .collect();

        Record {
            ops,
            base_length: operation.base_len(),
            target_length: operation.target_len(),
        }
    }
}

impl TryFrom<Record> for Operation {
    type Error = Error;

    fn try_from(record: Record) -> Result<Operation, Error> {
        let mut operation = Operation::new();

        for action in record.ops {
            match action {
                Action::Retain { retain } if retain >= 0 => {
                    operation.push(Op::Retain(retain as usize));
                }
                Action::Retain { retain } => {
                    return Err(Error::BuilderArgument(format!(
                        "retain of {retain} characters"
                    )));
                }
                Action::Insert { insert } => operation.push(Op::Insert(insert)),
                // A negative delete is normalized to its absolute value, the
                // same as the builder treats one.
                Action::Delete { delete } => {
                    operation.push(Op::Delete(delete.unsigned_abs() as usize));
                }
                Action::Unknown(map) => {
                    let known_tag = ["retain", "insert", "delete"]
                        .iter()
                        .find(|tag| map.contains_key(**tag));

                    return Err(match known_tag {
                        Some(tag) => {
                            Error::BuilderArgument(format!("malformed payload for `{tag}`"))
                        }
                        None => Error::UnknownAction,
                    });
                }
            }
        }

        if operation.base_len() != record.base_length
            || operation.target_len() != record.target_length
        {
            return Err(Error::DeserializationMismatch(format!(
                "declared lengths {}/{} do not match computed lengths {}/{}",
                record.base_length,
                record.target_length,
                operation.base_len(),
                operation.target_len(),
            )));
        }

        Ok(operation)
    }
}

impl Operation {
    /// Parses an operation from its JSON wire form, keeping the distinct
    /// error kinds of the validation steps intact. A structurally malformed
    /// record (missing fields, an action that is not a record) surfaces as
    /// [`Error::DeserializationMismatch`].
    pub fn from_json(json: &str) -> Result<Operation, Error> {
        let record: Record = serde_json::from_str(json)
            .map_err(|err| Error::DeserializationMismatch(err.to_string()))?;

        Operation::try_from(record)
    }
}
