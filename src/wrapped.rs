use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Compose, Error, Operation, Spans, Transform};

/// An [`Operation`] together with opaque per-operation metadata.
///
/// The algebra never looks inside `meta`; it only moves it around:
///
/// - [`apply`](WrappedOperation::apply) delegates to the operation;
/// - [`invert`](WrappedOperation::invert) keeps the same metadata on the
///   inverse;
/// - [`Compose`] composes the operations and merges the metadata through the
///   metadata type's own [`Compose`] impl (for [`Meta`], right-biased);
/// - [`Transform`] transforms the operations while each side keeps its own
///   metadata untouched.
///
/// Interpreting keys such as a cursor position or an authoring client is the
/// caller's responsibility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WrappedOperation<M> {
    /// The wrapped edit script.
    pub operation: Operation,

    /// The metadata travelling with it.
    pub meta: M,
}

impl<M> WrappedOperation<M> {
    /// Wraps an operation together with its metadata.
    pub fn new(operation: Operation, meta: M) -> WrappedOperation<M> {
        WrappedOperation { operation, meta }
    }

    /// Applies the wrapped operation to a document. See
    /// [`Operation::apply`].
    pub fn apply(&self, document: &str) -> Result<String, Error> {
        self.operation.apply(document)
    }

    /// Computes the inverse of the wrapped operation against its pre-image
    /// document; the inverse carries the same metadata. See
    /// [`Operation::invert`].
    pub fn invert(&self, document: &str) -> WrappedOperation<M>
    where
        M: Clone,
    {
        WrappedOperation {
            operation: self.operation.invert(document),
            meta: self.meta.clone(),
        }
    }
}

impl<M> Spans for WrappedOperation<M> {
    fn base_len(&self) -> usize {
        self.operation.base_len()
    }

    fn target_len(&self) -> usize {
        self.operation.target_len()
    }
}

impl<M> Compose for WrappedOperation<M>
where
    M: Compose<M, Output = M>,
{
    type Output = Result<WrappedOperation<M>, Error>;

    fn compose(&self, rhs: &WrappedOperation<M>) -> Self::Output {
        Ok(WrappedOperation {
            operation: self.operation.compose(&rhs.operation)?,
            meta: self.meta.compose(&rhs.meta),
        })
    }
}

impl<M> Transform for WrappedOperation<M>
where
    M: Clone,
{
    type Output = Result<(WrappedOperation<M>, WrappedOperation<M>), Error>;

    fn transform(&self, rhs: &WrappedOperation<M>) -> Self::Output {
        let (a_prime, b_prime) = self.operation.transform(&rhs.operation)?;

        Ok((
            WrappedOperation {
                operation: a_prime,
                meta: self.meta.clone(),
            },
            WrappedOperation {
                operation: b_prime,
                meta: rhs.meta.clone(),
            },
        ))
    }
}

/// Flat, opaque metadata map: string keys to scalar JSON values.
///
/// This is the wire-facing metadata type; adapters conventionally use the
/// keys `clientId`, `cursor` and `selectionEnd`, but the core treats every
/// key the same. Composition merges two maps right-biased: the later
/// operation's value wins for keys present on both sides.
///
/// ```
/// use weft::{Compose, Meta};
///
/// let a = Meta::new().with("clientId", "alice").with("cursor", 3);
/// let b = Meta::new().with("cursor", 7);
///
/// let merged = a.compose(&b);
/// assert_eq!(merged.get("clientId"), Some(&"alice".into()));
/// assert_eq!(merged.get("cursor"), Some(&7.into()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(BTreeMap<String, Value>);

impl Meta {
    /// Returns a new empty metadata map.
    pub fn new() -> Meta {
        Meta::default()
    }

    /// Returns this map with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Meta {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl Compose for Meta {
    type Output = Meta;

    fn compose(&self, rhs: &Meta) -> Meta {
        let mut merged = self.0.clone();
        merged.extend(rhs.0.iter().map(|(key, value)| (key.clone(), value.clone())));
        Meta(merged)
    }
}
