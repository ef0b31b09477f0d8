use thiserror::Error;

/// Every failure the crate surfaces. Errors are raised at the point of
/// detection and always propagate to the caller; nothing is caught or
/// retried internally.
///
/// The protocol violations ([`NoPendingAck`](Error::NoPendingAck),
/// [`RevisionDesync`](Error::RevisionDesync)) are fatal for the client that
/// observes them: the only recovery is to discard local state and reload the
/// document from the server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A wire action carried a payload of the wrong type or range, e.g. a
    /// non-positive `retain` or a non-string `insert`.
    #[error("action payload has the wrong type or range: {0}")]
    BuilderArgument(String),

    /// The document handed to `apply` does not have the operation's base
    /// length.
    #[error("operation expects a document of {expected} chars, got {actual}")]
    BaseLengthMismatch {
        /// The operation's base length.
        expected: usize,
        /// The character length of the document that was supplied.
        actual: usize,
    },

    /// A retain walked past the end of the document during `apply`.
    #[error("retain walks past the end of the document")]
    RetainOverflow,

    /// `apply` finished without consuming the whole document.
    #[error("operation did not consume the whole document")]
    IncompleteApply,

    /// The second operand of `compose` does not start from the first
    /// operand's target length.
    #[error("compose expects the second operation to start from {expected} chars, got {actual}")]
    ComposeLengthMismatch {
        /// Target length of the first operand.
        expected: usize,
        /// Base length of the second operand.
        actual: usize,
    },

    /// One operand of `compose` ran out of actions while the other still had
    /// input left to account for.
    #[error("operations ran out of actions mid-compose")]
    ComposeStructural,

    /// The operands of `transform` do not share a base length.
    #[error("transform expects equal base lengths, got {left} and {right}")]
    TransformLengthMismatch {
        /// Base length of the left operand.
        left: usize,
        /// Base length of the right operand.
        right: usize,
    },

    /// The operands of `transform` cannot be reconciled: one side ran dry or
    /// an action pair fell outside the retain/insert/delete algebra.
    #[error("operations cannot be transformed against each other")]
    TransformIncompatible,

    /// An operation record is malformed or its declared lengths disagree
    /// with the lengths computed from its actions.
    #[error("malformed operation record: {0}")]
    DeserializationMismatch(String),

    /// An action record carried none of the known `retain`, `insert`, or
    /// `delete` tags.
    #[error("unrecognized action in operation record")]
    UnknownAction,

    /// The server acknowledged an operation while none was in flight.
    #[error("received an acknowledgement with no operation in flight")]
    NoPendingAck,

    /// A server operation does not apply to the document at the revision the
    /// client is tracking.
    #[error("server operation does not apply to the tracked revision")]
    RevisionDesync,

    /// An adapter hook was invoked without an integration overriding it.
    #[error("adapter hook has not been wired up")]
    NotImplemented,
}
