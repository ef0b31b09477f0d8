//! Client-side synchronization state machine.
//!
//! A [`Client`] sits between an editor and a transport and keeps one rule:
//! at most one local operation is in flight towards the server at any time.
//! Local edits made while an operation awaits acknowledgement accumulate in
//! a buffer (composed into a single operation), which keeps the transform
//! work per incoming server operation constant instead of growing with the
//! number of pending edits.
//!
//! | State | local edit | server operation | server ack |
//! |:---|:---|:---|:---|
//! | `Synchronized` | send; await confirm | apply to editor | fatal |
//! | `AwaitingConfirm` | start buffering | transform against outstanding | synchronized |
//! | `AwaitingWithBuffer` | compose into buffer | transform against both | send buffer |
//!
//! Events are processed to completion before the next begins; the machine is
//! single-owner and never locks. An error returned from an event is fatal
//! for this client: the document must be reloaded from the server.

use tracing::debug;

use super::{Compose, Error, Spans, Transform};

/// Transport adapter consumed by the [`Client`].
///
/// The hook carries a default body returning
/// [`NotImplemented`](Error::NotImplemented) so integrations override
/// exactly what they support.
pub trait Transport<O> {
    /// Submits a pending operation based on the given server revision.
    fn send_operation(&mut self, revision: u64, operation: &O) -> Result<(), Error> {
        let _ = (revision, operation);
        Err(Error::NotImplemented)
    }
}

/// Editor adapter consumed by the [`Client`].
///
/// The hooks carry default bodies returning
/// [`NotImplemented`](Error::NotImplemented) so integrations override
/// exactly what they support.
pub trait EditorAdapter<O> {
    /// Applies a (transformed) remote operation to the editor's document.
    fn apply_operation(&mut self, operation: &O) -> Result<(), Error> {
        let _ = operation;
        Err(Error::NotImplemented)
    }

    /// Current cursor position and selection end, as zero-based character
    /// indices into the document.
    fn selection(&self) -> Result<(usize, usize), Error> {
        Err(Error::NotImplemented)
    }
}

/// Synchronization state of a [`Client`].
#[derive(Clone, Debug, PartialEq)]
pub enum State<O> {
    /// No local operation is in flight.
    Synchronized,

    /// One operation has been sent and awaits acknowledgement.
    AwaitingConfirm {
        /// The operation in flight.
        outstanding: O,
    },

    /// One operation is in flight and further local edits have accumulated.
    AwaitingWithBuffer {
        /// The operation in flight.
        outstanding: O,

        /// Local edits made since, composed into one operation based on the
        /// outstanding operation's target document.
        buffer: O,
    },
}

impl<O> Default for State<O> {
    fn default() -> Self {
        State::Synchronized
    }
}

/// Client half of the synchronization protocol, generic over the operation
/// type — [`Operation`](crate::Operation) or a
/// [`WrappedOperation`](crate::WrappedOperation) carrying metadata.
///
/// The client tracks the next expected server revision and the character
/// length of the last acknowledged server document; an incoming server
/// operation that does not apply to that document is rejected as
/// [`RevisionDesync`](Error::RevisionDesync) before any transform runs.
#[derive(Clone, Debug)]
pub struct Client<O> {
    revision: u64,
    server_len: usize,
    state: State<O>,
}

impl<O> Client<O>
where
    O: Compose<Output = Result<O, Error>>
        + Transform<Output = Result<(O, O), Error>>
        + Spans
        + Clone,
{
    /// Returns a synchronized client expecting the given server revision
    /// next, against a server document of `document_len` characters.
    pub fn new(revision: u64, document_len: usize) -> Client<O> {
        Client {
            revision,
            server_len: document_len,
            state: State::Synchronized,
        }
    }

    /// The server revision this client expects next.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The client's current synchronization state.
    pub fn state(&self) -> &State<O> {
        &self.state
    }

    /// A local edit produced by the editor.
    ///
    /// From `Synchronized` the operation is sent immediately; in the two
    /// awaiting states it is held back (buffered, composing with any earlier
    /// buffered edits) until the outstanding operation is acknowledged. The
    /// revision never changes on a local edit.
    pub fn apply_client<T>(&mut self, transport: &mut T, operation: O) -> Result<(), Error>
    where
        T: Transport<O>,
    {
        let next = match &self.state {
            State::Synchronized => {
                debug!(revision = self.revision, "sending local operation");
                transport.send_operation(self.revision, &operation)?;

                State::AwaitingConfirm {
                    outstanding: operation,
                }
            }
            State::AwaitingConfirm { outstanding } => {
                debug!("buffering local edit behind outstanding operation");

                State::AwaitingWithBuffer {
                    outstanding: outstanding.clone(),
                    buffer: operation,
                }
            }
            State::AwaitingWithBuffer {
                outstanding,
                buffer,
            } => State::AwaitingWithBuffer {
                outstanding: outstanding.clone(),
                buffer: buffer.compose(&operation)?,
            },
        };

        self.state = next;
        Ok(())
    }

    /// A remote operation delivered from the server, in revision order.
    ///
    /// The operation is transformed against the outstanding operation and
    /// the buffer (in that order — the only point where three concurrent
    /// edits meet) before being handed to the editor; the pending operations
    /// are replaced by their transformed counterparts so they still apply
    /// once the server catches up.
    pub fn apply_server<E>(&mut self, editor: &mut E, operation: O) -> Result<(), Error>
    where
        E: EditorAdapter<O>,
    {
        if operation.base_len() != self.server_len {
            return Err(Error::RevisionDesync);
        }

        let next = match &self.state {
            State::Synchronized => {
                editor.apply_operation(&operation)?;
                State::Synchronized
            }
            State::AwaitingConfirm { outstanding } => {
                let (outstanding, transformed) = outstanding.transform(&operation)?;
                editor.apply_operation(&transformed)?;
                State::AwaitingConfirm { outstanding }
            }
            State::AwaitingWithBuffer {
                outstanding,
                buffer,
            } => {
                let (outstanding, transformed) = outstanding.transform(&operation)?;
                let (buffer, transformed) = buffer.transform(&transformed)?;
                editor.apply_operation(&transformed)?;
                State::AwaitingWithBuffer {
                    outstanding,
                    buffer,
                }
            }
        };

        self.server_len = operation.target_len();
        self.revision += 1;
        self.state = next;
        debug!(revision = self.revision, "applied server operation");
        Ok(())
    }

    /// The server's acknowledgement of this client's outstanding operation.
    ///
    /// Flushes the buffer, if any, as the next in-flight operation. The send
    /// carries the already-incremented revision, since the acknowledged
    /// operation is now part of the server history.
    pub fn server_ack<T>(&mut self, transport: &mut T) -> Result<(), Error>
    where
        T: Transport<O>,
    {
        match std::mem::take(&mut self.state) {
            State::Synchronized => Err(Error::NoPendingAck),
            State::AwaitingConfirm { outstanding } => {
                self.revision += 1;
                self.server_len = outstanding.target_len();
                debug!(revision = self.revision, "outstanding operation acknowledged");
                Ok(())
            }
            State::AwaitingWithBuffer {
                outstanding,
                buffer,
            } => {
                self.revision += 1;
                self.server_len = outstanding.target_len();
                debug!(revision = self.revision, "acknowledged; sending buffered edits");
                transport.send_operation(self.revision, &buffer)?;
                self.state = State::AwaitingConfirm {
                    outstanding: buffer,
                };
                Ok(())
            }
        }
    }
}
