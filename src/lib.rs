#![warn(missing_docs)]
//! Core mechanics for collaborative text editing based on operational
//! transformation: a compact, invertible, composable edit-script algebra, a
//! metadata envelope that preserves the algebraic laws, and the client-side
//! synchronization state machine that keeps every participant converging on
//! the same document.
//!
//! A central server serializes edits; each client speaks the protocol
//! implemented by [`Client`], sending at most one operation at a time and
//! transforming incoming concurrent operations against its own pending
//! edits. Convergence rests on the laws of [`Compose`] and [`Transform`]
//! over [`Operation`], all of which are property-tested and fuzzed.
//!
//! # Usage
//!
//! ```
//! use weft::{Operation, Transform};
//!
//! let before = "Hello World";
//!
//! let alice = Operation::new().retain(5).insert(",").retain(6);
//! let bob = Operation::new().retain(11).insert("!");
//!
//! let (alice_prime, bob_prime) = alice.transform(&bob)?;
//!
//! assert_eq!(
//!     bob_prime.apply(&alice.apply(before)?)?,
//!     alice_prime.apply(&bob.apply(before)?)?,
//! );
//! # Ok::<(), weft::Error>(())
//! ```
//!
//! Editor and transport integrations implement the [`EditorAdapter`] and
//! [`Transport`] seams and drive a [`Client`] with local edits, remote
//! operations and acknowledgements; see the [`client`](Client) docs for the
//! protocol.

mod client;
mod compose;
mod error;
mod iter;
mod op;
mod operation;
mod transform;
mod wire;
mod wrapped;

pub use client::{Client, EditorAdapter, State, Transport};
pub use compose::Compose;
pub use error::Error;
pub use op::{Len, Op, Split};
pub use operation::{Operation, Spans};
pub use transform::Transform;
pub use wrapped::{Meta, WrappedOperation};
