#![no_main]

use libfuzzer_sys::fuzz_target;
use weft::{Compose, Op, Operation, Transform};

/// Fits an arbitrary action sequence onto a document of `base` characters:
/// retains and deletes are clamped to the remaining input, and whatever is
/// left over is retained, so every seed becomes a well-formed operation.
fn fit(seed: Vec<Op>, base: usize) -> Operation {
    let mut operation = Operation::new();
    let mut remaining = base;

    for op in seed {
        match op {
            Op::Retain(n) => {
                let n = n.min(remaining);
                operation.push(Op::Retain(n));
                remaining -= n;
            }
            Op::Insert(text) => operation.push(Op::Insert(text)),
            Op::Delete(n) => {
                let n = n.min(remaining);
                operation.push(Op::Delete(n));
                remaining -= n;
            }
        }
    }

    operation.push(Op::Retain(remaining));
    operation
}

fuzz_target!(|data: (String, Vec<Op>, Vec<Op>)| {
    let (document, alice_seed, bob_seed) = data;
    let base = document.chars().count();

    let alice = fit(alice_seed, base);
    let bob = fit(bob_seed, base);

    let (alice_prime, bob_prime) = alice.transform(&bob).unwrap();

    let alice_bob = bob_prime.apply(&alice.apply(&document).unwrap()).unwrap();
    let bob_alice = alice_prime.apply(&bob.apply(&document).unwrap()).unwrap();

    assert_eq!(alice_bob, bob_alice);
    assert_eq!(
        alice.compose(&bob_prime).unwrap(),
        bob.compose(&alice_prime).unwrap(),
    );

    let inverse = alice.invert(&document);
    assert_eq!(
        inverse.apply(&alice.apply(&document).unwrap()).unwrap(),
        document,
    );
});
