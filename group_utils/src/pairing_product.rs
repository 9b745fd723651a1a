//! Batched evaluation of pairing-products `∑_i c_i * e(A_i, B_i)`. All terms go
//! through their Miller loops first and the final exponentiation is applied once
//! to the accumulated result, which is where the savings over naive per-term
//! pairings come from.

use ark_ec::pairing::{MillerLoopOutput, Pairing, PairingOutput};
use ark_ff::{One, PrimeField};
use ark_std::vec::Vec;

use crate::error::GroupError;
use crate::group::GroupElem;

/// One `c * e(A, B)` term of a pairing-product. The constructor accepts its two
/// group arguments in either order and a missing scalar means 1.
#[derive(Debug)]
pub struct PairingTerm<E: Pairing> {
    a: E::G1Affine,
    b: E::G2Affine,
    c: Option<E::ScalarField>,
}

impl<E: Pairing> Clone for PairingTerm<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Pairing> Copy for PairingTerm<E> {}

impl<E: Pairing> PairingTerm<E> {
    pub fn new(
        x: &GroupElem<E>,
        y: &GroupElem<E>,
        c: Option<E::ScalarField>,
    ) -> Result<Self, GroupError> {
        match (x, y) {
            (GroupElem::G1(a), GroupElem::G2(b)) => Ok(Self { a: *a, b: *b, c }),
            (GroupElem::G2(b), GroupElem::G1(a)) => Ok(Self { a: *a, b: *b, c }),
            _ => Err(GroupError::SameGroupInPairing),
        }
    }

    // Folds the scalar into the G1 argument, so the Miller loop sees c*A.
    fn scaled(&self) -> (E::G1Affine, E::G2Affine) {
        use ark_ec::{AffineRepr, CurveGroup};
        match &self.c {
            Some(c) => (self.a.mul_bigint(c.into_bigint()).into_affine(), self.b),
            None => (self.a, self.b),
        }
    }
}

/// How a pairing-product is evaluated. Both modes produce identical bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingProductMode {
    /// One Miller loop per term, multiplied into the accumulator as they come.
    MillerThenSum,
    /// Two terms share a multi-Miller loop per iteration, halving the number of
    /// accumulator multiplications in the hot loop.
    UnrolledPairs,
}

/// Evaluates `∑_i c_i * e(A_i, B_i)` with a single final exponentiation.
/// `None` terms are skipped, `None` scalars count as 1.
pub fn pairing_product<E: Pairing>(
    terms: &[Option<PairingTerm<E>>],
    mode: PairingProductMode,
) -> PairingOutput<E> {
    let pairs = terms
        .iter()
        .flatten()
        .map(PairingTerm::scaled)
        .collect::<Vec<_>>();

    let mut f = E::TargetField::one();
    match mode {
        PairingProductMode::MillerThenSum => {
            for (a, b) in &pairs {
                f *= E::miller_loop(*a, *b).0;
            }
        }
        PairingProductMode::UnrolledPairs => {
            let mut chunks = pairs.chunks_exact(2);
            for pair in chunks.by_ref() {
                f *= E::multi_miller_loop([pair[0].0, pair[1].0], [pair[0].1, pair[1].1]).0;
            }
            if let [(a, b)] = chunks.remainder() {
                f *= E::miller_loop(*a, *b).0;
            }
        }
    }
    // Cannot fail for Miller loop outputs, same as `Pairing::multi_pairing`.
    E::final_exponentiation(MillerLoopOutput(f)).unwrap()
}

/// Reference evaluation paying one final exponentiation per term.
pub fn pairing_product_naive<E: Pairing>(
    terms: &[Option<PairingTerm<E>>],
) -> PairingOutput<E> {
    use ark_ff::Zero;
    terms.iter().flatten().fold(PairingOutput::zero(), |acc, t| {
        let e = E::pairing(t.a, t.b);
        acc + match &t.c {
            Some(c) => e * *c,
            None => e,
        }
    })
}
