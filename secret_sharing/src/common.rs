use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use group_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::SSError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Identifies a share; must be greater than 0 since the secret sits at x = 0.
pub type ShareId = u16;

/// A single evaluation of the dealt polynomial.
#[serde_as]
#[derive(
    Default,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Zeroize,
    ZeroizeOnDrop,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct Share<F: PrimeField> {
    #[zeroize(skip)]
    pub id: ShareId,
    #[zeroize(skip)]
    pub threshold: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub share: F,
}

/// All shares of one dealing. Expects unique ids and a common threshold.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Shares<F: PrimeField>(pub Vec<Share<F>>);

impl<F: PrimeField> From<(ShareId, ShareId, F)> for Share<F> {
    fn from((id, threshold, share): (ShareId, ShareId, F)) -> Self {
        Share {
            id,
            threshold,
            share,
        }
    }
}

impl<F: PrimeField> Shares<F> {
    pub fn threshold(&self) -> ShareId {
        self.0[0].threshold
    }
}

/// Lagrange basis polynomial for `i` evaluated at x = 0, over the given `x`
/// coordinates. Coordinates must be distinct and non-zero.
pub fn lagrange_basis_at_0<F: PrimeField>(x_coords: &[ShareId], i: ShareId) -> Result<F, SSError> {
    let mut numerator = F::one();
    let mut denominator = F::one();
    let i_f = F::from(i as u64);
    for x in x_coords {
        if *x == 0 {
            return Err(SSError::XCordCantBeZero);
        }
        if *x == i {
            continue;
        }
        let x = F::from(*x as u64);
        numerator *= x;
        denominator *= x - i_f;
    }
    denominator.inverse_in_place().unwrap();
    Ok(numerator * denominator)
}

/// Lagrange basis polynomials at x = 0 for every given coordinate at once.
pub fn lagrange_basis_at_0_for_all<F: PrimeField>(x_coords: &[ShareId]) -> Result<Vec<F>, SSError> {
    #[cfg(feature = "parallel")]
    return x_coords
        .par_iter()
        .map(|i| lagrange_basis_at_0::<F>(x_coords, *i))
        .collect();
    #[cfg(not(feature = "parallel"))]
    x_coords
        .iter()
        .map(|i| lagrange_basis_at_0::<F>(x_coords, *i))
        .collect()
}
