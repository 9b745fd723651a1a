//! Shamir secret sharing

use ark_ff::PrimeField;
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, Polynomial};
use ark_std::{cfg_into_iter, rand::RngCore, vec::Vec};

use crate::{
    common,
    common::{ShareId, Shares},
    error::SSError,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Deals a fresh random secret into `total` shares with threshold `threshold`.
/// Returns the secret, its shares and the dealt polynomial.
pub fn deal_random_secret<R: RngCore, F: PrimeField>(
    rng: &mut R,
    threshold: ShareId,
    total: ShareId,
) -> Result<(F, Shares<F>, DensePolynomial<F>), SSError> {
    let secret = F::rand(rng);
    let (shares, poly) = deal_secret(rng, secret, threshold, total)?;
    Ok((secret, shares, poly))
}

/// Deals the given `secret` into `total` shares; any `threshold` of them
/// reconstruct it. The secret is the constant coefficient of a random
/// polynomial of degree `threshold - 1`, shares are its evaluations at
/// x = 1..=total.
pub fn deal_secret<R: RngCore, F: PrimeField>(
    rng: &mut R,
    secret: F,
    threshold: ShareId,
    total: ShareId,
) -> Result<(Shares<F>, DensePolynomial<F>), SSError> {
    if threshold > total || threshold < 1 || total < 2 {
        return Err(SSError::InvalidThresholdOrTotal(threshold, total));
    }
    let mut coeffs = Vec::with_capacity(threshold as usize);
    coeffs.push(secret);
    coeffs.extend((1..threshold).map(|_| F::rand(rng)));
    let poly = DensePolynomial::from_coefficients_vec(coeffs);
    let shares = cfg_into_iter!(1..=total)
        .map(|i| (i, threshold, poly.evaluate(&F::from(i as u64))).into())
        .collect::<Vec<_>>();
    Ok((Shares(shares), poly))
}

impl<F: PrimeField> Shares<F> {
    /// Reconstructs the secret from the first `threshold` shares.
    pub fn reconstruct_secret(&self) -> Result<F, SSError> {
        let threshold = self.threshold();
        let len = self.0.len() as ShareId;
        if threshold > len {
            return Err(SSError::BelowThreshold(threshold, len));
        }
        let shares = &self.0[0..threshold as usize];
        let ids = shares.iter().map(|s| s.id).collect::<Vec<_>>();
        let basis = common::lagrange_basis_at_0_for_all::<F>(&ids)?;
        Ok(basis
            .into_iter()
            .zip(shares.iter())
            .map(|(b, s)| b * s.share)
            .sum::<F>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rejects_bad_threshold_or_total() {
        let mut rng = StdRng::seed_from_u64(0u64);
        assert!(deal_random_secret::<_, Fr>(&mut rng, 1, 1).is_err());
        assert!(deal_random_secret::<_, Fr>(&mut rng, 5, 4).is_err());
        assert!(deal_random_secret::<_, Fr>(&mut rng, 0, 4).is_err());
    }

    #[test]
    fn deal_and_reconstruct() {
        let mut rng = StdRng::seed_from_u64(0u64);

        for (threshold, total) in [(2u16, 2u16), (2, 3), (3, 5), (4, 9), (7, 15)] {
            let (secret, shares, poly) =
                deal_random_secret::<_, Fr>(&mut rng, threshold, total).unwrap();

            assert_eq!(shares.0.len(), total as usize);
            assert_eq!(poly.degree(), threshold as usize - 1);
            assert_eq!(secret, poly.evaluate(&Fr::from(0u64)));
            for (i, share) in shares.0.iter().enumerate() {
                assert_eq!(share.id, i as ShareId + 1);
                assert_eq!(share.share, poly.evaluate(&Fr::from(share.id as u64)));
            }

            assert_eq!(shares.reconstruct_secret().unwrap(), secret);
        }
    }

    #[test]
    fn reconstruct_needs_threshold_shares() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let (_, mut shares, _) = deal_random_secret::<_, Fr>(&mut rng, 3, 5).unwrap();
        shares.0.truncate(2);
        assert_eq!(
            shares.reconstruct_secret(),
            Err(SSError::BelowThreshold(3, 2))
        );
    }

    #[test]
    fn zero_share_id_is_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let (_, mut shares, _) = deal_random_secret::<_, Fr>(&mut rng, 2, 3).unwrap();
        shares.0[0].id = 0;
        assert!(shares.reconstruct_secret().is_err());
    }
}
