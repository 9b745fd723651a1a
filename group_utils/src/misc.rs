use ark_ff::PrimeField;
use ark_std::{rand::RngCore, vec::Vec};

/// Samples a uniform non-zero field element, for randomizers that get inverted.
pub fn non_zero_rand<F: PrimeField, R: RngCore>(rng: &mut R) -> F {
    loop {
        let x = F::rand(rng);
        if !x.is_zero() {
            return x;
        }
    }
}

/// Samples `n` uniform field elements.
pub fn n_rand<F: PrimeField, R: RngCore>(rng: &mut R, n: usize) -> Vec<F> {
    (0..n).map(|_| F::rand(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use ark_std::Zero;

    #[test]
    fn sampling() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let x: Fr = non_zero_rand(&mut rng);
        assert!(!x.is_zero());
        assert_eq!(n_rand::<Fr, _>(&mut rng, 5).len(), 5);
    }
}
