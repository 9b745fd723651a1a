use ark_ff::PrimeField;
use digest::Digest;

/// Hashes `bytes` and interprets the digest as a big-endian integer reduced
/// modulo the field order. Every Fiat-Shamir challenge in this workspace goes
/// through here, so prover and verifier agree on the digest-to-scalar map.
pub fn hash_to_field<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    F::from_be_bytes_mod_order(&D::digest(bytes))
}
