use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec};
use groth_sig::SecretKey;
use serde::{Deserialize, Serialize};

use crate::error::TaatError;
use crate::keys::{PublicKey, UskProof};

/// What a prospective delegatee hands the issuer: its public key, the
/// issuer's nonce, and a proof that it knows the matching secret key.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct CredRequest<E: Pairing> {
    pub nonce: Vec<u8>,
    pub upk: PublicKey<E>,
    pub usk_proof: UskProof<E>,
}

impl<E: Pairing> CredRequest<E> {
    pub fn new<R: RngCore>(
        rng: &mut R,
        usk: &SecretKey<E>,
        upk: PublicKey<E>,
        nonce: Vec<u8>,
    ) -> Result<Self, TaatError> {
        let usk_proof = UskProof::new(rng, usk, &upk, &nonce)?;
        Ok(Self {
            nonce,
            upk,
            usk_proof,
        })
    }

    /// Issuer-side check before delegating to `upk`.
    pub fn check(&self) -> Result<(), TaatError> {
        self.usk_proof.verify(&self.upk, &self.nonce)
    }
}
