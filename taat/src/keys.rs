use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use group_utils::hashing::hash_to_field;
use group_utils::serde_utils::ArkObjectBytes;
use group_utils::{GroupElem, SourceGroup};
use groth_sig::SecretKey;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sha2::Sha256;

use crate::error::TaatError;
use crate::level_group;

/// A user or pseudonym public key: a single group element tagged with its
/// group. Its wire form is one tag byte (1 for G1, 0 for G2) followed by the
/// point.
#[serde_as]
#[derive(
    Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub GroupElem<E>);

impl<E: Pairing> Clone for PublicKey<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Pairing> Copy for PublicKey<E> {}

impl<E: Pairing> PublicKey<E> {
    pub fn group(&self) -> SourceGroup {
        self.0.group()
    }

    pub fn in_g1(&self) -> bool {
        self.0.is_in_g1()
    }

    /// True if this key is the one `sk` generates in this key's group.
    pub fn verify(&self, sk: &SecretKey<E>) -> bool {
        GroupElem::scalar_base_mult(self.group(), &sk.0) == self.0
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TaatError> {
        let mut bytes = Vec::new();
        self.0.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TaatError> {
        let (&tag, rest) = bytes
            .split_first()
            .ok_or(TaatError::Serialization(SerializationError::InvalidData))?;
        let elem = match tag {
            1 => GroupElem::G1(E::G1Affine::deserialize_compressed(rest)?),
            0 => GroupElem::G2(E::G2Affine::deserialize_compressed(rest)?),
            b => return Err(TaatError::IllegalInGroupByte(b)),
        };
        Ok(Self(elem))
    }
}

/// Generates a user key pair for the given delegation level; the public key
/// lands in G1 at even levels and in G2 at odd ones.
pub fn new_user_key_pair<E: Pairing, R: RngCore>(
    rng: &mut R,
    level: usize,
) -> (SecretKey<E>, PublicKey<E>) {
    let (sk, pk) = groth_sig::keygen::<E, _>(rng);
    let upk = PublicKey(pk.at(level_group(level)));
    (sk, upk)
}

/// Schnorr proof of knowledge of the secret key behind a public key, bound to
/// a caller-chosen nonce.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct UskProof<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    c: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    p: E::ScalarField,
}

impl<E: Pairing> UskProof<E> {
    pub fn new<R: RngCore>(
        rng: &mut R,
        usk: &SecretKey<E>,
        upk: &PublicKey<E>,
        nonce: &[u8],
    ) -> Result<Self, TaatError> {
        let r = E::ScalarField::rand(rng);
        let com = GroupElem::scalar_base_mult(upk.group(), &r);
        let c = usk_prove_hash(&com, upk, nonce)?;
        Ok(Self { c, p: r + c * usk.0 })
    }

    pub fn verify(&self, upk: &PublicKey<E>, nonce: &[u8]) -> Result<(), TaatError> {
        // com = g*p - upk*c
        let com = GroupElem::product_of_exp(
            &GroupElem::generator(upk.group()),
            &self.p,
            &upk.0,
            &-self.c,
        )?;
        if usk_prove_hash(&com, upk, nonce)? != self.c {
            return Err(TaatError::IncorrectUskProof);
        }
        Ok(())
    }
}

/// `H(com || upk || nonce)` as a scalar.
fn usk_prove_hash<E: Pairing>(
    com: &GroupElem<E>,
    upk: &PublicKey<E>,
    nonce: &[u8],
) -> Result<E::ScalarField, TaatError> {
    let mut buf = Vec::new();
    com.serialize_point(&mut buf)?;
    upk.0.serialize_compressed(&mut buf)?;
    buf.extend_from_slice(nonce);
    Ok(hash_to_field::<E::ScalarField, Sha256>(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type Fr = <Bls12_381 as Pairing>::ScalarField;

    #[test]
    fn key_group_follows_level_parity() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for level in 0..4 {
            let (sk, upk) = new_user_key_pair::<Bls12_381, _>(&mut rng, level);
            assert_eq!(upk.in_g1(), level % 2 == 0);
            assert!(upk.verify(&sk));

            let (other_sk, _) = new_user_key_pair::<Bls12_381, _>(&mut rng, level);
            assert!(!upk.verify(&other_sk));
        }
    }

    #[test]
    fn usk_proof_round_trip() {
        let mut rng = StdRng::seed_from_u64(1u64);
        for level in [0usize, 1] {
            let (sk, upk) = new_user_key_pair::<Bls12_381, _>(&mut rng, level);
            let proof = UskProof::new(&mut rng, &sk, &upk, b"nonce").unwrap();
            proof.verify(&upk, b"nonce").unwrap();

            assert!(matches!(
                proof.verify(&upk, b"other nonce"),
                Err(TaatError::IncorrectUskProof)
            ));
        }
    }

    #[test]
    fn randomized_response_fails() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let (sk, upk) = new_user_key_pair::<Bls12_381, _>(&mut rng, 1);
        let mut proof = UskProof::new(&mut rng, &sk, &upk, b"nonce").unwrap();
        proof.p = Fr::rand(&mut rng);
        assert!(matches!(
            proof.verify(&upk, b"nonce"),
            Err(TaatError::IncorrectUskProof)
        ));
    }

    #[test]
    fn public_key_bytes_round_trip() {
        let mut rng = StdRng::seed_from_u64(3u64);
        for _ in 0..100 {
            let level = (u64::rand(&mut rng) % 2) as usize;
            let (_, upk) = new_user_key_pair::<Bls12_381, _>(&mut rng, level);
            let bytes = upk.to_bytes().unwrap();
            assert_eq!(bytes[0], u8::from(upk.in_g1()));
            assert_eq!(PublicKey::<Bls12_381>::from_bytes(&bytes).unwrap(), upk);
        }
    }

    #[test]
    fn bad_group_byte_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let (_, upk) = new_user_key_pair::<Bls12_381, _>(&mut rng, 0);
        let mut bytes = upk.to_bytes().unwrap();
        bytes[0] = 3;
        assert!(matches!(
            PublicKey::<Bls12_381>::from_bytes(&bytes),
            Err(TaatError::IllegalInGroupByte(3))
        ));
    }
}
