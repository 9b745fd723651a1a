use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use group_utils::hashing::hash_to_field;
use group_utils::serde_utils::ArkObjectBytes;
use group_utils::GroupElem;
use groth_sig::SecretKey;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sha2::Sha256;

use crate::error::TaatError;
use crate::keys::PublicKey;

/// Derives a pseudonym key pair from the user's secret: the pseudonym public
/// key is the Pedersen commitment `g*usk + h*nymSK` in the group of the base
/// `h`.
pub fn new_nym_key_pair<E: Pairing, R: RngCore>(
    rng: &mut R,
    usk: &SecretKey<E>,
    h: &GroupElem<E>,
) -> Result<(E::ScalarField, PublicKey<E>), TaatError> {
    let nym_sk = E::ScalarField::rand(rng);
    let nym_pk =
        GroupElem::product_of_exp(&GroupElem::generator(h.group()), &usk.0, h, &nym_sk)?;
    Ok((nym_sk, PublicKey(nym_pk)))
}

/// A signature under a pseudonym: a Schnorr AND-proof over the two openings
/// of the pseudonym commitment, bound to the signed message.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct NymSignature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    c: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    p_usk: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    p_nym_sk: E::ScalarField,
}

impl<E: Pairing> NymSignature<E> {
    pub fn new<R: RngCore>(
        rng: &mut R,
        usk: &SecretKey<E>,
        nym_sk: &E::ScalarField,
        nym_pk: &PublicKey<E>,
        h: &GroupElem<E>,
        msg: &[u8],
    ) -> Result<Self, TaatError> {
        let r1 = E::ScalarField::rand(rng);
        let r2 = E::ScalarField::rand(rng);
        let com = GroupElem::product_of_exp(&GroupElem::generator(h.group()), &r1, h, &r2)?;
        let c = nym_sig_prove_hash(&com, nym_pk, msg)?;
        Ok(Self {
            c,
            p_usk: r1 + c * usk.0,
            p_nym_sk: r2 + c * nym_sk,
        })
    }

    pub fn verify(
        &self,
        nym_pk: &PublicKey<E>,
        h: &GroupElem<E>,
        msg: &[u8],
    ) -> Result<(), TaatError> {
        if h.group() != nym_pk.group() {
            return Err(TaatError::InconsistentHAndNymPk);
        }
        // com = g*pUSK + h*pNymSK - nymPK*c
        let com = GroupElem::product_of_exp(
            &GroupElem::generator(h.group()),
            &self.p_usk,
            h,
            &self.p_nym_sk,
        )?
        .add(&nym_pk.0.mul(&-self.c))?;
        if nym_sig_prove_hash(&com, nym_pk, msg)? != self.c {
            return Err(TaatError::IncorrectNymSignature);
        }
        Ok(())
    }
}

/// `H(com || nymPK || msg)` as a scalar.
fn nym_sig_prove_hash<E: Pairing>(
    com: &GroupElem<E>,
    nym_pk: &PublicKey<E>,
    msg: &[u8],
) -> Result<E::ScalarField, TaatError> {
    let mut buf = Vec::new();
    com.serialize_point(&mut buf)?;
    nym_pk.0.serialize_compressed(&mut buf)?;
    buf.extend_from_slice(msg);
    Ok(hash_to_field::<E::ScalarField, Sha256>(&buf))
}
