//! A Σ-proof binding a TTBE escrow to the presenting pseudonym: it shows that
//! the ciphertext encrypts the prover's own public key under the recorded
//! blinding, and that the pseudonym commits to the same user secret.

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
use ttbe::{Cttbe, TPK};

use crate::error::TaatError;
use crate::keys::PublicKey;

/// Proof of consistency between an escrow ciphertext and a pseudonym. `p1`
/// answers for the user secret, `p2` for the combined encryption blinding
/// `r1 + r2`, `p3` for the pseudonym secret.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct AuditProof<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    c: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub p1: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub p2: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub p3: E::ScalarField,
}

impl<E: Pairing> AuditProof<E> {
    /// `r1` and `r2` are the blinding scalars returned by
    /// [`Cttbe::encrypt`]; the ciphertext, pseudonym and pseudonym base must
    /// all live in the same group.
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: RngCore>(
        rng: &mut R,
        tpk: &TPK<E>,
        cttbe: &Cttbe<E>,
        r1: &E::ScalarField,
        r2: &E::ScalarField,
        usk: &SecretKey<E>,
        nym_sk: &E::ScalarField,
        nym_pk: &PublicKey<E>,
        h: &GroupElem<E>,
    ) -> Result<Self, TaatError> {
        if !in_same_group(cttbe, nym_pk, h) {
            return Err(TaatError::CttbeAndPksNotInSameGroup);
        }

        let group = cttbe.group();
        let g = GroupElem::generator(group);
        let u = tpk.u(group);
        let r = *r1 + r2;

        let rho1 = E::ScalarField::rand(rng);
        let rho2 = E::ScalarField::rand(rng);
        let rho3 = E::ScalarField::rand(rng);

        let com1 = GroupElem::product_of_exp(&g, &rho1, &u, &rho2)?;
        let com2 = g.mul(&rho2);
        let com3 = GroupElem::product_of_exp(h, &rho3, &g, &rho1)?;

        let c = audit_prove_hash(&com1, &com2, &com3, nym_pk, cttbe)?;
        Ok(Self {
            c,
            p1: rho1 + c * usk.0,
            p2: rho2 + c * r,
            p3: rho3 + c * *nym_sk,
        })
    }

    pub fn verify(
        &self,
        cttbe: &Cttbe<E>,
        tpk: &TPK<E>,
        nym_pk: &PublicKey<E>,
        h: &GroupElem<E>,
    ) -> Result<(), TaatError> {
        if !in_same_group(cttbe, nym_pk, h) {
            return Err(TaatError::CttbeAndPksNotInSameGroup);
        }

        let group = cttbe.group();
        let g = GroupElem::generator(group);
        let u = tpk.u(group);
        let c_neg = -self.c;

        // com1 = g*p1 + u*p2 - C3*c, com2 = g*p2 - C6*c,
        // com3 = g*p1 + h*p3 - nymPK*c
        let com1 = GroupElem::product_of_exp(&g, &self.p1, &u, &self.p2)?
            .add(&cttbe.c3.mul(&c_neg))?;
        let com2 = g.mul(&self.p2).add(&cttbe.c6.mul(&c_neg))?;
        let com3 = GroupElem::product_of_exp(&g, &self.p1, h, &self.p3)?
            .add(&nym_pk.0.mul(&c_neg))?;

        if audit_prove_hash(&com1, &com2, &com3, nym_pk, cttbe)? != self.c {
            return Err(TaatError::IncorrectAuditProof);
        }
        Ok(())
    }
}

fn in_same_group<E: Pairing>(cttbe: &Cttbe<E>, nym_pk: &PublicKey<E>, h: &GroupElem<E>) -> bool {
    let group = cttbe.group();
    nym_pk.group() == group && h.group() == group
}

/// `H(com1 || com2 || com3 || nymPK || cttbe)` as a scalar; the pseudonym
/// contributes its bare point, the ciphertext its tagged wire bytes.
fn audit_prove_hash<E: Pairing>(
    com1: &GroupElem<E>,
    com2: &GroupElem<E>,
    com3: &GroupElem<E>,
    nym_pk: &PublicKey<E>,
    cttbe: &Cttbe<E>,
) -> Result<E::ScalarField, TaatError> {
    let mut buf = Vec::new();
    com1.serialize_point(&mut buf)?;
    com2.serialize_point(&mut buf)?;
    com3.serialize_point(&mut buf)?;
    nym_pk.0.serialize_point(&mut buf)?;
    buf.extend_from_slice(&cttbe.to_bytes().map_err(TaatError::from)?);
    Ok(hash_to_field::<E::ScalarField, Sha256>(&buf))
}
