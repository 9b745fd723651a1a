//! Zero-knowledge presentation of a credential chain. The prover randomizes
//! every Groth signature in the chain, commits to fresh blinders through a
//! matrix of pairing-products, binds the pseudonym and the verifier's nonce
//! into a Fiat-Shamir challenge and answers with one response per hidden
//! value. The verifier rebuilds every matrix cell from the responses alone;
//! the algebra cancels exactly when the chain is authentic, the leaf key
//! matches the pseudonym and every disclosed attribute has the claimed value.

use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec, vec::Vec, UniformRand};
use group_utils::hashing::hash_to_field;
use group_utils::matrix::{compact_cells, GtMatrix, PairingMatrixComputer};
use group_utils::misc::non_zero_rand;
use group_utils::pairing_product::PairingTerm;
use group_utils::serde_utils::ArkObjectBytes;
use group_utils::GroupElem;
use groth_sig::{SecretKey, Signature};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sha2::Sha256;

use crate::attribute::AttrSet;
use crate::credential::Credential;
use crate::error::TaatError;
use crate::keys::PublicKey;
use crate::{level_group, Parameters};

/// Per-level responses: the randomized `r` and the blinded `s` and `t`
/// components of that level's signature.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ResSig<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub r_prime: GroupElem<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub res_s: GroupElem<E>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub res_t: Vec<GroupElem<E>>,
}

/// A non-interactive presentation proof for a level-L chain. Levels are
/// 1-indexed; level `i` sits at position `i - 1` of every per-level vector.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct CredProof<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    comm: E::ScalarField,
    res_sigs: Vec<ResSig<E>>,
    #[serde_as(as = "Vec<Vec<Option<ArkObjectBytes>>>")]
    res_attr: Vec<Vec<Option<GroupElem<E>>>>,
    #[serde_as(as = "Vec<Option<ArkObjectBytes>>")]
    res_upk: Vec<Option<GroupElem<E>>>,
    #[serde_as(as = "ArkObjectBytes")]
    res_usk: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    res_nym: E::ScalarField,
}

impl<E: Pairing> CredProof<E> {
    /// Proves possession of `cred` (and of `usk` behind its leaf key) under
    /// the pseudonym derived from `nym_sk`, disclosing exactly the attribute
    /// values listed in `attr_set` and binding the proof to `nonce`.
    pub fn new<R: RngCore>(
        rng: &mut R,
        sp: &Parameters<E>,
        cred: &Credential<E>,
        usk: &SecretKey<E>,
        nym_sk: &E::ScalarField,
        attr_set: &AttrSet<E>,
        nonce: &[u8],
    ) -> Result<Self, TaatError> {
        let level = cred.level();
        if level == 0 {
            return Err(TaatError::MissingSignature(0));
        }

        // Blinders; index i-1 holds level i's.
        let mut rho_sigmas = Vec::with_capacity(level);
        let mut orig_rs = Vec::with_capacity(level);
        let mut rand_sigs: Vec<Signature<E>> = Vec::with_capacity(level);
        let mut rho_ss = Vec::with_capacity(level);
        let mut rho_upks = Vec::with_capacity(level);
        let mut rho_ts: Vec<Vec<E::ScalarField>> = Vec::with_capacity(level);
        let mut rho_attrs: Vec<Vec<E::ScalarField>> = Vec::with_capacity(level);

        for i in 1..=level {
            let c = cred.at_level(i).unwrap();
            if c.attrs.len() > sp.max_attrs {
                return Err(TaatError::TooManyAttributes(c.attrs.len(), sp.max_attrs));
            }

            let rho: E::ScalarField = non_zero_rand(rng);
            let mut sig = c.sig.clone().ok_or(TaatError::MissingSignature(i))?;
            orig_rs.push(sig.r);
            sig.randomize(&rho);
            rho_sigmas.push(rho);
            rand_sigs.push(sig);

            rho_ss.push(E::ScalarField::rand(rng));
            rho_upks.push(E::ScalarField::rand(rng));
            rho_ts.push((0..=c.attrs.len()).map(|_| E::ScalarField::rand(rng)).collect());
            rho_attrs.push((0..c.attrs.len()).map(|_| E::ScalarField::rand(rng)).collect());
        }

        // The commitment matrix: rows are levels, column 0 blinds the `s`
        // predicate, column 1 the key predicate, column j+2 attribute j.
        let mut ec = PairingMatrixComputer::new(level, level, sp.max_attrs + 2);
        for i in 1..=level {
            let idx = i - 1;
            let c = cred.at_level(i).unwrap();
            let orig_r = &orig_rs[idx];
            let mg = level_group(i);
            let g = GroupElem::generator(mg);
            let g_other = GroupElem::generator(mg.opposite());
            let g_neg = g.neg();
            let g_other_neg = g_other.neg();

            let mut eas1 = vec![Some(PairingTerm::new(
                &g,
                orig_r,
                Some(rho_sigmas[idx] * rho_ss[idx]),
            )?)];
            let mut eas2 = vec![
                Some(PairingTerm::new(
                    &g,
                    orig_r,
                    Some(rho_sigmas[idx] * rho_ts[idx][0]),
                )?),
                Some(PairingTerm::new(&g, &g_other_neg, Some(rho_upks[idx]))?),
            ];
            if i > 1 {
                eas1.push(Some(PairingTerm::new(
                    &g_neg,
                    &g_other,
                    Some(rho_upks[idx - 1]),
                )?));
                eas2.push(Some(PairingTerm::new(
                    &sp.y_at(0, i).neg(),
                    &g_other,
                    Some(rho_upks[idx - 1]),
                )?));
            }
            ec.enqueue(eas1, idx, 0);
            ec.enqueue(eas2, idx, 1);

            for j in 0..c.attrs.len() {
                let mut eas = vec![Some(PairingTerm::new(
                    &g,
                    orig_r,
                    Some(rho_sigmas[idx] * rho_ts[idx][j + 1]),
                )?)];
                if i > 1 {
                    eas.push(Some(PairingTerm::new(
                        &sp.y_at(j + 1, i).neg(),
                        &g_other,
                        Some(rho_upks[idx - 1]),
                    )?));
                }
                if attr_set.get(i, j).is_none() {
                    eas.push(Some(PairingTerm::new(
                        &g,
                        &g_other_neg,
                        Some(rho_attrs[idx][j]),
                    )?));
                }
                ec.enqueue(eas, idx, j + 2);
            }
        }
        let cijs = ec.result()?;

        // Pseudonym commitment in the leaf level's group.
        let rho_nym = E::ScalarField::rand(rng);
        let cnym = GroupElem::product_of_exp(
            &GroupElem::generator(level_group(level)),
            &rho_upks[level - 1],
            &sp.nym_base(level),
            &rho_nym,
        )?;

        let r_primes = rand_sigs.iter().map(|s| s.r).collect::<Vec<_>>();
        let comm =
            cred_comm_hash(&sp.root_upk, &r_primes, &cijs, &cnym, attr_set, nonce)?;

        // Responses.
        let mut res_sigs = Vec::with_capacity(level);
        let mut res_upk = vec![None; level];
        let mut res_attr = Vec::with_capacity(level);
        for i in 1..=level {
            let idx = i - 1;
            let c = cred.at_level(i).unwrap();
            let mg = level_group(i);
            let g = GroupElem::generator(mg);
            let rsig = &rand_sigs[idx];

            let res_s = GroupElem::product_of_exp(&g, &rho_ss[idx], &rsig.s, &comm)?;
            let res_t = (0..=c.attrs.len())
                .map(|k| GroupElem::product_of_exp(&g, &rho_ts[idx][k], &rsig.ts[k], &comm))
                .collect::<Result<Vec<_>, _>>()?;
            if i != level {
                res_upk[idx] = Some(GroupElem::product_of_exp(
                    &g,
                    &rho_upks[idx],
                    &c.upk.0,
                    &comm,
                )?);
            }

            let mut row = vec![None; c.attrs.len()];
            for (j, slot) in row.iter_mut().enumerate() {
                if attr_set.get(i, j).is_none() {
                    *slot = Some(GroupElem::product_of_exp(
                        &g,
                        &rho_attrs[idx][j],
                        &c.attrs[j].at_group(mg),
                        &comm,
                    )?);
                }
            }
            res_attr.push(row);
            res_sigs.push(ResSig {
                r_prime: rsig.r,
                res_s,
                res_t,
            });
        }

        let res_usk = rho_upks[level - 1] + comm * usk.0;
        let res_nym = rho_nym + comm * *nym_sk;

        Ok(Self {
            comm,
            res_sigs,
            res_attr,
            res_upk,
            res_usk,
            res_nym,
        })
    }

    /// Rebuilds every commitment from the responses and accepts iff the
    /// recomputed challenge matches. The verifier's `attr_set` fixes the
    /// disclosed values it is willing to accept.
    pub fn verify(
        &self,
        sp: &Parameters<E>,
        attr_set: &AttrSet<E>,
        nym_pk: &PublicKey<E>,
        nonce: &[u8],
    ) -> Result<(), TaatError> {
        let level = self.res_sigs.len();
        if level == 0
            || self.res_attr.len() != level
            || self.res_upk.len() != level
            || self
                .res_sigs
                .iter()
                .zip(self.res_attr.iter())
                .any(|(rs, ra)| rs.res_t.len() != ra.len() + 1 || ra.len() > sp.max_attrs)
        {
            return Err(TaatError::IncorrectCredProof);
        }
        if nym_pk.group() != level_group(level) {
            return Err(TaatError::WrongGroupNymPk);
        }

        let c_neg = -self.comm;
        let mut ec = PairingMatrixComputer::new(level, level, sp.max_attrs + 2);
        for i in 1..=level {
            let idx = i - 1;
            let mg = level_group(i);
            let g = GroupElem::generator(mg);
            let g_other = GroupElem::generator(mg.opposite());
            let g_neg = g.neg();
            let g_other_neg = g_other.neg();
            let rsig = &self.res_sigs[idx];
            let y0 = sp.y_at(0, i);

            let prev_upk = if i > 1 {
                Some(
                    self.res_upk[idx - 1]
                        .as_ref()
                        .ok_or(TaatError::IncorrectCredProof)?,
                )
            } else {
                None
            };

            let mut eas1 = vec![
                Some(PairingTerm::new(&rsig.res_s, &rsig.r_prime, None)?),
                Some(PairingTerm::new(&y0, &g_other, Some(c_neg))?),
            ];
            let mut eas2 = vec![Some(PairingTerm::new(&rsig.res_t[0], &rsig.r_prime, None)?)];
            match prev_upk {
                None => {
                    eas1.push(Some(PairingTerm::new(&g, &sp.root_upk.0, Some(c_neg))?));
                    eas2.push(Some(PairingTerm::new(&y0, &sp.root_upk.0, Some(c_neg))?));
                }
                Some(prev) => {
                    eas1.push(Some(PairingTerm::new(&g_neg, prev, None)?));
                    eas2.push(Some(PairingTerm::new(&y0.neg(), prev, None)?));
                }
            }
            if i == level {
                eas2.push(Some(PairingTerm::new(&g, &g_other_neg, Some(self.res_usk))?));
            } else {
                let upk_i = self.res_upk[idx]
                    .as_ref()
                    .ok_or(TaatError::IncorrectCredProof)?;
                eas2.push(Some(PairingTerm::new(upk_i, &g_other_neg, None)?));
            }
            ec.enqueue(eas1, idx, 0);
            ec.enqueue(eas2, idx, 1);

            for j in 0..self.res_attr[idx].len() {
                let mut eas = vec![Some(PairingTerm::new(
                    &rsig.res_t[j + 1],
                    &rsig.r_prime,
                    None,
                )?)];
                let yj = sp.y_at(j + 1, i);
                match prev_upk {
                    None => eas.push(Some(PairingTerm::new(&yj, &sp.root_upk.0, Some(c_neg))?)),
                    Some(prev) => eas.push(Some(PairingTerm::new(&yj.neg(), prev, None)?)),
                }
                match attr_set.get(i, j) {
                    Some(elem) => eas.push(Some(PairingTerm::new(
                        &elem.value.at_group(mg),
                        &g_other,
                        Some(c_neg),
                    )?)),
                    None => {
                        let res_a = self.res_attr[idx][j]
                            .as_ref()
                            .ok_or(TaatError::IncorrectCredProof)?;
                        eas.push(Some(PairingTerm::new(res_a, &g_other_neg, None)?));
                    }
                }
                ec.enqueue(eas, idx, j + 2);
            }
        }
        let cijs = ec.result()?;

        // cnym = g*resUSK + h*resNym - nymPK*comm
        let cnym = GroupElem::product_of_exp(
            &GroupElem::generator(level_group(level)),
            &self.res_usk,
            &sp.nym_base(level),
            &self.res_nym,
        )?
        .add(&nym_pk.0.mul(&c_neg))?;

        let r_primes = self.res_sigs.iter().map(|s| s.r_prime).collect::<Vec<_>>();
        let comm = cred_comm_hash(&sp.root_upk, &r_primes, &cijs, &cnym, attr_set, nonce)?;
        if comm != self.comm {
            return Err(TaatError::IncorrectCredProof);
        }
        Ok(())
    }
}

/// `H(rootUPK || rPrimes || compact(Cij) || cnym || attrSet || nonce)`.
/// Matrix rows flatten in level order and stop at the first absent cell.
fn cred_comm_hash<E: Pairing>(
    root_upk: &PublicKey<E>,
    r_primes: &[GroupElem<E>],
    cijs: &GtMatrix<E>,
    cnym: &GroupElem<E>,
    attr_set: &AttrSet<E>,
    nonce: &[u8],
) -> Result<E::ScalarField, TaatError> {
    let mut buf = Vec::new();
    root_upk.0.serialize_compressed(&mut buf)?;
    for r in r_primes {
        r.serialize_point(&mut buf)?;
    }
    for cell in compact_cells(cijs) {
        cell.serialize_compressed(&mut buf)?;
    }
    cnym.serialize_point(&mut buf)?;
    attr_set.serialize_into(&mut buf)?;
    buf.extend_from_slice(nonce);
    Ok(hash_to_field::<E::ScalarField, Sha256>(&buf))
}
