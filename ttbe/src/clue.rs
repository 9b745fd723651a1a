use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use group_utils::serde_utils::ArkObjectBytes;
use group_utils::{GroupElem, SourceGroup};
use secret_sharing::{lagrange_basis_at_0, ShareId};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::encrypt::Cttbe;
use crate::error::TtbeError;
use crate::setup::{TPK, TSK, TVK};

/// An auditor's partial decryption of a ciphertext: `(C1*u_i, C2*v_i)`,
/// in the ciphertext's group.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct AudClue<E: Pairing> {
    pub id: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub ac1: GroupElem<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub ac2: GroupElem<E>,
}

impl<E: Pairing> AudClue<E> {
    pub fn group(&self) -> SourceGroup {
        self.ac1.group()
    }

    pub fn in_g1(&self) -> bool {
        self.ac1.is_in_g1()
    }

    /// Checks `e(ac1, h) == e(C1, u_i)` and `e(ac2, v) == e(C2, v_i)`, i.e.
    /// that the clue really applies this auditor's key share. The ciphertext
    /// itself must be valid and the clue must share its group.
    pub fn is_valid(
        &self,
        tpk: &TPK<E>,
        tag: &E::ScalarField,
        cttbe: &Cttbe<E>,
        tvk: &TVK<E>,
    ) -> Result<bool, TtbeError> {
        if !cttbe.is_valid(tpk, tag)? || self.group() != cttbe.group() {
            return Ok(false);
        }
        let other = cttbe.group().opposite();
        let (h, v) = (tpk.h(other), tpk.v(other));
        let (u_i, v_i) = (tvk.u(other), tvk.v(other));

        Ok(self.ac1.pair(&h)? == cttbe.c1.pair(&u_i)?
            && self.ac2.pair(&v)? == cttbe.c2.pair(&v_i)?)
    }
}

/// Produces an auditor's clue for a valid ciphertext.
pub fn share_aud_clue<E: Pairing>(
    tpk: &TPK<E>,
    tag: &E::ScalarField,
    cttbe: &Cttbe<E>,
    tsk: &TSK<E>,
) -> Result<AudClue<E>, TtbeError> {
    if !cttbe.is_valid(tpk, tag)? {
        return Err(TtbeError::InvalidCiphertext);
    }
    Ok(AudClue {
        id: tsk.id,
        ac1: cttbe.c1.mul(&tsk.u),
        ac2: cttbe.c2.mul(&tsk.v),
    })
}

/// Opens a ciphertext from a quorum of clues. `tvks` and `clues` pair up by
/// position; every clue is validated against its verification key before the
/// Lagrange combination, so a single corrupt auditor cannot skew the result.
pub fn combine<E: Pairing>(
    tpk: &TPK<E>,
    tag: &E::ScalarField,
    cttbe: &Cttbe<E>,
    tvks: &[TVK<E>],
    clues: &[AudClue<E>],
) -> Result<GroupElem<E>, TtbeError> {
    if tvks.is_empty() || clues.is_empty() {
        return Err(TtbeError::EmptyTvksOrAudClues);
    }
    if tvks.len() != clues.len() {
        return Err(TtbeError::UnequalLenOfTvksAndAudClues(
            tvks.len(),
            clues.len(),
        ));
    }
    if !cttbe.is_valid(tpk, tag)? {
        return Err(TtbeError::InvalidCiphertext);
    }

    let indices = clues.iter().map(|c| c.id).collect::<Vec<_>>();

    let mut den = GroupElem::<E>::zero(cttbe.group());
    for (clue, tvk) in clues.iter().zip(tvks.iter()) {
        if !clue.is_valid(tpk, tag, cttbe, tvk)? {
            return Err(TtbeError::InvalidAudClue(clue.id));
        }
        let coeff = lagrange_basis_at_0::<E::ScalarField>(&indices, clue.id)?;
        den = den.add(&clue.ac1.add(&clue.ac2)?.mul(&coeff))?;
    }

    cttbe.c3.add(&den.neg()).map_err(TtbeError::from)
}
