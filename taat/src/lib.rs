//! Traceable anonymous attribute-based credentials with threshold tracing.
//!
//! A root authority issues level-1 credentials; every holder can delegate to
//! the next level, attaching a vector of attributes, by Groth-signing the
//! delegatee's key. Group placement alternates with the delegation level
//! (even levels in G1, odd in G2). A holder presents a credential under a
//! pseudonym with a non-interactive zero-knowledge proof that reveals a
//! chosen subset of attributes and nothing else, and can escrow its identity
//! in a [`ttbe`] ciphertext that an auditor quorum opens, with an audit proof
//! binding the escrow to the presenting pseudonym. The issuance and
//! presentation protocols follow
//! [Camenisch, Drijvers and Dubovitskaya](https://eprint.iacr.org/2017/1089.pdf).

#![cfg_attr(not(feature = "std"), no_std)]

pub mod attribute;
pub mod audit;
pub mod cred_proof;
pub mod credential;
pub mod error;
pub mod keys;
pub mod pseudonym;
pub mod request;

pub use attribute::{AttrSet, AttrSetElem, Attribute};
pub use audit::AuditProof;
pub use cred_proof::CredProof;
pub use credential::Credential;
pub use error::TaatError;
pub use keys::{new_user_key_pair, PublicKey, UskProof};
pub use pseudonym::{new_nym_key_pair, NymSignature};
pub use request::CredRequest;

use ark_ec::pairing::Pairing;
use group_utils::{GroupElem, SourceGroup};

/// Public parameters shared by every participant.
#[derive(Clone, Debug)]
pub struct Parameters<E: Pairing> {
    /// Pseudonym base in G1, used at even levels
    pub h1: E::G1Affine,
    /// Pseudonym base in G2, used at odd levels
    pub h2: E::G2Affine,
    /// Most attributes any single delegation may carry
    pub max_attrs: usize,
    /// Escrow encryption key
    pub tpk: ttbe::TPK<E>,
    /// Groth signature parameters
    pub groth: groth_sig::Parameters<E>,
    /// The root authority everyone chains back to
    pub root_upk: PublicKey<E>,
}

impl<E: Pairing> Parameters<E> {
    /// The pseudonym base matching the level's group.
    pub fn nym_base(&self, level: usize) -> GroupElem<E> {
        match level_group(level) {
            SourceGroup::G1 => GroupElem::G1(self.h1),
            SourceGroup::G2 => GroupElem::G2(self.h2),
        }
    }

    /// `Y_i` of the group a level's messages live in.
    pub(crate) fn y_at(&self, i: usize, level: usize) -> GroupElem<E> {
        self.groth.y_at(level_group(level), i)
    }
}

/// The group world a delegation level lives in: even levels are G1, odd G2.
pub fn level_group(level: usize) -> SourceGroup {
    if level % 2 == 0 {
        SourceGroup::G1
    } else {
        SourceGroup::G2
    }
}
