use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec};
use group_utils::misc::non_zero_rand;
use group_utils::serde_utils::ArkObjectBytes;
use group_utils::{GroupElem, SourceGroup};
use secret_sharing::{deal_secret, ShareId};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::TtbeError;

/// Encryption key, carrying the `(h, u, v, w, z)` bases in both groups so a
/// plaintext of either group can be encrypted.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct TPK<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub h1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub v1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub w1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub z1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub h2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub v2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub w2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub z2: E::G2Affine,
}

macro_rules! tpk_accessor {
    ($name:ident, $f1:ident, $f2:ident) => {
        pub fn $name(&self, group: SourceGroup) -> GroupElem<E> {
            match group {
                SourceGroup::G1 => GroupElem::G1(self.$f1),
                SourceGroup::G2 => GroupElem::G2(self.$f2),
            }
        }
    };
}

impl<E: Pairing> TPK<E> {
    tpk_accessor!(h, h1, h2);
    tpk_accessor!(u, u1, u2);
    tpk_accessor!(v, v1, v2);
    tpk_accessor!(w, w1, w2);
    tpk_accessor!(z, z1, z2);
}

/// One auditor's decryption key: its share of the two dealt secrets.
#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct TSK<E: Pairing> {
    #[zeroize(skip)]
    pub id: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub(crate) u: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub(crate) v: E::ScalarField,
}

/// One auditor's verification key, in both groups.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct TVK<E: Pairing> {
    pub id: ShareId,
    #[serde_as(as = "ArkObjectBytes")]
    pub u1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub v1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub v2: E::G2Affine,
}

impl<E: Pairing> TVK<E> {
    /// The `h*u_i` component in the given group.
    pub fn u(&self, group: SourceGroup) -> GroupElem<E> {
        match group {
            SourceGroup::G1 => GroupElem::G1(self.u1),
            SourceGroup::G2 => GroupElem::G2(self.u2),
        }
    }

    /// The `v*v_i` component in the given group.
    pub fn v(&self, group: SourceGroup) -> GroupElem<E> {
        match group {
            SourceGroup::G1 => GroupElem::G1(self.v1),
            SourceGroup::G2 => GroupElem::G2(self.v2),
        }
    }
}

/// A pre-agreed `(g1*h, g2*h)` pair, for deployments that fix the base
/// outside of setup (and for reproducible tests). When absent, setup samples
/// a fresh `h`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct HPair<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub h1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub h2: E::G2Affine,
}

impl<E: Pairing> HPair<E> {
    pub fn from_scalar(h: &E::ScalarField) -> Self {
        let h = h.into_bigint();
        Self {
            h1: E::G1Affine::generator().mul_bigint(h).into_affine(),
            h2: E::G2Affine::generator().mul_bigint(h).into_affine(),
        }
    }
}

/// Everything setup hands out: the public key, and per-auditor secret and
/// verification keys.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Parameters<E: Pairing> {
    pub tpk: TPK<E>,
    pub tsks: Vec<TSK<E>>,
    pub tvks: Vec<TVK<E>>,
}

/// Sets up a TTBE instance for `n` auditors with decryption threshold `t`.
/// The secrets `u` and `v` are dealt with Shamir; only their shares survive
/// in the auditors' keys.
pub fn setup<E: Pairing, R: RngCore>(
    rng: &mut R,
    n: ShareId,
    t: ShareId,
    h_pair: Option<&HPair<E>>,
) -> Result<Parameters<E>, TtbeError> {
    let w: E::ScalarField = non_zero_rand(rng);
    let z: E::ScalarField = non_zero_rand(rng);
    let u: E::ScalarField = non_zero_rand(rng);
    let v: E::ScalarField = non_zero_rand(rng);

    let (us, _) = deal_secret(rng, u, t, n)?;
    let (vs, _) = deal_secret(rng, v, t, n)?;

    let (h1, h2) = match h_pair {
        Some(hp) => (hp.h1, hp.h2),
        None => {
            let hp = HPair::<E>::from_scalar(&non_zero_rand(rng));
            (hp.h1, hp.h2)
        }
    };

    let v_inv = v.inverse().unwrap();
    let u1 = h1.mul_bigint(u.into_bigint()).into_affine();
    let u2 = h2.mul_bigint(u.into_bigint()).into_affine();
    let v1 = u1.mul_bigint(v_inv.into_bigint()).into_affine();
    let v2 = u2.mul_bigint(v_inv.into_bigint()).into_affine();
    let w1 = h1.mul_bigint(w.into_bigint()).into_affine();
    let w2 = h2.mul_bigint(w.into_bigint()).into_affine();
    let z1 = v1.mul_bigint(z.into_bigint()).into_affine();
    let z2 = v2.mul_bigint(z.into_bigint()).into_affine();

    let mut tsks = Vec::with_capacity(n as usize);
    let mut tvks = Vec::with_capacity(n as usize);
    for (us_i, vs_i) in us.0.iter().zip(vs.0.iter()) {
        tsks.push(TSK {
            id: us_i.id,
            u: us_i.share,
            v: vs_i.share,
        });
        tvks.push(TVK {
            id: us_i.id,
            u1: h1.mul_bigint(us_i.share.into_bigint()).into_affine(),
            v1: v1.mul_bigint(vs_i.share.into_bigint()).into_affine(),
            u2: h2.mul_bigint(us_i.share.into_bigint()).into_affine(),
            v2: v2.mul_bigint(vs_i.share.into_bigint()).into_affine(),
        });
    }

    Ok(Parameters {
        tpk: TPK {
            h1,
            u1,
            v1,
            w1,
            z1,
            h2,
            u2,
            v2,
            w2,
            z2,
        },
        tsks,
        tvks,
    })
}
