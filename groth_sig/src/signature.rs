use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, rand::RngCore, vec::Vec, UniformRand};
use group_utils::misc::non_zero_rand;
use group_utils::pairing_product::{pairing_product, PairingProductMode, PairingTerm};
use group_utils::serde_utils::ArkObjectBytes;
use group_utils::{GroupElem, SourceGroup};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::GrothError;
use crate::message::Message;

/// Public parameters: uniformly random elements of both groups, fixed at
/// setup. `y1s` caps the length of G1 messages, `y2s` of G2 messages.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Parameters<E: Pairing> {
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub y1s: Vec<E::G1Affine>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub y2s: Vec<E::G2Affine>,
}

impl<E: Pairing> Parameters<E> {
    pub fn new<R: RngCore>(rng: &mut R, max1: usize, max2: usize) -> Result<Self, GrothError> {
        if max1 == 0 || max2 == 0 {
            return Err(GrothError::IllegalMaxMessageNum);
        }
        Ok(Self {
            y1s: (0..max1).map(|_| E::G1::rand(rng).into_affine()).collect(),
            y2s: (0..max2).map(|_| E::G2::rand(rng).into_affine()).collect(),
        })
    }

    /// `Y_i` of the given source group.
    pub fn y_at(&self, group: SourceGroup, i: usize) -> GroupElem<E> {
        match group {
            SourceGroup::G1 => GroupElem::G1(self.y1s[i]),
            SourceGroup::G2 => GroupElem::G2(self.y2s[i]),
        }
    }

    pub fn max_len(&self, group: SourceGroup) -> usize {
        match group {
            SourceGroup::G1 => self.y1s.len(),
            SourceGroup::G2 => self.y2s.len(),
        }
    }
}

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
pub struct SecretKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::ScalarField);

/// `(g1*sk, g2*sk)`. Verification only ever consumes the side opposite to the
/// message group, exposed through [`PublicKey::at`].
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub pk1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub pk2: E::G2Affine,
}

impl<E: Pairing> PublicKey<E> {
    pub fn new(sk: &SecretKey<E>) -> Self {
        let sk = sk.0.into_bigint();
        Self {
            pk1: E::G1Affine::generator().mul_bigint(sk).into_affine(),
            pk2: E::G2Affine::generator().mul_bigint(sk).into_affine(),
        }
    }

    pub fn at(&self, group: SourceGroup) -> GroupElem<E> {
        match group {
            SourceGroup::G1 => GroupElem::G1(self.pk1),
            SourceGroup::G2 => GroupElem::G2(self.pk2),
        }
    }
}

pub fn keygen<E: Pairing, R: RngCore>(rng: &mut R) -> (SecretKey<E>, PublicKey<E>) {
    let sk = SecretKey(non_zero_rand(rng));
    let pk = PublicKey::new(&sk);
    (sk, pk)
}

/// A Groth signature `(r, s, t_1..t_n)`. With messages in group M, `s` and the
/// `t_i` live in M and `r` in the opposite group.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Signature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub r: GroupElem<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub s: GroupElem<E>,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub ts: Vec<GroupElem<E>>,
}

impl<E: Pairing> Signature<E> {
    pub fn new<R: RngCore>(
        rng: &mut R,
        sp: &Parameters<E>,
        sk: &SecretKey<E>,
        msg: &Message<E>,
    ) -> Result<Self, GrothError> {
        let m_group = msg.group();
        let n = msg.len();
        let max = sp.max_len(m_group);
        if n > max {
            return Err(GrothError::ArgOverflow(n, max));
        }

        let rho: E::ScalarField = non_zero_rand(rng);
        let rho_inv = rho.inverse().unwrap();

        let r = GroupElem::scalar_base_mult(m_group.opposite(), &rho);
        let s = sp
            .y_at(m_group, 0)
            .add(&GroupElem::scalar_base_mult(m_group, &sk.0))?
            .mul(&rho_inv);
        let ts = msg
            .elements()
            .iter()
            .enumerate()
            .map(|(i, m)| {
                Ok(m.add(&sp.y_at(m_group, i).mul(&sk.0))?.mul(&rho_inv))
            })
            .collect::<Result<Vec<_>, GrothError>>()?;

        Ok(Self { r, s, ts })
    }

    /// True if `s` and the `t_i` (and hence the signed messages) are in G1.
    pub fn in_g1(&self) -> bool {
        self.s.is_in_g1()
    }

    /// Verifies the `n` message predicates and the `e(s, r)` predicate in
    /// parallel. All checks are joined before returning; when several fail,
    /// the earliest in launch order decides the error.
    pub fn verify(
        &self,
        sp: &Parameters<E>,
        pk: &GroupElem<E>,
        msg: &Message<E>,
    ) -> Result<(), GrothError> {
        let m_group = msg.group();
        let n = msg.len();
        let max = sp.max_len(m_group);
        if n > max || self.ts.len() > max {
            return Err(GrothError::ArgOverflow(n.max(self.ts.len()), max));
        }
        if n != self.ts.len() {
            return Err(GrothError::InconsistentArgLen(n, self.ts.len()));
        }
        if self.s.group() != m_group || self.r.group() != m_group.opposite() {
            return Err(GrothError::Group(group_utils::GroupError::InconsistentGroupType));
        }
        if pk.group() != m_group.opposite() {
            return Err(GrothError::WrongPublicKeyGroup);
        }

        let g = GroupElem::generator(m_group);
        let g_other = GroupElem::generator(m_group.opposite());
        let checks = cfg_into_iter!(0..=n)
            .map(|i| {
                let (lhs, rhs) = if i < n {
                    // e(t_i, r) == e(Y_i, pk') + e(m_i, g')
                    (
                        self.ts[i].pair(&self.r)?,
                        pairing_product(
                            &[
                                Some(PairingTerm::new(&sp.y_at(m_group, i), pk, None)?),
                                Some(PairingTerm::new(msg.at(i), &g_other, None)?),
                            ],
                            PairingProductMode::MillerThenSum,
                        ),
                    )
                } else {
                    // e(s, r) == e(Y_0, g') + e(g, pk')
                    (
                        self.s.pair(&self.r)?,
                        pairing_product(
                            &[
                                Some(PairingTerm::new(&sp.y_at(m_group, 0), &g_other, None)?),
                                Some(PairingTerm::new(&g, pk, None)?),
                            ],
                            PairingProductMode::MillerThenSum,
                        ),
                    )
                };
                Ok(lhs == rhs)
            })
            .collect::<Result<Vec<bool>, GrothError>>()?;

        match checks.iter().position(|ok| !ok) {
            None => Ok(()),
            Some(i) if i < n => Err(GrothError::FailedMessagePredicate(i)),
            Some(_) => Err(GrothError::FailedErsPredicate),
        }
    }

    /// Re-randomizes in place: `r *= rho`, `s` and the `t_i` by `rho^-1`.
    /// Verification against the same key and messages is preserved.
    pub fn randomize(&mut self, rho: &E::ScalarField) {
        let rho_inv = rho.inverse().unwrap();
        self.r = self.r.mul(rho);
        self.s = self.s.mul(&rho_inv);
        for t in self.ts.iter_mut() {
            *t = t.mul(&rho_inv);
        }
    }

    /// Re-randomizes with a fresh non-zero scalar and returns it.
    pub fn randomize_with_rng<R: RngCore>(&mut self, rng: &mut R) -> E::ScalarField {
        let rho = non_zero_rand(rng);
        self.randomize(&rho);
        rho
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type Fr = <Bls12_381 as Pairing>::ScalarField;
    type G = GroupElem<Bls12_381>;

    fn rand_msg(rng: &mut StdRng, group: SourceGroup, n: usize) -> Message<Bls12_381> {
        Message::new((0..n).map(|_| G::rand(rng, group)).collect()).unwrap()
    }

    #[test]
    fn sign_verify_randomize() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let sp = Parameters::<Bls12_381>::new(&mut rng, 5, 5).unwrap();
        let (sk, pk) = keygen::<Bls12_381, _>(&mut rng);

        for group in [SourceGroup::G1, SourceGroup::G2] {
            let msg = rand_msg(&mut rng, group, 3);
            let pk_other = pk.at(group.opposite());

            let mut sig = Signature::new(&mut rng, &sp, &sk, &msg).unwrap();
            sig.verify(&sp, &pk_other, &msg).unwrap();

            sig.randomize_with_rng(&mut rng);
            sig.verify(&sp, &pk_other, &msg).unwrap();

            let rho = Fr::rand(&mut rng);
            sig.randomize(&rho);
            sig.verify(&sp, &pk_other, &msg).unwrap();
        }
    }

    #[test]
    fn flipped_t_fails_its_message_predicate() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let sp = Parameters::<Bls12_381>::new(&mut rng, 5, 5).unwrap();
        let (sk, pk) = keygen::<Bls12_381, _>(&mut rng);
        let msg = rand_msg(&mut rng, SourceGroup::G1, 3);

        let mut sig = Signature::new(&mut rng, &sp, &sk, &msg).unwrap();
        sig.ts[2] = sig.ts[2].mul(&Fr::from(2u64));
        assert!(matches!(
            sig.verify(&sp, &pk.at(SourceGroup::G2), &msg),
            Err(GrothError::FailedMessagePredicate(2))
        ));
    }

    #[test]
    fn flipped_s_fails_the_ers_predicate() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let sp = Parameters::<Bls12_381>::new(&mut rng, 4, 4).unwrap();
        let (sk, pk) = keygen::<Bls12_381, _>(&mut rng);
        let msg = rand_msg(&mut rng, SourceGroup::G2, 2);

        let mut sig = Signature::new(&mut rng, &sp, &sk, &msg).unwrap();
        sig.s = sig.s.mul(&Fr::from(3u64));
        assert!(matches!(
            sig.verify(&sp, &pk.at(SourceGroup::G1), &msg),
            Err(GrothError::FailedErsPredicate)
        ));
    }

    #[test]
    fn shape_errors() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let sp = Parameters::<Bls12_381>::new(&mut rng, 2, 2).unwrap();
        let (sk, pk) = keygen::<Bls12_381, _>(&mut rng);

        // Too many messages for the parameters.
        let long = rand_msg(&mut rng, SourceGroup::G1, 3);
        assert!(matches!(
            Signature::new(&mut rng, &sp, &sk, &long),
            Err(GrothError::ArgOverflow(3, 2))
        ));

        // Message length diverging from the signature's.
        let msg = rand_msg(&mut rng, SourceGroup::G1, 2);
        let sig = Signature::new(&mut rng, &sp, &sk, &msg).unwrap();
        let shorter = Message::new(msg.elements()[..1].to_vec()).unwrap();
        assert!(matches!(
            sig.verify(&sp, &pk.at(SourceGroup::G2), &shorter),
            Err(GrothError::InconsistentArgLen(1, 2))
        ));

        // Public key on the message side of the pairing.
        assert!(matches!(
            sig.verify(&sp, &pk.at(SourceGroup::G1), &msg),
            Err(GrothError::WrongPublicKeyGroup)
        ));

        assert!(matches!(
            Parameters::<Bls12_381>::new(&mut rng, 0, 2),
            Err(GrothError::IllegalMaxMessageNum)
        ));
    }
}
