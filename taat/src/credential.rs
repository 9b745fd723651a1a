use ark_ec::pairing::Pairing;
use ark_std::{rand::RngCore, vec::Vec};
use groth_sig::{Message, SecretKey, Signature};

use crate::attribute::Attribute;
use crate::error::TaatError;
use crate::keys::PublicKey;
use crate::{level_group, Parameters};

/// A delegatable credential. A level-L credential carries its own Groth
/// signature, attributes and public key, plus the full chain below it,
/// ordered from the level-0 root upward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential<E: Pairing> {
    pub sig: Option<Signature<E>>,
    pub attrs: Vec<Attribute<E>>,
    pub upk: PublicKey<E>,
    prev: Vec<Credential<E>>,
}

impl<E: Pairing> Credential<E> {
    /// The root authority's credential: a bare public key at level 0.
    pub fn root(root_upk: PublicKey<E>) -> Self {
        Self {
            sig: None,
            attrs: Vec::new(),
            upk: root_upk,
            prev: Vec::new(),
        }
    }

    pub fn level(&self) -> usize {
        self.prev.len()
    }

    /// The credential at chain level `i` (0 is the root).
    pub fn at_level(&self, i: usize) -> Option<&Credential<E>> {
        if i == self.level() {
            Some(self)
        } else {
            self.prev.get(i)
        }
    }

    /// Extends the chain by one level: signs the delegatee's key and the
    /// level-parity projection of its attributes with this holder's key.
    pub fn delegate<R: RngCore>(
        &self,
        rng: &mut R,
        sp: &Parameters<E>,
        sk: &SecretKey<E>,
        upk: PublicKey<E>,
        attrs: Vec<Attribute<E>>,
    ) -> Result<Credential<E>, TaatError> {
        let level = self.level() + 1;
        let msg = groth_message(level, &upk, &attrs)?;
        let sig = Signature::new(rng, &sp.groth, sk, &msg)?;

        let mut prev = self.prev.clone();
        prev.push(self.clone());
        Ok(Credential {
            sig: Some(sig),
            attrs,
            upk,
            prev,
        })
    }

    /// Verifies the whole chain: its length, its root, that the leaf key
    /// belongs to `usk`, and every level's signature under the key of the
    /// level above it.
    pub fn verify(
        &self,
        sp: &Parameters<E>,
        level: usize,
        usk: &SecretKey<E>,
        root_pk: &PublicKey<E>,
    ) -> Result<(), TaatError> {
        if level != self.level() {
            return Err(TaatError::WrongCredNum(level, self.level()));
        }

        let chain_root = self.prev.first().map(|c| &c.upk).unwrap_or(&self.upk);
        if chain_root != root_pk {
            return Err(TaatError::InconsistentRootPk);
        }

        if !self.upk.verify(usk) {
            return Err(TaatError::WrongUpk);
        }

        for i in (1..=level).rev() {
            let curr = self.at_level(i).unwrap();
            let delegator = self.at_level(i - 1).unwrap();
            let msg = groth_message(i, &curr.upk, &curr.attrs)?;
            let sig = curr.sig.as_ref().ok_or(TaatError::MissingSignature(i))?;
            sig.verify(&sp.groth, &delegator.upk.0, &msg)?;
        }

        Ok(())
    }
}

/// The message a level's signature covers: the delegatee's key followed by
/// the attributes, all projected into the level's group.
pub(crate) fn groth_message<E: Pairing>(
    level: usize,
    upk: &PublicKey<E>,
    attrs: &[Attribute<E>],
) -> Result<Message<E>, TaatError> {
    let group = level_group(level);
    if upk.group() != group {
        return Err(TaatError::WrongUpkType);
    }

    let mut ms = Vec::with_capacity(attrs.len() + 1);
    ms.push(upk.0);
    ms.extend(attrs.iter().map(|a| a.at_group(group)));
    Message::new(ms).map_err(TaatError::from)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::keys::new_user_key_pair;
    use ark_bls12_381::Bls12_381;
    use ark_ec::CurveGroup;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use ark_std::UniformRand;

    type Fr = <Bls12_381 as Pairing>::ScalarField;

    /// A chain of `level` delegations with `n_attrs` attributes per level,
    /// together with every level's keys. Shared with the presentation tests.
    pub(crate) struct TestChain {
        pub sp: Parameters<Bls12_381>,
        pub creds: Vec<Credential<Bls12_381>>,
        pub usks: Vec<SecretKey<Bls12_381>>,
        pub attrs: Vec<Vec<Attribute<Bls12_381>>>,
    }

    pub(crate) fn build_chain(rng: &mut StdRng, level: usize, n_attrs: usize) -> TestChain {
        let (root_sk, root_upk) = new_user_key_pair::<Bls12_381, _>(rng, 0);
        let groth = groth_sig::Parameters::new(rng, n_attrs + 1, n_attrs + 1).unwrap();
        let ttbe_params = ttbe::setup::<Bls12_381, _>(rng, 5, 3, None).unwrap();
        let sp = Parameters {
            h1: <Bls12_381 as Pairing>::G1::rand(rng).into_affine(),
            h2: <Bls12_381 as Pairing>::G2::rand(rng).into_affine(),
            max_attrs: n_attrs,
            tpk: ttbe_params.tpk,
            groth,
            root_upk,
        };

        let mut creds = vec![Credential::root(root_upk)];
        let mut usks = vec![root_sk];
        let mut attrs = vec![Vec::new()];
        for i in 1..=level {
            let (sk, upk) = new_user_key_pair::<Bls12_381, _>(rng, i);
            let level_attrs = (0..n_attrs).map(|_| Attribute::rand(rng)).collect::<Vec<_>>();
            let cred = creds[i - 1]
                .delegate(rng, &sp, &usks[i - 1], upk, level_attrs.clone())
                .unwrap();
            creds.push(cred);
            usks.push(sk);
            attrs.push(level_attrs);
        }

        TestChain {
            sp,
            creds,
            usks,
            attrs,
        }
    }

    #[test]
    fn chains_up_to_depth_four_verify() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for level in 1..=4 {
            let chain = build_chain(&mut rng, level, 3);
            chain.creds[level]
                .verify(&chain.sp, level, &chain.usks[level], &chain.sp.root_upk)
                .unwrap();
        }
    }

    #[test]
    fn wrong_level_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let chain = build_chain(&mut rng, 2, 3);
        assert!(matches!(
            chain.creds[2].verify(&chain.sp, 3, &chain.usks[2], &chain.sp.root_upk),
            Err(TaatError::WrongCredNum(3, 2))
        ));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let chain = build_chain(&mut rng, 2, 3);
        let (_, other_root) = new_user_key_pair::<Bls12_381, _>(&mut rng, 0);
        assert!(matches!(
            chain.creds[2].verify(&chain.sp, 2, &chain.usks[2], &other_root),
            Err(TaatError::InconsistentRootPk)
        ));
    }

    #[test]
    fn wrong_usk_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let chain = build_chain(&mut rng, 2, 3);
        assert!(matches!(
            chain.creds[2].verify(&chain.sp, 2, &chain.usks[1], &chain.sp.root_upk),
            Err(TaatError::WrongUpk)
        ));
    }

    #[test]
    fn delegatee_key_must_match_level_parity() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let chain = build_chain(&mut rng, 1, 2);
        // Level 2 expects a G1 key; hand it a G2 one.
        let (_, wrong_upk) = new_user_key_pair::<Bls12_381, _>(&mut rng, 1);
        let attrs = vec![Attribute::rand(&mut rng), Attribute::rand(&mut rng)];
        assert!(matches!(
            chain.creds[1].delegate(&mut rng, &chain.sp, &chain.usks[1], wrong_upk, attrs),
            Err(TaatError::WrongUpkType)
        ));
    }

    #[test]
    fn forged_level_signature_is_rejected() {
        let mut rng = StdRng::seed_from_u64(5u64);
        let mut chain = build_chain(&mut rng, 2, 2);
        let rho = Fr::rand(&mut rng);
        // Scaling only `s` breaks the signature's pairing predicates.
        let sig = chain.creds[2].sig.as_mut().unwrap();
        sig.s = sig.s.mul(&rho);
        assert!(chain.creds[2]
            .verify(&chain.sp, 2, &chain.usks[2], &chain.sp.root_upk)
            .is_err());
    }
}
