use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{
    io::Write,
    rand::RngCore,
    vec::Vec,
    UniformRand,
};
use group_utils::serde_utils::ArkObjectBytes;
use group_utils::{GroupElem, SourceGroup};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// One credential attribute, represented in both source groups with the same
/// discrete log so that delegation can alternate groups and still see a
/// consistent value.
#[serde_as]
#[derive(
    Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Attribute<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub a1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub a2: E::G2Affine,
}

impl<E: Pairing> Clone for Attribute<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Pairing> Copy for Attribute<E> {}

impl<E: Pairing> Attribute<E> {
    pub fn from_scalar(k: &E::ScalarField) -> Self {
        let k = k.into_bigint();
        Self {
            a1: E::G1Affine::generator().mul_bigint(k).into_affine(),
            a2: E::G2Affine::generator().mul_bigint(k).into_affine(),
        }
    }

    pub fn rand<R: RngCore>(rng: &mut R) -> Self {
        Self::from_scalar(&E::ScalarField::rand(rng))
    }

    /// Projects the attribute into the given group.
    pub fn at_group(&self, group: SourceGroup) -> GroupElem<E> {
        match group {
            SourceGroup::G1 => GroupElem::G1(self.a1),
            SourceGroup::G2 => GroupElem::G2(self.a2),
        }
    }
}

/// Declares that the `j`-th attribute of level `i` is disclosed with the
/// given value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrSetElem<E: Pairing> {
    pub i: usize,
    pub j: usize,
    pub value: Attribute<E>,
}

impl<E: Pairing> AttrSetElem<E> {
    /// Little-endian `u64 i`, `u64 j`, then both projections of the value.
    pub fn serialize_into<W: Write>(&self, mut writer: W) -> Result<(), SerializationError> {
        writer.write_all(&(self.i as u64).to_le_bytes())?;
        writer.write_all(&(self.j as u64).to_le_bytes())?;
        self.value.a1.serialize_compressed(&mut writer)?;
        self.value.a2.serialize_compressed(&mut writer)
    }
}

/// The disclosed subset of a presentation: a lookup from `(level, index)` to
/// the claimed attribute value. Undeclared positions stay hidden.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrSet<E: Pairing>(pub Vec<AttrSetElem<E>>);

impl<E: Pairing> AttrSet<E> {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&AttrSetElem<E>> {
        self.0.iter().find(|e| e.i == i && e.j == j)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn serialize_into<W: Write>(&self, mut writer: W) -> Result<(), SerializationError> {
        for elem in &self.0 {
            elem.serialize_into(&mut writer)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut bytes = Vec::new();
        self.serialize_into(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use ark_std::vec;

    type A = Attribute<Bls12_381>;

    #[test]
    fn projections_share_a_discrete_log() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let attr = A::rand(&mut rng);
        let g1 = GroupElem::<Bls12_381>::generator(SourceGroup::G1);
        let g2 = GroupElem::<Bls12_381>::generator(SourceGroup::G2);
        // e(a1, g2) == e(g1, a2) iff both sides hide the same scalar.
        assert_eq!(
            attr.at_group(SourceGroup::G1).pair(&g2).unwrap(),
            attr.at_group(SourceGroup::G2).pair(&g1).unwrap(),
        );
    }

    #[test]
    fn lookup_by_position() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let a = A::rand(&mut rng);
        let b = A::rand(&mut rng);
        let set = AttrSet(vec![
            AttrSetElem { i: 1, j: 0, value: a },
            AttrSetElem { i: 2, j: 1, value: b },
        ]);
        assert_eq!(set.get(2, 1).unwrap().value, b);
        assert!(set.get(2, 0).is_none());
        assert!(AttrSet::<Bls12_381>::empty().get(1, 0).is_none());
    }

    #[test]
    fn byte_encoding_is_positional() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let v = A::rand(&mut rng);
        let one = AttrSet(vec![AttrSetElem { i: 1, j: 2, value: v }]);
        let other = AttrSet(vec![AttrSetElem { i: 2, j: 1, value: v }]);
        assert_ne!(one.to_bytes().unwrap(), other.to_bytes().unwrap());
        let bytes = one.to_bytes().unwrap();
        assert_eq!(&bytes[..8], &1u64.to_le_bytes());
        assert_eq!(&bytes[8..16], &2u64.to_le_bytes());
    }
}
