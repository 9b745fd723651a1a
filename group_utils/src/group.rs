//! A tagged variant over the two source groups of a Type-3 pairing. Most of the
//! credential protocols alternate between G1 and G2 by delegation level, so the
//! group an element lives in is a runtime property; `GroupElem` carries the tag
//! in the value and the arithmetic below dispatches on it.

use ark_ec::{pairing::Pairing, pairing::PairingOutput, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::{
    io::{Read, Write},
    rand::RngCore,
    UniformRand,
};

use crate::error::GroupError;

/// The source group an element belongs to. Even delegation levels live in the
/// G1 world, odd levels in the G2 world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceGroup {
    G1,
    G2,
}

impl SourceGroup {
    pub fn opposite(self) -> Self {
        match self {
            Self::G1 => Self::G2,
            Self::G2 => Self::G1,
        }
    }

    pub fn is_g1(self) -> bool {
        matches!(self, Self::G1)
    }
}

/// A G1 or G2 element tagged with its group.
#[derive(Debug, PartialEq, Eq)]
pub enum GroupElem<E: Pairing> {
    G1(E::G1Affine),
    G2(E::G2Affine),
}

// Manual impls keep `E` itself free of `Clone`/`Copy` bounds.
impl<E: Pairing> Clone for GroupElem<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Pairing> Copy for GroupElem<E> {}

impl<E: Pairing> GroupElem<E> {
    pub fn group(&self) -> SourceGroup {
        match self {
            Self::G1(_) => SourceGroup::G1,
            Self::G2(_) => SourceGroup::G2,
        }
    }

    pub fn is_in_g1(&self) -> bool {
        self.group().is_g1()
    }

    pub fn generator(group: SourceGroup) -> Self {
        match group {
            SourceGroup::G1 => Self::G1(E::G1Affine::generator()),
            SourceGroup::G2 => Self::G2(E::G2Affine::generator()),
        }
    }

    pub fn zero(group: SourceGroup) -> Self {
        match group {
            SourceGroup::G1 => Self::G1(E::G1Affine::zero()),
            SourceGroup::G2 => Self::G2(E::G2Affine::zero()),
        }
    }

    pub fn rand<R: RngCore>(rng: &mut R, group: SourceGroup) -> Self {
        match group {
            SourceGroup::G1 => Self::G1(E::G1::rand(rng).into_affine()),
            SourceGroup::G2 => Self::G2(E::G2::rand(rng).into_affine()),
        }
    }

    /// The generator of `group` multiplied by `k`.
    pub fn scalar_base_mult(group: SourceGroup, k: &E::ScalarField) -> Self {
        Self::generator(group).mul(k)
    }

    pub fn mul(&self, k: &E::ScalarField) -> Self {
        let k = k.into_bigint();
        match self {
            Self::G1(p) => Self::G1(p.mul_bigint(k).into_affine()),
            Self::G2(p) => Self::G2(p.mul_bigint(k).into_affine()),
        }
    }

    pub fn neg(&self) -> Self {
        match self {
            Self::G1(p) => Self::G1((-p.into_group()).into_affine()),
            Self::G2(p) => Self::G2((-p.into_group()).into_affine()),
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, GroupError> {
        match (self, other) {
            (Self::G1(a), Self::G1(b)) => Ok(Self::G1((a.into_group() + b).into_affine())),
            (Self::G2(a), Self::G2(b)) => Ok(Self::G2((a.into_group() + b).into_affine())),
            _ => Err(GroupError::InconsistentGroupType),
        }
    }

    /// `g*a + h*b` with `g` and `h` in the same source group.
    pub fn product_of_exp(
        g: &Self,
        a: &E::ScalarField,
        h: &Self,
        b: &E::ScalarField,
    ) -> Result<Self, GroupError> {
        let (a, b) = (a.into_bigint(), b.into_bigint());
        match (g, h) {
            (Self::G1(g), Self::G1(h)) => {
                Ok(Self::G1((g.mul_bigint(a) + h.mul_bigint(b)).into_affine()))
            }
            (Self::G2(g), Self::G2(h)) => {
                Ok(Self::G2((g.mul_bigint(a) + h.mul_bigint(b)).into_affine()))
            }
            _ => Err(GroupError::InconsistentGroupType),
        }
    }

    /// Pairing with automatic argument ordering: `e(a, b)` or `e(b, a)`,
    /// whichever puts the G1 element first.
    pub fn pair(&self, other: &Self) -> Result<PairingOutput<E>, GroupError> {
        match (self, other) {
            (Self::G1(a), Self::G2(b)) => Ok(E::pairing(*a, *b)),
            (Self::G2(b), Self::G1(a)) => Ok(E::pairing(*a, *b)),
            _ => Err(GroupError::SameGroupInPairing),
        }
    }

    /// Writes only the canonical bytes of the point, without the group tag.
    pub fn serialize_point<W: Write>(&self, writer: W) -> Result<(), SerializationError> {
        match self {
            Self::G1(p) => p.serialize_compressed(writer),
            Self::G2(p) => p.serialize_compressed(writer),
        }
    }
}

// The canonical form is one tag byte, 1 for G1 and 0 for G2, followed by the
// compressed point. This doubles as the wire format of public keys.
impl<E: Pairing> CanonicalSerialize for GroupElem<E> {
    fn serialize_with_mode<W: Write>(
        &self,
        mut writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        match self {
            Self::G1(p) => {
                1u8.serialize_with_mode(&mut writer, compress)?;
                p.serialize_with_mode(&mut writer, compress)
            }
            Self::G2(p) => {
                0u8.serialize_with_mode(&mut writer, compress)?;
                p.serialize_with_mode(&mut writer, compress)
            }
        }
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        1 + match self {
            Self::G1(p) => p.serialized_size(compress),
            Self::G2(p) => p.serialized_size(compress),
        }
    }
}

impl<E: Pairing> Valid for GroupElem<E> {
    fn check(&self) -> Result<(), SerializationError> {
        match self {
            Self::G1(p) => p.check(),
            Self::G2(p) => p.check(),
        }
    }
}

impl<E: Pairing> CanonicalDeserialize for GroupElem<E> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let tag = u8::deserialize_with_mode(&mut reader, compress, validate)?;
        match tag {
            1 => Ok(Self::G1(E::G1Affine::deserialize_with_mode(
                &mut reader,
                compress,
                validate,
            )?)),
            0 => Ok(Self::G2(E::G2Affine::deserialize_with_mode(
                &mut reader,
                compress,
                validate,
            )?)),
            _ => Err(SerializationError::InvalidData),
        }
    }
}
