use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use group_utils::serde_utils::ArkObjectBytes;
use group_utils::{GroupElem, SourceGroup};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::error::GrothError;

/// A non-empty message vector whose elements all live in the same source
/// group. The group is fixed by the first element.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Message<E: Pairing>(#[serde_as(as = "Vec<ArkObjectBytes>")] Vec<GroupElem<E>>);

impl<E: Pairing> Message<E> {
    pub fn new(ms: Vec<GroupElem<E>>) -> Result<Self, GrothError> {
        let first = ms.first().ok_or(GrothError::EmptyMessage)?;
        let group = first.group();
        for (i, m) in ms.iter().enumerate().skip(1) {
            if m.group() != group {
                return Err(GrothError::InconsistentMessageType(i));
            }
        }
        Ok(Self(ms))
    }

    pub fn group(&self) -> SourceGroup {
        self.0[0].group()
    }

    pub fn in_g1(&self) -> bool {
        self.group().is_g1()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn at(&self, i: usize) -> &GroupElem<E> {
        &self.0[i]
    }

    pub fn elements(&self) -> &[GroupElem<E>] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use ark_std::vec;

    type G = GroupElem<Bls12_381>;

    #[test]
    fn empty_message_is_rejected() {
        assert!(matches!(
            Message::<Bls12_381>::new(vec![]),
            Err(GrothError::EmptyMessage)
        ));
    }

    #[test]
    fn mixed_groups_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let ms = vec![
            G::rand(&mut rng, SourceGroup::G1),
            G::rand(&mut rng, SourceGroup::G1),
            G::rand(&mut rng, SourceGroup::G2),
        ];
        assert!(matches!(
            Message::new(ms),
            Err(GrothError::InconsistentMessageType(2))
        ));
    }

    #[test]
    fn group_is_taken_from_first_element() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let m = Message::new(vec![G::rand(&mut rng, SourceGroup::G2)]).unwrap();
        assert!(!m.in_g1());
        assert_eq!(m.len(), 1);
    }
}
