use ark_serialize::SerializationError;
use group_utils::GroupError;
use groth_sig::GrothError;
use ttbe::TtbeError;

#[derive(Debug)]
pub enum TaatError {
    /// Group tag byte must be 1 (G1) or 0 (G2)
    IllegalInGroupByte(u8),
    IncorrectUskProof,
    WrongHType,
    /// Pseudonym base and pseudonym key must share a group
    InconsistentHAndNymPk,
    IncorrectNymSignature,
    /// The delegatee's key is not in the group its level dictates
    WrongUpkType,
    /// (expected, actual) chain length
    WrongCredNum(usize, usize),
    InconsistentRootPk,
    /// The leaf key does not match the presented secret
    WrongUpk,
    /// Credential at this level carries no signature (level-0 roots don't)
    MissingSignature(usize),
    /// (attributes, supported)
    TooManyAttributes(usize, usize),
    /// The pseudonym key is not in the group of the proved level
    WrongGroupNymPk,
    IncorrectCredProof,
    CttbeAndPksNotInSameGroup,
    IncorrectAuditProof,
    Group(GroupError),
    Groth(GrothError),
    Ttbe(TtbeError),
    Serialization(SerializationError),
}

impl From<GroupError> for TaatError {
    fn from(e: GroupError) -> Self {
        Self::Group(e)
    }
}

impl From<GrothError> for TaatError {
    fn from(e: GrothError) -> Self {
        Self::Groth(e)
    }
}

impl From<TtbeError> for TaatError {
    fn from(e: TtbeError) -> Self {
        Self::Ttbe(e)
    }
}

impl From<SerializationError> for TaatError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
