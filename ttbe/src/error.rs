use ark_serialize::SerializationError;
use group_utils::GroupError;
use secret_sharing::{SSError, ShareId};

#[derive(Debug)]
pub enum TtbeError {
    /// Ciphertext fails its validity pairings under the given tag
    InvalidCiphertext,
    EmptyTvksOrAudClues,
    /// (tvks, clues)
    UnequalLenOfTvksAndAudClues(usize, usize),
    /// Clue of this auditor fails its validity pairings
    InvalidAudClue(ShareId),
    /// Group tag byte must be 1 (G1) or 0 (G2)
    IllegalInGroupByte(u8),
    Group(GroupError),
    SecretSharing(SSError),
    Serialization(SerializationError),
}

impl From<GroupError> for TtbeError {
    fn from(e: GroupError) -> Self {
        Self::Group(e)
    }
}

impl From<SSError> for TtbeError {
    fn from(e: SSError) -> Self {
        Self::SecretSharing(e)
    }
}

impl From<SerializationError> for TtbeError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
