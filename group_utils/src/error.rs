use ark_serialize::SerializationError;
use ark_std::string::String;

#[derive(Debug)]
pub enum GroupError {
    /// A value was expected to be a G1 or G2 element but is neither
    IllegalGroupType,
    /// Two operands must live in the same source group
    InconsistentGroupType,
    /// Pairing arguments must come from different source groups
    SameGroupInPairing,
    /// Group tag byte must be 1 (G1) or 0 (G2)
    IllegalInGroupByte(u8),
    WorkerPool(String),
    Serialization(SerializationError),
}

impl From<SerializationError> for GroupError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
