use ark_serialize::SerializationError;
use group_utils::GroupError;

#[derive(Debug)]
pub enum GrothError {
    /// Setup needs room for at least one message in each group
    IllegalMaxMessageNum,
    /// (supplied, supported)
    ArgOverflow(usize, usize),
    /// (message length, signature length)
    InconsistentArgLen(usize, usize),
    /// The pairing predicate of the message at this index does not hold
    FailedMessagePredicate(usize),
    /// The `e(s, r)` predicate does not hold
    FailedErsPredicate,
    EmptyMessage,
    IllegalMessageType(usize),
    /// Message elements span both source groups; index of the first offender
    InconsistentMessageType(usize),
    /// The verifying key must live in the group opposite to the messages
    WrongPublicKeyGroup,
    Group(GroupError),
    Serialization(SerializationError),
}

impl From<GroupError> for GrothError {
    fn from(e: GroupError) -> Self {
        Self::Group(e)
    }
}

impl From<SerializationError> for GrothError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
