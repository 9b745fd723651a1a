//! Groth structure-preserving signatures as defined in section 4 of
//! [this paper](https://eprint.iacr.org/2015/525.pdf), symmetric over the two
//! source groups: a message vector living entirely in G1 is signed with the
//! `r` component in G2 and vice versa. Signatures re-randomize without the
//! signer, which is what the credential presentation protocol built on top
//! relies on.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod message;
pub mod signature;

pub use error::GrothError;
pub use message::Message;
pub use signature::{keygen, Parameters, PublicKey, SecretKey, Signature};
