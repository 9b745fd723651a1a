//! Threshold tag-based encryption (TTBE) in the model of
//! [Camenisch, Drijvers and Dubovitskaya](https://eprint.iacr.org/2017/1089.pdf):
//! a ciphertext is bound to a tag and can be opened only when a threshold of
//! auditors each contribute a partial decryption (an "audit clue") that anyone
//! can verify against the auditor's verification key. Ciphertexts live in G1
//! or G2, whichever group the encrypted point belongs to.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod clue;
pub mod encrypt;
pub mod error;
pub mod setup;

pub use clue::{combine, share_aud_clue, AudClue};
pub use encrypt::Cttbe;
pub use error::TtbeError;
pub use setup::{setup, HPair, Parameters, TPK, TSK, TVK};
