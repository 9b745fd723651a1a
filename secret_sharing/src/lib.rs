//! Shamir secret sharing over the scalar field of a pairing-friendly curve,
//! trimmed to what a threshold decryption quorum needs: dealing a secret into
//! `n` shares with threshold `t`, reconstructing it, and computing Lagrange
//! coefficients at zero for an arbitrary set of share ids.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod common;
pub mod error;
pub mod shamir;

pub use common::{lagrange_basis_at_0, lagrange_basis_at_0_for_all, Share, ShareId, Shares};
pub use error::SSError;
pub use shamir::{deal_random_secret, deal_secret};
