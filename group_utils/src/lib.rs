//! Utilities shared by the credential and encryption crates of this workspace: a
//! runtime-tagged facade over the two source groups of a Type-3 pairing, batched
//! pairing-product evaluation sharing a single final exponentiation, a fixed-width
//! parallel engine computing matrices of pairing-products, and serde adapters for
//! `arkworks-rs` objects.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod group;
pub mod hashing;
pub mod matrix;
pub mod misc;
pub mod pairing_product;
pub mod serde_utils;

pub use error::GroupError;
pub use group::{GroupElem, SourceGroup};
pub use matrix::{compact_cells, GtMatrix, PairingMatrixComputer};
pub use pairing_product::{pairing_product, PairingProductMode, PairingTerm};
