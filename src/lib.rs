// Channel closing checks for bitcoin outputs by LNP/BP Association
// (https://lnp-bp.org)
//
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// This software is distributed without any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

//! Checks performed on lightning channel mutual-close transactions: rendering
//! of output `scriptPubkey`s as addresses for a given network and validation
//! of closing outputs against per-template dust limits.
//!
//! All functions are pure and may be called concurrently without
//! synchronization.

// Coding conventions
#![recursion_limit = "256"]
#![deny(dead_code, missing_docs)]

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

pub extern crate closing_onchain as onchain;
pub extern crate closing_scripts as scripts;

pub mod address;
pub mod dust;

pub use address::{address_from_script_pubkey, encode_pattern, resolve_address, DecodeFailure};
pub use dust::{
    all_outputs_above_dust, check_closing_dust_amounts, dust_threshold, find_dust_violations,
    DustViolation, DUST_THRESHOLDS,
};
pub use onchain::{ChainHash, NetworkParams, KNOWN_NETWORKS};
pub use scripts::{classify, PatternKind, ScriptPattern};
