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

//! Classification of `scriptPubkey` byte sequences into the standard output
//! templates which can be represented as addresses and which have a defined
//! dust limit.

// Coding conventions
#![recursion_limit = "256"]
#![deny(dead_code, missing_docs)]

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

mod category;
mod pattern;

pub use category::{PatternKind, PatternKindParseError};
pub use pattern::{classify, ScriptPattern};
