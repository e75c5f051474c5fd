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

//! Bitcoin networks known to the closing checks, identified by the hash of
//! their genesis block, together with the parameters required for rendering
//! addresses on each of them.

// Coding conventions
#![recursion_limit = "256"]
#![deny(dead_code, missing_docs)]

#[macro_use]
extern crate amplify;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde_crate as serde;

mod network;

pub use network::{ChainHash, ChainHashParseError, NetworkParams, KNOWN_NETWORKS};
