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

use std::fmt::{self, Formatter, LowerHex};
use std::str::FromStr;

use bitcoin::hashes::hex::{self, FromHex, ToHex};
use bitcoin::hashes::Hash;
use bitcoin::BlockHash;

/// Hash of the genesis block of a bitcoin network, in the internal byte
/// order used by lightning `chain_hash` fields.
///
/// Note that block explorers and bitcoin core RPC display block hashes in the
/// reversed byte order; the string representation of this type does not
/// reverse the bytes.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default, Display)]
#[display(LowerHex)]
pub struct ChainHash([u8; 32]);

impl ChainHash {
    /// Bitcoin mainnet chain hash.
    pub const MAINNET: ChainHash = ChainHash([
        0x6f, 0xe2, 0x8c, 0x0a, 0xb6, 0xf1, 0xb3, 0x72, 0xc1, 0xa6, 0xa2, 0x46, 0xae, 0x63, 0xf7,
        0x4f, 0x93, 0x1e, 0x83, 0x65, 0xe1, 0x5a, 0x08, 0x9c, 0x68, 0xd6, 0x19, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ]);

    /// Bitcoin testnet3 chain hash.
    pub const TESTNET: ChainHash = ChainHash([
        0x43, 0x49, 0x7f, 0xd7, 0xf8, 0x26, 0x95, 0x71, 0x08, 0xf4, 0xa3, 0x0f, 0xd9, 0xce, 0xc3,
        0xae, 0xba, 0x79, 0x97, 0x20, 0x84, 0xe9, 0x0e, 0xad, 0x01, 0xea, 0x33, 0x09, 0x00, 0x00,
        0x00, 0x00,
    ]);

    /// Default bitcoin signet chain hash.
    pub const SIGNET: ChainHash = ChainHash([
        0xf6, 0x1e, 0xee, 0x3b, 0x63, 0xa3, 0x80, 0xa4, 0x77, 0xa0, 0x63, 0xaf, 0x32, 0xb2, 0xbb,
        0xc9, 0x7c, 0x9f, 0xf9, 0xf0, 0x1f, 0x2c, 0x42, 0x25, 0xe9, 0x73, 0x98, 0x81, 0x08, 0x00,
        0x00, 0x00,
    ]);

    /// Bitcoin regtest chain hash.
    pub const REGTEST: ChainHash = ChainHash([
        0x06, 0x22, 0x6e, 0x46, 0x11, 0x1a, 0x0b, 0x59, 0xca, 0xaf, 0x12, 0x60, 0x43, 0xeb, 0x5b,
        0xbf, 0x28, 0xc3, 0x4f, 0x3a, 0x5e, 0x33, 0x2a, 0x1f, 0xc7, 0xb2, 0xb7, 0x3c, 0xf1, 0x88,
        0x91, 0x0f,
    ]);

    /// Returns byte-reversed chain hash.
    pub fn reversed(self) -> Self {
        let mut bytes = self.0;
        bytes.reverse();
        ChainHash(bytes)
    }

    /// Returns parameters of the network with this chain hash, if the network
    /// is known.
    #[inline]
    pub fn network_params(self) -> Option<&'static NetworkParams> {
        NetworkParams::with_chain_hash(self)
    }
}

impl From<BlockHash> for ChainHash {
    fn from(block_hash: BlockHash) -> Self { ChainHash(block_hash.into_inner()) }
}

impl LowerHex for ChainHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(&self.0.to_hex()) }
}

/// Errors parsing chain hash strings.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum ChainHashParseError {
    /// chain hash is not a valid hex string: {0}
    #[from]
    Hex(hex::Error),

    /// chain hash must be 32 bytes long, while {0} bytes were provided
    WrongLength(usize),
}

impl FromStr for ChainHash {
    type Err = ChainHashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = Vec::<u8>::from_hex(s)?;
        let bytes: [u8; 32] = data
            .as_slice()
            .try_into()
            .map_err(|_| ChainHashParseError::WrongLength(data.len()))?;
        Ok(ChainHash(bytes))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ChainHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ChainHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ChainHash::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Address encoding parameters of a bitcoin network.
///
/// New networks are supported by adding a row to [`KNOWN_NETWORKS`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(crate = "serde_crate"))]
#[display("{name}")]
pub struct NetworkParams {
    /// Human-readable network name
    pub name: &'static str,

    /// Hash of the network genesis block
    pub chain_hash: ChainHash,

    /// Base58check version byte for P2PKH addresses
    pub p2pkh_prefix: u8,

    /// Base58check version byte for P2SH addresses
    pub p2sh_prefix: u8,

    /// Bech32 human-readable part for segwit addresses
    pub bech32_hrp: &'static str,
}

/// Networks for which addresses can be rendered. Chain hashes outside of this
/// table are unknown networks.
pub static KNOWN_NETWORKS: [NetworkParams; 4] = [
    NetworkParams {
        name: "mainnet",
        chain_hash: ChainHash::MAINNET,
        p2pkh_prefix: 0x00,
        p2sh_prefix: 0x05,
        bech32_hrp: "bc",
    },
    NetworkParams {
        name: "testnet",
        chain_hash: ChainHash::TESTNET,
        p2pkh_prefix: 0x6f,
        p2sh_prefix: 0xc4,
        bech32_hrp: "tb",
    },
    NetworkParams {
        name: "signet",
        chain_hash: ChainHash::SIGNET,
        p2pkh_prefix: 0x6f,
        p2sh_prefix: 0xc4,
        bech32_hrp: "tb",
    },
    NetworkParams {
        name: "regtest",
        chain_hash: ChainHash::REGTEST,
        p2pkh_prefix: 0x6f,
        p2sh_prefix: 0xc4,
        bech32_hrp: "bcrt",
    },
];

impl NetworkParams {
    /// Looks up network by its chain hash.
    pub fn with_chain_hash(chain_hash: ChainHash) -> Option<&'static NetworkParams> {
        KNOWN_NETWORKS
            .iter()
            .find(|params| params.chain_hash == chain_hash)
    }

    /// Looks up network by its name (case-insensitive). `bitcoin` is accepted
    /// as an alias for `mainnet`.
    pub fn with_name(name: &str) -> Option<&'static NetworkParams> {
        let name = name.to_lowercase();
        let name = if name == "bitcoin" { "mainnet" } else { name.as_str() };
        KNOWN_NETWORKS.iter().find(|params| params.name == name)
    }
}

#[cfg(test)]
mod test {
    use bitcoin::blockdata::constants::genesis_block;
    use bitcoin::Network;

    use super::*;

    #[test]
    fn chain_hashes_match_genesis_blocks() {
        for (name, network) in [
            ("mainnet", Network::Bitcoin),
            ("testnet", Network::Testnet),
            ("signet", Network::Signet),
            ("regtest", Network::Regtest),
        ] {
            let params = NetworkParams::with_name(name).unwrap();
            assert_eq!(params.chain_hash, ChainHash::from(genesis_block(network).block_hash()));
        }
    }

    #[test]
    fn chain_hash_strings() {
        assert_eq!(
            ChainHash::MAINNET.to_string(),
            "6fe28c0ab6f1b372c1a6a246ae63f74f931e8365e15a089c68d6190000000000"
        );
        assert_eq!(
            format!("{:x}", ChainHash::TESTNET),
            "43497fd7f826957108f4a30fd9cec3aeba79972084e90ead01ea330900000000"
        );
        assert_eq!(
            ChainHash::from_str(&ChainHash::SIGNET.to_string()),
            Ok(ChainHash::SIGNET)
        );
        assert_eq!(
            ChainHash::from_str(
                "06226e46111a0b59caaf126043eb5bbf28c34f3a5e332a1fc7b2b73cf188910f"
            ),
            Ok(ChainHash::REGTEST)
        );
        assert_eq!(
            ChainHash::from_str("06226e46111a0b59"),
            Err(ChainHashParseError::WrongLength(8))
        );
        assert!(matches!(ChainHash::from_str("zz"), Err(ChainHashParseError::Hex(_))));
    }

    #[test]
    fn reversed_hashes_are_unknown() {
        for params in &KNOWN_NETWORKS {
            let reversed = params.chain_hash.reversed();
            assert_ne!(reversed, params.chain_hash);
            assert_eq!(reversed.network_params(), None);
            assert_eq!(reversed.reversed(), params.chain_hash);
        }
        assert_eq!(ChainHash::default().network_params(), None);
    }

    #[test]
    fn lookup() {
        assert_eq!(ChainHash::TESTNET.network_params().map(|p| p.name), Some("testnet"));
        assert_eq!(
            NetworkParams::with_name("Bitcoin").map(|p| p.chain_hash),
            Some(ChainHash::MAINNET)
        );
        assert_eq!(NetworkParams::with_name("liquid"), None);
    }
}
