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

//! Rendering of `scriptPubkey` as an address string of a specific network.

use bitcoin::bech32::{self, u5, ToBase32, Variant};
use bitcoin::util::base58;
use bitcoin::Script;
use onchain::{ChainHash, NetworkParams};
use scripts::ScriptPattern;

/// Reasons why `scriptPubkey` can't be rendered as an address.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum DecodeFailure {
    /// chain hash {0} does not belong to any known network
    UnknownNetwork(ChainHash),

    /// scriptPubkey does not match any template which can be represented as
    /// an address
    UnsupportedScript,

    /// bech32 encoding of the witness program failed: {0}
    #[from]
    Bech32(bech32::Error),
}

/// Renders `scriptPubkey` as an address on the network identified by
/// `chain_hash`.
///
/// There is no fallback network: an unknown chain hash always results in
/// [`DecodeFailure::UnknownNetwork`].
pub fn resolve_address(
    script_pubkey: &Script,
    chain_hash: ChainHash,
) -> Result<String, DecodeFailure> {
    let pattern = scripts::classify(script_pubkey);
    let params = chain_hash
        .network_params()
        .ok_or(DecodeFailure::UnknownNetwork(chain_hash))?;
    encode_pattern(&pattern, params)
}

/// Version of [`resolve_address`] returning `None` instead of an error, for
/// use in logging and user interfaces.
pub fn address_from_script_pubkey(
    script_pubkey: &Script,
    chain_hash: ChainHash,
) -> Option<String> {
    resolve_address(script_pubkey, chain_hash)
        .map_err(|err| {
            tracing::debug!(%chain_hash, script = %script_pubkey.asm(), "no address: {err}");
        })
        .ok()
}

/// Encodes already classified script pattern using address parameters of a
/// given network.
pub fn encode_pattern(
    pattern: &ScriptPattern,
    params: &NetworkParams,
) -> Result<String, DecodeFailure> {
    Ok(match pattern {
        ScriptPattern::PayToPubkeyHash(hash) => base58_address(params.p2pkh_prefix, &hash[..]),
        ScriptPattern::PayToScriptHash(hash) => base58_address(params.p2sh_prefix, &hash[..]),
        ScriptPattern::PayToWitnessPubkeyHash(hash) => {
            segwit_v0_address(params.bech32_hrp, &hash[..])?
        }
        ScriptPattern::PayToWitnessScriptHash(hash) => {
            segwit_v0_address(params.bech32_hrp, &hash[..])?
        }
        ScriptPattern::Other(_) => return Err(DecodeFailure::UnsupportedScript),
    })
}

fn base58_address(version: u8, hash: &[u8]) -> String {
    let mut payload = Vec::with_capacity(1 + hash.len());
    payload.push(version);
    payload.extend_from_slice(hash);
    base58::check_encode_slice(&payload)
}

// Witness v0 uses original bech32 checksum (BIP-173); bech32m applies to v1+.
fn segwit_v0_address(hrp: &str, program: &[u8]) -> Result<String, bech32::Error> {
    let mut data = vec![u5::try_from_u8(0)?];
    data.extend(program.to_base32());
    bech32::encode(hrp, data, Variant::Bech32)
}
