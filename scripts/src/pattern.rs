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

use bitcoin::hashes::Hash;
use bitcoin::{PubkeyHash, Script, ScriptHash, WPubkeyHash, WScriptHash};

use crate::PatternKind;

/// Standard `scriptPubkey` template with the hash data it commits to.
///
/// The set of templates is closed: anything which is not one of the four
/// hash-based templates ends up in [`ScriptPattern::Other`] with the original
/// script kept intact.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, From)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub enum ScriptPattern {
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`
    #[from]
    #[display("pkh({0})")]
    PayToPubkeyHash(PubkeyHash),

    /// `OP_0 <20 bytes>`
    #[from]
    #[display("wpkh({0})")]
    PayToWitnessPubkeyHash(WPubkeyHash),

    /// `OP_HASH160 <20 bytes> OP_EQUAL`
    #[from]
    #[display("sh({0})")]
    PayToScriptHash(ScriptHash),

    /// `OP_0 <32 bytes>`
    #[from]
    #[display("wsh({0})")]
    PayToWitnessScriptHash(WScriptHash),

    /// Script not matching any of the known templates
    #[display("raw({0:x})")]
    Other(Script),
}

/// Classifies raw `scriptPubkey` into one of the [`ScriptPattern`] templates.
pub fn classify(script_pubkey: &Script) -> ScriptPattern {
    let bytes = script_pubkey.as_bytes();
    let pattern = if script_pubkey.is_p2pkh() {
        ScriptPattern::PayToPubkeyHash(
            PubkeyHash::from_slice(&bytes[3..23])
                .expect("P2PKH template check is broken: hash must be 20 bytes"),
        )
    } else if script_pubkey.is_p2sh() {
        ScriptPattern::PayToScriptHash(
            ScriptHash::from_slice(&bytes[2..22])
                .expect("P2SH template check is broken: hash must be 20 bytes"),
        )
    } else if script_pubkey.is_v0_p2wpkh() {
        ScriptPattern::PayToWitnessPubkeyHash(
            WPubkeyHash::from_slice(&bytes[2..22])
                .expect("P2WPKH template check is broken: program must be 20 bytes"),
        )
    } else if script_pubkey.is_v0_p2wsh() {
        ScriptPattern::PayToWitnessScriptHash(
            WScriptHash::from_slice(&bytes[2..34])
                .expect("P2WSH template check is broken: program must be 32 bytes"),
        )
    } else {
        ScriptPattern::Other(script_pubkey.clone())
    };
    tracing::trace!(len = script_pubkey.len(), kind = %pattern.kind(), "classified scriptPubkey");
    pattern
}

impl From<&Script> for ScriptPattern {
    fn from(script_pubkey: &Script) -> Self { classify(script_pubkey) }
}

impl ScriptPattern {
    /// Returns template category of the pattern.
    #[inline]
    pub fn kind(&self) -> PatternKind { PatternKind::from(self) }
}

#[cfg(test)]
mod test {
    use bitcoin::blockdata::opcodes::all::*;
    use bitcoin::blockdata::script::Builder;
    use bitcoin::hashes::hex::FromHex;
    use secp256k1::{PublicKey, Secp256k1, SecretKey};

    use super::*;

    fn pubkey() -> bitcoin::PublicKey {
        let secp = Secp256k1::new();
        let sk = SecretKey::from_slice(&[1u8; 32]).unwrap();
        bitcoin::PublicKey::new(PublicKey::from_secret_key(&secp, &sk))
    }

    fn script(hex: &str) -> Script { Script::from(Vec::<u8>::from_hex(hex).unwrap()) }

    #[test]
    fn classify_standard_templates() {
        let pk = pubkey();
        let pkh = pk.pubkey_hash();
        let wpkh = pk.wpubkey_hash().unwrap();
        let redeem = Script::new_v0_p2wpkh(&wpkh);
        let sh = redeem.script_hash();
        let wsh = redeem.wscript_hash();

        assert_eq!(classify(&Script::new_p2pkh(&pkh)), ScriptPattern::PayToPubkeyHash(pkh));
        assert_eq!(
            classify(&Script::new_v0_p2wpkh(&wpkh)),
            ScriptPattern::PayToWitnessPubkeyHash(wpkh)
        );
        assert_eq!(classify(&Script::new_p2sh(&sh)), ScriptPattern::PayToScriptHash(sh));
        assert_eq!(
            classify(&Script::new_v0_p2wsh(&wsh)),
            ScriptPattern::PayToWitnessScriptHash(wsh)
        );
    }

    #[test]
    fn classify_raw_vectors() {
        assert_eq!(
            classify(&script("0014d0b19277b0f76c9512f26d77573fd31a8fd15fc7")),
            ScriptPattern::PayToWitnessPubkeyHash(
                WPubkeyHash::from_hex("d0b19277b0f76c9512f26d77573fd31a8fd15fc7").unwrap()
            )
        );
        assert_eq!(
            classify(&script("76a914b17deefe2feab87fef7221cf806bb8ca61f00fa188ac")).kind(),
            PatternKind::P2pkh
        );
        assert_eq!(
            classify(&script("a914d3cf9d04f4ecc36df8207b300e46bc6775fc84c087")).kind(),
            PatternKind::P2sh
        );
        assert_eq!(
            classify(&script(
                "00203287047df2aa7aade3f394790a9c9d6f9235943f48a012e8a9f2c3300ca4f2d1"
            ))
            .kind(),
            PatternKind::P2wsh
        );
    }

    #[test]
    fn classify_other() {
        let op_return = Script::new_op_return(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(classify(&op_return), ScriptPattern::Other(op_return.clone()));

        let pk = pubkey();
        let multisig = Builder::new()
            .push_int(1)
            .push_key(&pk)
            .push_int(1)
            .push_opcode(OP_CHECKMULTISIG)
            .into_script();
        assert_eq!(classify(&multisig).kind(), PatternKind::Other);

        // taproot is a witness v1 program
        let p2tr = script(&format!("5120{}", "01".repeat(32)));
        assert_eq!(classify(&p2tr).kind(), PatternKind::Other);

        // witness v0 programs of non-standard length
        let v0_short = script(&format!("0013{}", "01".repeat(19)));
        assert_eq!(classify(&v0_short).kind(), PatternKind::Other);

        // truncated P2PKH
        let truncated = script("76a914b17deefe2feab87fef7221cf806bb8ca61f00fa188");
        assert_eq!(classify(&truncated).kind(), PatternKind::Other);

        assert_eq!(classify(&Script::new()).kind(), PatternKind::Other);
    }
}
