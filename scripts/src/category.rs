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

use std::str::FromStr;

use crate::ScriptPattern;

/// Category of a `scriptPubkey` template, stripped of the hash data.
///
/// Used as a key for per-template policies, like dust limits, and for
/// reporting.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
#[repr(u8)]
pub enum PatternKind {
    /// Pay-to-public key hash
    #[display("P2PKH")]
    P2pkh,

    /// Pay-to-witness public key hash, witness version 0
    #[display("P2WPKH")]
    P2wpkh,

    /// Pay-to-script hash, including P2SH-nested segwit outputs
    #[display("P2SH")]
    P2sh,

    /// Pay-to-witness script hash, witness version 0
    #[display("P2WSH")]
    P2wsh,

    /// Any script not matching one of the templates above: bare multisig,
    /// `OP_RETURN`, future witness versions, non-standard scripts
    #[display("other")]
    Other,
}

impl From<&ScriptPattern> for PatternKind {
    fn from(pattern: &ScriptPattern) -> Self {
        match pattern {
            ScriptPattern::PayToPubkeyHash(_) => PatternKind::P2pkh,
            ScriptPattern::PayToWitnessPubkeyHash(_) => PatternKind::P2wpkh,
            ScriptPattern::PayToScriptHash(_) => PatternKind::P2sh,
            ScriptPattern::PayToWitnessScriptHash(_) => PatternKind::P2wsh,
            ScriptPattern::Other(_) => PatternKind::Other,
        }
    }
}

/// Errors parsing script pattern kind strings.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum PatternKindParseError {
    /// unrecognized script template `{0}`; must be one of `P2PKH`, `P2WPKH`,
    /// `P2SH`, `P2WSH` or `other`
    Unrecognized(String),
}

impl FromStr for PatternKind {
    type Err = PatternKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "P2PKH" => PatternKind::P2pkh,
            "P2WPKH" => PatternKind::P2wpkh,
            "P2SH" => PatternKind::P2sh,
            "P2WSH" => PatternKind::P2wsh,
            "OTHER" => PatternKind::Other,
            _ => return Err(PatternKindParseError::Unrecognized(s.to_owned())),
        })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PatternKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PatternKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatternKind::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_roundtrips_through_from_str() {
        for kind in [
            PatternKind::P2pkh,
            PatternKind::P2wpkh,
            PatternKind::P2sh,
            PatternKind::P2wsh,
            PatternKind::Other,
        ] {
            assert_eq!(PatternKind::from_str(&kind.to_string()), Ok(kind));
        }
        assert_eq!(PatternKind::from_str("p2wpkh"), Ok(PatternKind::P2wpkh));
        assert_eq!(
            PatternKind::from_str("P2TR"),
            Err(PatternKindParseError::Unrecognized("P2TR".to_owned()))
        );
    }
}
