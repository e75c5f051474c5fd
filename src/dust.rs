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

//! Dust limits for closing transaction outputs.
//!
//! A closing transaction with any output below the dust limit for its
//! `scriptPubkey` template must not be broadcast: the outputs have to be
//! renegotiated. Dust outputs are never silently removed.

use std::fmt::{self, Display, Formatter};

use bitcoin::{Transaction, TxOut};
use scripts::PatternKind;

/// Minimal output values, in satoshis, accepted by bitcoin relay policy for
/// each of the standard `scriptPubkey` templates.
///
/// Outputs with other scripts have no dust limit and are never considered to
/// be above dust.
pub const DUST_THRESHOLDS: [(PatternKind, u64); 4] = [
    (PatternKind::P2pkh, 546),
    (PatternKind::P2sh, 540),
    (PatternKind::P2wpkh, 294),
    (PatternKind::P2wsh, 330),
];

/// Returns dust limit for the script template, or `None` if the template has
/// no defined limit.
pub fn dust_threshold(kind: PatternKind) -> Option<u64> {
    DUST_THRESHOLDS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, threshold)| *threshold)
}

/// Output which does not pass dust limit check.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "camelCase")
)]
pub struct DustViolation {
    /// Index of the output in the transaction
    pub vout: usize,

    /// Output value in satoshis
    pub value: u64,

    /// Template of the output `scriptPubkey`
    pub kind: PatternKind,

    /// Dust limit for the template; `None` for scripts without defined limit
    pub threshold: Option<u64>,
}

impl Display for DustViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.threshold {
            Some(threshold) => write!(
                f,
                "output #{} of {} sat is below {} dust limit of {} sat",
                self.vout, self.value, self.kind, threshold
            ),
            None => write!(
                f,
                "output #{} of {} sat has a script without dust limit",
                self.vout, self.value
            ),
        }
    }
}

fn check_output(vout: usize, txout: &TxOut) -> Result<(), DustViolation> {
    let kind = scripts::classify(&txout.script_pubkey).kind();
    let threshold = dust_threshold(kind);
    match threshold {
        Some(threshold) if txout.value >= threshold => Ok(()),
        _ => Err(DustViolation {
            vout,
            value: txout.value,
            kind,
            threshold,
        }),
    }
}

/// Checks that every output is at or above the dust limit of its template.
///
/// Stops at the first failing output.
pub fn all_outputs_above_dust<'outputs>(
    outputs: impl IntoIterator<Item = &'outputs TxOut>,
) -> bool {
    outputs
        .into_iter()
        .enumerate()
        .try_for_each(|(vout, txout)| check_output(vout, txout))
        .map_err(|violation| tracing::debug!("{violation}"))
        .is_ok()
}

/// Lists all outputs failing dust limit check. Empty result is equivalent to
/// [`all_outputs_above_dust`] returning `true`.
pub fn find_dust_violations<'outputs>(
    outputs: impl IntoIterator<Item = &'outputs TxOut>,
) -> Vec<DustViolation> {
    outputs
        .into_iter()
        .enumerate()
        .filter_map(|(vout, txout)| check_output(vout, txout).err())
        .collect()
}

/// Checks closing transaction outputs against dust limits.
#[inline]
pub fn check_closing_dust_amounts(tx: &Transaction) -> bool { all_outputs_above_dust(&tx.output) }
