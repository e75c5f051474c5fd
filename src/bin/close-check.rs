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

#[macro_use]
extern crate amplify;
extern crate serde_crate as serde;

use std::num::ParseIntError;
use std::process::ExitCode;
use std::str::FromStr;

use bitcoin::consensus;
use bitcoin::hashes::hex::{self, FromHex};
use bitcoin::{Script, Transaction, TxOut};
use clap::{ArgAction, Parser, Subcommand};
use closing::{ChainHash, DecodeFailure, DustViolation, NetworkParams, PatternKind};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser)]
#[derive(Clone, Eq, PartialEq, Debug)]
#[clap(
    author,
    version,
    name = "close-check",
    about = "Inspect outputs of lightning channel closing transactions"
)]
pub struct Args {
    /// Command to execute
    #[clap(subcommand)]
    pub command: Command,

    /// Print reports in YAML format
    #[clap(long, global = true)]
    pub yaml: bool,

    /// Increase logging verbosity. `RUST_LOG` environment variable, if set,
    /// takes precedence.
    #[clap(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Command to execute
#[derive(Subcommand)]
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Command {
    /// Render `scriptPubkey` as an address
    Address {
        /// Network to render the address for: `mainnet`, `testnet`, `signet`
        /// or `regtest`
        #[clap(short, long, env = "CLOSE_CHECK_NETWORK", default_value = "mainnet")]
        network: String,

        /// Chain hash (genesis block hash in internal byte order) of the
        /// network. Takes precedence over `--network`.
        #[clap(long)]
        chain_hash: Option<ChainHash>,

        /// Hex-encoded `scriptPubkey`
        script_pubkey: String,
    },

    /// Check closing transaction outputs against dust limits.
    ///
    /// Exits with non-zero status if any of the outputs is below the dust
    /// limit for its script template.
    Dust {
        /// Hex-encoded closing transaction
        #[clap(long, conflicts_with = "outputs")]
        tx: Option<String>,

        /// Transaction output in `<sats>:<scriptPubkey hex>` form. May be
        /// repeated.
        #[clap(short, long = "output")]
        outputs: Vec<OutputArg>,
    },

    /// List networks for which addresses can be rendered
    Networks,
}

/// Transaction output given as a command-line argument
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct OutputArg(TxOut);

/// Errors parsing transaction output argument
#[derive(Clone, PartialEq, Eq, Debug, Display, Error, From)]
#[display(doc_comments)]
pub enum OutputParseError {
    /// output must have `<sats>:<scriptPubkey hex>` format
    NoSeparator,

    /// invalid output value: {0}
    #[from]
    Value(ParseIntError),

    /// invalid scriptPubkey hex: {0}
    #[from]
    ScriptPubkey(hex::Error),
}

impl FromStr for OutputArg {
    type Err = OutputParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, script) = s.split_once(':').ok_or(OutputParseError::NoSeparator)?;
        Ok(OutputArg(TxOut {
            value: value.parse()?,
            script_pubkey: Script::from(Vec::<u8>::from_hex(script)?),
        }))
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(crate = "serde_crate", rename_all = "camelCase")]
struct AddressReport {
    network: Option<&'static str>,
    chain_hash: ChainHash,
    kind: PatternKind,
    address: String,
}

impl AddressReport {
    fn with(script_pubkey: &Script, chain_hash: ChainHash) -> Result<Self, DecodeFailure> {
        let address = closing::resolve_address(script_pubkey, chain_hash)?;
        let kind = closing::classify(script_pubkey).kind();
        tracing::info!(%chain_hash, %kind, %address, "resolved address");
        Ok(AddressReport {
            network: chain_hash.network_params().map(|params| params.name),
            chain_hash,
            kind,
            address,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(crate = "serde_crate", rename_all = "camelCase")]
struct OutputReport {
    vout: usize,
    value: u64,
    kind: PatternKind,
    threshold: Option<u64>,
    above_dust: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(crate = "serde_crate", rename_all = "camelCase")]
struct DustReport {
    above_dust: bool,
    outputs: Vec<OutputReport>,
    violations: Vec<DustViolation>,
}

impl Args {
    pub fn exec(&self) -> Result<(), Error> {
        match &self.command {
            Command::Address {
                network,
                chain_hash,
                script_pubkey,
            } => self.address(network, *chain_hash, script_pubkey),
            Command::Dust { tx, outputs } => self.dust(tx.as_deref(), outputs),
            Command::Networks => self.networks(),
        }
    }

    fn address(
        &self,
        network: &str,
        chain_hash: Option<ChainHash>,
        script_pubkey: &str,
    ) -> Result<(), Error> {
        let chain_hash = match chain_hash {
            Some(chain_hash) => chain_hash,
            None => {
                NetworkParams::with_name(network)
                    .ok_or_else(|| Error::UnknownNetworkName(network.to_owned()))?
                    .chain_hash
            }
        };
        let script_pubkey = Script::from(Vec::<u8>::from_hex(script_pubkey)?);
        let report = AddressReport::with(&script_pubkey, chain_hash)?;

        if self.yaml {
            print!("{}", serde_yaml::to_string(&report)?);
        } else {
            println!("{}", report.address);
        }
        Ok(())
    }

    fn dust(&self, tx: Option<&str>, outputs: &[OutputArg]) -> Result<(), Error> {
        let outputs = match tx {
            Some(tx_hex) => {
                let tx: Transaction = consensus::deserialize(&Vec::<u8>::from_hex(tx_hex)?)?;
                tracing::info!(txid = %tx.txid(), "checking closing transaction");
                tx.output
            }
            None if outputs.is_empty() => return Err(Error::NoOutputs),
            None => outputs.iter().map(|output| output.0.clone()).collect::<Vec<_>>(),
        };

        let above_dust = closing::all_outputs_above_dust(&outputs);
        let violations = closing::find_dust_violations(&outputs);
        let report = DustReport {
            above_dust,
            outputs: outputs
                .iter()
                .enumerate()
                .map(|(vout, txout)| {
                    let kind = closing::classify(&txout.script_pubkey).kind();
                    OutputReport {
                        vout,
                        value: txout.value,
                        kind,
                        threshold: closing::dust_threshold(kind),
                        above_dust: !violations.iter().any(|violation| violation.vout == vout),
                    }
                })
                .collect(),
            violations,
        };

        if self.yaml {
            print!("{}", serde_yaml::to_string(&report)?);
        } else {
            for output in &report.outputs {
                let threshold = output
                    .threshold
                    .map(|threshold| format!("{} sat", threshold))
                    .unwrap_or_else(|| "-".to_owned());
                let status = if output.above_dust {
                    "ok".bright_green()
                } else {
                    "dust".bright_red()
                };
                println!(
                    "#{:<4} {:>14} sat  {:<6}  limit {:>8}  {}",
                    output.vout, output.value, output.kind, threshold, status
                );
            }
        }

        if report.above_dust {
            Ok(())
        } else {
            Err(Error::DustOutputs(report.violations.len()))
        }
    }

    fn networks(&self) -> Result<(), Error> {
        if self.yaml {
            print!("{}", serde_yaml::to_string(&closing::KNOWN_NETWORKS)?);
            return Ok(());
        }
        for params in &closing::KNOWN_NETWORKS {
            println!(
                "{:<8} {}  p2pkh 0x{:02x}  p2sh 0x{:02x}  hrp {}",
                params.name.bright_white(),
                params.chain_hash,
                params.p2pkh_prefix,
                params.p2sh_prefix,
                params.bech32_hrp
            );
        }
        Ok(())
    }
}

#[derive(Debug, Display, Error, From)]
#[display(inner)]
pub enum Error {
    #[from]
    Hex(hex::Error),

    #[from]
    Consensus(consensus::encode::Error),

    #[from]
    Yaml(serde_yaml::Error),

    #[from]
    Decode(DecodeFailure),

    /// unknown network `{0}`; use `networks` command to list known networks
    #[display(doc_comments)]
    UnknownNetworkName(String),

    /// no outputs to check: provide either `--tx` or at least one `--output`
    #[display(doc_comments)]
    NoOutputs,

    /// closing transaction has {0} output(s) below dust limit; outputs must
    /// be renegotiated
    #[display(doc_comments)]
    DustOutputs(usize),
}

fn setup_logging(verbosity: u8) {
    let dirs = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let main_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(dirs)))
        .with(main_layer)
        .init()
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);
    if let Err(err) = args.exec() {
        eprintln!("{}: {}\n", "Error".bright_red(), err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
