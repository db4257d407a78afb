use clap::Parser;
use derive_builder::Builder;
use slotscan_common::constants::{DEFAULT_MAX_LOOKBACK, DEFAULT_MAX_SLOT, DEFAULT_WINDOW_SIZE};
use slotscan_config::parse_url_arg;

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Find the storage slot of an ERC20 token's balance mapping",
    override_usage = "slotscan find [OPTIONS]"
)]
/// Arguments for the find operation
///
/// Any of `chain`, `token` and `storage` left empty is asked for interactively by the CLI.
pub struct FindArgs {
    /// The token whose balance mapping to locate.
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub token: String,

    /// The contract holding the token's storage, if different from the token (e.g. a proxy's
    /// implementation split).
    #[clap(long, short, default_value = "", hide_default_value = true)]
    pub storage: String,

    /// An address known to hold a positive balance. Found from transfer events when omitted.
    #[clap(long)]
    pub holder: Option<String>,

    /// The chain to connect to, by name or chain id.
    #[clap(long, short)]
    pub chain: Option<String>,

    /// The RPC URL to use for fetching data. Takes precedence over `--chain`.
    /// This can be an explicit URL or a reference to a MESC endpoint.
    #[clap(long, short, value_parser = parse_url_arg, default_value = "", hide_default_value = true)]
    pub rpc_url: String,

    /// The highest base slot to probe.
    #[clap(long, default_value_t = DEFAULT_MAX_SLOT)]
    pub max_slot: u64,

    /// The number of base slots probed at once.
    #[clap(long, default_value = "1")]
    pub concurrency: usize,

    /// The number of blocks fetched per log query when looking for a holder.
    #[clap(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: u64,

    /// How many blocks below the chain head to search for a holder.
    #[clap(long, default_value_t = DEFAULT_MAX_LOOKBACK)]
    pub max_lookback: u64,

    /// Accept the default answer instead of prompting, where one exists.
    #[clap(long, short)]
    pub default: bool,

    /// Print the result as JSON.
    #[clap(long)]
    pub json: bool,
}

impl FindArgsBuilder {
    /// Creates a new FindArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            token: Some(String::new()),
            storage: Some(String::new()),
            holder: Some(None),
            chain: Some(None),
            rpc_url: Some(String::new()),
            max_slot: Some(DEFAULT_MAX_SLOT),
            concurrency: Some(1),
            window_size: Some(DEFAULT_WINDOW_SIZE),
            max_lookback: Some(DEFAULT_MAX_LOOKBACK),
            default: Some(true),
            json: Some(false),
        }
    }
}
