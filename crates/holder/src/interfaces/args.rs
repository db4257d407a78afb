use clap::Parser;
use derive_builder::Builder;
use slotscan_common::constants::{DEFAULT_MAX_LOOKBACK, DEFAULT_WINDOW_SIZE};
use slotscan_config::parse_url_arg;

#[derive(Debug, Clone, Parser, Builder)]
#[clap(
    about = "Find an address holding a non-zero balance of an ERC20 token",
    override_usage = "slotscan holder <TOKEN> [OPTIONS]"
)]
/// Arguments for the holder operation
pub struct HolderArgs {
    /// The token to find a holder of.
    #[clap(required = true)]
    pub target: String,

    /// The RPC URL to use for fetching data.
    /// This can be an explicit URL or a reference to a MESC endpoint.
    #[clap(long, short, value_parser = parse_url_arg, default_value = "", hide_default_value = true)]
    pub rpc_url: String,

    /// The number of blocks fetched per log query.
    #[clap(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: u64,

    /// How many blocks below the chain head to search before giving up.
    #[clap(long, default_value_t = DEFAULT_MAX_LOOKBACK)]
    pub max_lookback: u64,

    /// Print the result as JSON.
    #[clap(long)]
    pub json: bool,
}

impl HolderArgsBuilder {
    /// Creates a new HolderArgsBuilder with default values
    pub fn new() -> Self {
        Self {
            target: Some(String::new()),
            rpc_url: Some(String::new()),
            window_size: Some(DEFAULT_WINDOW_SIZE),
            max_lookback: Some(DEFAULT_MAX_LOOKBACK),
            json: Some(false),
        }
    }
}
