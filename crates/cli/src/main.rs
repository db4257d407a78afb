pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;
pub(crate) mod prompt;

use error::Error;
use log_args::LogArgs;
use output::{print_find_result, print_holder_match};
use prompt::Prompter;
use tracing::debug;

use clap::{Parser, Subcommand};

use slotscan_common::constants::{DEFAULT_MAX_LOOKBACK, DEFAULT_MAX_SLOT, DEFAULT_WINDOW_SIZE};
use slotscan_config::{config, ConfigArgs, Configuration};
use slotscan_core::{
    slotscan_holder::{holder, HolderArgs},
    slotscan_slot::{find, FindArgs},
};

#[derive(Debug, Parser)]
#[clap(name = "slotscan", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub(crate) sub: Subcommands,

    #[clap(flatten)]
    logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(about = "slotscan locates the storage slot of an ERC20 token's balance mapping.")]
#[allow(clippy::large_enum_variant)]
pub(crate) enum Subcommands {
    #[clap(name = "find", about = "Find the storage slot of an ERC20 token's balance mapping")]
    Find(FindArgs),

    #[clap(name = "holder", about = "Find an address holding a non-zero balance of a token")]
    Holder(HolderArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Arguments::parse();

    // setup logging
    let _guard = args.logs.init_tracing();

    let configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;
    match args.sub {
        Subcommands::Find(mut cmd) => {
            let mut prompt = Prompter::stdio(cmd.default);

            // --rpc-url wins over --chain, which wins over the configured rpc url
            if cmd.rpc_url.is_empty() && cmd.chain.is_none() {
                if configuration.rpc_url.is_empty() {
                    let chain = prompt.select_chain(&configuration.default_chain)?;
                    cmd.chain = Some(chain.name.to_string());
                } else {
                    cmd.rpc_url = configuration.rpc_url.clone();
                }
            }

            if cmd.token.is_empty() {
                cmd.token = prompt.address("Token address")?;
            }

            if cmd.storage.is_empty() && !prompt.confirm("Storage address same as token?", true)? {
                cmd.storage = prompt.address("Storage address")?;
            }

            // if the user has not changed a bound, use the configured one
            if cmd.max_slot == DEFAULT_MAX_SLOT {
                cmd.max_slot = configuration.max_slot;
            }
            if cmd.window_size == DEFAULT_WINDOW_SIZE {
                cmd.window_size = configuration.window_size;
            }
            if cmd.max_lookback == DEFAULT_MAX_LOOKBACK {
                cmd.max_lookback = configuration.max_lookback;
            }

            debug!("running find with {:?}", cmd);
            let json = cmd.json;
            let result = find(cmd).await?;
            print_find_result(&result, json)?;
        }

        Subcommands::Holder(mut cmd) => {
            // if the user has not specified a rpc url, use the default
            if cmd.rpc_url.as_str() == "" {
                cmd.rpc_url = configuration.rpc_url;
            }

            // if the user has not changed a bound, use the configured one
            if cmd.window_size == DEFAULT_WINDOW_SIZE {
                cmd.window_size = configuration.window_size;
            }
            if cmd.max_lookback == DEFAULT_MAX_LOOKBACK {
                cmd.max_lookback = configuration.max_lookback;
            }

            let json = cmd.json;
            let found = holder(cmd).await?;
            print_holder_match(&found, json)?;
        }

        Subcommands::Config(cmd) => {
            config(cmd).map_err(|e| Error::Generic(format!("failed to configure: {}", e)))?;
        }
    }

    Ok(())
}
