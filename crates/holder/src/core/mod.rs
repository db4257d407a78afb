use alloy::{
    primitives::{Address, U256},
    rpc::types::Filter,
    sol_types::SolEvent,
};
use hashbrown::HashSet;
use serde::Serialize;
use slotscan_common::{
    constants::{DEFAULT_MAX_LOOKBACK, DEFAULT_WINDOW_SIZE},
    ether::{
        address::parse_address,
        provider::{ChainReader, MultiTransportProvider},
        types::Transfer,
    },
};
use std::time::Instant;
use tracing::{debug, info, trace};

use crate::{error::Error, interfaces::HolderArgs};

/// Bounds for the backwards log scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Number of blocks covered by each `eth_getLogs` request. Must be non-zero.
    pub window_size: u64,
    /// How many blocks below the chain head the scan may reach.
    pub max_lookback: u64,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { window_size: DEFAULT_WINDOW_SIZE, max_lookback: DEFAULT_MAX_LOOKBACK }
    }
}

/// An address with a positive token balance, and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolderMatch {
    /// The holder address
    pub holder: Address,
    /// `balanceOf(holder)` at the time of the check
    pub balance: U256,
    /// The block of the `Transfer` event the holder was taken from
    pub block_number: Option<u64>,
}

/// Find an address holding a positive balance of `token`.
///
/// Scans `Transfer` events emitted by `token` in windows of `window_size` blocks, starting at
/// the chain head and moving backwards. Each window spans `[to - window_size, to]`, and the
/// next window ends where the previous one started. Within a window, events are visited in
/// the order the node returns them; for each event the recipient is checked before the
/// sender, and the first address with a positive balance wins. Addresses are queried at
/// most once.
///
/// The scan stops with [`Error::HolderNotFound`] once it has covered block 0 or
/// `max_lookback` blocks below the head.
pub async fn resolve_holder<R>(
    reader: &R,
    token: Address,
    options: &ResolveOptions,
) -> Result<HolderMatch, Error>
where
    R: ChainReader + ?Sized,
{
    if options.window_size == 0 {
        return Err(Error::InvalidWindowSize);
    }

    let head = reader.get_block_number().await.map_err(|e| Error::Rpc(e.to_string()))?;
    let floor = head.saturating_sub(options.max_lookback);
    let mut checked: HashSet<Address> = HashSet::new();
    let mut to_block = head;

    loop {
        let from_block = to_block.saturating_sub(options.window_size).max(floor);
        let filter = Filter::new()
            .address(token)
            .event_signature(Transfer::SIGNATURE_HASH)
            .from_block(from_block)
            .to_block(to_block);

        let logs = reader.get_logs(&filter).await.map_err(|e| Error::Rpc(e.to_string()))?;
        debug!("found {} transfer events in blocks {}..={}", logs.len(), from_block, to_block);

        for log in logs {
            // erc721 tokens share the event signature but index the token id
            let transfer = match Transfer::decode_log_data(&log.inner.data) {
                Ok(transfer) => transfer,
                Err(e) => {
                    trace!("skipping undecodable transfer log: {}", e);
                    continue;
                }
            };

            for candidate in [transfer.to, transfer.from] {
                if !checked.insert(candidate) {
                    continue;
                }

                let balance = reader
                    .balance_of(token, candidate)
                    .await
                    .map_err(|e| Error::Rpc(e.to_string()))?;
                trace!("balanceOf({}) = {}", candidate, balance);

                if balance > U256::ZERO {
                    return Ok(HolderMatch {
                        holder: candidate,
                        balance,
                        block_number: log.block_number,
                    });
                }
            }
        }

        if from_block <= floor {
            return Err(Error::HolderNotFound { token, from_block, to_block: head });
        }
        to_block = from_block;
    }
}

/// The `holder` command finds an address with a positive balance of the target token.
pub async fn holder(args: HolderArgs) -> Result<HolderMatch, Error> {
    let start_time = Instant::now();
    let token = parse_address(&args.target).map_err(|e| Error::InvalidAddress(e.to_string()))?;
    let provider = MultiTransportProvider::connect(&args.rpc_url)
        .await
        .map_err(|e| Error::Rpc(e.to_string()))?;

    info!("searching for a holder of {}", token);
    let found = resolve_holder(
        &provider,
        token,
        &ResolveOptions { window_size: args.window_size, max_lookback: args.max_lookback },
    )
    .await?;

    debug!("holder search took {:?}", start_time.elapsed());
    info!("found holder {} with balance {}", found.holder, found.balance);
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use slotscan_common::testing::MockChain;

    const TOKEN: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    const OTHER_TOKEN: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
    const X: Address = address!("1111111111111111111111111111111111111111");
    const Y: Address = address!("2222222222222222222222222222222222222222");
    const Z: Address = address!("3333333333333333333333333333333333333333");

    #[tokio::test]
    async fn test_holder_found_in_older_window() {
        let chain = MockChain::new(1000)
            .with_transfer(TOKEN, 850, X, Y, U256::from(50))
            .with_balance(TOKEN, Y, U256::from(50));

        let found = resolve_holder(&chain, TOKEN, &ResolveOptions::default())
            .await
            .expect("failed to resolve holder");

        assert_eq!(found.holder, Y);
        assert_eq!(found.balance, U256::from(50));
        assert_eq!(found.block_number, Some(850));
        assert_eq!(chain.log_queries(), vec![(900, 1000), (800, 900)]);
        assert_eq!(chain.balance_reads(), vec![Y]);
    }

    #[tokio::test]
    async fn test_sender_checked_when_recipient_is_empty() {
        let chain = MockChain::new(1000)
            .with_transfer(TOKEN, 990, X, Y, U256::from(50))
            .with_balance(TOKEN, X, U256::from(7));

        let found = resolve_holder(&chain, TOKEN, &ResolveOptions::default())
            .await
            .expect("failed to resolve holder");

        assert_eq!(found.holder, X);
        assert_eq!(chain.balance_reads(), vec![Y, X]);
    }

    #[tokio::test]
    async fn test_addresses_are_checked_once() {
        let chain = MockChain::new(1000)
            .with_transfer(TOKEN, 995, X, Y, U256::from(1))
            .with_transfer(TOKEN, 990, Y, X, U256::from(1))
            .with_transfer(TOKEN, 950, X, Z, U256::from(1))
            .with_balance(TOKEN, Z, U256::from(1));

        let found = resolve_holder(&chain, TOKEN, &ResolveOptions::default())
            .await
            .expect("failed to resolve holder");

        assert_eq!(found.holder, Z);
        assert_eq!(chain.balance_reads(), vec![Y, X, Z]);
    }

    #[tokio::test]
    async fn test_events_from_other_tokens_are_ignored() {
        let chain = MockChain::new(1000)
            .with_transfer(OTHER_TOKEN, 999, X, Y, U256::from(1))
            .with_balance(OTHER_TOKEN, Y, U256::from(1))
            .with_transfer(TOKEN, 700, X, Z, U256::from(1))
            .with_balance(TOKEN, Z, U256::from(1));

        let found = resolve_holder(&chain, TOKEN, &ResolveOptions::default())
            .await
            .expect("failed to resolve holder");

        assert_eq!(found.holder, Z);
        assert!(!chain.balance_reads().contains(&Y));
    }

    #[tokio::test]
    async fn test_lookback_bound_is_respected() {
        let chain = MockChain::new(1000)
            .with_transfer(TOKEN, 100, X, Y, U256::from(50))
            .with_balance(TOKEN, Y, U256::from(50));

        let result = resolve_holder(
            &chain,
            TOKEN,
            &ResolveOptions { window_size: 100, max_lookback: 250 },
        )
        .await;

        match result {
            Err(Error::HolderNotFound { from_block, to_block, .. }) => {
                assert_eq!(from_block, 750);
                assert_eq!(to_block, 1000);
            }
            other => panic!("expected HolderNotFound, got {other:?}"),
        }
        assert_eq!(chain.log_queries(), vec![(900, 1000), (800, 900), (750, 800)]);
        assert!(chain.balance_reads().is_empty());
    }

    #[tokio::test]
    async fn test_search_stops_at_genesis() {
        let chain = MockChain::new(150);

        let result = resolve_holder(&chain, TOKEN, &ResolveOptions::default()).await;

        assert!(matches!(result, Err(Error::HolderNotFound { from_block: 0, to_block: 150, .. })));
        assert_eq!(chain.log_queries(), vec![(50, 150), (0, 50)]);
    }

    #[tokio::test]
    async fn test_log_errors_are_surfaced() {
        let chain = MockChain::new(1000).with_failing_logs();

        let result = resolve_holder(&chain, TOKEN, &ResolveOptions::default()).await;

        match result {
            Err(Error::Rpc(message)) => assert!(message.contains("eth_getLogs")),
            other => panic!("expected Rpc error, got {other:?}"),
        }
        assert_eq!(chain.log_queries().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_window_is_rejected() {
        let chain = MockChain::new(1000);

        let result = resolve_holder(
            &chain,
            TOKEN,
            &ResolveOptions { window_size: 0, max_lookback: 1000 },
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidWindowSize)));
        assert!(chain.log_queries().is_empty());
    }

    #[tokio::test]
    async fn test_holder_rejects_invalid_token() {
        let args = crate::HolderArgsBuilder::new()
            .target("0x1234".to_string())
            .build()
            .expect("failed to build args");

        assert!(matches!(holder(args).await, Err(Error::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_holder_weth() {
        let Ok(rpc_url) = std::env::var("RPC_URL") else {
            println!("RPC_URL not set, skipping test");
            return;
        };

        let args = crate::HolderArgsBuilder::new()
            .target("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".to_string())
            .rpc_url(rpc_url)
            .build()
            .expect("failed to build args");

        let found = holder(args).await.expect("failed to find holder");
        assert!(found.balance > U256::ZERO);
    }
}
