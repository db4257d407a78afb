use alloy::primitives::{Address, U256};
use slotscan_common::ether::{
    address::parse_address,
    chains::find_chain,
    provider::{ChainReader, MultiTransportProvider},
};
use slotscan_holder::{resolve_holder, ResolveOptions};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    error::Error,
    interfaces::{FindArgs, FindResult},
    search::{search, SearchOptions},
};

/// Fully resolved inputs to [`locate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindRequest {
    /// The token whose `balanceOf` is called
    pub token: Address,
    /// The contract whose storage is probed
    pub storage: Address,
    /// A known holder, or `None` to find one from transfer events
    pub holder: Option<Address>,
    /// Bounds for the slot search
    pub search: SearchOptions,
    /// Bounds for the holder search
    pub resolve: ResolveOptions,
}

impl FindRequest {
    /// A request for `token` with its storage in the token contract itself and default bounds.
    pub fn new(token: Address) -> Self {
        Self {
            token,
            storage: token,
            holder: None,
            search: SearchOptions::default(),
            resolve: ResolveOptions::default(),
        }
    }
}

/// Locate the balance mapping described by `request`.
///
/// Picks a holder (the given one, or the first positive-balance participant of a recent
/// `Transfer` event), reads its balance from the token, and searches the storage contract for
/// that balance. A zero balance fails with [`Error::ZeroBalance`] before any storage is read.
pub async fn locate<R>(reader: &R, request: &FindRequest) -> Result<FindResult, Error>
where
    R: ChainReader + ?Sized,
{
    let (holder, balance) = match request.holder {
        Some(holder) => {
            let balance = reader
                .balance_of(request.token, holder)
                .await
                .map_err(|e| Error::Rpc(e.to_string()))?;
            (holder, balance)
        }
        None => {
            let found = resolve_holder(reader, request.token, &request.resolve).await?;
            debug!("using holder {} from block {:?}", found.holder, found.block_number);
            (found.holder, found.balance)
        }
    };

    if balance == U256::ZERO {
        return Err(Error::ZeroBalance(holder));
    }
    info!("holder {} has balance {}", holder, balance);

    let slot = search(reader, request.storage, holder, balance, &request.search).await?;
    info!("found balance mapping at slot {} ({})", slot.base_slot, slot.layout);

    Ok(FindResult { token: request.token, storage: request.storage, holder, balance, slot })
}

/// The `find` command locates the storage slot of a token's balance mapping.
pub async fn find(args: FindArgs) -> Result<FindResult, Error> {
    let start_time = Instant::now();

    if args.token.trim().is_empty() {
        return Err(Error::NoToken);
    }
    let token = parse_address(&args.token).map_err(|e| Error::InvalidAddress(e.to_string()))?;
    let storage = match args.storage.trim() {
        "" => token,
        storage => parse_address(storage).map_err(|e| Error::InvalidAddress(e.to_string()))?,
    };
    let holder = args
        .holder
        .as_deref()
        .map(parse_address)
        .transpose()
        .map_err(|e| Error::InvalidAddress(e.to_string()))?;

    let chain = args.chain.as_deref().map(|query| {
        find_chain(query).ok_or_else(|| Error::Eyre(eyre::eyre!("unknown chain '{query}'")))
    });
    let chain = chain.transpose()?;
    let rpc_url = match (args.rpc_url.as_str(), chain) {
        ("", Some(chain)) => chain.rpc_url.to_string(),
        ("", None) => return Err(Error::NoNetwork),
        (rpc_url, _) => rpc_url.to_string(),
    };

    let provider =
        MultiTransportProvider::connect(&rpc_url).await.map_err(|e| Error::Rpc(e.to_string()))?;
    if let Some(chain) = chain {
        match provider.get_chainid().await {
            Ok(id) if id != chain.id => {
                warn!("rpc endpoint reports chain id {}, expected {}", id, chain)
            }
            Ok(_) => {}
            Err(e) => debug!("failed to verify chain id: {}", e),
        }
    }

    let request = FindRequest {
        token,
        storage,
        holder,
        search: SearchOptions { max_slot: args.max_slot, concurrency: args.concurrency },
        resolve: ResolveOptions { window_size: args.window_size, max_lookback: args.max_lookback },
    };
    let result = locate(&provider, &request).await;

    debug!("find took {:?}", start_time.elapsed());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        layout::{encode_word, solidity_key, vyper_key, MappingLayout},
        FindArgsBuilder,
    };
    use alloy::primitives::address;
    use slotscan_common::testing::MockChain;

    const TOKEN: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    const STORAGE: Address = address!("5555555555555555555555555555555555555555");
    const X: Address = address!("1111111111111111111111111111111111111111");
    const Y: Address = address!("2222222222222222222222222222222222222222");

    #[tokio::test]
    async fn test_locate_with_known_holder() {
        let chain = MockChain::new(1000)
            .with_balance(TOKEN, Y, U256::from(1000))
            .with_storage(TOKEN, solidity_key(Y, 5), encode_word(U256::from(1000)));

        let result = locate(&chain, &FindRequest { holder: Some(Y), ..FindRequest::new(TOKEN) })
            .await
            .expect("failed to locate slot");

        assert_eq!(result.holder, Y);
        assert_eq!(result.slot.base_slot, 5);
        assert_eq!(result.slot.layout, MappingLayout::Solidity);
        assert!(chain.log_queries().is_empty());
    }

    #[tokio::test]
    async fn test_locate_resolves_holder() {
        let chain = MockChain::new(1000)
            .with_transfer(TOKEN, 850, X, Y, U256::from(50))
            .with_balance(TOKEN, Y, U256::from(50))
            .with_storage(STORAGE, vyper_key(Y, 3), encode_word(U256::from(50)));

        let result =
            locate(&chain, &FindRequest { storage: STORAGE, ..FindRequest::new(TOKEN) })
                .await
                .expect("failed to locate slot");

        assert_eq!(result.holder, Y);
        assert_eq!(result.storage, STORAGE);
        assert_eq!((result.slot.base_slot, result.slot.layout), (3, MappingLayout::Vyper));
    }

    #[tokio::test]
    async fn test_zero_balance_fails_before_probing() {
        let chain = MockChain::new(1000);

        let result =
            locate(&chain, &FindRequest { holder: Some(X), ..FindRequest::new(TOKEN) }).await;

        assert!(matches!(result, Err(Error::ZeroBalance(holder)) if holder == X));
        assert!(chain.storage_reads().is_empty());
    }

    #[tokio::test]
    async fn test_holder_errors_are_forwarded() {
        let chain = MockChain::new(1000).with_failing_logs();

        let result = locate(&chain, &FindRequest::new(TOKEN)).await;

        assert!(matches!(result, Err(Error::Holder(slotscan_holder::Error::Rpc(_)))));
        assert!(chain.storage_reads().is_empty());
    }

    #[tokio::test]
    async fn test_find_requires_token() {
        let args = FindArgsBuilder::new().build().expect("failed to build args");
        assert!(matches!(find(args).await, Err(Error::NoToken)));
    }

    #[tokio::test]
    async fn test_find_rejects_bad_checksum() {
        let args = FindArgsBuilder::new()
            .token("0xC02AAa39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string())
            .build()
            .expect("failed to build args");
        assert!(matches!(find(args).await, Err(Error::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_find_requires_network() {
        let args = FindArgsBuilder::new()
            .token("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".to_string())
            .build()
            .expect("failed to build args");
        assert!(matches!(find(args).await, Err(Error::NoNetwork)));
    }

    #[tokio::test]
    async fn test_find_weth() {
        let Ok(rpc_url) = std::env::var("RPC_URL") else {
            println!("RPC_URL not set, skipping test");
            return;
        };

        // WETH9 keeps balanceOf at slot 3
        let args = FindArgsBuilder::new()
            .token("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".to_string())
            .rpc_url(rpc_url)
            .build()
            .expect("failed to build args");

        let result = find(args).await.expect("failed to find slot");
        assert_eq!(result.slot.base_slot, 3);
        assert_eq!(result.slot.layout, MappingLayout::Solidity);
    }
}
