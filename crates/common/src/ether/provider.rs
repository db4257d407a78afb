//! Create a custom data transport to use with a Provider.
use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::{Filter, Log, TransactionRequest},
    sol_types::SolCall,
};
use async_trait::async_trait;
use backoff::ExponentialBackoff;
use eyre::{eyre, Result};
use tracing::{trace, warn};

use crate::ether::types::IERC20;

/// The read-only view of a chain that the search modules depend on.
///
/// [`MultiTransportProvider`] implements it against a live node. Implementations are
/// expected to surface transport failures as errors rather than default values, since
/// a zeroed storage word is indistinguishable from an unset slot.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Get the latest block number.
    async fn get_block_number(&self) -> Result<u64>;

    /// Read the 32-byte word stored at `key` in the storage of `address`.
    async fn get_storage_at(&self, address: Address, key: B256) -> Result<B256>;

    /// Get the logs that match the given filter, in the order returned by the node.
    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>>;

    /// Read `token.balanceOf(holder)`.
    async fn balance_of(&self, token: Address, holder: Address) -> Result<U256>;
}

/// [`MultiTransportProvider`] is a convenience wrapper around the different transport types
/// supported by the [`Provider`].
#[derive(Clone, Debug)]
pub struct MultiTransportProvider {
    provider: RootProvider<Ethereum>,
    max_elapsed_time: Duration,
}

// We implement a convenience "constructor" method, to easily initialize the transport.
// This will connect to http if the rpc_url contains 'http', to ws if it contains 'ws',
// otherwise it'll default to ipc.
impl MultiTransportProvider {
    /// Connect to a provider using the given rpc_url.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        if rpc_url.is_empty() {
            return Err(eyre!("No RPC URL provided"));
        }

        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(|e| eyre!("failed to connect to provider '{rpc_url}': {e}"))?
            .root()
            .clone();
        Ok(Self { provider, max_elapsed_time: Duration::from_secs(10) })
    }

    /// Set how long transient failures are retried before a request is given up on.
    pub fn with_max_elapsed_time(mut self, max_elapsed_time: Duration) -> Self {
        self.max_elapsed_time = max_elapsed_time;
        self
    }

    /// Get the chain id.
    pub async fn get_chainid(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            max_elapsed_time: Some(self.max_elapsed_time),
            ..ExponentialBackoff::default()
        }
    }
}

#[async_trait]
impl ChainReader for MultiTransportProvider {
    async fn get_block_number(&self) -> Result<u64> {
        let block_number = backoff::future::retry(self.backoff(), || async move {
            self.provider.get_block_number().await.map_err(|e| {
                warn!("failed to fetch block number: {} .", e);
                backoff::Error::transient(e)
            })
        })
        .await?;

        Ok(block_number)
    }

    async fn get_storage_at(&self, address: Address, key: B256) -> Result<B256> {
        let value = backoff::future::retry(self.backoff(), || async move {
            trace!("reading storage of '{}' at '{}' .", address, key);
            self.provider
                .get_storage_at(address, U256::from_be_bytes(key.0))
                .await
                .map_err(|e| {
                    warn!("failed to read storage of '{}' at '{}': {} .", address, key, e);
                    backoff::Error::transient(e)
                })
        })
        .await?;

        Ok(B256::from(value.to_be_bytes::<32>()))
    }

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        let logs = backoff::future::retry(self.backoff(), || async move {
            self.provider.get_logs(filter).await.map_err(|e| {
                warn!("failed to fetch logs: {} . does your RPC provider support it?", e);
                backoff::Error::transient(e)
            })
        })
        .await?;

        Ok(logs)
    }

    async fn balance_of(&self, token: Address, holder: Address) -> Result<U256> {
        let calldata = IERC20::balanceOfCall { account: holder }.abi_encode();
        let tx = TransactionRequest::default().to(token).input(Bytes::from(calldata).into());

        let output = backoff::future::retry(self.backoff(), || {
            let tx = tx.clone();
            async move {
                self.provider.call(tx).await.map_err(|e| {
                    warn!("failed to call balanceOf({}) on '{}': {} .", holder, token, e);
                    backoff::Error::transient(e)
                })
            }
        })
        .await?;

        IERC20::balanceOfCall::abi_decode_returns(&output)
            .map_err(|e| eyre!("failed to decode balanceOf({holder}) on '{token}': {e}"))
    }
}
