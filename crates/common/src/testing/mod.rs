//! An in-memory [`ChainReader`] for exercising the search modules without a node.

use std::sync::Mutex;

use alloy::{
    primitives::{Address, B256, U256},
    rpc::types::{Filter, Log},
    sol_types::SolEvent,
};
use async_trait::async_trait;
use eyre::{bail, Result};
use hashbrown::{HashMap, HashSet};

use crate::ether::{provider::ChainReader, types::Transfer};

/// Chain state held in memory. Every storage read and log query is recorded so tests
/// can assert on what was probed, not only on what was returned.
#[derive(Debug, Default)]
pub struct MockChain {
    block_number: u64,
    storage: HashMap<(Address, B256), B256>,
    balances: HashMap<(Address, Address), U256>,
    logs: Vec<Log>,
    failing_keys: HashSet<B256>,
    fail_logs: bool,
    storage_reads: Mutex<Vec<(Address, B256)>>,
    log_queries: Mutex<Vec<(u64, u64)>>,
    balance_reads: Mutex<Vec<Address>>,
}

impl MockChain {
    /// Creates an empty chain whose head is `block_number`.
    pub fn new(block_number: u64) -> Self {
        Self { block_number, ..Default::default() }
    }

    /// Sets the word stored at `key` in `address`'s storage.
    pub fn with_storage(mut self, address: Address, key: B256, value: B256) -> Self {
        self.storage.insert((address, key), value);
        self
    }

    /// Sets the value `token.balanceOf(holder)` returns.
    pub fn with_balance(mut self, token: Address, holder: Address, balance: U256) -> Self {
        self.balances.insert((token, holder), balance);
        self
    }

    /// Appends a `Transfer` log emitted by `token` in `block_number`. Logs are returned in
    /// insertion order, so append them the way a node would order them.
    pub fn with_transfer(
        mut self,
        token: Address,
        block_number: u64,
        from: Address,
        to: Address,
        value: U256,
    ) -> Self {
        let data = Transfer { from, to, value }.encode_log_data();
        self.logs.push(Log {
            inner: alloy::primitives::Log { address: token, data },
            block_number: Some(block_number),
            log_index: Some(self.logs.len() as u64),
            ..Default::default()
        });
        self
    }

    /// Makes every read of `key` fail with a transport error.
    pub fn with_failing_key(mut self, key: B256) -> Self {
        self.failing_keys.insert(key);
        self
    }

    /// Makes every log query fail with a transport error.
    pub fn with_failing_logs(mut self) -> Self {
        self.fail_logs = true;
        self
    }

    /// Every `(address, key)` pair read so far, in order.
    pub fn storage_reads(&self) -> Vec<(Address, B256)> {
        self.storage_reads.lock().expect("storage_reads lock poisoned").clone()
    }

    /// Every `(from_block, to_block)` range queried for logs so far, in order.
    pub fn log_queries(&self) -> Vec<(u64, u64)> {
        self.log_queries.lock().expect("log_queries lock poisoned").clone()
    }

    /// Every holder whose balance was read so far, in order.
    pub fn balance_reads(&self) -> Vec<Address> {
        self.balance_reads.lock().expect("balance_reads lock poisoned").clone()
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn get_block_number(&self) -> Result<u64> {
        Ok(self.block_number)
    }

    async fn get_storage_at(&self, address: Address, key: B256) -> Result<B256> {
        self.storage_reads.lock().expect("storage_reads lock poisoned").push((address, key));
        if self.failing_keys.contains(&key) {
            bail!("connection reset while reading {key}");
        }

        Ok(self.storage.get(&(address, key)).copied().unwrap_or_default())
    }

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        let from_block = filter.get_from_block().unwrap_or_default();
        let to_block = filter.get_to_block().unwrap_or(self.block_number);
        self.log_queries
            .lock()
            .expect("log_queries lock poisoned")
            .push((from_block, to_block));

        if self.fail_logs {
            bail!("eth_getLogs is not supported");
        }

        Ok(self
            .logs
            .iter()
            .filter(|log| {
                log.block_number.is_some_and(|n| n >= from_block && n <= to_block) &&
                    filter.address.matches(&log.inner.address) &&
                    log.inner.data.topics().first().is_some_and(|t| filter.topics[0].matches(t))
            })
            .cloned()
            .collect())
    }

    async fn balance_of(&self, token: Address, holder: Address) -> Result<U256> {
        self.balance_reads.lock().expect("balance_reads lock poisoned").push(holder);
        Ok(self.balances.get(&(token, holder)).copied().unwrap_or_default())
    }
}
