//! Probes candidate base slots until the holder's balance shows up in storage.

use std::time::Instant;

use alloy::primitives::{Address, B256, U256};
use futures::future::{join, join_all};
use serde::Serialize;
use slotscan_common::{constants::DEFAULT_MAX_SLOT, ether::provider::ChainReader};
use tracing::{debug, info};

use crate::{
    error::Error,
    layout::{decode_word, encode_word, MappingLayout},
};

/// How often a progress summary is logged, in probed base slots.
const PROGRESS_INTERVAL: u64 = 25;

/// Bounds for the slot search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// The highest base slot probed, inclusive.
    pub max_slot: u64,
    /// How many consecutive base slots are probed at once. `1` probes strictly in order.
    pub concurrency: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { max_slot: DEFAULT_MAX_SLOT, concurrency: 1 }
    }
}

/// The location of a holder's balance in a token's storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotMatch {
    /// The base slot of the balance mapping
    pub base_slot: u64,
    /// The compiler convention the mapping follows
    pub layout: MappingLayout,
    /// The storage key the balance was read from
    pub storage_key: B256,
    /// The balance stored under `storage_key`
    pub value: U256,
    /// How many storage reads were issued
    pub probes: u64,
}

/// Find the base slot of the balance mapping of `storage`.
///
/// For every base slot `i` in `0..=max_slot`, the holder's Solidity key is read first and its
/// Vyper key second; the first word equal to `expected` wins. With `concurrency > 1`, batches
/// of consecutive base slots are read in parallel but resolved in the same order, so the
/// result does not depend on the batch size.
///
/// Read failures are returned as [`Error::Rpc`] and never treated as a miss.
pub async fn search<R>(
    reader: &R,
    storage: Address,
    holder: Address,
    expected: U256,
    options: &SearchOptions,
) -> Result<SlotMatch, Error>
where
    R: ChainReader + ?Sized,
{
    let start_time = Instant::now();
    let target = encode_word(expected);
    let batch_size = options.concurrency.max(1) as u64;
    let mut probes = 0u64;
    let mut start = 0u64;

    debug!(
        "searching slots 0..={} of {} for balance {} (batch size {})",
        options.max_slot, storage, expected, batch_size
    );

    loop {
        let end = start.saturating_add(batch_size - 1).min(options.max_slot);

        let found = if batch_size == 1 {
            probe_sequential(reader, storage, holder, start, target, &mut probes).await?
        } else {
            probe_batch(reader, storage, holder, start, end, target, &mut probes).await?
        };

        if let Some((base_slot, layout, storage_key)) = found {
            debug!("slot search took {:?}", start_time.elapsed());
            return Ok(SlotMatch {
                base_slot,
                layout,
                storage_key,
                value: decode_word(target),
                probes,
            });
        }

        for index in start..=end {
            let scanned = index.saturating_add(1);
            if scanned % PROGRESS_INTERVAL == 0 {
                info!(
                    "scanned {} of {} slots  reads={}",
                    scanned,
                    options.max_slot.saturating_add(1),
                    probes
                );
            }
        }

        if end >= options.max_slot {
            break;
        }
        start = end + 1;
    }

    debug!("slot search took {:?}", start_time.elapsed());
    Err(Error::SlotNotFound { last_index: options.max_slot, probes })
}

async fn read_word<R>(reader: &R, storage: Address, key: B256) -> Result<B256, Error>
where
    R: ChainReader + ?Sized,
{
    reader.get_storage_at(storage, key).await.map_err(|e| Error::Rpc(e.to_string()))
}

async fn probe_sequential<R>(
    reader: &R,
    storage: Address,
    holder: Address,
    index: u64,
    target: B256,
    probes: &mut u64,
) -> Result<Option<(u64, MappingLayout, B256)>, Error>
where
    R: ChainReader + ?Sized,
{
    debug!("probing slot {}", index);
    for layout in MappingLayout::ORDER {
        let key = layout.storage_key(holder, index);
        let word = read_word(reader, storage, key).await?;
        *probes = probes.saturating_add(1);

        if word == target {
            return Ok(Some((index, layout, key)));
        }
    }

    Ok(None)
}

async fn probe_batch<R>(
    reader: &R,
    storage: Address,
    holder: Address,
    start: u64,
    end: u64,
    target: B256,
    probes: &mut u64,
) -> Result<Option<(u64, MappingLayout, B256)>, Error>
where
    R: ChainReader + ?Sized,
{
    let reads = (start..=end).map(|index| {
        debug!("probing slot {}", index);
        let [first, second] = MappingLayout::ORDER.map(|layout| layout.storage_key(holder, index));
        join(read_word(reader, storage, first), read_word(reader, storage, second))
    });
    let results = join_all(reads).await;
    *probes = probes.saturating_add((end - start).saturating_add(1).saturating_mul(2));

    // resolve in probe order; anything after the first hit is discarded, errors included
    for (index, words) in (start..=end).zip(results) {
        let (first, second) = words;
        for (layout, word) in MappingLayout::ORDER.into_iter().zip([first, second]) {
            if word? == target {
                return Ok(Some((index, layout, layout.storage_key(holder, index))));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{solidity_key, vyper_key};
    use alloy::primitives::address;
    use slotscan_common::testing::MockChain;

    const TOKEN: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    const STORAGE: Address = address!("5555555555555555555555555555555555555555");
    const HOLDER: Address = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");

    fn word(value: u64) -> B256 {
        encode_word(U256::from(value))
    }

    #[tokio::test]
    async fn test_finds_solidity_slot() {
        let chain = MockChain::new(1).with_storage(TOKEN, solidity_key(HOLDER, 5), word(1000));

        let found = search(&chain, TOKEN, HOLDER, U256::from(1000), &SearchOptions::default())
            .await
            .expect("failed to find slot");

        assert_eq!(found.base_slot, 5);
        assert_eq!(found.layout, MappingLayout::Solidity);
        assert_eq!(found.storage_key, solidity_key(HOLDER, 5));
        assert_eq!(found.value, U256::from(1000));
        assert_eq!(found.probes, 11);

        let reads = chain.storage_reads();
        assert_eq!(reads.len(), 11);
        assert!(!reads.contains(&(TOKEN, vyper_key(HOLDER, 5))));
    }

    #[tokio::test]
    async fn test_finds_vyper_slot() {
        let chain = MockChain::new(1).with_storage(TOKEN, vyper_key(HOLDER, 2), word(42));

        let found = search(&chain, TOKEN, HOLDER, U256::from(42), &SearchOptions::default())
            .await
            .expect("failed to find slot");

        assert_eq!(found.base_slot, 2);
        assert_eq!(found.layout, MappingLayout::Vyper);
        assert_eq!(found.probes, 6);
    }

    #[tokio::test]
    async fn test_solidity_wins_a_tie() {
        let chain = MockChain::new(1)
            .with_storage(TOKEN, vyper_key(HOLDER, 3), word(7))
            .with_storage(TOKEN, solidity_key(HOLDER, 3), word(7));

        let found = search(&chain, TOKEN, HOLDER, U256::from(7), &SearchOptions::default())
            .await
            .expect("failed to find slot");

        assert_eq!(found.base_slot, 3);
        assert_eq!(found.layout, MappingLayout::Solidity);
    }

    #[tokio::test]
    async fn test_lowest_slot_wins() {
        let chain = MockChain::new(1)
            .with_storage(TOKEN, solidity_key(HOLDER, 9), word(7))
            .with_storage(TOKEN, vyper_key(HOLDER, 4), word(7));

        let found = search(&chain, TOKEN, HOLDER, U256::from(7), &SearchOptions::default())
            .await
            .expect("failed to find slot");

        assert_eq!((found.base_slot, found.layout), (4, MappingLayout::Vyper));
    }

    #[tokio::test]
    async fn test_reads_from_storage_address() {
        let chain = MockChain::new(1)
            .with_storage(TOKEN, solidity_key(HOLDER, 1), word(5))
            .with_storage(STORAGE, solidity_key(HOLDER, 8), word(5));

        let found = search(&chain, STORAGE, HOLDER, U256::from(5), &SearchOptions::default())
            .await
            .expect("failed to find slot");

        assert_eq!(found.base_slot, 8);
        assert!(chain.storage_reads().iter().all(|(address, _)| *address == STORAGE));
    }

    #[tokio::test]
    async fn test_wrong_value_is_a_miss() {
        let chain = MockChain::new(1).with_storage(TOKEN, solidity_key(HOLDER, 0), word(999));

        let result = search(
            &chain,
            TOKEN,
            HOLDER,
            U256::from(1000),
            &SearchOptions { max_slot: 3, concurrency: 1 },
        )
        .await;

        assert!(matches!(result, Err(Error::SlotNotFound { last_index: 3, probes: 8 })));
    }

    #[tokio::test]
    async fn test_exhausted_bound() {
        let chain = MockChain::new(1);

        let result = search(
            &chain,
            TOKEN,
            HOLDER,
            U256::from(1),
            &SearchOptions { max_slot: 10, concurrency: 1 },
        )
        .await;

        assert!(matches!(result, Err(Error::SlotNotFound { last_index: 10, probes: 22 })));
        assert_eq!(chain.storage_reads().len(), 22);
    }

    #[tokio::test]
    async fn test_zero_bound_probes_slot_zero() {
        let chain = MockChain::new(1).with_storage(TOKEN, vyper_key(HOLDER, 0), word(3));

        let found = search(
            &chain,
            TOKEN,
            HOLDER,
            U256::from(3),
            &SearchOptions { max_slot: 0, concurrency: 1 },
        )
        .await
        .expect("failed to find slot");

        assert_eq!((found.base_slot, found.layout), (0, MappingLayout::Vyper));
    }

    #[tokio::test]
    async fn test_read_errors_are_surfaced() {
        let chain = MockChain::new(1)
            .with_failing_key(solidity_key(HOLDER, 2))
            .with_storage(TOKEN, solidity_key(HOLDER, 4), word(1));

        let result = search(&chain, TOKEN, HOLDER, U256::from(1), &SearchOptions::default()).await;

        match result {
            Err(Error::Rpc(message)) => assert!(message.contains("connection reset")),
            other => panic!("expected Rpc error, got {other:?}"),
        }
        assert_eq!(chain.storage_reads().len(), 5);
    }

    #[tokio::test]
    async fn test_batches_resolve_in_order() {
        let chain = MockChain::new(1)
            .with_storage(TOKEN, vyper_key(HOLDER, 5), word(1000))
            .with_storage(TOKEN, solidity_key(HOLDER, 5), word(1000))
            .with_storage(TOKEN, solidity_key(HOLDER, 6), word(1000));

        let found = search(
            &chain,
            TOKEN,
            HOLDER,
            U256::from(1000),
            &SearchOptions { max_slot: 100, concurrency: 4 },
        )
        .await
        .expect("failed to find slot");

        assert_eq!((found.base_slot, found.layout), (5, MappingLayout::Solidity));
        assert_eq!(found.probes, 16);
    }

    #[tokio::test]
    async fn test_batch_errors_after_a_hit_are_discarded() {
        let chain = MockChain::new(1)
            .with_storage(TOKEN, solidity_key(HOLDER, 5), word(1000))
            .with_failing_key(vyper_key(HOLDER, 5))
            .with_failing_key(solidity_key(HOLDER, 6));

        let found = search(
            &chain,
            TOKEN,
            HOLDER,
            U256::from(1000),
            &SearchOptions { max_slot: 100, concurrency: 4 },
        )
        .await
        .expect("failed to find slot");

        assert_eq!(found.base_slot, 5);
    }

    #[tokio::test]
    async fn test_batch_errors_before_a_hit_are_surfaced() {
        let chain = MockChain::new(1)
            .with_failing_key(vyper_key(HOLDER, 4))
            .with_storage(TOKEN, solidity_key(HOLDER, 5), word(1000));

        let result = search(
            &chain,
            TOKEN,
            HOLDER,
            U256::from(1000),
            &SearchOptions { max_slot: 100, concurrency: 4 },
        )
        .await;

        assert!(matches!(result, Err(Error::Rpc(_))));
    }

    #[tokio::test]
    async fn test_unbounded_search_logs_progress() {
        slotscan_tracing::init_test_tracing();
        let chain = MockChain::new(1).with_storage(TOKEN, solidity_key(HOLDER, 30), word(1000));

        for concurrency in [1, 8] {
            let found = search(
                &chain,
                TOKEN,
                HOLDER,
                U256::from(1000),
                &SearchOptions { max_slot: u64::MAX, concurrency },
            )
            .await
            .expect("failed to find slot");

            assert_eq!((found.base_slot, found.layout), (30, MappingLayout::Solidity));
        }
    }

    #[tokio::test]
    async fn test_batch_exhausts_partial_last_batch() {
        let chain = MockChain::new(1);

        let result = search(
            &chain,
            TOKEN,
            HOLDER,
            U256::from(1),
            &SearchOptions { max_slot: 9, concurrency: 4 },
        )
        .await;

        assert!(matches!(result, Err(Error::SlotNotFound { last_index: 9, probes: 20 })));
        assert_eq!(chain.storage_reads().len(), 20);
    }
}
