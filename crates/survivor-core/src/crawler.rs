//! Cursor-driven event crawler with adaptive polling.
//!
//! One task owns the cursor and pushes raw events into a bounded channel.
//! Polling alternates between a hot and a cold cadence: a continuation
//! token or a streak of non-empty windows keeps the crawl hot, an empty
//! exhausted window cools it down.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use starknet::core::serde::unsigned_field_element::UfeHex;
use starknet::core::types::{BlockId, EmittedEvent, EventFilter, Felt};
use tokio::sync::mpsc::Sender;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::abi::{event_selector, AbiEntry};
use crate::error::{AbiError, Error};
use crate::felt::felt_from_hex;
use crate::provider::ChainProvider;

pub(crate) const LOG_TARGET: &str = "survivor_core::crawler";

/// A raw event as it leaves the crawler, before any decoding.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawledEvent {
    pub block_number: u64,
    #[serde_as(as = "UfeHex")]
    pub block_hash: Felt,
    #[serde_as(as = "UfeHex")]
    #[serde(rename = "tx_hash")]
    pub transaction_hash: Felt,
    #[serde_as(as = "UfeHex")]
    pub from_address: Felt,
    #[serde_as(as = "UfeHex")]
    pub primary_key: Felt,
    #[serde_as(as = "Vec<UfeHex>")]
    pub keys: Vec<Felt>,
    #[serde_as(as = "Vec<UfeHex>")]
    pub parameters: Vec<Felt>,
}

impl From<EmittedEvent> for CrawledEvent {
    fn from(event: EmittedEvent) -> Self {
        Self {
            block_number: event.block_number.unwrap_or_default(),
            block_hash: event.block_hash.unwrap_or_default(),
            transaction_hash: event.transaction_hash,
            from_address: event.from_address,
            primary_key: event.keys.first().copied().unwrap_or(Felt::ZERO),
            keys: event.keys,
            parameters: event.data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Contract to crawl. `None` crawls every contract in range.
    pub contract_address: Option<Felt>,
    pub from_block: u64,
    /// Upper crawl bound. `0` follows the chain tip indefinitely.
    pub to_block: u64,
    /// Blocks behind the head treated as canonical.
    pub confirmations: u64,
    /// Events requested per page.
    pub batch_size: u64,
    /// Consecutive non-empty windows before the crawl is considered hot.
    pub hot_threshold: u32,
    pub hot_interval: Duration,
    pub cold_interval: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            contract_address: None,
            from_block: 0,
            to_block: 0,
            confirmations: 5,
            batch_size: 100,
            hot_threshold: 2,
            hot_interval: Duration::from_millis(100),
            cold_interval: Duration::from_millis(10_000),
        }
    }
}

#[derive(Debug)]
struct CrawlCursor {
    from_block: u64,
    to_block: u64,
    continuation_token: Option<String>,
    interval: Duration,
    heat: u32,
}

/// Filter matching every event in `[from_block, to_block]`, optionally
/// restricted to one contract.
pub fn all_events_filter(
    from_block: u64,
    to_block: u64,
    contract_address: Option<Felt>,
) -> EventFilter {
    EventFilter {
        from_block: Some(BlockId::Number(from_block)),
        to_block: Some(BlockId::Number(to_block)),
        address: contract_address,
        keys: Some(vec![vec![]]),
    }
}

/// Filter matching a single named event from the given ABI.
pub fn single_event_filter(
    from_block: u64,
    to_block: u64,
    contract_address: Option<Felt>,
    event_name: &str,
    abi: &[AbiEntry],
) -> Result<EventFilter, Error> {
    let selector = event_selector(abi, event_name)?;
    let key = felt_from_hex(&selector).map_err(AbiError::from)?;

    let mut filter = all_events_filter(from_block, to_block, contract_address);
    filter.keys = Some(vec![vec![key]]);
    Ok(filter)
}

/// Crawls events into `events_tx` until the bounded range is exhausted,
/// the token is cancelled, or a transport error surfaces.
///
/// The sender is dropped on every exit path, closing the stream for the
/// consumer. Events are forwarded in provider page order; nothing is
/// deduplicated or retried here.
pub async fn crawl_contract_events<P>(
    provider: &P,
    config: CrawlerConfig,
    events_tx: Sender<CrawledEvent>,
    cancellation: CancellationToken,
) -> Result<(), Error>
where
    P: ChainProvider,
{
    let mut cursor = CrawlCursor {
        from_block: config.from_block,
        to_block: config.to_block,
        continuation_token: None,
        interval: config.hot_interval,
        heat: 0,
    };

    loop {
        tokio::select! {
            _ = cancellation.cancelled() => return Ok(()),
            _ = sleep(cursor.interval) => {}
        }

        if cursor.to_block == 0 {
            let head = provider.block_number().await?;
            cursor.to_block = head.saturating_sub(config.confirmations);
        }

        if cursor.to_block <= cursor.from_block {
            // Nothing confirmed in range yet: cool down.
            cursor.interval = config.cold_interval;
            if config.to_block == 0 {
                // Re-resolve the tip on the next poll.
                cursor.to_block = 0;
                continue;
            }
            return Ok(());
        }

        let filter =
            all_events_filter(cursor.from_block, cursor.to_block, config.contract_address);
        let page = provider
            .events(filter, cursor.continuation_token.clone(), config.batch_size)
            .await?;

        trace!(
            target: LOG_TARGET,
            from_block = cursor.from_block,
            to_block = cursor.to_block,
            count = page.events.len(),
            "Fetched events page."
        );

        let page_len = page.events.len();
        for event in page.events {
            if events_tx.send(event.into()).await.is_err() {
                // Receiver went away; there is nobody left to crawl for.
                return Ok(());
            }
        }

        match page.continuation_token.filter(|token| !token.is_empty()) {
            Some(token) => {
                cursor.continuation_token = Some(token);
                cursor.interval = config.hot_interval;
            }
            None => {
                debug!(
                    target: LOG_TARGET,
                    from_block = cursor.from_block,
                    to_block = cursor.to_block,
                    "Window exhausted, advancing cursor."
                );
                cursor.from_block = cursor.to_block + 1;
                cursor.to_block = config.to_block;
                cursor.continuation_token = None;
                if page_len > 0 {
                    cursor.heat = (cursor.heat + 1).min(config.hot_threshold);
                    if cursor.heat >= config.hot_threshold {
                        cursor.interval = config.hot_interval;
                    }
                } else {
                    cursor.heat = 0;
                    cursor.interval = config.cold_interval;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use starknet::core::types::EventsPage;
    use starknet::providers::ProviderError;
    use tokio::sync::mpsc;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct RecordedCall {
        from_block: u64,
        to_block: u64,
        continuation_token: Option<String>,
    }

    /// Replays a fixed sequence of event pages, recording each query.
    struct ScriptedProvider {
        head: u64,
        pages: Mutex<VecDeque<EventsPage>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedProvider {
        fn new(head: u64, pages: Vec<EventsPage>) -> Arc<Self> {
            Arc::new(Self {
                head,
                pages: Mutex::new(pages.into()),
                calls: Mutex::new(vec![]),
            })
        }

        fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChainProvider for ScriptedProvider {
        async fn block_number(&self) -> Result<u64, ProviderError> {
            Ok(self.head)
        }

        async fn chain_id(&self) -> Result<Felt, ProviderError> {
            Ok(Felt::ZERO)
        }

        async fn class_hash_at(
            &self,
            _block_number: u64,
            _address: Felt,
        ) -> Result<Felt, ProviderError> {
            Ok(Felt::ONE)
        }

        async fn events(
            &self,
            filter: EventFilter,
            continuation_token: Option<String>,
            _chunk_size: u64,
        ) -> Result<EventsPage, ProviderError> {
            let block_of = |id: Option<BlockId>| match id {
                Some(BlockId::Number(number)) => number,
                _ => panic!("crawler always filters by block number"),
            };
            self.calls.lock().unwrap().push(RecordedCall {
                from_block: block_of(filter.from_block),
                to_block: block_of(filter.to_block),
                continuation_token,
            });
            Ok(self
                .pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(EventsPage { events: vec![], continuation_token: None }))
        }
    }

    fn emitted(block_number: u64, tx: u64) -> EmittedEvent {
        EmittedEvent {
            from_address: Felt::ONE,
            keys: vec![Felt::from(7u64)],
            data: vec![],
            block_hash: Some(Felt::from(block_number)),
            block_number: Some(block_number),
            transaction_hash: Felt::from(tx),
        }
    }

    fn page(events: Vec<EmittedEvent>, continuation_token: Option<&str>) -> EventsPage {
        EventsPage { events, continuation_token: continuation_token.map(str::to_string) }
    }

    #[tokio::test(start_paused = true)]
    async fn continuation_token_resumes_then_cursor_advances() {
        let provider = ScriptedProvider::new(
            30,
            vec![
                page(vec![emitted(10, 1), emitted(10, 2)], Some("t")),
                page(vec![emitted(11, 3)], None),
            ],
        );
        let config = CrawlerConfig {
            from_block: 10,
            to_block: 0,
            confirmations: 0,
            ..Default::default()
        };

        let (events_tx, mut events_rx) = mpsc::channel(16);
        let cancellation = CancellationToken::new();
        let handle = tokio::spawn({
            let provider = provider.clone();
            let cancellation = cancellation.clone();
            async move { crawl_contract_events(&*provider, config, events_tx, cancellation).await }
        });

        let mut received = vec![];
        for _ in 0..3 {
            received.push(events_rx.recv().await.unwrap());
        }
        cancellation.cancel();
        handle.await.unwrap().unwrap();

        let hashes: Vec<u64> =
            received.iter().map(|e| crate::felt::felt_to_u64(&e.transaction_hash)).collect();
        assert_eq!(hashes, vec![1, 2, 3]);

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], RecordedCall {
            from_block: 10,
            to_block: 30,
            continuation_token: None
        });
        assert_eq!(calls[1], RecordedCall {
            from_block: 10,
            to_block: 30,
            continuation_token: Some("t".to_string())
        });
        // The exhausted window advanced the cursor past the old range; the
        // crawl went cold at from=31 without another events query.
        assert!(events_rx.recv().await.is_none());
    }

    #[test]
    fn single_event_filter_requires_a_declared_event() {
        let abi = crate::abi::abi_from_json(
            r#"[{"type": "event", "kind": "struct", "name": "game::Game::StartGame"}]"#,
        )
        .unwrap();

        let filter =
            single_event_filter(1, 10, Some(Felt::ONE), "game::Game::StartGame", &abi).unwrap();
        let selector =
            crate::felt::felt_from_hex(&crate::abi::hash_from_name("StartGame")).unwrap();
        assert_eq!(filter.keys, Some(vec![vec![selector]]));

        let missing = single_event_filter(1, 10, None, "game::Game::NoSuchThing", &abi);
        assert!(matches!(missing, Err(Error::Abi(AbiError::NoSuchEvent(_)))));
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_crawl_terminates_after_range() {
        let provider = ScriptedProvider::new(
            100,
            vec![page(vec![emitted(10, 1), emitted(11, 2), emitted(12, 3)], None)],
        );
        let config = CrawlerConfig {
            from_block: 10,
            to_block: 12,
            confirmations: 0,
            ..Default::default()
        };

        let (events_tx, mut events_rx) = mpsc::channel(16);
        crawl_contract_events(&*provider, config, events_tx, CancellationToken::new())
            .await
            .unwrap();

        let mut received = vec![];
        while let Some(event) = events_rx.recv().await {
            received.push(event);
        }
        assert_eq!(received.len(), 3);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_continuation_token_counts_as_exhausted() {
        let provider =
            ScriptedProvider::new(100, vec![page(vec![emitted(10, 1)], Some(""))]);
        let config = CrawlerConfig {
            from_block: 10,
            to_block: 12,
            confirmations: 0,
            ..Default::default()
        };

        let (events_tx, mut events_rx) = mpsc::channel(16);
        crawl_contract_events(&*provider, config, events_tx, CancellationToken::new())
            .await
            .unwrap();

        assert!(events_rx.recv().await.is_some());
        assert!(events_rx.recv().await.is_none());
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn never_queries_past_confirmation_depth() {
        let provider = ScriptedProvider::new(100, vec![]);
        let config = CrawlerConfig {
            from_block: 90,
            to_block: 0,
            confirmations: 5,
            ..Default::default()
        };

        let (events_tx, mut events_rx) = mpsc::channel(16);
        let cancellation = CancellationToken::new();
        let handle = tokio::spawn({
            let provider = provider.clone();
            let cancellation = cancellation.clone();
            async move { crawl_contract_events(&*provider, config, events_tx, cancellation).await }
        });

        // Let several poll cycles elapse, then stop the crawl.
        tokio::time::sleep(Duration::from_secs(60)).await;
        cancellation.cancel();
        handle.await.unwrap().unwrap();

        let calls = provider.calls();
        assert!(!calls.is_empty());
        assert!(calls.iter().all(|call| call.to_block <= 95));
        assert!(events_rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn continuous_crawl_at_tip_stays_cold_until_cancelled() {
        let provider = ScriptedProvider::new(100, vec![]);
        let config = CrawlerConfig {
            from_block: 95,
            to_block: 0,
            confirmations: 5,
            ..Default::default()
        };

        let (events_tx, mut events_rx) = mpsc::channel(16);
        let cancellation = CancellationToken::new();
        let handle = tokio::spawn({
            let provider = provider.clone();
            let cancellation = cancellation.clone();
            async move { crawl_contract_events(&*provider, config, events_tx, cancellation).await }
        });

        tokio::time::sleep(Duration::from_secs(60)).await;
        cancellation.cancel();
        handle.await.unwrap().unwrap();

        // The window never opened: no events queries, nothing emitted.
        assert!(provider.calls().is_empty());
        assert!(events_rx.recv().await.is_none());
    }
}
