//! The slice of the Starknet JSON-RPC surface this crate actually
//! consumes.
//!
//! The crawler and the deployment locator are written against this trait
//! rather than the full [`Provider`] so tests can drive them with scripted
//! oracles. Every real provider gets the implementation for free through
//! the blanket impl.

use async_trait::async_trait;
use starknet::core::types::{BlockId, EventFilter, EventsPage, Felt};
use starknet::providers::{Provider, ProviderError};

#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Current head block number.
    async fn block_number(&self) -> Result<u64, ProviderError>;

    /// Chain identifier, encoded as a Cairo short string.
    async fn chain_id(&self) -> Result<Felt, ProviderError>;

    /// Class hash of the contract at `address` as of `block_number`.
    ///
    /// A [`StarknetError::ContractNotFound`] error is the canonical signal
    /// that the contract did not exist at that block.
    ///
    /// [`StarknetError::ContractNotFound`]: starknet::core::types::StarknetError::ContractNotFound
    async fn class_hash_at(&self, block_number: u64, address: Felt)
        -> Result<Felt, ProviderError>;

    /// One page of events matching `filter`, resumable via the returned
    /// continuation token.
    async fn events(
        &self,
        filter: EventFilter,
        continuation_token: Option<String>,
        chunk_size: u64,
    ) -> Result<EventsPage, ProviderError>;
}

#[async_trait]
impl<P> ChainProvider for P
where
    P: Provider + Send + Sync,
{
    async fn block_number(&self) -> Result<u64, ProviderError> {
        Provider::block_number(self).await
    }

    async fn chain_id(&self) -> Result<Felt, ProviderError> {
        Provider::chain_id(self).await
    }

    async fn class_hash_at(
        &self,
        block_number: u64,
        address: Felt,
    ) -> Result<Felt, ProviderError> {
        self.get_class_hash_at(BlockId::Number(block_number), address).await
    }

    async fn events(
        &self,
        filter: EventFilter,
        continuation_token: Option<String>,
        chunk_size: u64,
    ) -> Result<EventsPage, ProviderError> {
        self.get_events(filter, continuation_token, chunk_size).await
    }
}
