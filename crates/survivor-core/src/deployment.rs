//! Locates the block in which a contract was deployed.
//!
//! `starknet_getCode` is deprecated, so the class hash lookup serves as the
//! existence oracle: querying a block before deployment fails with
//! `ContractNotFound` (error code 20), anything else means the contract was
//! live.

use std::collections::HashMap;

use starknet::core::types::{Felt, StarknetError};
use starknet::providers::ProviderError;
use tracing::trace;

use crate::error::Error;
use crate::provider::ChainProvider;

pub(crate) const LOG_TARGET: &str = "survivor_core::deployment";

/// Binary-searches block height for the lowest block at which `address`
/// resolves to a contract.
///
/// Probed blocks are memoized so no block is queried twice. Returns
/// [`Error::AddressIsNotContract`] when the address does not resolve at the
/// current head.
pub async fn deployment_block<P>(provider: &P, address: Felt) -> Result<u64, Error>
where
    P: ChainProvider,
{
    let mut max_block = provider.block_number().await?;
    let mut min_block: u64 = 0;
    let mut mid_block = (min_block + max_block) / 2;

    let mut is_deployed: HashMap<u64, bool> = HashMap::new();

    let deployed_at_head = contract_exists_at_block(provider, address, max_block).await?;
    if !deployed_at_head {
        return Err(Error::AddressIsNotContract);
    }
    is_deployed.insert(max_block, deployed_at_head);

    let deployed = contract_exists_at_block(provider, address, min_block).await?;
    is_deployed.insert(min_block, deployed);

    let deployed = contract_exists_at_block(provider, address, mid_block).await?;
    is_deployed.insert(mid_block, deployed);

    while max_block - min_block >= 2 {
        if !is_deployed[&min_block] && !is_deployed[&mid_block] {
            min_block = mid_block;
        } else {
            max_block = mid_block;
        }

        mid_block = (min_block + max_block) / 2;

        if !is_deployed.contains_key(&mid_block) {
            let deployed = contract_exists_at_block(provider, address, mid_block).await?;
            is_deployed.insert(mid_block, deployed);
        }
    }

    Ok(if is_deployed[&min_block] { min_block } else { max_block })
}

/// Whether `address` resolved to a contract as of `block_number`.
async fn contract_exists_at_block<P>(
    provider: &P,
    address: Felt,
    block_number: u64,
) -> Result<bool, Error>
where
    P: ChainProvider,
{
    match provider.class_hash_at(block_number, address).await {
        Ok(_) => {
            trace!(target: LOG_TARGET, block_number, "Contract exists.");
            Ok(true)
        }
        Err(ProviderError::StarknetError(StarknetError::ContractNotFound)) => {
            trace!(target: LOG_TARGET, block_number, "Contract not found.");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use starknet::core::types::{EventFilter, EventsPage};

    use super::*;

    /// Oracle for a contract deployed at `deployed_at` (never, if `None`)
    /// on a chain whose head is `head`.
    struct StepOracle {
        head: u64,
        deployed_at: Option<u64>,
    }

    #[async_trait]
    impl ChainProvider for StepOracle {
        async fn block_number(&self) -> Result<u64, ProviderError> {
            Ok(self.head)
        }

        async fn chain_id(&self) -> Result<Felt, ProviderError> {
            Ok(Felt::ZERO)
        }

        async fn class_hash_at(
            &self,
            block_number: u64,
            _address: Felt,
        ) -> Result<Felt, ProviderError> {
            match self.deployed_at {
                Some(deployed_at) if block_number >= deployed_at => Ok(Felt::ONE),
                _ => Err(ProviderError::StarknetError(StarknetError::ContractNotFound)),
            }
        }

        async fn events(
            &self,
            _filter: EventFilter,
            _continuation_token: Option<String>,
            _chunk_size: u64,
        ) -> Result<EventsPage, ProviderError> {
            Ok(EventsPage { events: vec![], continuation_token: None })
        }
    }

    #[tokio::test]
    async fn finds_exact_deployment_block() {
        for (deployed_at, head) in [(0, 100), (1, 100), (7, 100), (42, 100), (1_000_000, 1_500_000)]
        {
            let oracle = StepOracle { head, deployed_at: Some(deployed_at) };
            let block = deployment_block(&oracle, Felt::ONE).await.unwrap();
            assert_eq!(block, deployed_at, "step at {deployed_at}");
        }
    }

    #[tokio::test]
    async fn deployed_at_head_only() {
        let oracle = StepOracle { head: 100, deployed_at: Some(100) };
        assert_eq!(deployment_block(&oracle, Felt::ONE).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn missing_contract_is_an_error() {
        let oracle = StepOracle { head: 100, deployed_at: None };
        let result = deployment_block(&oracle, Felt::ONE).await;
        assert!(matches!(result, Err(Error::AddressIsNotContract)));
    }
}
