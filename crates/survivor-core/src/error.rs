use starknet::core::types::FromStrError;
use starknet::providers::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error("parsing error: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed event stream: {0}")]
    MalformedStream(#[from] serde_json::Error),
    #[error("address is not a contract")]
    AddressIsNotContract,
}

#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("no such event in ABI: {0}")]
    NoSuchEvent(String),
    #[error("event entry is missing a name")]
    MissingEventName,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    FromStr(#[from] FromStrError),
}

/// Errors raised while reconstructing typed records from a flat felt vector.
///
/// The stage variants identify which positional sub-layout rejected its
/// slice, so a bad payload can be traced to the exact range that broke.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("incorrect event key")]
    IncorrectEventKey,
    #[error("incorrect parameters")]
    IncorrectParameters,
    #[error("could not parse adventurer state")]
    AdventurerState,
    #[error("could not parse adventurer")]
    Adventurer,
    #[error("could not parse adventurer metadata")]
    AdventurerMetadata,
    #[error("could not parse stats")]
    Stats,
    #[error("could not parse combat spec")]
    CombatSpec,
    #[error("could not parse bag")]
    Bag,
}
