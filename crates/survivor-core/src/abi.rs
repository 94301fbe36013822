//! Typed view over a Cairo contract ABI and event selector derivation.
//!
//! The ABI file is a top-level JSON array. Only entries with
//! `type == "event"` and `kind == "struct"` describe emitted events; each
//! is projected once into an [`EventDescriptor`] carrying its on-chain
//! selector.

use serde::Deserialize;
use starknet::core::types::Felt;
use starknet::core::utils::starknet_keccak;

use crate::error::AbiError;
use crate::felt::felt_to_hex;

/// One entry of the ABI array. Fields absent from an entry deserialize to
/// `None` rather than failing the whole load.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub members: Option<Vec<AbiMember>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiMember {
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: String,
    pub kind: String,
}

/// An event declared by the ABI, with its selector precomputed.
#[derive(Debug, Clone)]
pub struct EventDescriptor {
    pub name: String,
    pub selector: String,
    pub members: Vec<AbiMember>,
}

/// Deserializes an ABI document from its JSON text.
pub fn abi_from_json(contents: &str) -> Result<Vec<AbiEntry>, AbiError> {
    Ok(serde_json::from_str(contents)?)
}

/// Derives the 250-bit event selector felt for a (possibly
/// `::`-qualified) event name.
///
/// Only the final path segment participates in the hash, matching how
/// event keys appear in on-chain log records.
pub fn selector_from_name(name: &str) -> Felt {
    let short_name = name.rsplit("::").next().unwrap_or(name);
    starknet_keccak(short_name.as_bytes())
}

/// The selector of an event name, rendered as bare lowercase hex.
pub fn hash_from_name(name: &str) -> String {
    felt_to_hex(&selector_from_name(name))
}

/// Projects the event entries of an ABI into descriptors.
pub fn events(abi: &[AbiEntry]) -> Result<Vec<EventDescriptor>, AbiError> {
    let mut descriptors = Vec::new();
    for entry in abi {
        if entry.entry_type != "event" || entry.kind.as_deref() != Some("struct") {
            continue;
        }
        let name = entry.name.clone().ok_or(AbiError::MissingEventName)?;
        descriptors.push(EventDescriptor {
            selector: hash_from_name(&name),
            members: entry.members.clone().unwrap_or_default(),
            name,
        });
    }
    Ok(descriptors)
}

/// Looks up the selector of a named event, failing when the ABI does not
/// declare it.
pub fn event_selector(abi: &[AbiEntry], event_name: &str) -> Result<String, AbiError> {
    events(abi)?
        .into_iter()
        .find(|event| event.name == event_name)
        .map(|event| event.selector)
        .ok_or_else(|| AbiError::NoSuchEvent(event_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_ignores_path_qualification() {
        assert_eq!(hash_from_name("game::Game::StartGame"), hash_from_name("StartGame"));
        assert_eq!(
            hash_from_name("StartGame"),
            "023c34c070d9c09046f7f5a319c0d6d482c1f74a5926166f6ff44e5302c4b5b3"
        );
    }

    #[test]
    fn known_selectors() {
        assert_eq!(
            hash_from_name("game::Game::SlayedBeast"),
            "0335e768ceca00415f9ee04d58d9aebc613c76b43863445e7e33c7138184442e"
        );
        // Selectors narrower than 32 bytes drop their leading zero bytes.
        assert_eq!(
            hash_from_name("game::Game::UpgradesAvailable"),
            "b497e78370ca3376efb8bd098ba912913a571e447c1b2c1ae4de95899d564f"
        );
    }

    const ABI: &str = r#"[
        {"type": "impl", "name": "GameImpl", "interface_name": "game::IGame"},
        {"type": "event", "kind": "struct", "name": "game::Game::StartGame",
         "members": [{"name": "adventurer_state", "type": "game::AdventurerState", "kind": "data"}]},
        {"type": "event", "kind": "enum", "name": "game::Game::Event"}
    ]"#;

    #[test]
    fn projects_struct_events_only() {
        let abi = abi_from_json(ABI).unwrap();
        let events = events(&abi).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "game::Game::StartGame");
        assert_eq!(
            events[0].selector,
            "023c34c070d9c09046f7f5a319c0d6d482c1f74a5926166f6ff44e5302c4b5b3"
        );
        assert_eq!(events[0].members.len(), 1);
        assert_eq!(events[0].members[0].name, "adventurer_state");
    }

    #[test]
    fn unknown_event_lookup_fails() {
        let abi = abi_from_json(ABI).unwrap();
        assert!(event_selector(&abi, "game::Game::StartGame").is_ok());
        assert!(matches!(
            event_selector(&abi, "game::Game::NoSuchThing"),
            Err(AbiError::NoSuchEvent(_))
        ));
    }
}
