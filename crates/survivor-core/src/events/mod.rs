//! Event decoding: selector registry and tagged dispatch.
//!
//! The registry precomputes one selector felt per known event and matches
//! incoming raw events by key equality. The set is small, so a linear scan
//! is the lookup. Anything unmatched is passed through under the
//! [`EVENT_UNKNOWN`] tag rather than treated as an error.

pub mod decode;
pub mod types;

use serde::{Deserialize, Serialize};
use starknet::core::types::Felt;

use crate::abi::selector_from_name;
use crate::crawler::CrawledEvent;
use crate::error::ParseError;

pub use types::*;

pub const EVENT_UNKNOWN: &str = "UNKNOWN";

pub const EVENT_START_GAME: &str = "game::Game::StartGame";
pub const EVENT_UPGRADES_AVAILABLE: &str = "game::Game::UpgradesAvailable";
pub const EVENT_DISCOVERED_HEALTH: &str = "game::Game::DiscoveredHealth";
pub const EVENT_DISCOVERED_GOLD: &str = "game::Game::DiscoveredGold";
pub const EVENT_DISCOVERED_BEAST: &str = "game::Game::DiscoveredBeast";
pub const EVENT_ATTACKED_BEAST: &str = "game::Game::AttackedBeast";
pub const EVENT_AMBUSHED_BY_BEAST: &str = "game::Game::AmbushedByBeast";
pub const EVENT_SLAYED_BEAST: &str = "game::Game::SlayedBeast";
pub const EVENT_DODGED_OBSTACLE: &str = "game::Game::DodgedObstacle";
pub const EVENT_HIT_BY_OBSTACLE: &str = "game::Game::HitByObstacle";
pub const EVENT_FLEE_FAILED: &str = "game::Game::FleeFailed";
pub const EVENT_FLEE_SUCCEEDED: &str = "game::Game::FleeSucceeded";
pub const EVENT_PURCHASED_ITEMS: &str = "game::Game::PurchasedItems";
pub const EVENT_PURCHASED_POTIONS: &str = "game::Game::PurchasedPotions";
pub const EVENT_ADVENTURER_LEVELED_UP: &str = "game::Game::AdventurerLeveledUp";
pub const EVENT_ADVENTURER_UPGRADED: &str = "game::Game::AdventurerUpgraded";
pub const EVENT_IDLE_DEATH_PENALTY: &str = "game::Game::IdleDeathPenalty";
pub const EVENT_ADVENTURER_DIED: &str = "game::Game::AdventurerDied";
pub const EVENT_REWARD_DISTRIBUTION: &str = "game::Game::RewardDistribution";

/// A decoded event payload. Serializes as the bare record, so the wire
/// shape is `{"name": ..., "event": <record>}` for known events and the
/// raw crawled event under the UNKNOWN tag.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DecodedEvent {
    StartGame(StartGame),
    UpgradesAvailable(UpgradesAvailable),
    DiscoveredHealth(DiscoveredHealth),
    DiscoveredGold(DiscoveredGold),
    DiscoveredBeast(DiscoveredBeast),
    AttackedBeast(AttackedBeast),
    AmbushedByBeast(AmbushedByBeast),
    SlayedBeast(SlayedBeast),
    DodgedObstacle(DodgedObstacle),
    HitByObstacle(HitByObstacle),
    FleeFailed(FleeFailed),
    FleeSucceeded(FleeSucceeded),
    PurchasedItems(PurchasedItems),
    PurchasedPotions(PurchasedPotions),
    AdventurerLeveledUp(AdventurerLeveledUp),
    AdventurerUpgraded(AdventurerUpgraded),
    IdleDeathPenalty(IdleDeathPenalty),
    AdventurerDied(AdventurerDied),
    RewardDistribution(RewardDistribution),
    Raw(CrawledEvent),
}

/// A fully decoded line of the event stream.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedEvent {
    pub name: String,
    pub event: DecodedEvent,
}

/// A line of the event stream with its payload left opaque, for readers
/// that dispatch on the name before committing to a shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialEvent {
    pub name: String,
    pub event: serde_json::Value,
}

type DecodeFn = fn(&[Felt]) -> Result<DecodedEvent, ParseError>;

struct RegistryEntry {
    selector: Felt,
    name: &'static str,
    decode: DecodeFn,
}

impl RegistryEntry {
    fn new(name: &'static str, decode: DecodeFn) -> Self {
        Self { selector: selector_from_name(name), name, decode }
    }
}

/// Selector-keyed decoder registry for every known game event.
pub struct EventParser {
    entries: Vec<RegistryEntry>,
}

impl EventParser {
    pub fn new() -> Self {
        use decode::*;
        let entries = vec![
            RegistryEntry::new(EVENT_START_GAME, |p| {
                parse_start_game(p).map(DecodedEvent::StartGame)
            }),
            RegistryEntry::new(EVENT_UPGRADES_AVAILABLE, |p| {
                parse_upgrades_available(p).map(DecodedEvent::UpgradesAvailable)
            }),
            RegistryEntry::new(EVENT_DISCOVERED_HEALTH, |p| {
                parse_discovered_health(p).map(DecodedEvent::DiscoveredHealth)
            }),
            RegistryEntry::new(EVENT_DISCOVERED_GOLD, |p| {
                parse_discovered_gold(p).map(DecodedEvent::DiscoveredGold)
            }),
            RegistryEntry::new(EVENT_DISCOVERED_BEAST, |p| {
                parse_discovered_beast(p).map(DecodedEvent::DiscoveredBeast)
            }),
            RegistryEntry::new(EVENT_ATTACKED_BEAST, |p| {
                parse_attacked_beast(p).map(DecodedEvent::AttackedBeast)
            }),
            RegistryEntry::new(EVENT_AMBUSHED_BY_BEAST, |p| {
                parse_ambushed_by_beast(p).map(DecodedEvent::AmbushedByBeast)
            }),
            RegistryEntry::new(EVENT_SLAYED_BEAST, |p| {
                parse_slayed_beast(p).map(DecodedEvent::SlayedBeast)
            }),
            RegistryEntry::new(EVENT_DODGED_OBSTACLE, |p| {
                parse_dodged_obstacle(p).map(DecodedEvent::DodgedObstacle)
            }),
            RegistryEntry::new(EVENT_HIT_BY_OBSTACLE, |p| {
                parse_hit_by_obstacle(p).map(DecodedEvent::HitByObstacle)
            }),
            RegistryEntry::new(EVENT_FLEE_FAILED, |p| {
                parse_flee_failed(p).map(DecodedEvent::FleeFailed)
            }),
            RegistryEntry::new(EVENT_FLEE_SUCCEEDED, |p| {
                parse_flee_succeeded(p).map(DecodedEvent::FleeSucceeded)
            }),
            RegistryEntry::new(EVENT_PURCHASED_ITEMS, |p| {
                parse_purchased_items(p).map(DecodedEvent::PurchasedItems)
            }),
            RegistryEntry::new(EVENT_PURCHASED_POTIONS, |p| {
                parse_purchased_potions(p).map(DecodedEvent::PurchasedPotions)
            }),
            RegistryEntry::new(EVENT_ADVENTURER_LEVELED_UP, |p| {
                parse_adventurer_leveled_up(p).map(DecodedEvent::AdventurerLeveledUp)
            }),
            RegistryEntry::new(EVENT_ADVENTURER_UPGRADED, |p| {
                parse_adventurer_upgraded(p).map(DecodedEvent::AdventurerUpgraded)
            }),
            RegistryEntry::new(EVENT_IDLE_DEATH_PENALTY, |p| {
                parse_idle_death_penalty(p).map(DecodedEvent::IdleDeathPenalty)
            }),
            RegistryEntry::new(EVENT_ADVENTURER_DIED, |p| {
                parse_adventurer_died(p).map(DecodedEvent::AdventurerDied)
            }),
            RegistryEntry::new(EVENT_REWARD_DISTRIBUTION, |p| {
                parse_reward_distribution(p).map(DecodedEvent::RewardDistribution)
            }),
        ];
        Self { entries }
    }

    /// Decodes a raw event by its primary key.
    ///
    /// Unknown keys are not an error: the raw event is passed through under
    /// the UNKNOWN tag. An event with no keys cannot be dispatched at all.
    pub fn parse(&self, event: &CrawledEvent) -> Result<ParsedEvent, ParseError> {
        if event.keys.is_empty() {
            return Err(ParseError::IncorrectParameters);
        }
        match self.entries.iter().find(|entry| entry.selector == event.primary_key) {
            Some(entry) => Ok(ParsedEvent {
                name: entry.name.to_string(),
                event: (entry.decode)(&event.parameters)?,
            }),
            None => Ok(ParsedEvent {
                name: EVENT_UNKNOWN.to_string(),
                event: DecodedEvent::Raw(event.clone()),
            }),
        }
    }

    /// Decodes a raw event expected to be `name`; a key that does not
    /// match that event's selector is rejected.
    pub fn parse_as(&self, name: &str, event: &CrawledEvent) -> Result<ParsedEvent, ParseError> {
        if event.keys.is_empty() {
            return Err(ParseError::IncorrectParameters);
        }
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or(ParseError::IncorrectEventKey)?;
        if entry.selector != event.primary_key {
            return Err(ParseError::IncorrectEventKey);
        }
        Ok(ParsedEvent {
            name: entry.name.to_string(),
            event: (entry.decode)(&event.parameters)?,
        })
    }
}

impl Default for EventParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::decode::*;
    use super::*;

    fn raw_event(name: &str, parameter_count: usize) -> CrawledEvent {
        let selector = selector_from_name(name);
        CrawledEvent {
            block_number: 1,
            block_hash: Felt::ONE,
            transaction_hash: Felt::TWO,
            from_address: Felt::THREE,
            primary_key: selector,
            keys: vec![selector],
            parameters: vec![Felt::ZERO; parameter_count],
        }
    }

    const WIDTHS: &[(&str, usize)] = &[
        (EVENT_START_GAME, START_GAME_WIDTH),
        (EVENT_UPGRADES_AVAILABLE, UPGRADES_AVAILABLE_MIN_WIDTH),
        (EVENT_DISCOVERED_HEALTH, DISCOVERY_WIDTH),
        (EVENT_DISCOVERED_GOLD, DISCOVERY_WIDTH),
        (EVENT_DISCOVERED_BEAST, DISCOVERED_BEAST_WIDTH),
        (EVENT_ATTACKED_BEAST, BEAST_BATTLE_WIDTH),
        (EVENT_AMBUSHED_BY_BEAST, BEAST_BATTLE_WIDTH),
        (EVENT_SLAYED_BEAST, SLAYED_BEAST_WIDTH),
        (EVENT_DODGED_OBSTACLE, OBSTACLE_EVENT_WIDTH),
        (EVENT_HIT_BY_OBSTACLE, OBSTACLE_EVENT_WIDTH),
        (EVENT_FLEE_FAILED, FLEE_EVENT_WIDTH),
        (EVENT_FLEE_SUCCEEDED, FLEE_EVENT_WIDTH),
        (EVENT_PURCHASED_ITEMS, PURCHASED_ITEMS_BASE_WIDTH),
        (EVENT_PURCHASED_POTIONS, PURCHASED_POTIONS_WIDTH),
        (EVENT_ADVENTURER_LEVELED_UP, ADVENTURER_LEVELED_UP_WIDTH),
        (EVENT_ADVENTURER_UPGRADED, ADVENTURER_UPGRADED_WIDTH),
        (EVENT_IDLE_DEATH_PENALTY, IDLE_DEATH_PENALTY_WIDTH),
        (EVENT_ADVENTURER_DIED, ADVENTURER_DIED_WIDTH),
        (EVENT_REWARD_DISTRIBUTION, REWARD_DISTRIBUTION_WIDTH),
    ];

    #[test]
    fn every_variant_decodes_at_its_width_and_rejects_otherwise() {
        let parser = EventParser::new();
        for (name, width) in WIDTHS {
            let parsed = parser.parse(&raw_event(name, *width)).unwrap();
            assert_eq!(&parsed.name, name, "decode at declared width");

            let truncated = parser.parse(&raw_event(name, 1));
            assert!(truncated.is_err(), "{name} must reject a truncated payload");
        }
    }

    #[test]
    fn unknown_selector_passes_through_raw() {
        let parser = EventParser::new();
        let mut event = raw_event(EVENT_START_GAME, 3);
        event.primary_key = Felt::from(999u64);
        event.keys = vec![event.primary_key];

        let parsed = parser.parse(&event).unwrap();
        assert_eq!(parsed.name, EVENT_UNKNOWN);
        match parsed.event {
            DecodedEvent::Raw(raw) => assert_eq!(raw, event),
            other => panic!("expected raw passthrough, got {other:?}"),
        }
    }

    #[test]
    fn empty_keys_are_rejected() {
        let parser = EventParser::new();
        let mut event = raw_event(EVENT_START_GAME, START_GAME_WIDTH);
        event.keys.clear();
        assert_eq!(parser.parse(&event).unwrap_err(), ParseError::IncorrectParameters);
    }

    #[test]
    fn parse_as_checks_the_key() {
        let parser = EventParser::new();
        let event = raw_event(EVENT_SLAYED_BEAST, SLAYED_BEAST_WIDTH);
        assert!(parser.parse_as(EVENT_SLAYED_BEAST, &event).is_ok());
        assert_eq!(
            parser.parse_as(EVENT_START_GAME, &event).unwrap_err(),
            ParseError::IncorrectEventKey
        );
    }

    #[test]
    fn known_line_serializes_with_bare_payload() {
        let parser = EventParser::new();
        let parsed = parser.parse(&raw_event(EVENT_START_GAME, START_GAME_WIDTH)).unwrap();
        let line = serde_json::to_string(&parsed).unwrap();
        assert!(line.starts_with(r#"{"name":"game::Game::StartGame","event":{"#));
        assert!(line.contains(r#""adventurer_state""#));
    }
}
