//! Typed records reconstructed from event payloads.
//!
//! Owner, adventurer id and address fields are carried as canonical
//! decimal strings so downstream consumers key on a single representation.
//! Item tier and type enumerations are carried symbolically.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: u64,
    pub dexterity: u64,
    pub vitality: u64,
    pub intelligence: u64,
    pub wisdom: u64,
    pub charisma: u64,
    pub luck: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrimitive {
    pub id: u64,
    pub xp: u64,
    pub metadata: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adventurer {
    pub last_action_block: u64,
    pub health: u64,
    pub xp: u64,
    pub stats: Stats,
    pub gold: u64,
    pub weapon: ItemPrimitive,
    pub chest: ItemPrimitive,
    pub head: ItemPrimitive,
    pub waist: ItemPrimitive,
    pub foot: ItemPrimitive,
    pub hand: ItemPrimitive,
    pub neck: ItemPrimitive,
    pub ring: ItemPrimitive,
    pub beast_health: u64,
    pub stat_points_available: u64,
    pub actions_per_block: u64,
    pub mutated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventurerState {
    pub owner: String,
    pub adventurer_id: String,
    pub adventurer: Adventurer,
}

/// Adventurer metadata as packed at game start. `name` is the decimal
/// rendering of the name felt; its big-endian bytes are the ASCII display
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventurerMetadata {
    pub start_block: u64,
    pub starting_stats: Stats,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    pub item_1: ItemPrimitive,
    pub item_2: ItemPrimitive,
    pub item_3: ItemPrimitive,
    pub item_4: ItemPrimitive,
    pub item_5: ItemPrimitive,
    pub item_6: ItemPrimitive,
    pub item_7: ItemPrimitive,
    pub item_8: ItemPrimitive,
    pub item_9: ItemPrimitive,
    pub item_10: ItemPrimitive,
    pub item_11: ItemPrimitive,
    pub mutated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventurerStateWithBag {
    pub adventurer_state: AdventurerState,
    pub bag: Bag,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSpec {
    pub tier: String,
    pub item_type: String,
    pub level: u64,
    pub specials1: u64,
    pub specials2: u64,
    pub specials3: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleDetails {
    pub id: u64,
    pub level: u64,
    pub damage_taken: u64,
    pub damage_location: u64,
    pub critical_hit: bool,
    pub adventurer_xp_reward: u64,
    pub item_xp_reward: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleEvent {
    pub adventurer_state: AdventurerState,
    pub obstacle_details: ObstacleDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    pub adventurer_state: AdventurerState,
    pub amount: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleeEvent {
    pub adventurer_state: AdventurerState,
    pub seed: u64,
    pub id: u64,
    pub beast_specs: CombatSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootWithPrice {
    pub item_id: u64,
    pub tier: String,
    pub item_type: String,
    pub slot: u64,
    pub price: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerReward {
    pub adventurer_id: String,
    pub rank: u64,
    pub amount: u64,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientReward {
    pub amount: u64,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGame {
    pub adventurer_state: AdventurerState,
    pub adventurer_meta: AdventurerMetadata,
    pub reveal_block: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradesAvailable {
    pub adventurer_state: AdventurerState,
    pub items: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredHealth {
    pub discovery: Discovery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredGold {
    pub discovery: Discovery,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredBeast {
    pub adventurer_state: AdventurerState,
    pub seed: u64,
    pub id: u64,
    pub beast_specs: CombatSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackedBeast {
    pub adventurer_state: AdventurerState,
    pub seed: u64,
    pub id: u64,
    pub beast_specs: CombatSpec,
    pub damage: u64,
    pub critical_hit: bool,
    pub location: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbushedByBeast {
    pub adventurer_state: AdventurerState,
    pub seed: u64,
    pub id: u64,
    pub beast_specs: CombatSpec,
    pub damage: u64,
    pub critical_hit: bool,
    pub location: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlayedBeast {
    pub adventurer_state: AdventurerState,
    pub seed: u64,
    pub id: u64,
    pub beast_specs: CombatSpec,
    pub damage_dealt: u64,
    pub critical_hit: bool,
    pub xp_earned_adventurer: u64,
    pub xp_earned_items: u64,
    pub gold_earned: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DodgedObstacle {
    pub obstacle_event: ObstacleEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitByObstacle {
    pub obstacle_event: ObstacleEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleeFailed {
    pub flee_event: FleeEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleeSucceeded {
    pub flee_event: FleeEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedItems {
    pub adventurer_state_with_bag: AdventurerStateWithBag,
    pub purchases: Vec<LootWithPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedPotions {
    pub adventurer_state: AdventurerState,
    pub quantity: u64,
    pub cost: u64,
    pub health: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventurerLeveledUp {
    pub adventurer_state: AdventurerState,
    pub previous_level: u64,
    pub new_level: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventurerUpgraded {
    pub adventurer_state_with_bag: AdventurerStateWithBag,
    pub strength_increase: u64,
    pub dexterity_increase: u64,
    pub vitality_increase: u64,
    pub intelligence_increase: u64,
    pub wisdom_increase: u64,
    pub charisma_increase: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleDeathPenalty {
    pub adventurer_state: AdventurerState,
    pub idle_blocks: u64,
    pub penalty_threshold: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventurerDied {
    pub adventurer_state: AdventurerState,
    pub killed_by_beast: u64,
    pub killed_by_obstacle: u64,
    pub caller_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDistribution {
    pub first_place: PlayerReward,
    pub second_place: PlayerReward,
    pub third_place: PlayerReward,
    pub client: ClientReward,
    pub dao: u64,
}
