//! Positional decoding of event payloads.
//!
//! Every record has a fixed slot layout over the flat felt vector; the
//! only variable-width payloads are `UpgradesAvailable` (trailing item
//! list) and `PurchasedItems` (count-prefixed purchase list). Slices are
//! validated for exact width before any slot is read.

use starknet::core::types::Felt;

use crate::error::ParseError;
use crate::felt::{felt_to_decimal, felt_to_u64};

use super::types::*;

pub(crate) const STATS_WIDTH: usize = 7;
pub(crate) const ADVENTURER_WIDTH: usize = 39;
pub(crate) const ADVENTURER_STATE_WIDTH: usize = 41;
pub(crate) const ADVENTURER_METADATA_WIDTH: usize = 9;
pub(crate) const COMBAT_SPEC_WIDTH: usize = 6;
pub(crate) const BAG_WIDTH: usize = 34;
pub(crate) const STATE_WITH_BAG_WIDTH: usize = ADVENTURER_STATE_WIDTH + BAG_WIDTH;
pub(crate) const OBSTACLE_DETAILS_WIDTH: usize = 7;
pub(crate) const LOOT_WITH_PRICE_WIDTH: usize = 5;
pub(crate) const PLAYER_REWARD_WIDTH: usize = 4;
pub(crate) const CLIENT_REWARD_WIDTH: usize = 2;

pub(crate) const START_GAME_WIDTH: usize =
    ADVENTURER_STATE_WIDTH + ADVENTURER_METADATA_WIDTH + 1;
/// The upgrade payload widens the adventurer state to 63 slots; the
/// canonical 41-slot state sits at its head and the tail is the item list.
pub(crate) const UPGRADES_AVAILABLE_MIN_WIDTH: usize = 63;
pub(crate) const DISCOVERY_WIDTH: usize = ADVENTURER_STATE_WIDTH + 1;
pub(crate) const DISCOVERED_BEAST_WIDTH: usize = ADVENTURER_STATE_WIDTH + 2 + COMBAT_SPEC_WIDTH;
pub(crate) const BEAST_BATTLE_WIDTH: usize = DISCOVERED_BEAST_WIDTH + 3;
pub(crate) const SLAYED_BEAST_WIDTH: usize = DISCOVERED_BEAST_WIDTH + 5;
pub(crate) const OBSTACLE_EVENT_WIDTH: usize = ADVENTURER_STATE_WIDTH + OBSTACLE_DETAILS_WIDTH;
pub(crate) const FLEE_EVENT_WIDTH: usize = ADVENTURER_STATE_WIDTH + 2 + COMBAT_SPEC_WIDTH;
pub(crate) const PURCHASED_ITEMS_BASE_WIDTH: usize = STATE_WITH_BAG_WIDTH + 1;
pub(crate) const PURCHASED_POTIONS_WIDTH: usize = ADVENTURER_STATE_WIDTH + 3;
pub(crate) const ADVENTURER_LEVELED_UP_WIDTH: usize = ADVENTURER_STATE_WIDTH + 2;
pub(crate) const ADVENTURER_UPGRADED_WIDTH: usize = STATE_WITH_BAG_WIDTH + 6;
pub(crate) const IDLE_DEATH_PENALTY_WIDTH: usize = ADVENTURER_STATE_WIDTH + 2;
pub(crate) const ADVENTURER_DIED_WIDTH: usize = ADVENTURER_STATE_WIDTH + 3;
pub(crate) const REWARD_DISTRIBUTION_WIDTH: usize =
    3 * PLAYER_REWARD_WIDTH + CLIENT_REWARD_WIDTH + 1;

fn tier_symbol(value: u64) -> String {
    match value {
        0 => "None",
        1 => "T1",
        2 => "T2",
        3 => "T3",
        4 => "T4",
        5 => "T5",
        _ => "UNKNOWN",
    }
    .to_string()
}

fn item_type_symbol(value: u64) -> String {
    match value {
        0 => "None",
        1 => "Magic_or_Cloth",
        2 => "Blade_or_Hide",
        3 => "Bludgeon_or_Metal",
        4 => "Necklace",
        5 => "Ring",
        _ => "UNKNOWN",
    }
    .to_string()
}

pub fn parse_stats(parameters: &[Felt]) -> Result<Stats, ParseError> {
    if parameters.len() != STATS_WIDTH {
        return Err(ParseError::Stats);
    }
    Ok(Stats {
        strength: felt_to_u64(&parameters[0]),
        dexterity: felt_to_u64(&parameters[1]),
        vitality: felt_to_u64(&parameters[2]),
        intelligence: felt_to_u64(&parameters[3]),
        wisdom: felt_to_u64(&parameters[4]),
        charisma: felt_to_u64(&parameters[5]),
        luck: felt_to_u64(&parameters[6]),
    })
}

/// Reads one equipment slot. Callers hand in exactly three slots.
fn parse_item(parameters: &[Felt]) -> ItemPrimitive {
    ItemPrimitive {
        id: felt_to_u64(&parameters[0]),
        xp: felt_to_u64(&parameters[1]),
        metadata: felt_to_u64(&parameters[2]),
    }
}

pub fn parse_adventurer(parameters: &[Felt]) -> Result<Adventurer, ParseError> {
    if parameters.len() != ADVENTURER_WIDTH {
        return Err(ParseError::Adventurer);
    }
    Ok(Adventurer {
        last_action_block: felt_to_u64(&parameters[0]),
        health: felt_to_u64(&parameters[1]),
        xp: felt_to_u64(&parameters[2]),
        stats: parse_stats(&parameters[3..10])?,
        gold: felt_to_u64(&parameters[10]),
        weapon: parse_item(&parameters[11..14]),
        chest: parse_item(&parameters[14..17]),
        head: parse_item(&parameters[17..20]),
        waist: parse_item(&parameters[20..23]),
        foot: parse_item(&parameters[23..26]),
        hand: parse_item(&parameters[26..29]),
        neck: parse_item(&parameters[29..32]),
        ring: parse_item(&parameters[32..35]),
        beast_health: felt_to_u64(&parameters[35]),
        stat_points_available: felt_to_u64(&parameters[36]),
        actions_per_block: felt_to_u64(&parameters[37]),
        mutated: felt_to_u64(&parameters[38]) != 0,
    })
}

pub fn parse_adventurer_state(parameters: &[Felt]) -> Result<AdventurerState, ParseError> {
    if parameters.len() != ADVENTURER_STATE_WIDTH {
        return Err(ParseError::AdventurerState);
    }
    Ok(AdventurerState {
        owner: felt_to_decimal(&parameters[0]),
        adventurer_id: felt_to_decimal(&parameters[1]),
        adventurer: parse_adventurer(&parameters[2..41])?,
    })
}

pub fn parse_adventurer_metadata(parameters: &[Felt]) -> Result<AdventurerMetadata, ParseError> {
    if parameters.len() != ADVENTURER_METADATA_WIDTH {
        return Err(ParseError::AdventurerMetadata);
    }
    Ok(AdventurerMetadata {
        start_block: felt_to_u64(&parameters[0]),
        starting_stats: parse_stats(&parameters[1..8])?,
        name: felt_to_decimal(&parameters[8]),
    })
}

pub fn parse_combat_spec(parameters: &[Felt]) -> Result<CombatSpec, ParseError> {
    if parameters.len() != COMBAT_SPEC_WIDTH {
        return Err(ParseError::CombatSpec);
    }
    Ok(CombatSpec {
        tier: tier_symbol(felt_to_u64(&parameters[0])),
        item_type: item_type_symbol(felt_to_u64(&parameters[1])),
        level: felt_to_u64(&parameters[2]),
        specials1: felt_to_u64(&parameters[3]),
        specials2: felt_to_u64(&parameters[4]),
        specials3: felt_to_u64(&parameters[5]),
    })
}

pub fn parse_bag(parameters: &[Felt]) -> Result<Bag, ParseError> {
    if parameters.len() != BAG_WIDTH {
        return Err(ParseError::Bag);
    }
    Ok(Bag {
        item_1: parse_item(&parameters[0..3]),
        item_2: parse_item(&parameters[3..6]),
        item_3: parse_item(&parameters[6..9]),
        item_4: parse_item(&parameters[9..12]),
        item_5: parse_item(&parameters[12..15]),
        item_6: parse_item(&parameters[15..18]),
        item_7: parse_item(&parameters[18..21]),
        item_8: parse_item(&parameters[21..24]),
        item_9: parse_item(&parameters[24..27]),
        item_10: parse_item(&parameters[27..30]),
        item_11: parse_item(&parameters[30..33]),
        mutated: felt_to_u64(&parameters[33]) != 0,
    })
}

pub fn parse_adventurer_state_with_bag(
    parameters: &[Felt],
) -> Result<AdventurerStateWithBag, ParseError> {
    if parameters.len() != STATE_WITH_BAG_WIDTH {
        return Err(ParseError::AdventurerState);
    }
    Ok(AdventurerStateWithBag {
        adventurer_state: parse_adventurer_state(&parameters[..ADVENTURER_STATE_WIDTH])?,
        bag: parse_bag(&parameters[ADVENTURER_STATE_WIDTH..])?,
    })
}

fn parse_obstacle_details(parameters: &[Felt]) -> ObstacleDetails {
    ObstacleDetails {
        id: felt_to_u64(&parameters[0]),
        level: felt_to_u64(&parameters[1]),
        damage_taken: felt_to_u64(&parameters[2]),
        damage_location: felt_to_u64(&parameters[3]),
        critical_hit: felt_to_u64(&parameters[4]) != 0,
        adventurer_xp_reward: felt_to_u64(&parameters[5]),
        item_xp_reward: felt_to_u64(&parameters[6]),
    }
}

fn parse_obstacle_event(parameters: &[Felt]) -> Result<ObstacleEvent, ParseError> {
    if parameters.len() != OBSTACLE_EVENT_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(ObstacleEvent {
        adventurer_state: parse_adventurer_state(&parameters[..ADVENTURER_STATE_WIDTH])?,
        obstacle_details: parse_obstacle_details(&parameters[ADVENTURER_STATE_WIDTH..]),
    })
}

fn parse_flee_event(parameters: &[Felt]) -> Result<FleeEvent, ParseError> {
    if parameters.len() != FLEE_EVENT_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(FleeEvent {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        seed: felt_to_u64(&parameters[41]),
        id: felt_to_u64(&parameters[42]),
        beast_specs: parse_combat_spec(&parameters[43..49])?,
    })
}

fn parse_discovery(parameters: &[Felt]) -> Result<Discovery, ParseError> {
    if parameters.len() != DISCOVERY_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(Discovery {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        amount: felt_to_u64(&parameters[41]),
    })
}

fn parse_player_reward(parameters: &[Felt]) -> PlayerReward {
    PlayerReward {
        adventurer_id: felt_to_decimal(&parameters[0]),
        rank: felt_to_u64(&parameters[1]),
        amount: felt_to_u64(&parameters[2]),
        address: felt_to_decimal(&parameters[3]),
    }
}

pub fn parse_start_game(parameters: &[Felt]) -> Result<StartGame, ParseError> {
    if parameters.len() != START_GAME_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(StartGame {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        adventurer_meta: parse_adventurer_metadata(&parameters[41..50])?,
        reveal_block: felt_to_u64(&parameters[50]),
    })
}

pub fn parse_upgrades_available(parameters: &[Felt]) -> Result<UpgradesAvailable, ParseError> {
    if parameters.len() < UPGRADES_AVAILABLE_MIN_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(UpgradesAvailable {
        adventurer_state: parse_adventurer_state(&parameters[..ADVENTURER_STATE_WIDTH])?,
        items: parameters[UPGRADES_AVAILABLE_MIN_WIDTH..].iter().map(|f| felt_to_u64(f)).collect(),
    })
}

pub fn parse_discovered_health(parameters: &[Felt]) -> Result<DiscoveredHealth, ParseError> {
    Ok(DiscoveredHealth { discovery: parse_discovery(parameters)? })
}

pub fn parse_discovered_gold(parameters: &[Felt]) -> Result<DiscoveredGold, ParseError> {
    Ok(DiscoveredGold { discovery: parse_discovery(parameters)? })
}

pub fn parse_discovered_beast(parameters: &[Felt]) -> Result<DiscoveredBeast, ParseError> {
    if parameters.len() != DISCOVERED_BEAST_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(DiscoveredBeast {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        seed: felt_to_u64(&parameters[41]),
        id: felt_to_u64(&parameters[42]),
        beast_specs: parse_combat_spec(&parameters[43..49])?,
    })
}

pub fn parse_attacked_beast(parameters: &[Felt]) -> Result<AttackedBeast, ParseError> {
    if parameters.len() != BEAST_BATTLE_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(AttackedBeast {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        seed: felt_to_u64(&parameters[41]),
        id: felt_to_u64(&parameters[42]),
        beast_specs: parse_combat_spec(&parameters[43..49])?,
        damage: felt_to_u64(&parameters[49]),
        critical_hit: felt_to_u64(&parameters[50]) != 0,
        location: felt_to_u64(&parameters[51]),
    })
}

pub fn parse_ambushed_by_beast(parameters: &[Felt]) -> Result<AmbushedByBeast, ParseError> {
    if parameters.len() != BEAST_BATTLE_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(AmbushedByBeast {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        seed: felt_to_u64(&parameters[41]),
        id: felt_to_u64(&parameters[42]),
        beast_specs: parse_combat_spec(&parameters[43..49])?,
        damage: felt_to_u64(&parameters[49]),
        critical_hit: felt_to_u64(&parameters[50]) != 0,
        location: felt_to_u64(&parameters[51]),
    })
}

pub fn parse_slayed_beast(parameters: &[Felt]) -> Result<SlayedBeast, ParseError> {
    if parameters.len() != SLAYED_BEAST_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(SlayedBeast {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        seed: felt_to_u64(&parameters[41]),
        id: felt_to_u64(&parameters[42]),
        beast_specs: parse_combat_spec(&parameters[43..49])?,
        damage_dealt: felt_to_u64(&parameters[49]),
        critical_hit: felt_to_u64(&parameters[50]) != 0,
        xp_earned_adventurer: felt_to_u64(&parameters[51]),
        xp_earned_items: felt_to_u64(&parameters[52]),
        gold_earned: felt_to_u64(&parameters[53]),
    })
}

pub fn parse_dodged_obstacle(parameters: &[Felt]) -> Result<DodgedObstacle, ParseError> {
    Ok(DodgedObstacle { obstacle_event: parse_obstacle_event(parameters)? })
}

pub fn parse_hit_by_obstacle(parameters: &[Felt]) -> Result<HitByObstacle, ParseError> {
    Ok(HitByObstacle { obstacle_event: parse_obstacle_event(parameters)? })
}

pub fn parse_flee_failed(parameters: &[Felt]) -> Result<FleeFailed, ParseError> {
    Ok(FleeFailed { flee_event: parse_flee_event(parameters)? })
}

pub fn parse_flee_succeeded(parameters: &[Felt]) -> Result<FleeSucceeded, ParseError> {
    Ok(FleeSucceeded { flee_event: parse_flee_event(parameters)? })
}

pub fn parse_purchased_items(parameters: &[Felt]) -> Result<PurchasedItems, ParseError> {
    if parameters.len() < PURCHASED_ITEMS_BASE_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    let count = felt_to_u64(&parameters[STATE_WITH_BAG_WIDTH]) as usize;
    let expected = count
        .checked_mul(LOOT_WITH_PRICE_WIDTH)
        .and_then(|tail| tail.checked_add(PURCHASED_ITEMS_BASE_WIDTH));
    if expected != Some(parameters.len()) {
        return Err(ParseError::IncorrectParameters);
    }

    let purchases = parameters[PURCHASED_ITEMS_BASE_WIDTH..]
        .chunks_exact(LOOT_WITH_PRICE_WIDTH)
        .map(|chunk| LootWithPrice {
            item_id: felt_to_u64(&chunk[0]),
            tier: tier_symbol(felt_to_u64(&chunk[1])),
            item_type: item_type_symbol(felt_to_u64(&chunk[2])),
            slot: felt_to_u64(&chunk[3]),
            price: felt_to_u64(&chunk[4]),
        })
        .collect();

    Ok(PurchasedItems {
        adventurer_state_with_bag: parse_adventurer_state_with_bag(
            &parameters[..STATE_WITH_BAG_WIDTH],
        )?,
        purchases,
    })
}

pub fn parse_purchased_potions(parameters: &[Felt]) -> Result<PurchasedPotions, ParseError> {
    if parameters.len() != PURCHASED_POTIONS_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(PurchasedPotions {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        quantity: felt_to_u64(&parameters[41]),
        cost: felt_to_u64(&parameters[42]),
        health: felt_to_u64(&parameters[43]),
    })
}

pub fn parse_adventurer_leveled_up(
    parameters: &[Felt],
) -> Result<AdventurerLeveledUp, ParseError> {
    if parameters.len() != ADVENTURER_LEVELED_UP_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(AdventurerLeveledUp {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        previous_level: felt_to_u64(&parameters[41]),
        new_level: felt_to_u64(&parameters[42]),
    })
}

pub fn parse_adventurer_upgraded(parameters: &[Felt]) -> Result<AdventurerUpgraded, ParseError> {
    if parameters.len() != ADVENTURER_UPGRADED_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(AdventurerUpgraded {
        adventurer_state_with_bag: parse_adventurer_state_with_bag(
            &parameters[..STATE_WITH_BAG_WIDTH],
        )?,
        strength_increase: felt_to_u64(&parameters[75]),
        dexterity_increase: felt_to_u64(&parameters[76]),
        vitality_increase: felt_to_u64(&parameters[77]),
        intelligence_increase: felt_to_u64(&parameters[78]),
        wisdom_increase: felt_to_u64(&parameters[79]),
        charisma_increase: felt_to_u64(&parameters[80]),
    })
}

pub fn parse_idle_death_penalty(parameters: &[Felt]) -> Result<IdleDeathPenalty, ParseError> {
    if parameters.len() != IDLE_DEATH_PENALTY_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(IdleDeathPenalty {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        idle_blocks: felt_to_u64(&parameters[41]),
        penalty_threshold: felt_to_u64(&parameters[42]),
    })
}

pub fn parse_adventurer_died(parameters: &[Felt]) -> Result<AdventurerDied, ParseError> {
    if parameters.len() != ADVENTURER_DIED_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(AdventurerDied {
        adventurer_state: parse_adventurer_state(&parameters[..41])?,
        killed_by_beast: felt_to_u64(&parameters[41]),
        killed_by_obstacle: felt_to_u64(&parameters[42]),
        caller_address: felt_to_decimal(&parameters[43]),
    })
}

pub fn parse_reward_distribution(parameters: &[Felt]) -> Result<RewardDistribution, ParseError> {
    if parameters.len() != REWARD_DISTRIBUTION_WIDTH {
        return Err(ParseError::IncorrectParameters);
    }
    Ok(RewardDistribution {
        first_place: parse_player_reward(&parameters[0..4]),
        second_place: parse_player_reward(&parameters[4..8]),
        third_place: parse_player_reward(&parameters[8..12]),
        client: ClientReward {
            amount: felt_to_u64(&parameters[12]),
            address: felt_to_decimal(&parameters[13]),
        },
        dao: felt_to_u64(&parameters[14]),
    })
}
