//! Streaming reduction of a decoded event log into per-adventurer scores,
//! and the push to the Moonstream leaderboard API.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::BufRead;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use starknet::core::types::Felt;
use tracing::{debug, warn};

use crate::error::Error;
use crate::events::*;
use crate::felt::felt_to_ascii;

pub(crate) const LOG_TARGET: &str = "survivor_core::leaderboard";

pub const LEADERBOARD_API_URL: &str = "https://engineapi.moonstream.to/leaderboard";

/// Synthetic score component tracking the strongest beast each adventurer
/// has slain. Reported in `points_data` but carries no score weight.
pub const MAX_LEVEL_OF_BEAST_SLAYED: &str = "MaxLevelOfBeastSlayed";

/// An adventurer identifier in canonical decimal form.
///
/// Ids arrive as decimal or `0x`-prefixed hex depending on which stage
/// serialized them; both parse to the same key. Unparseable input falls
/// back to zero, so a damaged id degrades rather than aborts a reduction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AdventurerId(BigUint);

impl AdventurerId {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16).map(Self),
            None => BigUint::parse_bytes(raw.as_bytes(), 10).map(Self),
        }
    }
}

impl fmt::Display for AdventurerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the emitted leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardScore {
    pub address: String,
    pub score: i64,
    pub points_data: BTreeMap<String, i64>,
}

/// Score weight per event kind.
pub fn score_weight(score_component: &str) -> i64 {
    match score_component {
        EVENT_DISCOVERED_HEALTH => 1,
        EVENT_DISCOVERED_GOLD => 1,
        EVENT_DISCOVERED_BEAST => 1,
        EVENT_DODGED_OBSTACLE => 9,
        EVENT_HIT_BY_OBSTACLE => 2,
        EVENT_ATTACKED_BEAST => 2,
        EVENT_AMBUSHED_BY_BEAST => 1,
        EVENT_SLAYED_BEAST => 10,
        EVENT_FLEE_FAILED => 2,
        EVENT_FLEE_SUCCEEDED => 1,
        EVENT_PURCHASED_ITEMS => 1,
        EVENT_PURCHASED_POTIONS => 1,
        EVENT_ADVENTURER_LEVELED_UP => 5,
        EVENT_ADVENTURER_UPGRADED => 2,
        EVENT_IDLE_DEATH_PENALTY => -100,
        _ => 0,
    }
}

/// Accumulator for the `total` leaderboard: per-kind subscores, display
/// names and the most recently observed owner per adventurer.
#[derive(Debug, Default)]
pub struct TotalLeaderboard {
    subscores: HashMap<&'static str, HashMap<String, i64>>,
    names: HashMap<String, String>,
    active_owners: HashMap<String, String>,
}

impl TotalLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one event line into the aggregate. Lines with unknown or
    /// unscored names are ignored; a payload that does not match its name
    /// is a stream error.
    pub fn apply(&mut self, partial: PartialEvent) -> Result<(), Error> {
        match partial.name.as_str() {
            EVENT_DISCOVERED_HEALTH => {
                let event: DiscoveredHealth = serde_json::from_value(partial.event)?;
                self.record(EVENT_DISCOVERED_HEALTH, &event.discovery.adventurer_state, 1);
            }
            EVENT_DISCOVERED_GOLD => {
                let event: DiscoveredGold = serde_json::from_value(partial.event)?;
                self.record(EVENT_DISCOVERED_GOLD, &event.discovery.adventurer_state, 1);
            }
            EVENT_DISCOVERED_BEAST => {
                let event: DiscoveredBeast = serde_json::from_value(partial.event)?;
                self.record(EVENT_DISCOVERED_BEAST, &event.adventurer_state, 1);
            }
            EVENT_DODGED_OBSTACLE => {
                let event: DodgedObstacle = serde_json::from_value(partial.event)?;
                self.record(EVENT_DODGED_OBSTACLE, &event.obstacle_event.adventurer_state, 1);
            }
            EVENT_HIT_BY_OBSTACLE => {
                let event: HitByObstacle = serde_json::from_value(partial.event)?;
                self.record(EVENT_HIT_BY_OBSTACLE, &event.obstacle_event.adventurer_state, 1);
            }
            EVENT_ATTACKED_BEAST => {
                let event: AttackedBeast = serde_json::from_value(partial.event)?;
                self.record(EVENT_ATTACKED_BEAST, &event.adventurer_state, 1);
            }
            EVENT_AMBUSHED_BY_BEAST => {
                let event: AmbushedByBeast = serde_json::from_value(partial.event)?;
                self.record(EVENT_AMBUSHED_BY_BEAST, &event.adventurer_state, 1);
            }
            EVENT_SLAYED_BEAST => {
                let event: SlayedBeast = serde_json::from_value(partial.event)?;
                let adventurer = self.record(EVENT_SLAYED_BEAST, &event.adventurer_state, 1);
                let max_level = self
                    .subscores
                    .entry(MAX_LEVEL_OF_BEAST_SLAYED)
                    .or_default()
                    .entry(adventurer)
                    .or_insert(0);
                *max_level = (*max_level).max(event.beast_specs.level as i64);
            }
            EVENT_FLEE_FAILED => {
                let event: FleeFailed = serde_json::from_value(partial.event)?;
                self.record(EVENT_FLEE_FAILED, &event.flee_event.adventurer_state, 1);
            }
            EVENT_FLEE_SUCCEEDED => {
                let event: FleeSucceeded = serde_json::from_value(partial.event)?;
                self.record(EVENT_FLEE_SUCCEEDED, &event.flee_event.adventurer_state, 1);
            }
            EVENT_PURCHASED_ITEMS => {
                let event: PurchasedItems = serde_json::from_value(partial.event)?;
                self.record(
                    EVENT_PURCHASED_ITEMS,
                    &event.adventurer_state_with_bag.adventurer_state,
                    event.purchases.len() as i64,
                );
            }
            EVENT_PURCHASED_POTIONS => {
                let event: PurchasedPotions = serde_json::from_value(partial.event)?;
                self.record(
                    EVENT_PURCHASED_POTIONS,
                    &event.adventurer_state,
                    event.quantity as i64,
                );
            }
            EVENT_ADVENTURER_LEVELED_UP => {
                let event: AdventurerLeveledUp = serde_json::from_value(partial.event)?;
                self.record(
                    EVENT_ADVENTURER_LEVELED_UP,
                    &event.adventurer_state,
                    event.new_level as i64 - event.previous_level as i64,
                );
            }
            EVENT_ADVENTURER_UPGRADED => {
                let event: AdventurerUpgraded = serde_json::from_value(partial.event)?;
                let increase = event.strength_increase
                    + event.dexterity_increase
                    + event.vitality_increase
                    + event.intelligence_increase
                    + event.wisdom_increase
                    + event.charisma_increase;
                self.record(
                    EVENT_ADVENTURER_UPGRADED,
                    &event.adventurer_state_with_bag.adventurer_state,
                    increase as i64,
                );
            }
            EVENT_IDLE_DEATH_PENALTY => {
                let event: IdleDeathPenalty = serde_json::from_value(partial.event)?;
                self.record(EVENT_IDLE_DEATH_PENALTY, &event.adventurer_state, 1);
            }
            EVENT_ADVENTURER_DIED => {
                let event: AdventurerDied = serde_json::from_value(partial.event)?;
                self.record(EVENT_ADVENTURER_DIED, &event.adventurer_state, 1);
            }
            EVENT_START_GAME => {
                let event: StartGame = serde_json::from_value(partial.event)?;
                let adventurer = canonical_id(&event.adventurer_state.adventurer_id);
                let name = ascii_from_decimal(&event.adventurer_meta.name);
                self.names.insert(adventurer.clone(), format!("{name} - {adventurer}"));
            }
            _ => {}
        }
        Ok(())
    }

    /// The most recently observed owner of an adventurer. Tracked for
    /// owner-keyed leaderboards; the `total` rows do not include it.
    pub fn active_owner(&self, adventurer_id: &str) -> Option<&str> {
        self.active_owners.get(adventurer_id).map(String::as_str)
    }

    /// Collapses the aggregate into leaderboard rows. Row order is
    /// unspecified; ranking is a downstream concern.
    pub fn into_scores(self) -> Vec<LeaderboardScore> {
        let mut scores: HashMap<String, i64> = HashMap::new();
        let mut points_data: HashMap<String, BTreeMap<String, i64>> = HashMap::new();

        for (score_component, data) in &self.subscores {
            let clean_component = score_component.trim_start_matches("game::Game::");
            for (adventurer, subscore) in data {
                *scores.entry(adventurer.clone()).or_insert(0) +=
                    score_weight(score_component) * subscore;
                points_data
                    .entry(adventurer.clone())
                    .or_default()
                    .insert(clean_component.to_string(), *subscore);
            }
        }

        scores
            .into_iter()
            .map(|(adventurer, score)| LeaderboardScore {
                address: self.names.get(&adventurer).cloned().unwrap_or_default(),
                score,
                points_data: points_data.remove(&adventurer).unwrap_or_default(),
            })
            .collect()
    }

    fn record(
        &mut self,
        score_component: &'static str,
        state: &AdventurerState,
        amount: i64,
    ) -> String {
        let adventurer = canonical_id(&state.adventurer_id);
        self.active_owners.insert(adventurer.clone(), state.owner.clone());
        *self
            .subscores
            .entry(score_component)
            .or_default()
            .entry(adventurer.clone())
            .or_insert(0) += amount;
        adventurer
    }
}

fn canonical_id(raw: &str) -> String {
    AdventurerId::parse(raw).unwrap_or_default().to_string()
}

/// Decodes the decimal-rendered name felt into the adventurer's display
/// name. An unparseable field leaves the name empty.
fn ascii_from_decimal(raw: &str) -> String {
    Felt::from_dec_str(raw).map(|felt| felt_to_ascii(&felt)).unwrap_or_default()
}

/// Reduces a line-delimited decoded event stream into leaderboard rows.
///
/// A line that is not valid JSON fails the whole reduction: silently
/// skipping it would undercount scores.
pub fn total_leaderboard<R: BufRead>(reader: R) -> Result<Vec<LeaderboardScore>, Error> {
    let mut aggregate = TotalLeaderboard::new();
    for line in reader.lines() {
        let partial: PartialEvent = serde_json::from_str(&line?)?;
        aggregate.apply(partial)?;
    }
    Ok(aggregate.into_scores())
}

/// Uploads a leaderboard to the scoreboard API.
///
/// A non-2xx response is logged rather than raised, so a flaky scoreboard
/// does not kill a long crawl-and-push pipeline; transport failures still
/// surface.
pub async fn push(
    leaderboard_id: &str,
    access_token: &str,
    leaderboard: &[LeaderboardScore],
    overwrite: bool,
) -> Result<(), Error> {
    let url = format!("{LEADERBOARD_API_URL}/{leaderboard_id}/scores");
    let overwrite = if overwrite { "true" } else { "false" };

    let client = reqwest::Client::new();
    let response = client
        .put(url)
        .query(&[("normalize_addresses", "false"), ("overwrite", overwrite)])
        .header("Content-Type", "application/json")
        .bearer_auth(access_token)
        .json(leaderboard)
        .send()
        .await?;

    if response.status().is_success() {
        debug!(target: LOG_TARGET, status = %response.status(), "Pushed leaderboard.");
    } else {
        warn!(
            target: LOG_TARGET,
            status = %response.status(),
            "Leaderboard push was not accepted."
        );
    }
    Ok(())
}
