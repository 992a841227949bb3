// programs/seasonal_farm/src/events.rs

use anchor_lang::prelude::*;

use crate::schedule::{Season, SEASON_COUNT};

/// Emitted when the farm is created
#[event]
pub struct FarmInitialized {
    pub authority: Pubkey,
    pub position_registry: Pubkey,
    pub base_mint: Pubkey,
    pub season_mints: [Pubkey; SEASON_COUNT],
    pub start_time: i64,
    pub reallocation_interval: i64,
    pub timestamp: i64,
}

/// Emitted when a seasonal token vault is created
#[event]
pub struct SeasonVaultCreated {
    pub season: Season,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub timestamp: i64,
}

/// Emitted whenever a catch-up applied at least one reallocation step
#[event]
pub struct AllocationsReallocated {
    pub steps_applied: u64,
    pub reallocation_count: u64,
    pub weights: [u64; SEASON_COUNT],
    pub timestamp: i64,
}

/// Emitted when a liquidity position enters the farm
#[event]
pub struct PositionDeposited {
    pub owner: Pubkey,
    pub position_mint: Pubkey,
    pub held_season: Season,
    pub liquidity: u128,
    pub next_withdrawal_time: i64,
    pub timestamp: i64,
}

/// Emitted when seasonal tokens are donated
#[event]
pub struct DonationReceived {
    pub donor: Pubkey,
    pub season: Season,
    /// Amount sent by the donor
    pub amount: u64,
    /// Amount that reached the vault after any transfer fee
    pub received: u64,
    /// Amount credited to each held pool
    pub credited: [u64; SEASON_COUNT],
    pub timestamp: i64,
}

/// Emitted when a depositor collects rewards
#[event]
pub struct Harvested {
    pub owner: Pubkey,
    pub position_mint: Pubkey,
    pub amounts: [u64; SEASON_COUNT],
    pub timestamp: i64,
}

/// Emitted when a position leaves the farm
#[event]
pub struct PositionWithdrawn {
    pub owner: Pubkey,
    pub position_mint: Pubkey,
    pub held_season: Season,
    pub liquidity: u128,
    /// Rewards that were owed but not harvested before leaving
    pub stranded_rewards: [u64; SEASON_COUNT],
    pub timestamp: i64,
}
