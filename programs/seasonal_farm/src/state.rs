// programs/seasonal_farm/src/state.rs

use anchor_lang::prelude::*;

use crate::errors::FarmError;
use crate::schedule::{
    reallocations_due, AllocationState, Season, WithdrawalWindow, SEASON_COUNT, SECONDS_PER_DAY,
};
use crate::yield_ledger::YieldLedger;

/// Global farm state: configuration plus every shared accumulator.
/// Also the signing authority over all vaults.
/// PDA seeds: ["farm_config"]
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct FarmConfig {
    /// Authority allowed to create the season vaults
    pub authority: Pubkey,

    /// Program that owns the external position accounts
    pub position_registry: Pubkey,

    /// Base trading asset every deposited pair must contain
    pub base_mint: Pubkey,

    /// Seasonal token mints, indexed by season
    pub season_mints: [Pubkey; SEASON_COUNT],

    /// Vaults holding donated seasonal tokens, indexed by season
    pub season_vaults: [Pubkey; SEASON_COUNT],

    /// Fee tier a deposited position must use
    pub required_fee_tier: u32,

    /// Anchor for the reallocation calendar
    pub start_time: i64,

    /// Seconds between reallocations
    pub reallocation_interval: i64,

    /// Closed stretch of every withdrawal cycle
    pub withdrawal_unavailable_days: i64,

    /// Open stretch of every withdrawal cycle
    pub withdrawal_available_days: i64,

    /// Season weights as of the last catch-up
    pub allocation: AllocationState,

    /// Cumulative yield per unit of liquidity
    pub yield_ledger: YieldLedger,

    /// Total deposited liquidity per held season
    pub pool_liquidity: [u128; SEASON_COUNT],

    /// Donated tokens not yet harvested, per season
    pub reward_reserves: [u64; SEASON_COUNT],

    /// Lifetime donations per season, saturating
    pub total_donated: [u128; SEASON_COUNT],

    /// Lifetime harvests per season, saturating
    pub total_harvested: [u128; SEASON_COUNT],

    /// Positions currently deposited
    pub open_positions: u64,

    /// Bump seed
    pub bump: u8,
}

/// Immutable parameters a farm is created with
#[derive(Clone, Copy, Debug)]
pub struct FarmSettings {
    pub authority: Pubkey,
    pub position_registry: Pubkey,
    pub base_mint: Pubkey,
    pub season_mints: [Pubkey; SEASON_COUNT],
    pub required_fee_tier: u32,
    pub start_time: i64,
    pub reallocation_interval: i64,
    pub withdrawal_unavailable_days: i64,
    pub withdrawal_available_days: i64,
}

impl FarmConfig {
    pub const SEED_PREFIX: &'static [u8] = b"farm_config";
    pub const SEASON_VAULT_SEED: &'static [u8] = b"season_vault";

    pub const DEFAULT_REALLOCATION_INTERVAL: i64 = 365 * SECONDS_PER_DAY * 3 / 4; // 273.75 days
    pub const DEFAULT_WITHDRAWAL_UNAVAILABLE_DAYS: i64 = 30;
    pub const DEFAULT_WITHDRAWAL_AVAILABLE_DAYS: i64 = 10;
    pub const DEFAULT_FEE_TIER: u32 = 100; // 0.01%

    /// Smallest liquidity a position may bring. Bounds the per-unit yield
    /// increment of one donation to u64::MAX * YIELD_SCALE / 10^6 (~1.8e31).
    pub const MIN_POSITION_LIQUIDITY: u128 = 1_000_000;

    /// Build a fresh farm, rejecting schedules or mint sets that cannot work
    pub fn new(settings: FarmSettings) -> Result<Self> {
        require!(
            settings.reallocation_interval > 0
                && settings.withdrawal_unavailable_days >= 0
                && settings.withdrawal_available_days > 0,
            FarmError::InvalidSchedule
        );

        for (i, mint) in settings.season_mints.iter().enumerate() {
            require!(
                *mint != settings.base_mint && !settings.season_mints[..i].contains(mint),
                FarmError::InvalidSeasonMints
            );
        }

        Ok(Self {
            authority: settings.authority,
            position_registry: settings.position_registry,
            base_mint: settings.base_mint,
            season_mints: settings.season_mints,
            season_vaults: [Pubkey::default(); SEASON_COUNT],
            required_fee_tier: settings.required_fee_tier,
            start_time: settings.start_time,
            reallocation_interval: settings.reallocation_interval,
            withdrawal_unavailable_days: settings.withdrawal_unavailable_days,
            withdrawal_available_days: settings.withdrawal_available_days,
            allocation: AllocationState::default(),
            yield_ledger: YieldLedger::default(),
            pool_liquidity: [0; SEASON_COUNT],
            reward_reserves: [0; SEASON_COUNT],
            total_donated: [0; SEASON_COUNT],
            total_harvested: [0; SEASON_COUNT],
            open_positions: 0,
            bump: 0,
        })
    }

    pub fn season_of_mint(&self, mint: &Pubkey) -> Option<Season> {
        self.season_mints
            .iter()
            .position(|m| m == mint)
            .and_then(Season::from_index)
    }

    /// Season held by a base/seasonal pair, in either order
    pub fn held_season_for_pair(&self, token_a: &Pubkey, token_b: &Pubkey) -> Result<Season> {
        let held = match (*token_a == self.base_mint, *token_b == self.base_mint) {
            (true, false) => self.season_of_mint(token_b),
            (false, true) => self.season_of_mint(token_a),
            _ => None,
        };
        held.ok_or_else(|| error!(FarmError::InvalidTradingPair))
    }

    pub fn withdrawal_window(&self) -> WithdrawalWindow {
        WithdrawalWindow::from_days(
            self.withdrawal_unavailable_days,
            self.withdrawal_available_days,
        )
    }

    pub fn reallocations_due(&self, now: i64) -> u64 {
        reallocations_due(self.start_time, self.reallocation_interval, now)
    }

    /// Weights as they stand at `now`, without writing anything
    pub fn allocations_at(&self, now: i64) -> AllocationState {
        let mut allocation = self.allocation;
        allocation.catch_up_to(self.reallocations_due(now));
        allocation
    }

    /// Persist any reallocations that fell due since the last call.
    /// Returns the number of steps applied.
    pub fn catch_up_allocations(&mut self, now: i64) -> u64 {
        let due = self.reallocations_due(now);
        self.allocation.catch_up_to(due)
    }

    pub fn effective_total_allocation_size(&self, balances: &[u128; SEASON_COUNT]) -> u64 {
        self.allocation.effective_total_allocation_size(balances)
    }
}

/// One deposited liquidity position
/// PDA seeds: ["farm_position", position_mint]
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct FarmPosition {
    /// Depositor entitled to harvest and withdraw
    pub owner: Pubkey,

    /// NFT mint of the external position
    pub position_mint: Pubkey,

    /// Registry account the position was validated against
    pub registry_position: Pubkey,

    /// Seasonal token paired with the base asset
    pub held_season: Season,

    /// Liquidity at deposit time, never changes afterwards
    pub liquidity: u128,

    /// Deposit timestamp, anchors the withdrawal windows
    pub deposited_at: i64,

    /// yield_ledger.cumulative[donated][held_season] at the last settlement
    pub yield_snapshots: [u128; SEASON_COUNT],

    /// Settled but not yet transferred rewards, per donated season
    pub unpaid: [u64; SEASON_COUNT],

    /// Bump seed
    pub bump: u8,
}

impl FarmPosition {
    pub const SEED_PREFIX: &'static [u8] = b"farm_position";
    pub const VAULT_SEED: &'static [u8] = b"position_vault";

    /// Deserialize a position from an arbitrary account, mapping anything
    /// that is not a live position of this program to `InvalidPosition`
    pub fn load_checked(account: &AccountInfo) -> Result<Self> {
        if account.owner != &crate::ID || account.data_is_empty() {
            return err!(FarmError::InvalidPosition);
        }
        let data = account.try_borrow_data()?;
        Self::try_deserialize(&mut &data[..]).map_err(|_| error!(FarmError::InvalidPosition))
    }
}

/// Ordered set of the positions a depositor has in the farm
/// PDA seeds: ["depositor", owner]
#[account]
#[derive(InitSpace)]
pub struct DepositorAccount {
    /// Depositor's wallet
    pub owner: Pubkey,

    /// Position mints in enumeration order
    #[max_len(32)]
    pub positions: Vec<Pubkey>,

    /// Bump seed
    pub bump: u8,
}

impl DepositorAccount {
    pub const SEED_PREFIX: &'static [u8] = b"depositor";
    pub const MAX_POSITIONS: usize = 32;

    pub fn balance_of(&self) -> u64 {
        self.positions.len() as u64
    }

    pub fn position_by_index(&self, index: usize) -> Option<Pubkey> {
        self.positions.get(index).copied()
    }

    pub fn insert(&mut self, position_mint: Pubkey) -> Result<()> {
        require!(
            self.positions.len() < Self::MAX_POSITIONS,
            FarmError::DepositorIndexFull
        );
        self.positions.push(position_mint);
        Ok(())
    }

    /// Remove in O(1) by moving the last entry into the freed slot
    pub fn remove(&mut self, position_mint: &Pubkey) -> Result<()> {
        let index = self
            .positions
            .iter()
            .position(|p| p == position_mint)
            .ok_or(FarmError::InvalidPosition)?;
        self.positions.swap_remove(index);
        Ok(())
    }
}

// ==================== UNIT TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_settings() -> FarmSettings {
        FarmSettings {
            authority: Pubkey::new_unique(),
            position_registry: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            season_mints: [
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
            ],
            required_fee_tier: FarmConfig::DEFAULT_FEE_TIER,
            start_time: 1_641_340_800,
            reallocation_interval: FarmConfig::DEFAULT_REALLOCATION_INTERVAL,
            withdrawal_unavailable_days: FarmConfig::DEFAULT_WITHDRAWAL_UNAVAILABLE_DAYS,
            withdrawal_available_days: FarmConfig::DEFAULT_WITHDRAWAL_AVAILABLE_DAYS,
        }
    }

    #[test]
    fn test_new_farm_starts_clean() {
        let farm = FarmConfig::new(create_test_settings()).unwrap();
        assert_eq!(farm.allocation.weights, [5, 6, 7, 8]);
        assert_eq!(farm.allocation.reallocation_count, 0);
        assert_eq!(farm.pool_liquidity, [0; SEASON_COUNT]);
        assert_eq!(farm.yield_ledger, YieldLedger::default());
        assert_eq!(farm.open_positions, 0);
    }

    #[test]
    fn test_new_farm_rejects_bad_schedule() {
        let mut settings = create_test_settings();
        settings.reallocation_interval = 0;
        assert!(FarmConfig::new(settings).is_err());

        let mut settings = create_test_settings();
        settings.withdrawal_available_days = 0;
        assert!(FarmConfig::new(settings).is_err());

        let mut settings = create_test_settings();
        settings.withdrawal_unavailable_days = -1;
        assert!(FarmConfig::new(settings).is_err());
    }

    #[test]
    fn test_new_farm_rejects_overlapping_mints() {
        let mut settings = create_test_settings();
        settings.season_mints[2] = settings.season_mints[0];
        assert!(FarmConfig::new(settings).is_err());

        let mut settings = create_test_settings();
        settings.season_mints[3] = settings.base_mint;
        assert!(FarmConfig::new(settings).is_err());
    }

    #[test]
    fn test_held_season_for_pair() {
        let settings = create_test_settings();
        let farm = FarmConfig::new(settings).unwrap();
        let base = settings.base_mint;
        let winter = settings.season_mints[3];
        let spring = settings.season_mints[0];

        assert_eq!(farm.held_season_for_pair(&base, &winter).unwrap(), Season::Winter);
        assert_eq!(farm.held_season_for_pair(&spring, &base).unwrap(), Season::Spring);
        assert!(farm.held_season_for_pair(&spring, &winter).is_err());
        assert!(farm.held_season_for_pair(&base, &base).is_err());
        assert!(farm
            .held_season_for_pair(&base, &Pubkey::new_unique())
            .is_err());
    }

    #[test]
    fn test_allocations_at_does_not_write() {
        let farm = FarmConfig::new(create_test_settings()).unwrap();
        let later = farm.start_time + 2 * farm.reallocation_interval;

        let view = farm.allocations_at(later);
        assert_eq!(view.weights, [10, 12, 7, 8]);
        assert_eq!(farm.allocation.reallocation_count, 0);
    }

    #[test]
    fn test_catch_up_allocations_persists() {
        let mut farm = FarmConfig::new(create_test_settings()).unwrap();
        let later = farm.start_time + 3 * farm.reallocation_interval + 1;

        assert_eq!(farm.catch_up_allocations(later), 3);
        assert_eq!(farm.allocation.weights, [10, 12, 14, 8]);
        assert_eq!(farm.catch_up_allocations(later), 0);
    }

    #[test]
    fn test_depositor_index_swap_remove() {
        let mut depositor = DepositorAccount {
            owner: Pubkey::new_unique(),
            positions: vec![],
            bump: 255,
        };
        let ids: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        for id in &ids {
            depositor.insert(*id).unwrap();
        }
        assert_eq!(depositor.balance_of(), 3);

        depositor.remove(&ids[0]).unwrap();
        assert_eq!(depositor.balance_of(), 2);
        assert_eq!(depositor.position_by_index(0), Some(ids[2]));
        assert_eq!(depositor.position_by_index(1), Some(ids[1]));

        depositor.remove(&ids[1]).unwrap();
        assert_eq!(depositor.position_by_index(0), Some(ids[2]));
        assert_eq!(depositor.position_by_index(1), None);

        assert!(depositor.remove(&ids[1]).is_err());
    }

    #[test]
    fn test_depositor_index_is_bounded() {
        let mut depositor = DepositorAccount {
            owner: Pubkey::new_unique(),
            positions: vec![],
            bump: 255,
        };
        for _ in 0..DepositorAccount::MAX_POSITIONS {
            depositor.insert(Pubkey::new_unique()).unwrap();
        }
        assert!(depositor.insert(Pubkey::new_unique()).is_err());
    }
}
