// programs/seasonal_farm/src/lib.rs
//
// Seasonal Farm Program
// =====================
// Liquidity-mining farm for four seasonal tokens (Spring, Summer, Autumn,
// Winter), each paired against a common base asset in an external
// concentrated-liquidity registry.
//
// Features:
// - Custody of full-range position NFTs at a single fee tier
// - Donations in any seasonal token, split across pools by season weight
// - Season weights that rotate on a fixed calendar, caught up lazily
// - Per-unit-liquidity yield accumulators with snapshot-based payouts
// - Withdrawal windows repeating from each position's deposit time

use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod farm;
pub mod instructions;
pub mod registry;
pub mod schedule;
pub mod state;
pub mod yield_ledger;

use instructions::*;
use schedule::SEASON_COUNT;

declare_id!("6PtRUZV12JLqECLS9irUSkjoG7mXmgUbDvFJrYw2ess7");

#[program]
pub mod seasonal_farm {
    use super::*;

    // ==================== INITIALIZATION ====================

    /// Create the farm config with its immutable schedule
    pub fn initialize_farm(
        ctx: Context<InitializeFarm>,
        params: InitializeFarmParams,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Create the donation vault for one seasonal token
    pub fn initialize_season_vault(ctx: Context<InitializeSeasonVault>) -> Result<()> {
        instructions::initialize::initialize_season_vault(ctx)
    }

    // ==================== POSITIONS ====================

    /// Deposit a full-range registry position
    pub fn deposit_position(ctx: Context<DepositPosition>) -> Result<()> {
        instructions::deposit::deposit_position(ctx)
    }

    /// Withdraw a position during an open window (does not harvest)
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::withdraw(ctx)
    }

    // ==================== REWARDS ====================

    /// Donate seasonal tokens to the farm
    pub fn donate(ctx: Context<Donate>, amount: u64) -> Result<()> {
        instructions::donate::donate(ctx, amount)
    }

    /// Collect everything a position is owed
    pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
        instructions::harvest::harvest(ctx)
    }

    /// Persist reallocations that fell due
    pub fn sync_allocations(ctx: Context<SyncAllocations>) -> Result<()> {
        instructions::sync::sync_allocations(ctx)
    }

    // ==================== VIEWS ====================

    pub fn payout_sizes(ctx: Context<PositionView>) -> Result<[u64; SEASON_COUNT]> {
        instructions::views::payout_sizes(ctx)
    }

    pub fn next_withdrawal_time(ctx: Context<PositionView>) -> Result<i64> {
        instructions::views::next_withdrawal_time(ctx)
    }

    /// Current season weights
    pub fn allocation_sizes(ctx: Context<FarmView>) -> Result<[u64; SEASON_COUNT]> {
        instructions::views::allocation_sizes(ctx)
    }

    /// Sum of current weights over seasons with a non-zero balance
    pub fn effective_total_allocation_size(
        ctx: Context<FarmView>,
        balances: [u128; SEASON_COUNT],
    ) -> Result<u64> {
        instructions::views::effective_total_allocation_size(ctx, balances)
    }
}

/// Public helpers for CPI
pub mod farm_helpers {
    use super::*;

    pub fn get_farm_config_seeds() -> &'static [&'static [u8]] {
        &[state::FarmConfig::SEED_PREFIX]
    }

    pub fn get_farm_config_address() -> Pubkey {
        Pubkey::find_program_address(&[state::FarmConfig::SEED_PREFIX], &ID).0
    }

    pub fn get_farm_position_address(position_mint: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[state::FarmPosition::SEED_PREFIX, position_mint.as_ref()],
            &ID,
        )
        .0
    }

    pub fn get_season_vault_address(season_mint: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[state::FarmConfig::SEASON_VAULT_SEED, season_mint.as_ref()],
            &ID,
        )
        .0
    }

    pub fn get_depositor_address(owner: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[state::DepositorAccount::SEED_PREFIX, owner.as_ref()],
            &ID,
        )
        .0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_addresses_are_program_derived() {
        let (expected, _) = Pubkey::find_program_address(farm_helpers::get_farm_config_seeds(), &ID);
        assert_eq!(farm_helpers::get_farm_config_address(), expected);

        let mint = Pubkey::new_unique();
        let position = farm_helpers::get_farm_position_address(&mint);
        let vault = farm_helpers::get_season_vault_address(&mint);
        assert_ne!(position, vault);
        assert_eq!(position, farm_helpers::get_farm_position_address(&mint));
        assert_ne!(
            farm_helpers::get_depositor_address(&mint),
            farm_helpers::get_depositor_address(&Pubkey::new_unique())
        );
    }
}
