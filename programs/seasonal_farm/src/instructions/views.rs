// programs/seasonal_farm/src/instructions/views.rs
//
// Read-only queries answered through return data. Allocation views evaluate
// the schedule at the current time without persisting the catch-up.

use anchor_lang::prelude::*;

use crate::schedule::SEASON_COUNT;
use crate::state::{FarmConfig, FarmPosition};

#[derive(Accounts)]
pub struct FarmView<'info> {
    #[account(
        seeds = [FarmConfig::SEED_PREFIX],
        bump = farm_config.bump,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,
}

#[derive(Accounts)]
pub struct PositionView<'info> {
    #[account(
        seeds = [FarmConfig::SEED_PREFIX],
        bump = farm_config.bump,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    /// CHECK: FarmPosition::load_checked rejects anything but a live position
    pub farm_position: UncheckedAccount<'info>,
}

pub fn allocation_sizes(ctx: Context<FarmView>) -> Result<[u64; SEASON_COUNT]> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx.accounts.farm_config.allocations_at(now).weights)
}

pub fn effective_total_allocation_size(
    ctx: Context<FarmView>,
    balances: [u128; SEASON_COUNT],
) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx
        .accounts
        .farm_config
        .allocations_at(now)
        .effective_total_allocation_size(&balances))
}

pub fn payout_sizes(ctx: Context<PositionView>) -> Result<[u64; SEASON_COUNT]> {
    let position = FarmPosition::load_checked(&ctx.accounts.farm_position)?;
    ctx.accounts.farm_config.payout_sizes(&position)
}

pub fn next_withdrawal_time(ctx: Context<PositionView>) -> Result<i64> {
    let now = Clock::get()?.unix_timestamp;
    let position = FarmPosition::load_checked(&ctx.accounts.farm_position)?;
    Ok(ctx
        .accounts
        .farm_config
        .next_withdrawal_time(&position, now))
}
