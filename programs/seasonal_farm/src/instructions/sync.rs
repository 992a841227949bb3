// programs/seasonal_farm/src/instructions/sync.rs

use anchor_lang::prelude::*;

use crate::events::AllocationsReallocated;
use crate::state::FarmConfig;

/// Emit `AllocationsReallocated` if the weights moved past `count_before`
pub fn announce_reallocations(farm: &FarmConfig, count_before: u64, now: i64) {
    let steps_applied = farm
        .allocation
        .reallocation_count
        .saturating_sub(count_before);
    if steps_applied == 0 {
        return;
    }

    msg!(
        "Reallocated {} step(s), weights now {:?}, favoring {}",
        steps_applied,
        farm.allocation.weights,
        farm.allocation
            .favored_season()
            .map_or("no season", |season| season.name())
    );
    emit!(AllocationsReallocated {
        steps_applied,
        reallocation_count: farm.allocation.reallocation_count,
        weights: farm.allocation.weights,
        timestamp: now,
    });
}

// =============================================================================
// SYNC ALLOCATIONS
// =============================================================================

/// Persist any reallocations that fell due. Permissionless.
#[derive(Accounts)]
pub struct SyncAllocations<'info> {
    #[account(
        mut,
        seeds = [FarmConfig::SEED_PREFIX],
        bump = farm_config.bump,
    )]
    pub farm_config: Account<'info, FarmConfig>,
}

pub fn sync_allocations(ctx: Context<SyncAllocations>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let farm = &mut ctx.accounts.farm_config;

    let count_before = farm.allocation.reallocation_count;
    farm.catch_up_allocations(now);
    announce_reallocations(farm, count_before, now);

    Ok(())
}
