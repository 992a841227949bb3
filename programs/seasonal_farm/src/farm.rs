// programs/seasonal_farm/src/farm.rs
//
// Farm Transactions
// =================
// Each entry point below is one atomic step over the farm state:
// 1. Evaluate the allocation schedule at `now` (lazy catch-up)
// 2. Validate and compute every change on local copies
// 3. Commit, only once nothing can fail anymore
//
// Instruction handlers call these with the Clock sysvar's timestamp and do the
// token transfers; everything here is pure and runs off-chain in tests.

use anchor_lang::prelude::*;

use crate::errors::FarmError;
use crate::registry::PositionDescriptor;
use crate::schedule::{Season, SEASON_COUNT};
use crate::state::{FarmConfig, FarmPosition};
use crate::yield_ledger::accrued_amount;

/// How a donation was spread over the held-token pools
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DonationReceipt {
    pub season: Season,
    pub amount: u64,
    /// Amount credited to each held pool; the remainder is rounding dust
    pub credited: [u64; SEASON_COUNT],
}

impl FarmConfig {
    /// Validate an incoming position and open it.
    ///
    /// Plays the role of the registry's "position received" hook: the returned
    /// position is snapshotted at the current accumulators for its pool.
    pub fn deposit(
        &mut self,
        owner: Pubkey,
        descriptor: &PositionDescriptor,
        now: i64,
    ) -> Result<FarmPosition> {
        require_keys_eq!(
            descriptor.registry_program,
            self.position_registry,
            FarmError::NotExternalRegistryToken
        );

        let position = &descriptor.position;
        let (token_a, token_b) = position.token_pair();
        let held = self.held_season_for_pair(&token_a, &token_b)?;
        require!(position.is_full_range(), FarmError::RangeNotFull);
        require!(
            position.fee_tier == self.required_fee_tier,
            FarmError::WrongFeeTier
        );
        require!(
            position.liquidity >= Self::MIN_POSITION_LIQUIDITY,
            FarmError::LiquidityTooLow
        );

        let allocation = self.allocations_at(now);
        let pool_liquidity = self.pool_liquidity[held.index()]
            .checked_add(position.liquidity)
            .ok_or(FarmError::MathOverflow)?;
        let open_positions = self
            .open_positions
            .checked_add(1)
            .ok_or(FarmError::MathOverflow)?;

        self.allocation = allocation;
        self.pool_liquidity[held.index()] = pool_liquidity;
        self.open_positions = open_positions;

        Ok(FarmPosition {
            owner,
            position_mint: position.position_mint,
            registry_position: descriptor.address,
            held_season: held,
            liquidity: position.liquidity,
            deposited_at: now,
            yield_snapshots: self.yield_ledger.snapshot(held),
            unpaid: [0; SEASON_COUNT],
            bump: 0,
        })
    }

    /// Accept `amount` of a seasonal token and credit it to every pool with
    /// liquidity, weighted by the current season allocation.
    pub fn donate(
        &mut self,
        donor: &Pubkey,
        funds_owner: &Pubkey,
        mint: &Pubkey,
        amount: u64,
        now: i64,
    ) -> Result<DonationReceipt> {
        let season = self
            .season_of_mint(mint)
            .ok_or(FarmError::InvalidDonation)?;
        require!(amount > 0, FarmError::InvalidDonation);
        require_keys_eq!(*funds_owner, *donor, FarmError::Unauthorized);

        let allocation = self.allocations_at(now);
        let effective_total = allocation.effective_total_allocation_size(&self.pool_liquidity);
        require!(effective_total > 0, FarmError::NoLiquidity);

        let mut ledger = self.yield_ledger;
        let mut credited = [0u64; SEASON_COUNT];
        for held in Season::ALL {
            let liquidity = self.pool_liquidity[held.index()];
            if liquidity == 0 {
                continue;
            }
            // weight <= effective_total, so the share never exceeds amount
            let share = (amount as u128)
                .checked_mul(allocation.weight(held) as u128)
                .ok_or(FarmError::MathOverflow)?
                / effective_total as u128;
            let share = u64::try_from(share).map_err(|_| error!(FarmError::MathOverflow))?;
            ledger.record_donation(season, held, share, liquidity)?;
            credited[held.index()] = share;
        }

        let i = season.index();
        let reserve = self.reward_reserves[i]
            .checked_add(amount)
            .ok_or(FarmError::MathOverflow)?;

        self.allocation = allocation;
        self.yield_ledger = ledger;
        self.reward_reserves[i] = reserve;
        self.total_donated[i] = self.total_donated[i].saturating_add(amount as u128);

        Ok(DonationReceipt {
            season,
            amount,
            credited,
        })
    }

    /// Amount of each seasonal token the position could harvest right now
    pub fn payout_sizes(&self, position: &FarmPosition) -> Result<[u64; SEASON_COUNT]> {
        let mut payouts = [0u64; SEASON_COUNT];
        for donated in Season::ALL {
            let i = donated.index();
            let delta = self
                .yield_ledger
                .cumulative(donated, position.held_season)
                .checked_sub(position.yield_snapshots[i])
                .ok_or(FarmError::MathOverflow)?;
            let accrued = accrued_amount(delta, position.liquidity)?;
            let owed = accrued
                .checked_add(position.unpaid[i] as u128)
                .ok_or(FarmError::MathOverflow)?;
            payouts[i] = u64::try_from(owed).map_err(|_| error!(FarmError::MathOverflow))?;
        }
        Ok(payouts)
    }

    /// Move everything accrued into the position's unpaid buffer and advance
    /// its snapshots to the current accumulators.
    pub fn settle(&self, position: &mut FarmPosition) -> Result<()> {
        let owed = self.payout_sizes(position)?;
        position.yield_snapshots = self.yield_ledger.snapshot(position.held_season);
        position.unpaid = owed;
        Ok(())
    }

    /// Settle and drain the position. Returns the amount of each seasonal
    /// token the caller must be paid.
    pub fn harvest(
        &mut self,
        caller: &Pubkey,
        position: &mut FarmPosition,
        now: i64,
    ) -> Result<[u64; SEASON_COUNT]> {
        require_keys_eq!(*caller, position.owner, FarmError::Unauthorized);

        let allocation = self.allocations_at(now);
        let mut settled = position.clone();
        self.settle(&mut settled)?;

        let payouts = settled.unpaid;
        let mut reserves = self.reward_reserves;
        let mut harvested = self.total_harvested;
        for i in 0..SEASON_COUNT {
            reserves[i] = reserves[i]
                .checked_sub(payouts[i])
                .ok_or(FarmError::InsufficientRewardReserve)?;
            harvested[i] = harvested[i].saturating_add(payouts[i] as u128);
        }
        settled.unpaid = [0; SEASON_COUNT];

        self.allocation = allocation;
        self.reward_reserves = reserves;
        self.total_harvested = harvested;
        *position = settled;

        Ok(payouts)
    }

    /// Take the position out of the farm. Unharvested rewards are NOT paid and
    /// stay behind in the reserves.
    pub fn withdraw(&mut self, caller: &Pubkey, position: &FarmPosition, now: i64) -> Result<()> {
        require_keys_eq!(*caller, position.owner, FarmError::Unauthorized);
        require!(
            self.withdrawal_window()
                .is_open(position.deposited_at, now),
            FarmError::WithdrawalUnavailable
        );

        let allocation = self.allocations_at(now);
        let held = position.held_season.index();
        let pool_liquidity = self.pool_liquidity[held]
            .checked_sub(position.liquidity)
            .ok_or(FarmError::MathOverflow)?;
        let open_positions = self
            .open_positions
            .checked_sub(1)
            .ok_or(FarmError::MathOverflow)?;

        self.allocation = allocation;
        self.pool_liquidity[held] = pool_liquidity;
        self.open_positions = open_positions;

        Ok(())
    }

    pub fn next_withdrawal_time(&self, position: &FarmPosition, now: i64) -> i64 {
        self.withdrawal_window()
            .next_open(position.deposited_at, now)
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
