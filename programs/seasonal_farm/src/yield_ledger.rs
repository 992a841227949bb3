// programs/seasonal_farm/src/yield_ledger.rs
//
// Cumulative Yield Ledger
// =======================
// cumulative[donated][held] is the total amount of `donated` tokens paid per
// unit of `held`-pool liquidity since the farm started, scaled by YIELD_SCALE.
// A position is owed (cumulative - snapshot) * liquidity / YIELD_SCALE.
//
// All divisions round down, so the farm can only ever owe less than it holds.
//
// Headroom: deposits carry at least FarmConfig::MIN_POSITION_LIQUIDITY, so one
// donation raises an accumulator by at most ~1.8e31 and a u128 entry absorbs
// over 10^7 maximum-size donations before `record_donation` reports overflow.

use anchor_lang::prelude::*;

use crate::errors::FarmError;
use crate::schedule::{Season, SEASON_COUNT};

/// Fixed-point scale for per-unit-liquidity accumulators
pub const YIELD_SCALE: u128 = 1_000_000_000_000_000_000;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default, InitSpace)]
pub struct YieldLedger {
    /// Indexed as [donated season][held season]
    pub cumulative: [[u128; SEASON_COUNT]; SEASON_COUNT],
}

impl YieldLedger {
    pub fn cumulative(&self, donated: Season, held: Season) -> u128 {
        self.cumulative[donated.index()][held.index()]
    }

    /// Current accumulator of every donated token against one held pool
    pub fn snapshot(&self, held: Season) -> [u128; SEASON_COUNT] {
        let mut snapshot = [0u128; SEASON_COUNT];
        for donated in Season::ALL {
            snapshot[donated.index()] = self.cumulative(donated, held);
        }
        snapshot
    }

    /// Credit `amount` of `donated` to every unit of liquidity in the `held`
    /// pool. Returns the per-unit increment that was added.
    pub fn record_donation(
        &mut self,
        donated: Season,
        held: Season,
        amount: u64,
        total_liquidity: u128,
    ) -> Result<u128> {
        require!(total_liquidity > 0, FarmError::NoLiquidity);

        let increment = per_unit_yield(amount, total_liquidity)?;
        let entry = &mut self.cumulative[donated.index()][held.index()];
        *entry = entry
            .checked_add(increment)
            .ok_or(FarmError::MathOverflow)?;

        Ok(increment)
    }
}

/// floor(amount * YIELD_SCALE / liquidity)
pub fn per_unit_yield(amount: u64, liquidity: u128) -> Result<u128> {
    (amount as u128)
        .checked_mul(YIELD_SCALE)
        .ok_or(FarmError::MathOverflow)?
        .checked_div(liquidity)
        .ok_or_else(|| error!(FarmError::NoLiquidity))
}

/// floor(per_unit * liquidity / YIELD_SCALE) without a 256-bit intermediate.
///
/// With per_unit = pq*S + pr and liquidity = lq*S + lr the product over S is
/// pq*liquidity + pr*lq + pr*lr/S, and only the last term needs rounding.
pub fn accrued_amount(per_unit: u128, liquidity: u128) -> Result<u128> {
    let (pq, pr) = (per_unit / YIELD_SCALE, per_unit % YIELD_SCALE);
    let (lq, lr) = (liquidity / YIELD_SCALE, liquidity % YIELD_SCALE);

    let whole = pq.checked_mul(liquidity).ok_or(FarmError::MathOverflow)?;
    let cross = pr.checked_mul(lq).ok_or(FarmError::MathOverflow)?;
    // pr, lr < 10^18 so this product stays below 10^36
    let fraction = pr * lr / YIELD_SCALE;

    whole
        .checked_add(cross)
        .and_then(|sum| sum.checked_add(fraction))
        .ok_or_else(|| error!(FarmError::MathOverflow))
}

// =============================================================================
// UNIT TESTS
// =============================================================================
