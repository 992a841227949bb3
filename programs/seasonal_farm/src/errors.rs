// programs/seasonal_farm/src/errors.rs

use anchor_lang::prelude::*;

#[error_code]
pub enum FarmError {
    #[msg("Invalid trading pair: expected the base asset and exactly one seasonal token")]
    InvalidTradingPair,

    #[msg("Liquidity must cover the full range of prices")]
    RangeNotFull,

    #[msg("Position fee tier does not match the required tier")]
    WrongFeeTier,

    #[msg("Only positions from the configured registry can be deposited")]
    NotExternalRegistryToken,

    #[msg("Only seasonal tokens can be donated")]
    InvalidDonation,

    #[msg("No liquidity in the farm to receive the donation")]
    NoLiquidity,

    #[msg("Unauthorized: caller does not own the position or funds")]
    Unauthorized,

    #[msg("Withdrawal window is not open")]
    WithdrawalUnavailable,

    #[msg("Position not found")]
    InvalidPosition,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Payout exceeds the tracked reward reserve")]
    InsufficientRewardReserve,

    #[msg("Depositor already holds the maximum number of positions")]
    DepositorIndexFull,

    #[msg("Invalid reallocation or withdrawal schedule")]
    InvalidSchedule,

    #[msg("Season mints must be distinct and differ from the base mint")]
    InvalidSeasonMints,

    #[msg("Position liquidity is below the farm minimum")]
    LiquidityTooLow,
}
