// programs/seasonal_farm/src/instructions/initialize.rs
//
// Farm Initialization
// ===================
// Creates the farm config PDA with its immutable schedule, then one vault per
// seasonal token owned by that PDA. Schedule parameters are optional and fall
// back to the FarmConfig defaults.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    Mint as MintInterface, TokenAccount as TokenAccountInterface, TokenInterface,
};

use crate::errors::FarmError;
use crate::events::{FarmInitialized, SeasonVaultCreated};
use crate::state::{FarmConfig, FarmSettings};

// =============================================================================
// INITIALIZE FARM
// =============================================================================

#[derive(Accounts)]
pub struct InitializeFarm<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + FarmConfig::INIT_SPACE,
        seeds = [FarmConfig::SEED_PREFIX],
        bump
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    /// Base asset every deposited pair must contain
    pub base_mint: Box<InterfaceAccount<'info, MintInterface>>,

    pub spring_mint: Box<InterfaceAccount<'info, MintInterface>>,
    pub summer_mint: Box<InterfaceAccount<'info, MintInterface>>,
    pub autumn_mint: Box<InterfaceAccount<'info, MintInterface>>,
    pub winter_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct InitializeFarmParams {
    /// Program owning the liquidity position accounts
    pub position_registry: Pubkey,
    /// Defaults to the current time
    pub start_time: Option<i64>,
    pub reallocation_interval: Option<i64>,
    pub required_fee_tier: Option<u32>,
    pub withdrawal_unavailable_days: Option<i64>,
    pub withdrawal_available_days: Option<i64>,
}

pub fn handler(ctx: Context<InitializeFarm>, params: InitializeFarmParams) -> Result<()> {
    let clock = Clock::get()?;

    let settings = FarmSettings {
        authority: ctx.accounts.authority.key(),
        position_registry: params.position_registry,
        base_mint: ctx.accounts.base_mint.key(),
        season_mints: [
            ctx.accounts.spring_mint.key(),
            ctx.accounts.summer_mint.key(),
            ctx.accounts.autumn_mint.key(),
            ctx.accounts.winter_mint.key(),
        ],
        required_fee_tier: params
            .required_fee_tier
            .unwrap_or(FarmConfig::DEFAULT_FEE_TIER),
        start_time: params.start_time.unwrap_or(clock.unix_timestamp),
        reallocation_interval: params
            .reallocation_interval
            .unwrap_or(FarmConfig::DEFAULT_REALLOCATION_INTERVAL),
        withdrawal_unavailable_days: params
            .withdrawal_unavailable_days
            .unwrap_or(FarmConfig::DEFAULT_WITHDRAWAL_UNAVAILABLE_DAYS),
        withdrawal_available_days: params
            .withdrawal_available_days
            .unwrap_or(FarmConfig::DEFAULT_WITHDRAWAL_AVAILABLE_DAYS),
    };

    let mut farm = FarmConfig::new(settings)?;
    farm.bump = ctx.bumps.farm_config;
    ctx.accounts.farm_config.set_inner(farm);

    let farm = &ctx.accounts.farm_config;
    emit!(FarmInitialized {
        authority: farm.authority,
        position_registry: farm.position_registry,
        base_mint: farm.base_mint,
        season_mints: farm.season_mints,
        start_time: farm.start_time,
        reallocation_interval: farm.reallocation_interval,
        timestamp: clock.unix_timestamp,
    });

    msg!("Seasonal farm initialized");
    msg!("Position registry: {}", farm.position_registry);
    msg!(
        "Reallocation every {}s from {}, withdrawals {}d closed / {}d open",
        farm.reallocation_interval,
        farm.start_time,
        farm.withdrawal_unavailable_days,
        farm.withdrawal_available_days
    );

    Ok(())
}

// =============================================================================
// INITIALIZE SEASON VAULT
// =============================================================================

/// Create the PDA-owned vault that receives donations of one seasonal token
#[derive(Accounts)]
pub struct InitializeSeasonVault<'info> {
    #[account(
        mut,
        seeds = [FarmConfig::SEED_PREFIX],
        bump = farm_config.bump,
        has_one = authority @ FarmError::Unauthorized,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    #[account(
        constraint = farm_config.season_of_mint(&season_mint.key()).is_some() @ FarmError::InvalidSeasonMints
    )]
    pub season_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(
        init,
        payer = authority,
        token::mint = season_mint,
        token::authority = farm_config,
        token::token_program = token_program,
        seeds = [FarmConfig::SEASON_VAULT_SEED, season_mint.key().as_ref()],
        bump
    )]
    pub season_vault: Box<InterfaceAccount<'info, TokenAccountInterface>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn initialize_season_vault(ctx: Context<InitializeSeasonVault>) -> Result<()> {
    let clock = Clock::get()?;
    let mint = ctx.accounts.season_mint.key();
    let vault = ctx.accounts.season_vault.key();

    let farm = &mut ctx.accounts.farm_config;
    let season = farm
        .season_of_mint(&mint)
        .ok_or(FarmError::InvalidSeasonMints)?;
    farm.season_vaults[season.index()] = vault;

    emit!(SeasonVaultCreated {
        season,
        mint,
        vault,
        timestamp: clock.unix_timestamp,
    });

    msg!("{} vault: {}", season.name(), vault);

    Ok(())
}
