// programs/seasonal_farm/src/instructions/deposit.rs
//
// Position Deposit
// ================
// Takes custody of a full-range position NFT from the external registry and
// opens a farm position snapshotted at the current yield accumulators.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    Mint as MintInterface, TokenAccount as TokenAccountInterface, TokenInterface,
};

use crate::errors::FarmError;
use crate::events::PositionDeposited;
use crate::instructions::custody::transfer_tokens;
use crate::instructions::sync::announce_reallocations;
use crate::registry::PositionDescriptor;
use crate::state::{DepositorAccount, FarmConfig, FarmPosition};

#[derive(Accounts)]
pub struct DepositPosition<'info> {
    #[account(
        mut,
        seeds = [FarmConfig::SEED_PREFIX],
        bump = farm_config.bump,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    /// CHECK: owner and layout are validated by PositionDescriptor::load
    pub registry_position: UncheckedAccount<'info>,

    /// One-unit NFT representing the registry position
    pub position_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(
        mut,
        constraint = owner_token_account.mint == position_mint.key() @ FarmError::InvalidTokenAccount,
        constraint = owner_token_account.owner == owner.key() @ FarmError::Unauthorized
    )]
    pub owner_token_account: Box<InterfaceAccount<'info, TokenAccountInterface>>,

    #[account(
        init,
        payer = owner,
        token::mint = position_mint,
        token::authority = farm_config,
        token::token_program = token_program,
        seeds = [FarmPosition::VAULT_SEED, position_mint.key().as_ref()],
        bump
    )]
    pub position_vault: Box<InterfaceAccount<'info, TokenAccountInterface>>,

    #[account(
        init,
        payer = owner,
        space = 8 + FarmPosition::INIT_SPACE,
        seeds = [FarmPosition::SEED_PREFIX, position_mint.key().as_ref()],
        bump
    )]
    pub farm_position: Box<Account<'info, FarmPosition>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + DepositorAccount::INIT_SPACE,
        seeds = [DepositorAccount::SEED_PREFIX, owner.key().as_ref()],
        bump
    )]
    pub depositor_account: Box<Account<'info, DepositorAccount>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn deposit_position(ctx: Context<DepositPosition>) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    let descriptor = PositionDescriptor::load(&ctx.accounts.registry_position)?;
    require_keys_eq!(
        descriptor.position.position_mint,
        ctx.accounts.position_mint.key(),
        FarmError::NotExternalRegistryToken
    );

    let farm = &mut ctx.accounts.farm_config;
    let count_before = farm.allocation.reallocation_count;
    let position = farm.deposit(owner, &descriptor, now)?;
    let next_withdrawal_time = farm.next_withdrawal_time(&position, now);
    announce_reallocations(farm, count_before, now);

    let depositor = &mut ctx.accounts.depositor_account;
    if depositor.owner == Pubkey::default() {
        depositor.owner = owner;
        depositor.bump = ctx.bumps.depositor_account;
    }
    depositor.insert(position.position_mint)?;

    emit!(PositionDeposited {
        owner,
        position_mint: position.position_mint,
        held_season: position.held_season,
        liquidity: position.liquidity,
        next_withdrawal_time,
        timestamp: now,
    });

    ctx.accounts.farm_position.set_inner(FarmPosition {
        bump: ctx.bumps.farm_position,
        ..position
    });

    transfer_tokens(
        &ctx.accounts.token_program,
        &ctx.accounts.owner_token_account,
        &ctx.accounts.position_mint,
        &ctx.accounts.position_vault,
        ctx.accounts.owner.to_account_info(),
        1,
        None,
    )?;

    msg!(
        "Position {} deposited into the {} pool",
        ctx.accounts.position_mint.key(),
        ctx.accounts.farm_position.held_season.name()
    );

    Ok(())
}
