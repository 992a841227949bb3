// programs/seasonal_farm/src/instructions/withdraw.rs
//
// Position Withdrawal
// ===================
// Returns the position NFT during an open withdrawal window. Rewards are not
// harvested on the way out; whatever was still owed stays in the vaults.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    Mint as MintInterface, TokenAccount as TokenAccountInterface, TokenInterface,
};

use crate::errors::FarmError;
use crate::events::PositionWithdrawn;
use crate::instructions::custody::{close_vault, farm_seeds, transfer_tokens};
use crate::instructions::sync::announce_reallocations;
use crate::state::{DepositorAccount, FarmConfig, FarmPosition};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(
        mut,
        seeds = [FarmConfig::SEED_PREFIX],
        bump = farm_config.bump,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    #[account(
        mut,
        seeds = [FarmPosition::SEED_PREFIX, position_mint.key().as_ref()],
        bump = farm_position.bump,
        has_one = owner @ FarmError::Unauthorized,
        close = owner
    )]
    pub farm_position: Box<Account<'info, FarmPosition>>,

    #[account(
        mut,
        seeds = [DepositorAccount::SEED_PREFIX, owner.key().as_ref()],
        bump = depositor_account.bump,
    )]
    pub depositor_account: Box<Account<'info, DepositorAccount>>,

    #[account(
        constraint = position_mint.key() == farm_position.position_mint @ FarmError::InvalidPosition
    )]
    pub position_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(
        mut,
        seeds = [FarmPosition::VAULT_SEED, position_mint.key().as_ref()],
        bump,
    )]
    pub position_vault: Box<InterfaceAccount<'info, TokenAccountInterface>>,

    #[account(
        mut,
        constraint = owner_token_account.mint == position_mint.key() @ FarmError::InvalidTokenAccount,
        constraint = owner_token_account.owner == owner.key() @ FarmError::Unauthorized
    )]
    pub owner_token_account: Box<InterfaceAccount<'info, TokenAccountInterface>>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();
    let position_mint = ctx.accounts.position_mint.key();

    let farm = &mut ctx.accounts.farm_config;
    let position = &ctx.accounts.farm_position;
    let stranded_rewards = farm.payout_sizes(position)?;
    let count_before = farm.allocation.reallocation_count;
    farm.withdraw(&owner, position, now)?;
    announce_reallocations(farm, count_before, now);

    ctx.accounts.depositor_account.remove(&position_mint)?;

    let bump = [ctx.accounts.farm_config.bump];
    let seeds = farm_seeds(&bump);
    let signer_seeds = &[&seeds[..]];

    transfer_tokens(
        &ctx.accounts.token_program,
        &ctx.accounts.position_vault,
        &ctx.accounts.position_mint,
        &ctx.accounts.owner_token_account,
        ctx.accounts.farm_config.to_account_info(),
        1,
        Some(signer_seeds),
    )?;
    close_vault(
        &ctx.accounts.token_program,
        &ctx.accounts.position_vault,
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.farm_config.to_account_info(),
        signer_seeds,
    )?;

    if stranded_rewards.iter().any(|amount| *amount > 0) {
        msg!("Unharvested rewards left behind: {:?}", stranded_rewards);
    }

    emit!(PositionWithdrawn {
        owner,
        position_mint,
        held_season: ctx.accounts.farm_position.held_season,
        liquidity: ctx.accounts.farm_position.liquidity,
        stranded_rewards,
        timestamp: now,
    });

    Ok(())
}
