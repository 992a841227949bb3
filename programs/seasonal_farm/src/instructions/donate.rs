// programs/seasonal_farm/src/instructions/donate.rs

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    Mint as MintInterface, TokenAccount as TokenAccountInterface, TokenInterface,
};

use crate::errors::FarmError;
use crate::events::DonationReceived;
use crate::instructions::custody::{net_received, transfer_tokens};
use crate::instructions::sync::announce_reallocations;
use crate::state::FarmConfig;

/// Donate seasonal tokens to every pool that currently holds liquidity
#[derive(Accounts)]
pub struct Donate<'info> {
    #[account(
        mut,
        seeds = [FarmConfig::SEED_PREFIX],
        bump = farm_config.bump,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    pub season_mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(
        mut,
        constraint = donor_token_account.mint == season_mint.key() @ FarmError::InvalidTokenAccount,
        constraint = donor_token_account.owner == donor.key() @ FarmError::Unauthorized
    )]
    pub donor_token_account: Box<InterfaceAccount<'info, TokenAccountInterface>>,

    #[account(mut)]
    pub season_vault: Box<InterfaceAccount<'info, TokenAccountInterface>>,

    pub donor: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn donate(ctx: Context<Donate>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let donor = ctx.accounts.donor.key();
    let mint = ctx.accounts.season_mint.key();

    let season = ctx
        .accounts
        .farm_config
        .season_of_mint(&mint)
        .ok_or(FarmError::InvalidDonation)?;
    require!(amount > 0, FarmError::InvalidDonation);
    require_keys_eq!(
        ctx.accounts.season_vault.key(),
        ctx.accounts.farm_config.season_vaults[season.index()],
        FarmError::InvalidTokenAccount
    );

    let balance_before = ctx.accounts.season_vault.amount;
    transfer_tokens(
        &ctx.accounts.token_program,
        &ctx.accounts.donor_token_account,
        &ctx.accounts.season_mint,
        &ctx.accounts.season_vault,
        ctx.accounts.donor.to_account_info(),
        amount,
        None,
    )?;
    ctx.accounts.season_vault.reload()?;
    let received = net_received(balance_before, ctx.accounts.season_vault.amount)?;

    let farm = &mut ctx.accounts.farm_config;
    let count_before = farm.allocation.reallocation_count;
    let receipt = farm.donate(
        &donor,
        &ctx.accounts.donor_token_account.owner,
        &mint,
        received,
        now,
    )?;
    announce_reallocations(farm, count_before, now);

    emit!(DonationReceived {
        donor,
        season: receipt.season,
        amount,
        received,
        credited: receipt.credited,
        timestamp: now,
    });

    if received < amount {
        msg!("Transfer fee withheld {} of {}", amount - received, amount);
    }
    msg!("{} {} donated", received, receipt.season.name());

    Ok(())
}
