// programs/seasonal_farm/src/instructions/harvest.rs
//
// Harvest
// =======
// Settles a position and pays out every seasonal token it is owed from the
// season vaults. Each season travels in its own SeasonPayout group so a single
// instruction covers all four tokens.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    Mint as MintInterface, TokenAccount as TokenAccountInterface, TokenInterface,
};

use crate::errors::FarmError;
use crate::events::Harvested;
use crate::instructions::custody::{farm_seeds, transfer_tokens};
use crate::instructions::sync::announce_reallocations;
use crate::schedule::Season;
use crate::state::{FarmConfig, FarmPosition};

/// Vault and destination for one seasonal token
#[derive(Accounts)]
pub struct SeasonPayout<'info> {
    pub mint: Box<InterfaceAccount<'info, MintInterface>>,

    #[account(mut)]
    pub vault: Box<InterfaceAccount<'info, TokenAccountInterface>>,

    #[account(
        mut,
        constraint = destination.mint == mint.key() @ FarmError::InvalidTokenAccount
    )]
    pub destination: Box<InterfaceAccount<'info, TokenAccountInterface>>,
}

impl<'info> SeasonPayout<'info> {
    fn validate(&self, farm: &FarmConfig, season: Season) -> Result<()> {
        require_keys_eq!(
            self.mint.key(),
            farm.season_mints[season.index()],
            FarmError::InvalidTokenAccount
        );
        require_keys_eq!(
            self.vault.key(),
            farm.season_vaults[season.index()],
            FarmError::InvalidTokenAccount
        );
        Ok(())
    }
}

#[derive(Accounts)]
pub struct Harvest<'info> {
    #[account(
        mut,
        seeds = [FarmConfig::SEED_PREFIX],
        bump = farm_config.bump,
    )]
    pub farm_config: Box<Account<'info, FarmConfig>>,

    #[account(
        mut,
        seeds = [FarmPosition::SEED_PREFIX, farm_position.position_mint.as_ref()],
        bump = farm_position.bump,
    )]
    pub farm_position: Box<Account<'info, FarmPosition>>,

    pub spring: SeasonPayout<'info>,
    pub summer: SeasonPayout<'info>,
    pub autumn: SeasonPayout<'info>,
    pub winter: SeasonPayout<'info>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> Harvest<'info> {
    fn payout(&self, season: Season) -> &SeasonPayout<'info> {
        match season {
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Autumn => &self.autumn,
            Season::Winter => &self.winter,
        }
    }
}

pub fn harvest(ctx: Context<Harvest>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    let farm = &mut ctx.accounts.farm_config;
    let count_before = farm.allocation.reallocation_count;
    let amounts = farm.harvest(&owner, &mut ctx.accounts.farm_position, now)?;
    announce_reallocations(farm, count_before, now);

    let bump = [ctx.accounts.farm_config.bump];
    let seeds = farm_seeds(&bump);
    let signer_seeds = &[&seeds[..]];

    for season in Season::ALL {
        let amount = amounts[season.index()];
        if amount == 0 {
            continue;
        }
        let payout = ctx.accounts.payout(season);
        payout.validate(&ctx.accounts.farm_config, season)?;

        transfer_tokens(
            &ctx.accounts.token_program,
            &payout.vault,
            &payout.mint,
            &payout.destination,
            ctx.accounts.farm_config.to_account_info(),
            amount,
            Some(signer_seeds),
        )?;
        msg!("Paid {} {}", amount, season.name());
    }

    emit!(Harvested {
        owner,
        position_mint: ctx.accounts.farm_position.position_mint,
        amounts,
        timestamp: now,
    });

    Ok(())
}
