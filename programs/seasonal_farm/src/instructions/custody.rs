// programs/seasonal_farm/src/instructions/custody.rs
//
// Token custody helpers shared by the instruction handlers. Every vault is
// owned by the farm config PDA, so outbound moves sign with its seeds.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    self, CloseAccount, Mint as MintInterface, TokenAccount as TokenAccountInterface,
    TokenInterface, TransferChecked,
};

use crate::errors::FarmError;
use crate::state::FarmConfig;

/// Signer seeds of the farm config PDA
pub fn farm_seeds(bump: &[u8; 1]) -> [&[u8]; 2] {
    [FarmConfig::SEED_PREFIX, bump]
}

/// `transfer_checked` that works for both SPL Token and Token-2022 mints.
/// Pass `signer_seeds` when the authority is the farm PDA.
pub fn transfer_tokens<'info>(
    token_program: &Interface<'info, TokenInterface>,
    from: &InterfaceAccount<'info, TokenAccountInterface>,
    mint: &InterfaceAccount<'info, MintInterface>,
    to: &InterfaceAccount<'info, TokenAccountInterface>,
    authority: AccountInfo<'info>,
    amount: u64,
    signer_seeds: Option<&[&[&[u8]]]>,
) -> Result<()> {
    let cpi_accounts = TransferChecked {
        from: from.to_account_info(),
        mint: mint.to_account_info(),
        to: to.to_account_info(),
        authority,
    };

    let cpi_ctx = match signer_seeds {
        Some(seeds) => {
            CpiContext::new_with_signer(token_program.to_account_info(), cpi_accounts, seeds)
        }
        None => CpiContext::new(token_program.to_account_info(), cpi_accounts),
    };

    token_interface::transfer_checked(cpi_ctx, amount, mint.decimals)
}

/// Amount a vault actually gained across an inbound transfer. Token-2022
/// transfer fees are withheld from the destination, so this can be less than
/// the amount sent; only this much may back new liabilities.
pub fn net_received(balance_before: u64, balance_after: u64) -> Result<u64> {
    let received = balance_after
        .checked_sub(balance_before)
        .ok_or(FarmError::MathOverflow)?;
    require!(received > 0, FarmError::InvalidDonation);
    Ok(received)
}

/// Close an emptied farm-owned token account, sending its rent to `destination`
pub fn close_vault<'info>(
    token_program: &Interface<'info, TokenInterface>,
    vault: &InterfaceAccount<'info, TokenAccountInterface>,
    destination: AccountInfo<'info>,
    farm_config: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    token_interface::close_account(CpiContext::new_with_signer(
        token_program.to_account_info(),
        CloseAccount {
            account: vault.to_account_info(),
            destination,
            authority: farm_config,
        },
        signer_seeds,
    ))
}
