// programs/seasonal_farm/src/registry.rs
//
// External Position Registry Adapter
// ==================================
// Liquidity positions live in an external concentrated-liquidity AMM. Each
// position is represented by a one-unit NFT mint plus a registry-owned account
// describing the pair, fee tier, price range and liquidity. The farm only reads
// that account; it never writes to the registry.

use anchor_lang::prelude::*;

use crate::errors::FarmError;

/// Lowest tick representable by the registry
pub const MIN_TICK: i32 = -887272;

/// Highest tick representable by the registry
pub const MAX_TICK: i32 = 887272;

/// Registry-side position record, stored after an 8-byte discriminator
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegistryPosition {
    /// NFT mint that represents ownership of the position
    pub position_mint: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    /// Pool fee in hundredths of a basis point (100 = 0.01%)
    pub fee_tier: u32,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub liquidity: u128,
}

impl RegistryPosition {
    pub const DISCRIMINATOR_LEN: usize = 8;

    pub fn is_full_range(&self) -> bool {
        self.tick_lower_index == MIN_TICK && self.tick_upper_index == MAX_TICK
    }

    pub fn token_pair(&self) -> (Pubkey, Pubkey) {
        (self.token_mint_a, self.token_mint_b)
    }

    pub fn from_account_data(data: &[u8]) -> Result<Self> {
        let mut body = data
            .get(Self::DISCRIMINATOR_LEN..)
            .ok_or(FarmError::NotExternalRegistryToken)?;
        Self::deserialize(&mut body).map_err(|_| error!(FarmError::NotExternalRegistryToken))
    }
}

/// A position presented for deposit together with where it came from
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PositionDescriptor {
    /// Program that owns the registry account
    pub registry_program: Pubkey,
    /// Address of the registry account
    pub address: Pubkey,
    pub position: RegistryPosition,
}

impl PositionDescriptor {
    pub fn load(account: &AccountInfo) -> Result<Self> {
        let data = account.try_borrow_data()?;
        Ok(Self {
            registry_program: *account.owner,
            address: account.key(),
            position: RegistryPosition::from_account_data(&data)?,
        })
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RegistryPosition {
        RegistryPosition {
            position_mint: Pubkey::new_unique(),
            token_mint_a: Pubkey::new_unique(),
            token_mint_b: Pubkey::new_unique(),
            fee_tier: 100,
            tick_lower_index: MIN_TICK,
            tick_upper_index: MAX_TICK,
            liquidity: 10_000_000_000,
        }
    }

    #[test]
    fn test_full_range() {
        let mut position = sample();
        assert!(position.is_full_range());

        position.tick_lower_index = -887100;
        assert!(!position.is_full_range());

        position.tick_lower_index = MIN_TICK;
        position.tick_upper_index = 887100;
        assert!(!position.is_full_range());
    }

    #[test]
    fn test_parse_account_data() {
        let position = sample();
        let mut data = vec![7u8; RegistryPosition::DISCRIMINATOR_LEN];
        position.serialize(&mut data).unwrap();

        assert_eq!(RegistryPosition::from_account_data(&data).unwrap(), position);
    }

    #[test]
    fn test_truncated_account_data_is_rejected() {
        assert!(RegistryPosition::from_account_data(&[0u8; 4]).is_err());
        assert!(RegistryPosition::from_account_data(&[0u8; 40]).is_err());
    }
}
