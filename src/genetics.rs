// genetics.rs

use solana_program::{hash::hashv, pubkey::Pubkey};

use crate::constants::STARTING_LEVEL;
use crate::error::BuckError;
use crate::state::{FightingStyle, Genetics};

pub const MAX_POINTS: u32 = 100;
pub const MAX_STARTING_DOES: u64 = 10;
pub const MAX_STARTING_TRAIT: u8 = 5;
pub const SPECIAL_ABILITY_ODDS: u8 = 10; // percent

/// Stats rolled for a freshly minted buck.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RolledStats {
    pub points: u32,
    pub fighting_style: FightingStyle,
    pub does: u64,
    pub genetics: Genetics,
}

/// Hash of slot, buck id and minter. Fights never read it.
pub fn seed(slot: u64, buck_id: u64, minter: &Pubkey) -> [u8; 32] {
    hashv(&[&slot.to_le_bytes(), &buck_id.to_le_bytes(), minter.as_ref()]).to_bytes()
}

pub fn roll_genetics(seed: &[u8; 32]) -> Genetics {
    Genetics {
        level: STARTING_LEVEL,
        strength: 1 + seed[0] % MAX_STARTING_TRAIT,
        speed: 1 + seed[1] % MAX_STARTING_TRAIT,
        vitality: 1 + seed[2] % MAX_STARTING_TRAIT,
        intelligence: 1 + seed[3] % MAX_STARTING_TRAIT,
        special_ability: seed[4] % 100 < SPECIAL_ABILITY_ODDS,
    }
}

pub fn roll_stats(seed: &[u8; 32]) -> Result<RolledStats, BuckError> {
    let points_word = u32::from_le_bytes([seed[8], seed[9], seed[10], seed[11]]);
    let does_word = u64::from_le_bytes([
        seed[16], seed[17], seed[18], seed[19], seed[20], seed[21], seed[22], seed[23],
    ]);

    Ok(RolledStats {
        points: 1 + points_word % MAX_POINTS,
        fighting_style: FightingStyle::from_index(1 + seed[12] % 3)?,
        does: 1 + does_word % MAX_STARTING_DOES,
        genetics: roll_genetics(seed),
    })
}
