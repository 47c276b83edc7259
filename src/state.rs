// state.rs

use borsh::{BorshDeserialize, BorshSerialize};

use solana_program::pubkey::Pubkey;

use crate::constants::{
    BATCH_PRICE_PERCENT, DEFAULT_COOLDOWN_SECS, DEFAULT_MAX_MINTS_PER_TX, DEFAULT_MINT_PRICE,
    DEFAULT_TRAINING_COST, MAX_BATCH_MINT, MAX_TRAIT_VALUE, MIN_BATCH_MINT, RANDOM_WORDS,
    STARTING_LEVEL,
};
use crate::error::BuckError;

/// Admin-tunable values supplied at `InitializeGame`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub oracle: Pubkey,
    pub cooldown_secs: i64,
    pub mint_price: u64,
    pub training_cost: u64,
    pub max_mints_per_tx: u8,
    pub season_end: i64,
    pub initial_prize: u64,
}

impl GameSettings {
    pub fn new(oracle: Pubkey, season_end: i64) -> Self {
        GameSettings {
            oracle,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            mint_price: DEFAULT_MINT_PRICE,
            training_cost: DEFAULT_TRAINING_COST,
            max_mints_per_tx: DEFAULT_MAX_MINTS_PER_TX,
            season_end,
            initial_prize: 0,
        }
    }
}

// Singleton, seeds: ["game"]
#[derive(BorshSerialize, BorshDeserialize, Debug, PartialEq)]
pub struct GameConfig {
    pub admin: Pubkey,              // 32 bytes
    pub oracle: Pubkey,             // 32 bytes
    pub cooldown_secs: i64,         // 8 bytes
    pub mint_price: u64,            // 8 bytes
    pub training_cost: u64,         // 8 bytes
    pub max_mints_per_tx: u8,       // 1 byte
    pub public_sale: bool,          // 1 byte
    pub paused: bool,               // 1 byte
    pub next_buck_id: u64,          // 8 bytes
    pub next_request_id: u64,       // 8 bytes
    pub bump: u8,                   // 1 byte
}

impl GameConfig {
    pub const SPACE: usize = 32 + 32 + 8 + 8 + 8 + 1 + 1 + 1 + 8 + 8 + 1;

    pub fn new(admin: Pubkey, settings: &GameSettings, bump: u8) -> Self {
        GameConfig {
            admin,
            oracle: settings.oracle,
            cooldown_secs: settings.cooldown_secs,
            mint_price: settings.mint_price,
            training_cost: settings.training_cost,
            max_mints_per_tx: settings.max_mints_per_tx,
            public_sale: false,
            paused: false,
            next_buck_id: 0,
            next_request_id: 0,
            bump,
        }
    }

    pub fn take_buck_id(&mut self) -> Result<u64, BuckError> {
        let id = self.next_buck_id;
        self.next_buck_id = id.checked_add(1).ok_or(BuckError::ArithmeticOverflow)?;
        Ok(id)
    }

    /// Lamports owed for `quantity` public mints. Batches pay
    /// `BATCH_PRICE_PERCENT` of the unit price per buck.
    pub fn mint_cost(&self, quantity: u8, batch: bool) -> Result<u64, BuckError> {
        let unit_price = if batch {
            if !(MIN_BATCH_MINT..=MAX_BATCH_MINT).contains(&quantity) {
                return Err(BuckError::InvalidBatchSize);
            }
            self.mint_price
                .checked_mul(BATCH_PRICE_PERCENT)
                .ok_or(BuckError::ArithmeticOverflow)?
                / 100
        } else {
            if quantity == 0 || quantity > self.max_mints_per_tx {
                return Err(BuckError::InvalidQuantity);
            }
            self.mint_price
        };
        unit_price
            .checked_mul(u64::from(quantity))
            .ok_or(BuckError::ArithmeticOverflow)
    }

    pub fn take_request_id(&mut self) -> Result<u64, BuckError> {
        let id = self.next_request_id;
        self.next_request_id = id.checked_add(1).ok_or(BuckError::ArithmeticOverflow)?;
        Ok(id)
    }
}

// Singleton, seeds: ["prize_pool"]; lamports above rent back `balance`
#[derive(BorshSerialize, BorshDeserialize, Debug, PartialEq)]
pub struct PrizePool {
    pub authority: Pubkey,          // 32 bytes
    pub balance: u64,               // 8 bytes
    pub total_does: u64,            // 8 bytes
    pub season_end: i64,            // 8 bytes
    pub bump: u8,                   // 1 byte
}

impl PrizePool {
    pub const SPACE: usize = 32 + 8 + 8 + 8 + 1;
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum FightingStyle {
    Aggressive,
    Defensive,
    Balanced,
}

impl FightingStyle {
    /// Styles are numbered 1..=3 on the wire and in the matchup table.
    pub fn from_index(index: u8) -> Result<Self, BuckError> {
        match index {
            1 => Ok(Self::Aggressive),
            2 => Ok(Self::Defensive),
            3 => Ok(Self::Balanced),
            _ => Err(BuckError::InvalidFightingStyle),
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Aggressive => 1,
            Self::Defensive => 2,
            Self::Balanced => 3,
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Trait {
    Strength,
    Speed,
    Vitality,
    Intelligence,
    Level,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Genetics {
    pub level: u8,                  // 1 byte
    pub strength: u8,               // 1 byte
    pub speed: u8,                  // 1 byte
    pub vitality: u8,               // 1 byte
    pub intelligence: u8,           // 1 byte
    pub special_ability: bool,      // 1 byte
}

impl Genetics {
    pub const SPACE: usize = 6;

    /// Raises one trait by a single point, capped at `MAX_TRAIT_VALUE`.
    pub fn train(&mut self, buck_trait: Trait) -> Result<u8, BuckError> {
        let value = match buck_trait {
            Trait::Strength => &mut self.strength,
            Trait::Speed => &mut self.speed,
            Trait::Vitality => &mut self.vitality,
            Trait::Intelligence => &mut self.intelligence,
            Trait::Level => &mut self.level,
        };
        if *value >= MAX_TRAIT_VALUE {
            return Err(BuckError::TraitAtMaximum);
        }
        *value += 1;
        Ok(*value)
    }
}

impl Default for Genetics {
    fn default() -> Self {
        Genetics {
            level: STARTING_LEVEL,
            strength: 1,
            speed: 1,
            vitality: 1,
            intelligence: 1,
            special_ability: false,
        }
    }
}

// seeds: ["buck", id]
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct Buck {
    pub id: u64,                    // 8 bytes
    pub owner: Pubkey,              // 32 bytes
    pub points: u32,                // 4 bytes
    pub fighting_style: FightingStyle, // 1 byte
    pub does: u64,                  // 8 bytes
    pub ready_time: i64,            // 8 bytes
    pub genetics: Genetics,         // 6 bytes
}

impl Buck {
    pub const SPACE: usize = 8 + 32 + 4 + 1 + 8 + 8 + Genetics::SPACE;

    pub fn is_ready(&self, now: i64) -> bool {
        now >= self.ready_time
    }
}

// seeds: ["fight", attacker_id]
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct PendingFight {
    pub attacker_id: u64,           // 8 bytes
    pub defender_id: u64,           // 8 bytes
    pub request_id: u64,            // 8 bytes
    pub resolved: bool,             // 1 byte
}

impl PendingFight {
    pub const SPACE: usize = 8 + 8 + 8 + 1;

    pub fn open(attacker_id: u64, defender_id: u64, request_id: u64) -> Self {
        PendingFight {
            attacker_id,
            defender_id,
            request_id,
            resolved: false,
        }
    }
}

// seeds: ["request", request_id]
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct RandomnessRequest {
    pub request_id: u64,            // 8 bytes
    pub attacker_id: u64,           // 8 bytes
    pub requested_at: i64,          // 8 bytes
    pub fulfilled: bool,            // 1 byte
    pub words: [u64; RANDOM_WORDS], // 8 * RANDOM_WORDS bytes
}

impl RandomnessRequest {
    pub const SPACE: usize = 8 + 8 + 8 + 1 + 8 * RANDOM_WORDS;

    pub fn pending(request_id: u64, attacker_id: u64, timestamp: i64) -> Self {
        RandomnessRequest {
            request_id,
            attacker_id,
            requested_at: timestamp,
            fulfilled: false,
            words: [0; RANDOM_WORDS],
        }
    }
}
