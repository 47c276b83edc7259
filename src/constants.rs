// constants.rs

pub const GAME_SEED: &[u8] = b"game";
pub const PRIZE_POOL_SEED: &[u8] = b"prize_pool";
pub const BUCK_SEED: &[u8] = b"buck";
pub const FIGHT_SEED: &[u8] = b"fight";
pub const REQUEST_SEED: &[u8] = b"request";

/// Random words consumed by a single fight.
pub const RANDOM_WORDS: usize = 6;

pub const STYLE_BONUS: u64 = 2;
pub const SPECIAL_ABILITY_BONUS: u64 = 50;
pub const SPECIAL_ABILITY_CHANCE: u64 = 30; // percent
pub const CRIT_CHANCE_PER_LEVEL: u64 = 5; // percent

pub const MAX_TRAIT_VALUE: u8 = 10;
pub const STARTING_LEVEL: u8 = 1;

pub const DEFAULT_COOLDOWN_SECS: i64 = 86_400; // 1 day
pub const DEFAULT_MAX_MINTS_PER_TX: u8 = 10;
pub const MIN_BATCH_MINT: u8 = 5;
pub const MAX_BATCH_MINT: u8 = 20;
pub const BATCH_PRICE_PERCENT: u64 = 95; // 5% off
pub const DEFAULT_MINT_PRICE: u64 = 50_000_000; // 0.05 SOL
pub const DEFAULT_TRAINING_COST: u64 = 10_000_000; // 0.01 SOL
