// error.rs

use solana_program::{msg, program_error::ProgramError};
use thiserror::Error;

/// Reasons a buck instruction is rejected. The runtime rolls back every
/// account change made by the failing transaction.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuckError {
    #[error("Must be the buck owner")]
    NotOwner,
    #[error("Buck is not ready to fight")]
    NotReady,
    #[error("Pending fight was already resolved")]
    AlreadyResolved,
    #[error("No pending fight between these bucks")]
    NoPendingFight,
    #[error("Randomness has not been fulfilled yet")]
    RandomnessNotReady,
    #[error("Buck does count is 0")]
    NoResourceToClaim,
    #[error("Total doe count is 0")]
    NoGlobalResource,
    #[error("Insufficient payment")]
    InsufficientPayment,
    #[error("Invalid quantity")]
    InvalidQuantity,

    // --- buck lookup ---
    #[error("Buck does not exist or has been retired")]
    UnknownBuck,
    #[error("A buck cannot fight itself")]
    SelfFight,
    #[error("Attacker already has an unresolved fight")]
    FightAlreadyPending,

    // --- randomness ---
    #[error("Randomness request does not match the pending fight")]
    RequestMismatch,
    #[error("Unknown or consumed randomness request")]
    UnknownRequest,
    #[error("Randomness request was already fulfilled")]
    RequestAlreadyFulfilled,
    #[error("Wrong number of random words")]
    InvalidRandomWords,
    #[error("Signer is not the randomness oracle")]
    UnauthorizedOracle,

    // --- admin / ledger ---
    #[error("Caller is not the game admin")]
    Unauthorized,
    #[error("Caller is not allowed to mutate the prize pool")]
    UnauthorizedLedgerCaller,
    #[error("Fighting style must be 1, 2 or 3")]
    InvalidFightingStyle,
    #[error("Trait is already at its maximum")]
    TraitAtMaximum,
    #[error("Public sale not active")]
    PublicSaleInactive,
    #[error("Game is paused")]
    Paused,
    #[error("Mating season is still ongoing")]
    SeasonOngoing,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Batch: 5-20 bucks only")]
    InvalidBatchSize,
}

impl From<BuckError> for ProgramError {
    fn from(e: BuckError) -> Self {
        msg!("Error: {}", e);
        ProgramError::Custom(e as u32)
    }
}
