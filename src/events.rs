// events.rs

use borsh::{to_vec, BorshDeserialize, BorshSerialize};

use solana_program::{log::sol_log_data, msg, pubkey::Pubkey};

use crate::combat::StyleOutcome;
use crate::state::Trait;

/// Observable side effects. Each event is logged once as a readable line and
/// once as borsh bytes for indexers.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum BuckEvent {
    NewBuck {
        id: u64,
        owner: Pubkey,
        points: u32,
        does: u64,
    },
    FightInitiated {
        attacker_id: u64,
        defender_id: u64,
        request_id: u64,
    },
    RandomnessFulfilled {
        request_id: u64,
    },
    FightConcluded {
        attacker_id: u64,
        defender_id: u64,
        outcome: StyleOutcome,
        does_moved: u64,
    },
    BuckTrained {
        id: u64,
        buck_trait: Trait,
        value: u8,
    },
    PrizePoolIncreased {
        amount: u64,
        balance: u64,
    },
    EndSeason {
        buck_id: u64,
        payout: u64,
    },
    FightCancelled {
        attacker_id: u64,
        defender_id: u64,
        request_id: u64,
    },
}

impl BuckEvent {
    pub fn emit(&self) {
        msg!("{:?}", self);
        match to_vec(self) {
            Ok(data) => sol_log_data(&[&data]),
            Err(err) => msg!("Failed to encode event: {}", err),
        }
    }
}
