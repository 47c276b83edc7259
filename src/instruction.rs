// instruction.rs

use crate::constants::{BUCK_SEED, FIGHT_SEED, GAME_SEED, PRIZE_POOL_SEED, REQUEST_SEED};
use crate::state::{GameSettings, Trait};

use borsh::{BorshDeserialize, BorshSerialize};

use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
    msg,
};

#[derive(BorshSerialize, BorshDeserialize, Debug, PartialEq)]
pub enum BuckInstruction {
    /// [admin (signer, writable), game, prize_pool, system_program]
    InitializeGame { settings: GameSettings },
    /// [admin (signer), game]
    SetOracle { oracle: Pubkey },
    /// [admin (signer), game]
    UpdateCosts { mint_price: u64, training_cost: u64 },
    /// [admin (signer), game]
    SetPublicSale { active: bool },
    /// [admin (signer), game]
    SetPaused { paused: bool },
    /// [admin (signer, writable), game, prize_pool, buck, system_program]
    CreateBuck { owner: Pubkey, points: u32, fighting_style: u8, does: u64 },
    /// [minter (signer, writable), game, prize_pool, system_program, buck * quantity]
    MintBuck { quantity: u8 },
    /// [owner (signer, writable), game, attacker, defender, pending_fight, request, system_program]
    PrepareForFight { attacker_id: u64, defender_id: u64 },
    /// [oracle (signer), game, request]
    FulfillRandomness { request_id: u64, words: Vec<u64> },
    /// [owner (signer, writable), game, attacker, defender, pending_fight, request]
    Fight { attacker_id: u64, defender_id: u64 },
    /// [owner (signer, writable), game, prize_pool, buck, system_program]
    TrainBuck { buck_id: u64, buck_trait: Trait },
    /// [owner (signer, writable), game, prize_pool, buck]
    EndSeason { buck_id: u64 },
    /// [donor (signer, writable), prize_pool, system_program]
    AddToPrizePool { amount: u64 },
    /// [admin (signer, writable), game, prize_pool]
    WithdrawRemainder,
    /// [minter (signer, writable), game, prize_pool, system_program, buck * quantity]
    MintBuckBatch { quantity: u8 },
    /// [admin (signer, writable), game, prize_pool, system_program, buck * quantity]
    FreeMint { recipient: Pubkey, quantity: u8 },
}

fn parse<T: BorshDeserialize>(rest: &[u8]) -> Result<T, ProgramError> {
    T::try_from_slice(rest).map_err(|_| ProgramError::InvalidInstructionData)
}

impl BuckInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        // Get the instruction variant from the first byte
        let (&variant, rest) = input
            .split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;

        msg!("variant {}", variant);

        match variant {
            0 => Ok(Self::InitializeGame { settings: parse(rest)? }),
            1 => Ok(Self::SetOracle { oracle: parse(rest)? }),
            2 => {
                let (mint_price, training_cost) = parse::<(u64, u64)>(rest)?;
                Ok(Self::UpdateCosts { mint_price, training_cost })
            }
            3 => Ok(Self::SetPublicSale { active: parse(rest)? }),
            4 => Ok(Self::SetPaused { paused: parse(rest)? }),
            5 => {
                let (owner, points, fighting_style, does) = parse::<(Pubkey, u32, u8, u64)>(rest)?;
                Ok(Self::CreateBuck { owner, points, fighting_style, does })
            }
            6 => Ok(Self::MintBuck { quantity: parse(rest)? }),
            7 => {
                let (attacker_id, defender_id) = parse::<(u64, u64)>(rest)?;
                Ok(Self::PrepareForFight { attacker_id, defender_id })
            }
            8 => {
                let (request_id, words) = parse::<(u64, Vec<u64>)>(rest)?;
                Ok(Self::FulfillRandomness { request_id, words })
            }
            9 => {
                let (attacker_id, defender_id) = parse::<(u64, u64)>(rest)?;
                Ok(Self::Fight { attacker_id, defender_id })
            }
            10 => {
                let (buck_id, buck_trait) = parse::<(u64, Trait)>(rest)?;
                Ok(Self::TrainBuck { buck_id, buck_trait })
            }
            11 => Ok(Self::EndSeason { buck_id: parse(rest)? }),
            12 => Ok(Self::AddToPrizePool { amount: parse(rest)? }),
            13 => {
                if !rest.is_empty() {
                    return Err(ProgramError::InvalidInstructionData);
                }
                Ok(Self::WithdrawRemainder)
            }
            14 => Ok(Self::MintBuckBatch { quantity: parse(rest)? }),
            15 => {
                let (recipient, quantity) = parse::<(Pubkey, u8)>(rest)?;
                Ok(Self::FreeMint { recipient, quantity })
            }
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }
}

//
// Addresses
//

pub fn game_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[GAME_SEED], program_id).0
}

pub fn prize_pool_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[PRIZE_POOL_SEED], program_id).0
}

pub fn buck_address(program_id: &Pubkey, buck_id: u64) -> Pubkey {
    Pubkey::find_program_address(&[BUCK_SEED, &buck_id.to_le_bytes()], program_id).0
}

pub fn fight_address(program_id: &Pubkey, attacker_id: u64) -> Pubkey {
    Pubkey::find_program_address(&[FIGHT_SEED, &attacker_id.to_le_bytes()], program_id).0
}

pub fn request_address(program_id: &Pubkey, request_id: u64) -> Pubkey {
    Pubkey::find_program_address(&[REQUEST_SEED, &request_id.to_le_bytes()], program_id).0
}

//
// Instruction builders
//

pub fn initialize_game(program_id: &Pubkey, admin: &Pubkey, settings: GameSettings) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::InitializeGame { settings },
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(game_address(program_id), false),
            AccountMeta::new(prize_pool_address(program_id), false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    )
}

fn admin_update(program_id: &Pubkey, admin: &Pubkey, data: &BuckInstruction) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        data,
        vec![
            AccountMeta::new_readonly(*admin, true),
            AccountMeta::new(game_address(program_id), false),
        ],
    )
}

pub fn set_oracle(program_id: &Pubkey, admin: &Pubkey, oracle: Pubkey) -> Instruction {
    admin_update(program_id, admin, &BuckInstruction::SetOracle { oracle })
}

pub fn update_costs(program_id: &Pubkey, admin: &Pubkey, mint_price: u64, training_cost: u64) -> Instruction {
    admin_update(program_id, admin, &BuckInstruction::UpdateCosts { mint_price, training_cost })
}

pub fn set_public_sale(program_id: &Pubkey, admin: &Pubkey, active: bool) -> Instruction {
    admin_update(program_id, admin, &BuckInstruction::SetPublicSale { active })
}

pub fn set_paused(program_id: &Pubkey, admin: &Pubkey, paused: bool) -> Instruction {
    admin_update(program_id, admin, &BuckInstruction::SetPaused { paused })
}

/// `buck_id` must be the game's next buck id.
pub fn create_buck(
    program_id: &Pubkey,
    admin: &Pubkey,
    buck_id: u64,
    owner: Pubkey,
    points: u32,
    fighting_style: u8,
    does: u64,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::CreateBuck { owner, points, fighting_style, does },
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(game_address(program_id), false),
            AccountMeta::new(prize_pool_address(program_id), false),
            AccountMeta::new(buck_address(program_id, buck_id), false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    )
}

fn mint_accounts(program_id: &Pubkey, payer: &Pubkey, first_buck_id: u64, quantity: u8) -> Vec<AccountMeta> {
    let mut accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(game_address(program_id), false),
        AccountMeta::new(prize_pool_address(program_id), false),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    accounts.extend(
        (first_buck_id..first_buck_id + u64::from(quantity))
            .map(|id| AccountMeta::new(buck_address(program_id, id), false)),
    );
    accounts
}

/// Mints `quantity` bucks with consecutive ids starting at `first_buck_id`.
pub fn mint_buck(program_id: &Pubkey, minter: &Pubkey, first_buck_id: u64, quantity: u8) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::MintBuck { quantity },
        mint_accounts(program_id, minter, first_buck_id, quantity),
    )
}

pub fn mint_buck_batch(program_id: &Pubkey, minter: &Pubkey, first_buck_id: u64, quantity: u8) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::MintBuckBatch { quantity },
        mint_accounts(program_id, minter, first_buck_id, quantity),
    )
}

pub fn free_mint(
    program_id: &Pubkey,
    admin: &Pubkey,
    first_buck_id: u64,
    recipient: Pubkey,
    quantity: u8,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::FreeMint { recipient, quantity },
        mint_accounts(program_id, admin, first_buck_id, quantity),
    )
}

/// `request_id` must be the game's next request id.
pub fn prepare_for_fight(
    program_id: &Pubkey,
    owner: &Pubkey,
    attacker_id: u64,
    defender_id: u64,
    request_id: u64,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::PrepareForFight { attacker_id, defender_id },
        vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(game_address(program_id), false),
            AccountMeta::new_readonly(buck_address(program_id, attacker_id), false),
            AccountMeta::new_readonly(buck_address(program_id, defender_id), false),
            AccountMeta::new(fight_address(program_id, attacker_id), false),
            AccountMeta::new(request_address(program_id, request_id), false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    )
}

pub fn fulfill_randomness(program_id: &Pubkey, oracle: &Pubkey, request_id: u64, words: Vec<u64>) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::FulfillRandomness { request_id, words },
        vec![
            AccountMeta::new_readonly(*oracle, true),
            AccountMeta::new_readonly(game_address(program_id), false),
            AccountMeta::new(request_address(program_id, request_id), false),
        ],
    )
}

pub fn fight(
    program_id: &Pubkey,
    owner: &Pubkey,
    attacker_id: u64,
    defender_id: u64,
    request_id: u64,
) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::Fight { attacker_id, defender_id },
        vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(game_address(program_id), false),
            AccountMeta::new(buck_address(program_id, attacker_id), false),
            AccountMeta::new(buck_address(program_id, defender_id), false),
            AccountMeta::new(fight_address(program_id, attacker_id), false),
            AccountMeta::new(request_address(program_id, request_id), false),
        ],
    )
}

pub fn train_buck(program_id: &Pubkey, owner: &Pubkey, buck_id: u64, buck_trait: Trait) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::TrainBuck { buck_id, buck_trait },
        vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(game_address(program_id), false),
            AccountMeta::new(prize_pool_address(program_id), false),
            AccountMeta::new(buck_address(program_id, buck_id), false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    )
}

pub fn end_season(program_id: &Pubkey, owner: &Pubkey, buck_id: u64) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::EndSeason { buck_id },
        vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new_readonly(game_address(program_id), false),
            AccountMeta::new(prize_pool_address(program_id), false),
            AccountMeta::new(buck_address(program_id, buck_id), false),
        ],
    )
}

pub fn add_to_prize_pool(program_id: &Pubkey, donor: &Pubkey, amount: u64) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::AddToPrizePool { amount },
        vec![
            AccountMeta::new(*donor, true),
            AccountMeta::new(prize_pool_address(program_id), false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
    )
}

pub fn withdraw_remainder(program_id: &Pubkey, admin: &Pubkey) -> Instruction {
    Instruction::new_with_borsh(
        *program_id,
        &BuckInstruction::WithdrawRemainder,
        vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(game_address(program_id), false),
            AccountMeta::new(prize_pool_address(program_id), false),
        ],
    )
}
