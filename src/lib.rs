#![allow(unexpected_cfgs)]

pub mod combat;
pub mod constants;
pub mod error;
pub mod events;
pub mod genetics;
pub mod instruction;
pub mod ledger;
pub mod oracle;
pub mod processor;
pub mod state;

use solana_program::{
    account_info::AccountInfo,
    entrypoint,
    entrypoint::ProgramResult,
    pubkey::Pubkey,
};

use crate::instruction::BuckInstruction;
use crate::processor::MintKind;

entrypoint!(process_instruction);

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {

    // Unpack instruction data
    let instruction = BuckInstruction::unpack(instruction_data)?;

    match instruction {
        BuckInstruction::InitializeGame { settings } => {
            processor::initialize_game(program_id, accounts, settings)
        }
        BuckInstruction::SetOracle { oracle } => {
            processor::update_config(program_id, accounts, |config| config.oracle = oracle)
        }
        BuckInstruction::UpdateCosts { mint_price, training_cost } => {
            processor::update_config(program_id, accounts, |config| {
                config.mint_price = mint_price;
                config.training_cost = training_cost;
            })
        }
        BuckInstruction::SetPublicSale { active } => {
            processor::update_config(program_id, accounts, |config| config.public_sale = active)
        }
        BuckInstruction::SetPaused { paused } => {
            processor::update_config(program_id, accounts, |config| config.paused = paused)
        }
        BuckInstruction::CreateBuck { owner, points, fighting_style, does } => {
            processor::create_buck(program_id, accounts, owner, points, fighting_style, does)
        }
        BuckInstruction::MintBuck { quantity } => {
            processor::mint_buck(program_id, accounts, quantity, MintKind::Single)
        }
        BuckInstruction::MintBuckBatch { quantity } => {
            processor::mint_buck(program_id, accounts, quantity, MintKind::Batch)
        }
        BuckInstruction::FreeMint { recipient, quantity } => {
            processor::mint_buck(program_id, accounts, quantity, MintKind::Free { recipient })
        }
        BuckInstruction::PrepareForFight { attacker_id, defender_id } => {
            processor::prepare_for_fight(program_id, accounts, attacker_id, defender_id)
        }
        BuckInstruction::FulfillRandomness { request_id, words } => {
            processor::fulfill_randomness(program_id, accounts, request_id, words)
        }
        BuckInstruction::Fight { attacker_id, defender_id } => {
            processor::fight(program_id, accounts, attacker_id, defender_id)
        }
        BuckInstruction::TrainBuck { buck_id, buck_trait } => {
            processor::train_buck(program_id, accounts, buck_id, buck_trait)
        }
        BuckInstruction::EndSeason { buck_id } => {
            processor::end_season(program_id, accounts, buck_id)
        }
        BuckInstruction::AddToPrizePool { amount } => {
            processor::add_to_prize_pool(program_id, accounts, amount)
        }
        BuckInstruction::WithdrawRemainder => {
            processor::withdraw_remainder(program_id, accounts)
        }
    }
}

#[cfg(test)]
mod test;
