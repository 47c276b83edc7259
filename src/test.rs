#![cfg(test)]

use borsh::BorshDeserialize;
use crate::error::BuckError;
use crate::instruction::{
    add_to_prize_pool, buck_address, create_buck, free_mint, fulfill_randomness, game_address,
    initialize_game, mint_buck, mint_buck_batch, prepare_for_fight, prize_pool_address, request_address,
    set_oracle, set_public_sale, train_buck, update_costs, withdraw_remainder,
};
use crate::process_instruction;
use crate::state::{Buck, FightingStyle, GameConfig, GameSettings, PrizePool, RandomnessRequest, Trait};
use solana_program::{clock::Clock, pubkey::Pubkey, system_instruction};
use solana_program_test::*;
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};

const ONE_SOL: u64 = 1_000_000_000;

async fn start() -> (ProgramTestContext, Pubkey, Keypair) {
    let program_id = Pubkey::new_unique();
    let mut ctx = ProgramTest::new("crypdoe_bucks", program_id, processor!(process_instruction))
        .start_with_context()
        .await;

    let oracle = Keypair::new();
    let clock: Clock = ctx.banks_client.get_sysvar().await.unwrap();
    let settings = GameSettings {
        initial_prize: ONE_SOL,
        ..GameSettings::new(oracle.pubkey(), clock.unix_timestamp + 3_600)
    };

    let admin = ctx.payer.pubkey();
    send(&mut ctx, initialize_game(&program_id, &admin, settings), &[]).await.unwrap();

    (ctx, program_id, oracle)
}

// Payer always pays fees, so other signers' balances only move through the program
async fn send(
    ctx: &mut ProgramTestContext,
    instruction: Instruction,
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = ctx.get_new_latest_blockhash().await.unwrap();
    let mut all_signers = vec![&ctx.payer];
    all_signers.extend_from_slice(signers);

    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&ctx.payer.pubkey()),
        &all_signers,
        blockhash,
    );
    ctx.banks_client.process_transaction(transaction).await
}

async fn fund(ctx: &mut ProgramTestContext, recipient: &Pubkey, lamports: u64) {
    let payer = ctx.payer.pubkey();
    send(ctx, system_instruction::transfer(&payer, recipient, lamports), &[]).await.unwrap();
}

async fn read<T: BorshDeserialize>(ctx: &mut ProgramTestContext, address: Pubkey) -> T {
    let account = ctx
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .expect("account not found");
    T::deserialize(&mut &account.data[..]).unwrap()
}

fn assert_buck_error(result: Result<(), BanksClientError>, expected: BuckError) {
    assert_eq!(
        result.unwrap_err().unwrap(),
        TransactionError::InstructionError(0, InstructionError::Custom(expected as u32))
    );
}

#[tokio::test]
async fn test_initialize_game() {
    let (mut ctx, program_id, oracle) = start().await;

    let config: GameConfig = read(&mut ctx, game_address(&program_id)).await;
    assert_eq!(config.admin, ctx.payer.pubkey());
    assert_eq!(config.oracle, oracle.pubkey());
    assert!(!config.public_sale);
    assert!(!config.paused);
    assert_eq!(config.next_buck_id, 0);

    let pool: PrizePool = read(&mut ctx, prize_pool_address(&program_id)).await;
    assert_eq!(pool.authority, game_address(&program_id));
    assert_eq!(pool.balance, ONE_SOL);
    assert_eq!(pool.total_does, 0);

    let rent = ctx.banks_client.get_rent().await.unwrap();
    let lamports = ctx.banks_client.get_balance(prize_pool_address(&program_id)).await.unwrap();
    assert_eq!(lamports, rent.minimum_balance(PrizePool::SPACE) + ONE_SOL);

    // The game can only be set up once
    let admin = ctx.payer.pubkey();
    let again = initialize_game(&program_id, &admin, GameSettings::new(oracle.pubkey(), 0));
    assert!(send(&mut ctx, again, &[]).await.is_err());
}

#[tokio::test]
async fn test_admin_updates() {
    let (mut ctx, program_id, _oracle) = start().await;
    let admin = ctx.payer.pubkey();
    let stranger = Keypair::new();

    let new_oracle = Pubkey::new_unique();
    send(&mut ctx, set_oracle(&program_id, &admin, new_oracle), &[]).await.unwrap();
    send(&mut ctx, update_costs(&program_id, &admin, 7, 3), &[]).await.unwrap();
    send(&mut ctx, set_public_sale(&program_id, &admin, true), &[]).await.unwrap();

    let config: GameConfig = read(&mut ctx, game_address(&program_id)).await;
    assert_eq!(config.oracle, new_oracle);
    assert_eq!(config.mint_price, 7);
    assert_eq!(config.training_cost, 3);
    assert!(config.public_sale);

    let result = send(
        &mut ctx,
        set_oracle(&program_id, &stranger.pubkey(), stranger.pubkey()),
        &[&stranger],
    )
    .await;
    assert_buck_error(result, BuckError::Unauthorized);

    let result = send(
        &mut ctx,
        create_buck(&program_id, &stranger.pubkey(), 0, stranger.pubkey(), 99, 1, 99),
        &[&stranger],
    )
    .await;
    assert_buck_error(result, BuckError::Unauthorized);
}

#[tokio::test]
async fn test_create_buck() {
    let (mut ctx, program_id, _oracle) = start().await;
    let admin = ctx.payer.pubkey();
    let owner = Pubkey::new_unique();

    send(&mut ctx, create_buck(&program_id, &admin, 0, owner, 14, 1, 69), &[]).await.unwrap();
    send(&mut ctx, create_buck(&program_id, &admin, 1, owner, 2, 3, 31), &[]).await.unwrap();

    let buck: Buck = read(&mut ctx, buck_address(&program_id, 0)).await;
    assert_eq!(buck.id, 0);
    assert_eq!(buck.owner, owner);
    assert_eq!(buck.points, 14);
    assert_eq!(buck.fighting_style, FightingStyle::Aggressive);
    assert_eq!(buck.does, 69);
    assert_eq!(buck.ready_time, 0);

    let pool: PrizePool = read(&mut ctx, prize_pool_address(&program_id)).await;
    assert_eq!(pool.total_does, 100);

    let result = send(&mut ctx, create_buck(&program_id, &admin, 2, owner, 5, 4, 1), &[]).await;
    assert_buck_error(result, BuckError::InvalidFightingStyle);

    let config: GameConfig = read(&mut ctx, game_address(&program_id)).await;
    assert_eq!(config.next_buck_id, 2);
}

#[tokio::test]
async fn test_mint_buck() {
    let (mut ctx, program_id, _oracle) = start().await;
    let admin = ctx.payer.pubkey();
    let minter = Keypair::new();
    fund(&mut ctx, &minter.pubkey(), 2 * ONE_SOL).await;

    let result = send(&mut ctx, mint_buck(&program_id, &minter.pubkey(), 0, 1), &[&minter]).await;
    assert_buck_error(result, BuckError::PublicSaleInactive);

    send(&mut ctx, set_public_sale(&program_id, &admin, true), &[]).await.unwrap();

    let result = send(&mut ctx, mint_buck(&program_id, &minter.pubkey(), 0, 0), &[&minter]).await;
    assert_buck_error(result, BuckError::InvalidQuantity);
    let result = send(&mut ctx, mint_buck(&program_id, &minter.pubkey(), 0, 11), &[&minter]).await;
    assert_buck_error(result, BuckError::InvalidQuantity);

    let before = ctx.banks_client.get_balance(minter.pubkey()).await.unwrap();
    send(&mut ctx, mint_buck(&program_id, &minter.pubkey(), 0, 2), &[&minter]).await.unwrap();
    let after = ctx.banks_client.get_balance(minter.pubkey()).await.unwrap();

    let config: GameConfig = read(&mut ctx, game_address(&program_id)).await;
    let rent = ctx.banks_client.get_rent().await.unwrap();
    assert_eq!(before - after, 2 * config.mint_price + 2 * rent.minimum_balance(Buck::SPACE));
    assert_eq!(config.next_buck_id, 2);

    let mut minted_does = 0;
    for id in 0..2 {
        let buck: Buck = read(&mut ctx, buck_address(&program_id, id)).await;
        assert_eq!(buck.id, id);
        assert_eq!(buck.owner, minter.pubkey());
        assert!(buck.does >= 1);
        minted_does += buck.does;
    }

    let pool: PrizePool = read(&mut ctx, prize_pool_address(&program_id)).await;
    assert_eq!(pool.balance, ONE_SOL + 2 * config.mint_price);
    assert_eq!(pool.total_does, minted_does);

    // Too poor to pay for the next buck
    let broke = Keypair::new();
    fund(&mut ctx, &broke.pubkey(), config.mint_price / 2).await;
    let result = send(&mut ctx, mint_buck(&program_id, &broke.pubkey(), 2, 1), &[&broke]).await;
    assert_buck_error(result, BuckError::InsufficientPayment);
}

#[tokio::test]
async fn test_batch_mint() {
    let (mut ctx, program_id, _oracle) = start().await;
    let admin = ctx.payer.pubkey();
    let minter = Keypair::new();
    fund(&mut ctx, &minter.pubkey(), 2 * ONE_SOL).await;

    let result = send(&mut ctx, mint_buck_batch(&program_id, &minter.pubkey(), 0, 5), &[&minter]).await;
    assert_buck_error(result, BuckError::PublicSaleInactive);

    send(&mut ctx, set_public_sale(&program_id, &admin, true), &[]).await.unwrap();

    let result = send(&mut ctx, mint_buck_batch(&program_id, &minter.pubkey(), 0, 3), &[&minter]).await;
    assert_buck_error(result, BuckError::InvalidBatchSize);
    let result = send(&mut ctx, mint_buck_batch(&program_id, &minter.pubkey(), 0, 21), &[&minter]).await;
    assert_buck_error(result, BuckError::InvalidBatchSize);

    let before = ctx.banks_client.get_balance(minter.pubkey()).await.unwrap();
    send(&mut ctx, mint_buck_batch(&program_id, &minter.pubkey(), 0, 5), &[&minter])
        .await
        .unwrap();
    let after = ctx.banks_client.get_balance(minter.pubkey()).await.unwrap();

    let config: GameConfig = read(&mut ctx, game_address(&program_id)).await;
    let rent = ctx.banks_client.get_rent().await.unwrap();
    let batch_price = 5 * (config.mint_price * 95 / 100);
    assert_eq!(before - after, batch_price + 5 * rent.minimum_balance(Buck::SPACE));
    assert_eq!(config.next_buck_id, 5);

    for id in 0..5 {
        let buck: Buck = read(&mut ctx, buck_address(&program_id, id)).await;
        assert_eq!(buck.owner, minter.pubkey());
    }

    let pool: PrizePool = read(&mut ctx, prize_pool_address(&program_id)).await;
    assert_eq!(pool.balance, ONE_SOL + batch_price);
}

#[tokio::test]
async fn test_free_mint() {
    let (mut ctx, program_id, _oracle) = start().await;
    let admin = ctx.payer.pubkey();
    let recipient = Pubkey::new_unique();
    let stranger = Keypair::new();
    fund(&mut ctx, &stranger.pubkey(), ONE_SOL).await;

    let result = send(
        &mut ctx,
        free_mint(&program_id, &stranger.pubkey(), 0, stranger.pubkey(), 1),
        &[&stranger],
    )
    .await;
    assert_buck_error(result, BuckError::Unauthorized);

    let result = send(&mut ctx, free_mint(&program_id, &admin, 0, recipient, 0), &[]).await;
    assert_buck_error(result, BuckError::InvalidQuantity);

    // Works without a public sale and costs nothing but rent
    send(&mut ctx, free_mint(&program_id, &admin, 0, recipient, 3), &[]).await.unwrap();

    let mut minted_does = 0;
    for id in 0..3 {
        let buck: Buck = read(&mut ctx, buck_address(&program_id, id)).await;
        assert_eq!(buck.owner, recipient);
        minted_does += buck.does;
    }

    let pool: PrizePool = read(&mut ctx, prize_pool_address(&program_id)).await;
    assert_eq!(pool.balance, ONE_SOL);
    assert_eq!(pool.total_does, minted_does);
}

#[tokio::test]
async fn test_train_buck() {
    let (mut ctx, program_id, _oracle) = start().await;
    let admin = ctx.payer.pubkey();
    let owner = Keypair::new();
    let stranger = Keypair::new();
    fund(&mut ctx, &owner.pubkey(), ONE_SOL).await;
    fund(&mut ctx, &stranger.pubkey(), ONE_SOL).await;

    send(&mut ctx, create_buck(&program_id, &admin, 0, owner.pubkey(), 10, 2, 5), &[]).await.unwrap();
    let before: Buck = read(&mut ctx, buck_address(&program_id, 0)).await;
    let owner_before = ctx.banks_client.get_balance(owner.pubkey()).await.unwrap();

    send(&mut ctx, train_buck(&program_id, &owner.pubkey(), 0, Trait::Strength), &[&owner])
        .await
        .unwrap();

    let after: Buck = read(&mut ctx, buck_address(&program_id, 0)).await;
    assert_eq!(after.genetics.strength, before.genetics.strength + 1);
    assert_eq!(after.genetics.speed, before.genetics.speed);

    let config: GameConfig = read(&mut ctx, game_address(&program_id)).await;
    let owner_after = ctx.banks_client.get_balance(owner.pubkey()).await.unwrap();
    assert_eq!(owner_before - owner_after, config.training_cost);

    let pool: PrizePool = read(&mut ctx, prize_pool_address(&program_id)).await;
    assert_eq!(pool.balance, ONE_SOL + config.training_cost);

    let result = send(
        &mut ctx,
        train_buck(&program_id, &stranger.pubkey(), 0, Trait::Speed),
        &[&stranger],
    )
    .await;
    assert_buck_error(result, BuckError::NotOwner);

    let result = send(
        &mut ctx,
        train_buck(&program_id, &owner.pubkey(), 7, Trait::Speed),
        &[&owner],
    )
    .await;
    assert_buck_error(result, BuckError::UnknownBuck);
}

#[tokio::test]
async fn test_prize_pool_funding() {
    let (mut ctx, program_id, _oracle) = start().await;
    let admin = ctx.payer.pubkey();
    let donor = Keypair::new();
    fund(&mut ctx, &donor.pubkey(), ONE_SOL).await;

    let result = send(&mut ctx, add_to_prize_pool(&program_id, &donor.pubkey(), 0), &[&donor]).await;
    assert_buck_error(result, BuckError::InsufficientPayment);

    send(&mut ctx, add_to_prize_pool(&program_id, &donor.pubkey(), ONE_SOL / 2), &[&donor])
        .await
        .unwrap();
    let pool: PrizePool = read(&mut ctx, prize_pool_address(&program_id)).await;
    assert_eq!(pool.balance, ONE_SOL + ONE_SOL / 2);

    // Leftovers stay locked until the season ends
    let result = send(&mut ctx, withdraw_remainder(&program_id, &admin), &[]).await;
    assert_buck_error(result, BuckError::SeasonOngoing);

    let mut clock: Clock = ctx.banks_client.get_sysvar().await.unwrap();
    clock.unix_timestamp = pool.season_end;
    ctx.set_sysvar(&clock);

    let result = send(
        &mut ctx,
        withdraw_remainder(&program_id, &donor.pubkey()),
        &[&donor],
    )
    .await;
    assert_buck_error(result, BuckError::Unauthorized);

    let rent = ctx.banks_client.get_rent().await.unwrap();
    send(&mut ctx, withdraw_remainder(&program_id, &admin), &[]).await.unwrap();

    let pool: PrizePool = read(&mut ctx, prize_pool_address(&program_id)).await;
    assert_eq!(pool.balance, 0);
    let lamports = ctx.banks_client.get_balance(prize_pool_address(&program_id)).await.unwrap();
    assert_eq!(lamports, rent.minimum_balance(PrizePool::SPACE));
}

#[tokio::test]
async fn test_oracle_fulfillment() {
    let (mut ctx, program_id, oracle) = start().await;
    let admin = ctx.payer.pubkey();
    let owner = Keypair::new();
    fund(&mut ctx, &owner.pubkey(), ONE_SOL).await;

    send(&mut ctx, create_buck(&program_id, &admin, 0, owner.pubkey(), 3, 1, 1), &[]).await.unwrap();
    send(&mut ctx, create_buck(&program_id, &admin, 1, admin, 3, 2, 1), &[]).await.unwrap();
    send(&mut ctx, prepare_for_fight(&program_id, &owner.pubkey(), 0, 1, 0), &[&owner])
        .await
        .unwrap();

    let request: RandomnessRequest = read(&mut ctx, request_address(&program_id, 0)).await;
    assert_eq!(request.attacker_id, 0);
    assert!(!request.fulfilled);

    // Only the configured oracle answers
    let result = send(
        &mut ctx,
        fulfill_randomness(&program_id, &owner.pubkey(), 0, vec![1; 6]),
        &[&owner],
    )
    .await;
    assert_buck_error(result, BuckError::UnauthorizedOracle);

    let result = send(
        &mut ctx,
        fulfill_randomness(&program_id, &oracle.pubkey(), 0, vec![1; 5]),
        &[&oracle],
    )
    .await;
    assert_buck_error(result, BuckError::InvalidRandomWords);

    let result = send(
        &mut ctx,
        fulfill_randomness(&program_id, &oracle.pubkey(), 3, vec![1; 6]),
        &[&oracle],
    )
    .await;
    assert_buck_error(result, BuckError::UnknownRequest);

    send(
        &mut ctx,
        fulfill_randomness(&program_id, &oracle.pubkey(), 0, vec![1, 2, 3, 4, 5, 6]),
        &[&oracle],
    )
    .await
    .unwrap();

    let request: RandomnessRequest = read(&mut ctx, request_address(&program_id, 0)).await;
    assert!(request.fulfilled);
    assert_eq!(request.words, [1, 2, 3, 4, 5, 6]);

    let result = send(
        &mut ctx,
        fulfill_randomness(&program_id, &oracle.pubkey(), 0, vec![9; 6]),
        &[&oracle],
    )
    .await;
    assert_buck_error(result, BuckError::RequestAlreadyFulfilled);
}
