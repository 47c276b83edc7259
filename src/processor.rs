// processor.rs

use borsh::{BorshDeserialize, BorshSerialize};

use crate::combat::{self, FightRolls, StyleOutcome};
use crate::constants::{
    BUCK_SEED, FIGHT_SEED, GAME_SEED, MAX_BATCH_MINT, PRIZE_POOL_SEED, REQUEST_SEED,
};
use crate::error::BuckError;
use crate::events::BuckEvent;
use crate::genetics::{self, RolledStats};
use crate::oracle::RandomnessSource;
use crate::state::{
    Buck, FightingStyle, GameConfig, GameSettings, PendingFight, PrizePool, RandomnessRequest,
    Trait,
};

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    program_error::ProgramError,
    pubkey::Pubkey,
    program::{invoke, invoke_signed},
    sysvar::{rent::Rent, Sysvar},
    system_program,
    system_instruction,
    msg,
    clock::Clock,
};

//
// Account helpers
//

fn require_signer(account: &AccountInfo) -> ProgramResult {
    if !account.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

/// Checks that `account` sits at the PDA derived from `seeds` and returns its bump.
fn require_pda(program_id: &Pubkey, account: &AccountInfo, seeds: &[&[u8]]) -> Result<u8, ProgramError> {
    let (pda, bump) = Pubkey::find_program_address(seeds, program_id);
    if pda != *account.key {
        return Err(ProgramError::InvalidArgument);
    }
    Ok(bump)
}

fn is_initialized(program_id: &Pubkey, account: &AccountInfo) -> bool {
    account.owner == program_id && !account.data_is_empty() && account.lamports() > 0
}

fn load<T: BorshDeserialize>(program_id: &Pubkey, account: &AccountInfo) -> Result<T, ProgramError> {
    if account.owner != program_id {
        return Err(ProgramError::IncorrectProgramId);
    }
    let data = account.try_borrow_data()?;
    T::deserialize(&mut &data[..]).map_err(|_| ProgramError::InvalidAccountData)
}

fn store<T: BorshSerialize>(value: &T, account: &AccountInfo) -> ProgramResult {
    value.serialize(&mut &mut account.try_borrow_mut_data()?[..])?;
    Ok(())
}

fn create_pda_account<'a>(
    program_id: &Pubkey,
    payer: &AccountInfo<'a>,
    account: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    space: usize,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    if *system_program.key != system_program::ID {
        return Err(ProgramError::InvalidArgument);
    }

    let rent = Rent::get()?;
    let required_lamports = rent.minimum_balance(space);

    if account.lamports() == 0 {
        return invoke_signed(
            &system_instruction::create_account(
                payer.key,
                account.key,
                required_lamports,
                space as u64,
                program_id,
            ),
            &[payer.clone(), account.clone(), system_program.clone()],
            &[signer_seeds],
        );
    }

    // Someone already sent lamports to the address, so create_account would
    // fail. Top it up and claim it instead.
    let top_up = required_lamports.saturating_sub(account.lamports());
    if top_up > 0 {
        invoke(
            &system_instruction::transfer(payer.key, account.key, top_up),
            &[payer.clone(), account.clone(), system_program.clone()],
        )?;
    }
    invoke_signed(
        &system_instruction::allocate(account.key, space as u64),
        &[account.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(account.key, program_id),
        &[account.clone(), system_program.clone()],
        &[signer_seeds],
    )
}

fn transfer_in<'a>(
    payer: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    if *system_program.key != system_program::ID {
        return Err(ProgramError::InvalidArgument);
    }
    if payer.lamports() < amount {
        return Err(BuckError::InsufficientPayment.into());
    }

    invoke(
        &system_instruction::transfer(payer.key, destination.key, amount),
        &[payer.clone(), destination.clone(), system_program.clone()],
    )
}

/// Moves lamports out of an account this program owns.
fn transfer_out(source: &AccountInfo, destination: &AccountInfo, amount: u64) -> ProgramResult {
    let source_balance = source
        .lamports()
        .checked_sub(amount)
        .ok_or(ProgramError::InsufficientFunds)?;
    let destination_balance = destination
        .lamports()
        .checked_add(amount)
        .ok_or(BuckError::ArithmeticOverflow)?;

    **source.try_borrow_mut_lamports()? = source_balance;
    **destination.try_borrow_mut_lamports()? = destination_balance;
    Ok(())
}

/// Drains and wipes an account; the runtime drops it at the end of the transaction.
fn close_account(account: &AccountInfo, destination: &AccountInfo) -> ProgramResult {
    transfer_out(account, destination, account.lamports())?;
    account.try_borrow_mut_data()?.fill(0);
    Ok(())
}

fn load_game(program_id: &Pubkey, game_account: &AccountInfo) -> Result<GameConfig, ProgramError> {
    require_pda(program_id, game_account, &[GAME_SEED])?;
    load(program_id, game_account)
}

fn load_pool(program_id: &Pubkey, pool_account: &AccountInfo) -> Result<PrizePool, ProgramError> {
    require_pda(program_id, pool_account, &[PRIZE_POOL_SEED])?;
    load(program_id, pool_account)
}

fn load_buck(program_id: &Pubkey, buck_account: &AccountInfo, buck_id: u64) -> Result<Buck, ProgramError> {
    require_pda(program_id, buck_account, &[BUCK_SEED, &buck_id.to_le_bytes()])?;
    if !is_initialized(program_id, buck_account) {
        return Err(BuckError::UnknownBuck.into());
    }
    load(program_id, buck_account)
}

fn require_admin(config: &GameConfig, signer: &AccountInfo) -> ProgramResult {
    require_signer(signer)?;
    if *signer.key != config.admin {
        return Err(BuckError::Unauthorized.into());
    }
    Ok(())
}

fn require_owner(buck: &Buck, signer: &AccountInfo) -> ProgramResult {
    if buck.owner != *signer.key {
        return Err(BuckError::NotOwner.into());
    }
    Ok(())
}

fn does_delta(does: u64) -> Result<i64, BuckError> {
    i64::try_from(does).map_err(|_| BuckError::ArithmeticOverflow)
}

//
// Game setup and admin
//

pub fn initialize_game(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    settings: GameSettings,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let admin = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let pool_account = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    require_signer(admin)?;

    let game_bump = require_pda(program_id, game_account, &[GAME_SEED])?;
    let pool_bump = require_pda(program_id, pool_account, &[PRIZE_POOL_SEED])?;

    create_pda_account(
        program_id,
        admin,
        game_account,
        system_program,
        GameConfig::SPACE,
        &[GAME_SEED, &[game_bump]],
    )?;
    create_pda_account(
        program_id,
        admin,
        pool_account,
        system_program,
        PrizePool::SPACE,
        &[PRIZE_POOL_SEED, &[pool_bump]],
    )?;

    let mut pool = PrizePool {
        authority: *game_account.key,
        balance: 0,
        total_does: 0,
        season_end: settings.season_end,
        bump: pool_bump,
    };
    if settings.initial_prize > 0 {
        transfer_in(admin, pool_account, system_program, settings.initial_prize)?;
        pool.deposit(settings.initial_prize)?;
    }

    let config = GameConfig::new(*admin.key, &settings, game_bump);

    store(&config, game_account)?;
    store(&pool, pool_account)?;

    msg!(
        "Game initialized: admin {} oracle {} cooldown {}s prize {}",
        config.admin,
        config.oracle,
        config.cooldown_secs,
        pool.balance
    );
    Ok(())
}

/// Applies an admin-only change to the game config.
pub fn update_config(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    apply: impl FnOnce(&mut GameConfig),
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let admin = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;

    let mut config = load_game(program_id, game_account)?;
    require_admin(&config, admin)?;

    apply(&mut config);
    store(&config, game_account)?;

    msg!("Game config updated");
    Ok(())
}

//
// Buck creation
//

fn spawn_buck<'a>(
    program_id: &Pubkey,
    payer: &AccountInfo<'a>,
    buck_account: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    game_key: &Pubkey,
    config: &mut GameConfig,
    pool: &mut PrizePool,
    owner: Pubkey,
    roll: impl FnOnce(u64) -> Result<RolledStats, BuckError>,
) -> Result<Buck, ProgramError> {
    let id = config.take_buck_id()?;
    let id_bytes = id.to_le_bytes();
    let bump = require_pda(program_id, buck_account, &[BUCK_SEED, &id_bytes])?;

    let stats = roll(id)?;

    create_pda_account(
        program_id,
        payer,
        buck_account,
        system_program,
        Buck::SPACE,
        &[BUCK_SEED, &id_bytes, &[bump]],
    )?;

    let buck = Buck {
        id,
        owner,
        points: stats.points,
        fighting_style: stats.fighting_style,
        does: stats.does,
        ready_time: 0,
        genetics: stats.genetics,
    };
    pool.update_total_does(game_key, does_delta(buck.does)?)?;
    store(&buck, buck_account)?;

    BuckEvent::NewBuck {
        id,
        owner,
        points: buck.points,
        does: buck.does,
    }
    .emit();

    Ok(buck)
}

pub fn create_buck(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    owner: Pubkey,
    points: u32,
    fighting_style: u8,
    does: u64,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let admin = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let pool_account = next_account_info(accounts_iter)?;
    let buck_account = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    let mut config = load_game(program_id, game_account)?;
    require_admin(&config, admin)?;
    let mut pool = load_pool(program_id, pool_account)?;

    let fighting_style = FightingStyle::from_index(fighting_style)?;
    let slot = Clock::get()?.slot;

    spawn_buck(
        program_id,
        admin,
        buck_account,
        system_program,
        game_account.key,
        &mut config,
        &mut pool,
        owner,
        |id| {
            Ok(RolledStats {
                points,
                fighting_style,
                does,
                genetics: genetics::roll_genetics(&genetics::seed(slot, id, &owner)),
            })
        },
    )?;

    store(&config, game_account)?;
    store(&pool, pool_account)?;
    Ok(())
}

/// Who a mint is for and how it is paid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MintKind {
    /// Public sale at full price, up to `max_mints_per_tx`.
    Single,
    /// Public sale of 5 to 20 bucks at the batch discount.
    Batch,
    /// Admin gift to `recipient`; nothing is paid.
    Free { recipient: Pubkey },
}

pub fn mint_buck(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    quantity: u8,
    kind: MintKind,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let payer = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let pool_account = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    require_signer(payer)?;

    let mut config = load_game(program_id, game_account)?;
    let mut pool = load_pool(program_id, pool_account)?;

    let (owner, price) = match kind {
        MintKind::Single | MintKind::Batch => {
            if !config.public_sale {
                return Err(BuckError::PublicSaleInactive.into());
            }
            (*payer.key, config.mint_cost(quantity, kind == MintKind::Batch)?)
        }
        MintKind::Free { recipient } => {
            require_admin(&config, payer)?;
            if quantity == 0 || quantity > MAX_BATCH_MINT {
                return Err(BuckError::InvalidQuantity.into());
            }
            (recipient, 0)
        }
    };

    if price > 0 {
        transfer_in(payer, pool_account, system_program, price)?;
        pool.deposit(price)?;
    }

    let slot = Clock::get()?.slot;
    for _ in 0..quantity {
        let buck_account = next_account_info(accounts_iter)?;
        spawn_buck(
            program_id,
            payer,
            buck_account,
            system_program,
            game_account.key,
            &mut config,
            &mut pool,
            owner,
            |id| genetics::roll_stats(&genetics::seed(slot, id, &owner)),
        )?;
    }

    store(&config, game_account)?;
    store(&pool, pool_account)?;

    if price > 0 {
        BuckEvent::PrizePoolIncreased { amount: price, balance: pool.balance() }.emit();
    }
    Ok(())
}

//
// Fights
//

pub fn prepare_for_fight(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    attacker_id: u64,
    defender_id: u64,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let owner = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let attacker_account = next_account_info(accounts_iter)?;
    let defender_account = next_account_info(accounts_iter)?;
    let fight_account = next_account_info(accounts_iter)?;
    let request_account = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    require_signer(owner)?;

    let mut config = load_game(program_id, game_account)?;
    if config.paused {
        return Err(BuckError::Paused.into());
    }
    if attacker_id == defender_id {
        return Err(BuckError::SelfFight.into());
    }

    let attacker = load_buck(program_id, attacker_account, attacker_id)?;
    load_buck(program_id, defender_account, defender_id)?;
    require_owner(&attacker, owner)?;

    let now = Clock::get()?.unix_timestamp;
    if !attacker.is_ready(now) {
        return Err(BuckError::NotReady.into());
    }

    // One open fight per attacker; a resolved record is reused.
    let attacker_bytes = attacker_id.to_le_bytes();
    let fight_bump = require_pda(program_id, fight_account, &[FIGHT_SEED, &attacker_bytes])?;
    if is_initialized(program_id, fight_account) {
        let previous: PendingFight = load(program_id, fight_account)?;
        if !previous.resolved {
            return Err(BuckError::FightAlreadyPending.into());
        }
    } else {
        create_pda_account(
            program_id,
            owner,
            fight_account,
            system_program,
            PendingFight::SPACE,
            &[FIGHT_SEED, &attacker_bytes, &[fight_bump]],
        )?;
    }

    let request_id = config.take_request_id()?;
    let request_bytes = request_id.to_le_bytes();
    let request_bump = require_pda(program_id, request_account, &[REQUEST_SEED, &request_bytes])?;
    create_pda_account(
        program_id,
        owner,
        request_account,
        system_program,
        RandomnessRequest::SPACE,
        &[REQUEST_SEED, &request_bytes, &[request_bump]],
    )?;

    store(&RandomnessRequest::pending(request_id, attacker_id, now), request_account)?;
    store(&PendingFight::open(attacker_id, defender_id, request_id), fight_account)?;
    store(&config, game_account)?;

    BuckEvent::FightInitiated {
        attacker_id,
        defender_id,
        request_id,
    }
    .emit();
    Ok(())
}

pub fn fulfill_randomness(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    request_id: u64,
    words: Vec<u64>,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let oracle = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let request_account = next_account_info(accounts_iter)?;

    require_signer(oracle)?;
    let config = load_game(program_id, game_account)?;

    let (request_pda, _) =
        Pubkey::find_program_address(&[REQUEST_SEED, &request_id.to_le_bytes()], program_id);
    if request_pda != *request_account.key || !is_initialized(program_id, request_account) {
        return Err(BuckError::UnknownRequest.into());
    }

    let mut request: RandomnessRequest = load(program_id, request_account)?;
    request.fulfill(&config, oracle.key, request_id, &words)?;
    store(&request, request_account)?;

    BuckEvent::RandomnessFulfilled { request_id }.emit();
    Ok(())
}

pub fn fight(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    attacker_id: u64,
    defender_id: u64,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let owner = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let attacker_account = next_account_info(accounts_iter)?;
    let defender_account = next_account_info(accounts_iter)?;
    let fight_account = next_account_info(accounts_iter)?;
    let request_account = next_account_info(accounts_iter)?;

    require_signer(owner)?;
    let config = load_game(program_id, game_account)?;

    let mut attacker = load_buck(program_id, attacker_account, attacker_id)?;
    require_owner(&attacker, owner)?;

    require_pda(program_id, fight_account, &[FIGHT_SEED, &attacker_id.to_le_bytes()])?;
    if !is_initialized(program_id, fight_account) {
        return Err(BuckError::NoPendingFight.into());
    }
    let mut pending: PendingFight = load(program_id, fight_account)?;
    if pending.defender_id != defender_id {
        return Err(BuckError::NoPendingFight.into());
    }
    if pending.resolved {
        return Err(BuckError::AlreadyResolved.into());
    }

    let (request_pda, _) = Pubkey::find_program_address(
        &[REQUEST_SEED, &pending.request_id.to_le_bytes()],
        program_id,
    );
    if request_pda != *request_account.key {
        return Err(BuckError::RequestMismatch.into());
    }
    if !is_initialized(program_id, request_account) {
        return Err(BuckError::UnknownRequest.into());
    }

    // A defender retired mid-fight leaves nothing to fight; release the attacker
    require_pda(program_id, defender_account, &[BUCK_SEED, &defender_id.to_le_bytes()])?;
    if !is_initialized(program_id, defender_account) {
        pending.resolved = true;
        store(&pending, fight_account)?;
        close_account(request_account, owner)?;

        BuckEvent::FightCancelled {
            attacker_id,
            defender_id,
            request_id: pending.request_id,
        }
        .emit();
        return Ok(());
    }

    let request: RandomnessRequest = load(program_id, request_account)?;
    let rolls = FightRolls::from_words(request.words()?);

    let mut defender = load_buck(program_id, defender_account, defender_id)?;
    let report = combat::resolve(&attacker, &defender, &rolls);

    msg!(
        "Power {} vs {} (crit {}/{}, special {}/{})",
        report.attacker.power,
        report.defender.power,
        report.attacker.critical_hit,
        report.defender.critical_hit,
        report.attacker.special_ability,
        report.defender.special_ability
    );

    // Loser forfeits every doe it holds
    let does_moved = match report.outcome {
        StyleOutcome::AttackerWins => {
            let moved = defender.does;
            attacker.does = attacker.does.checked_add(moved).ok_or(BuckError::ArithmeticOverflow)?;
            defender.does = 0;
            moved
        }
        StyleOutcome::DefenderWins => {
            let moved = attacker.does;
            defender.does = defender.does.checked_add(moved).ok_or(BuckError::ArithmeticOverflow)?;
            attacker.does = 0;
            moved
        }
        StyleOutcome::Draw => 0,
    };

    let now = Clock::get()?.unix_timestamp;
    attacker.ready_time = now
        .checked_add(config.cooldown_secs)
        .ok_or(BuckError::ArithmeticOverflow)?;
    pending.resolved = true;

    store(&attacker, attacker_account)?;
    store(&defender, defender_account)?;
    store(&pending, fight_account)?;
    close_account(request_account, owner)?;

    BuckEvent::FightConcluded {
        attacker_id,
        defender_id,
        outcome: report.outcome,
        does_moved,
    }
    .emit();
    Ok(())
}

//
// Training and settlement
//

pub fn train_buck(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    buck_id: u64,
    buck_trait: Trait,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let owner = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let pool_account = next_account_info(accounts_iter)?;
    let buck_account = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    require_signer(owner)?;
    let config = load_game(program_id, game_account)?;
    let mut pool = load_pool(program_id, pool_account)?;

    let mut buck = load_buck(program_id, buck_account, buck_id)?;
    require_owner(&buck, owner)?;

    let value = buck.genetics.train(buck_trait)?;

    transfer_in(owner, pool_account, system_program, config.training_cost)?;
    let balance = pool.deposit(config.training_cost)?;

    store(&buck, buck_account)?;
    store(&pool, pool_account)?;

    BuckEvent::BuckTrained {
        id: buck_id,
        buck_trait,
        value,
    }
    .emit();
    BuckEvent::PrizePoolIncreased {
        amount: config.training_cost,
        balance,
    }
    .emit();
    Ok(())
}

pub fn end_season(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    buck_id: u64,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let owner = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let pool_account = next_account_info(accounts_iter)?;
    let buck_account = next_account_info(accounts_iter)?;

    require_signer(owner)?;
    let config = load_game(program_id, game_account)?;
    if config.paused {
        return Err(BuckError::Paused.into());
    }

    let buck = load_buck(program_id, buck_account, buck_id)?;
    require_owner(&buck, owner)?;
    if buck.does == 0 {
        return Err(BuckError::NoResourceToClaim.into());
    }

    let mut pool = load_pool(program_id, pool_account)?;
    let payout = pool.award(game_account.key, buck.does)?;

    transfer_out(pool_account, owner, payout)?;
    store(&pool, pool_account)?;
    close_account(buck_account, owner)?;

    BuckEvent::EndSeason { buck_id, payout }.emit();
    Ok(())
}

//
// Prize pool funding
//

pub fn add_to_prize_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let donor = next_account_info(accounts_iter)?;
    let pool_account = next_account_info(accounts_iter)?;
    let system_program = next_account_info(accounts_iter)?;

    require_signer(donor)?;
    if amount == 0 {
        return Err(BuckError::InsufficientPayment.into());
    }

    let mut pool = load_pool(program_id, pool_account)?;
    transfer_in(donor, pool_account, system_program, amount)?;
    let balance = pool.deposit(amount)?;
    store(&pool, pool_account)?;

    BuckEvent::PrizePoolIncreased { amount, balance }.emit();
    Ok(())
}

pub fn withdraw_remainder(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let admin = next_account_info(accounts_iter)?;
    let game_account = next_account_info(accounts_iter)?;
    let pool_account = next_account_info(accounts_iter)?;

    let config = load_game(program_id, game_account)?;
    require_admin(&config, admin)?;

    let mut pool = load_pool(program_id, pool_account)?;
    let now = Clock::get()?.unix_timestamp;
    let remainder = pool.sweep(game_account.key, now)?;

    transfer_out(pool_account, admin, remainder)?;
    store(&pool, pool_account)?;

    msg!("Withdrew {} lamports from the prize pool", remainder);
    Ok(())
}
