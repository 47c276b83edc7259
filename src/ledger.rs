// ledger.rs

use solana_program::pubkey::Pubkey;

use crate::error::BuckError;
use crate::state::PrizePool;

impl PrizePool {
    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn total_does(&self) -> u64 {
        self.total_does
    }

    fn authorize(&self, caller: &Pubkey) -> Result<(), BuckError> {
        if *caller != self.authority {
            return Err(BuckError::UnauthorizedLedgerCaller);
        }
        Ok(())
    }

    pub fn deposit(&mut self, amount: u64) -> Result<u64, BuckError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(BuckError::ArithmeticOverflow)?;
        Ok(self.balance)
    }

    pub fn update_total_does(&mut self, caller: &Pubkey, delta: i64) -> Result<u64, BuckError> {
        self.authorize(caller)?;
        self.total_does = self
            .total_does
            .checked_add_signed(delta)
            .ok_or(BuckError::ArithmeticOverflow)?;
        Ok(self.total_does)
    }

    /// Pays out a retiring buck's share of the pool and removes its does from
    /// the global total. Returns the lamports owed to the recipient.
    pub fn award(&mut self, caller: &Pubkey, does: u64) -> Result<u64, BuckError> {
        self.authorize(caller)?;
        if does == 0 {
            return Err(BuckError::NoResourceToClaim);
        }
        let payout = payout_share(self.balance, does, self.total_does)?;

        self.balance -= payout;
        self.total_does -= does;
        Ok(payout)
    }

    /// Empties the pool once the season is over.
    pub fn sweep(&mut self, caller: &Pubkey, now: i64) -> Result<u64, BuckError> {
        self.authorize(caller)?;
        if now < self.season_end {
            return Err(BuckError::SeasonOngoing);
        }
        let remainder = self.balance;
        self.balance = 0;
        Ok(remainder)
    }
}

/// `balance * does / total_does`, multiplied before dividing in 128 bits.
///
/// `does` may not exceed `total_does`, which keeps the share within `balance`.
pub fn payout_share(balance: u64, does: u64, total_does: u64) -> Result<u64, BuckError> {
    if total_does == 0 {
        return Err(BuckError::NoGlobalResource);
    }
    if does > total_does {
        return Err(BuckError::ArithmeticOverflow);
    }
    let share = u128::from(balance) * u128::from(does) / u128::from(total_does);
    u64::try_from(share).map_err(|_| BuckError::ArithmeticOverflow)
}
