// oracle.rs

use solana_program::pubkey::Pubkey;

use crate::constants::RANDOM_WORDS;
use crate::error::BuckError;
use crate::state::{GameConfig, RandomnessRequest};

/// Anything a fight can draw its random words from. Fight resolution only
/// sees this trait, so the backing oracle can change without touching it.
pub trait RandomnessSource {
    fn is_fulfilled(&self) -> bool;

    fn words(&self) -> Result<&[u64; RANDOM_WORDS], BuckError> {
        if !self.is_fulfilled() {
            return Err(BuckError::RandomnessNotReady);
        }
        Ok(self.fulfilled_words())
    }

    fn fulfilled_words(&self) -> &[u64; RANDOM_WORDS];
}

impl RandomnessSource for RandomnessRequest {
    fn is_fulfilled(&self) -> bool {
        self.fulfilled
    }

    fn fulfilled_words(&self) -> &[u64; RANDOM_WORDS] {
        &self.words
    }
}

impl RandomnessRequest {
    /// Stores the oracle's answer. Only the configured oracle may answer and
    /// each request is answered once.
    pub fn fulfill(
        &mut self,
        config: &GameConfig,
        signer: &Pubkey,
        request_id: u64,
        words: &[u64],
    ) -> Result<(), BuckError> {
        if *signer != config.oracle {
            return Err(BuckError::UnauthorizedOracle);
        }
        if self.request_id != request_id {
            return Err(BuckError::UnknownRequest);
        }
        if self.fulfilled {
            return Err(BuckError::RequestAlreadyFulfilled);
        }
        self.words = words
            .try_into()
            .map_err(|_| BuckError::InvalidRandomWords)?;
        self.fulfilled = true;
        Ok(())
    }
}
