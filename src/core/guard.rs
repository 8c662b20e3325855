//! Confirmation friction for deleting a friend.
//!
//! The user must retype the friend's number and answer a small addition problem.
//! This is a UI speed bump, not a security boundary: the challenge is generated and
//! checked locally and never sent to the store.

use crate::{
    entities::friend,
    errors::{Error, Result},
};
use rand::Rng;
use tracing::warn;

/// Smallest operand of the challenge.
pub const MIN_OPERAND: u8 = 1;
/// Largest operand of the challenge.
pub const MAX_OPERAND: u8 = 10;

const fn clamp_operand(value: u8) -> u8 {
    if value < MIN_OPERAND {
        MIN_OPERAND
    } else if value > MAX_OPERAND {
        MAX_OPERAND
    } else {
        value
    }
}

/// An addition challenge `left + right = ?` guarding a friend delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteGuard {
    left: u8,
    right: u8,
}

impl Default for DeleteGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteGuard {
    /// Generates a fresh challenge from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    /// Generates a fresh challenge from the given RNG.
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            left: rng.gen_range(MIN_OPERAND..=MAX_OPERAND),
            right: rng.gen_range(MIN_OPERAND..=MAX_OPERAND),
        }
    }

    /// Builds a challenge with fixed operands, clamped to `MIN_OPERAND..=MAX_OPERAND`.
    #[must_use]
    pub const fn from_operands(left: u8, right: u8) -> Self {
        Self {
            left: clamp_operand(left),
            right: clamp_operand(right),
        }
    }

    /// The expected answer.
    #[must_use]
    pub const fn answer(&self) -> u8 {
        self.left + self.right
    }

    /// Text shown to the user, e.g. `3 + 4 = ?`.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("{} + {} = ?", self.left, self.right)
    }

    /// Replaces the challenge with a new one drawn from `rng`.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::with_rng(rng);
    }

    /// Checks the user's confirmation input for deleting `friend`.
    ///
    /// The number is checked first and a mismatch leaves the challenge as is. A wrong
    /// or unparsable captcha answer regenerates the challenge.
    pub fn verify(
        &mut self,
        friend: &friend::Model,
        number_input: &str,
        captcha_input: &str,
    ) -> Result<()> {
        self.verify_with_rng(friend, number_input, captcha_input, &mut rand::thread_rng())
    }

    fn verify_with_rng<R: Rng + ?Sized>(
        &mut self,
        friend: &friend::Model,
        number_input: &str,
        captcha_input: &str,
        rng: &mut R,
    ) -> Result<()> {
        if number_input.trim() != friend.friend_number {
            warn!(friend_id = friend.id, "Delete rejected: friend number mismatch");
            return Err(Error::FriendNumberMismatch);
        }

        let answered = captcha_input.trim().parse::<u8>().ok();
        if answered != Some(self.answer()) {
            warn!(friend_id = friend.id, "Delete rejected: captcha mismatch");
            self.regenerate(rng);
            return Err(Error::CaptchaMismatch);
        }

        Ok(())
    }
}
