//! Failed-PIN lockout policy
//!
//! Counts consecutive failed PIN checks for one session. Reaching the
//! maximum moves the policy to [`LockState::Locked`], which is terminal:
//! the session is expected to run the breach response and shut down.
//! Nothing here is persisted; a new process starts from zero.

use subtle::ConstantTimeEq;

/// Failed attempts allowed before a breach
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Active,
    Locked,
}

/// Result of a single PIN check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Retry { remaining: u32 },
    Breach,
}

#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    max_attempts: u32,
    attempt_count: u32,
    state: LockState,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS)
    }
}

impl LockoutPolicy {
    /// A policy allowing `max_attempts` failures; zero is treated as one
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            attempt_count: 0,
            state: LockState::Active,
        }
    }

    /// Compare `entered` with `correct` and update the attempt counter
    pub fn check(&mut self, entered: &str, correct: &str) -> AuthOutcome {
        if self.state == LockState::Locked {
            return AuthOutcome::Breach;
        }

        if pins_match(entered, correct) {
            self.attempt_count = 0;
            return AuthOutcome::Success;
        }

        self.attempt_count = (self.attempt_count + 1).min(self.max_attempts);
        if self.attempt_count < self.max_attempts {
            AuthOutcome::Retry {
                remaining: self.max_attempts - self.attempt_count,
            }
        } else {
            self.state = LockState::Locked;
            AuthOutcome::Breach
        }
    }

    /// Back to `Active` with no failures recorded
    pub fn reset(&mut self) {
        self.attempt_count = 0;
        self.state = LockState::Active;
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn state(&self) -> LockState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LockState::Locked
    }
}

fn pins_match(entered: &str, correct: &str) -> bool {
    entered.len() == correct.len() && bool::from(entered.as_bytes().ct_eq(correct.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_failures_breach() {
        let mut policy = LockoutPolicy::default();

        assert_eq!(policy.check("0000", "1234"), AuthOutcome::Retry { remaining: 2 });
        assert_eq!(policy.check("0000", "1234"), AuthOutcome::Retry { remaining: 1 });
        assert_eq!(policy.check("0000", "1234"), AuthOutcome::Breach);
        assert!(policy.is_locked());
        assert_eq!(policy.attempt_count(), MAX_ATTEMPTS);
    }

    #[test]
    fn test_success_resets_counter() {
        let mut policy = LockoutPolicy::default();

        policy.check("1111", "1234");
        policy.check("2222", "1234");
        assert_eq!(policy.attempt_count(), 2);

        assert_eq!(policy.check("1234", "1234"), AuthOutcome::Success);
        assert_eq!(policy.attempt_count(), 0);

        assert_eq!(policy.check("1111", "1234"), AuthOutcome::Retry { remaining: 2 });
        assert_eq!(policy.check("1111", "1234"), AuthOutcome::Retry { remaining: 1 });
        assert_eq!(policy.state(), LockState::Active);
    }

    #[test]
    fn test_locked_is_terminal() {
        let mut policy = LockoutPolicy::new(1);

        assert_eq!(policy.check("9999", "1234"), AuthOutcome::Breach);
        assert_eq!(policy.check("1234", "1234"), AuthOutcome::Breach);
        assert!(policy.is_locked());
    }

    #[test]
    fn test_reset_unlocks() {
        let mut policy = LockoutPolicy::default();
        for _ in 0..MAX_ATTEMPTS {
            policy.check("0000", "1234");
        }
        assert!(policy.is_locked());

        policy.reset();

        assert_eq!(policy.state(), LockState::Active);
        assert_eq!(policy.attempt_count(), 0);
        assert_eq!(policy.check("1234", "1234"), AuthOutcome::Success);
    }

    #[test]
    fn test_prefix_does_not_match() {
        let mut policy = LockoutPolicy::default();
        assert_eq!(policy.check("123", "1234"), AuthOutcome::Retry { remaining: 2 });
        assert_eq!(policy.check("12345", "1234"), AuthOutcome::Retry { remaining: 1 });
        assert_eq!(policy.check("", "1234"), AuthOutcome::Breach);
    }

    #[test]
    fn test_zero_max_attempts_behaves_as_one() {
        let policy = LockoutPolicy::new(0);
        assert_eq!(policy.max_attempts(), 1);
    }
}
