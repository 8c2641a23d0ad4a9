//! Client-side mini-game engines.
//!
//! Each engine is an independent state machine. Time is passed in explicitly
//! and randomness comes from a caller-supplied [`rand::Rng`], so every round
//! can be replayed in tests. The only thing the engines share is [`Round`] and
//! the [`RoundOutcome`] they hand to the client when a round ends.

pub mod aim;
pub mod memory_grid;
pub mod number_memory;
pub mod reaction;
pub mod timers;
pub mod typing;
pub mod verbal;

use crate::client::session::SessionIdentity;
use crate::models::score::TestType;
use serde::{Deserialize, Serialize};

pub use timers::{Millis, TimerSet};

/// Minimal capability shared by all games.
pub trait Round {
    fn test_type(&self) -> TestType;

    /// The score of the last finished round, if there is one.
    fn final_score(&self) -> Option<i64>;
}

/// Body sent to `POST /scores/add`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreSubmission {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "testType")]
    pub test_type: TestType,
    pub score: i64,
}

/// What happens to a finished round's score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Ready(ScoreSubmission),
    NotLoggedIn,
    InvalidIdentity,
    /// The round ended in a way that does not post a score.
    Skipped,
}

impl Submission {
    pub fn for_identity(identity: Option<&SessionIdentity>, test_type: TestType, score: i64) -> Self {
        match identity {
            None => Submission::NotLoggedIn,
            Some(identity) if !identity.is_valid() => Submission::InvalidIdentity,
            Some(identity) => Submission::Ready(ScoreSubmission {
                user_id: identity.user_id.clone(),
                test_type,
                score,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub test_type: TestType,
    pub score: i64,
    pub message: String,
    pub submission: Submission,
}

impl RoundOutcome {
    pub(crate) fn submitted(
        identity: Option<&SessionIdentity>,
        test_type: TestType,
        score: i64,
        message: String,
    ) -> Self {
        RoundOutcome {
            test_type,
            score,
            message,
            submission: Submission::for_identity(identity, test_type, score),
        }
    }

    pub(crate) fn local(test_type: TestType, score: i64, message: String) -> Self {
        RoundOutcome {
            test_type,
            score,
            message,
            submission: Submission::Skipped,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::client::session::SessionIdentity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    pub fn player() -> SessionIdentity {
        SessionIdentity::new("64b7f0c2a1b2c3d4e5f60718", "Ada")
    }
}
