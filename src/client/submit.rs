use crate::client::api::ScoreClient;
use crate::error::ClientError;
use crate::games::{RoundOutcome, ScoreSubmission, Submission};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Anything that can post a finished round's score.
#[async_trait]
pub trait ScoreSubmitter: Send + Sync {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), ClientError>;
}

#[async_trait]
impl ScoreSubmitter for ScoreClient {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), ClientError> {
        ScoreClient::submit(self, submission).await.map(|_| ())
    }
}

/// Result of trying to save a round's score, as shown under the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    NotLoggedIn,
    InvalidIdentity,
    Failed,
    /// The round ended without anything to save.
    NotSubmitted,
}

impl SaveStatus {
    pub fn message(self) -> &'static str {
        match self {
            SaveStatus::Saved => "Score saved to leaderboard!",
            SaveStatus::NotLoggedIn => "Not logged in — score not saved.",
            SaveStatus::InvalidIdentity => "Invalid user ID — score not saved.",
            SaveStatus::Failed => "Failed to save score.",
            SaveStatus::NotSubmitted => "",
        }
    }
}

/// Posts the outcome's score once. Failures are reported, never retried.
pub async fn submit_outcome(submitter: &dyn ScoreSubmitter, outcome: &RoundOutcome) -> SaveStatus {
    let submission = match &outcome.submission {
        Submission::Ready(submission) => submission,
        Submission::NotLoggedIn => return SaveStatus::NotLoggedIn,
        Submission::InvalidIdentity => return SaveStatus::InvalidIdentity,
        Submission::Skipped => return SaveStatus::NotSubmitted,
    };

    match submitter.submit(submission).await {
        Ok(()) => {
            info!(test_type = %submission.test_type, score = submission.score, "score saved");
            SaveStatus::Saved
        }
        Err(err) => {
            error!(error = %err, test_type = %submission.test_type, "error saving score");
            SaveStatus::Failed
        }
    }
}

/// Fire-and-forget: spawns the submission so gameplay never waits on it.
pub fn dispatch(submitter: Arc<dyn ScoreSubmitter>, outcome: RoundOutcome) -> JoinHandle<SaveStatus> {
    tokio::spawn(async move { submit_outcome(submitter.as_ref(), &outcome).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::session::SessionIdentity;
    use crate::models::score::TestType;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSubmitter {
        sent: Mutex<Vec<ScoreSubmission>>,
        fail: bool,
    }

    #[async_trait]
    impl ScoreSubmitter for RecordingSubmitter {
        async fn submit(&self, submission: &ScoreSubmission) -> Result<(), ClientError> {
            self.sent.lock().unwrap().push(submission.clone());
            if self.fail {
                Err(ClientError::Rejected {
                    status: 500,
                    message: "store down".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn outcome(identity: Option<&SessionIdentity>) -> RoundOutcome {
        RoundOutcome {
            test_type: TestType::TypingTest,
            score: 42,
            message: String::new(),
            submission: Submission::for_identity(identity, TestType::TypingTest, 42),
        }
    }

    #[tokio::test]
    async fn identity_guards_skip_the_network() {
        let submitter = RecordingSubmitter::default();
        let bad = SessionIdentity::new("undefined", "Ada");

        assert_eq!(submit_outcome(&submitter, &outcome(None)).await, SaveStatus::NotLoggedIn);
        assert_eq!(
            submit_outcome(&submitter, &outcome(Some(&bad))).await,
            SaveStatus::InvalidIdentity
        );
        assert!(submitter.sent.lock().unwrap().is_empty());
        assert_eq!(SaveStatus::NotLoggedIn.message(), "Not logged in — score not saved.");
        assert_eq!(
            SaveStatus::InvalidIdentity.message(),
            "Invalid user ID — score not saved."
        );
    }

    #[tokio::test]
    async fn failure_is_reported_once() {
        let submitter = RecordingSubmitter {
            fail: true,
            ..Default::default()
        };
        let identity = SessionIdentity::new("64b7f0c2a1b2c3d4e5f60718", "Ada");

        let status = submit_outcome(&submitter, &outcome(Some(&identity))).await;
        assert_eq!(status, SaveStatus::Failed);
        assert_eq!(status.message(), "Failed to save score.");
        assert_eq!(submitter.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dispatch_runs_in_background() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let identity = SessionIdentity::new("64b7f0c2a1b2c3d4e5f60718", "Ada");

        let handle = dispatch(submitter.clone(), outcome(Some(&identity)));
        let status = handle.await.unwrap();
        assert_eq!(status, SaveStatus::Saved);
        assert_eq!(status.message(), "Score saved to leaderboard!");

        let sent = submitter.sent.lock().unwrap();
        assert_eq!(sent[0].user_id, identity.user_id);
        assert_eq!(sent[0].score, 42);
    }
}
