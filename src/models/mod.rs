pub mod leaderboard;
pub mod score;
pub mod score_request;
pub mod user;
