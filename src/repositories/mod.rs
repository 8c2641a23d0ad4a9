pub mod memory_repository;
pub mod score_repository;

pub use memory_repository::InMemoryScoreStore;
pub use score_repository::{MongoScoreStore, ScoreStore};
