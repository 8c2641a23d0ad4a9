pub const DB_NAME: &str = "brainbench";
pub const SCORES_COLL_NAME: &str = "scores";
pub const USERS_COLL_NAME: &str = "users";

pub const LEADERBOARD_PAGE_SIZE: usize = 10;
pub const LEADERBOARD_MAX_LIMIT: usize = 50;
