//! Browser-side pieces that sit around the game engines: the session identity,
//! client-local storage, the HTTP score client and the results views.

pub mod api;
pub mod local_store;
pub mod session;
pub mod submit;
pub mod views;

pub use api::ScoreClient;
pub use local_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use session::SessionIdentity;
pub use submit::{dispatch, submit_outcome, SaveStatus, ScoreSubmitter};
