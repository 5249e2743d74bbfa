pub mod matchmaking;
pub mod session_store;
pub mod turns;
pub mod users;

pub use matchmaking::{JoinOutcome, Matchmaking};
pub use session_store::SessionStore;
pub use turns::TurnController;
pub use users::UserService;
