pub mod state_manager;
pub mod utils;

pub use state_manager::StateManager;
