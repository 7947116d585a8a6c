//! CLI commands for farsight.
//!
//! - **Training**: train (runs one far/near session)
//! - **Progress**: stats, history, badges
//! - **Utility**: settings, clear

// Training
pub mod train;

// Progress
pub mod badges;
pub mod history;
pub mod stats;

// Utility
pub mod clear;
pub mod settings;

pub use badges::BadgesCommand;
pub use clear::ClearCommand;
pub use history::HistoryCommand;
pub use settings::SettingsCommand;
pub use stats::StatsCommand;
pub use train::TrainCommand;
