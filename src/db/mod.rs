pub mod blocks;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod reminders;
pub mod settings;
pub mod stats;
