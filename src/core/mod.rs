pub mod clock;
pub mod config;
pub mod engine;
pub mod export;
pub mod log;
pub mod reminders;
pub mod scheduler;
pub mod settings;
pub mod timeline;
pub mod totals;
pub mod watch;
