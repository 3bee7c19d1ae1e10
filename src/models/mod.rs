pub mod block;
pub mod category;
pub mod day_totals;
pub mod reminder;
pub mod settings;
