use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export { file, force } = cmd {
        let (mut pool, timeline) = open(cfg)?;
        let path = ExportLogic::export(&mut pool, &timeline, file.as_deref(), *force)?;
        success(format!("Exported to {}", path.display()));
    }

    Ok(())
}
