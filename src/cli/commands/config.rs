use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        if *check {
            if path.exists() {
                ConfigLogic::check(&path)?;
            } else {
                warning(format!(
                    "No configuration file at {} (run `rdaytracker init`).",
                    path.display()
                ));
            }
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
            success(format!("Configuration file {} edited.", path.display()));
        }
    }

    Ok(())
}
