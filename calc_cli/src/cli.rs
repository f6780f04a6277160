// Command-line arguments
//
// Flags override the CALCULATOR_* environment; everything else comes from
// the environment (optionally seeded from a .env file).

use std::path::PathBuf;

use calc_core::CalculatorConfig;
use clap::Parser;

/// Interactive calculator with undo/redo history
#[derive(Parser, Debug)]
#[command(name = "calc_cli")]
#[command(version)]
#[command(about = "Interactive calculator with undo/redo history", long_about = None)]
pub struct Cli {
    /// Directory for logs and history (overrides CALCULATOR_BASE_DIR)
    #[arg(long, value_name = "PATH")]
    pub base_dir: Option<PathBuf>,

    /// Do not save history after every calculation
    #[arg(long)]
    pub no_auto_save: bool,

    /// Print results and errors as JSON
    #[arg(long)]
    pub json: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}

impl Cli {
    /// Apply flag overrides on top of an environment-derived config.
    pub fn apply(&self, mut config: CalculatorConfig) -> CalculatorConfig {
        if let Some(dir) = &self.base_dir {
            config = config.with_base_dir(dir);
        }
        if self.no_auto_save {
            config = config.with_auto_save(false);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["calc_cli"]);
        assert!(cli.base_dir.is_none());
        assert!(!cli.no_auto_save);
        assert!(!cli.json);
        assert!(cli.env_file.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "calc_cli",
            "--base-dir",
            "/tmp/calc",
            "--no-auto-save",
            "--json",
        ]);
        let config = cli.apply(CalculatorConfig::default());
        assert_eq!(config.base_dir, PathBuf::from("/tmp/calc"));
        assert!(!config.auto_save);
        assert!(cli.json);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = Cli::parse_from(["calc_cli"]);
        let original = CalculatorConfig::default().with_base_dir("/srv/calc");
        assert_eq!(cli.apply(original.clone()), original);
    }
}
