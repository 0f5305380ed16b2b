use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use palnav::app::App;
use palnav::catalog::CatalogAdapter;
use palnav::config::Config;
use palnav::error::AppResult;
use palnav::logging::init_file_logging;

/// Keyboard-driven command palette over a TOML catalog.
#[derive(Parser, Debug)]
#[command(name = "palnav")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file path (defaults to $PALNAV_CONFIG_PATH or the XDG config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Catalog file to serve instead of the configured or built-in one
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Validate the catalog and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = load_config(&cli)?;

    if cli.check {
        let catalog = match &config.catalog.path {
            Some(path) => CatalogAdapter::from_path(path)?,
            None => CatalogAdapter::builtin()?,
        };
        let catalog = catalog.catalog();
        println!(
            "catalog ok: {} pages, root '{}'",
            catalog.pages.len(),
            catalog.root
        );
        return Ok(());
    }

    let log_path = init_file_logging(&config.log)?;
    info!(log = %log_path.display(), catalog = ?config.catalog.path, "palnav starting");

    let mut app = App::new(config)?;
    app.run().await
}

fn load_config(cli: &Cli) -> AppResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(catalog) = &cli.catalog {
        config.catalog.path = Some(catalog.clone());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::{Cli, load_config};

    #[test]
    fn cli_accepts_config_catalog_and_check() {
        let cli = Cli::try_parse_from([
            "palnav",
            "--config",
            "palnav.toml",
            "--catalog",
            "menu.toml",
            "--check",
        ])
        .expect("flags should parse");
        assert_eq!(cli.config, Some(PathBuf::from("palnav.toml")));
        assert_eq!(cli.catalog, Some(PathBuf::from("menu.toml")));
        assert!(cli.check);
    }

    #[test]
    fn cli_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["palnav", "extra.toml"]).is_err());
    }

    #[test]
    fn catalog_flag_overrides_config() {
        let missing = std::env::temp_dir().join("palnav_missing_config_for_cli_test.toml");
        let cli = Cli::try_parse_from([
            "palnav",
            "--config",
            missing.to_str().expect("temp path is utf-8"),
            "--catalog",
            "menu.toml",
        ])
        .expect("flags should parse");
        let config = load_config(&cli).expect("missing config falls back to defaults");
        assert_eq!(config.catalog.path, Some(PathBuf::from("menu.toml")));
    }
}
