//! Command-line interface definitions.
//!
//! Defines the `fitment` CLI using `clap`. Subcommands cover catalog
//! initialization and import, supplier feed preparation, product tagging,
//! and the action API (one-shot `dispatch` or the line-oriented `serve`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Vehicle-to-parts fitment filter
#[derive(Parser, Debug)]
#[command(name = "fitment")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the fitment CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and apply migrations
    Init,

    /// Load vehicle, engine, and link CSV files into the catalog
    Import(ImportArgs),

    /// Turn a supplier fitment feed into catalog CSV files
    PrepareFeed(PrepareFeedArgs),

    /// Tag products from a part-number to vehicle-id map
    TagProducts(TagProductsArgs),

    /// Manage the storefront product catalog
    #[command(subcommand)]
    Products(ProductsCommand),

    /// Issue an anti-forgery token for a session
    Token(TokenArgs),

    /// Handle one action API request and print the envelope
    Dispatch(DispatchArgs),

    /// Answer JSON action requests read line by line from stdin
    Serve,

    /// Look up a vehicle by registration mark
    Lookup(LookupArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `fitment products`.
#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    /// Load a product export (`id,sku,title,link,image,price`).
    Import {
        /// CSV file to load.
        csv: PathBuf,
    },
}

/// Subcommands for `fitment config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
}

/// Arguments for the `import` subcommand.
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Directory holding `vehicle_base.csv`, `engine_table.csv` and
    /// `vehicle_engine.csv` (defaults to `import.data_dir`).
    pub dir: Option<PathBuf>,
}

/// Arguments for the `prepare-feed` subcommand.
#[derive(Parser, Debug)]
pub struct PrepareFeedArgs {
    /// Supplier feed CSV.
    pub input: PathBuf,
    /// Directory the catalog CSV files are written to.
    pub out_dir: PathBuf,
    /// Year used for open-ended ranges (defaults to the current year).
    #[arg(long)]
    pub current_year: Option<i32>,
}

/// Arguments for the `tag-products` subcommand.
#[derive(Parser, Debug)]
pub struct TagProductsArgs {
    /// CSV of `part_number,vehicle_ids`.
    pub map: PathBuf,
}

/// Arguments for the `token` subcommand.
#[derive(Parser, Debug)]
pub struct TokenArgs {
    /// Session the token is bound to.
    #[arg(long, default_value = crate::port::inbound::action::ANONYMOUS_SESSION)]
    pub session: String,
}

/// Arguments for the `dispatch` subcommand.
#[derive(Parser, Debug)]
pub struct DispatchArgs {
    /// Request as a JSON object, e.g. `{"action":"get_makes","nonce":"..."}`.
    pub request: String,
}

/// Arguments for the `lookup` subcommand.
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Registration mark.
    pub plate: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_command_factory_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name_and_version() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "fitment");
        assert!(cmd.get_version().is_some());
    }

    #[test]
    fn test_config_defaults_to_working_directory() {
        let cli = Cli::try_parse_from(["fitment", "init"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(matches!(cli.command, Commands::Init));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fitment", "import", "data", "--json", "-c", "alt.toml", "-vv"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        match cli.command {
            Commands::Import(args) => assert_eq!(args.dir, Some(PathBuf::from("data"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_token_session_defaults_to_anonymous() {
        let cli = Cli::try_parse_from(["fitment", "token"]).unwrap();
        match cli.command {
            Commands::Token(args) => assert_eq!(args.session, "anonymous"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_products_import_requires_path() {
        assert!(Cli::try_parse_from(["fitment", "products", "import"]).is_err());
        let cli = Cli::try_parse_from(["fitment", "products", "import", "p.csv"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Products(ProductsCommand::Import { .. })
        ));
    }

    #[test]
    fn test_prepare_feed_takes_optional_year() {
        let cli = Cli::try_parse_from([
            "fitment",
            "prepare-feed",
            "feed.csv",
            "out",
            "--current-year",
            "2024",
        ])
        .unwrap();
        match cli.command {
            Commands::PrepareFeed(args) => assert_eq!(args.current_year, Some(2024)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
