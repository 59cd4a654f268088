//! CLI module graph.

pub mod action;
pub mod command;
pub mod config;
pub mod feed;
pub mod import;
pub mod init;
pub mod lookup;
pub mod output;

use command::{Cli, Commands, ConfigCommand, ProductsCommand};

use crate::error::Result;
use crate::infrastructure::config::Config;

/// Run the parsed command against a loaded configuration.
pub async fn execute(cli: &Cli, settings: &Config) -> Result<()> {
    match &cli.command {
        Commands::Init => init::execute(settings),
        Commands::Import(args) => import::execute_import(settings, args),
        Commands::PrepareFeed(args) => feed::execute(args),
        Commands::TagProducts(args) => import::execute_tag_products(settings, &args.map),
        Commands::Products(ProductsCommand::Import { csv }) => {
            import::execute_products_import(settings, csv)
        }
        Commands::Token(args) => action::execute_token(settings, args),
        Commands::Dispatch(args) => action::execute_dispatch(settings, args).await,
        Commands::Serve => action::execute_serve(settings).await,
        Commands::Lookup(args) => lookup::execute(settings, args).await,
        Commands::Config(ConfigCommand::Show) => config::execute_show(&cli.config, settings),
    }
}
