//! Memecoin CLI - Bonding-curve memecoin explorer
//!
//! Quotes prices straight off the bonding curve and runs a local trading
//! ledger (users, memecoins, buys and sells) persisted to a JSON state file.

use anyhow::Result;
use bonding_curve::CurveParams;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use memecoin_ledger::NewMemecoin;
use std::path::PathBuf;

mod coins;
mod config;
mod display;
mod quote;
mod seed;
mod store;
mod trading;
mod users;

use config::AppConfig;
use store::StateStore;

#[derive(Parser)]
#[command(name = "memecoin")]
#[command(about = "Memecoin Explorer CLI - Bonding-curve pricing and trading", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/memecoin/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to state file (overrides config)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Curve parameters; unset values come from the config
#[derive(Args)]
struct CurveArgs {
    /// Price at zero supply
    #[arg(long)]
    starting_price: Option<f64>,

    /// Exponential growth coefficient
    #[arg(long)]
    growth_rate: Option<f64>,
}

impl CurveArgs {
    fn resolve(&self, config: &AppConfig) -> Result<CurveParams> {
        let defaults = config.default_curve()?;
        let curve = CurveParams::new(
            self.starting_price.unwrap_or(defaults.starting_price),
            self.growth_rate.unwrap_or(defaults.growth_rate),
        )?;
        Ok(curve)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Spot price at a supply level
    Price {
        /// Circulating supply
        supply: f64,

        #[command(flatten)]
        curve: CurveArgs,
    },

    /// Quote a trade without touching any state
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Print sample points along the price curve
    Curve {
        /// Largest supply to sample
        #[arg(long, default_value = "1000")]
        max_supply: f64,

        /// Number of sample points
        #[arg(long, default_value = "20")]
        points: usize,

        #[command(flatten)]
        curve: CurveArgs,
    },

    /// User operations
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Memecoin operations
    Coin {
        #[command(subcommand)]
        command: CoinCommands,
    },

    /// Trading operations
    Trade {
        #[command(subcommand)]
        command: TradeCommands,
    },

    /// Show a user's balance and positions
    Portfolio {
        /// User ID
        user: u64,
    },

    /// Rank users by ZTH balance
    Leaderboard,

    /// Populate the state file with demo data
    Seed,
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Cost of buying tokens
    Buy {
        /// Circulating supply before the trade
        supply: f64,

        /// Tokens to buy
        amount: f64,

        #[command(flatten)]
        curve: CurveArgs,
    },

    /// Proceeds of selling tokens
    Sell {
        /// Circulating supply before the trade
        supply: f64,

        /// Tokens to sell
        amount: f64,

        #[command(flatten)]
        curve: CurveArgs,
    },

    /// Tokens purchasable for a ZTH budget
    Budget {
        /// Circulating supply before the trade
        supply: f64,

        /// ZTH to spend
        zth: f64,

        #[command(flatten)]
        curve: CurveArgs,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a new user
    Register {
        /// Email address (unique)
        #[arg(long)]
        email: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show user details
    Show {
        /// User ID
        id: u64,
    },

    /// Change name and/or email
    Update {
        /// User ID
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum CoinCommands {
    /// Create a memecoin (costs the creation fee)
    Create {
        /// Creator user ID
        #[arg(long)]
        creator: u64,

        /// Name (4-16 characters)
        #[arg(long)]
        name: String,

        /// Symbol (2-4 uppercase letters)
        #[arg(long)]
        symbol: String,

        #[arg(long)]
        description: Option<String>,

        /// Logo image URL
        #[arg(long)]
        logo_url: Option<String>,

        /// Price at zero supply (0.01-10)
        #[arg(long)]
        starting_price: Option<f64>,

        /// Growth rate (0.0001-0.01)
        #[arg(long)]
        growth_rate: Option<f64>,
    },

    /// List memecoins, newest first
    List {
        /// Filter by name, symbol or description
        #[arg(long)]
        search: Option<String>,
    },

    /// Show memecoin details
    Show {
        /// Memecoin ID
        id: u64,
    },

    /// Show the memecoin's transaction log
    History {
        /// Memecoin ID
        id: u64,
    },

    /// Delete a memecoin with no circulating supply
    Delete {
        /// Memecoin ID
        id: u64,

        /// Requesting user ID (must be the creator)
        #[arg(long)]
        requester: u64,
    },
}

#[derive(Subcommand)]
enum TradeCommands {
    /// Buy tokens along the curve
    Buy {
        #[arg(long)]
        user: u64,

        #[arg(long)]
        coin: u64,

        /// Tokens to buy
        #[arg(long)]
        amount: f64,

        /// Only show the cost
        #[arg(long)]
        dry_run: bool,
    },

    /// Sell tokens back to the curve
    Sell {
        #[arg(long)]
        user: u64,

        #[arg(long)]
        coin: u64,

        /// Tokens to sell
        #[arg(long)]
        amount: f64,

        /// Only show the proceeds
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.clone(), cli.state.clone())?;
    let store = StateStore::new(config.state_path.clone(), config.ledger_params()?);

    if cli.verbose {
        match &config.source {
            Some(path) => println!("{} {}", "Config:".bright_cyan(), path.display()),
            None => println!("{} {}", "Config:".bright_cyan(), "defaults".dimmed()),
        }
        println!("{} {}", "State:".bright_cyan(), store.path().display());
    }

    match cli.command {
        Commands::Price { supply, curve } => {
            quote::show_price(&curve.resolve(&config)?, supply)?;
        }
        Commands::Quote { command } => match command {
            QuoteCommands::Buy { supply, amount, curve } => {
                quote::quote_buy(&curve.resolve(&config)?, supply, amount)?;
            }
            QuoteCommands::Sell { supply, amount, curve } => {
                quote::quote_sell(&curve.resolve(&config)?, supply, amount)?;
            }
            QuoteCommands::Budget { supply, zth, curve } => {
                quote::quote_budget(&curve.resolve(&config)?, supply, zth)?;
            }
        },
        Commands::Curve { max_supply, points, curve } => {
            quote::show_curve(&curve.resolve(&config)?, max_supply, points)?;
        }
        Commands::User { command } => match command {
            UserCommands::Register { email, name } => {
                users::register(&store, email, name).await?;
            }
            UserCommands::Show { id } => {
                users::show(&store, id).await?;
            }
            UserCommands::Update { id, name, email } => {
                users::update(&store, id, name, email).await?;
            }
        },
        Commands::Coin { command } => match command {
            CoinCommands::Create {
                creator,
                name,
                symbol,
                description,
                logo_url,
                starting_price,
                growth_rate,
            } => {
                let req = NewMemecoin {
                    name,
                    symbol,
                    description,
                    logo_url,
                    starting_price,
                    growth_rate,
                };
                coins::create(&store, creator, req).await?;
            }
            CoinCommands::List { search } => {
                coins::list(&store, search).await?;
            }
            CoinCommands::Show { id } => {
                coins::show(&store, id).await?;
            }
            CoinCommands::History { id } => {
                coins::history(&store, id).await?;
            }
            CoinCommands::Delete { id, requester } => {
                coins::delete(&store, id, requester).await?;
            }
        },
        Commands::Trade { command } => match command {
            TradeCommands::Buy { user, coin, amount, dry_run } => {
                trading::buy(&store, user, coin, amount, dry_run).await?;
            }
            TradeCommands::Sell { user, coin, amount, dry_run } => {
                trading::sell(&store, user, coin, amount, dry_run).await?;
            }
        },
        Commands::Portfolio { user } => {
            trading::portfolio(&store, user).await?;
        }
        Commands::Leaderboard => {
            users::leaderboard(&store).await?;
        }
        Commands::Seed => {
            seed::run(&store).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trade_buy() {
        let cli = Cli::try_parse_from([
            "memecoin", "trade", "buy", "--user", "1", "--coin", "2", "--amount", "10.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Trade {
                command: TradeCommands::Buy { user, coin, amount, dry_run },
            } => {
                assert_eq!((user, coin, amount, dry_run), (1, 2, 10.5, false));
            }
            _ => panic!("expected trade buy"),
        }
    }

    #[test]
    fn test_curve_args_fall_back_to_config() {
        let config = AppConfig::default();
        let args = CurveArgs {
            starting_price: Some(0.5),
            growth_rate: None,
        };
        let curve = args.resolve(&config).unwrap();
        assert_eq!(curve.starting_price, 0.5);
        assert_eq!(curve.growth_rate, 0.005);

        let bad = CurveArgs {
            starting_price: Some(-1.0),
            growth_rate: None,
        };
        assert!(bad.resolve(&config).is_err());
    }
}
