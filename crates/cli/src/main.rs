//! Stockroom CLI - terminal storefront and admin console.
//!
//! # Usage
//!
//! ```bash
//! # Browse and shop
//! stockroom items list
//! stockroom cart add 65f1c0ffee -q 2
//! stockroom login -e ada@example.com          # password from STOCKROOM_PASSWORD
//! stockroom checkout --first-name Ada --last-name Lovelace ... --yes
//!
//! # Administer
//! stockroom admin items create --name "Desk Lamp" --price 24.99 --quantity 4
//! stockroom admin orders status 65f1beef shipped
//! ```
//!
//! # Environment Variables
//!
//! - `STOCKROOM_API_URL`, `STOCKROOM_STATE_FILE`, ... - see
//!   `stockroom_storefront::config`
//! - `STOCKROOM_LOG_FORMAT` - `json` for JSON logs (default: human-readable)
//! - `RUST_LOG` - log filter (default: `stockroom_storefront=info,stockroom_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use stockroom_storefront::AppContext;
use stockroom_storefront::config::ClientConfig;
use stockroom_storefront::notify::NoticeLevel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::admin::AdminAction;
use commands::auth::{LoginArgs, RegisterArgs};
use commands::cart::CartAction;
use commands::checkout::CheckoutArgs;
use commands::items::ItemsAction;
use commands::orders::OrdersAction;

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about = "Stockroom storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in
    Login(LoginArgs),
    /// Create an account and log in
    Register(RegisterArgs),
    /// Log out and forget all local state
    Logout,
    /// Show who is logged in
    Whoami,
    /// Browse inventory
    Items {
        #[command(subcommand)]
        action: ItemsAction,
    },
    /// View and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Checkout(CheckoutArgs),
    /// View your orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage inventory, users and orders
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

fn init_tracing() {
    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockroom_storefront=info,stockroom_cli=info".into());

    let json = std::env::var("STOCKROOM_LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    // Load .env before the log filter is read
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let config = ClientConfig::from_env()?;
    let mut ctx = AppContext::start(config).await?;

    let result = match cli.command {
        Commands::Login(args) => commands::auth::login(&mut ctx, args).await,
        Commands::Register(args) => commands::auth::register(&mut ctx, args).await,
        Commands::Logout => {
            commands::auth::logout(&mut ctx);
            Ok(())
        }
        Commands::Whoami => {
            commands::auth::whoami(&ctx);
            Ok(())
        }
        Commands::Items { action } => commands::items::run(&mut ctx, action).await,
        Commands::Cart { action } => commands::cart::run(&mut ctx, action).await,
        Commands::Checkout(args) => commands::checkout::run(&mut ctx, args).await,
        Commands::Orders { action } => commands::orders::run(&mut ctx, action).await,
        Commands::Admin { action } => commands::admin::run(&mut ctx, action).await,
    };

    // Notices are printed whether or not the command succeeded
    let notices = ctx.notices();
    output::notices(&notices);
    if let Err(e) = &result
        && !notices.iter().any(|n| n.level == NoticeLevel::Error)
    {
        output::error(&e.user_message());
    }
    result
}
