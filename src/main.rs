//! Sui Profiles - command-line client for the on-chain profiles package
//!
//! Builds `profiles::*` Move call transactions, hands them to a wallet for
//! signing, and reads profile objects back from a fullnode.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use sui_profiles::cli::commands::{self, TxOptions, TxRequest};
use sui_profiles::config::{mask_url, Config};
use sui_profiles::transaction::{CertificateArgs, ProjectArgs};

/// Sui Profiles - manage on-chain developer profiles
#[derive(Parser)]
#[command(name = "profiles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "profiles.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Config,

    /// Check fullnode, package and wallet availability
    Health,

    /// Wallet registry commands
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Fetch an object by id
    Object {
        /// Object id
        id: String,
    },

    /// List objects of a struct type owned by an address
    Owned {
        /// Owner address
        owner: String,

        /// Fully qualified struct type (package::module::Name)
        #[arg(long = "type", value_name = "TYPE")]
        struct_type: String,
    },

    /// Show the profile objects owned by an address
    Profile {
        /// Owner address
        owner: String,
    },

    /// List dynamic fields (projects, certificates) of an object
    Fields {
        /// Parent object id
        parent: String,
    },

    /// Execute transaction bytes signed elsewhere
    Submit {
        /// Base64 transaction bytes
        tx_bytes: String,

        /// Base64 signature (repeatable)
        #[arg(short, long = "signature", required = true)]
        signatures: Vec<String>,
    },

    /// Build (and optionally send) a profile transaction
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },
}

#[derive(Subcommand)]
enum WalletAction {
    /// List registered wallets
    List,

    /// Show which wallet would be connected
    Detect {
        /// Name pattern (default: wallet.preferred)
        #[arg(long)]
        name: Option<String>,
    },

    /// Register a wallet bridge
    Add {
        /// Wallet display name
        name: String,

        /// Bridge URL
        #[arg(long)]
        endpoint: String,

        /// Chains served, e.g. sui:testnet (repeatable)
        #[arg(long = "chain")]
        chains: Vec<String>,
    },

    /// Remove a wallet bridge
    Remove {
        /// Wallet display name
        name: String,
    },

    /// Connect and list the wallet's accounts
    Connect {
        /// Name pattern (default: wallet.preferred)
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Args)]
struct TxFlags {
    /// Sender address (default: first wallet account)
    #[arg(long)]
    sender: Option<String>,

    /// Write transaction JSON to a file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Sign and execute through the selected wallet
    #[arg(long)]
    send: bool,

    /// Skip confirmation prompt
    #[arg(long)]
    yes: bool,
}

impl From<TxFlags> for TxOptions {
    fn from(flags: TxFlags) -> Self {
        TxOptions {
            sender: flags.sender,
            out: flags.out,
            send: flags.send,
            yes: flags.yes,
        }
    }
}

#[derive(Subcommand)]
enum TxAction {
    /// Create a profile
    Create {
        /// Unique handle
        handle: String,

        /// Display name
        display_name: String,

        /// Avatar URL
        #[arg(long)]
        avatar: Option<String>,

        #[command(flatten)]
        flags: TxFlags,
    },

    /// Update profile fields; omitted fields stay unchanged
    Update {
        #[arg(long)]
        display_name: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        #[arg(long)]
        avatar: Option<String>,

        #[command(flatten)]
        flags: TxFlags,
    },

    /// Delete the sender's profile
    Delete {
        #[command(flatten)]
        flags: TxFlags,
    },

    /// Verify another address's profile
    Verify {
        /// Profile owner address
        owner: String,

        #[command(flatten)]
        flags: TxFlags,
    },

    /// Add a project to the sender's profile
    AddProject {
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Demo URL
        #[arg(long)]
        demo: Option<String>,

        /// Thumbnail URL (repeatable)
        #[arg(long = "thumbnail")]
        thumbnails: Vec<String>,

        #[command(flatten)]
        flags: TxFlags,
    },

    /// Add a certificate to the sender's profile
    AddCertificate {
        title: String,

        /// Scan URL
        #[arg(long)]
        scan: Option<String>,

        #[arg(long)]
        issuer: Option<String>,

        #[command(flatten)]
        flags: TxFlags,
    },
}

impl TxAction {
    fn into_request(self) -> (TxRequest, TxOptions) {
        match self {
            TxAction::Create {
                handle,
                display_name,
                avatar,
                flags,
            } => (
                TxRequest::Create {
                    handle,
                    display_name,
                    avatar,
                },
                flags.into(),
            ),
            TxAction::Update {
                display_name,
                bio,
                avatar,
                flags,
            } => (
                TxRequest::Update {
                    display_name,
                    bio,
                    avatar,
                },
                flags.into(),
            ),
            TxAction::Delete { flags } => (TxRequest::Delete, flags.into()),
            TxAction::Verify { owner, flags } => (TxRequest::Verify { owner }, flags.into()),
            TxAction::AddProject {
                title,
                description,
                demo,
                thumbnails,
                flags,
            } => (
                TxRequest::AddProject(ProjectArgs {
                    title,
                    description,
                    demo,
                    thumbnails,
                }),
                flags.into(),
            ),
            TxAction::AddCertificate {
                title,
                scan,
                issuer,
                flags,
            } => (
                TxRequest::AddCertificate(CertificateArgs { title, scan, issuer }),
                flags.into(),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sui_profiles=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    startup_checks(&config);

    let result = match cli.command {
        Commands::Config => commands::show_config(&config),
        Commands::Health => commands::health(&config).await,
        Commands::Wallet { action } => match action {
            WalletAction::List => commands::wallet_list(&config),
            WalletAction::Detect { name } => commands::wallet_detect(&config, name.as_deref()),
            WalletAction::Add {
                name,
                endpoint,
                chains,
            } => commands::wallet_add(&config, &name, &endpoint, chains),
            WalletAction::Remove { name } => commands::wallet_remove(&config, &name),
            WalletAction::Connect { name } => {
                commands::wallet_connect(&config, name.as_deref()).await
            }
        },
        Commands::Object { id } => commands::object(&config, &id).await,
        Commands::Owned { owner, struct_type } => {
            commands::owned(&config, &owner, &struct_type).await
        }
        Commands::Profile { owner } => commands::profile(&config, &owner).await,
        Commands::Fields { parent } => commands::fields(&config, &parent).await,
        Commands::Submit {
            tx_bytes,
            signatures,
        } => commands::execute(&config, &tx_bytes, &signatures).await,
        Commands::Tx { action } => {
            let (request, options) = action.into_request();
            commands::transaction(&config, request, options).await
        }
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn startup_checks(config: &Config) {
    info!(
        "Network {} via {}, package {}",
        config.network(),
        mask_url(&config.rpc_url()),
        config.contract.package_id
    );

    if config.contract.registry_id.is_none() {
        warn!("REGISTRY_ID not set; create and delete are unavailable");
    }
    if config.contract.events_id.is_none() {
        warn!("EVENTS_ID not set; create, update, delete and verify are unavailable");
    }
}
