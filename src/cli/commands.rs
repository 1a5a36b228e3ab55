//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::Confirm;
use tracing::{info, warn};

use crate::client::SuiClient;
use crate::config::Config;
use crate::error::Error;
use crate::sui::SuiAddress;
use crate::transaction::{
    CertificateArgs, CreateProfileArgs, DeleteProfileArgs, ProfileTransactions, ProjectArgs,
    TransactionBlock, UpdateProfileArgs, VerifyArgs,
};
use crate::wallet::{
    select_wallet, HttpWalletProvider, WalletAccount, WalletEntry, WalletProvider,
    WalletRegistry, WalletSelection,
};

/// Which profile transaction to build
#[derive(Debug, Clone)]
pub enum TxRequest {
    Create {
        handle: String,
        display_name: String,
        avatar: Option<String>,
    },
    Update {
        display_name: Option<String>,
        bio: Option<String>,
        avatar: Option<String>,
    },
    Delete,
    Verify {
        owner: String,
    },
    AddProject(ProjectArgs),
    AddCertificate(CertificateArgs),
}

/// What to do with a built transaction
#[derive(Debug, Clone, Default)]
pub struct TxOptions {
    /// Sender address; defaults to the connected wallet account
    pub sender: Option<String>,
    /// Write the serialized transaction here instead of stdout
    pub out: Option<PathBuf>,
    /// Hand the transaction to the wallet
    pub send: bool,
    /// Skip confirmation prompt
    pub yes: bool,
}

/// Build the requested transaction using contract ids from config
pub fn build_transaction(config: &Config, request: &TxRequest) -> crate::Result<TransactionBlock> {
    let builder = ProfileTransactions::new(config.package_id()?);
    let contract = &config.contract;

    let mut tx = match request {
        TxRequest::Create {
            handle,
            display_name,
            avatar,
        } => builder.build_create_profile(&CreateProfileArgs {
            registry_id: config.registry_id()?.to_string(),
            events_id: config.events_id()?.to_string(),
            handle: handle.clone(),
            display_name: display_name.clone(),
            avatar: avatar.clone(),
            registry_version: contract.registry_version,
            events_version: contract.events_version,
        })?,
        TxRequest::Update {
            display_name,
            bio,
            avatar,
        } => builder.build_update_profile(&UpdateProfileArgs {
            events_id: config.events_id()?.to_string(),
            display_name: display_name.clone(),
            bio: bio.clone(),
            avatar: avatar.clone(),
            events_version: contract.events_version,
        })?,
        TxRequest::Delete => builder.build_delete_profile(&DeleteProfileArgs {
            registry_id: config.registry_id()?.to_string(),
            events_id: config.events_id()?.to_string(),
            registry_version: contract.registry_version,
            events_version: contract.events_version,
        })?,
        TxRequest::Verify { owner } => builder.build_verify(&VerifyArgs {
            events_id: config.events_id()?.to_string(),
            profile_owner: owner.clone(),
            events_version: contract.events_version,
        })?,
        TxRequest::AddProject(args) => builder.build_add_project(args)?,
        TxRequest::AddCertificate(args) => builder.build_add_certificate(args)?,
    };

    if let Some(budget) = contract.gas_budget {
        tx.set_gas_budget(budget);
    }

    Ok(tx)
}

/// Build a profile transaction and print, save or send it
pub async fn transaction(config: &Config, request: TxRequest, options: TxOptions) -> Result<()> {
    let resolved;
    let config = if options.send {
        resolved = with_shared_versions(config).await?;
        &resolved
    } else {
        config
    };

    let mut tx = build_transaction(config, &request).context("Failed to build transaction")?;

    if let Some(sender) = &options.sender {
        tx.set_sender(SuiAddress::parse(sender)?);
    }

    for call in tx.move_calls() {
        info!("Built call to {}", call.target());
    }

    if !options.send {
        let json = serde_json::to_string_pretty(&tx.to_json()?)?;
        match &options.out {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Transaction written to {}", path.display());
            }
            None => println!("{}", json),
        }
        return Ok(());
    }

    let registry = WalletRegistry::load(Path::new(&config.wallet.registry_path))?;
    let entry = match select_wallet(&registry, &config.wallet.preferred) {
        WalletSelection::Detected(entry) => entry.clone(),
        selection @ WalletSelection::NoWalletDetected => {
            println!("{}", selection.label());
            return Err(Error::WalletNotFound(config.wallet.preferred.clone()).into());
        }
    };

    if !options.yes {
        let target = tx
            .move_calls()
            .next()
            .map(|call| call.target())
            .unwrap_or_default();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Send {} to {} on {}?",
                target,
                entry.name,
                config.network()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            info!("Transaction cancelled by user");
            return Ok(());
        }
    }

    let provider = HttpWalletProvider::new(entry, config.wallet.request_timeout_ms)?;
    let accounts = provider.connect().await?;
    let account = pick_account(&accounts, tx.sender())?;

    if tx.sender().is_none() {
        tx.set_sender(account.address);
    }

    let result = provider
        .sign_and_execute(&tx, account, &config.network().chain_id())
        .await?;

    println!("\n=== TRANSACTION SENT ===");
    println!("Wallet: {}", provider.name());
    println!("Sender: {}", account.address);
    println!("Digest: {}", result.digest);
    Ok(())
}

/// Fill in shared object versions missing from config by querying the fullnode
async fn with_shared_versions(config: &Config) -> Result<Config> {
    let mut config = config.clone();
    if config.contract.registry_version.is_some() && config.contract.events_version.is_some() {
        return Ok(config);
    }

    let client = SuiClient::from_config(&config)?;
    let contract = &mut config.contract;

    if contract.registry_version.is_none() {
        if let Some(id) = &contract.registry_id {
            contract.registry_version = Some(client.shared_version(id).await?);
        }
    }
    if contract.events_version.is_none() {
        if let Some(id) = &contract.events_id {
            contract.events_version = Some(client.shared_version(id).await?);
        }
    }

    info!(
        "Shared versions: registry {:?}, events {:?}",
        contract.registry_version, contract.events_version
    );
    Ok(config)
}

/// Pick the account matching `sender`, or the first one
fn pick_account(
    accounts: &[WalletAccount],
    sender: Option<SuiAddress>,
) -> crate::Result<&WalletAccount> {
    match sender {
        Some(sender) => accounts
            .iter()
            .find(|a| a.address == sender)
            .ok_or_else(|| {
                Error::WalletConnection(format!("Wallet does not expose account {}", sender))
            }),
        None => accounts
            .first()
            .ok_or_else(|| Error::WalletConnection("Wallet exposed no accounts".to_string())),
    }
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}

/// Check fullnode reachability
pub async fn health(config: &Config) -> Result<()> {
    println!("\n=== SYSTEM HEALTH CHECK ===\n");

    print!("Fullnode ({})... ", config.network());
    let client = SuiClient::from_config(config)?;
    let started = std::time::Instant::now();
    let rpc_ok = match client.chain_identifier().await {
        Ok(chain) => {
            println!("OK (chain {}, {}ms)", chain, started.elapsed().as_millis());
            true
        }
        Err(e) => {
            println!("FAILED: {}", e);
            false
        }
    };

    print!("Package {}... ", config.contract.package_id);
    let package_ok = match client.get_object(&config.contract.package_id).await {
        Ok(_) => {
            println!("OK");
            true
        }
        Err(e) => {
            println!("FAILED: {}", e);
            false
        }
    };

    print!("Wallet... ");
    let registry = WalletRegistry::load(Path::new(&config.wallet.registry_path))?;
    println!("{}", select_wallet(&registry, &config.wallet.preferred));

    println!();
    if rpc_ok && package_ok {
        println!("All systems healthy!");
        Ok(())
    } else {
        anyhow::bail!("Some systems are unhealthy. Check the errors above.")
    }
}

/// List all registered wallets
pub fn wallet_list(config: &Config) -> Result<()> {
    let registry = WalletRegistry::load(Path::new(&config.wallet.registry_path))?;

    println!("\n=== REGISTERED WALLETS ===\n");
    println!("{:<24} {:<32} {}", "NAME", "ENDPOINT", "CHAINS");
    println!("{}", "-".repeat(80));

    for wallet in &registry.wallets {
        let chains = if wallet.chains.is_empty() {
            "any".to_string()
        } else {
            wallet.chains.join(",")
        };
        println!("{:<24} {:<32} {}", wallet.name, wallet.endpoint, chains);
    }

    println!();
    Ok(())
}

/// Show which wallet would be connected
pub fn wallet_detect(config: &Config, pattern: Option<&str>) -> Result<()> {
    let registry = WalletRegistry::load(Path::new(&config.wallet.registry_path))?;
    let pattern = pattern.unwrap_or(&config.wallet.preferred);
    let selection = select_wallet(&registry, pattern);

    println!("{}", selection);
    if let Some(entry) = selection.wallet() {
        println!("  Endpoint: {}", entry.endpoint);
    }
    Ok(())
}

/// Register a wallet bridge
pub fn wallet_add(config: &Config, name: &str, endpoint: &str, chains: Vec<String>) -> Result<()> {
    let path = Path::new(&config.wallet.registry_path);
    let mut registry = WalletRegistry::load(path)?;

    let mut entry = WalletEntry::new(name, endpoint);
    entry.chains = chains;
    registry.add(entry)?;
    registry.save(path)?;

    println!("Added wallet {}", name);
    Ok(())
}

/// Remove a wallet bridge
pub fn wallet_remove(config: &Config, name: &str) -> Result<()> {
    let path = Path::new(&config.wallet.registry_path);
    let mut registry = WalletRegistry::load(path)?;
    registry.remove(name)?;
    registry.save(path)?;

    println!("Removed wallet {}", name);
    Ok(())
}

/// Connect to the selected wallet and list its accounts
pub async fn wallet_connect(config: &Config, name: Option<&str>) -> Result<()> {
    let registry = WalletRegistry::load(Path::new(&config.wallet.registry_path))?;
    let pattern = name.unwrap_or(&config.wallet.preferred);

    let selection = select_wallet(&registry, pattern);
    let entry = match selection.wallet() {
        Some(entry) => entry.clone(),
        None => {
            println!("{}", selection);
            return Err(Error::WalletNotFound(pattern.to_string()).into());
        }
    };

    let provider = HttpWalletProvider::new(entry, config.wallet.request_timeout_ms)?;
    let accounts = provider.connect().await?;

    println!("\n=== CONNECTED: {} ===\n", provider.name());
    for account in &accounts {
        println!(
            "{} {}",
            account.address,
            account.label.as_deref().unwrap_or("")
        );
    }
    println!();
    Ok(())
}

/// Print one object
pub async fn object(config: &Config, id: &str) -> Result<()> {
    let client = SuiClient::from_config(config)?;
    let object = client.get_object(id).await?;
    println!("{}", serde_json::to_string_pretty(&object)?);
    Ok(())
}

/// Print objects of a struct type owned by `owner`
pub async fn owned(config: &Config, owner: &str, struct_type: &str) -> Result<()> {
    let client = SuiClient::from_config(config)?;
    let objects = client.get_all_owned_by_type(owner, struct_type).await?;

    if objects.is_empty() {
        warn!("{} owns no {}", owner, struct_type);
    }
    println!("{}", serde_json::to_string_pretty(&objects)?);
    Ok(())
}

/// Print the profile objects owned by `owner`
pub async fn profile(config: &Config, owner: &str) -> Result<()> {
    let builder = ProfileTransactions::new(config.package_id()?);
    let struct_type = builder.targets().profile_struct_type();

    let client = SuiClient::from_config(config)?;
    let profiles = client.get_all_owned_by_type(owner, &struct_type).await?;

    if profiles.is_empty() {
        println!("{} has no profile", owner);
        return Ok(());
    }

    println!("\n=== PROFILE ===\n");
    for profile in &profiles {
        println!("Object:  {} (version {})", profile.object_id, profile.version);
        match profile.fields() {
            Some(fields) => println!("{}", serde_json::to_string_pretty(fields)?),
            None => println!("(no content returned)"),
        }
    }
    Ok(())
}

/// Print dynamic fields (projects, certificates) under a parent object
pub async fn fields(config: &Config, parent: &str) -> Result<()> {
    let client = SuiClient::from_config(config)?;
    let fields = client.get_all_dynamic_fields(parent).await?;
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

/// Execute transaction bytes that were signed elsewhere
pub async fn execute(config: &Config, tx_bytes: &str, signatures: &[String]) -> Result<()> {
    if signatures.is_empty() {
        anyhow::bail!("At least one signature is required");
    }

    let client = SuiClient::from_config(config)?;
    let response = client.execute_transaction_block(tx_bytes, signatures).await?;

    println!("Digest: {}", response.digest);
    println!("Status: {}", response.status().unwrap_or("unknown"));
    if let Some(errors) = &response.errors {
        for error in errors {
            println!("Error: {}", error);
        }
    }
    Ok(())
}
