use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use distctl::client::auth::Credentials;
use distctl::client::DistClient;
use distctl::config::Config;
use distctl::resources::{
    permission, release_bundle, signing_key, vault_signing_key, PlanAction,
};

/// Declarative CLI for JFrog Distribution
#[derive(Parser, Debug)]
#[command(name = "distctl", version, about, long_about = None)]
struct Args {
    /// JFrog Platform URL (falls back to JFROG_URL, then the config file)
    #[arg(long)]
    url: Option<String>,

    /// Access token (falls back to JFROG_ACCESS_TOKEN, then the config file)
    #[arg(long)]
    access_token: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show what apply would change, without mutating anything
    Plan {
        /// Resource manifest (YAML)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Create or update every resource in a manifest
    Apply {
        /// Resource manifest (YAML)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete every resource in a manifest
    Destroy {
        /// Resource manifest (YAML)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Adopt an existing remote resource and print its state
    Import {
        /// Resource kind
        #[arg(value_enum)]
        kind: ResourceKind,
        /// Import identifier (permission: name; release-bundle: name:version)
        id: String,
    },
    /// Store platform URL and access token in the config file
    Configure {
        /// JFrog Platform URL to persist
        #[arg(long)]
        url: Option<String>,
        /// Access token to persist
        #[arg(long)]
        access_token: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResourceKind {
    Permission,
    ReleaseBundle,
    SigningKey,
    VaultSigningKey,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("distctl started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("distctl").join("distctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".distctl").join("distctl.log");
    }
    PathBuf::from("distctl.log")
}

/// A YAML manifest of declared resources
#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    permission_targets: Vec<permission::PermissionConfig>,
    #[serde(default)]
    release_bundles: Vec<release_bundle::ReleaseBundleConfig>,
    #[serde(default)]
    signing_keys: Vec<signing_key::SigningKeyConfig>,
    #[serde(default)]
    vault_signing_keys: Vec<vault_signing_key::VaultSigningKeyConfig>,
}

impl Manifest {
    fn load(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if let Command::Configure { url, access_token } = &args.command {
        let mut config = Config::load();
        if let Some(url) = url {
            config.set_url(url)?;
        }
        if let Some(token) = access_token {
            config.set_access_token(token)?;
        }
        println!("configuration saved");
        return Ok(());
    }

    let config = Config::load();
    let credentials = Credentials::resolve(
        args.url.as_deref(),
        args.access_token.as_deref(),
        &config,
    )
    .context("No JFrog Platform URL configured. Set JFROG_URL or use --url")?;

    let client = DistClient::from_credentials(&credentials)?;

    match args.command {
        Command::Plan { file } => run_plan(&client, &Manifest::load(&file)?).await,
        Command::Apply { file } => run_apply(&client, &Manifest::load(&file)?).await,
        Command::Destroy { file } => run_destroy(&client, &Manifest::load(&file)?).await,
        Command::Import { kind, id } => run_import(&client, kind, &id).await,
        // handled before credential resolution
        Command::Configure { .. } => Ok(()),
    }
}

async fn run_plan(client: &DistClient, manifest: &Manifest) -> Result<()> {
    for config in &manifest.permission_targets {
        let current = permission::read(client, &config.name).await?;
        let action = permission::plan(current.as_ref(), config)?;
        println!("permission target {}: {}", config.name, action);
    }

    for config in &manifest.release_bundles {
        let current = release_bundle::read(client, &config.name, &config.version).await?;
        let action = release_bundle::plan(current.as_ref(), config)?;
        println!("release bundle {}/{}: {}", config.name, config.version, action);
    }

    for config in &manifest.signing_keys {
        let action = signing_key_plan(client, config).await?;
        println!("signing key {}/{}: {}", config.protocol, config.alias, action);
    }

    for config in &manifest.vault_signing_keys {
        // the alias is server-assigned, so without tracked state the CLI can
        // only propose creation
        vault_signing_key::validate(config)
            .into_result()
            .map_err(distctl::error::DistError::Validation)?;
        println!(
            "vault signing key ({}): {}",
            config.protocol,
            PlanAction::Create
        );
    }

    Ok(())
}

/// Derive the signing-key plan from what the API exposes: existence and the
/// public key. Propagation flags are creation-time options the API does not
/// echo, so they cannot participate here.
async fn signing_key_plan(
    client: &DistClient,
    config: &signing_key::SigningKeyConfig,
) -> Result<PlanAction> {
    let current = signing_key::read(client, &config.protocol, &config.alias).await?;

    let state = current.map(|info| signing_key::SigningKeyState {
        protocol: config.protocol.clone(),
        alias: info.alias,
        propagate_to_edge_nodes: config.propagate_to_edge_nodes.unwrap_or(false),
        fail_on_propagation_failure: config.fail_on_propagation_failure.unwrap_or(false),
        set_as_default: config.set_as_default.unwrap_or(false),
        public_key: info.public_key,
    });

    Ok(signing_key::plan(state.as_ref(), config)?)
}

async fn run_apply(client: &DistClient, manifest: &Manifest) -> Result<()> {
    for config in &manifest.permission_targets {
        let current = permission::read(client, &config.name).await?;
        match permission::plan(current.as_ref(), config)? {
            PlanAction::NoChange => {
                println!("permission target {}: unchanged", config.name);
            }
            PlanAction::Create => {
                permission::create(client, config).await?;
                println!("permission target {}: created", config.name);
            }
            PlanAction::Update | PlanAction::Replace => {
                // create and update are the same PUT for this resource
                permission::update(client, config).await?;
                println!("permission target {}: updated", config.name);
            }
        }
    }

    for config in &manifest.release_bundles {
        let current = release_bundle::read(client, &config.name, &config.version).await?;
        match release_bundle::plan(current.as_ref(), config)? {
            PlanAction::NoChange => {
                println!(
                    "release bundle {}/{}: unchanged",
                    config.name, config.version
                );
            }
            PlanAction::Create => {
                release_bundle::create(client, config).await?;
                println!("release bundle {}/{}: created", config.name, config.version);
            }
            PlanAction::Update => {
                release_bundle::update(client, config).await?;
                println!("release bundle {}/{}: updated", config.name, config.version);
            }
            PlanAction::Replace => {
                release_bundle::delete(client, &config.name, &config.version).await?;
                release_bundle::create(client, config).await?;
                println!(
                    "release bundle {}/{}: replaced",
                    config.name, config.version
                );
            }
        }
    }

    for config in &manifest.signing_keys {
        match signing_key_plan(client, config).await? {
            PlanAction::NoChange => {
                println!(
                    "signing key {}/{}: unchanged",
                    config.protocol, config.alias
                );
            }
            PlanAction::Create => {
                signing_key::create(client, config).await?;
                println!("signing key {}/{}: created", config.protocol, config.alias);
            }
            PlanAction::Update | PlanAction::Replace => {
                // a manifest-driven flow has no prior alias to rename from,
                // so any change is realized as delete-then-create
                signing_key::delete(client, &config.protocol, &config.alias).await?;
                signing_key::create(client, config).await?;
                println!("signing key {}/{}: replaced", config.protocol, config.alias);
            }
        }
    }

    for config in &manifest.vault_signing_keys {
        let state = vault_signing_key::create(client, config).await?;
        println!(
            "vault signing key {}/{}: created (server-assigned alias)",
            state.protocol, state.alias
        );
    }

    Ok(())
}

async fn run_destroy(client: &DistClient, manifest: &Manifest) -> Result<()> {
    for config in &manifest.permission_targets {
        permission::delete(client, &config.name).await?;
        println!("permission target {}: deleted", config.name);
    }

    for config in &manifest.release_bundles {
        release_bundle::delete(client, &config.name, &config.version).await?;
        println!("release bundle {}/{}: deleted", config.name, config.version);
    }

    for config in &manifest.signing_keys {
        signing_key::delete(client, &config.protocol, &config.alias).await?;
        println!("signing key {}/{}: deleted", config.protocol, config.alias);
    }

    if !manifest.vault_signing_keys.is_empty() {
        tracing::warn!(
            "vault signing keys have server-assigned aliases; delete them via \
             the signing-key API with the alias reported at creation"
        );
        eprintln!(
            "skipped {} vault signing key(s): aliases are server-assigned",
            manifest.vault_signing_keys.len()
        );
    }

    Ok(())
}

async fn run_import(client: &DistClient, kind: ResourceKind, id: &str) -> Result<()> {
    match kind {
        ResourceKind::Permission => {
            let name = permission::parse_import_id(id)?;
            let state = permission::read(client, &name)
                .await?
                .with_context(|| format!("permission target {name} not found"))?;
            println!("{}", serde_yaml::to_string(&state)?);
        }
        ResourceKind::ReleaseBundle => {
            let (name, version) = release_bundle::parse_import_id(id)?;
            let state = release_bundle::read(client, &name, &version)
                .await?
                .with_context(|| format!("release bundle {name}/{version} not found"))?;
            println!("{}", serde_yaml::to_string(&state)?);
        }
        ResourceKind::SigningKey | ResourceKind::VaultSigningKey => {
            // no import-ID contract exists for signing keys
            return Err(distctl::error::DistError::ImportId {
                id: id.to_string(),
                expected: "signing keys are not importable",
            }
            .into());
        }
    }

    Ok(())
}
