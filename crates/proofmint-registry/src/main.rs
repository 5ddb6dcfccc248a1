//! proofmint - Allow-list gated token registry CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use proofmint_core::{leaf_hash, Address, Hash256, TokenId};
use proofmint_registry::{
    parse_allow_list, ProofBundle, Registry, RegistryConfig, RegistryStorage,
};

/// proofmint - Merkle allow-list gated token registry
#[derive(Parser)]
#[command(name = "proofmint")]
#[command(about = "Allow-list gated token registry backed by Merkle membership proofs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the registry data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// One-time initialization; the caller becomes the authority
    Init {
        #[arg(long)]
        caller: Address,

        /// Allow-list root
        #[arg(long)]
        root: Hash256,
    },

    /// Replace the committed root (authority only)
    UpdateRoot {
        #[arg(long)]
        caller: Address,

        #[arg(long)]
        root: Hash256,
    },

    /// Hand the authority role to another identity (authority only)
    TransferAuthority {
        #[arg(long)]
        caller: Address,

        #[arg(long)]
        new_authority: Address,
    },

    /// Mint with an allow-list proof
    Mint {
        #[arg(long)]
        caller: Address,

        /// Proof siblings, leaf to root (repeat or comma-separate)
        #[arg(long, value_delimiter = ',')]
        proof: Vec<Hash256>,

        #[arg(long)]
        uri: String,
    },

    /// Issue a token without a proof (authority only)
    AdminMint {
        #[arg(long)]
        caller: Address,

        #[arg(long)]
        to: Address,

        #[arg(long)]
        uri: String,
    },

    /// Approve one identity to transfer a token
    Approve {
        #[arg(long)]
        caller: Address,

        #[arg(long)]
        to: Address,

        #[arg(long)]
        token_id: u64,
    },

    /// Grant or revoke blanket approval for an operator
    SetOperator {
        #[arg(long)]
        caller: Address,

        #[arg(long)]
        operator: Address,

        #[arg(long, action = clap::ArgAction::Set)]
        approved: bool,
    },

    /// Transfer a token
    Transfer {
        #[arg(long)]
        caller: Address,

        #[arg(long)]
        from: Address,

        #[arg(long)]
        to: Address,

        #[arg(long)]
        token_id: u64,
    },

    /// Show a token's owner
    OwnerOf {
        #[arg(long)]
        token_id: u64,
    },

    /// Show how many tokens an identity holds
    BalanceOf {
        #[arg(long)]
        identity: Address,
    },

    /// Show a token's metadata URI
    Metadata {
        #[arg(long)]
        token_id: u64,
    },

    /// Show a token's approved transferer
    Approved {
        #[arg(long)]
        token_id: u64,
    },

    /// Check allow-list membership without minting
    IsMember {
        #[arg(long)]
        identity: Address,

        #[arg(long, value_delimiter = ',')]
        proof: Vec<Hash256>,
    },

    /// Show registry status
    Status,

    /// Print the notification log as JSON lines
    Events {
        /// Skip this many earlier events
        #[arg(long, default_value = "0")]
        since: usize,

        /// Only show events about this token
        #[arg(long)]
        token_id: Option<u64>,
    },

    /// Print an identity's leaf hash
    Leaf {
        #[arg(long)]
        identity: Address,
    },

    /// Build an allow-list tree and export root and proofs
    BuildTree {
        /// File with one address per line
        #[arg(long)]
        input: PathBuf,

        /// Write the proof bundle here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    fn is_mutating(&self) -> bool {
        matches!(
            self,
            Commands::Init { .. }
                | Commands::UpdateRoot { .. }
                | Commands::TransferAuthority { .. }
                | Commands::Mint { .. }
                | Commands::AdminMint { .. }
                | Commands::Approve { .. }
                | Commands::SetOperator { .. }
                | Commands::Transfer { .. }
        )
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RegistryConfig::load(path)?,
        None => RegistryConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Tooling commands never touch the registry
    match &cli.command {
        Commands::Leaf { identity } => {
            println!("{}", leaf_hash(identity));
            return Ok(());
        }
        Commands::BuildTree { input, output } => {
            let text = std::fs::read_to_string(input)?;
            let members = parse_allow_list(&text)?;
            let bundle = ProofBundle::build(&members)?;
            let json = serde_json::to_string_pretty(&bundle)?;

            match output {
                Some(path) => {
                    std::fs::write(path, json)?;
                    info!("Wrote proofs for {} members to {:?}", bundle.proofs.len(), path);
                    println!("{}", bundle.root);
                }
                None => println!("{}", json),
            }
            return Ok(());
        }
        _ => {}
    }

    config.ensure_directories()?;
    let storage = RegistryStorage::new(config.data_dir.clone())?;

    if cli.command.is_mutating() {
        storage.update(&config.collection, |registry| run(registry, cli.command))
    } else {
        let mut registry = storage.load_registry(&config.collection)?;
        run(&mut registry, cli.command)
    }
}

fn run(registry: &mut Registry, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init { caller, root } => {
            registry.initialize(caller, root)?;
            println!("Initialized. Authority: {}", caller);
        }

        Commands::UpdateRoot { caller, root } => {
            registry.update_root(caller, root)?;
            println!("Root updated: {}", root);
        }

        Commands::TransferAuthority {
            caller,
            new_authority,
        } => {
            registry.transfer_authority(caller, new_authority)?;
            println!("Authority transferred to {}", new_authority);
        }

        Commands::Mint { caller, proof, uri } => {
            let token_id = registry.mint_by_proof(caller, &proof, uri)?;
            println!("Minted token {} to {}", token_id.value(), caller);
        }

        Commands::AdminMint { caller, to, uri } => {
            let token_id = registry.admin_mint(caller, to, uri)?;
            println!("Minted token {} to {}", token_id.value(), to);
        }

        Commands::Approve {
            caller,
            to,
            token_id,
        } => {
            registry.approve(caller, to, TokenId(token_id))?;
            println!("Token {} approved for {}", token_id, to);
        }

        Commands::SetOperator {
            caller,
            operator,
            approved,
        } => {
            registry.set_operator_approval(caller, operator, approved)?;
            println!("Operator {} approved: {}", operator, approved);
        }

        Commands::Transfer {
            caller,
            from,
            to,
            token_id,
        } => {
            registry.transfer(caller, from, to, TokenId(token_id))?;
            println!("Token {} transferred to {}", token_id, to);
        }

        Commands::OwnerOf { token_id } => {
            println!("{}", registry.owner_of(TokenId(token_id))?);
        }

        Commands::BalanceOf { identity } => {
            println!("{}", registry.balance_of(&identity)?);
        }

        Commands::Metadata { token_id } => {
            println!("{}", registry.token_metadata(TokenId(token_id))?);
        }

        Commands::Approved { token_id } => match registry.approved(TokenId(token_id))? {
            Some(approved) => println!("{}", approved),
            None => println!("none"),
        },

        Commands::IsMember { identity, proof } => {
            println!("{}", registry.is_member(&identity, &proof));
        }

        Commands::Status => {
            let collection = registry.collection();
            println!("\n=== {} ({}) ===\n", collection.name, collection.symbol);
            match (registry.authority(), registry.root()) {
                (Some(authority), Some(root)) => {
                    println!("State:        active");
                    println!("Authority:    {}", authority);
                    println!("Root:         {}", root);
                }
                _ => println!("State:        uninitialized"),
            }
            println!("Total supply: {}", registry.total_supply());
            println!("Events:       {}", registry.events().len());
        }

        Commands::Events { since, token_id } => {
            let wanted = token_id.map(TokenId);
            for event in registry
                .events()
                .iter()
                .skip(since)
                .filter(|event| wanted.is_none() || event.token_id() == wanted)
            {
                println!("{}", serde_json::to_string(event)?);
            }
        }

        // Handled before the registry is loaded
        Commands::Leaf { .. } | Commands::BuildTree { .. } => {}
    }

    Ok(())
}
