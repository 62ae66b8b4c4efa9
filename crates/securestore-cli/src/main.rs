//! Demo CLI over the end-to-end encrypted, multi-user, shareable file
//! store defined by `securestore-client`. State is persisted to a single
//! JSON file between invocations (see `store::FileBackedStore`); this is
//! a demonstration transport, not a production one.

mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use securestore_client::Vault;
use std::fs;
use std::path::PathBuf;
use store::FileBackedStore;

#[derive(Parser)]
#[command(name = "securestore", about = "End-to-end encrypted multi-user file store")]
struct Cli {
    /// Path to the persisted state file. Defaults to a per-user data directory.
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a brand-new user.
    Register { username: String },
    /// Store bytes under a filename, overwriting any previous contents.
    Store {
        username: String,
        filename: String,
        /// Read file contents from this path instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Append bytes to an existing filename.
    Append {
        username: String,
        filename: String,
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Load a file's plaintext contents and print them (or write to --output).
    Load {
        username: String,
        filename: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Issue a share capability for filename to recipient.
    Share {
        username: String,
        filename: String,
        recipient: String,
    },
    /// Redeem a capability issued by sender, under a local filename.
    Receive {
        username: String,
        filename: String,
        sender: String,
        capability: String,
    },
    /// Revoke every recipient's access to filename.
    Revoke { username: String, filename: String },
}

fn read_password(prompt: &str) -> Result<String> {
    print!("{prompt}");
    use std::io::Write;
    std::io::stdout().flush().ok();
    rpassword::read_password().context("reading password")
}

fn read_input(path: Option<PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(p) => fs::read(&p).with_context(|| format!("reading {}", p.display())),
        None => {
            use std::io::Read;
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let state_path = cli.state.unwrap_or_else(store::default_state_path);
    let store = FileBackedStore::load(&state_path)?;
    let vault = Vault::new(store.clone(), store.clone());

    match cli.command {
        Command::Register { username } => {
            let password = read_password("New password: ")?;
            vault.init_user(&username, &password)?;
            println!("registered {username}");
        }
        Command::Store {
            username,
            filename,
            input,
        } => {
            let password = read_password("Password: ")?;
            let handle = vault.get_user(&username, &password)?;
            let data = read_input(input)?;
            handle.store_file(&filename, &data)?;
            println!("stored {} bytes as {filename}", data.len());
        }
        Command::Append {
            username,
            filename,
            input,
        } => {
            let password = read_password("Password: ")?;
            let handle = vault.get_user(&username, &password)?;
            let data = read_input(input)?;
            handle.append_file(&filename, &data)?;
            println!("appended {} bytes to {filename}", data.len());
        }
        Command::Load {
            username,
            filename,
            output,
        } => {
            let password = read_password("Password: ")?;
            let handle = vault.get_user(&username, &password)?;
            let data = handle.load_file(&filename)?;
            match output {
                Some(path) => {
                    fs::write(&path, &data)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("wrote {} bytes to {}", data.len(), path.display());
                }
                None => match std::str::from_utf8(&data) {
                    Ok(text) => println!("{text}"),
                    Err(_) => println!("{}", hex::encode(&data)),
                },
            }
        }
        Command::Share {
            username,
            filename,
            recipient,
        } => {
            let password = read_password("Password: ")?;
            let handle = vault.get_user(&username, &password)?;
            let capability = handle.share_file(&filename, &recipient)?;
            println!("{capability}");
        }
        Command::Receive {
            username,
            filename,
            sender,
            capability,
        } => {
            let password = read_password("Password: ")?;
            let handle = vault.get_user(&username, &password)?;
            handle.receive_file(&filename, &sender, &capability)?;
            println!("received {filename} from {sender}");
        }
        Command::Revoke { username, filename } => {
            let password = read_password("Password: ")?;
            let handle = vault.get_user(&username, &password)?;
            handle.revoke_file(&filename)?;
            println!("revoked access to {filename}");
        }
    }

    store.save(&state_path)?;
    Ok(())
}
