//! deskfs - In-memory encrypted virtual file store
//!
//! Usage:
//!   deskfs init     - Write a default configuration file
//!   deskfs status   - Show the effective configuration
//!   deskfs shell    - Interactive session against a fresh store

use clap::{Parser, Subcommand};
use deskfs::store::FileStore;
use deskfs::tree::{Folder, Node, NodeKind};
use deskfs::{Config, Error, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "deskfs")]
#[command(author = "deskfs Contributors")]
#[command(version = "0.1.0")]
#[command(about = "In-memory encrypted virtual file store")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "~/.config/deskfs/config.json")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,

    /// Show the effective configuration
    Status,

    /// Start an interactive session against a fresh store
    Shell,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let config_path = expand_tilde(&cli.config);

    if let Err(e) = run_command(cli.command, &config_path) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_command(command: Commands, config_path: &PathBuf) -> Result<()> {
    match command {
        Commands::Init => cmd_init(config_path),
        Commands::Status => cmd_status(config_path),
        Commands::Shell => cmd_shell(config_path),
    }
}

fn cmd_init(config_path: &PathBuf) -> Result<()> {
    info!("Initializing deskfs...");

    let config = Config::default();

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    config.save(config_path)?;

    info!("Configuration saved to {:?}", config_path);
    info!("Run 'deskfs shell' to start a session");

    Ok(())
}

fn cmd_status(config_path: &PathBuf) -> Result<()> {
    let config = load_or_default(config_path);

    println!("deskfs Status");
    println!("=============");
    println!();
    println!("Configuration: {:?}", config_path);
    println!("Max path depth: {}", config.limits.max_path_depth);
    println!("Max name length: {} bytes", config.limits.max_name_len);
    println!(
        "Argon2: {} KiB memory, {} iterations, parallelism {}",
        config.encryption.argon2_memory_kib,
        config.encryption.argon2_iterations,
        config.encryption.argon2_parallelism
    );
    println!(
        "KDF salt: {}",
        if config.encryption.salt.is_empty() {
            "generated per session".to_string()
        } else {
            hex::encode(&config.encryption.salt)
        }
    );

    Ok(())
}

fn cmd_shell(config_path: &PathBuf) -> Result<()> {
    let config = load_or_default(config_path);
    let mut fs = FileStore::new(config);

    println!("deskfs interactive session (type 'help' for commands)");

    let stdin = std::io::stdin();
    loop {
        print!("{} ", if fs.is_encrypted() { "deskfs*>" } else { "deskfs>" });
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(command) => command,
            None => continue,
        };
        let args: Vec<&str> = parts.collect();

        match dispatch(&mut fs, command, &args) {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => println!("error: {}", e),
        }
    }

    Ok(())
}

/// Execute one shell command; returns Ok(true) to exit the session
fn dispatch(fs: &mut FileStore, command: &str, args: &[&str]) -> Result<bool> {
    match command {
        "help" => {
            println!("Commands:");
            println!("  ls [path]             list a folder");
            println!("  tree                  print the whole tree");
            println!("  mkdir <path>          create a folder (with parents)");
            println!("  touch <path>          create an empty file (with parents)");
            println!("  cat <path>            print a file's content");
            println!("  write <path> <text>   replace a file's content");
            println!("  rm <path>             delete a file or folder");
            println!("  rename <path> <name>  rename an item in place");
            println!("  lock                  set an encryption passphrase");
            println!("  unlock                drop the passphrase (decrypt all)");
            println!("  status                show session state");
            println!("  exit                  leave the session");
        }

        "ls" => {
            let path = parse_path(args.first().copied().unwrap_or(""));
            for entry in fs.list_dir(&path)? {
                match entry.kind {
                    NodeKind::Folder => println!("{}/", entry.name),
                    NodeKind::File => println!("{}", entry.name),
                }
            }
        }

        "tree" => print_tree(&fs.snapshot(), 0),

        "mkdir" => {
            let (path, name) = split_target(args.first().copied())?;
            fs.create_folder(&path, &name)?;
        }

        "touch" => {
            let (path, name) = split_target(args.first().copied())?;
            fs.create_file(&path, &name)?;
        }

        "cat" => {
            let path = parse_path(require_arg(args.first().copied())?);
            println!("{}", fs.read_file(&path)?);
        }

        "write" => {
            let path = parse_path(require_arg(args.first().copied())?);
            let content = args.get(1..).unwrap_or(&[]).join(" ");
            fs.update_file_content(&path, &content)?;
        }

        "rm" => {
            let path = parse_path(require_arg(args.first().copied())?);
            fs.delete_item(&path)?;
        }

        "rename" => {
            let path = parse_path(require_arg(args.first().copied())?);
            let new_name = require_arg(args.get(1).copied())?;
            fs.rename_item(&path, new_name)?;
        }

        "lock" => {
            let passphrase = rpassword::prompt_password("Enter encryption passphrase: ")
                .map_err(|e| Error::Internal(e.to_string()))?;
            fs.set_encryption(Some(&passphrase))?;
            println!("store locked");
        }

        "unlock" => {
            fs.set_encryption(None)?;
            println!("store unlocked");
        }

        "status" => {
            let snapshot = fs.snapshot();
            println!(
                "{} file(s), {}",
                snapshot.file_count(),
                if fs.is_encrypted() {
                    "encrypted"
                } else {
                    "plaintext"
                }
            );
        }

        "exit" | "quit" => return Ok(true),

        other => println!("unknown command '{}' (type 'help')", other),
    }

    Ok(false)
}

/// Split a slash-separated path into segments
fn parse_path(raw: &str) -> Vec<String> {
    raw.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Split a target path into (parent path, final name)
fn split_target(raw: Option<&str>) -> Result<(Vec<String>, String)> {
    let mut path = parse_path(require_arg(raw)?);
    let name = path
        .pop()
        .ok_or_else(|| Error::InvalidName("name must not be empty".to_string()))?;
    Ok((path, name))
}

fn require_arg(arg: Option<&str>) -> Result<&str> {
    arg.ok_or_else(|| Error::Internal("missing argument (type 'help')".to_string()))
}

/// Print the tree with two-space indentation per level
fn print_tree(folder: &Folder, depth: usize) {
    if depth == 0 {
        println!("/");
    }
    for child in &folder.children {
        let indent = "  ".repeat(depth + 1);
        match child {
            Node::Folder(sub) => {
                println!("{}{}/", indent, sub.name);
                print_tree(sub, depth + 1);
            }
            Node::File(file) => println!("{}{}", indent, file.name),
        }
    }
}

fn load_or_default(config_path: &PathBuf) -> Config {
    match Config::load(config_path) {
        Ok(config) => config,
        Err(_) => {
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &PathBuf) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap());
        }
    }
    path.clone()
}
