use std::io::IsTerminal;

use anyhow::Result;
use cred_locker::core::config::Config;
use cred_locker::core::logging;
use cred_locker::core::shell::Shell;
use cred_locker::core::store::CredentialStore;
use tracing::info;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() >= 2 {
        match args[1].as_str() {
            "help" | "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("cred-locker {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_help();
                std::process::exit(2);
            }
        }
    }

    run_shell()
}

fn print_help() {
    println!("cred-locker - In-memory password manager");
    println!();
    println!("USAGE:");
    println!("  cred-locker              Opens the interactive menu");
    println!("  cred-locker help         Shows this message");
    println!("  cred-locker --version    Shows the version");
    println!();
    println!("Passwords live in memory only and are lost when the program exits.");
    println!();
    println!("ENVIRONMENT:");
    println!("  CRED_LOCKER_CONFIG_DIR   Directory holding config.toml");
    println!("  RUST_LOG                 Log filter (overrides [logging] level)");
}

fn run_shell() -> Result<()> {
    let config_dir = Config::get_config_dir()?;
    let config = Config::load(&config_dir)?;
    logging::init_logging(&config.logging);
    info!(config_dir = %config_dir.display(), "Starting shell");

    let stdin = std::io::stdin();
    let hide_input = stdin.is_terminal();
    let mut shell = Shell::new(
        CredentialStore::new(),
        config.shell,
        stdin.lock(),
        std::io::stdout(),
    )
    .with_hidden_input(hide_input);

    shell.run()?;
    info!(entries = shell.store().len(), "Shell closed");
    Ok(())
}
