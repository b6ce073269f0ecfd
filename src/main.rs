//! aead-adapter 命令行入口
//!
//! 用法：
//!   aead-adapter algorithms
//!   aead-adapter encrypt <input> <output> [--cipher chacha20|aes-256]
//!   aead-adapter decrypt <input> <output>
//!
//! 口令依次取自 `--password`、环境变量 `AEAD_ADAPTER_PASSWORD`，
//! 都没有时交互式输入。实际逻辑都委托给库。

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

use aead_adapter::{AlgorithmRegistry, CapabilityTable, CipherKind, KdfParams, register_algorithms};

#[derive(Parser)]
#[command(name = "aead-adapter", about = "Authenticated encryption over ChaCha20-Poly1305 and AES-256-GCM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List cipher/mode pairs available on this machine.
    Algorithms,
    /// Seal a file with a password.
    Encrypt {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value = "chacha20")]
        cipher: CipherKind,
        #[arg(long, env = "AEAD_ADAPTER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Argon2id memory cost in KiB.
        #[arg(long)]
        memory_kib: Option<u32>,
        /// Argon2id iterations.
        #[arg(long)]
        iterations: Option<u32>,
    },
    /// Open a sealed file.
    Decrypt {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, env = "AEAD_ADAPTER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn read_password(given: Option<String>) -> anyhow::Result<Zeroizing<String>> {
    let password = match given {
        Some(password) => Zeroizing::new(password),
        None => Zeroizing::new(
            rpassword::prompt_password("Password: ").context("failed to read password")?,
        ),
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

fn list_algorithms() -> anyhow::Result<()> {
    let table = CapabilityTable::native();
    let mut registry = AlgorithmRegistry::new();
    register_algorithms(&table, &mut registry)?;

    for entry in registry.entries() {
        let profile = table.lookup(entry.cipher, entry.mode)?;
        println!(
            "{}/{}\tkey={} tag={} iv={} block={}\t{:?}",
            entry.cipher,
            entry.mode,
            profile.key_len,
            profile.tag_len,
            profile.nonce_len,
            profile.block_size,
            entry.implementation,
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    match cli.command {
        Commands::Algorithms => list_algorithms(),
        Commands::Encrypt {
            input,
            output,
            cipher,
            password,
            memory_kib,
            iterations,
        } => {
            let defaults = KdfParams::default();
            let params = KdfParams {
                memory_kib: memory_kib.unwrap_or(defaults.memory_kib),
                iterations: iterations.unwrap_or(defaults.iterations),
                ..defaults
            };
            let password = read_password(password)?;
            aead_adapter::encrypt_with_algorithm(&input, &output, &password, cipher, &params)
                .with_context(|| format!("failed to encrypt {}", input.display()))
        }
        Commands::Decrypt {
            input,
            output,
            password,
        } => {
            let password = read_password(password)?;
            aead_adapter::decrypt(&input, &output, &password)
                .with_context(|| format!("failed to decrypt {}", input.display()))
        }
    }
}
