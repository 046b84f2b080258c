//! keepsake: command-line client for the gift vault
//!
//! Commands:
//!   guess <code>                 - try a codeword against the vault
//!   hint                         - get a hint for a still-locked codeword
//!   unlock <url> <filename>      - fetch and decrypt a sealed download
//!   seal <input> <output>        - encrypt a file into a sealed blob
//!   favorite <code>              - toggle a favorite
//!   progress show|clear|export|import

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use keepsake_core::{Content, KeepsakeConfig, UnlockError};
use keepsake_crypto::{seal, KdfParams};
use keepsake_unlock::{sanitize_filename, BlobFetcher, Unlocker};
use keepsake_vault::{Guess, JsonProgressStore, Session, Vault};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "keepsake",
    version,
    about = "A codeword-unlocked gift vault",
    long_about = "keepsake: guess codewords to reveal messages and unlock sealed downloads"
)]
struct Cli {
    /// Path to keepsake.toml configuration file
    #[arg(long, short = 'c', env = "KEEPSAKE_CONFIG", default_value = "keepsake.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Try a codeword against the vault
    Guess {
        /// The codeword (accents, spaces and case do not matter)
        code: String,
    },

    /// Get a hint for a still-locked codeword
    Hint,

    /// Fetch a sealed download and decrypt it with a passphrase
    Unlock {
        /// URL of the sealed blob
        url: String,
        /// Declared filename (advisory; sanitized before saving)
        filename: String,
        /// Output path (default: the sanitized filename in the current dir)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
        /// Use the low-memory KDF tier instead of the configured one
        #[arg(long)]
        low_memory: bool,
    },

    /// Encrypt a file into a sealed blob (the reference encryptor)
    Seal {
        /// Plaintext input file
        input: PathBuf,
        /// Sealed output file (conventionally with a .enc suffix)
        output: PathBuf,
        /// Use the low-memory KDF tier instead of the configured one
        #[arg(long)]
        low_memory: bool,
    },

    /// Toggle a favorite
    Favorite {
        code: String,
    },

    /// Progress management
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },
}

#[derive(Subcommand, Debug)]
enum ProgressAction {
    /// Show unlocked counts, favorites and achievements
    Show,
    /// Forget all progress
    Clear,
    /// Write progress to a JSON file for transfer to another device
    Export { path: PathBuf },
    /// Replace progress with an exported JSON file
    Import { path: PathBuf },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;

    match cli.command {
        Commands::Guess { code } => cmd_guess(&config, &code),
        Commands::Hint => cmd_hint(&config),
        Commands::Unlock {
            url,
            filename,
            out,
            low_memory,
        } => cmd_unlock(&config, &url, &filename, out.as_deref(), low_memory).await,
        Commands::Seal {
            input,
            output,
            low_memory,
        } => cmd_seal(&config, &input, &output, low_memory).await,
        Commands::Favorite { code } => cmd_favorite(&config, &code),
        Commands::Progress { action } => cmd_progress(&config, action),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ── Config loading ────────────────────────────────────────────────────────────

async fn load_config(path: &Path) -> Result<KeepsakeConfig> {
    if path.exists() {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config: {}", path.display()))
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(KeepsakeConfig::default())
    }
}

fn open_session(config: &KeepsakeConfig) -> Result<Session<JsonProgressStore>> {
    let vault = Vault::load(&config.vault.path)?;
    let store = JsonProgressStore::new(expand_tilde(&config.progress.path));
    Session::new(vault, store)
}

fn kdf_params(config: &KeepsakeConfig, low_memory: bool) -> Result<KdfParams> {
    if low_memory {
        Ok(KdfParams::LOW_MEMORY)
    } else {
        KdfParams::from_tier(&config.crypto.kdf_tier)
    }
}

/// Expand `~` in path to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if s.starts_with("~/") {
        let home = std::env::var("HOME").unwrap_or_default();
        PathBuf::from(format!("{}/{}", home, &s[2..]))
    } else {
        path.to_path_buf()
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_guess(config: &KeepsakeConfig, code: &str) -> Result<()> {
    let mut session = open_session(config)?;

    match session.submit(code)? {
        Guess::Revealed {
            code,
            entry,
            newly_unlocked,
            achievements,
        } => {
            if newly_unlocked {
                println!("✨ New secret unlocked: {code}");
            } else {
                println!("Secret revisited: {code}");
            }
            println!("[{}]", entry.category);
            print_content(&entry.content);
            if let Some(track) = &entry.audio {
                println!("♪ plays: {track}");
            }
            for achievement in achievements {
                println!("🏆 {}", achievement.message);
            }
            println!(
                "Discovered: {} / {}",
                session.unlocked_count(),
                session.total_count()
            );
        }
        Guess::Unknown { near_miss } => {
            if near_miss {
                println!("Not quite... but you are very close!");
            } else {
                println!("Unknown code. Keep trying!");
            }
        }
    }
    Ok(())
}

fn print_content(content: &Content) {
    match content {
        Content::Text { body } => println!("\n{body}"),
        Content::Image { path } => println!("Image: {path}"),
        Content::Video { embed_url, caption } => {
            if let Some(caption) = caption {
                println!("{caption}");
            }
            println!("Video: {embed_url}");
        }
        Content::Link { url } => println!("Link: {url}"),
        Content::Download { url, name, note, .. } => {
            if let Some(note) = note {
                println!("{note}");
            }
            if content.is_sealed() {
                println!("Sealed download: {name}");
                println!("Run: keepsake unlock {url} {name}");
            } else {
                println!("Download: {name} ({url})");
            }
        }
        Content::Internal { page } => println!("Visit: {page}"),
    }
}

fn cmd_hint(config: &KeepsakeConfig) -> Result<()> {
    let session = open_session(config)?;
    match session.hint() {
        Some(hint) => println!("Hint: {}", hint.text),
        None => println!("🎉 Incredible! You have already discovered everything."),
    }
    Ok(())
}

async fn cmd_unlock(
    config: &KeepsakeConfig,
    url: &str,
    filename: &str,
    out: Option<&Path>,
    low_memory: bool,
) -> Result<()> {
    let passphrase = SecretString::from(
        rpassword::prompt_password(format!("Passphrase for \"{filename}\": "))
            .context("reading passphrase")?,
    );

    let fetcher = BlobFetcher::new(Duration::from_secs(config.fetch.timeout_secs))?;
    let unlocker = Unlocker::new(fetcher, kdf_params(config, low_memory)?);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Verifying...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = unlocker.unlock(url, filename, &passphrase).await;
    spinner.finish_and_clear();

    match result {
        Ok(unlocked) => {
            let out_path = out
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(&unlocked.filename));
            tokio::fs::write(&out_path, &unlocked.bytes)
                .await
                .with_context(|| format!("writing {}", out_path.display()))?;
            println!(
                "✔ Access granted: {} ({} bytes)",
                out_path.display(),
                unlocked.bytes.len()
            );
            Ok(())
        }
        Err(err) if err.is_passphrase_problem() => {
            anyhow::bail!("{err}. Try again with a different passphrase.")
        }
        Err(err @ UnlockError::Retrieval(_)) => {
            anyhow::bail!("{err}. Check the link and your connection, then retry.")
        }
        Err(err) => Err(err.into()),
    }
}

async fn cmd_seal(
    config: &KeepsakeConfig,
    input: &Path,
    output: &Path,
    low_memory: bool,
) -> Result<()> {
    let plaintext = tokio::fs::read(input)
        .await
        .with_context(|| format!("reading {}", input.display()))?;

    let passphrase = SecretString::from(
        rpassword::prompt_password("Passphrase: ").context("reading passphrase")?,
    );
    let confirm = SecretString::from(
        rpassword::prompt_password("Confirm passphrase: ").context("reading passphrase")?,
    );
    {
        use secrecy::ExposeSecret;
        if passphrase.expose_secret() != confirm.expose_secret() {
            anyhow::bail!("passphrases do not match");
        }
        if passphrase.expose_secret().is_empty() {
            anyhow::bail!("passphrase must not be empty");
        }
    }

    let params = kdf_params(config, low_memory)?;
    let blob = seal(&plaintext, &passphrase, &params)?;

    tokio::fs::write(output, &blob)
        .await
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Sealed {} -> {} ({} bytes, save as \"{}\")",
        input.display(),
        output.display(),
        blob.len(),
        sanitize_filename(&output.to_string_lossy()),
    );
    Ok(())
}

fn cmd_favorite(config: &KeepsakeConfig, code: &str) -> Result<()> {
    let mut session = open_session(config)?;
    if session.toggle_favorite(code)? {
        println!("★ Added to favorites");
    } else {
        println!("☆ Removed from favorites (or unknown code)");
    }
    Ok(())
}

fn cmd_progress(config: &KeepsakeConfig, action: ProgressAction) -> Result<()> {
    let mut session = open_session(config)?;

    match action {
        ProgressAction::Show => {
            let progress = session.progress();
            println!(
                "Discovered: {} / {}",
                session.unlocked_count(),
                session.total_count()
            );
            if !progress.favorites.is_empty() {
                println!("Favorites:");
                for code in &progress.favorites {
                    println!("  ★ {code}");
                }
            }
            if !progress.achievements.is_empty() {
                println!("Achievements:");
                for id in &progress.achievements {
                    println!("  🏆 {id}");
                }
            }
        }
        ProgressAction::Clear => {
            session.reset()?;
            println!("Progress cleared.");
        }
        ProgressAction::Export { path } => {
            std::fs::write(&path, session.export_progress()?)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Progress exported to {}", path.display());
        }
        ProgressAction::Import { path } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            session.import_progress(&json)?;
            println!("Progress imported from {}", path.display());
        }
    }
    Ok(())
}
