//! Command-line interface for inspecting a cache namespace
//!
//! Values are handled as untyped JSON, so the CLI works on any namespace
//! written with the default [`JsonCodec`].

use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::{Cache, FileCache};
use crate::codec::JsonCodec;
use crate::error::{CacheError, CacheResult};

/// Error types for CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// A cache operation failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The value given to `set` is not valid JSON
    #[error("Invalid JSON value: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Writing to stdout failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// AnyCache - inspect and edit on-disk cache namespaces
#[derive(Parser, Debug)]
#[command(name = "anycache")]
#[command(about = "Inspect and edit on-disk cache namespaces")]
#[command(version)]
pub struct Cli {
    /// Cache root directory (defaults to the platform cache directory)
    #[arg(long, value_name = "DIR", env = "ANYCACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Cache name, i.e. the directory under the cache root
    pub namespace: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the value stored under a key
    Get { key: String },
    /// Store a JSON value under a key
    Set { key: String, value: String },
    /// List keys with their size and modification time
    List,
    /// Print every value as a JSON array
    All,
    /// Check whether a key is stored (exit status 1 if not)
    Exists { key: String },
    /// Remove the entry for a key
    Remove { key: String },
    /// Remove every entry in the namespace
    Clear,
    /// Print the namespace directory
    Path,
}

/// How a successful command ended, mapped to the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked
    Done,
    /// The requested key is not stored
    Missing,
}

impl Cli {
    /// Opens the file cache this invocation targets
    pub fn open_cache(&self) -> FileCache<serde_json::Value> {
        FileCache::with_codec(
            self.cache_dir.clone(),
            self.namespace.as_str(),
            JsonCodec::default(),
        )
    }
}

/// Runs one command against `cache`, writing its output to `out`
pub fn execute(
    cache: &FileCache<serde_json::Value>,
    command: &Command,
    out: &mut impl Write,
) -> Result<Outcome, CliError> {
    match command {
        Command::Get { key } => match cache.try_get_entry(key)? {
            Some(value) => {
                writeln!(out, "{}", to_pretty(&value))?;
                Ok(Outcome::Done)
            }
            None => Ok(Outcome::Missing),
        },
        Command::Set { key, value } => {
            let value: serde_json::Value =
                serde_json::from_str(value).map_err(CliError::InvalidJson)?;
            cache.try_set_entry(&value, key)?;
            Ok(Outcome::Done)
        }
        Command::List => {
            for key in cache.keys()? {
                // `keys` already drops non-UTF-8 names; this skips entries removed since listing
                if let Some(info) = cache.entry_info(&key)? {
                    writeln!(
                        out,
                        "{}\t{}\t{}",
                        info.key,
                        info.size,
                        info.modified.format("%Y-%m-%d %H:%M:%S UTC")
                    )?;
                }
            }
            Ok(Outcome::Done)
        }
        Command::All => {
            let values = cache.try_get_all_entries()?;
            writeln!(out, "{}", to_pretty(&serde_json::Value::Array(values)))?;
            Ok(Outcome::Done)
        }
        Command::Exists { key } => {
            let exists = cache.entry_exists(key);
            writeln!(out, "{}", exists)?;
            Ok(if exists {
                Outcome::Done
            } else {
                Outcome::Missing
            })
        }
        Command::Remove { key } => {
            cache.try_remove_entry(key)?;
            Ok(Outcome::Done)
        }
        Command::Clear => {
            let removed = cache.try_remove_all_entries()?;
            writeln!(out, "Removed {} entries", removed)?;
            Ok(Outcome::Done)
        }
        Command::Path => {
            let dir = namespace_dir(cache)?;
            writeln!(out, "{}", dir.display())?;
            Ok(Outcome::Done)
        }
    }
}

fn namespace_dir(cache: &FileCache<serde_json::Value>) -> CacheResult<PathBuf> {
    cache
        .directory()
        .map(|dir| dir.to_path_buf())
        .ok_or_else(|| CacheError::Unusable {
            name: cache.name().to_string(),
        })
}

fn to_pretty(value: &serde_json::Value) -> String {
    // Value serialization cannot fail: keys are always strings
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
