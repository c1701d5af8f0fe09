use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::config::IndexConfig;
use crate::store::{RunIndexFs, RunStore};
use crate::types::{Direction, RunRecord};

#[derive(Parser, Debug)]
#[command(
    name = "runindex",
    version,
    about = "Lazy sorted index over numbered run records",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Write a run record (creates the store root if missing)
    Put {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        number: u64,
        #[arg(long)]
        value: String,
    },
    /// Exact lookup by run number
    Get {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        number: u64,
    },
    /// Smallest run number (fails on an empty store)
    First {
        #[arg(long)]
        path: PathBuf,
    },
    /// Largest run number (fails on an empty store)
    Last {
        #[arg(long)]
        path: PathBuf,
    },
    /// Nearest loadable run: exact | asc (at/after) | desc (at/before)
    Search {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        number: u64,
        #[arg(long, default_value_t = Direction::Exact)]
        dir: Direction,
    },
    /// Materialize every loadable run in ascending order
    Entries {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Key count, bounds and newest/oldest loadable runs
    Status {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn open_index(path: &Path) -> Result<RunIndexFs> {
    let store = RunStore::open(path)?;
    store.open_index(IndexConfig::from_env())
}

fn print_found(label: &str, rec: Option<RunRecord>) {
    match rec {
        Some(r) => println!("FOUND {}: #{} = {}", label, r.number, r.value),
        None => println!("NOT FOUND {}", label),
    }
}

pub fn cmd_put(path: &Path, number: u64, value: String) -> Result<()> {
    let store = RunStore::create(path)?;
    store.put(&RunRecord::new(number, value))?;
    println!("Wrote run #{} to {}", number, store.record_path(number).display());
    Ok(())
}

pub fn cmd_get(path: &Path, number: u64) -> Result<()> {
    let idx = open_index(path)?;
    print_found(&format!("#{}", number), idx.get(&number));
    Ok(())
}

pub fn cmd_bound(path: &Path, last: bool) -> Result<()> {
    let idx = open_index(path)?;
    let key = if last { idx.last_key()? } else { idx.first_key()? };
    println!("{}", key);
    Ok(())
}

pub fn cmd_search(path: &Path, number: u64, dir: Direction) -> Result<()> {
    let idx = open_index(path)?;
    print_found(&format!("{} #{}", dir, number), idx.search(&number, dir));
    Ok(())
}

pub fn cmd_entries(path: &Path, json: bool) -> Result<()> {
    let idx = open_index(path)?;
    let entries = idx.entries();
    if json {
        let recs: Vec<&RunRecord> = entries.iter().map(|(_, r)| r).collect();
        println!("{}", serde_json::to_string_pretty(&recs)?);
    } else {
        for (k, r) in &entries {
            println!("#{:<8} {}", k, r.value);
        }
        println!("{} run(s)", entries.len());
    }
    Ok(())
}

/// Status report as JSON (also used by `status --json`).
pub fn status_json(path: &Path) -> Result<Value> {
    let idx = open_index(path)?;
    Ok(json!({
        "path": path.display().to_string(),
        "keys": idx.len(),
        "first_key": idx.first_key().ok(),
        "last_key": idx.last_key().ok(),
        "oldest_loadable": idx.oldest().map(|r| r.number),
        "newest_loadable": idx.newest().map(|r| r.number),
    }))
}

pub fn cmd_status(path: &Path, json: bool) -> Result<()> {
    let v = status_json(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }
    let show = |k: &str| match &v[k] {
        Value::Null => "-".to_string(),
        other => other.to_string(),
    };
    println!("Run store at {}", path.display());
    println!("  keys            = {}", show("keys"));
    println!("  first_key       = {}", show("first_key"));
    println!("  last_key        = {}", show("last_key"));
    println!("  oldest_loadable = {}", show("oldest_loadable"));
    println!("  newest_loadable = {}", show("newest_loadable"));
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Put {
            path,
            number,
            value,
        } => cmd_put(&path, number, value),
        Cmd::Get { path, number } => cmd_get(&path, number),
        Cmd::First { path } => cmd_bound(&path, false),
        Cmd::Last { path } => cmd_bound(&path, true),
        Cmd::Search { path, number, dir } => cmd_search(&path, number, dir),
        Cmd::Entries { path, json } => cmd_entries(&path, json),
        Cmd::Status { path, json } => cmd_status(&path, json),
    }
}
