//! flatkv CLI
//!
//! Thin command-line wrapper over the library: open a store file, get or
//! set typed values, list keys, show file info.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use flatkv::{Store, Value};

/// flatkv CLI
#[derive(Parser, Debug)]
#[command(name = "flatkv")]
#[command(about = "Flat-file key-value store")]
#[command(version)]
struct Args {
    /// Path to the store file (created if absent)
    #[arg(short, long, default_value = "./flatkv.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair and save the store
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// How to interpret the value
        #[arg(short, long, value_enum, default_value = "str")]
        kind: Kind,
    },

    /// List all keys
    Keys,

    /// Show store info
    Info,
}

/// Value type selector for `set`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    I32,
    I64,
    F32,
    F64,
    Str,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,flatkv=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> flatkv::Result<()> {
    let mut store = Store::open(&args.db)?;

    match &args.command {
        Commands::Get { key } => {
            let value = store.get(key.as_bytes())?;
            println!("{}", value);
        }
        Commands::Set { key, value, kind } => {
            let value = parse_value(value, *kind)?;
            store.set(key.as_bytes(), value)?;
            store.save()?;
        }
        Commands::Keys => {
            let mut keys: Vec<&[u8]> = store.keys().collect();
            keys.sort();
            for key in keys {
                println!("{}", String::from_utf8_lossy(key));
            }
        }
        Commands::Info => {
            println!("path:    {}", store.path().display());
            println!("entries: {}", store.entry_count());
            println!("bytes:   {}", store.to_bytes()?.len());
        }
    }

    Ok(())
}

/// Parse a CLI value string per its declared kind
fn parse_value(raw: &str, kind: Kind) -> flatkv::Result<Value> {
    let invalid = |what: &str| {
        flatkv::FlatError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("cannot parse {:?} as {}", raw, what),
        ))
    };

    Ok(match kind {
        Kind::I32 => Value::Int32(raw.parse().map_err(|_| invalid("i32"))?),
        Kind::I64 => Value::Int64(raw.parse().map_err(|_| invalid("i64"))?),
        Kind::F32 => Value::Float32(raw.parse().map_err(|_| invalid("f32"))?),
        Kind::F64 => Value::Float64(raw.parse().map_err(|_| invalid("f64"))?),
        Kind::Str => Value::Str(raw.to_string()),
    })
}
