//! annotations-rw CLI — write, read, delete and count annotation sets.
//!
//! Usage:
//!   annotations-rw [--db path] [--config path] write --content ID --lifecycle L --file annotations.json
//!   annotations-rw [--db path] read --content ID --lifecycle L
//!   annotations-rw [--db path] delete --content ID --lifecycle L
//!   annotations-rw [--db path] count --lifecycle L --platform-version V
//!   annotations-rw [--db path] check

use annotations_rw::{
    Annotations, AnnotationsConfig, AnnotationsService, OpenStore, SqliteBackend,
};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "annotations-rw",
    version,
    about = "Lifecycle-scoped annotation persistence"
)]
struct Cli {
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the annotations of a content item for one lifecycle
    Write {
        /// Content identifier
        #[arg(long)]
        content: String,
        /// Lifecycle to replace
        #[arg(long)]
        lifecycle: String,
        /// Platform version (defaults to the lifecycle's configured version)
        #[arg(long, default_value = "")]
        platform_version: String,
        /// JSON array of annotations, or '-' for stdin
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the annotations of a content item for one lifecycle
    Read {
        #[arg(long)]
        content: String,
        #[arg(long)]
        lifecycle: String,
    },
    /// Delete the annotations of a content item for one lifecycle
    Delete {
        #[arg(long)]
        content: String,
        #[arg(long)]
        lifecycle: String,
    },
    /// Count annotation edges for a lifecycle and platform version
    Count {
        #[arg(long)]
        lifecycle: String,
        #[arg(long)]
        platform_version: String,
    },
    /// Verify the database is reachable
    Check,
}

/// Get the default database path (~/.local/share/annotations-rw/annotations.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("annotations-rw").join("annotations.db")
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn open_service(db: Option<PathBuf>, config: Option<PathBuf>) -> Result<AnnotationsService, String> {
    let config = match config {
        Some(path) => AnnotationsConfig::load(&path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
        None => AnnotationsConfig::default(),
    };
    let db_path = db.unwrap_or_else(default_db_path);
    let backend = SqliteBackend::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))?;
    Ok(AnnotationsService::new(Arc::new(backend), Arc::new(config)))
}

fn read_annotations(file: &PathBuf) -> Result<Annotations, String> {
    let mut json = String::new();
    if file.as_os_str() == "-" {
        std::io::stdin()
            .read_to_string(&mut json)
            .map_err(|e| format!("cannot read stdin: {}", e))?;
    } else {
        json = std::fs::read_to_string(file)
            .map_err(|e| format!("cannot read '{}': {}", file.display(), e))?;
    }
    serde_json::from_str(&json).map_err(|e| format!("invalid annotations JSON: {}", e))
}

fn print_json(value: &impl serde::Serialize) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_write(
    service: &AnnotationsService,
    content: &str,
    lifecycle: &str,
    platform_version: &str,
    file: &PathBuf,
) -> i32 {
    let annotations = match read_annotations(file) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match service.write(content, lifecycle, platform_version, &annotations) {
        Ok(()) => {
            println!("Wrote {} annotations for '{}' ({})", annotations.len(), content, lifecycle);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_read(service: &AnnotationsService, content: &str, lifecycle: &str) -> i32 {
    match service.read(content, lifecycle) {
        Ok(Some(annotations)) => print_json(&annotations),
        Ok(None) => {
            eprintln!("No annotations for '{}' ({})", content, lifecycle);
            1
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_delete(service: &AnnotationsService, content: &str, lifecycle: &str) -> i32 {
    match service.delete(content, lifecycle) {
        Ok(true) => {
            println!("Deleted annotations for '{}' ({})", content, lifecycle);
            0
        }
        Ok(false) => {
            println!("No annotations for '{}' ({})", content, lifecycle);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_count(service: &AnnotationsService, lifecycle: &str, platform_version: &str) -> i32 {
    match service.count(lifecycle, platform_version) {
        Ok(count) => {
            println!("{}", count);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_check(service: &AnnotationsService) -> i32 {
    match service.check() {
        Ok(()) => {
            println!("OK");
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let service = match open_service(cli.db, cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Write {
            content,
            lifecycle,
            platform_version,
            file,
        } => cmd_write(&service, &content, &lifecycle, &platform_version, &file),
        Commands::Read { content, lifecycle } => cmd_read(&service, &content, &lifecycle),
        Commands::Delete { content, lifecycle } => cmd_delete(&service, &content, &lifecycle),
        Commands::Count {
            lifecycle,
            platform_version,
        } => cmd_count(&service, &lifecycle, &platform_version),
        Commands::Check => cmd_check(&service),
    };
    std::process::exit(code);
}
