//! File relay client

mod constants;
mod download;
mod upload;

use clap::{Parser, Subcommand};
use constants::{DEFAULT_SERVER_URL, ENV_CLIENT_ID, ENV_SECRET};
use download::DownloadTarget;
use std::path::PathBuf;
use upload::FileUploader;

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "File relay client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a timestamp and its signature
    Sign {
        /// Shared upload secret
        #[arg(short, long, env = ENV_SECRET, hide_env_values = true)]
        secret: String,
        /// Unix timestamp to sign (default: now)
        #[arg(short, long, allow_negative_numbers = true)]
        timestamp: Option<i64>,
    },
    /// Upload a file to the server
    Upload {
        /// File to upload
        file: PathBuf,
        /// Server URL
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server: String,
        /// Shared upload secret
        #[arg(short, long, env = ENV_SECRET, hide_env_values = true)]
        secret: String,
        /// Client id, required when the server uses a key file
        #[arg(short, long, env = ENV_CLIENT_ID)]
        id: Option<String>,
    },
    /// Download a stored file
    Download {
        /// Identifier or full URL returned by an upload
        target: String,
        /// Server URL, used when a bare identifier is given
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server: String,
        /// Output path (default: the identifier, in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sign { secret, timestamp } => {
            let timestamp = timestamp.unwrap_or_else(common::current_timestamp_secs);
            let signed = upload::sign_timestamp(&secret, timestamp)?;
            println!("ts={}", signed.ts);
            println!("sig={}", signed.sig);
        }
        Commands::Upload {
            file,
            server,
            secret,
            id,
        } => {
            let url = FileUploader::new(&server, secret, id).upload(&file)?;
            println!("{}", url);
        }
        Commands::Download {
            target,
            server,
            output,
        } => {
            let target = DownloadTarget::resolve(&target, &server)?;
            let path = download::download_file(&target, output.as_deref())?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
