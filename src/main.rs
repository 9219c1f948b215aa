//! # Kioskboard CLI
//!
//! Command-line interface for serving and rendering canvas content.
//!
//! ## Usage
//!
//! ```bash
//! # Run the upload/render server
//! kioskboard serve --listen 0.0.0.0:3000 --upload-dir api/uploads
//!
//! # Render a stored content field to HTML
//! kioskboard render post-content.json --out post.html
//!
//! # Print the computed layout as JSON
//! kioskboard layout post-content.json
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use kioskboard::{
    server::{self, ServerConfig},
    KioskError, Renderer,
};

/// Kioskboard - canvas content server and renderer
#[derive(Parser, Debug)]
#[command(name = "kioskboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, env = "KIOSKBOARD_LISTEN", default_value = "0.0.0.0:3000")]
        listen: String,

        /// Directory uploaded files are written to
        #[arg(long, env = "KIOSKBOARD_UPLOAD_DIR", default_value = "api/uploads")]
        upload_dir: PathBuf,

        /// URL path uploaded files are served under
        #[arg(long, env = "KIOSKBOARD_PUBLIC_PREFIX", default_value = "/api/uploads")]
        public_prefix: String,
    },

    /// Render a content file to HTML
    Render {
        /// File holding a post's content field (`-` for stdin)
        input: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print the layout of a content file as JSON
    Layout {
        /// File holding a post's content field (`-` for stdin)
        input: PathBuf,
    },
}

fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), KioskError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            upload_dir,
            public_prefix,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                upload_dir,
                public_prefix,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }
        Commands::Render { input, out } => {
            let content = read_content(&input)?;
            let html = Renderer::default().layout_str(Some(&content)).to_html();
            match out {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    println!("Saved to {}", path.display());
                }
                None => println!("{}", html),
            }
        }
        Commands::Layout { input } => {
            let content = read_content(&input)?;
            let layout = Renderer::default().layout_str(Some(&content));
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
    }

    Ok(())
}

/// Read a content field from a file or stdin. Trailing newlines are dropped
/// so a hand-edited file still parses as the stored string.
fn read_content(path: &Path) -> Result<String, KioskError> {
    let raw = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(raw.trim_end_matches(['\n', '\r']).to_string())
}
