use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::server::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "schoolmap")]
#[command(version, about = "School and district map directory backend")]
pub struct Cli {
    /// Directory holding the imported database and workbook
    #[arg(long, global = true, env = "SCHOOLMAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Import a workbook into the data directory
    Import {
        /// Path to the .xlsx workbook
        workbook: PathBuf,

        /// Show a full-screen progress view
        #[arg(long)]
        tui: bool,
    },

    /// Parse a workbook and print the report without importing it
    Inspect {
        /// Path to the .xlsx workbook
        workbook: PathBuf,

        /// List every skipped row
        #[arg(short, long)]
        verbose: bool,
    },

    /// List districts of the imported data
    Districts,

    /// List schools of one district
    Schools {
        /// District id
        id: u32,
    },

    /// Resolve a border label to a district id
    Match {
        /// Free-text border label
        label: String,
    },

    /// Resolve every feature of a GeoJSON border file
    Borders {
        /// GeoJSON feature collection
        geojson: PathBuf,
    },

    /// List the fixed district table
    KnownDistricts,

    /// Upload a workbook to a running server
    Upload {
        /// Path to the .xlsx workbook
        workbook: PathBuf,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Check whether a running server has data
    Status {
        #[command(flatten)]
        remote: RemoteArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "SCHOOLMAP_BIND", default_value = "127.0.0.1:8000")]
    pub bind: String,

    /// GeoJSON file with district borders
    #[arg(long, env = "SCHOOLMAP_BORDERS")]
    pub borders: Option<PathBuf>,

    #[arg(long, env = "SCHOOLMAP_ADMIN_LOGIN", default_value = "admin")]
    pub admin_login: String,

    #[arg(long, env = "SCHOOLMAP_ADMIN_PASSWORD", default_value = "admin", hide_env_values = true)]
    pub admin_password: String,

    /// Largest accepted upload in megabytes
    #[arg(long, default_value_t = 20)]
    pub max_upload_mb: usize,
}

impl ServeArgs {
    pub fn into_config(self, data_dir: Option<PathBuf>) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            data_dir,
            borders: self.borders,
            admin_login: self.admin_login,
            admin_password: self.admin_password,
            max_upload_bytes: self.max_upload_mb * 1024 * 1024,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Server base URL
    #[arg(long, env = "SCHOOLMAP_URL", default_value = "http://127.0.0.1:8000")]
    pub url: String,

    #[arg(long, env = "SCHOOLMAP_ADMIN_LOGIN", default_value = "admin")]
    pub login: String,

    #[arg(long, env = "SCHOOLMAP_ADMIN_PASSWORD", default_value = "admin", hide_env_values = true)]
    pub password: String,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
