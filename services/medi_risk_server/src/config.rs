//! Command-line and environment configuration.

use clap::Parser;
use log::LevelFilter;
use medi_risk::DEFAULT_MODEL_PATH;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8710";

#[derive(Debug, Parser)]
#[command(
    name = "medi-risk-server",
    version,
    author = "MediLang Team",
    about = "Serve the diabetes risk classifier over HTTP and a browser form",
    long_about = "medi-risk-server loads a pre-trained diabetes risk classifier once at\n\
        startup and serves it to concurrent requests.\n\n\
        ENDPOINTS:\n\
        \n  GET  /          Interactive risk assessment form\n\
        \n  POST /assess    Form submission (application/x-www-form-urlencoded)\n\
        \n  POST /predict   JSON prediction, returns \"0\" or \"1\"\n\
        \n  GET  /health    Liveness probe"
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Address to listen on
    #[arg(long, env = "MEDI_RISK_BIND", value_name = "ADDR", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Path to the model artifact, relative to the working directory
    #[arg(long, env = "MEDI_RISK_MODEL", value_name = "FILE", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,
}

impl Cli {
    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            model_path: self.model.clone(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub model_path: PathBuf,
}
