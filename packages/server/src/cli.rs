//! Command-line arguments. They override the matching environment variables.

use std::net::SocketAddr;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "vlo-server")]
#[command(version, about = "OAI-PMH endpoint for the CNC VLO catalog", long_about = None)]
pub struct Cli {
    /// Address to listen on (overrides LISTEN_ADDR)
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// Public base URL of the endpoint (overrides BASE_URL)
    #[arg(short, long)]
    pub base_url: Option<String>,
}
