//! Run command implementation

use clap::Args;

use crate::config::{Config, Credentials};
use crate::supervisor::Supervisor;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Simulate orders even when credentials are configured
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let credentials = Credentials::from_env();
        if credentials.is_none() {
            tracing::warn!("PRIVATE_KEY/WALLET_ADDRESS not set, running without credentials");
        }

        let mut supervisor = Supervisor::new(config, credentials, self.dry_run);
        supervisor.run_continuous().await
    }
}
