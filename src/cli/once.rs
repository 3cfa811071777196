//! Once command implementation

use clap::Args;

use crate::config::{Config, Credentials};
use crate::supervisor::Supervisor;

#[derive(Args, Debug)]
pub struct OnceArgs {
    /// Simulate orders even when credentials are configured
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl OnceArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let credentials = Credentials::from_env();
        let mut supervisor = Supervisor::new(config, credentials, self.dry_run);
        supervisor.run_single().await
    }
}
