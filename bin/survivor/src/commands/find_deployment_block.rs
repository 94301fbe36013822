use anyhow::Result;
use clap::Args;
use survivor_core::deployment::deployment_block;
use survivor_core::felt::felt_from_hex;

use super::options::starknet::StarknetOptions;

#[derive(Debug, Args)]
pub struct FindDeploymentBlockArgs {
    #[arg(short, long)]
    #[arg(help = "The address of the smart contract to find the deployment block for.")]
    contract: String,

    #[command(flatten)]
    starknet: StarknetOptions,
}

impl FindDeploymentBlockArgs {
    pub async fn run(self) -> Result<()> {
        let provider = self.starknet.provider()?;
        let address = felt_from_hex(&self.contract)?;

        let block = deployment_block(&provider, address).await?;
        println!("{block}");

        Ok(())
    }
}
