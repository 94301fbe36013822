use std::time::Duration;

use anyhow::Result;
use clap::Args;
use starknet::providers::jsonrpc::HttpTransport;
use starknet::providers::JsonRpcClient;
use tracing::trace;
use url::Url;

pub const STARKNET_RPC_URL_ENV_VAR: &str = "STARKNET_RPC_URL";

#[derive(Debug, Args, Clone)]
#[command(next_help_heading = "Starknet options")]
pub struct StarknetOptions {
    #[arg(short = 'p', long = "provider", env = STARKNET_RPC_URL_ENV_VAR)]
    #[arg(value_name = "URL")]
    #[arg(help = "The URL of your Starknet RPC provider (defaults to the STARKNET_RPC_URL \
                  environment variable).")]
    pub provider_url: Url,

    #[arg(short = 't', long)]
    #[arg(value_name = "SECONDS")]
    #[arg(help = "Timeout for requests to your Starknet RPC provider.")]
    pub timeout: Option<u64>,
}

impl StarknetOptions {
    /// Builds the RPC client. The timeout, when given, is applied to every
    /// request through the underlying HTTP client.
    pub fn provider(&self) -> Result<JsonRpcClient<HttpTransport>> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build()?;

        trace!(url = %self.provider_url, "Creating JsonRpcClient with given RPC URL.");
        Ok(JsonRpcClient::new(HttpTransport::new_with_client(self.provider_url.clone(), client)))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{StarknetOptions, STARKNET_RPC_URL_ENV_VAR};

    const ENV_RPC: &str = "http://localhost:7474/";
    const FLAG_RPC: &str = "http://localhost:6060/";

    #[derive(clap::Parser)]
    struct Command {
        #[clap(flatten)]
        options: StarknetOptions,
    }

    #[test]
    fn provider_url_from_env_and_flag_precedence() {
        std::env::set_var(STARKNET_RPC_URL_ENV_VAR, ENV_RPC);

        let cmd = Command::parse_from([""]);
        assert_eq!(cmd.options.provider_url.as_str(), ENV_RPC);

        let cmd = Command::parse_from(["survivor", "--provider", FLAG_RPC]);
        assert_eq!(cmd.options.provider_url.as_str(), FLAG_RPC);
    }
}
