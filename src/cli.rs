//! Definitions of CLI arguments and commands for deploy scripts

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use ethers::providers::Middleware;

use crate::{
    commands::{deploy_proxy, upgrade},
    constants::{DEFAULT_QUORUM_THRESHOLD, DEFAULT_SAFE_OWNERS, PROXY_CONTRACT_ENV_VAR},
    errors::ScriptError,
};

/// Scripts for managing the Safe contract deployment
#[derive(Parser)]
pub struct Cli {
    /// Private key of the deployer
    // TODO: Better key management
    #[arg(short, long)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long)]
    pub rpc_url: String,

    /// Path to the file at which deployed contract addresses are recorded
    #[arg(long, default_value = "deployments.json")]
    pub deployments_path: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The contract management commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the Safe contract behind an upgradeable proxy
    DeployProxy(DeployProxyArgs),
    /// Upgrade the Safe implementation behind an existing proxy
    Upgrade(UpgradeArgs),
}

impl Command {
    /// Run the command
    pub async fn run(
        self,
        client: Arc<impl Middleware>,
        deployments_path: &str,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployProxy(args) => deploy_proxy(args, client, deployments_path).await,
            Command::Upgrade(args) => upgrade(args, client, deployments_path).await,
        }
    }
}

/// Deploy the Safe upgradeable proxy contract.
///
/// Concretely, this is a [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy),
/// which itself deploys a `ProxyAdmin` contract. The Safe implementation
/// contract is deployed first and initialized through the proxy as part
/// of the same invocation.
///
/// Calls made directly to the `TransparentUpgradeableProxy` contract will be forwarded to the implementation contract.
/// Upgrade calls can only be made to the `TransparentUpgradeableProxy` through the `ProxyAdmin`.
#[derive(Args)]
pub struct DeployProxyArgs {
    /// Addresses of the initial Safe owners in hex, comma-separated
    #[arg(long, value_delimiter = ',', num_args = 1.., default_values_t = DEFAULT_SAFE_OWNERS.map(String::from))]
    pub owners: Vec<String>,

    /// The number of owner approvals required to execute a Safe transaction
    #[arg(short, long, default_value_t = DEFAULT_QUORUM_THRESHOLD)]
    pub threshold: u64,

    /// Address of the owner of the proxy admin contract in hex,
    /// defaulting to the deployer address
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Upgrade the Safe implementation.
///
/// Deploys a fresh Safe implementation contract and points the existing
/// proxy at it through the `ProxyAdmin` contract.
#[derive(Args)]
pub struct UpgradeArgs {
    /// Address of the proxy contract to upgrade, in hex
    #[arg(long, env = PROXY_CONTRACT_ENV_VAR)]
    pub proxy: String,

    /// Optional calldata, in hex form, with which to
    /// call the new implementation contract when upgrading
    #[arg(short, long)]
    pub calldata: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::constants::{DEFAULT_QUORUM_THRESHOLD, DEFAULT_SAFE_OWNERS, PROXY_CONTRACT_ENV_VAR};

    use super::{Cli, Command};

    /// Arguments common to every invocation in the tests below
    const BASE_ARGS: [&str; 5] = [
        "safe-scripts",
        "--priv-key",
        "0xkey",
        "--rpc-url",
        "http://localhost:8545",
    ];

    /// Parse a command line consisting of the base arguments followed by `extra`
    fn parse(extra: &[&str]) -> Cli {
        Cli::parse_from(BASE_ARGS.iter().copied().chain(extra.iter().copied()))
    }

    #[test]
    fn test_deploy_proxy_defaults() {
        let cli = parse(&["deploy-proxy"]);
        assert_eq!(cli.deployments_path, "deployments.json");

        match cli.command {
            Command::DeployProxy(args) => {
                assert_eq!(args.owners, DEFAULT_SAFE_OWNERS.map(String::from));
                assert_eq!(args.threshold, DEFAULT_QUORUM_THRESHOLD);
                assert!(args.owner.is_none());
            }
            _ => panic!("expected deploy-proxy command"),
        }
    }

    #[test]
    fn test_deploy_proxy_overrides() {
        let cli = parse(&[
            "deploy-proxy",
            "--owners",
            "0x4cf73dfdd84e93bcd99e3ee7b2ee0ef27c3c8a15,0xbc13e9bcee418cf14a25c49fafc5d4b9cbaf0403",
            "--threshold",
            "1",
        ]);

        match cli.command {
            Command::DeployProxy(args) => {
                assert_eq!(args.owners.len(), 2);
                assert_eq!(args.threshold, 1);
            }
            _ => panic!("expected deploy-proxy command"),
        }
    }

    #[test]
    fn test_upgrade_proxy_resolution() {
        // The proxy address is required, either as a flag or from the environment
        std::env::remove_var(PROXY_CONTRACT_ENV_VAR);
        let res = Cli::try_parse_from(BASE_ARGS.iter().copied().chain(["upgrade"]));
        assert!(res.is_err());

        // With the environment variable set, the address is picked up from it
        std::env::set_var(
            PROXY_CONTRACT_ENV_VAR,
            "0x4cf73dfdd84e93bcd99e3ee7b2ee0ef27c3c8a15",
        );
        let cli = parse(&["upgrade"]);
        match cli.command {
            Command::Upgrade(args) => {
                assert_eq!(args.proxy, "0x4cf73dfdd84e93bcd99e3ee7b2ee0ef27c3c8a15");
                assert!(args.calldata.is_none());
            }
            _ => panic!("expected upgrade command"),
        }

        // An explicit flag takes precedence over the environment
        let cli = parse(&[
            "upgrade",
            "--proxy",
            "0xbc13e9bcee418cf14a25c49fafc5d4b9cbaf0403",
        ]);
        match cli.command {
            Command::Upgrade(args) => {
                assert_eq!(args.proxy, "0xbc13e9bcee418cf14a25c49fafc5d4b9cbaf0403");
            }
            _ => panic!("expected upgrade command"),
        }

        std::env::remove_var(PROXY_CONTRACT_ENV_VAR);
    }
}
