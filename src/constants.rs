//! Constants used in the deploy scripts

/// The ABI of the Safe implementation contract
///
/// Compiled from `contracts/Safe.sol` with solc v0.8.20
pub const SAFE_ABI: &str = include_str!("../artifacts/Safe.abi");

/// The creation bytecode of the Safe implementation contract
///
/// Compiled from `contracts/Safe.sol` with solc v0.8.20
pub const SAFE_BYTECODE: &str = include_str!("../artifacts/Safe.bin");

/// The ABI of the TransparentUpgradeableProxy contract
///
/// Compiled from https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/transparent/TransparentUpgradeableProxy.sol
pub const PROXY_ABI: &str = include_str!("../artifacts/TransparentUpgradeableProxy.abi");

/// The bytecode of the TransparentUpgradeableProxy contract
///
/// Compiled from https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/transparent/TransparentUpgradeableProxy.sol
pub const PROXY_BYTECODE: &str = include_str!("../artifacts/TransparentUpgradeableProxy.bin");

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: usize = 0;

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: &str =
    "0xb53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103";

/// The number of bytes stored in a single storage slot
pub const NUM_BYTES_STORAGE_SLOT: usize = 32;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The addresses of the initial Safe owners, used when none
/// are given on the command line
pub const DEFAULT_SAFE_OWNERS: [&str; 2] = [
    "0x390535604b540BdA8765c815A76d8e7be92A3295",
    "0x60CDac3cd0Ba3445D776B31B46E34623723C6482",
];

/// The number of owner approvals required to execute a Safe transaction,
/// used when no threshold is given on the command line.
///
/// Whether the value is meaningful is left to the Safe contract's
/// `initialize` method.
pub const DEFAULT_QUORUM_THRESHOLD: u64 = 2;

/// The name of the environment variable holding the address of the
/// Safe proxy contract to upgrade
pub const PROXY_CONTRACT_ENV_VAR: &str = "PROXY_CONTRACT";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The Safe implementation contract key in the `deployments.json` file
pub const SAFE_CONTRACT_KEY: &str = "safe_contract";

/// The Safe proxy contract key in the `deployments.json` file
pub const SAFE_PROXY_CONTRACT_KEY: &str = "safe_proxy_contract";

/// The Safe proxy admin contract key in the `deployments.json` file
pub const SAFE_PROXY_ADMIN_CONTRACT_KEY: &str = "safe_proxy_admin_contract";
