//! Implementations of the various deploy scripts

use ethers::{
    abi::{Address, Contract},
    contract::ContractFactory,
    providers::Middleware,
    types::{Bytes, H256},
    utils::hex::FromHex,
};
use std::{str::FromStr, sync::Arc};
use tracing::info;

use crate::{
    cli::{DeployProxyArgs, UpgradeArgs},
    constants::{
        NUM_BYTES_ADDRESS, NUM_BYTES_STORAGE_SLOT, NUM_DEPLOY_CONFIRMATIONS, PROXY_ABI,
        PROXY_ADMIN_STORAGE_SLOT, PROXY_BYTECODE, SAFE_ABI, SAFE_BYTECODE, SAFE_CONTRACT_KEY,
        SAFE_PROXY_ADMIN_CONTRACT_KEY, SAFE_PROXY_CONTRACT_KEY,
    },
    errors::ScriptError,
    solidity::ProxyAdminContract,
    utils::{safe_initialize_calldata, write_deployed_address},
};

/// Deploys the Safe implementation contract from its embedded artifact,
/// returning the deployed address
async fn deploy_safe_implementation(
    client: Arc<impl Middleware>,
) -> Result<Address, ScriptError> {
    // Get implementation contract ABI and bytecode
    let abi: Contract =
        serde_json::from_str(SAFE_ABI).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode =
        Bytes::from_hex(SAFE_BYTECODE).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let safe_factory = ContractFactory::new(abi, bytecode, client);

    info!("Deploying Safe implementation contract");

    // The implementation contract takes no constructor arguments,
    // it is initialized through the proxy
    let safe_contract = safe_factory
        .deploy(())
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .send()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    Ok(safe_contract.address())
}

/// Reads the proxy admin contract address from the EIP-1967 admin storage
/// slot of the proxy deployed at the given address
async fn get_proxy_admin_address(
    proxy_address: Address,
    client: &Arc<impl Middleware>,
) -> Result<Address, ScriptError> {
    // This is the recommended way to get the proxy admin address:
    // https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
    Ok(Address::from_slice(
        &client
            .get_storage_at(
                proxy_address,
                // Can `unwrap` here since we know the storage slot constitutes a valid H256
                H256::from_str(PROXY_ADMIN_STORAGE_SLOT).unwrap(),
                None, /* block */
            )
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            [NUM_BYTES_STORAGE_SLOT - NUM_BYTES_ADDRESS..NUM_BYTES_STORAGE_SLOT],
    ))
}

/// Deploys the Safe implementation contract along with the upgradeable
/// proxy pointing at it, initializing the Safe through the proxy
pub async fn deploy_proxy(
    args: DeployProxyArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let implementation_address = deploy_safe_implementation(client.clone()).await?;

    // Get proxy contract ABI and bytecode
    let abi: Contract =
        serde_json::from_str(PROXY_ABI).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode =
        Bytes::from_hex(PROXY_BYTECODE).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let proxy_factory = ContractFactory::new(abi, bytecode, client.clone());

    // Parse proxy contract constructor arguments
    let owner_address = match args.owner {
        Some(ref owner) => Address::from_str(owner)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?,
        None => client
            .default_sender()
            .ok_or_else(|| {
                ScriptError::ClientInitialization(
                    "client does not have sender attached".to_string(),
                )
            })?,
    };

    let safe_calldata = Bytes::from(safe_initialize_calldata(&args.owners, args.threshold)?);

    // Deploy proxy contract
    let proxy_contract = proxy_factory
        .deploy((implementation_address, owner_address, safe_calldata))
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
        .confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .send()
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

    let proxy_address = proxy_contract.address();

    // Get proxy admin contract address
    let proxy_admin_address = get_proxy_admin_address(proxy_address, &client).await?;

    println!("Deployed Safe Proxy to {:#x}", proxy_address);
    println!("Safe implementation deployed at {:#x}", implementation_address);
    println!("Proxy admin contract deployed at {:#x}", proxy_admin_address);

    write_deployed_address(deployments_path, SAFE_CONTRACT_KEY, implementation_address)?;
    write_deployed_address(deployments_path, SAFE_PROXY_CONTRACT_KEY, proxy_address)?;
    write_deployed_address(
        deployments_path,
        SAFE_PROXY_ADMIN_CONTRACT_KEY,
        proxy_admin_address,
    )?;

    Ok(())
}

/// Deploys a fresh Safe implementation contract and points the existing
/// proxy at it through the proxy admin contract
pub async fn upgrade(
    args: UpgradeArgs,
    client: Arc<impl Middleware>,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let proxy_address = Address::from_str(&args.proxy)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    let implementation_address = deploy_safe_implementation(client.clone()).await?;

    // Upgrade calls must go through the proxy admin contract,
    // whose address is read out of the proxy itself
    let proxy_admin_address = get_proxy_admin_address(proxy_address, &client).await?;
    let proxy_admin = ProxyAdminContract::new(proxy_admin_address, client);

    let data = if let Some(calldata) = args.calldata {
        Bytes::from_hex(calldata).map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?
    } else {
        Bytes::new()
    };

    info!("Upgrading proxy at {:#x}", proxy_address);

    proxy_admin
        .upgrade_and_call(proxy_address, implementation_address, data)
        .send()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    println!("Upgraded proxy implementation");

    write_deployed_address(deployments_path, SAFE_CONTRACT_KEY, implementation_address)?;

    Ok(())
}
