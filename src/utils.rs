//! Utilities for the deploy scripts.

use std::{
    fs::{self, File},
    io::Read,
    path::PathBuf,
    str::FromStr,
    sync::Arc,
};

use alloy_primitives::{Address as AlloyAddress, U256};
use alloy_sol_types::SolCall;
use ethers::{
    abi::Address,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};
use json::JsonValue;

use crate::{constants::DEPLOYMENTS_KEY, errors::ScriptError, solidity::initializeCall};

/// Sets up the client with which to send transactions, constructed from
/// the given deployer private key and RPC URL.
pub async fn setup_client(
    priv_key: &str,
    rpc_url: &str,
) -> Result<Arc<impl Middleware>, ScriptError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = LocalWallet::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();
    let client = Arc::new(SignerMiddleware::new(
        provider,
        wallet.clone().with_chain_id(chain_id),
    ));

    Ok(client)
}

/// Parse the file at the given path into a [`JsonValue`]
fn get_json_from_file(file_path: &str) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Read the address recorded under the given contract key in the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &str,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    Address::from_str(
        parsed_json[DEPLOYMENTS_KEY][contract_key]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ReadDeployments(
                    "Could not parse contract address from deployments file".to_string(),
                )
            })?,
    )
    .map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record the address deployed under the given contract key in the deployments file
pub fn write_deployed_address(
    file_path: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !PathBuf::from(file_path).exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key] = JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}

/// Prepare calldata for the Safe contract's `initialize` method
pub fn safe_initialize_calldata(
    owners: &[String],
    threshold: u64,
) -> Result<Vec<u8>, ScriptError> {
    let owners = owners
        .iter()
        .map(|owner| {
            AlloyAddress::from_str(owner)
                .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(initializeCall {
        owners,
        threshold: U256::from(threshold),
    }
    .abi_encode())
}

#[cfg(test)]
mod tests {
    use std::{env, fs, str::FromStr};

    use alloy_primitives::U256;
    use alloy_sol_types::SolCall;
    use ethers::abi::Address;

    use crate::{
        constants::{DEFAULT_QUORUM_THRESHOLD, DEFAULT_SAFE_OWNERS, SAFE_CONTRACT_KEY},
        errors::ScriptError,
        solidity::initializeCall,
    };

    use super::{parse_addr_from_deployments_file, safe_initialize_calldata, write_deployed_address};

    /// Returns a scratch path for a deployments file unique to the calling test
    fn scratch_deployments_path(name: &str) -> String {
        env::temp_dir()
            .join(format!("safe_scripts_{}_{}.json", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_initialize_calldata_encoding() {
        let owners: Vec<String> = DEFAULT_SAFE_OWNERS.map(String::from).to_vec();
        let calldata = safe_initialize_calldata(&owners, DEFAULT_QUORUM_THRESHOLD).unwrap();

        assert_eq!(&calldata[..4], initializeCall::SELECTOR.as_slice());

        let call = initializeCall::abi_decode(&calldata, true /* validate */).unwrap();
        assert_eq!(call.threshold, U256::from(DEFAULT_QUORUM_THRESHOLD));
        assert_eq!(call.owners.len(), DEFAULT_SAFE_OWNERS.len());
    }

    #[test]
    fn test_initialize_calldata_invalid_owner() {
        let owners = vec!["not-an-address".to_string()];
        let err = safe_initialize_calldata(&owners, 1).unwrap_err();
        assert!(matches!(err, ScriptError::CalldataConstruction(_)));
    }

    #[test]
    fn test_deployments_file_round_trip() {
        let path = scratch_deployments_path("round_trip");
        let address = Address::from_str(DEFAULT_SAFE_OWNERS[0]).unwrap();

        write_deployed_address(&path, SAFE_CONTRACT_KEY, address).unwrap();
        let parsed = parse_addr_from_deployments_file(&path, SAFE_CONTRACT_KEY).unwrap();
        assert_eq!(parsed, address);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_deployments_file_missing_key() {
        let path = scratch_deployments_path("missing_key");
        let address = Address::from_str(DEFAULT_SAFE_OWNERS[1]).unwrap();
        write_deployed_address(&path, SAFE_CONTRACT_KEY, address).unwrap();

        let err = parse_addr_from_deployments_file(&path, "safe_proxy_contract").unwrap_err();
        assert!(matches!(err, ScriptError::ReadDeployments(_)));

        fs::remove_file(&path).unwrap();
    }
}
