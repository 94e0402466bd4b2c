use crate::constants::STORAGE_MASS_PARAMETER;
use crate::network::NetworkType;
use kaspa_sdk_addresses::Prefix;

/// Consensus parameters consumed by the SDK. These mirror the per-network
/// configuration of the node; only the fields feeding mass and fee policy
/// are carried here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    pub net: NetworkType,
    pub mass_per_tx_byte: u64,
    pub mass_per_script_pub_key_byte: u64,
    pub mass_per_sig_op: u64,
    pub storage_mass_parameter: u64,
    /// Mass reserved on compounding (relay) transactions to account for the
    /// future spend of their change output.
    pub additional_compound_transaction_mass: u64,
}

impl Params {
    pub fn prefix(&self) -> Prefix {
        self.net.into()
    }
}

impl From<NetworkType> for Params {
    fn from(value: NetworkType) -> Self {
        match value {
            NetworkType::Mainnet => MAINNET_PARAMS,
            NetworkType::Testnet => TESTNET_PARAMS,
            NetworkType::Devnet => DEVNET_PARAMS,
            NetworkType::Simnet => SIMNET_PARAMS,
        }
    }
}

pub const MAINNET_PARAMS: Params = Params {
    net: NetworkType::Mainnet,
    mass_per_tx_byte: 1,
    mass_per_script_pub_key_byte: 10,
    mass_per_sig_op: 1000,
    storage_mass_parameter: STORAGE_MASS_PARAMETER,
    additional_compound_transaction_mass: 100,
};

pub const TESTNET_PARAMS: Params = Params {
    net: NetworkType::Testnet,
    mass_per_tx_byte: 1,
    mass_per_script_pub_key_byte: 10,
    mass_per_sig_op: 1000,
    storage_mass_parameter: STORAGE_MASS_PARAMETER,
    additional_compound_transaction_mass: 100,
};

pub const SIMNET_PARAMS: Params = Params {
    net: NetworkType::Simnet,
    mass_per_tx_byte: 1,
    mass_per_script_pub_key_byte: 10,
    mass_per_sig_op: 1000,
    storage_mass_parameter: STORAGE_MASS_PARAMETER,
    additional_compound_transaction_mass: 100,
};

pub const DEVNET_PARAMS: Params = Params {
    net: NetworkType::Devnet,
    mass_per_tx_byte: 1,
    mass_per_script_pub_key_byte: 10,
    mass_per_sig_op: 1000,
    storage_mass_parameter: STORAGE_MASS_PARAMETER,
    additional_compound_transaction_mass: 100,
};
