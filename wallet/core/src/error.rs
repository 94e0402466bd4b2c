use kaspa_sdk_addresses::{Address, AddressError};
use kaspa_sdk_consensus_core::network::NetworkTypeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    #[error(transparent)]
    AddressError(#[from] AddressError),

    #[error(transparent)]
    NetworkTypeError(#[from] NetworkTypeError),

    #[error(transparent)]
    SignError(#[from] kaspa_sdk_consensus_core::sign::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("insufficient funds: an additional {additional_needed} sompi is needed ({origin})")]
    InsufficientFunds { additional_needed: u64, origin: &'static str },

    #[error("storage mass is not computable for the composed transaction")]
    StorageMassOverflow,

    #[error("transaction mass exceeds the maximum standard transaction mass")]
    MassCalculationError,

    #[error("transaction output {0} is dust")]
    DustOutput(Address),

    #[error("transaction output value is zero")]
    PaymentOutputZeroValue,

    #[error("transaction output address {0} does not match the network in use")]
    PaymentOutputNetworkMismatch(Address),

    #[error("change address {0} does not match the network in use")]
    ChangeAddressNetworkMismatch(Address),

    #[error("priority fees can not be included into transactions with multiple outputs")]
    PriorityFeesToMultipleOutputs,

    #[error("priority fees can not be included into sweep transactions")]
    FeesInSweepTransaction,

    #[error("transaction input is missing its UTXO entry")]
    MissingUtxoEntry,
}

impl Error {
    pub fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}
