use kaspa_sdk_addresses::Address;
use kaspa_sdk_consensus_core::tx::TransactionOutput;
use kaspa_sdk_txscript::pay_to_address_script;
use serde::{Deserialize, Serialize};

/// The destination of the funds aggregated by the [`Generator`](crate::tx::Generator):
/// either explicit payment outputs or, when sweeping, the generator's change address.
#[derive(Debug, Clone)]
pub enum PaymentDestination {
    Change,
    PaymentOutputs(PaymentOutputs),
}

impl PaymentDestination {
    pub fn amount(&self) -> Option<u64> {
        match self {
            Self::Change => None,
            Self::PaymentOutputs(payment_outputs) => Some(payment_outputs.amount()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutput {
    pub address: Address,
    pub amount: u64,
}

impl PaymentOutput {
    pub fn new(address: Address, amount: u64) -> Self {
        Self { address, amount }
    }
}

impl From<PaymentOutput> for PaymentDestination {
    fn from(output: PaymentOutput) -> Self {
        Self::PaymentOutputs(PaymentOutputs { outputs: vec![output] })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutputs {
    pub outputs: Vec<PaymentOutput>,
}

impl PaymentOutputs {
    pub fn amount(&self) -> u64 {
        self.outputs.iter().map(|payment_output| payment_output.amount).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaymentOutput> {
        self.outputs.iter()
    }
}

impl From<PaymentOutputs> for PaymentDestination {
    fn from(outputs: PaymentOutputs) -> Self {
        Self::PaymentOutputs(outputs)
    }
}

impl From<(Address, u64)> for PaymentOutputs {
    fn from((address, amount): (Address, u64)) -> Self {
        Self { outputs: vec![PaymentOutput::new(address, amount)] }
    }
}

impl From<&[(Address, u64)]> for PaymentOutputs {
    fn from(outputs: &[(Address, u64)]) -> Self {
        Self { outputs: outputs.iter().map(|(address, amount)| PaymentOutput::new(address.clone(), *amount)).collect() }
    }
}

impl From<&PaymentOutput> for TransactionOutput {
    fn from(output: &PaymentOutput) -> Self {
        TransactionOutput::new(output.amount, pay_to_address_script(&output.address))
    }
}
