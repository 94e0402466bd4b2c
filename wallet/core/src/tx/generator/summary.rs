use kaspa_sdk_consensus_core::constants::SOMPI_PER_KASPA;
use kaspa_sdk_consensus_core::network::NetworkType;
use kaspa_sdk_consensus_core::tx::TransactionId;
use std::fmt;

/// A snapshot of the work performed by a [`Generator`](crate::tx::Generator).
#[derive(Debug, Clone)]
pub struct GeneratorSummary {
    pub network_type: NetworkType,
    pub aggregated_utxos: usize,
    pub aggregated_fees: u64,
    pub number_of_generated_transactions: usize,
    pub final_transaction_amount: Option<u64>,
    pub final_transaction_id: Option<TransactionId>,
}

impl GeneratorSummary {
    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn aggregated_utxos(&self) -> usize {
        self.aggregated_utxos
    }

    pub fn aggregated_fees(&self) -> u64 {
        self.aggregated_fees
    }

    pub fn number_of_generated_transactions(&self) -> usize {
        self.number_of_generated_transactions
    }

    pub fn final_transaction_amount(&self) -> Option<u64> {
        self.final_transaction_amount
    }

    pub fn final_transaction_id(&self) -> Option<TransactionId> {
        self.final_transaction_id
    }
}

impl fmt::Display for GeneratorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UTXOs: {} Fees: {} Transactions: {}",
            self.aggregated_utxos,
            sompi_to_kaspa_string(self.aggregated_fees),
            self.number_of_generated_transactions
        )?;
        if let Some(final_transaction_amount) = self.final_transaction_amount {
            write!(f, " Amount: {}", sompi_to_kaspa_string(final_transaction_amount))?;
        }
        Ok(())
    }
}

fn sompi_to_kaspa_string(sompi: u64) -> String {
    format!("{}.{:08} KAS", sompi / SOMPI_PER_KASPA, sompi % SOMPI_PER_KASPA)
}
