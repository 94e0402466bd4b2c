use crate::tx::{Fees, PaymentDestination};
use crate::utxo::UtxoEntryReference;
use kaspa_sdk_addresses::Address;
use kaspa_sdk_consensus_core::network::NetworkType;

/// Immutable inputs of a [`Generator`](super::Generator) run.
pub struct GeneratorSettings {
    /// Network type the generated transactions are bound to
    pub network_type: NetworkType,
    /// Source of UTXO entries. The iterator is consumed lazily, exactly once,
    /// in the order UTXOs should be aggregated.
    pub utxo_iterator: Box<dyn Iterator<Item = UtxoEntryReference> + Send + Sync + 'static>,
    /// UTXO entries consumed before the iterator; the iterator is filtered
    /// against these by outpoint.
    pub priority_utxo_entries: Option<Vec<UtxoEntryReference>>,
    /// Number of signature operations declared on every generated input
    pub sig_op_count: u8,
    /// Number of signatures the signing setup requires (affects mass estimation)
    pub minimum_signatures: u16,
    /// Address receiving intermediate relay outputs and the final change output
    pub change_address: Address,
    /// Destination of the final transaction; [`PaymentDestination::Change`]
    /// produces a sweep into the change address
    pub final_transaction_destination: PaymentDestination,
    /// Priority fee of the final transaction
    pub final_priority_fee: Fees,
    /// Payload carried by the final transaction
    pub final_transaction_payload: Option<Vec<u8>>,
}

impl GeneratorSettings {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        network_type: NetworkType,
        utxo_iterator: impl Iterator<Item = UtxoEntryReference> + Send + Sync + 'static,
        priority_utxo_entries: Option<Vec<UtxoEntryReference>>,
        change_address: Address,
        sig_op_count: u8,
        minimum_signatures: u16,
        final_transaction_destination: PaymentDestination,
        final_priority_fee: Fees,
        final_transaction_payload: Option<Vec<u8>>,
    ) -> Self {
        Self {
            network_type,
            utxo_iterator: Box::new(utxo_iterator),
            priority_utxo_entries,
            sig_op_count,
            minimum_signatures,
            change_address,
            final_transaction_destination,
            final_priority_fee,
            final_transaction_payload,
        }
    }
}
