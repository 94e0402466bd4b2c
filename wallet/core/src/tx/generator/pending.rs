use crate::error::Error;
use crate::result::Result;
use crate::tx::generator::DataKind;
use crate::tx::mass::MAXIMUM_STANDARD_TRANSACTION_MASS;
use crate::utxo::UtxoEntryReference;
use kaspa_sdk_addresses::Address;
use kaspa_sdk_consensus_core::sign::{sign_with_multiple_v2, Signed};
use kaspa_sdk_consensus_core::tx::{SignableTransaction, Transaction, TransactionId};
use std::sync::Arc;

struct PendingTransactionInner {
    /// The transaction and the UTXO entries of its inputs
    signable_tx: SignableTransaction,
    /// UTXO entries referenced by the transaction inputs, in input order
    utxo_entry_references: Vec<UtxoEntryReference>,
    /// Addresses the consumed UTXO entries belong to
    addresses: Vec<Address>,
    /// The value the final transaction pays to its destination, when known
    payment_value: Option<u64>,
    /// Value of the change output (zero when the change was absorbed into fees)
    change_output_value: u64,
    aggregate_input_value: u64,
    aggregate_output_value: u64,
    mass: u64,
    fees: u64,
    kind: DataKind,
}

/// A transaction emitted by the [`Generator`](crate::tx::Generator), ready to
/// be signed and submitted. The embedded UTXO entries are ordered to match the
/// transaction inputs.
#[derive(Clone)]
pub struct PendingTransaction {
    inner: Arc<PendingTransactionInner>,
}

impl PendingTransaction {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn try_new(
        transaction: Transaction,
        utxo_entry_references: Vec<UtxoEntryReference>,
        addresses: Vec<Address>,
        payment_value: Option<u64>,
        change_output_value: u64,
        aggregate_input_value: u64,
        aggregate_output_value: u64,
        mass: u64,
        fees: u64,
        kind: DataKind,
    ) -> Result<Self> {
        assert_eq!(transaction.inputs.len(), utxo_entry_references.len());

        if aggregate_output_value > aggregate_input_value {
            return Err(Error::InsufficientFunds {
                additional_needed: aggregate_output_value - aggregate_input_value,
                origin: "final",
            });
        }
        if mass > MAXIMUM_STANDARD_TRANSACTION_MASS {
            return Err(Error::MassCalculationError);
        }

        let entries = utxo_entry_references.iter().map(|utxo| utxo.into()).collect();
        let signable_tx = SignableTransaction::with_entries(transaction, entries);

        Ok(Self {
            inner: Arc::new(PendingTransactionInner {
                signable_tx,
                utxo_entry_references,
                addresses,
                payment_value,
                change_output_value,
                aggregate_input_value,
                aggregate_output_value,
                mass,
                fees,
                kind,
            }),
        })
    }

    pub fn id(&self) -> TransactionId {
        self.inner.signable_tx.id()
    }

    /// The underlying transaction along with the UTXO entries of its inputs.
    pub fn signable_transaction(&self) -> &SignableTransaction {
        &self.inner.signable_tx
    }

    pub fn transaction(&self) -> &Transaction {
        &self.inner.signable_tx.tx
    }

    pub fn utxo_entries(&self) -> &[UtxoEntryReference] {
        &self.inner.utxo_entry_references
    }

    /// Addresses the consumed UTXO entries belong to. The caller is expected
    /// to provide the matching keys when signing.
    pub fn addresses(&self) -> &[Address] {
        &self.inner.addresses
    }

    /// The value the final transaction pays to its destination. `None` for
    /// relay transactions and sweeps.
    pub fn payment_value(&self) -> Option<u64> {
        self.inner.payment_value
    }

    pub fn change_value(&self) -> u64 {
        self.inner.change_output_value
    }

    pub fn aggregate_input_value(&self) -> u64 {
        self.inner.aggregate_input_value
    }

    pub fn aggregate_output_value(&self) -> u64 {
        self.inner.aggregate_output_value
    }

    pub fn mass(&self) -> u64 {
        self.inner.mass
    }

    pub fn fees(&self) -> u64 {
        self.inner.fees
    }

    pub fn kind(&self) -> DataKind {
        self.inner.kind
    }

    pub fn is_final(&self) -> bool {
        self.inner.kind.is_final()
    }

    pub fn is_batch(&self) -> bool {
        !self.inner.kind.is_final()
    }

    /// Signs the transaction with the provided schnorr private keys, matching
    /// inputs against the p2pk scripts of the keys. Fails if some inputs
    /// remain unsigned.
    pub fn try_sign_with_keys(&self, privkeys: &[[u8; 32]]) -> Result<SignableTransaction> {
        let signable = self.inner.signable_tx.clone();
        match sign_with_multiple_v2(signable, privkeys) {
            Signed::Fully(tx) => Ok(tx),
            Signed::Partially(_) => Err(Error::custom("transaction is missing signatures for some of its inputs")),
        }
    }
}
