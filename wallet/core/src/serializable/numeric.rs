//! This module implements the primitives for external transaction signing.

use crate::error::Error;
use crate::result::Result;
use crate::utxo::UtxoEntryReference;
use kaspa_sdk_addresses::Address;
use kaspa_sdk_consensus_core::subnets::SubnetworkId;
use kaspa_sdk_consensus_core::tx as cctx;
use kaspa_sdk_consensus_core::tx::{ScriptPublicKey, TransactionId, TransactionOutpoint};
use serde::{Deserialize, Serialize};

pub type SignedTransactionIndexType = u32;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SerializableUtxoEntry {
    pub address: Option<Address>,
    pub amount: u64,
    pub script_public_key: ScriptPublicKey,
    pub block_daa_score: u64,
    pub is_coinbase: bool,
}

impl From<&UtxoEntryReference> for SerializableUtxoEntry {
    fn from(utxo: &UtxoEntryReference) -> Self {
        let utxo = utxo.utxo.as_ref();
        Self {
            address: utxo.address.clone(),
            amount: utxo.amount,
            script_public_key: utxo.script_public_key.clone(),
            block_daa_score: utxo.block_daa_score,
            is_coinbase: utxo.is_coinbase,
        }
    }
}

impl From<&cctx::UtxoEntry> for SerializableUtxoEntry {
    fn from(utxo: &cctx::UtxoEntry) -> Self {
        Self {
            address: None,
            amount: utxo.amount,
            script_public_key: utxo.script_public_key.clone(),
            block_daa_score: utxo.block_daa_score,
            is_coinbase: utxo.is_coinbase,
        }
    }
}

impl From<&SerializableUtxoEntry> for cctx::UtxoEntry {
    fn from(utxo: &SerializableUtxoEntry) -> Self {
        Self {
            amount: utxo.amount,
            script_public_key: utxo.script_public_key.clone(),
            block_daa_score: utxo.block_daa_score,
            is_coinbase: utxo.is_coinbase,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SerializableTransactionInput {
    pub transaction_id: TransactionId,
    pub index: SignedTransactionIndexType,
    pub sequence: u64,
    pub sig_op_count: u8,
    #[serde(with = "hex::serde")]
    pub signature_script: Vec<u8>,
}

impl SerializableTransactionInput {
    pub fn new(input: &cctx::TransactionInput) -> Self {
        Self {
            transaction_id: input.previous_outpoint.transaction_id,
            index: input.previous_outpoint.index,
            signature_script: input.signature_script.clone(),
            sequence: input.sequence,
            sig_op_count: input.sig_op_count,
        }
    }
}

impl From<&SerializableTransactionInput> for cctx::TransactionInput {
    fn from(input: &SerializableTransactionInput) -> Self {
        Self {
            previous_outpoint: TransactionOutpoint::new(input.transaction_id, input.index),
            signature_script: input.signature_script.clone(),
            sequence: input.sequence,
            sig_op_count: input.sig_op_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SerializableTransactionOutput {
    pub value: u64,
    pub script_public_key: ScriptPublicKey,
}

impl From<&cctx::TransactionOutput> for SerializableTransactionOutput {
    fn from(output: &cctx::TransactionOutput) -> Self {
        Self { value: output.value, script_public_key: output.script_public_key.clone() }
    }
}

impl From<&SerializableTransactionOutput> for cctx::TransactionOutput {
    fn from(output: &SerializableTransactionOutput) -> Self {
        Self { value: output.value, script_public_key: output.script_public_key.clone() }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SerializableTransaction {
    pub id: TransactionId,
    pub version: u16,
    pub inputs: Vec<SerializableTransactionInput>,
    pub outputs: Vec<SerializableTransactionOutput>,
    pub lock_time: u64,
    pub gas: u64,
    pub mass: u64,
    pub subnetwork_id: SubnetworkId,
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
    /// The resolved UTXO entries of the transaction inputs, in input order
    pub utxo_entries: Vec<SerializableUtxoEntry>,
}

impl SerializableTransaction {
    pub fn serialize_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn deserialize_from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_signable_transaction(tx: &cctx::SignableTransaction) -> Result<Self> {
        let transaction = &tx.tx;
        let utxo_entries = tx
            .entries
            .iter()
            .map(|entry| entry.as_ref().map(SerializableUtxoEntry::from).ok_or(Error::MissingUtxoEntry))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: transaction.id(),
            version: transaction.version,
            inputs: transaction.inputs.iter().map(SerializableTransactionInput::new).collect(),
            outputs: transaction.outputs.iter().map(SerializableTransactionOutput::from).collect(),
            lock_time: transaction.lock_time,
            subnetwork_id: transaction.subnetwork_id.clone(),
            gas: transaction.gas,
            mass: transaction.mass(),
            payload: transaction.payload.clone(),
            utxo_entries,
        })
    }
}

impl TryFrom<SerializableTransaction> for cctx::SignableTransaction {
    type Error = Error;
    fn try_from(serializable: SerializableTransaction) -> Result<Self> {
        if serializable.utxo_entries.len() != serializable.inputs.len() {
            return Err(Error::MissingUtxoEntry);
        }
        let entries = serializable.utxo_entries.iter().map(Into::into).collect();
        let inputs = serializable.inputs.iter().map(Into::into).collect();
        let outputs = serializable.outputs.iter().map(Into::into).collect();

        let tx = cctx::Transaction::new(
            serializable.version,
            inputs,
            outputs,
            serializable.lock_time,
            serializable.subnetwork_id,
            serializable.gas,
            serializable.payload,
        );
        tx.set_mass(serializable.mass);

        Ok(Self::with_entries(tx, entries))
    }
}
