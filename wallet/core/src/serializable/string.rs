//! Borsh-shaped submission format: every `u64` is carried as a decimal string
//! and each input is resolved with its UTXO entry.

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
    pub amount: String,
    pub script_public_key: ScriptPublicKey,
    pub block_daa_score: String,
    pub is_coinbase: bool,
}

impl From<&UtxoEntryReference> for SerializableUtxoEntry {
    fn from(utxo: &UtxoEntryReference) -> Self {
        let utxo = utxo.utxo.as_ref();
        Self {
            address: utxo.address.clone(),
            amount: utxo.amount.to_string(),
            script_public_key: utxo.script_public_key.clone(),
            block_daa_score: utxo.block_daa_score.to_string(),
            is_coinbase: utxo.is_coinbase,
        }
    }
}

impl From<&cctx::UtxoEntry> for SerializableUtxoEntry {
    fn from(utxo: &cctx::UtxoEntry) -> Self {
        Self {
            address: None,
            amount: utxo.amount.to_string(),
            script_public_key: utxo.script_public_key.clone(),
            block_daa_score: utxo.block_daa_score.to_string(),
            is_coinbase: utxo.is_coinbase,
        }
    }
}

impl TryFrom<&SerializableUtxoEntry> for cctx::UtxoEntry {
    type Error = Error;
    fn try_from(utxo: &SerializableUtxoEntry) -> Result<Self> {
        Ok(Self {
            amount: utxo.amount.parse()?,
            script_public_key: utxo.script_public_key.clone(),
            block_daa_score: utxo.block_daa_score.parse()?,
            is_coinbase: utxo.is_coinbase,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SerializableTransactionInput {
    pub transaction_id: TransactionId,
    pub index: SignedTransactionIndexType,
    pub sequence: String,
    pub sig_op_count: u8,
    #[serde(with = "hex::serde")]
    pub signature_script: Vec<u8>,
    pub utxo: SerializableUtxoEntry,
}

impl SerializableTransactionInput {
    pub fn new(input: &cctx::TransactionInput, utxo: &cctx::UtxoEntry) -> Self {
        Self {
            transaction_id: input.previous_outpoint.transaction_id,
            index: input.previous_outpoint.index,
            signature_script: input.signature_script.clone(),
            sequence: input.sequence.to_string(),
            sig_op_count: input.sig_op_count,
            utxo: utxo.into(),
        }
    }
}

impl TryFrom<&SerializableTransactionInput> for cctx::TransactionInput {
    type Error = Error;
    fn try_from(input: &SerializableTransactionInput) -> Result<Self> {
        Ok(Self {
            previous_outpoint: TransactionOutpoint::new(input.transaction_id, input.index),
            signature_script: input.signature_script.clone(),
            sequence: input.sequence.parse()?,
            sig_op_count: input.sig_op_count,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SerializableTransactionOutput {
    pub value: String,
    pub script_public_key: ScriptPublicKey,
}

impl From<&cctx::TransactionOutput> for SerializableTransactionOutput {
    fn from(output: &cctx::TransactionOutput) -> Self {
        Self { value: output.value.to_string(), script_public_key: output.script_public_key.clone() }
    }
}

impl TryFrom<&SerializableTransactionOutput> for cctx::TransactionOutput {
    type Error = Error;
    fn try_from(output: &SerializableTransactionOutput) -> Result<Self> {
        Ok(Self { value: output.value.parse()?, script_public_key: output.script_public_key.clone() })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SerializableTransaction {
    pub id: TransactionId,
    pub version: u16,
    pub inputs: Vec<SerializableTransactionInput>,
    pub outputs: Vec<SerializableTransactionOutput>,
    pub lock_time: String,
    pub gas: String,
    pub mass: String,
    pub subnetwork_id: SubnetworkId,
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
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
        let inputs = transaction
            .inputs
            .iter()
            .zip(tx.entries.iter())
            .map(|(input, entry)| {
                let entry = entry.as_ref().ok_or(Error::MissingUtxoEntry)?;
                Ok(SerializableTransactionInput::new(input, entry))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: transaction.id(),
            version: transaction.version,
            inputs,
            outputs: transaction.outputs.iter().map(SerializableTransactionOutput::from).collect(),
            lock_time: transaction.lock_time.to_string(),
            subnetwork_id: transaction.subnetwork_id.clone(),
            gas: transaction.gas.to_string(),
            mass: transaction.mass().to_string(),
            payload: transaction.payload.clone(),
        })
    }
}

impl TryFrom<SerializableTransaction> for cctx::SignableTransaction {
    type Error = Error;
    fn try_from(serializable: SerializableTransaction) -> Result<Self> {
        let mut entries = Vec::with_capacity(serializable.inputs.len());
        let mut inputs = Vec::with_capacity(serializable.inputs.len());
        for input in serializable.inputs.iter() {
            entries.push((&input.utxo).try_into()?);
            inputs.push(input.try_into()?);
        }

        let outputs = serializable.outputs.iter().map(TryInto::try_into).collect::<Result<Vec<_>>>()?;

        let tx = cctx::Transaction::new(
            serializable.version,
            inputs,
            outputs,
            serializable.lock_time.parse()?,
            serializable.subnetwork_id,
            serializable.gas.parse()?,
            serializable.payload,
        );
        tx.set_mass(serializable.mass.parse()?);

        Ok(Self::with_entries(tx, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaspa_sdk_consensus_core::subnets::SUBNETWORK_ID_NATIVE;
    use std::str::FromStr;

    #[test]
    fn test_string_serializable_roundtrip() {
        let prev_tx_id = TransactionId::from_str("880eb9819a31821d9d2399e2f35e2433b72637e393d71ecc9b8d0250f49153c3").unwrap();
        let tx = cctx::Transaction::new(
            0,
            vec![cctx::TransactionInput::new(TransactionOutpoint::new(prev_tx_id, 1), vec![1, 2, 3], 5, 1)],
            vec![cctx::TransactionOutput::new(300, ScriptPublicKey::from_vec(0, vec![0x20; 34]))],
            0,
            SUBNETWORK_ID_NATIVE,
            0,
            vec![],
        );
        let entries = vec![cctx::UtxoEntry::new(500, ScriptPublicKey::from_vec(0, vec![0x20; 34]), 1000, false)];
        let signable = cctx::SignableTransaction::with_entries(tx, entries);

        let serializable = SerializableTransaction::from_signable_transaction(&signable).unwrap();
        let json = serializable.serialize_to_json().unwrap();

        // u64 quantities are carried as decimal strings
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["inputs"][0]["sequence"], "5");
        assert_eq!(value["inputs"][0]["utxo"]["amount"], "500");
        assert_eq!(value["outputs"][0]["value"], "300");

        let deserialized = SerializableTransaction::deserialize_from_json(&json).unwrap();
        let roundtrip = cctx::SignableTransaction::try_from(deserialized).unwrap();
        assert_eq!(roundtrip.tx.id(), signable.tx.id());
        assert_eq!(roundtrip.entries, signable.entries);
    }
}
