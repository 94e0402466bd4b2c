//! Client-side UTXO entries, extending the consensus entry with its outpoint
//! and the receiving address.

use kaspa_sdk_addresses::Address;
use kaspa_sdk_consensus_core::tx as cctx;
use kaspa_sdk_consensus_core::tx::{ScriptPublicKey, TransactionOutpoint};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// The pair `(outpoint.transaction_id, outpoint.index)` uniquely identifies a
/// UTXO entry and keys duplicate-filtering sets.
pub type UtxoEntryId = TransactionOutpoint;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtxoEntry {
    pub address: Option<Address>,
    pub outpoint: TransactionOutpoint,
    pub amount: u64,
    pub script_public_key: ScriptPublicKey,
    pub block_daa_score: u64,
    pub is_coinbase: bool,
}

impl UtxoEntry {
    #[inline(always)]
    pub fn id(&self) -> UtxoEntryId {
        self.outpoint
    }
}

impl From<&UtxoEntry> for cctx::UtxoEntry {
    fn from(utxo: &UtxoEntry) -> Self {
        cctx::UtxoEntry {
            amount: utxo.amount,
            script_public_key: utxo.script_public_key.clone(),
            block_daa_score: utxo.block_daa_score,
            is_coinbase: utxo.is_coinbase,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UtxoEntryReference {
    pub utxo: Arc<UtxoEntry>,
}

impl UtxoEntryReference {
    #[inline(always)]
    pub fn id(&self) -> UtxoEntryId {
        self.utxo.outpoint
    }

    #[inline(always)]
    pub fn outpoint(&self) -> TransactionOutpoint {
        self.utxo.outpoint
    }

    #[inline(always)]
    pub fn amount(&self) -> u64 {
        self.utxo.amount
    }

    #[inline(always)]
    pub fn address(&self) -> Option<&Address> {
        self.utxo.address.as_ref()
    }

    #[inline(always)]
    pub fn is_coinbase(&self) -> bool {
        self.utxo.is_coinbase
    }

    #[inline(always)]
    pub fn block_daa_score(&self) -> u64 {
        self.utxo.block_daa_score
    }
}

impl From<UtxoEntry> for UtxoEntryReference {
    fn from(utxo: UtxoEntry) -> Self {
        Self { utxo: Arc::new(utxo) }
    }
}

impl From<&UtxoEntryReference> for cctx::UtxoEntry {
    fn from(utxo: &UtxoEntryReference) -> Self {
        utxo.utxo.as_ref().into()
    }
}

impl Ord for UtxoEntryReference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount().cmp(&other.amount()).then_with(|| self.id().transaction_id.cmp(&other.id().transaction_id)).then_with(|| {
            self.id().index.cmp(&other.id().index)
        })
    }
}

impl PartialOrd for UtxoEntryReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
