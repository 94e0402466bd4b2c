//! Wallet-side mass calculation for transactions under construction. Unlike the
//! consensus calculator, these routines estimate the mass of transactions whose
//! signature scripts are not populated yet.

use kaspa_sdk_consensus_core::config::params::Params;
use kaspa_sdk_consensus_core::constants::MAX_SOMPI;
use kaspa_sdk_consensus_core::mass::{
    calc_storage_mass, transaction_input_estimated_serialized_size, transaction_output_estimated_serialized_size,
};
use kaspa_sdk_consensus_core::subnets::SUBNETWORK_ID_SIZE;
use kaspa_sdk_consensus_core::tx::{Transaction, TransactionInput, TransactionOutput};
use kaspa_sdk_hashes::HASH_SIZE;

/// Size of the signature script push added to each input upon signing:
/// `OpData65` followed by a 64-byte signature and the sighash-type byte.
pub const SIGNATURE_SIZE: u64 = 1 + 64 + 1;

pub const MINIMUM_RELAY_TRANSACTION_FEE: u64 = 1_000;

/// The maximum mass a standard transaction is allowed to carry.
pub const MAXIMUM_STANDARD_TRANSACTION_MASS: u64 = 100_000;

/// Returns the minimum fee required for a transaction of the given mass to be
/// accepted into the mempool and relayed. Computed in sompi per kilogram and
/// capped at the valid range of monetary amounts.
pub fn calc_minimum_required_transaction_relay_fee(mass: u64) -> u64 {
    let mut minimum_fee = (mass * MINIMUM_RELAY_TRANSACTION_FEE) / 1000;
    if minimum_fee == 0 {
        minimum_fee = MINIMUM_RELAY_TRANSACTION_FEE;
    }
    minimum_fee.min(MAX_SOMPI)
}

/// Returns whether the output's value does not cover the relay cost of spending it.
///
/// The test multiplies the output value by 1000 and divides it by three times the
/// cost of the output plus its future spending input (which adds 148 bytes); the
/// quotient must reach the minimum relay fee. Scripts shorter than the standard
/// 33-byte public key are always considered dust.
pub fn is_standard_output_amount_dust(output: &TransactionOutput) -> bool {
    if output.script_public_key.script().len() < 33 {
        return true;
    }
    let total_serialized_size = transaction_output_estimated_serialized_size(output) + 148;
    output.value * 1000 / (3 * total_serialized_size) < MINIMUM_RELAY_TRANSACTION_FEE
}

#[derive(Clone)]
pub struct MassCalculator {
    mass_per_tx_byte: u64,
    mass_per_script_pub_key_byte: u64,
    mass_per_sig_op: u64,
    storage_mass_parameter: u64,
}

impl MassCalculator {
    pub fn new(params: &Params) -> Self {
        Self {
            mass_per_tx_byte: params.mass_per_tx_byte,
            mass_per_script_pub_key_byte: params.mass_per_script_pub_key_byte,
            mass_per_sig_op: params.mass_per_sig_op,
            storage_mass_parameter: params.storage_mass_parameter,
        }
    }

    /// Compute mass of a transaction skeleton carrying no inputs and no outputs.
    pub fn blank_transaction_compute_mass(&self) -> u64 {
        self.mass_per_tx_byte
            * (2 // version (u16)
            + 8 // number of inputs (u64)
            + 8 // number of outputs (u64)
            + 8 // lock time (u64)
            + SUBNETWORK_ID_SIZE as u64
            + 8 // gas (u64)
            + HASH_SIZE as u64 // payload hash
            + 8) // length of the payload (u64)
    }

    pub fn calc_compute_mass_for_payload(&self, payload_byte_size: usize) -> u64 {
        payload_byte_size as u64 * self.mass_per_tx_byte
    }

    pub fn calc_compute_mass_for_output(&self, output: &TransactionOutput) -> u64 {
        self.mass_per_script_pub_key_byte * (2 + output.script_public_key.script().len() as u64)
            + self.mass_per_tx_byte * transaction_output_estimated_serialized_size(output)
    }

    pub fn calc_compute_mass_for_outputs(&self, outputs: &[TransactionOutput]) -> u64 {
        outputs.iter().map(|output| self.calc_compute_mass_for_output(output)).sum()
    }

    pub fn calc_compute_mass_for_input(&self, input: &TransactionInput) -> u64 {
        self.mass_per_sig_op * input.sig_op_count as u64 + self.mass_per_tx_byte * transaction_input_estimated_serialized_size(input)
    }

    /// The compute mass the signature of a single input will add once the
    /// transaction is signed.
    pub fn calc_signature_compute_mass_per_input(&self, minimum_signatures: u16) -> u64 {
        SIGNATURE_SIZE * self.mass_per_tx_byte * minimum_signatures.max(1) as u64
    }

    /// Compute mass of a fully signed transaction.
    pub fn calc_compute_mass_for_signed_transaction(&self, tx: &Transaction) -> u64 {
        self.blank_transaction_compute_mass()
            + self.calc_compute_mass_for_payload(tx.payload.len())
            + self.calc_compute_mass_for_outputs(&tx.outputs)
            + tx.inputs.iter().map(|input| self.calc_compute_mass_for_input(input)).sum::<u64>()
    }

    /// Compute mass of an unsigned transaction, accounting for the future
    /// signature of each input.
    pub fn calc_compute_mass_for_unsigned_transaction(&self, tx: &Transaction, minimum_signatures: u16) -> u64 {
        self.calc_compute_mass_for_signed_transaction(tx)
            + self.calc_signature_compute_mass_per_input(minimum_signatures) * tx.inputs.len() as u64
    }

    pub fn calc_minimum_transaction_fee_from_mass(&self, mass: u64) -> u64 {
        calc_minimum_required_transaction_relay_fee(mass)
    }

    pub fn is_dust(&self, output: &TransactionOutput) -> bool {
        is_standard_output_amount_dust(output)
    }

    /// Storage mass (KIP-0009) for explicit input and candidate output values.
    pub fn calc_storage_mass_for_values(
        &self,
        input_values: impl ExactSizeIterator<Item = u64> + Clone,
        output_values: impl Iterator<Item = u64>,
    ) -> Option<u64> {
        calc_storage_mass(false, input_values, output_values, self.storage_mass_parameter)
    }
}
