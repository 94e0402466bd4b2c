use crate::error::Error;
use crate::result::Result;
use crate::tx::generator::{GeneratorSettings, GeneratorSummary, PendingTransaction};
use crate::tx::mass::{MassCalculator, MAXIMUM_STANDARD_TRANSACTION_MASS};
use crate::tx::{Fees, PaymentDestination};
use crate::utxo::{UtxoEntry, UtxoEntryId, UtxoEntryReference};
use kaspa_sdk_addresses::Address;
use kaspa_sdk_consensus_core::config::params::Params;
use kaspa_sdk_consensus_core::constants::{TX_VERSION, UNACCEPTED_DAA_SCORE};
use kaspa_sdk_consensus_core::network::NetworkType;
use kaspa_sdk_consensus_core::subnets::SUBNETWORK_ID_NATIVE;
use kaspa_sdk_consensus_core::tx::{
    ScriptPublicKey, Transaction, TransactionId, TransactionInput, TransactionOutpoint, TransactionOutput,
};
use kaspa_sdk_txscript::pay_to_address_script;
use parking_lot::{Mutex, MutexGuard};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Above this mass the generator checks on every aggregated UTXO whether the
/// stage can be closed, instead of waiting for the value target.
const TRANSACTION_MASS_BOUNDARY_FOR_STAGE_INPUT_ACCUMULATION: u64 = MAXIMUM_STANDARD_TRANSACTION_MASS / 5 * 4;

/// Indicates the type of data generated by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// No operation - the generator is done, nothing was produced
    NoOp,
    /// A relay transaction consolidating UTXOs within the current stage
    Node,
    /// The last relay transaction of a stage, seeding the next stage
    Edge,
    /// The final transaction carrying the requested outputs
    Final,
}

impl DataKind {
    pub fn is_final(&self) -> bool {
        matches!(self, DataKind::Final)
    }

    pub fn is_stage_node(&self) -> bool {
        matches!(self, DataKind::Node)
    }

    pub fn is_edge(&self) -> bool {
        matches!(self, DataKind::Edge)
    }
}

/// Accumulator of the transaction currently under construction.
#[derive(Debug)]
struct Data {
    inputs: Vec<TransactionInput>,
    utxo_entry_references: Vec<UtxoEntryReference>,
    addresses: HashSet<Address>,
    aggregate_mass: u64,
    transaction_fees: u64,
    aggregate_input_value: u64,
    change_output_value: Option<u64>,
}

impl Data {
    fn new(calc: &MassCalculator) -> Self {
        Self {
            inputs: vec![],
            utxo_entry_references: vec![],
            addresses: HashSet::default(),
            aggregate_mass: calc.blank_transaction_compute_mass(),
            transaction_fees: 0,
            aggregate_input_value: 0,
            change_output_value: None,
        }
    }
}

/// A single generation stage. Stages form a singly-linked history: each new
/// stage iterates over the UTXO entries accumulated by the relay transactions
/// of the previous one.
struct Stage {
    utxo_iterator: Option<std::vec::IntoIter<UtxoEntryReference>>,
    utxo_accumulator: Vec<UtxoEntryReference>,
    aggregate_input_value: u64,
    aggregate_fees: u64,
    number_of_transactions: usize,
}

impl Stage {
    fn new(previous: Option<Stage>) -> Stage {
        let utxo_iterator = previous.map(|previous| previous.utxo_accumulator.into_iter());
        Stage { utxo_iterator, utxo_accumulator: vec![], aggregate_input_value: 0, aggregate_fees: 0, number_of_transactions: 0 }
    }
}

/// Mutable state of the generator.
struct Context {
    utxo_source_iterator: Box<dyn Iterator<Item = UtxoEntryReference> + Send + Sync + 'static>,
    /// UTXO entries consumed before the source iterator
    priority_utxo_entries: Option<VecDeque<UtxoEntryReference>>,
    /// Duplicate filter applied to the source iterator
    priority_utxo_entry_filter: Option<HashSet<UtxoEntryId>>,
    /// Current stage
    stage: Option<Box<Stage>>,
    /// UTXO entries deferred when a transaction hits the mass ceiling;
    /// consumed before any other source
    utxo_stash: VecDeque<UtxoEntryReference>,
    /// Total number of UTXOs consumed by the generator
    aggregated_utxos: usize,
    /// Fees of all transactions issued by the generator
    aggregate_fees: u64,
    /// Number of generated transactions
    number_of_transactions: usize,
    /// Id of the final transaction, available once the generator is done
    final_transaction_id: Option<TransactionId>,
    /// Signals that the generator has finished, either due to the final
    /// transaction being emitted or due to an error
    is_done: bool,
}

struct Inner {
    mass_calculator: MassCalculator,
    network_type: NetworkType,
    change_address: Address,
    sig_op_count: u8,
    minimum_signatures: u16,
    /// Compute mass of a standard change output paying to the change address
    standard_change_output_compute_mass: u64,
    /// Compute mass added to each input by its future signature
    signature_mass_per_input: u64,
    /// Mass reserved on relay transactions for the future spend of their output
    additional_compound_transaction_mass: u64,
    /// Total value of the final outputs, `None` when sweeping to the change address
    final_transaction_value_no_fees: Option<u64>,
    final_transaction_priority_fee: Fees,
    final_transaction_outputs: Vec<TransactionOutput>,
    final_transaction_outputs_compute_mass: u64,
    final_transaction_payload: Vec<u8>,
    final_transaction_payload_mass: u64,
    context: Mutex<Context>,
}

/// Consumes UTXO entries and produces a lazy sequence of signable transactions
/// until the requested payment (or sweep) is fully composed.
#[derive(Clone)]
pub struct Generator {
    inner: Arc<Inner>,
}

impl Generator {
    pub fn try_new(settings: GeneratorSettings) -> Result<Self> {
        let GeneratorSettings {
            network_type,
            utxo_iterator,
            priority_utxo_entries,
            sig_op_count,
            minimum_signatures,
            change_address,
            final_transaction_destination,
            final_priority_fee,
            final_transaction_payload,
        } = settings;

        let params = Params::from(network_type);
        let mass_calculator = MassCalculator::new(&params);

        if change_address.prefix != params.prefix() {
            return Err(Error::ChangeAddressNetworkMismatch(change_address));
        }

        let final_transaction_outputs = match &final_transaction_destination {
            PaymentDestination::Change => {
                if !final_priority_fee.is_none() {
                    return Err(Error::FeesInSweepTransaction);
                }
                vec![]
            }
            PaymentDestination::PaymentOutputs(payment_outputs) => {
                if final_priority_fee.receiver_pays() && payment_outputs.outputs.len() > 1 {
                    return Err(Error::PriorityFeesToMultipleOutputs);
                }
                for output in payment_outputs.iter() {
                    if output.amount == 0 {
                        return Err(Error::PaymentOutputZeroValue);
                    }
                    if output.address.prefix != params.prefix() {
                        return Err(Error::PaymentOutputNetworkMismatch(output.address.clone()));
                    }
                    if mass_calculator.is_dust(&output.into()) {
                        return Err(Error::DustOutput(output.address.clone()));
                    }
                }
                payment_outputs.iter().map(TransactionOutput::from).collect()
            }
        };

        let standard_change_output_compute_mass =
            mass_calculator.calc_compute_mass_for_output(&TransactionOutput::new(0, pay_to_address_script(&change_address)));
        let signature_mass_per_input = mass_calculator.calc_signature_compute_mass_per_input(minimum_signatures);
        let final_transaction_outputs_compute_mass = mass_calculator.calc_compute_mass_for_outputs(&final_transaction_outputs);
        let final_transaction_payload = final_transaction_payload.unwrap_or_default();
        let final_transaction_payload_mass = mass_calculator.calc_compute_mass_for_payload(final_transaction_payload.len());
        let final_transaction_value_no_fees = final_transaction_destination.amount();

        // A transaction which can not contain a single input alongside the
        // final outputs is unrealizable regardless of the UTXO composition
        if final_transaction_outputs_compute_mass + final_transaction_payload_mass + standard_change_output_compute_mass
            > TRANSACTION_MASS_BOUNDARY_FOR_STAGE_INPUT_ACCUMULATION
        {
            return Err(Error::MassCalculationError);
        }

        let priority_utxo_entry_filter =
            priority_utxo_entries.as_ref().map(|entries| entries.iter().map(|entry| entry.id()).collect::<HashSet<_>>());
        let priority_utxo_entries = priority_utxo_entries.map(VecDeque::from);

        let context = Mutex::new(Context {
            utxo_source_iterator: utxo_iterator,
            priority_utxo_entries,
            priority_utxo_entry_filter,
            stage: Some(Box::new(Stage::new(None))),
            utxo_stash: VecDeque::default(),
            aggregated_utxos: 0,
            aggregate_fees: 0,
            number_of_transactions: 0,
            final_transaction_id: None,
            is_done: false,
        });

        Ok(Self {
            inner: Arc::new(Inner {
                mass_calculator,
                network_type,
                change_address,
                sig_op_count,
                minimum_signatures,
                standard_change_output_compute_mass,
                signature_mass_per_input,
                additional_compound_transaction_mass: params.additional_compound_transaction_mass,
                final_transaction_value_no_fees,
                final_transaction_priority_fee: final_priority_fee,
                final_transaction_outputs,
                final_transaction_outputs_compute_mass,
                final_transaction_payload,
                final_transaction_payload_mass,
                context,
            }),
        })
    }

    pub fn network_type(&self) -> NetworkType {
        self.inner.network_type
    }

    pub fn change_address(&self) -> &Address {
        &self.inner.change_address
    }

    pub fn minimum_signatures(&self) -> u16 {
        self.inner.minimum_signatures
    }

    /// Returns a summary of the work performed so far.
    pub fn summary(&self) -> GeneratorSummary {
        let context = self.context();
        GeneratorSummary {
            network_type: self.inner.network_type,
            aggregated_utxos: context.aggregated_utxos,
            aggregated_fees: context.aggregate_fees,
            final_transaction_amount: self.inner.final_transaction_value_no_fees,
            final_transaction_id: context.final_transaction_id,
            number_of_generated_transactions: context.number_of_transactions,
        }
    }

    /// Returns an iterator over the generated transactions.
    pub fn iter(&self) -> super::GeneratorIterator {
        super::GeneratorIterator::new(self.clone())
    }

    fn context(&self) -> MutexGuard<'_, Context> {
        self.inner.context.lock()
    }

    /// Produces the next transaction, or `None` once the generation is complete.
    pub fn generate_transaction(&self) -> Result<Option<PendingTransaction>> {
        let mut context = self.context();

        if context.is_done {
            return Ok(None);
        }

        let mut stage = context.stage.take().expect("the generator has an active stage when not done");
        let (kind, data) = match self.generate_transaction_data(&mut context, &mut stage) {
            Ok(generated) => generated,
            Err(err) => {
                // Generation errors are terminal
                context.is_done = true;
                return Err(err);
            }
        };

        match kind {
            DataKind::NoOp => {
                context.is_done = true;
                Ok(None)
            }
            DataKind::Final => {
                context.is_done = true;

                let Data { inputs, utxo_entry_references, addresses, aggregate_mass, transaction_fees, aggregate_input_value, change_output_value } =
                    data;
                let change_output_value = change_output_value.unwrap_or_default();

                let mut final_outputs = self.inner.final_transaction_outputs.clone();

                if self.inner.final_transaction_priority_fee.receiver_pays() {
                    let output = final_outputs.get_mut(0).expect("a receiver-pays transaction has a payment output");
                    output.value = output
                        .value
                        .checked_sub(transaction_fees + context.aggregate_fees)
                        .ok_or(Error::InsufficientFunds { additional_needed: transaction_fees + context.aggregate_fees, origin: "final" })?;
                }

                if change_output_value > 0 {
                    final_outputs.push(TransactionOutput::new(change_output_value, pay_to_address_script(&self.inner.change_address)));
                }

                let aggregate_output_value = final_outputs.iter().map(|output| output.value).sum::<u64>();

                let tx = Transaction::new(
                    TX_VERSION,
                    inputs,
                    final_outputs,
                    0,
                    SUBNETWORK_ID_NATIVE,
                    0,
                    self.inner.final_transaction_payload.clone(),
                );
                tx.set_mass(aggregate_mass);

                context.final_transaction_id = Some(tx.id());
                context.number_of_transactions += 1;
                context.aggregate_fees += transaction_fees;

                Ok(Some(PendingTransaction::try_new(
                    tx,
                    utxo_entry_references,
                    addresses.into_iter().collect(),
                    self.inner.final_transaction_value_no_fees,
                    change_output_value,
                    aggregate_input_value,
                    aggregate_output_value,
                    aggregate_mass,
                    transaction_fees,
                    kind,
                )?))
            }
            DataKind::Node | DataKind::Edge => {
                let Data { inputs, utxo_entry_references, addresses, aggregate_mass, transaction_fees, aggregate_input_value, .. } =
                    data;

                let output_value = aggregate_input_value.checked_sub(transaction_fees).ok_or(Error::InsufficientFunds {
                    additional_needed: transaction_fees - aggregate_input_value,
                    origin: "relay",
                })?;
                let script_public_key = pay_to_address_script(&self.inner.change_address);
                let output = TransactionOutput::new(output_value, script_public_key.clone());
                let tx = Transaction::new(TX_VERSION, inputs, vec![output], 0, SUBNETWORK_ID_NATIVE, 0, vec![]);
                tx.set_mass(aggregate_mass);
                context.number_of_transactions += 1;

                let utxo_entry_reference =
                    Self::create_batch_utxo_entry_reference(tx.id(), output_value, script_public_key, &self.inner.change_address);

                match kind {
                    DataKind::Node => {
                        // Place the relay output into the current stage
                        stage.utxo_accumulator.push(utxo_entry_reference);
                        stage.number_of_transactions += 1;
                        context.stage.replace(stage);
                    }
                    DataKind::Edge => {
                        // The stage is complete; its accumulated outputs become
                        // the input iterator of the next stage
                        stage.utxo_accumulator.push(utxo_entry_reference);
                        stage.number_of_transactions += 1;
                        context.stage.replace(Box::new(Stage::new(Some(*stage))));
                    }
                    _ => unreachable!(),
                }

                Ok(Some(PendingTransaction::try_new(
                    tx,
                    utxo_entry_references,
                    addresses.into_iter().collect(),
                    None,
                    output_value,
                    aggregate_input_value,
                    output_value,
                    aggregate_mass,
                    transaction_fees,
                    kind,
                )?))
            }
        }
    }

    fn create_batch_utxo_entry_reference(
        transaction_id: TransactionId,
        amount: u64,
        script_public_key: ScriptPublicKey,
        address: &Address,
    ) -> UtxoEntryReference {
        UtxoEntryReference {
            utxo: Arc::new(UtxoEntry {
                address: Some(address.clone()),
                outpoint: TransactionOutpoint::new(transaction_id, 0),
                amount,
                script_public_key,
                block_daa_score: UNACCEPTED_DAA_SCORE,
                is_coinbase: false,
            }),
        }
    }

    /// Fetches the next UTXO entry to aggregate. The sourcing order is the
    /// stash, the current stage iterator, the priority entries and finally the
    /// main iterator filtered against the priority set.
    fn get_utxo_entry(&self, context: &mut Context, stage: &mut Stage) -> Option<UtxoEntryReference> {
        context
            .utxo_stash
            .pop_front()
            .or_else(|| stage.utxo_iterator.as_mut().and_then(|utxo_iterator| utxo_iterator.next()))
            .or_else(|| context.priority_utxo_entries.as_mut().and_then(|entries| entries.pop_front()))
            .or_else(|| loop {
                let utxo_entry = context.utxo_source_iterator.next()?;
                match context.priority_utxo_entry_filter.as_ref() {
                    Some(filter) if filter.contains(&utxo_entry.id()) => {
                        // Skip the entry, it was already consumed via the priority list
                        continue;
                    }
                    _ => break Some(utxo_entry),
                }
            })
    }

    /// Aggregates UTXO entries into the supplied [`Data`], deciding what kind
    /// of transaction the accumulation amounts to.
    fn generate_transaction_data(&self, context: &mut Context, stage: &mut Stage) -> Result<(DataKind, Data)> {
        let calc = &self.inner.mass_calculator;
        let mut data = Data::new(calc);

        loop {
            let Some(utxo_entry_reference) = self.get_utxo_entry(context, stage) else {
                // UTXO sources are depleted
                break match self.inner.final_transaction_value_no_fees {
                    None => self.finish_relay_stage_processing(context, stage, data),
                    Some(final_transaction_value_no_fees) => {
                        let compute_fees = calc.calc_minimum_transaction_fee_from_mass(
                            data.aggregate_mass
                                + self.inner.final_transaction_outputs_compute_mass
                                + self.inner.final_transaction_payload_mass
                                + self.inner.standard_change_output_compute_mass,
                        );
                        let required = match self.inner.final_transaction_priority_fee {
                            Fees::SenderPays(priority_fee) => final_transaction_value_no_fees + compute_fees + priority_fee,
                            Fees::None => final_transaction_value_no_fees + compute_fees,
                            Fees::ReceiverPays(_) => final_transaction_value_no_fees.saturating_sub(context.aggregate_fees),
                        };
                        Err(Error::InsufficientFunds {
                            additional_needed: required.saturating_sub(stage.aggregate_input_value),
                            origin: "accumulator",
                        })
                    }
                };
            };

            let input = TransactionInput::new(utxo_entry_reference.outpoint(), vec![], 0, self.inner.sig_op_count);
            let input_amount = utxo_entry_reference.amount();
            let input_compute_mass = calc.calc_compute_mass_for_input(&input) + self.inner.signature_mass_per_input;

            // Relay transaction boundary: the input does not fit, so emit the
            // accumulation as a relay transaction and defer the input
            if data.aggregate_mass
                + input_compute_mass
                + self.inner.standard_change_output_compute_mass
                + self.inner.additional_compound_transaction_mass
                > MAXIMUM_STANDARD_TRANSACTION_MASS
            {
                context.utxo_stash.push_back(utxo_entry_reference);
                data.aggregate_mass += self.inner.standard_change_output_compute_mass;
                data.transaction_fees = calc.calc_minimum_transaction_fee_from_mass(data.aggregate_mass);
                stage.aggregate_fees += data.transaction_fees;
                context.aggregate_fees += data.transaction_fees;
                break Ok((DataKind::Node, data));
            }

            context.aggregated_utxos += 1;
            stage.aggregate_input_value += input_amount;
            data.aggregate_input_value += input_amount;
            data.aggregate_mass += input_compute_mass;
            data.utxo_entry_references.push(utxo_entry_reference.clone());
            data.inputs.push(input);
            if let Some(address) = utxo_entry_reference.address() {
                data.addresses.insert(address.clone());
            }

            // Stage completion is tested only when composing a payment; sweep
            // stages run until the UTXO sources are depleted
            if let Some(final_transaction_value_no_fees) = self.inner.final_transaction_value_no_fees {
                let final_transaction_value_reached = match self.inner.final_transaction_priority_fee {
                    Fees::SenderPays(priority_fee) => {
                        stage.aggregate_input_value >= final_transaction_value_no_fees + priority_fee
                    }
                    Fees::None => stage.aggregate_input_value >= final_transaction_value_no_fees,
                    Fees::ReceiverPays(_) => {
                        stage.aggregate_input_value + context.aggregate_fees >= final_transaction_value_no_fees
                    }
                };

                if final_transaction_value_reached || data.aggregate_mass > TRANSACTION_MASS_BOUNDARY_FOR_STAGE_INPUT_ACCUMULATION {
                    if let Some(kind) =
                        self.try_finish_standard_stage_processing(context, stage, &mut data, final_transaction_value_no_fees)?
                    {
                        break Ok((kind, data));
                    }
                }
            }
        }
    }

    /// Closes the relay stage of a sweep once the UTXO sources are depleted.
    fn finish_relay_stage_processing(&self, context: &mut Context, stage: &mut Stage, mut data: Data) -> Result<(DataKind, Data)> {
        let calc = &self.inner.mass_calculator;
        data.aggregate_mass += self.inner.standard_change_output_compute_mass;
        data.transaction_fees = calc.calc_minimum_transaction_fee_from_mass(data.aggregate_mass);

        if context.aggregated_utxos < 2 {
            // A single UTXO has nothing to compound with
            Ok((DataKind::NoOp, data))
        } else if stage.number_of_transactions > 0 {
            stage.aggregate_fees += data.transaction_fees;
            context.aggregate_fees += data.transaction_fees;
            Ok((DataKind::Edge, data))
        } else if data.aggregate_input_value < data.transaction_fees {
            Err(Error::InsufficientFunds { additional_needed: data.transaction_fees - data.aggregate_input_value, origin: "relay" })
        } else {
            let change_output_value = data.aggregate_input_value - data.transaction_fees;
            let output = TransactionOutput::new(change_output_value, pay_to_address_script(&self.inner.change_address));
            if calc.is_dust(&output) {
                // Sweeping into a dust change output is pointless
                Ok((DataKind::NoOp, data))
            } else {
                stage.aggregate_fees += data.transaction_fees;
                context.aggregate_fees += data.transaction_fees;
                data.change_output_value = Some(change_output_value);
                Ok((DataKind::Final, data))
            }
        }
    }

    /// Tests whether the current accumulation can be closed into the final
    /// transaction, an edge transaction or neither (more value is needed).
    fn try_finish_standard_stage_processing(
        &self,
        context: &mut Context,
        stage: &mut Stage,
        data: &mut Data,
        final_transaction_value_no_fees: u64,
    ) -> Result<Option<DataKind>> {
        let calc = &self.inner.mass_calculator;

        let compute_mass_with_change = data.aggregate_mass
            + self.inner.final_transaction_outputs_compute_mass
            + self.inner.final_transaction_payload_mass
            + self.inner.standard_change_output_compute_mass;
        let compute_fees = calc.calc_minimum_transaction_fee_from_mass(compute_mass_with_change);

        // Check whether the aggregated value covers the value and fee
        // requirements of the final transaction; reject otherwise so that
        // the caller fetches more UTXOs
        let reject = match self.inner.final_transaction_priority_fee {
            Fees::SenderPays(priority_fee) => {
                stage.aggregate_input_value < final_transaction_value_no_fees + compute_fees + priority_fee
            }
            Fees::None => stage.aggregate_input_value < final_transaction_value_no_fees + compute_fees,
            Fees::ReceiverPays(_) => {
                stage.aggregate_input_value < final_transaction_value_no_fees.saturating_sub(context.aggregate_fees)
            }
        };
        if reject {
            return Ok(None);
        }

        if stage.number_of_transactions > 0 {
            // The aggregated value of this stage is spread over relay
            // transactions; close the stage and let the next one compose the
            // final transaction out of their outputs
            return Ok(Some(self.finish_edge(context, stage, data)));
        }

        // The final transaction is composed from the current accumulation
        let mut transaction_fees = compute_fees + self.inner.final_transaction_priority_fee.additional();

        let mut change_output_value = match self.inner.final_transaction_priority_fee {
            Fees::ReceiverPays(_) => {
                stage.aggregate_input_value + context.aggregate_fees - final_transaction_value_no_fees
            }
            _ => stage.aggregate_input_value - final_transaction_value_no_fees - transaction_fees,
        };

        let mut has_change_output = change_output_value > 0;
        if has_change_output {
            let change_output = TransactionOutput::new(change_output_value, pay_to_address_script(&self.inner.change_address));
            if calc.is_dust(&change_output) {
                // Absorb dust change into the fees and re-score the mass
                transaction_fees += change_output_value;
                change_output_value = 0;
                has_change_output = false;
            }
        }

        let compute_mass = match has_change_output {
            true => compute_mass_with_change,
            false => compute_mass_with_change - self.inner.standard_change_output_compute_mass,
        };

        // Candidate output values of the final transaction, accounting for a
        // receiver-pays reduction of the payment output
        let mut output_values =
            self.inner.final_transaction_outputs.iter().map(|output| output.value).collect::<Vec<_>>();
        if self.inner.final_transaction_priority_fee.receiver_pays() {
            let reduction = transaction_fees + context.aggregate_fees;
            output_values[0] = output_values[0]
                .checked_sub(reduction)
                .ok_or(Error::InsufficientFunds { additional_needed: reduction, origin: "final" })?;
        }
        if has_change_output {
            output_values.push(change_output_value);
        }

        let storage_mass = calc
            .calc_storage_mass_for_values(data.utxo_entry_references.iter().map(|utxo| utxo.amount()), output_values.into_iter())
            .ok_or(Error::StorageMassOverflow)?;
        let transaction_mass = compute_mass.max(storage_mass);

        if transaction_mass > MAXIMUM_STANDARD_TRANSACTION_MASS {
            if data.inputs.len() > 1 {
                // Compounding the inputs through another stage lowers the
                // storage mass of the final transaction
                return Ok(Some(self.finish_edge(context, stage, data)));
            }
            return Err(Error::MassCalculationError);
        }

        data.aggregate_mass = transaction_mass;
        data.transaction_fees = transaction_fees;
        data.change_output_value = Some(change_output_value);
        Ok(Some(DataKind::Final))
    }

    /// Scores the current accumulation as a stage-closing edge transaction.
    fn finish_edge(&self, context: &mut Context, stage: &mut Stage, data: &mut Data) -> DataKind {
        data.aggregate_mass += self.inner.standard_change_output_compute_mass;
        data.transaction_fees = self.inner.mass_calculator.calc_minimum_transaction_fee_from_mass(data.aggregate_mass);
        stage.aggregate_fees += data.transaction_fees;
        context.aggregate_fees += data.transaction_fees;
        DataKind::Edge
    }
}
