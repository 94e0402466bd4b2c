pub mod caches;
mod data_stack;
pub mod opcodes;
pub mod script_builder;
pub mod script_class;
pub mod standard;

use crate::caches::{PublicKey, SigCache, SigCacheKey, Signature};
use crate::data_stack::{DataStack, Stack};
use crate::opcodes::{codes, deserialize_next_opcode, to_small_int, OpCodeImplementation};
use crate::standard::multisig::get_multisig_params;
use itertools::Itertools;
use kaspa_sdk_consensus_core::hashing::sighash::{calc_ecdsa_signature_hash, calc_schnorr_signature_hash, SigHashReusedValues};
use kaspa_sdk_consensus_core::hashing::sighash_type::SigHashType;
use kaspa_sdk_consensus_core::tx::{ScriptPublicKey, TransactionInput, UtxoEntry, VerifiableTransaction};
use kaspa_sdk_txscript_errors::TxScriptError;
use log::warn;
use script_class::ScriptClass;

pub use standard::*;

pub const MAX_SCRIPT_PUBLIC_KEY_VERSION: u16 = 0;
pub const MAX_STACK_SIZE: usize = 244;
pub const MAX_SCRIPTS_SIZE: usize = 10_000;
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
pub const MAX_OPS_PER_SCRIPT: i32 = 201;
pub const MAX_TX_IN_SEQUENCE_NUM: u64 = u64::MAX;
pub const SEQUENCE_LOCK_TIME_DISABLED: u64 = 1 << 63;
pub const SEQUENCE_LOCK_TIME_MASK: u64 = 0x00000000ffffffff;
pub const LOCK_TIME_THRESHOLD: u64 = 500_000_000_000;
pub const MAX_PUB_KEYS_PER_MULTISIG: i32 = 20;

// The last opcode that does not count toward operations.
// Note that this includes OP_RESERVED which counts as a push operation.
pub const NO_COST_OPCODE: u8 = 0x60;

enum ScriptSource<'a, T: VerifiableTransaction> {
    TxInput { tx: &'a T, input: &'a TransactionInput, id: usize, utxo_entry: &'a UtxoEntry, is_p2sh: bool },
    StandAloneScripts(Vec<&'a [u8]>),
}

/// The condition stack entries gating execution: an opcode under a `False` or
/// `Skip` branch is parsed but not executed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OpCond {
    False,
    True,
    Skip,
}

impl OpCond {
    pub fn negate(&self) -> OpCond {
        match self {
            OpCond::False => OpCond::True,
            OpCond::True => OpCond::False,
            OpCond::Skip => OpCond::Skip,
        }
    }
}

pub struct TxScriptEngine<'a, T: VerifiableTransaction, Reused: SigHashReusedValues> {
    dstack: Stack,
    astack: Stack,

    script_source: ScriptSource<'a, T>,

    // Outer caches for quicker calculation
    reused_values: &'a Reused,
    sig_cache: &'a SigCache,

    cond_stack: Vec<OpCond>, // Following if stacks, and whether it is running

    num_ops: i32,

    kip10_enabled: bool,
}

impl<'a, T: VerifiableTransaction, Reused: SigHashReusedValues> TxScriptEngine<'a, T, Reused> {
    pub fn new(reused_values: &'a Reused, sig_cache: &'a SigCache, kip10_enabled: bool) -> Self {
        Self {
            dstack: vec![],
            astack: vec![],
            script_source: ScriptSource::StandAloneScripts(vec![]),
            reused_values,
            sig_cache,
            cond_stack: vec![],
            num_ops: 0,
            kip10_enabled,
        }
    }

    pub fn from_transaction_input(
        tx: &'a T,
        input: &'a TransactionInput,
        input_idx: usize,
        utxo_entry: &'a UtxoEntry,
        reused_values: &'a Reused,
        sig_cache: &'a SigCache,
        kip10_enabled: bool,
    ) -> Result<Self, TxScriptError> {
        // The script public key in P2SH is just validating the hash on the redeem
        // script the spender provides
        let is_p2sh = ScriptClass::is_pay_to_script_hash(utxo_entry.script_public_key.script());
        match input_idx < tx.tx().inputs.len() {
            true => Ok(Self {
                dstack: Default::default(),
                astack: Default::default(),
                script_source: ScriptSource::TxInput { tx, input, id: input_idx, utxo_entry, is_p2sh },
                reused_values,
                sig_cache,
                cond_stack: Default::default(),
                num_ops: 0,
                kip10_enabled,
            }),
            false => Err(TxScriptError::InvalidInputIndex(input_idx as i32, tx.tx().inputs.len())),
        }
    }

    pub fn from_script(
        script: &'a [u8],
        reused_values: &'a Reused,
        sig_cache: &'a SigCache,
        kip10_enabled: bool,
    ) -> Self {
        Self {
            dstack: Default::default(),
            astack: Default::default(),
            script_source: ScriptSource::StandAloneScripts(vec![script]),
            reused_values,
            sig_cache,
            cond_stack: Default::default(),
            num_ops: 0,
            kip10_enabled,
        }
    }

    #[inline]
    pub fn is_executing(&self) -> bool {
        self.cond_stack.is_empty() || *self.cond_stack.last().expect("checked not empty") == OpCond::True
    }

    fn execute_opcode(&mut self, opcode: Box<dyn OpCodeImplementation<T, Reused>>) -> Result<(), TxScriptError> {
        // Different from kaspad: illegal and disabled opcodes are checked on execution instead
        // of during parsing. A disabled opcode fails even inside a non-executed branch.
        if opcode.is_disabled() {
            return Err(TxScriptError::OpcodeDisabled(format!("{opcode:?}")));
        }
        if opcode.always_illegal() {
            return Err(TxScriptError::OpcodeReserved(format!("{opcode:?}")));
        }
        // Note that this includes OP_RESERVED which counts as a push operation.
        if opcode.value() > NO_COST_OPCODE {
            self.num_ops += 1;
            if self.num_ops > MAX_OPS_PER_SCRIPT {
                return Err(TxScriptError::TooManyOperations(MAX_OPS_PER_SCRIPT));
            }
        } else if opcode.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(TxScriptError::ElementTooBig(opcode.len(), MAX_SCRIPT_ELEMENT_SIZE));
        }

        if self.is_executing() || opcode.is_conditional() {
            if opcode.value() > 0 && opcode.value() <= codes::OpPushData4 {
                opcode.check_minimal_data_push()?;
            }
            opcode.execute(self)
        } else {
            Ok(())
        }
    }

    fn execute_script(&mut self, script: &[u8], verify_only_push: bool) -> Result<(), TxScriptError> {
        let script_result = script
            .iter()
            .batching(|it| {
                // reads the opcode num item here and then match to opcode
                it.next().map(|code| deserialize_next_opcode(*code, it))
            })
            .try_for_each(|opcode| {
                let opcode = opcode?;
                if verify_only_push && !opcode.is_push_opcode() {
                    return Err(TxScriptError::SignatureScriptNotPushOnly);
                }
                self.execute_opcode(opcode)?;

                let combined_size = self.astack.len() + self.dstack.len();
                if combined_size > MAX_STACK_SIZE {
                    return Err(TxScriptError::StackSizeExceeded(combined_size, MAX_STACK_SIZE));
                }
                Ok(())
            });

        // A script must not end inside an open conditional block
        if script_result.is_ok() && !self.cond_stack.is_empty() {
            return Err(TxScriptError::ErrUnbalancedConditional);
        }

        // Moving between scripts - the alt stack doesn't persist
        self.astack.clear();
        self.num_ops = 0; // number of ops is per script.

        script_result
    }

    pub fn execute(&mut self) -> Result<(), TxScriptError> {
        let (scripts, is_p2sh) = match &self.script_source {
            ScriptSource::TxInput { input, utxo_entry, is_p2sh, .. } => {
                if utxo_entry.script_public_key.version() > MAX_SCRIPT_PUBLIC_KEY_VERSION {
                    warn!("The version of the scriptPublicKey is higher than the known version - the Execute function returns true.");
                    return Ok(());
                }
                (vec![input.signature_script.as_slice(), utxo_entry.script_public_key.script()], *is_p2sh)
            }
            ScriptSource::StandAloneScripts(scripts) => (scripts.clone(), false),
        };

        // When both the signature script and public key script are empty the
        // result is necessarily an error since the stack would end up being
        // empty which is equivalent to a false top element. Thus, just return
        // the relevant error now as an optimization.
        if scripts.is_empty() {
            return Err(TxScriptError::NoScripts);
        }

        if scripts.iter().all(|e| e.is_empty()) {
            return Err(TxScriptError::EvalFalse);
        }
        if let Some(s) = scripts.iter().find(|e| e.len() > MAX_SCRIPTS_SIZE) {
            return Err(TxScriptError::ScriptSize(s.len(), MAX_SCRIPTS_SIZE));
        }

        let mut saved_stack: Option<Vec<Vec<u8>>> = None;
        // try_for_each quits only if an error occurred. So, we always run over all scripts if
        // each is successful
        scripts.iter().enumerate().filter(|(_, s)| !s.is_empty()).try_for_each(|(idx, s)| {
            // The signature script of a transaction input must hold nothing but pushes
            let verify_only_push = idx == 0 && matches!(self.script_source, ScriptSource::TxInput { .. });
            // Save script in p2sh
            if is_p2sh && idx == 1 {
                saved_stack = Some(self.dstack.clone());
            }
            self.execute_script(s, verify_only_push)
        })?;

        if is_p2sh {
            self.check_error_condition(false)?;
            self.dstack = saved_stack.ok_or(TxScriptError::EmptyStack)?;
            let script = self.dstack.pop().ok_or(TxScriptError::EmptyStack)?;
            self.execute_script(script.as_slice(), false)?
        }

        self.check_error_condition(true)
    }

    // check_error_condition is called whenever we finish a chunk of the scripts
    // (all original scripts, all scripts including p2sh, and maybe future extensions)
    // returns Ok(()) if the running script has ended and was successful, leaving a true boolean
    // on the stack. An error otherwise.
    #[inline]
    fn check_error_condition(&mut self, final_script: bool) -> Result<(), TxScriptError> {
        if final_script {
            if self.dstack.len() > 1 {
                return Err(TxScriptError::CleanStack(self.dstack.len() - 1));
            } else if self.dstack.is_empty() {
                return Err(TxScriptError::EmptyStack);
            }
        }

        let [v]: [bool; 1] = self.dstack.pop_items()?;
        match v {
            true => Ok(()),
            false => Err(TxScriptError::EvalFalse),
        }
    }

    // *** SIGNATURE SPECIFIC CODE ***

    fn check_pub_key_encoding(pub_key: &[u8]) -> Result<(), TxScriptError> {
        match pub_key.len() {
            32 => Ok(()),
            _ => Err(TxScriptError::PubKeyFormat),
        }
    }

    fn check_pub_key_encoding_ecdsa(pub_key: &[u8]) -> Result<(), TxScriptError> {
        match pub_key.len() {
            33 => Ok(()),
            _ => Err(TxScriptError::PubKeyFormat),
        }
    }

    #[inline]
    fn check_schnorr_signature(&mut self, hash_type: SigHashType, key: &[u8], sig: &[u8]) -> Result<bool, TxScriptError> {
        match self.script_source {
            ScriptSource::TxInput { tx, id, .. } => {
                if sig.len() != 64 {
                    return Err(TxScriptError::SigLength(sig.len()));
                }
                Self::check_pub_key_encoding(key)?;
                let pk = secp256k1::XOnlyPublicKey::from_slice(key).map_err(TxScriptError::InvalidSignature)?;
                let sig = secp256k1::schnorr::Signature::from_slice(sig).map_err(TxScriptError::InvalidSignature)?;
                let sig_hash = calc_schnorr_signature_hash(tx, id, hash_type, self.reused_values);
                let msg = secp256k1::Message::from_digest_slice(sig_hash.as_bytes().as_slice()).unwrap();
                let sig_cache_key =
                    SigCacheKey { signature: Signature::Schnorr(sig), pub_key: PublicKey::Schnorr(pk), message: msg };

                match self.sig_cache.get(&sig_cache_key) {
                    Some(valid) => Ok(valid),
                    None => match sig.verify(&msg, &pk) {
                        Ok(()) => {
                            self.sig_cache.insert(sig_cache_key, true);
                            Ok(true)
                        }
                        Err(_) => {
                            self.sig_cache.insert(sig_cache_key, false);
                            Ok(false)
                        }
                    },
                }
            }
            _ => Err(TxScriptError::NotATransactionInput),
        }
    }

    fn check_ecdsa_signature(&mut self, hash_type: SigHashType, key: &[u8], sig: &[u8]) -> Result<bool, TxScriptError> {
        match self.script_source {
            ScriptSource::TxInput { tx, id, .. } => {
                if sig.len() != 64 {
                    return Err(TxScriptError::SigLength(sig.len()));
                }
                Self::check_pub_key_encoding_ecdsa(key)?;
                let pk = secp256k1::PublicKey::from_slice(key).map_err(TxScriptError::InvalidSignature)?;
                let sig = secp256k1::ecdsa::Signature::from_compact(sig).map_err(TxScriptError::InvalidSignature)?;
                let sig_hash = calc_ecdsa_signature_hash(tx, id, hash_type, self.reused_values);
                let msg = secp256k1::Message::from_digest_slice(sig_hash.as_bytes().as_slice()).unwrap();
                let sig_cache_key = SigCacheKey { signature: Signature::Ecdsa(sig), pub_key: PublicKey::Ecdsa(pk), message: msg };

                match self.sig_cache.get(&sig_cache_key) {
                    Some(valid) => Ok(valid),
                    None => match sig.verify(&msg, &pk) {
                        Ok(()) => {
                            self.sig_cache.insert(sig_cache_key, true);
                            Ok(true)
                        }
                        Err(_) => {
                            self.sig_cache.insert(sig_cache_key, false);
                            Ok(false)
                        }
                    },
                }
            }
            _ => Err(TxScriptError::NotATransactionInput),
        }
    }

    pub(crate) fn op_check_multisig_schnorr_or_ecdsa(&mut self, ecdsa: bool) -> Result<(), TxScriptError> {
        let [num_keys]: [i32; 1] = self.dstack.pop_items()?;
        if num_keys < 0 {
            return Err(TxScriptError::InvalidPubKeyCount(format!("number of pubkeys {num_keys} is negative")));
        } else if num_keys > MAX_PUB_KEYS_PER_MULTISIG {
            return Err(TxScriptError::InvalidPubKeyCount(format!("too many pubkeys {num_keys} > {MAX_PUB_KEYS_PER_MULTISIG}")));
        }
        let num_keys_usize = num_keys as usize;

        // Every candidate key counts towards the per-script operation ceiling
        self.num_ops += num_keys;
        if self.num_ops > MAX_OPS_PER_SCRIPT {
            return Err(TxScriptError::TooManyOperations(MAX_OPS_PER_SCRIPT));
        }

        if self.dstack.len() < num_keys_usize {
            return Err(TxScriptError::InvalidStackOperation(num_keys_usize, self.dstack.len()));
        }
        let pub_keys = self.dstack.split_off(self.dstack.len() - num_keys_usize);

        let [num_sigs]: [i32; 1] = self.dstack.pop_items()?;
        if num_sigs < 0 {
            return Err(TxScriptError::InvalidSignatureCount(format!("number of signatures {num_sigs} is negative")));
        } else if num_sigs > num_keys {
            return Err(TxScriptError::InvalidSignatureCount(format!("more signatures than pubkeys {num_sigs} > {num_keys}")));
        }
        let num_sigs = num_sigs as usize;

        if self.dstack.len() < num_sigs {
            return Err(TxScriptError::InvalidStackOperation(num_sigs, self.dstack.len()));
        }
        let signatures = self.dstack.split_off(self.dstack.len() - num_sigs);

        let mut failed = false;
        let mut pub_key_iter = pub_keys.iter();
        'outer: for (i, signature) in signatures.iter().enumerate() {
            if signature.is_empty() {
                failed = true;
                break 'outer;
            }
            let typ = *signature.last().expect("checked that the signature is not empty");
            let signature = &signature[..signature.len() - 1];
            let hash_type = SigHashType::from_u8(typ).map_err(|_| TxScriptError::InvalidSigHashType(typ))?;

            // Advance through the pubkeys, trying to match the current signature. Signatures
            // must match pubkeys in order and without replay, so running out of keys for the
            // remaining signatures is terminal.
            loop {
                let unverified_sigs = num_sigs - i;
                if pub_key_iter.len() < unverified_sigs {
                    failed = true;
                    break 'outer;
                }
                let pub_key = pub_key_iter.next().expect("the iterator length was checked above");
                let valid = match ecdsa {
                    true => self.check_ecdsa_signature(hash_type, pub_key.as_slice(), signature)?,
                    false => self.check_schnorr_signature(hash_type, pub_key.as_slice(), signature)?,
                };
                if valid {
                    continue 'outer;
                }
            }
        }

        if failed {
            // On failure, every provided signature slot must have been empty
            return match signatures.iter().all(|signature| signature.is_empty()) {
                true => {
                    self.dstack.push_item(false);
                    Ok(())
                }
                false => Err(TxScriptError::NullFail),
            };
        }

        self.dstack.push_item(true);
        Ok(())
    }
}

/// Returns an iterator over the decoded opcodes of the script. Errors are yielded
/// in place, so decoding stops being meaningful at the first yielded error.
pub fn parse_script<T: VerifiableTransaction, Reused: SigHashReusedValues>(
    script: &[u8],
) -> impl Iterator<Item = Result<Box<dyn OpCodeImplementation<T, Reused>>, TxScriptError>> + '_ {
    script.iter().batching(|it| it.next().map(|code| deserialize_next_opcode(*code, it)))
}

/// Counts the potential signature operations of `script_public_key` when spent by
/// `signature_script`, without executing anything. For P2SH the count descends into
/// the redeem script, which is the last push of a push-only signature script.
pub fn get_sig_op_count<T: VerifiableTransaction, Reused: SigHashReusedValues>(
    signature_script: &[u8],
    prev_script_public_key: &ScriptPublicKey,
) -> u64 {
    let is_p2sh = ScriptClass::is_pay_to_script_hash(prev_script_public_key.script());
    let script_pub_key_ops = parse_script::<T, Reused>(prev_script_public_key.script()).collect_vec();
    if !is_p2sh {
        return get_sig_op_count_by_opcodes(&script_pub_key_ops);
    }

    let signature_script_ops = parse_script::<T, Reused>(signature_script).collect_vec();
    if signature_script_ops.is_empty() || signature_script_ops.iter().any(|op| op.is_err() || !op.as_ref().unwrap().is_push_opcode())
    {
        return 0;
    }

    let p2sh_script = signature_script_ops.last().expect("checked if empty").as_ref().expect("checked if err").get_data();
    let p2sh_ops = parse_script::<T, Reused>(p2sh_script).collect_vec();
    get_sig_op_count_by_opcodes(&p2sh_ops)
}

fn get_sig_op_count_by_opcodes<T: VerifiableTransaction, Reused: SigHashReusedValues>(
    opcodes: &[Result<Box<dyn OpCodeImplementation<T, Reused>>, TxScriptError>],
) -> u64 {
    let mut num_sigs: u64 = 0;
    for (i, op) in opcodes.iter().enumerate() {
        match op {
            Ok(op) => {
                match op.value() {
                    codes::OpCheckSig | codes::OpCheckSigVerify | codes::OpCheckSigECDSA => num_sigs += 1,
                    codes::OpCheckMultiSig | codes::OpCheckMultiSigVerify | codes::OpCheckMultiSigECDSA => {
                        // A standard (schnorr) multisig script declares its signer count;
                        // extract it when the script parses as one
                        if let Ok(params) = get_multisig_params(opcodes, i) {
                            num_sigs += params.signers_count as u64;
                            continue;
                        }
                        // Otherwise charge the preceding small-integer push, or the
                        // maximum when there is none
                        let prev_opcode = i.checked_sub(1).map(|prev| opcodes[prev].as_ref().expect("earlier opcodes were checked above"));
                        match prev_opcode {
                            Some(prev_opcode) if (codes::OpTrue..=codes::Op16).contains(&prev_opcode.value()) => {
                                num_sigs += to_small_int(prev_opcode) as u64;
                            }
                            _ => num_sigs += MAX_PUB_KEYS_PER_MULTISIG as u64,
                        }
                    }
                    _ => {} // If the opcode is not a sigop, no need to increase the count
                }
            }
            Err(_) => return num_sigs,
        }
    }
    num_sigs
}

/// Returns whether the passed public key script is unspendable, or guaranteed to fail at execution.
///
/// This allows outputs to be pruned instantly when entering the UTXO set.
pub fn is_unspendable<T: VerifiableTransaction, Reused: SigHashReusedValues>(script: &[u8]) -> bool {
    parse_script::<T, Reused>(script).nth(0).is_some_and(|opcode| opcode.is_ok_and(|opcode| opcode.value() == codes::OpReturn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::codes::*;
    use crate::script_builder::ScriptBuilder;
    use kaspa_sdk_consensus_core::hashing::sighash::SigHashReusedValuesUnsync;
    use kaspa_sdk_consensus_core::hashing::sighash_type::SIG_HASH_ALL;
    use kaspa_sdk_consensus_core::sign::sign_input;
    use kaspa_sdk_consensus_core::subnets::SUBNETWORK_ID_NATIVE;
    use kaspa_sdk_consensus_core::tx::{
        PopulatedTransaction, ScriptPublicKey, Transaction, TransactionId, TransactionOutpoint, TransactionOutput,
    };
    use std::str::FromStr;

    struct ScriptTestCase {
        script: &'static [u8],
        expected_result: Result<(), TxScriptError>,
    }

    struct KeyTestCase {
        name: &'static str,
        key: &'static [u8],
        is_valid: bool,
    }

    fn run_test_script_cases(test_cases: Vec<ScriptTestCase>) {
        let sig_cache = SigCache::new(10_000);
        let reused_values = SigHashReusedValuesUnsync::new();

        for test in test_cases {
            // Ensure encapsulation of variables (no leaking between tests)
            let input = TransactionInput {
                previous_outpoint: TransactionOutpoint {
                    transaction_id: TransactionId::from_slice(&[
                        0xc9, 0x97, 0xa5, 0xe5, 0x6e, 0x10, 0x41, 0x02, 0xfa, 0x20, 0x9c, 0x6a, 0x85, 0x2d, 0xd9, 0x06, 0x60, 0xa2,
                        0x0b, 0x2d, 0x9c, 0x35, 0x24, 0x23, 0xed, 0xce, 0x25, 0x85, 0x7f, 0xcd, 0x37, 0x04,
                    ]),
                    index: 0,
                },
                signature_script: vec![],
                sequence: 4294967295,
                sig_op_count: 0,
            };
            let output = TransactionOutput { value: 1000000000, script_public_key: ScriptPublicKey::new(0, test.script.into()) };

            let tx = Transaction::new(1, vec![input.clone()], vec![output.clone()], 0, SUBNETWORK_ID_NATIVE, 0, vec![]);
            let utxo_entry = UtxoEntry::new(output.value, output.script_public_key.clone(), 0, tx.is_coinbase());

            let populated_tx = PopulatedTransaction::new(&tx, vec![utxo_entry.clone()]);

            let mut vm =
                TxScriptEngine::from_transaction_input(&populated_tx, &input, 0, &utxo_entry, &reused_values, &sig_cache, false)
                    .expect("Script creation failed");
            assert_eq!(vm.execute(), test.expected_result);
        }
    }

    #[test]
    fn test_check_error_condition() {
        let test_cases = vec![
            ScriptTestCase {
                script: b"\x51", // OpTrue
                expected_result: Ok(()),
            },
            ScriptTestCase {
                script: b"\x61", // OpNop
                expected_result: Err(TxScriptError::EmptyStack),
            },
            ScriptTestCase {
                script: b"\x51\x51", // OpTrue, OpTrue
                expected_result: Err(TxScriptError::CleanStack(1)),
            },
            ScriptTestCase {
                script: b"\x00", // OpFalse
                expected_result: Err(TxScriptError::EvalFalse),
            },
        ];

        run_test_script_cases(test_cases)
    }

    #[test]
    fn test_if_strict_boolean() {
        let test_cases = vec![
            ScriptTestCase {
                script: b"\x51\x63\x51\x68", // OpTrue OpIf OpTrue OpEndIf
                expected_result: Ok(()),
            },
            ScriptTestCase {
                script: b"\x00\x63\x51\x67\x00\x68", // OpFalse OpIf OpTrue OpElse OpFalse OpEndIf
                expected_result: Err(TxScriptError::EvalFalse),
            },
            ScriptTestCase {
                script: b"\x52\x63\x51\x68", // Op2 OpIf - a condition byte other than 0/1 is rejected
                expected_result: Err(TxScriptError::InvalidState("expected boolean".to_string())),
            },
            ScriptTestCase {
                script: b"\x51\x63\x51", // OpTrue OpIf OpTrue - missing OpEndIf
                expected_result: Err(TxScriptError::ErrUnbalancedConditional),
            },
        ];

        run_test_script_cases(test_cases)
    }

    #[test]
    fn test_check_pub_key_encode() {
        let test_cases = vec![
            KeyTestCase {
                name: "uncompressed - invalid",
                key: &[
                    0x04u8, 0x11, 0xdb, 0x93, 0xe1, 0xdc, 0xdb, 0x8a, 0x01, 0x6b, 0x49, 0x84, 0x0f, 0x8c, 0x53, 0xbc, 0x1e, 0xb6,
                    0x8a, 0x38, 0x2e, 0x97, 0xb1, 0x48, 0x2e, 0xca, 0xd7, 0xb1, 0x48, 0xa6, 0x90, 0x9a, 0x5c, 0xb2, 0xe0, 0xea, 0xdd,
                    0xfb, 0x84, 0xcc, 0xf9, 0x74, 0x44, 0x64, 0xf8, 0x2e, 0x16, 0x0b, 0xfa, 0x9b, 0x8b, 0x64, 0xf9, 0xd4, 0xc0, 0x3f,
                    0x99, 0x9b, 0x86, 0x43, 0xf6, 0x56, 0xb4, 0x12, 0xa3,
                ],
                is_valid: false,
            },
            KeyTestCase {
                name: "compressed - invalid",
                key: &[
                    0x02, 0xce, 0x0b, 0x14, 0xfb, 0x84, 0x2b, 0x1b, 0xa5, 0x49, 0xfd, 0xd6, 0x75, 0xc9, 0x80, 0x75, 0xf1, 0x2e, 0x9c,
                    0x51, 0x0f, 0x8e, 0xf5, 0x2b, 0xd0, 0x21, 0xa9, 0xa1, 0xf4, 0x80, 0x9d, 0x3b, 0x4d,
                ],
                is_valid: false,
            },
            KeyTestCase {
                name: "32 bytes pubkey - Ok",
                key: &[
                    0x26, 0x89, 0xc7, 0xc2, 0xda, 0xb1, 0x33, 0x09, 0xfb, 0x14, 0x3e, 0x0e, 0x8f, 0xe3, 0x96, 0x34, 0x25, 0x21, 0x88,
                    0x7e, 0x97, 0x66, 0x90, 0xb6, 0xb4, 0x7f, 0x5b, 0x2a, 0x4b, 0x7d, 0x44, 0x8e,
                ],
                is_valid: true,
            },
            KeyTestCase { name: "empty", key: &[], is_valid: false },
        ];

        for test in test_cases {
            let check = TxScriptEngine::<PopulatedTransaction, SigHashReusedValuesUnsync>::check_pub_key_encoding(test.key);
            if test.is_valid {
                assert_eq!(
                    check,
                    Ok(()),
                    "checkSignatureLength test '{}' failed when it should have succeeded: {:?}",
                    test.name,
                    check
                )
            } else {
                assert_eq!(
                    check,
                    Err(TxScriptError::PubKeyFormat),
                    "checkSignatureEncoding test '{}' succeeded or failed on wrong format ({:?})",
                    test.name,
                    check
                )
            }
        }
    }

    #[test]
    fn test_p2pk_end_to_end() {
        let secp = secp256k1::Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut secp256k1::rand::thread_rng());
        let (xonly, _) = public_key.x_only_public_key();

        let script_public_key = ScriptPublicKey::new(
            0,
            std::iter::once(OpData32).chain(xonly.serialize()).chain(std::iter::once(OpCheckSig)).collect(),
        );

        let prev_tx_id = TransactionId::from_str("880eb9819a31821d9d2399e2f35e2433b72637e393d71ecc9b8d0250f49153c3").unwrap();
        let mut tx = Transaction::new(
            0,
            vec![TransactionInput {
                previous_outpoint: TransactionOutpoint { transaction_id: prev_tx_id, index: 0 },
                signature_script: vec![],
                sequence: 0,
                sig_op_count: 1,
            }],
            vec![TransactionOutput { value: 100, script_public_key: script_public_key.clone() }],
            0,
            SUBNETWORK_ID_NATIVE,
            0,
            vec![],
        );

        let utxo_entry = UtxoEntry::new(200, script_public_key, 0, false);

        // Sign input 0 and embed the signature script
        {
            let populated = PopulatedTransaction::new(&tx, vec![utxo_entry.clone()]);
            let signature_script = sign_input(&populated, 0, &secret_key.secret_bytes(), SIG_HASH_ALL);
            tx.inputs[0].signature_script = signature_script;
        }

        let populated = PopulatedTransaction::new(&tx, vec![utxo_entry.clone()]);
        let sig_cache = SigCache::new(10_000);
        let reused_values = SigHashReusedValuesUnsync::new();
        let mut vm = TxScriptEngine::from_transaction_input(
            &populated,
            &populated.tx.inputs[0],
            0,
            &utxo_entry,
            &reused_values,
            &sig_cache,
            false,
        )
        .expect("Script creation failed");
        assert_eq!(vm.execute(), Ok(()));

        // Flipping the sighash type byte invalidates the signature
        let mut bad_tx = tx.clone();
        *bad_tx.inputs[0].signature_script.last_mut().unwrap() = SIG_HASH_ALL.to_u8() | 0x80;
        bad_tx.finalize();
        let populated = PopulatedTransaction::new(&bad_tx, vec![utxo_entry.clone()]);
        let mut vm = TxScriptEngine::from_transaction_input(
            &populated,
            &populated.tx.inputs[0],
            0,
            &utxo_entry,
            &reused_values,
            &sig_cache,
            false,
        )
        .expect("Script creation failed");
        assert_eq!(vm.execute(), Err(TxScriptError::EvalFalse));
    }

    #[test]
    fn test_cltv() {
        let sig_cache = SigCache::new(10_000);
        let reused_values = SigHashReusedValuesUnsync::new();

        struct CltvTest {
            name: &'static str,
            tx_lock_time: u64,
            sequence: u64,
            stack_lock_time: u64,
            should_pass: bool,
        }

        let tests = vec![
            CltvTest { name: "same DAA score", tx_lock_time: 100, sequence: 0, stack_lock_time: 100, should_pass: true },
            CltvTest { name: "stack below tx", tx_lock_time: 100, sequence: 0, stack_lock_time: 99, should_pass: true },
            CltvTest { name: "stack above tx", tx_lock_time: 100, sequence: 0, stack_lock_time: 101, should_pass: false },
            CltvTest {
                name: "mismatched lock time types",
                tx_lock_time: 100,
                sequence: 0,
                stack_lock_time: 500_000_000_001,
                should_pass: false,
            },
            CltvTest {
                name: "finalized input",
                tx_lock_time: 100,
                sequence: MAX_TX_IN_SEQUENCE_NUM,
                stack_lock_time: 100,
                should_pass: false,
            },
        ];

        for test in tests {
            let mut script = ScriptBuilder::new();
            script.add_lock_time(test.stack_lock_time).unwrap();
            script.add_op(OpCheckLockTimeVerify).unwrap();
            script.add_op(OpTrue).unwrap();
            let script_public_key = ScriptPublicKey::from_vec(0, script.drain());

            let input = TransactionInput {
                previous_outpoint: TransactionOutpoint {
                    transaction_id: TransactionId::from_str("880eb9819a31821d9d2399e2f35e2433b72637e393d71ecc9b8d0250f49153c3")
                        .unwrap(),
                    index: 0,
                },
                signature_script: vec![],
                sequence: test.sequence,
                sig_op_count: 0,
            };
            let tx = Transaction::new(
                0,
                vec![input.clone()],
                vec![],
                test.tx_lock_time,
                SUBNETWORK_ID_NATIVE,
                0,
                vec![],
            );
            let utxo_entry = UtxoEntry::new(100, script_public_key, 0, false);
            let populated = PopulatedTransaction::new(&tx, vec![utxo_entry.clone()]);

            let mut vm =
                TxScriptEngine::from_transaction_input(&populated, &input, 0, &utxo_entry, &reused_values, &sig_cache, false)
                    .expect("Script creation failed");
            let result = vm.execute();
            if test.should_pass {
                assert_eq!(result, Ok(()), "{} failed", test.name);
            } else {
                assert!(matches!(result, Err(TxScriptError::UnsatisfiedLockTime(_))), "{} should have failed", test.name);
            }
        }
    }

    #[test]
    fn test_sig_op_count() {
        let pubkey = [1u8; 32];
        let p2pk: ScriptPublicKey =
            ScriptPublicKey::from_vec(0, std::iter::once(OpData32).chain(pubkey).chain(std::iter::once(OpCheckSig)).collect());
        assert_eq!(get_sig_op_count::<PopulatedTransaction, SigHashReusedValuesUnsync>(&[], &p2pk), 1);

        // Two checksigs and a 2-key multisig preceded by Op2
        let script = ScriptBuilder::new()
            .add_op(OpCheckSig)
            .unwrap()
            .add_op(OpCheckSigVerify)
            .unwrap()
            .add_op(Op2)
            .unwrap()
            .add_op(OpCheckMultiSig)
            .unwrap()
            .drain();
        let spk = ScriptPublicKey::from_vec(0, script);
        assert_eq!(get_sig_op_count::<PopulatedTransaction, SigHashReusedValuesUnsync>(&[], &spk), 1 + 1 + 2);

        // Multisig without a preceding small int counts as the maximum
        let script = ScriptBuilder::new().add_data(&[1, 2, 3]).unwrap().add_op(OpCheckMultiSigECDSA).unwrap().drain();
        let spk = ScriptPublicKey::from_vec(0, script);
        assert_eq!(
            get_sig_op_count::<PopulatedTransaction, SigHashReusedValuesUnsync>(&[], &spk),
            MAX_PUB_KEYS_PER_MULTISIG as u64
        );

        // P2SH: the count descends into the redeem script taken from the signature script
        let redeem_script = ScriptBuilder::new()
            .add_op(Op2)
            .unwrap()
            .add_data(&[1u8; 32])
            .unwrap()
            .add_data(&[2u8; 32])
            .unwrap()
            .add_op(Op2)
            .unwrap()
            .add_op(OpCheckMultiSig)
            .unwrap()
            .drain();
        let p2sh = pay_to_script_hash_script(&redeem_script);
        let signature_script = ScriptBuilder::new().add_data(&redeem_script).unwrap().drain();
        assert_eq!(get_sig_op_count::<PopulatedTransaction, SigHashReusedValuesUnsync>(&signature_script, &p2sh), 2);

        // A non push-only signature script on P2SH yields zero
        let non_push = ScriptBuilder::new().add_op(OpTrue).unwrap().add_op(OpNop).unwrap().drain();
        assert_eq!(get_sig_op_count::<PopulatedTransaction, SigHashReusedValuesUnsync>(&non_push, &p2sh), 0);
    }

    #[test]
    fn test_is_unspendable() {
        assert!(is_unspendable::<PopulatedTransaction, SigHashReusedValuesUnsync>(&[OpReturn]));
        assert!(is_unspendable::<PopulatedTransaction, SigHashReusedValuesUnsync>(&[OpReturn, OpTrue]));
        assert!(!is_unspendable::<PopulatedTransaction, SigHashReusedValuesUnsync>(&[OpTrue]));
        assert!(!is_unspendable::<PopulatedTransaction, SigHashReusedValuesUnsync>(&[]));
    }
}
