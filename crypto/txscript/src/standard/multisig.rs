use crate::opcodes::codes::{OpCheckMultiSig, OpCheckMultiSigECDSA};
use crate::opcodes::{codes, to_small_int, OpCodeImplementation};
use crate::script_builder::{ScriptBuilder, ScriptBuilderError};
use kaspa_sdk_addresses::{Address, Version};
use kaspa_sdk_consensus_core::hashing::sighash::SigHashReusedValues;
use kaspa_sdk_consensus_core::tx::VerifiableTransaction;
use kaspa_sdk_txscript_errors::TxScriptError;
use std::borrow::Borrow;
use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum Error {
    // ErrTooManyRequiredSigs is returned from multisig_redeem_script when the
    // specified number of required signatures is larger than the number of
    // provided public keys.
    #[error("too many required signatures")]
    ErrTooManyRequiredSigs,
    #[error(transparent)]
    ScriptBuilderError(#[from] ScriptBuilderError),
    #[error("public key address version should be the same for all provided keys")]
    WrongVersion,
    #[error("provided public keys should not be empty")]
    EmptyKeys,
}

/// Generates a multi-signature redeem script requiring `required` out of the
/// already sorted `pub_keys`:
///
/// ```text
/// OP_m <pubkey1> ... <pubkeyn> OP_n OP_CHECKMULTISIG
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// * The number of provided keys is less than `required`.
/// * The public keys do not share a single pubkey address version.
/// * There are no public keys provided.
pub fn multisig_redeem_script_sorted(
    pub_keys: impl Iterator<Item = impl Borrow<Address>>,
    required: usize,
) -> Result<Vec<u8>, Error> {
    let mut builder = ScriptBuilder::new();
    builder.add_i64(required as i64)?;

    let mut version: Option<Version> = None;
    let mut count = 0usize;
    for pub_key in pub_keys {
        let pub_key = pub_key.borrow();
        match (pub_key.version, version) {
            (Version::ScriptHash, _) => return Err(Error::WrongVersion),
            (v, None) => version = Some(v),
            (v, Some(expected)) if v != expected => return Err(Error::WrongVersion),
            _ => {}
        }
        builder.add_data(pub_key.payload.as_slice())?;
        count += 1;
    }

    let Some(version) = version else {
        return Err(Error::EmptyKeys);
    };
    if count < required {
        return Err(Error::ErrTooManyRequiredSigs);
    }

    builder.add_i64(count as i64)?;
    builder.add_op(match version {
        Version::PubKeyECDSA => OpCheckMultiSigECDSA,
        _ => OpCheckMultiSig,
    })?;

    Ok(builder.drain())
}

/// Sorts the provided public keys and then constructs a redeem script
/// requiring `required` out of them. See [`multisig_redeem_script_sorted`].
pub fn multisig_redeem_script(pub_keys: &mut [Address], required: usize) -> Result<Vec<u8>, Error> {
    pub_keys.sort();
    multisig_redeem_script_sorted(pub_keys.iter(), required)
}

/// The parameters extracted from a standard (schnorr) multisig script.
#[derive(Debug)]
pub struct MultiSigScriptParameters {
    pub required_signatures_count: u8,
    pub signers_count: u8,
    pub signers_pubkey: Vec<secp256k1::XOnlyPublicKey>,
}

/// Extracts the parameters of a standard multisig script (schnorr) from its
/// decoded opcodes, given the position of the `OP_CHECKMULTISIG` opcode.
/// Fails when the opcodes leading up to `checkmultisig_index` do not form
/// `OP_m <pubkey1> ... <pubkeyn> OP_n`.
pub fn get_multisig_params<T: VerifiableTransaction, Reused: SigHashReusedValues>(
    opcodes: &[Result<Box<dyn OpCodeImplementation<T, Reused>>, TxScriptError>],
    checkmultisig_index: usize,
) -> Result<MultiSigScriptParameters, TxScriptError> {
    let opcode_at = |index: Option<usize>| {
        index
            .and_then(|index| opcodes.get(index))
            .and_then(|opcode| opcode.as_ref().ok())
            .ok_or_else(|| TxScriptError::InvalidState("multisig script index out of bounds".to_string()))
    };

    let op_n = opcode_at(checkmultisig_index.checked_sub(1))?;
    let signers_count = read_small_int(op_n)
        .ok_or_else(|| TxScriptError::InvalidPubKeyCount("expected a small integer signers count".to_string()))?;
    if signers_count == 0 {
        return Err(TxScriptError::InvalidPubKeyCount("a multisig script requires at least one signer".to_string()));
    }

    let pubkeys_end = checkmultisig_index - 1;
    let pubkeys_start = pubkeys_end
        .checked_sub(signers_count as usize)
        .ok_or_else(|| TxScriptError::InvalidState("multisig script index out of bounds".to_string()))?;

    let mut signers_pubkey = Vec::with_capacity(signers_count as usize);
    for index in pubkeys_start..pubkeys_end {
        let opcode = opcode_at(Some(index))?;
        if !opcode.is_push_opcode() {
            return Err(TxScriptError::InvalidOpcode("expected a pubkey push".to_string()));
        }
        signers_pubkey.push(secp256k1::XOnlyPublicKey::from_slice(opcode.get_data()).map_err(|_| TxScriptError::PubKeyFormat)?);
    }

    let op_m = opcode_at(pubkeys_start.checked_sub(1))?;
    let required_signatures_count = read_small_int(op_m)
        .ok_or_else(|| TxScriptError::InvalidSignatureCount("expected a small integer required signatures count".to_string()))?;
    if required_signatures_count > signers_count {
        return Err(TxScriptError::InvalidSignatureCount("m must be <= n".to_string()));
    }

    Ok(MultiSigScriptParameters { required_signatures_count, signers_count, signers_pubkey })
}

#[allow(clippy::borrowed_box)]
fn read_small_int<T: VerifiableTransaction, Reused: SigHashReusedValues>(
    opcode: &Box<dyn OpCodeImplementation<T, Reused>>,
) -> Option<u8> {
    let value = opcode.value();
    (value == codes::OpFalse || (codes::OpTrue..=codes::Op16).contains(&value)).then(|| to_small_int(opcode))
}
