//! Schnorr signing helpers for [`SignableTransaction`]s, matching inputs
//! against the script public keys of their UTXO entries.

use crate::{
    hashing::sighash::{calc_schnorr_signature_hash, SigHashReusedValuesUnsync},
    hashing::sighash_type::{SigHashType, SIG_HASH_ALL},
    tx::{SignableTransaction, VerifiableTransaction},
};
use kaspa_sdk_hashes::Hash;
use std::collections::BTreeMap;
use std::iter::once;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error("Secp256k1 -> {0}")]
    Secp256k1Error(#[from] secp256k1::Error),

    #[error("The transaction is partially signed")]
    PartiallySigned,

    #[error("The transaction is fully signed")]
    FullySigned,
}

/// The outcome of a signing pass: either every input carries a signature
/// script, or some inputs are still waiting for keys the pass did not have.
pub enum Signed {
    Fully(SignableTransaction),
    Partially(SignableTransaction),
}

impl Signed {
    /// Returns the transaction if it is fully signed, otherwise returns an error
    pub fn fully_signed(self) -> std::result::Result<SignableTransaction, Error> {
        match self {
            Signed::Fully(tx) => Ok(tx),
            Signed::Partially(_) => Err(Error::PartiallySigned),
        }
    }

    /// Returns the transaction if it is partially signed, otherwise fail with an error
    pub fn partially_signed(self) -> std::result::Result<SignableTransaction, Error> {
        match self {
            Signed::Fully(_) => Err(Error::FullySigned),
            Signed::Partially(tx) => Ok(tx),
        }
    }

    /// Returns the transaction regardless of whether it is fully or partially signed
    pub fn unwrap(self) -> SignableTransaction {
        match self {
            Signed::Fully(tx) => tx,
            Signed::Partially(tx) => tx,
        }
    }
}

/// The signature script of a schnorr-signed input: an `OpData65` push of the
/// 64-byte signature followed by the sighash-type byte.
fn schnorr_signature_script(keypair: &secp256k1::Keypair, sig_hash: Hash, hash_type: SigHashType) -> Vec<u8> {
    let msg = secp256k1::Message::from_digest_slice(&sig_hash.as_bytes()).expect("the signing hash is 32 bytes");
    let signature = keypair.sign_schnorr(msg);
    once(65u8).chain(signature.as_ref().iter().copied()).chain(once(hash_type.to_u8())).collect()
}

fn keypair_from_bytes(privkey: &[u8; 32]) -> secp256k1::Keypair {
    secp256k1::Keypair::from_seckey_slice(secp256k1::SECP256K1, privkey).expect("a valid 32-byte private key")
}

/// Signs every input of the transaction with the given schnorr key using `SIG_HASH_ALL`.
pub fn sign(mut signable_tx: SignableTransaction, schnorr_key: secp256k1::Keypair) -> SignableTransaction {
    for input in signable_tx.tx.inputs.iter_mut() {
        input.sig_op_count = 1;
    }

    let reused_values = SigHashReusedValuesUnsync::new();
    for input_index in 0..signable_tx.tx.inputs.len() {
        let sig_hash = calc_schnorr_signature_hash(&signable_tx.as_verifiable(), input_index, SIG_HASH_ALL, &reused_values);
        signable_tx.tx.inputs[input_index].signature_script = schnorr_signature_script(&schnorr_key, sig_hash, SIG_HASH_ALL);
    }
    signable_tx
}

/// Signs the transaction inputs whose previous script public key consists of
/// the raw serialized public key of one of the given private keys. Inputs
/// without a matching key are left untouched.
pub fn sign_with_multiple(mut mutable_tx: SignableTransaction, privkeys: Vec<[u8; 32]>) -> SignableTransaction {
    let keys: BTreeMap<Vec<u8>, secp256k1::Keypair> = privkeys
        .iter()
        .map(|privkey| {
            let keypair = keypair_from_bytes(privkey);
            (keypair.public_key().serialize().to_vec(), keypair)
        })
        .collect();

    for input in mutable_tx.tx.inputs.iter_mut() {
        input.sig_op_count = 1;
    }

    let reused_values = SigHashReusedValuesUnsync::new();
    for input_index in 0..mutable_tx.tx.inputs.len() {
        let entry = mutable_tx.entries[input_index].as_ref().expect("the UTXO entries are populated");
        let script = entry.script_public_key.script().to_vec();
        if let Some(keypair) = keys.get(&script) {
            let sig_hash = calc_schnorr_signature_hash(&mutable_tx.as_verifiable(), input_index, SIG_HASH_ALL, &reused_values);
            mutable_tx.tx.inputs[input_index].signature_script = schnorr_signature_script(keypair, sig_hash, SIG_HASH_ALL);
        }
    }
    mutable_tx
}

/// Signs the transaction inputs whose previous script public key is the p2pk
/// script of one of the given private keys. Returns [`Signed::Partially`]
/// when some inputs remain unsigned.
#[allow(clippy::result_large_err)]
pub fn sign_with_multiple_v2(mut mutable_tx: SignableTransaction, privkeys: &[[u8; 32]]) -> Signed {
    let keys: BTreeMap<Vec<u8>, secp256k1::Keypair> = privkeys
        .iter()
        .map(|privkey| {
            let keypair = keypair_from_bytes(privkey);
            let (xonly, _) = keypair.public_key().x_only_public_key();
            // The p2pk script: OpData32 <pubkey> OpCheckSig
            let script = [&[0x20u8][..], &xonly.serialize(), &[0xacu8]].concat();
            (script, keypair)
        })
        .collect();

    let reused_values = SigHashReusedValuesUnsync::new();
    let mut additional_signatures_required = false;
    for input_index in 0..mutable_tx.tx.inputs.len() {
        let entry = mutable_tx.entries[input_index].as_ref().expect("the UTXO entries are populated");
        let script = entry.script_public_key.script().to_vec();
        match keys.get(&script) {
            Some(keypair) => {
                let sig_hash = calc_schnorr_signature_hash(&mutable_tx.as_verifiable(), input_index, SIG_HASH_ALL, &reused_values);
                mutable_tx.tx.inputs[input_index].signature_script = schnorr_signature_script(keypair, sig_hash, SIG_HASH_ALL);
            }
            None => additional_signatures_required = true,
        }
    }

    match additional_signatures_required {
        true => Signed::Partially(mutable_tx),
        false => Signed::Fully(mutable_tx),
    }
}

/// Signs a single transaction input with the given sighash type and returns
/// the resulting signature script.
pub fn sign_input(tx: &impl VerifiableTransaction, input_index: usize, private_key: &[u8; 32], hash_type: SigHashType) -> Vec<u8> {
    let keypair = keypair_from_bytes(private_key);
    let sig_hash = calc_schnorr_signature_hash(tx, input_index, hash_type, &SigHashReusedValuesUnsync::new());
    schnorr_signature_script(&keypair, sig_hash, hash_type)
}

/// Verifies the `SIG_HASH_ALL` schnorr signature of every populated input
/// against the public key embedded in its script public key.
pub fn verify(tx: &impl VerifiableTransaction) -> Result<(), Error> {
    let reused_values = SigHashReusedValuesUnsync::new();
    for (input_index, (input, entry)) in tx.populated_inputs().enumerate() {
        if input.signature_script.is_empty() {
            return Err(Error::Message(format!("Signature is empty for input: {input_index}")));
        }
        let pub_key = secp256k1::XOnlyPublicKey::from_slice(&entry.script_public_key.script()[1..33])?;
        let signature = secp256k1::schnorr::Signature::from_slice(&input.signature_script[1..65])?;
        let sig_hash = calc_schnorr_signature_hash(tx, input_index, SIG_HASH_ALL, &reused_values);
        let msg = secp256k1::Message::from_digest_slice(&sig_hash.as_bytes())?;
        signature.verify(&msg, &pub_key)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subnets::SUBNETWORK_ID_NATIVE;
    use crate::tx::*;
    use secp256k1::rand::thread_rng;
    use secp256k1::Keypair;
    use std::str::FromStr;

    fn p2pk_script(keypair: &Keypair) -> ScriptPublicKey {
        let (xonly, _) = keypair.public_key().x_only_public_key();
        ScriptPublicKey::from_vec(0, [&[0x20u8][..], &xonly.serialize(), &[0xacu8]].concat())
    }

    fn raw_pubkey_script(keypair: &Keypair) -> ScriptPublicKey {
        ScriptPublicKey::from_vec(0, keypair.public_key().serialize().to_vec())
    }

    fn transaction_with_entries(script_public_keys: Vec<ScriptPublicKey>) -> SignableTransaction {
        let prev_tx_id = TransactionId::from_str("880eb9819a31821d9d2399e2f35e2433b72637e393d71ecc9b8d0250f49153c3").unwrap();
        let inputs = (0..script_public_keys.len())
            .map(|index| TransactionInput::new(TransactionOutpoint::new(prev_tx_id, index as u32), vec![], index as u64, 1))
            .collect();
        let outputs = vec![TransactionOutput::new(300, script_public_keys[0].clone())];
        let tx = Transaction::new(0, inputs, outputs, 0, SUBNETWORK_ID_NATIVE, 0, vec![]);
        let entries = script_public_keys.into_iter().map(|script_public_key| UtxoEntry::new(500, script_public_key, 0, false)).collect();
        SignableTransaction::with_entries(tx, entries)
    }

    #[test]
    fn test_sign_with_multiple_and_verify() {
        let kp1 = Keypair::new(secp256k1::SECP256K1, &mut thread_rng());
        let kp2 = Keypair::new(secp256k1::SECP256K1, &mut thread_rng());

        let signable =
            transaction_with_entries(vec![raw_pubkey_script(&kp1), raw_pubkey_script(&kp1), raw_pubkey_script(&kp2)]);
        let signed = sign_with_multiple(signable, vec![kp1.secret_bytes(), kp2.secret_bytes()]);
        assert!(verify(&signed.as_verifiable()).is_ok());
    }

    #[test]
    fn test_sign_with_multiple_v2_partial() {
        let kp1 = Keypair::new(secp256k1::SECP256K1, &mut thread_rng());
        let kp2 = Keypair::new(secp256k1::SECP256K1, &mut thread_rng());
        let signable = transaction_with_entries(vec![p2pk_script(&kp1), p2pk_script(&kp2)]);

        // One key covers only one of the two inputs
        let partially = sign_with_multiple_v2(signable.clone(), &[kp1.secret_bytes()]);
        assert!(matches!(partially.fully_signed(), Err(Error::PartiallySigned)));

        // Both keys cover all inputs, and the result verifies
        let fully = sign_with_multiple_v2(signable, &[kp1.secret_bytes(), kp2.secret_bytes()])
            .fully_signed()
            .expect("all inputs are covered");
        assert!(verify(&fully.as_verifiable()).is_ok());
    }

    #[test]
    fn test_sign_input() {
        let keypair = Keypair::new(secp256k1::SECP256K1, &mut thread_rng());
        let mut signable = transaction_with_entries(vec![p2pk_script(&keypair)]);

        let signature_script = sign_input(&signable.as_verifiable(), 0, &keypair.secret_bytes(), SIG_HASH_ALL);
        assert_eq!(signature_script.len(), 66);
        signable.tx.inputs[0].signature_script = signature_script;
        assert!(verify(&signable.as_verifiable()).is_ok());
    }
}
