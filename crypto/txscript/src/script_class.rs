use crate::{opcodes::codes, MAX_SCRIPT_PUBLIC_KEY_VERSION};
use borsh::{BorshDeserialize, BorshSerialize};
use kaspa_sdk_addresses::Version;
use kaspa_sdk_consensus_core::tx::{ScriptPublicKey, ScriptPublicKeyVersion};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum Error {
    #[error("Invalid script class {0}")]
    InvalidScriptClass(String),
}

/// Standard classes of script payment in the blockDAG
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum ScriptClass {
    /// None of the recognized forms
    NonStandard = 0,
    /// Pay to pubkey
    PubKey,
    /// Pay to pubkey ECDSA
    PubKeyECDSA,
    /// Pay to script hash
    ScriptHash,
}

impl ScriptClass {
    pub fn from_script(script_public_key: &ScriptPublicKey) -> Self {
        match script_public_key.version() == MAX_SCRIPT_PUBLIC_KEY_VERSION {
            true => Self::from_script_bytes(script_public_key.script()),
            false => ScriptClass::NonStandard,
        }
    }

    /// Classifies a raw version-0 script by its byte shape.
    pub fn from_script_bytes(script: &[u8]) -> Self {
        match script {
            // OpData32 <32-byte pubkey> OpCheckSig
            [codes::OpData32, pubkey @ .., codes::OpCheckSig] if pubkey.len() == 32 => ScriptClass::PubKey,
            // OpData33 <33-byte pubkey> OpCheckSigECDSA
            [codes::OpData33, pubkey @ .., codes::OpCheckSigECDSA] if pubkey.len() == 33 => ScriptClass::PubKeyECDSA,
            // OpBlake2b OpData32 <32-byte script hash> OpEqual
            [codes::OpBlake2b, codes::OpData32, hash @ .., codes::OpEqual] if hash.len() == 32 => ScriptClass::ScriptHash,
            _ => ScriptClass::NonStandard,
        }
    }

    #[inline(always)]
    pub fn is_pay_to_pubkey(script: &[u8]) -> bool {
        Self::from_script_bytes(script) == ScriptClass::PubKey
    }

    #[inline(always)]
    pub fn is_pay_to_pubkey_ecdsa(script: &[u8]) -> bool {
        Self::from_script_bytes(script) == ScriptClass::PubKeyECDSA
    }

    /// Returns true if the script is in the standard pay-to-script-hash (P2SH) format.
    #[inline(always)]
    pub fn is_pay_to_script_hash(script: &[u8]) -> bool {
        Self::from_script_bytes(script) == ScriptClass::ScriptHash
    }

    fn as_str(&self) -> &'static str {
        match self {
            ScriptClass::NonStandard => "nonstandard",
            ScriptClass::PubKey => "pubkey",
            ScriptClass::PubKeyECDSA => "pubkeyecdsa",
            ScriptClass::ScriptHash => "scripthash",
        }
    }

    pub fn version(&self) -> ScriptPublicKeyVersion {
        match self {
            ScriptClass::NonStandard => 0,
            ScriptClass::PubKey | ScriptClass::PubKeyECDSA | ScriptClass::ScriptHash => MAX_SCRIPT_PUBLIC_KEY_VERSION,
        }
    }
}

impl Display for ScriptClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptClass {
    type Err = Error;

    fn from_str(script_class: &str) -> Result<Self, Self::Err> {
        match script_class {
            "nonstandard" => Ok(ScriptClass::NonStandard),
            "pubkey" => Ok(ScriptClass::PubKey),
            "pubkeyecdsa" => Ok(ScriptClass::PubKeyECDSA),
            "scripthash" => Ok(ScriptClass::ScriptHash),
            _ => Err(Error::InvalidScriptClass(script_class.to_string())),
        }
    }
}

impl TryFrom<&str> for ScriptClass {
    type Error = Error;

    fn try_from(script_class: &str) -> Result<Self, Self::Error> {
        script_class.parse()
    }
}

impl From<Version> for ScriptClass {
    fn from(value: Version) -> Self {
        match value {
            Version::PubKey => ScriptClass::PubKey,
            Version::PubKeyECDSA => ScriptClass::PubKeyECDSA,
            Version::ScriptHash => ScriptClass::ScriptHash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::codes::{OpBlake2b, OpCheckSig, OpCheckSigECDSA, OpCheckSigVerify, OpData32, OpData33, OpEqual};
    use std::iter::once;

    fn p2pk(pubkey: [u8; 32]) -> Vec<u8> {
        once(OpData32).chain(pubkey).chain(once(OpCheckSig)).collect()
    }

    fn p2pk_ecdsa(pubkey: [u8; 33]) -> Vec<u8> {
        once(OpData33).chain(pubkey).chain(once(OpCheckSigECDSA)).collect()
    }

    fn p2sh(hash: [u8; 32]) -> Vec<u8> {
        [OpBlake2b, OpData32].into_iter().chain(hash).chain(once(OpEqual)).collect()
    }

    #[test]
    fn test_script_class_detection() {
        assert_eq!(ScriptClass::from_script_bytes(&p2pk([7; 32])), ScriptClass::PubKey);
        assert_eq!(ScriptClass::from_script_bytes(&p2pk_ecdsa([7; 33])), ScriptClass::PubKeyECDSA);
        assert_eq!(ScriptClass::from_script_bytes(&p2sh([7; 32])), ScriptClass::ScriptHash);
        assert!(ScriptClass::is_pay_to_pubkey(&p2pk([7; 32])));
        assert!(ScriptClass::is_pay_to_pubkey_ecdsa(&p2pk_ecdsa([7; 33])));
        assert!(ScriptClass::is_pay_to_script_hash(&p2sh([7; 32])));

        // truncated pubkey
        let mut truncated = p2pk([7; 32]);
        truncated.remove(1);
        assert_eq!(ScriptClass::from_script_bytes(&truncated), ScriptClass::NonStandard);
        // wrong trailing opcode
        let mut wrong_op = p2pk([7; 32]);
        *wrong_op.last_mut().unwrap() = OpCheckSigVerify;
        assert_eq!(ScriptClass::from_script_bytes(&wrong_op), ScriptClass::NonStandard);
        // trailing garbage after a valid p2sh body
        let mut trailing = p2sh([7; 32]);
        trailing.push(0);
        assert_eq!(ScriptClass::from_script_bytes(&trailing), ScriptClass::NonStandard);
        assert_eq!(ScriptClass::from_script_bytes(&[]), ScriptClass::NonStandard);
    }

    #[test]
    fn test_script_class_versioned_spk() {
        let spk = ScriptPublicKey::from_vec(0, p2pk([7; 32]));
        assert_eq!(ScriptClass::from_script(&spk), ScriptClass::PubKey);

        // any unknown version renders the script non standard
        let spk = ScriptPublicKey::from_vec(MAX_SCRIPT_PUBLIC_KEY_VERSION + 1, p2pk([7; 32]));
        assert_eq!(ScriptClass::from_script(&spk), ScriptClass::NonStandard);
    }

    #[test]
    fn test_script_class_strings() {
        for class in [ScriptClass::NonStandard, ScriptClass::PubKey, ScriptClass::PubKeyECDSA, ScriptClass::ScriptHash] {
            assert_eq!(ScriptClass::from_str(&class.to_string()).unwrap(), class);
        }
        assert_eq!("pubkey".parse::<ScriptClass>().unwrap(), ScriptClass::PubKey);
        assert!("p2pk".parse::<ScriptClass>().is_err());
    }
}
