use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::fmt::Formatter;
use std::str::{self, FromStr};

/// Size of the underlying script vector of a script.
pub const SCRIPT_VECTOR_SIZE: usize = 36;

/// Used as the underlying type for script public key data, optimized for the common p2pk script size (34).
pub type ScriptVec = SmallVec<[u8; SCRIPT_VECTOR_SIZE]>;

/// Represents the ScriptPublicKey Version
pub type ScriptPublicKeyVersion = u16;

/// Alias the `smallvec!` macro to ease maintenance
pub use smallvec::smallvec as scriptvec;

/// Represents a Set of [`ScriptPublicKey`]s
pub type ScriptPublicKeys = HashSet<ScriptPublicKey>;

/// Represents a Kaspa ScriptPublicKey
#[derive(Default, PartialEq, Eq, Clone, Hash)]
pub struct ScriptPublicKey {
    pub version: ScriptPublicKeyVersion,
    pub(super) script: ScriptVec, // Kept private to preserve read-only semantics
}

impl std::fmt::Debug for ScriptPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptPublicKey").field("version", &self.version).field("script", &self.script_hex()).finish()
    }
}

impl ScriptPublicKey {
    pub fn new(version: ScriptPublicKeyVersion, script: ScriptVec) -> Self {
        Self { version, script }
    }

    pub fn from_vec(version: ScriptPublicKeyVersion, script: Vec<u8>) -> Self {
        Self { version, script: ScriptVec::from_vec(script) }
    }

    pub fn version(&self) -> ScriptPublicKeyVersion {
        self.version
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    fn script_hex(&self) -> String {
        let mut hex = vec![0u8; self.script.len() * 2];
        faster_hex::hex_encode(&self.script, &mut hex).expect("The output is exactly twice the size of the input");
        unsafe { String::from_utf8_unchecked(hex) }
    }
}

/// The combined hex representation is the big-endian version followed by the script bytes.
impl FromStr for ScriptPublicKey {
    type Err = faster_hex::Error;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() < 4 || hex_str.len() % 2 != 0 {
            return Err(faster_hex::Error::InvalidLength(hex_str.len()));
        }
        let mut bytes = vec![0u8; hex_str.len() / 2];
        faster_hex::hex_decode(hex_str.as_bytes(), &mut bytes)?;
        let version = u16::from_be_bytes(bytes[..2].try_into().expect("the vector was validated to be at least 2 bytes"));
        Ok(Self { version, script: ScriptVec::from_slice(&bytes[2..]) })
    }
}

#[derive(Default, Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Hash)]
#[serde(rename_all = "camelCase")]
#[serde(rename = "ScriptPublicKey")]
struct ScriptPublicKeyInternal<'a> {
    version: ScriptPublicKeyVersion,
    script: &'a [u8],
}

impl Serialize for ScriptPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            let mut hex = vec![0u8; self.script.len() * 2 + 4];
            faster_hex::hex_encode(&self.version.to_be_bytes(), &mut hex).map_err(serde::ser::Error::custom)?;
            faster_hex::hex_encode(&self.script, &mut hex[4..]).map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(str::from_utf8(&hex).expect("hex is always valid UTF-8"))
        } else {
            ScriptPublicKeyInternal { version: self.version, script: &self.script }.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for ScriptPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            struct ScriptPublicKeyVisitor;

            impl serde::de::Visitor<'_> for ScriptPublicKeyVisitor {
                type Value = ScriptPublicKey;

                fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
                    write!(formatter, "a hex string carrying the big-endian version followed by the script bytes")
                }

                fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    ScriptPublicKey::from_str(v).map_err(E::custom)
                }
            }

            deserializer.deserialize_str(ScriptPublicKeyVisitor)
        } else {
            #[derive(Deserialize)]
            #[serde(rename_all = "camelCase")]
            #[serde(rename = "ScriptPublicKey")]
            struct ScriptPublicKeyOwned {
                version: ScriptPublicKeyVersion,
                script: Vec<u8>,
            }

            let ScriptPublicKeyOwned { version, script } = ScriptPublicKeyOwned::deserialize(deserializer)?;
            Ok(ScriptPublicKey::from_vec(version, script))
        }
    }
}

//
// Borsh serializers need to be manually implemented for `ScriptPublicKey` since
// smallvec does not currently support Borsh
//

impl BorshSerialize for ScriptPublicKey {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.version, writer)?;
        // Vectors and slices are all serialized internally the same way
        borsh::BorshSerialize::serialize(&self.script.as_slice(), writer)?;
        Ok(())
    }
}

impl BorshDeserialize for ScriptPublicKey {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        // Deserialize into vec first since we have no custom smallvec support
        let version: ScriptPublicKeyVersion = borsh::BorshDeserialize::deserialize_reader(reader)?;
        let script: Vec<u8> = borsh::BorshDeserialize::deserialize_reader(reader)?;
        Ok(Self::from_vec(version, script))
    }
}
