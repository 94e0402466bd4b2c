use once_cell::sync::Lazy;
use sha2::Digest;

pub trait HasherBase {
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self;
}

pub trait Hasher: HasherBase + Clone + Default {
    fn finalize(self) -> crate::Hash;
    fn reset(&mut self);
    #[inline(always)]
    fn hash<A: AsRef<[u8]>>(data: A) -> crate::Hash {
        let mut hasher = Self::default();
        hasher.update(data);
        hasher.finalize()
    }
}

/// Declares a domain-separated hasher over keyed Blake2b-256; the domain
/// string is the Blake2b key.
macro_rules! blake2b_hasher {
    ($(#[$meta:meta])* $name:ident, $domain_sep:literal) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(blake2b_simd::State);

        impl $name {
            #[inline(always)]
            pub fn new() -> Self {
                Self(blake2b_simd::Params::new().hash_length(32).key($domain_sep).to_state())
            }
        }

        impl HasherBase for $name {
            #[inline(always)]
            fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
                self.0.update(data.as_ref());
                self
            }
        }

        impl Hasher for $name {
            #[inline(always)]
            fn finalize(self) -> crate::Hash {
                crate::Hash::from_slice(self.0.finalize().as_bytes())
            }

            #[inline(always)]
            fn reset(&mut self) {
                *self = Self::new();
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

blake2b_hasher!(
    /// The transaction hash, committing to signature scripts (and the mass
    /// slot when requested). Distinct from the transaction id.
    TransactionHash,
    b"TransactionHash"
);
blake2b_hasher!(
    /// The transaction id.
    TransactionID,
    b"TransactionID"
);
blake2b_hasher!(
    /// The schnorr signing hash and all of its component sub-hashes.
    TransactionSigningHash,
    b"TransactionSigningHash"
);

/// The ECDSA signing hash. SHA-256 has no native keying, so the pipeline is
/// seeded with the SHA-256 digest of the domain separator instead.
#[derive(Clone)]
pub struct TransactionSigningHashECDSA(sha2::Sha256);

impl TransactionSigningHashECDSA {
    #[inline]
    pub fn new() -> Self {
        // The seeded state is constant, so it is computed once and cloned
        static SEEDED: Lazy<TransactionSigningHashECDSA> = Lazy::new(|| {
            let domain_digest = sha2::Sha256::digest(b"TransactionSigningHashECDSA");
            let mut state = sha2::Sha256::new();
            Digest::update(&mut state, domain_digest);
            TransactionSigningHashECDSA(state)
        });
        SEEDED.clone()
    }
}

impl HasherBase for TransactionSigningHashECDSA {
    #[inline(always)]
    fn update<A: AsRef<[u8]>>(&mut self, data: A) -> &mut Self {
        Digest::update(&mut self.0, data.as_ref());
        self
    }
}

impl Hasher for TransactionSigningHashECDSA {
    #[inline(always)]
    fn finalize(self) -> crate::Hash {
        crate::Hash::from_slice(self.0.finalize().as_slice())
    }

    #[inline(always)]
    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for TransactionSigningHashECDSA {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}
