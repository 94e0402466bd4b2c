//! Transaction submission formats.
//!
//! The [`numeric`] flavor carries `u64` quantities as JSON numbers (the caller
//! is responsible for amounts exceeding 2^53 when interoperating with
//! JavaScript), while the [`string`] flavor carries every `u64` as a decimal
//! string and resolves each input with its full UTXO entry, mirroring the
//! borsh-shaped transport encoding.

pub mod numeric;
pub mod string;
