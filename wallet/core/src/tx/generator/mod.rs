//! The transaction [`Generator`] consumes a stream of UTXO entries and emits a
//! tree of signable transactions: relay ("node") transactions that consolidate
//! UTXOs within a stage, "edge" transactions that close a stage and seed the
//! next one, and a final transaction carrying the requested payment outputs.

#[allow(clippy::module_inception)]
mod generator;
mod iterator;
mod pending;
mod settings;
mod summary;


pub use generator::{DataKind, Generator};
pub use iterator::GeneratorIterator;
pub use pending::PendingTransaction;
pub use settings::GeneratorSettings;
pub use summary::GeneratorSummary;
