pub mod error;
pub mod result;
pub mod serializable;
pub mod tx;
pub mod utxo;

pub mod prelude {
    pub use crate::error::Error;
    pub use crate::result::Result;
    pub use crate::serializable::{numeric, string};
    pub use crate::tx::{
        DataKind, Fees, Generator, GeneratorSettings, GeneratorSummary, MassCalculator, PaymentDestination, PaymentOutput,
        PaymentOutputs, PendingTransaction,
    };
    pub use crate::utxo::{UtxoEntry, UtxoEntryId, UtxoEntryReference};
}
