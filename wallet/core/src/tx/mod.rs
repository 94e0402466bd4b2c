pub mod fees;
pub mod generator;
pub mod mass;
pub mod payment;

pub use fees::Fees;
pub use generator::{DataKind, Generator, GeneratorIterator, GeneratorSettings, GeneratorSummary, PendingTransaction};
pub use mass::{MassCalculator, MAXIMUM_STANDARD_TRANSACTION_MASS};
pub use payment::{PaymentDestination, PaymentOutput, PaymentOutputs};
