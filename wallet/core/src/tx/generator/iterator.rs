use crate::result::Result;
use crate::tx::generator::{Generator, PendingTransaction};

/// Iterator over the transactions produced by a [`Generator`]. The sequence is
/// finite and non-restartable; an error terminates it.
pub struct GeneratorIterator {
    generator: Generator,
    finished: bool,
}

impl GeneratorIterator {
    pub fn new(generator: Generator) -> Self {
        Self { generator, finished: false }
    }
}

impl Iterator for GeneratorIterator {
    type Item = Result<PendingTransaction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.generator.generate_transaction() {
            Ok(Some(pending_transaction)) => Some(Ok(pending_transaction)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
