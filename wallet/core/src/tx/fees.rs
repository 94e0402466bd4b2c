use serde::{Deserialize, Serialize};

/// Transaction fee preferences. A fee amount is always accompanied by its
/// source policy: fees are either added on top of the requested payment
/// (paid by the sender) or subtracted from the payment output (paid by
/// the receiver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fees {
    /// Fee management is disabled (sweep transactions only pay the network mass fee)
    None,
    /// Fees are added on top of the payment amount
    SenderPays(u64),
    /// Fees are subtracted from the payment amount
    ReceiverPays(u64),
}

impl Fees {
    pub fn is_none(&self) -> bool {
        matches!(self, Fees::None)
    }

    pub fn sender_pays(&self) -> bool {
        matches!(self, Fees::SenderPays(_))
    }

    pub fn receiver_pays(&self) -> bool {
        matches!(self, Fees::ReceiverPays(_))
    }

    /// The priority fee amount added on top of the minimum network fee.
    pub fn additional(&self) -> u64 {
        match self {
            Fees::SenderPays(fee) | Fees::ReceiverPays(fee) => *fee,
            Fees::None => 0,
        }
    }
}

/// Fees expressed as signed 64-bit carry the source in the sign: a negative
/// amount is paid by the receiver, a non-negative amount by the sender.
impl From<i64> for Fees {
    fn from(fee: i64) -> Self {
        if fee < 0 {
            Fees::ReceiverPays(fee.unsigned_abs())
        } else {
            Fees::SenderPays(fee as u64)
        }
    }
}

impl From<u64> for Fees {
    fn from(fee: u64) -> Self {
        Fees::SenderPays(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fees_from_signed() {
        assert_eq!(Fees::from(0i64), Fees::SenderPays(0));
        assert_eq!(Fees::from(1_000i64), Fees::SenderPays(1_000));
        assert_eq!(Fees::from(-1_000i64), Fees::ReceiverPays(1_000));
        assert_eq!(Fees::from(i64::MIN), Fees::ReceiverPays(i64::MIN.unsigned_abs()));
        assert!(Fees::None.is_none());
        assert_eq!(Fees::ReceiverPays(5).additional(), 5);
    }
}
