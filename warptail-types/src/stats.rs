//! Byte counters for a single observation.

use core::iter::Sum;
use core::ops::{Add, AddAssign};

/// Bytes sent and received, as two independent channels.
///
/// Values are `f64` because interpolated and smoothed samples are
/// fractional; raw counters are whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProxyStats {
    /// Bytes sent towards the upstream machine.
    pub sent: f64,
    /// Bytes received from the upstream machine.
    pub received: f64,
}

impl ProxyStats {
    /// Both channels at zero.
    pub const ZERO: Self = Self {
        sent: 0.0,
        received: 0.0,
    };

    /// Create stats from the two channel values.
    pub const fn new(sent: f64, received: f64) -> Self {
        Self { sent, received }
    }

    /// Only bytes sent.
    pub const fn sent(sent: f64) -> Self {
        Self { sent, received: 0.0 }
    }

    /// Only bytes received.
    pub const fn received(received: f64) -> Self {
        Self { sent: 0.0, received }
    }

    /// Check that both channels are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        let ok = |v: f64| v.is_finite() && v >= 0.0;
        ok(self.sent) && ok(self.received)
    }
}

impl Add for ProxyStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            sent: self.sent + rhs.sent,
            received: self.received + rhs.received,
        }
    }
}

impl AddAssign for ProxyStats {
    fn add_assign(&mut self, rhs: Self) {
        self.sent += rhs.sent;
        self.received += rhs.received;
    }
}

impl Sum for ProxyStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a ProxyStats> for ProxyStats {
    fn sum<I: Iterator<Item = &'a ProxyStats>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
