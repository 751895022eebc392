use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    iter::Sum,
    ops::{Add, Div},
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Energy as reported by the plant API in `dayEnergy`.
#[repr(transparent)]
#[derive(
    Copy,
    Clone,
    Default,
    Deserialize,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
)]
pub struct WattHours(pub f64);

impl WattHours {
    pub const ZERO: Self = Self(0.0);

    /// Scale for display by the caller-supplied unit constant, for example `1000.0` for kWh.
    #[must_use]
    pub fn scaled(self, divisor: f64) -> f64 {
        self.0 / divisor
    }
}

/// Starts from positive zero: a float sum of nothing is `-0.0`.
impl Sum for WattHours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Div<f64> for WattHours {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Div for WattHours {
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}

impl PartialEq for WattHours {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.0).eq(&OrderedFloat(other.0))
    }
}

impl Eq for WattHours {}

impl PartialOrd for WattHours {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WattHours {
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(self.0).cmp(&OrderedFloat(other.0))
    }
}

impl Display for WattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kWh", self.0 * 0.001)
    }
}

impl Debug for WattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Wh", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sum_is_positive_zero() {
        let total: WattHours = std::iter::empty().sum();
        assert!(total.0.is_sign_positive());
        assert_eq!(total.to_string(), "0.000 kWh");
    }

    #[test]
    fn test_sum() {
        let total: WattHours = [WattHours(100.0), WattHours(50.0), WattHours::ZERO].into_iter().sum();
        assert_eq!(total, WattHours(150.0));
    }

    #[test]
    fn test_display_in_kilowatt_hours() {
        assert_eq!(WattHours(1500.0).to_string(), "1.500 kWh");
    }

    #[test]
    fn test_scaled() {
        assert_eq!(WattHours(2500.0).scaled(1000.0), 2.5);
    }
}
