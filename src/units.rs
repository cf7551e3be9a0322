//! Newtypes for the quantities used in fuel cost calculations.
//!
//! Costs are in currency units per MMBtu of heat content and emissions in (metric) tonnes of CO2.
//! Multiplying quantities only compiles for combinations which make physical sense.
use serde::{Deserialize, Serialize};
use std::ops::Mul;

macro_rules! unit_struct {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            PartialOrd,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::Display,
            derive_more::Into,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Create from an `f64`
            pub fn new(value: f64) -> Self {
                Self(value)
            }

            /// The underlying `f64` value
            pub fn value(&self) -> f64 {
                self.0
            }

            /// Whether the value is neither infinite nor NaN
            pub fn is_finite(&self) -> bool {
                self.0.is_finite()
            }

            /// Round to the given number of decimal places, with ties going to the even digit
            pub fn round_to(self, decimals: i32) -> Self {
                let factor = 10f64.powi(decimals);
                Self((self.0 * factor).round_ties_even() / factor)
            }
        }

        impl Mul<Dimensionless> for $name {
            type Output = $name;

            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($lhs:ident, $rhs:ident, $out:ident) => {
        impl Mul<$rhs> for $lhs {
            type Output = $out;

            fn mul(self, rhs: $rhs) -> $out {
                $out(self.0 * rhs.0)
            }
        }

        impl Mul<$lhs> for $rhs {
            type Output = $out;

            fn mul(self, rhs: $lhs) -> $out {
                $out(self.0 * rhs.0)
            }
        }
    };
}

unit_struct!(Dimensionless, "A dimensionless quantity (e.g. a capture rate)");
unit_struct!(MoneyPerMMBtu, "A cost per MMBtu of fuel heat content");
unit_struct!(TonnesPerMMBtu, "Tonnes of CO2 emitted per MMBtu of fuel heat content");
unit_struct!(MoneyPerTonne, "A cost per tonne of CO2 (e.g. a carbon tax)");

impl_mul!(MoneyPerTonne, TonnesPerMMBtu, MoneyPerMMBtu);

impl Dimensionless {
    /// The complement of this value, i.e. `1 - self`
    pub fn complement(self) -> Self {
        Self(1.0 - self.0)
    }
}
