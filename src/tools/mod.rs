//! Numeric Tools
//!
//! Stateless calculators served alongside the identity lookup.

pub mod color;
pub mod gpa;
pub mod loan;
pub mod password;
pub mod units;

pub use color::{Hsl, Rgb};
pub use gpa::Course;
pub use loan::{AmortizationRow, LoanSummary};
pub use password::{GeneratorOptions, PasswordStrength, StrengthLevel};
pub use units::UnitCategory;
