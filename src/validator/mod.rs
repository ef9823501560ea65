pub mod unit_validator;

pub use unit_validator::{Finding, Severity, UnitCheck, UnitValidator, ValidationReport};
