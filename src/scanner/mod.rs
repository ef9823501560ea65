pub mod unit_scanner;

pub use unit_scanner::{Unit, UnitScanner};
