//! Type definitions for marketview

mod catalog;
mod error;
mod outcome;
mod records;
mod views;

pub use catalog::*;
pub use error::*;
pub use outcome::*;
pub use records::*;
pub use views::*;
