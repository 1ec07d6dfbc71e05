pub mod calendar;
pub mod error;
pub mod function;
pub mod tolerance;
pub mod value;

pub use calendar::DateError;
pub use error::*;
pub use function::*;
pub use tolerance::{Tolerance, ToleranceError};
pub use value::*;
