//! IBAN validation per ISO 13616-1 and the IBAN Registry.
//!
//! ```
//! use iban_registry::Iban;
//!
//! let iban = Iban::parse("DE44 5001 0517 5407 3249 31").unwrap();
//! assert_eq!(iban.checksum(), "44");
//! assert_eq!(iban.formatted(), "DE44 5001 0517 5407 3249 31");
//! ```

pub mod batch;
pub mod checksum;
pub mod country;
pub mod error;
pub mod generator;
pub mod iban;
pub mod logging;
pub mod pattern;

pub use country::CountryFormat;
pub use error::{IbanError, Result};
pub use iban::{Iban, Validation};
