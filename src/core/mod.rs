pub mod error;
pub mod key;
pub mod value;

pub use error::{HydrateError, Result};
pub use key::IdentityKey;
pub use value::{DATE_FORMAT, DATETIME_FORMAT, DataType, Value};
