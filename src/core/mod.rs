pub mod error;
pub mod key;
pub mod types;

pub use error::{DbError, ErrorKind, Result};
pub use key::{DocumentKey, NormalizedKey, normalize};
pub use types::{Document, ID_FIELD, expect_array, expect_object, expect_str, json_type_name};
