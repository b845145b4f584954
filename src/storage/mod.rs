pub mod collection;
pub mod file;
pub mod index;
pub mod keygen;
pub mod path;

pub use collection::{Collection, validate_collection_name};
pub use index::IdentityIndex;
pub use keygen::KeyGenerator;
pub use path::DatabasePath;
