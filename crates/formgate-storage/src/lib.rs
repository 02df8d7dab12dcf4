//! Formgate Storage Library
//!
//! Attachment storage for form submissions. Provides the `Storage` trait and
//! a local-filesystem backend. Stored names are generated per accepted
//! upload and never derived from client input; keys must not contain `..` or
//! a leading `/`.

pub mod local;
pub mod names;
pub mod traits;

pub use local::LocalStorage;
pub use names::{extension_of, generate_stored_name};
pub use traits::{Storage, StorageError, StorageResult};
