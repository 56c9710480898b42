pub mod base;
pub mod errors;
pub mod local;
pub mod path;
pub mod registry;
pub mod union;

pub use base::{BaseStore, WriteOptions};
pub use errors::{StoreError, StoreResult};
pub use local::LocalStore;
pub use registry::Registry;
pub use union::UnionStore;
