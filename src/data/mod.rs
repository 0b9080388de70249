pub mod adaptor;
pub mod encoding;
pub mod loader;

pub use loader::{DataLoader, DataSource};
