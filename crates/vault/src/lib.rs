pub mod vault;

pub use vault::{VaultPaths, build_vault};
