pub mod backend;
pub mod client;

pub use backend::RemoteProviderBackend;
pub use client::{ProviderClient, ProviderConfig};
