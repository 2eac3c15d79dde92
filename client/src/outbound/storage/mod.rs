//! Identity store adapters.

mod file;
mod memory;

pub use file::FileIdentityStore;
pub use memory::MemoryIdentityStore;
