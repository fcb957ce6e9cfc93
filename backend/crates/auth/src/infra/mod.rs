//! Infrastructure Layer

pub mod memory;

pub use memory::MemoryStore;
