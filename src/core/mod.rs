mod engine;
mod registry;
mod loader;
mod doc;
mod classifier;
mod symbols;
mod hierarchy;
mod assembler;
mod writer;

pub use loader::{RegistryLoader, SnapshotLoader};
pub use assembler::TreeAssembler;
pub use writer::OutputWriter;

// Export the main engine
pub use engine::Engine;
