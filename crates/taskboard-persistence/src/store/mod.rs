pub mod atomic_writer;
pub mod document;
pub mod json_file_store;
pub mod memory_store;

pub use atomic_writer::AtomicWriter;
pub use document::{BoardDocument, DOCUMENT_VERSION};
pub use json_file_store::JsonFileGateway;
pub use memory_store::{GatewayCall, GatewayOp, InMemoryGateway};
