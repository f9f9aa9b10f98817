pub mod config;
pub mod error;
pub mod diagram;
pub mod outline;
pub mod graph;
pub mod convert;

pub use config::Config;
pub use error::{NotegraphError, Result};
pub use diagram::{NoteParser, NoteRecord, Role, Uid};
pub use graph::{ExportToggles, GraphBuilder, GraphResolver};
pub use outline::Outline;
