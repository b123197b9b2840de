//! C4 — buffered `Reader`/`Writer` adapters over a byte-oriented source/sink.

pub mod reader;
pub mod writer;

pub use reader::Reader;
pub use writer::Writer;
