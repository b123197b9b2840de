//! A zero-copy MessagePack wire-format codec.
//!
//! This crate is the runtime half of the msgpack toolkit (see the workspace
//! `DESIGN.md`): the bit-exact encoder, decoder and structural skipper for
//! every MessagePack kind, plus the Extension subsystem. `msgpack-derive`
//! generates code against the functions and types exported here; nothing in
//! this crate depends on the code-generation pipeline (`msgpack-schema`).

pub mod codec;
pub mod error;
pub mod ext;
pub mod io;
pub mod kind;
pub mod skip;

pub use codec::msgsize::Msgsize;
pub use error::{Error, RegistryError, Result};
pub use kind::Kind;
pub use skip::skip;

#[cfg(test)]
mod property_tests;
