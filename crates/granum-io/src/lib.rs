//! # granum-io
//!
//! The state store: binary serialization of [`granum_state::SimState`]
//! in the simulator's positional wire format, snapshot sequencing over a
//! project output directory, and invocation of the external simulator
//! binary.
//!
//! The wire format is externally fixed — the compiled simulator reads
//! and writes the same layout — so every field is written by hand in
//! little-endian order rather than through a generic serializer.

pub mod codec;
pub mod config;
pub mod process;
pub mod project;
pub mod wire;

pub use codec::{decode, decode_file, encode, encode_file, SectionHints, WireFormat};
pub use config::ProjectConfig;
pub use process::{RunOptions, Simulator};
pub use project::{Project, Status};
