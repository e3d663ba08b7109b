//! Archive handling at both ends of the pipeline
//!
//! - [`extract`]: unpack the runtime archive into the staging workspace
//! - [`pack`]: write the finished bundle into the output archive

pub mod extract;
pub mod pack;

pub use extract::{ArchiveExtractor, ArchiveFormat};
pub use pack::{ArchivePacker, OutputCompression};
