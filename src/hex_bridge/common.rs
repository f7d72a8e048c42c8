//! Common utilities module
//!
//! Error types, the hex record type and stage timing shared by the codecs and the transcoder.

pub mod error;
pub mod record;
pub mod timing;

pub use error::{CodecError, TranscodeError, Result};
pub use record::HexRecord;
pub use timing::{PipelineTimings, StepTiming, Timer};
