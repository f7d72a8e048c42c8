//! Hex bridge module
//!
//! Codecs and pipelines that turn rasters into the line-oriented hex streams
//! read by the hardware testbench, and turn its response streams back into
//! rasters. The fixed-point coefficient table for the interpolation filter
//! lives here as well.

pub mod common;
pub mod fixed_point;
pub mod coefficients;
pub mod pixel;
pub mod raster;
pub mod transcoder;

pub use common::{
    CodecError,
    HexRecord,
    TranscodeError,
    Result,
    PipelineTimings,
    StepTiming,
    Timer,
};

pub use fixed_point::{BitWidth, FixedPointCodec};

pub use coefficients::{
    CoefficientSet,
    CoefficientTable,
    TapFormat,
    TAPS_PER_PHASE,
};

pub use pixel::{
    Decoded,
    Pixel,
    PixelMode,
    PixelRecordCodec,
};

pub use raster::{
    ChannelLayout,
    Dimensions,
    ImageCrateReader,
    Raster,
    RasterReader,
    RasterWriter,
    StandardRasterWriter,
};

pub use transcoder::{
    DecodeReport,
    EncodeReport,
    ImageFormat,
    ImageHexTranscoder,
    ReshapeAdjustment,
    TiffCompression,
    TranscodeConfig,
    TranscodeConfigBuilder,
};
