use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::hex_bridge::common::error::{CodecError, Result, TranscodeError};
use crate::hex_bridge::common::timing::{PipelineTimings, Timer};
use crate::hex_bridge::coefficients::{CoefficientSet, CoefficientTable};
use crate::hex_bridge::pixel::{Decoded, PixelMode, PixelRecordCodec};
use crate::hex_bridge::raster::{
    Dimensions, ImageCrateReader, Raster, RasterReader, RasterWriter, StandardRasterWriter,
};
use crate::hex_bridge::transcoder::hex_stream::{Token, read_tokens, write_records};
use crate::hex_bridge::transcoder::types::{
    DecodeReport, EncodeReport, ReshapeAdjustment, TranscodeConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReshapePolicy {
    /// A token count other than the expected one is an error.
    Strict,
    /// Extra tokens are dropped and missing pixels are black.
    Preview,
}

/// Converts rasters to stimulus hex streams and response hex streams back to
/// rasters. Every call is independent; the transcoder holds configuration only.
pub struct ImageHexTranscoder<R: RasterReader, W: RasterWriter> {
    reader: R,
    writer: W,
    config: TranscodeConfig,
}

impl ImageHexTranscoder<ImageCrateReader, StandardRasterWriter> {
    pub fn new(config: TranscodeConfig) -> Result<Self> {
        Self::with_custom(ImageCrateReader, StandardRasterWriter, config)
    }
}

impl<R: RasterReader, W: RasterWriter> ImageHexTranscoder<R, W> {
    pub fn with_custom(reader: R, writer: W, config: TranscodeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader,
            writer,
            config,
        })
    }

    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    /// Writes `raster` as one record per pixel (three per pixel in planar
    /// mode), in row-major order.
    #[instrument(skip(self, raster, output), fields(width = raster.width(), height = raster.height()))]
    pub fn encode(&self, raster: &Raster, output: &mut dyn Write) -> Result<EncodeReport> {
        let mode = self.config.pixel_mode;
        let mut timings = PipelineTimings::new();

        if raster.layout() != mode.layout() {
            return Err(CodecError::ChannelMismatch {
                mode,
                channels: raster.layout().channels(),
            }
            .into());
        }

        let timer = Timer::start("encode_records");
        let mut records = Vec::with_capacity(raster.dimensions().pixel_count() * mode.records_per_pixel());
        for pixel in raster.pixels() {
            PixelRecordCodec::encode_into(pixel, mode, &mut records)?;
        }
        timings.record(timer);

        let timer = Timer::start("write_records");
        write_records(&records, output)?;
        timings.record(timer);

        debug!(records = records.len(), "Hex stream written");
        timings.log_summary();

        Ok(EncodeReport {
            dimensions: raster.dimensions(),
            mode,
            records: records.len(),
            timings,
        })
    }

    /// Decodes an encoded image, resamples it to the stimulus resolution and
    /// encodes it.
    pub fn encode_image(&self, image_data: &[u8], output: &mut dyn Write) -> Result<EncodeReport> {
        let raster = {
            let _span = tracing::info_span!("decode_image", bytes = image_data.len()).entered();
            self.reader.read_raster(image_data, self.config.input_dimensions(), self.config.pixel_mode.layout())?
        };
        self.encode(&raster, output)
    }

    #[instrument(skip(self, image_path, hex_path))]
    pub fn encode_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, image_path: P, hex_path: Q) -> Result<EncodeReport> {
        let image_path = image_path.as_ref();
        let hex_path = hex_path.as_ref();

        info!(
            input = %image_path.display(),
            output = %hex_path.display(),
            "Encoding image to hex stream"
        );

        let image_data = read_source(image_path)?;

        let mut buffer = Vec::new();
        let report = self.encode_image(&image_data, &mut buffer)?;
        write_output(hex_path, &buffer)?;

        info!(
            width = report.dimensions.width,
            height = report.dimensions.height,
            records = report.records,
            "Stimulus saved"
        );
        Ok(report)
    }

    /// [`encode_file`](Self::encode_file) for the configured source image.
    pub fn encode_source_file<Q: AsRef<Path>>(&self, hex_path: Q) -> Result<EncodeReport> {
        let source = self.config.source_image_path.as_ref().ok_or_else(|| {
            TranscodeError::InvalidConfig("no source image configured".to_string())
        })?;
        self.encode_file(source, hex_path)
    }

    /// Writes the synthetic gradient at stimulus resolution.
    #[instrument(skip(self, hex_path))]
    pub fn encode_gradient_file<Q: AsRef<Path>>(&self, hex_path: Q) -> Result<EncodeReport> {
        let hex_path = hex_path.as_ref();
        let raster = Raster::gradient(self.config.input_dimensions(), self.config.pixel_mode.layout())?;

        let mut buffer = Vec::new();
        let report = self.encode(&raster, &mut buffer)?;
        write_output(hex_path, &buffer)?;

        info!(
            output = %hex_path.display(),
            records = report.records,
            "Gradient stimulus saved"
        );
        Ok(report)
    }

    /// Reads a response stream and rebuilds a raster of exactly `dimensions`.
    ///
    /// Fails with [`TranscodeError::IncompleteStream`] when the number of
    /// non-blank lines does not match, which usually means the simulation
    /// stopped early or ran at another resolution.
    #[instrument(skip(self, input))]
    pub fn decode(&self, input: &mut dyn BufRead, dimensions: Dimensions) -> Result<(Raster, DecodeReport)> {
        self.decode_with(input, dimensions, ReshapePolicy::Strict)
    }

    /// Like [`decode`](Self::decode), but forces the stream into shape:
    /// surplus records are dropped and missing pixels are black. Only meant
    /// for quick looks at unfinished simulations.
    #[instrument(skip(self, input))]
    pub fn decode_preview(&self, input: &mut dyn BufRead, dimensions: Dimensions) -> Result<(Raster, DecodeReport)> {
        self.decode_with(input, dimensions, ReshapePolicy::Preview)
    }

    /// Decodes a response file at the configured output resolution and saves
    /// the image. Nothing is written unless decoding succeeds.
    pub fn decode_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, hex_path: P, image_path: Q) -> Result<DecodeReport> {
        self.decode_file_with(hex_path.as_ref(), image_path.as_ref(), ReshapePolicy::Strict)
    }

    pub fn decode_file_preview<P: AsRef<Path>, Q: AsRef<Path>>(&self, hex_path: P, image_path: Q) -> Result<DecodeReport> {
        self.decode_file_with(hex_path.as_ref(), image_path.as_ref(), ReshapePolicy::Preview)
    }

    /// Saves the source image at stimulus resolution, enlarged by the scale
    /// factor with nearest-neighbour sampling, for side-by-side comparison
    /// with the hardware output.
    #[instrument(skip(self, image_path, reference_path))]
    pub fn write_reference_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, image_path: P, reference_path: Q) -> Result<Dimensions> {
        let image_path = image_path.as_ref();
        let reference_path = reference_path.as_ref();

        let image_data = read_source(image_path)?;
        let raster = self.reader.read_raster(
            &image_data,
            self.config.input_dimensions(),
            self.config.pixel_mode.layout(),
        )?;
        let enlarged = raster.upscale_nearest(self.config.scale_factor)?;

        let mut buffer = Vec::new();
        self.writer.write_raster(&enlarged, &mut buffer, &self.config)?;
        write_output(reference_path, &buffer)?;

        info!(
            output = %reference_path.display(),
            width = enlarged.width(),
            height = enlarged.height(),
            "Reference image saved"
        );
        Ok(enlarged.dimensions())
    }

    /// Writes the coefficient ROM file at the configured tap width.
    pub fn write_coefficients_file<P: AsRef<Path>>(&self, set: &CoefficientSet, path: P) -> Result<CoefficientTable> {
        if set.scale_factor() != self.config.scale_factor {
            return Err(TranscodeError::InvalidConfig(format!(
                "coefficient set has {} phases but the scale factor is {}",
                set.scale_factor(),
                self.config.scale_factor
            )));
        }
        let table = CoefficientTable::generate(set, self.config.tap_format()?);
        table.write_file(path)?;
        Ok(table)
    }

    #[instrument(skip(self, hex_path, image_path))]
    fn decode_file_with(&self, hex_path: &Path, image_path: &Path, policy: ReshapePolicy) -> Result<DecodeReport> {
        info!(
            input = %hex_path.display(),
            output = %image_path.display(),
            "Decoding hex stream to image"
        );

        let file = File::open(hex_path).map_err(|e| source_error(hex_path, e))?;
        let mut input = BufReader::new(file);
        let (raster, mut report) = self.decode_with(&mut input, self.config.output_dimensions(), policy)?;

        let timer = Timer::start("encode_image");
        let mut buffer = Vec::new();
        self.writer.write_raster(&raster, &mut buffer, &self.config)?;
        write_output(image_path, &buffer)?;
        report.timings.record(timer);

        info!(
            width = raster.width(),
            height = raster.height(),
            substitutions = report.substitutions,
            "Image saved"
        );
        Ok(report)
    }

    fn decode_with(&self, input: &mut dyn BufRead, dimensions: Dimensions, policy: ReshapePolicy) -> Result<(Raster, DecodeReport)> {
        let mode = self.config.pixel_mode;
        let mut timings = PipelineTimings::new();

        let timer = Timer::start("read_tokens");
        let mut tokens = read_tokens(input)?;
        timings.record(timer);

        let actual = tokens.len();
        let expected = dimensions.pixel_count() * mode.records_per_pixel();
        debug!(expected, actual, "Hex stream read");

        let adjustment = if actual == expected {
            ReshapeAdjustment::None
        } else if policy == ReshapePolicy::Strict {
            return Err(TranscodeError::IncompleteStream { expected, actual });
        } else if actual > expected {
            tokens.truncate(expected);
            ReshapeAdjustment::Truncated { dropped: actual - expected }
        } else {
            ReshapeAdjustment::Padded { added: expected - actual }
        };

        if adjustment != ReshapeAdjustment::None {
            warn!(expected, actual, ?adjustment, "Record count mismatch, reshaping for preview");
        }

        let timer = Timer::start("decode_records");
        let channels = mode.channels();
        let mut data = Vec::with_capacity(dimensions.pixel_count() * channels);
        let mut substitutions = 0;
        for group in tokens.chunks_exact(mode.records_per_pixel()) {
            let decoded = decode_group(group, mode)?;
            if decoded.substituted {
                substitutions += 1;
            }
            data.extend_from_slice(decoded.pixel.channels());
        }
        // Preview only: black for whatever the stream did not cover.
        data.resize(dimensions.pixel_count() * channels, 0);
        timings.record(timer);

        if substitutions > 0 {
            warn!(substitutions, "Undefined records decoded as black pixels");
        }

        let raster = Raster::new(dimensions, mode.layout(), data)?;
        timings.log_summary();

        Ok((
            raster,
            DecodeReport {
                dimensions,
                mode,
                tokens: actual,
                substitutions,
                adjustment,
                timings,
            },
        ))
    }
}

fn decode_group(group: &[Token], mode: PixelMode) -> Result<Decoded> {
    let line = group.first().map_or(0, |token| token.line);
    let decoded = match group {
        [r, g, b] if mode == PixelMode::Rgb24Planar => {
            PixelRecordCodec::decode_planar([r.text.as_str(), g.text.as_str(), b.text.as_str()])
        }
        _ => PixelRecordCodec::decode(group.first().map_or("", |token| token.text.as_str()), mode),
    };
    decoded.map_err(|source| TranscodeError::Format { line, source })
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    let _span = tracing::info_span!("read_input_file").entered();
    std::fs::read(path).map_err(|e| source_error(path, e))
}

fn source_error(path: &Path, error: std::io::Error) -> TranscodeError {
    if error.kind() == ErrorKind::NotFound {
        TranscodeError::SourceNotFound(path.to_path_buf())
    } else {
        TranscodeError::InputReadError(format!("{}: {}", path.display(), error))
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let _span = tracing::info_span!("write_output_file").entered();
    let mut file = File::create(path).map_err(|e| {
        TranscodeError::OutputWriteError(format!("{}: {}", path.display(), e))
    })?;
    file.write_all(bytes)
        .map_err(|e| TranscodeError::OutputWriteError(format!("{}: {}", path.display(), e)))
}
