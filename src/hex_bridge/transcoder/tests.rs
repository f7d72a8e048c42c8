use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::hex_bridge::common::error::{CodecError, Result, TranscodeError};
use crate::hex_bridge::coefficients::{CoefficientSet, TapFormat};
use crate::hex_bridge::pixel::PixelMode;
use crate::hex_bridge::raster::{ChannelLayout, Dimensions, Raster, RasterReader, RasterWriter};
use crate::hex_bridge::transcoder::pipeline::ImageHexTranscoder;
use crate::hex_bridge::transcoder::types::{ReshapeAdjustment, TranscodeConfig};

struct MockReader {
    should_fail: bool,
    requested: Arc<Mutex<Vec<(Dimensions, ChannelLayout)>>>,
}

impl MockReader {
    fn new() -> Self {
        Self {
            should_fail: false,
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl RasterReader for MockReader {
    fn read_raster(&self, _data: &[u8], target: Dimensions, layout: ChannelLayout) -> Result<Raster> {
        if self.should_fail {
            return Err(TranscodeError::DecodeError("Mock decode error".to_string()));
        }
        self.requested.lock().unwrap().push((target, layout));
        Raster::gradient(target, layout)
    }
}

struct MockWriter {
    should_fail: bool,
    written: Arc<Mutex<Vec<Raster>>>,
}

impl MockWriter {
    fn new() -> Self {
        Self {
            should_fail: false,
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl RasterWriter for MockWriter {
    fn write_raster(&self, raster: &Raster, output: &mut dyn Write, _config: &TranscodeConfig) -> Result<()> {
        if self.should_fail {
            return Err(TranscodeError::EncodeError("Mock encode error".to_string()));
        }
        self.written.lock().unwrap().push(raster.clone());
        output.write_all(b"mock image")?;
        Ok(())
    }
}

fn transcoder(config: TranscodeConfig) -> ImageHexTranscoder<MockReader, MockWriter> {
    ImageHexTranscoder::with_custom(MockReader::new(), MockWriter::new(), config).unwrap()
}

fn gray_transcoder() -> ImageHexTranscoder<MockReader, MockWriter> {
    transcoder(TranscodeConfig::default())
}

fn encode_to_string(
    transcoder: &ImageHexTranscoder<MockReader, MockWriter>,
    raster: &Raster,
) -> String {
    let mut out = Vec::new();
    transcoder.encode(raster, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_config_builder() {
    let config = TranscodeConfig::builder()
        .source_image_path("images/img2.png")
        .target_size(64, 32)
        .pixel_mode(PixelMode::Rgb24Packed)
        .fixed_point_bit_width(8)
        .scale_factor(2)
        .build();

    assert_eq!(config.source_image_path.as_deref(), Some(std::path::Path::new("images/img2.png")));
    assert_eq!(config.input_dimensions(), Dimensions::new(64, 32));
    assert_eq!(config.output_dimensions(), Dimensions::new(128, 64));
    assert_eq!(config.pixel_mode, PixelMode::Rgb24Packed);
    assert_eq!(config.fixed_point_bit_width, 8);
}

#[test]
fn test_default_config_matches_testbench() {
    let config = TranscodeConfig::builder().build();
    assert!(config.source_image_path.is_none());
    assert_eq!(config.input_dimensions(), Dimensions::new(128, 72));
    assert_eq!(config.output_dimensions(), Dimensions::new(384, 216));
    assert_eq!(config.pixel_mode, PixelMode::Gray8);
    assert_eq!(config.fixed_point_bit_width, 9);
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_config_is_rejected() {
    let zero = TranscodeConfig::builder().target_size(0, 72).build();
    assert!(matches!(
        ImageHexTranscoder::with_custom(MockReader::new(), MockWriter::new(), zero),
        Err(TranscodeError::InvalidDimensions(0, 72))
    ));

    let no_scale = TranscodeConfig::builder().scale_factor(0).build();
    assert!(matches!(no_scale.validate(), Err(TranscodeError::InvalidConfig(_))));

    let narrow = TranscodeConfig::builder().fixed_point_bit_width(1).build();
    assert!(matches!(narrow.validate(), Err(TranscodeError::InvalidConfig(_))));

    let mismatched = TranscodeConfig::builder()
        .tap_format(TapFormat::S1_7_REG8)
        .fixed_point_bit_width(9)
        .build();
    assert!(matches!(mismatched.validate(), Err(TranscodeError::InvalidConfig(_))));
}

#[test]
fn test_oversized_config_is_rejected() {
    let huge = TranscodeConfig::builder().target_size(usize::MAX, 2).build();
    assert!(matches!(huge.validate(), Err(TranscodeError::InvalidDimensions(usize::MAX, 2))));

    let scaled = TranscodeConfig::builder()
        .target_size(1 << 20, 1 << 20)
        .pixel_mode(PixelMode::Rgb24Planar)
        .scale_factor(1 << 12)
        .build();
    assert!(matches!(
        ImageHexTranscoder::with_custom(MockReader::new(), MockWriter::new(), scaled),
        Err(TranscodeError::InvalidDimensions(_, _))
    ));
}

#[test]
fn test_two_pixel_gray_scenario() {
    let transcoder = gray_transcoder();
    let raster = Raster::new(Dimensions::new(2, 1), ChannelLayout::Gray, vec![10, 255]).unwrap();

    let text = encode_to_string(&transcoder, &raster);
    assert_eq!(text, "0A\nFF\n");

    let (decoded, report) = transcoder.decode(&mut text.as_bytes(), Dimensions::new(2, 1)).unwrap();
    assert_eq!(decoded.data(), &[10, 255]);
    assert_eq!(report.tokens, 2);
    assert_eq!(report.substitutions, 0);
    assert_eq!(report.adjustment, ReshapeAdjustment::None);
}

#[test]
fn test_encode_report_counts_lines() {
    let transcoder = gray_transcoder();
    let raster = Raster::gradient(Dimensions::new(7, 5), ChannelLayout::Gray).unwrap();
    let mut out = Vec::new();
    let report = transcoder.encode(&raster, &mut out).unwrap();
    assert_eq!(report.records, 35);
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 35);
    assert!(report.timings.get_step("encode_records").is_some());
}

#[test]
fn test_packed_round_trip() {
    let config = TranscodeConfig::builder().pixel_mode(PixelMode::Rgb24Packed).build();
    let transcoder = transcoder(config);
    let data: Vec<u8> = (0..18u8).map(|v| v.wrapping_mul(37)).collect();
    let raster = Raster::new(Dimensions::new(3, 2), ChannelLayout::Rgb, data).unwrap();

    let text = encode_to_string(&transcoder, &raster);
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().all(|line| line.len() == 6));

    let (decoded, _) = transcoder.decode(&mut text.as_bytes(), Dimensions::new(3, 2)).unwrap();
    assert_eq!(decoded, raster);
}

#[test]
fn test_planar_round_trip() {
    let config = TranscodeConfig::builder().pixel_mode(PixelMode::Rgb24Planar).build();
    let transcoder = transcoder(config);
    let raster = Raster::new(
        Dimensions::new(2, 1),
        ChannelLayout::Rgb,
        vec![0x12, 0x34, 0x56, 0xAB, 0xCD, 0xEF],
    )
    .unwrap();

    let text = encode_to_string(&transcoder, &raster);
    assert_eq!(text, "12\n34\n56\nAB\nCD\nEF\n");

    let (decoded, report) = transcoder.decode(&mut text.as_bytes(), Dimensions::new(2, 1)).unwrap();
    assert_eq!(decoded, raster);
    assert_eq!(report.tokens, 6);
}

#[test]
fn test_token_count_mismatch_fails() {
    let transcoder = gray_transcoder();
    let text = "00\n".repeat(10);
    let result = transcoder.decode(&mut text.as_bytes(), Dimensions::new(4, 3));
    assert!(matches!(
        result,
        Err(TranscodeError::IncompleteStream { expected: 12, actual: 10 })
    ));

    let planar = transcoder_with_mode(PixelMode::Rgb24Planar);
    let text = "00\n".repeat(4);
    assert!(matches!(
        planar.decode(&mut text.as_bytes(), Dimensions::new(2, 1)),
        Err(TranscodeError::IncompleteStream { expected: 6, actual: 4 })
    ));
}

fn transcoder_with_mode(mode: PixelMode) -> ImageHexTranscoder<MockReader, MockWriter> {
    transcoder(TranscodeConfig::builder().pixel_mode(mode).build())
}

#[test]
fn test_blank_lines_do_not_count() {
    let transcoder = gray_transcoder();
    let text = "\n01\n\n02\n03\n04\n\n\n";
    let (decoded, report) = transcoder.decode(&mut text.as_bytes(), Dimensions::new(2, 2)).unwrap();
    assert_eq!(decoded.data(), &[1, 2, 3, 4]);
    assert_eq!(report.tokens, 4);
}

#[test]
fn test_undefined_records_become_black() {
    let transcoder = gray_transcoder();
    let text = "10\nxx\nXX\n40\n";
    let (decoded, report) = transcoder.decode(&mut text.as_bytes(), Dimensions::new(2, 2)).unwrap();
    assert_eq!(decoded.data(), &[0x10, 0, 0, 0x40]);
    assert_eq!(report.substitutions, 2);
}

#[test]
fn test_non_utf8_record_becomes_black() {
    let transcoder = gray_transcoder();
    let mut input: &[u8] = b"10\n\xff\xfe\n30\n40\n";
    let (decoded, report) = transcoder.decode(&mut input, Dimensions::new(2, 2)).unwrap();
    assert_eq!(decoded.data(), &[0x10, 0, 0x30, 0x40]);
    assert_eq!(report.substitutions, 1);
}

#[test]
fn test_wrong_record_width_reports_line() {
    let transcoder = gray_transcoder();
    let text = "10\n\n123\n40\n";
    match transcoder.decode(&mut text.as_bytes(), Dimensions::new(3, 1)) {
        Err(TranscodeError::Format { line, source }) => {
            assert_eq!(line, 3);
            assert!(matches!(source, CodecError::InvalidLength { expected: 2, actual: 3, .. }));
        }
        other => panic!("expected format error, got {:?}", other.map(|(_, report)| report)),
    }
}

#[test]
fn test_preview_pads_short_stream() {
    let transcoder = gray_transcoder();
    let text = "01\n02\n03\n";
    let (decoded, report) = transcoder.decode_preview(&mut text.as_bytes(), Dimensions::new(3, 2)).unwrap();
    assert_eq!(decoded.data(), &[1, 2, 3, 0, 0, 0]);
    assert_eq!(report.adjustment, ReshapeAdjustment::Padded { added: 3 });
    assert_eq!(report.tokens, 3);
}

#[test]
fn test_preview_truncates_long_stream() {
    let transcoder = gray_transcoder();
    let text = "01\n02\n03\n04\n05\n";
    let (decoded, report) = transcoder.decode_preview(&mut text.as_bytes(), Dimensions::new(2, 1)).unwrap();
    assert_eq!(decoded.data(), &[1, 2]);
    assert_eq!(report.adjustment, ReshapeAdjustment::Truncated { dropped: 3 });
}

#[test]
fn test_preview_drops_partial_planar_pixel() {
    let transcoder = transcoder_with_mode(PixelMode::Rgb24Planar);
    let text = "01\n02\n03\n04\n";
    let (decoded, report) = transcoder.decode_preview(&mut text.as_bytes(), Dimensions::new(2, 1)).unwrap();
    assert_eq!(decoded.data(), &[1, 2, 3, 0, 0, 0]);
    assert_eq!(report.adjustment, ReshapeAdjustment::Padded { added: 2 });
}

#[test]
fn test_encode_rejects_layout_mismatch() {
    let transcoder = gray_transcoder();
    let raster = Raster::new(Dimensions::new(1, 1), ChannelLayout::Rgb, vec![1, 2, 3]).unwrap();
    let mut out = Vec::new();
    let result = transcoder.encode(&raster, &mut out);
    assert!(matches!(
        result,
        Err(TranscodeError::Codec(CodecError::ChannelMismatch { mode: PixelMode::Gray8, channels: 3 }))
    ));
    assert!(out.is_empty());
}

#[test]
fn test_encode_image_resamples_to_stimulus_size() {
    let reader = MockReader::new();
    let requested = reader.requested.clone();
    let config = TranscodeConfig::builder().target_size(16, 9).build();
    let transcoder = ImageHexTranscoder::with_custom(reader, MockWriter::new(), config).unwrap();

    let mut out = Vec::new();
    let report = transcoder.encode_image(b"fake png data", &mut out).unwrap();

    assert_eq!(report.records, 144);
    assert_eq!(
        requested.lock().unwrap().as_slice(),
        &[(Dimensions::new(16, 9), ChannelLayout::Gray)]
    );
}

#[test]
fn test_reader_failure() {
    let reader = MockReader {
        should_fail: true,
        requested: Arc::new(Mutex::new(Vec::new())),
    };
    let transcoder = ImageHexTranscoder::with_custom(reader, MockWriter::new(), TranscodeConfig::default()).unwrap();

    let mut out = Vec::new();
    let result = transcoder.encode_image(b"fake png data", &mut out);
    assert!(matches!(result, Err(TranscodeError::DecodeError(_))));
}

#[test]
fn test_decode_file_writes_image_at_output_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let hex_path = dir.path().join("output_image.hex");
    let image_path = dir.path().join("final_result.png");
    std::fs::write(&hex_path, "00\n40\n80\nC0\nFF\nxx\n").unwrap();

    let writer = MockWriter::new();
    let written = writer.written.clone();
    let config = TranscodeConfig::builder().target_size(3, 2).scale_factor(1).build();
    let transcoder = ImageHexTranscoder::with_custom(MockReader::new(), writer, config).unwrap();

    let report = transcoder.decode_file(&hex_path, &image_path).unwrap();

    assert_eq!(report.substitutions, 1);
    assert_eq!(std::fs::read(&image_path).unwrap(), b"mock image");
    let written = written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].dimensions(), Dimensions::new(3, 2));
    assert_eq!(written[0].data(), &[0x00, 0x40, 0x80, 0xC0, 0xFF, 0x00]);
}

#[test]
fn test_failed_decode_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let hex_path = dir.path().join("output_image.hex");
    let image_path = dir.path().join("final_result.png");
    std::fs::write(&hex_path, "00\n40\n").unwrap();

    let transcoder = gray_transcoder();
    let result = transcoder.decode_file(&hex_path, &image_path);

    assert!(matches!(
        result,
        Err(TranscodeError::IncompleteStream { expected: 82944, actual: 2 })
    ));
    assert!(!image_path.exists());
}

#[test]
fn test_writer_failure() {
    let dir = tempfile::tempdir().unwrap();
    let hex_path = dir.path().join("output_image.hex");
    std::fs::write(&hex_path, "00\n").unwrap();

    let writer = MockWriter {
        should_fail: true,
        written: Arc::new(Mutex::new(Vec::new())),
    };
    let config = TranscodeConfig::builder().target_size(1, 1).scale_factor(1).build();
    let transcoder = ImageHexTranscoder::with_custom(MockReader::new(), writer, config).unwrap();

    let result = transcoder.decode_file(&hex_path, dir.path().join("out.png"));
    assert!(matches!(result, Err(TranscodeError::EncodeError(_))));
}

#[test]
fn test_missing_sources() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = gray_transcoder();

    let result = transcoder.decode_file(dir.path().join("missing.hex"), dir.path().join("out.png"));
    assert!(matches!(result, Err(TranscodeError::SourceNotFound(_))));

    let result = transcoder.encode_file(dir.path().join("missing.png"), dir.path().join("in.hex"));
    assert!(matches!(result, Err(TranscodeError::SourceNotFound(path)) if path.ends_with("missing.png")));

    assert!(matches!(
        transcoder.encode_source_file(dir.path().join("in.hex")),
        Err(TranscodeError::InvalidConfig(_))
    ));
}

#[test]
fn test_reference_image_is_enlarged() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("input.png");
    std::fs::write(&source, b"fake png data").unwrap();

    let writer = MockWriter::new();
    let written = writer.written.clone();
    let config = TranscodeConfig::builder().target_size(4, 2).build();
    let transcoder = ImageHexTranscoder::with_custom(MockReader::new(), writer, config).unwrap();

    let dims = transcoder.write_reference_file(&source, dir.path().join("reference.png")).unwrap();
    assert_eq!(dims, Dimensions::new(12, 6));
    assert_eq!(written.lock().unwrap()[0].dimensions(), Dimensions::new(12, 6));
}

#[test]
fn test_coefficient_file_follows_bit_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coeffs.txt");

    let transcoder = transcoder(TranscodeConfig::builder().fixed_point_bit_width(8).build());
    let table = transcoder.write_coefficients_file(&CoefficientSet::bicubic_x3(), &path).unwrap();
    assert_eq!(table.len(), 12);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().next(), Some("00"));
    assert_eq!(text.lines().nth(1), Some("40"));
}

#[test]
fn test_coefficient_file_for_eight_bit_rom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coeffs.txt");

    let config = TranscodeConfig::builder().tap_format(TapFormat::S1_7_REG8).build();
    assert_eq!(config.fixed_point_bit_width, 8);
    let transcoder = transcoder(config);
    let set = CoefficientSet::bicubic_x3_for(transcoder.config().tap_format().unwrap());
    transcoder.write_coefficients_file(&set, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "00\n80\n00\n00\nFD\n72\n17\nFB\nFB\n17\n72\nFD\n");
}

#[test]
fn test_coefficient_phases_must_match_scale() {
    let dir = tempfile::tempdir().unwrap();
    let transcoder = transcoder(TranscodeConfig::builder().scale_factor(2).build());
    let result = transcoder.write_coefficients_file(&CoefficientSet::bicubic_x3(), dir.path().join("coeffs.txt"));
    assert!(matches!(result, Err(TranscodeError::InvalidConfig(_))));
}
