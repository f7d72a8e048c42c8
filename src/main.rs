use anyhow::{Context, bail};
use bicubic_hex_rs::hex_bridge::{CoefficientSet, ImageHexTranscoder, TapFormat, TranscodeConfig};
use bicubic_hex_rs::logger;

use tracing::{error, info};

const USAGE: &str = "usage:
  bicubic_hex_rs stimulus <input_image.hex> [source_image]
  bicubic_hex_rs coeffs <coeffs.txt> [--reg8]
  bicubic_hex_rs response <output_image.hex> <final_result.png> [--preview]
  bicubic_hex_rs reference <source_image> <reference.png>";

fn main() -> anyhow::Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!("{USAGE}");
    };

    let mut builder = TranscodeConfig::builder();
    if command == "coeffs" && rest.get(1).is_some_and(|flag| flag == "--reg8") {
        builder = builder.tap_format(TapFormat::S1_7_REG8);
    }
    let config = builder.build();
    let transcoder = ImageHexTranscoder::new(config)?;

    info!(
        "Stimulus {}x{}, output {}x{}, mode {:?}, {}-bit taps",
        transcoder.config().target_width,
        transcoder.config().target_height,
        transcoder.config().output_dimensions().width,
        transcoder.config().output_dimensions().height,
        transcoder.config().pixel_mode,
        transcoder.config().fixed_point_bit_width,
    );

    let result = match (command.as_str(), rest) {
        ("stimulus", [hex]) => transcoder.encode_gradient_file(hex).map(|_| ()),
        ("stimulus", [hex, image]) => transcoder.encode_file(image, hex).map(|_| ()),
        ("coeffs", [path] | [path, _]) if rest.get(1).is_none_or(|flag| flag == "--reg8") => transcoder
            .config()
            .tap_format()
            .map(CoefficientSet::bicubic_x3_for)
            .and_then(|set| transcoder.write_coefficients_file(&set, path))
            .map(|_| ()),
        ("response", [hex, image]) => transcoder.decode_file(hex, image).map(|_| ()),
        ("response", [hex, image, flag]) if flag == "--preview" => {
            transcoder.decode_file_preview(hex, image).map(|_| ())
        }
        ("reference", [image, out]) => transcoder.write_reference_file(image, out).map(|_| ()),
        _ => bail!("{USAGE}"),
    };

    match result {
        Ok(()) => info!("Done"),
        Err(e) => {
            error!("{} failed: {}", command, e);
            return Err(e).with_context(|| format!("{command} failed"));
        }
    }

    Ok(())
}
