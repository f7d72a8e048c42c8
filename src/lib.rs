//! Bit-exact bridge between raster images and the hexadecimal text streams
//! exchanged with a fixed-point bicubic upscaler simulation.

pub mod hex_bridge;
pub mod logger;
