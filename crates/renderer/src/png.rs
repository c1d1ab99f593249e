//! PNG encoding for rendered maps.
//!
//! Two color types are produced:
//! - **Indexed (color type 3)** when the image has at most 256 distinct
//!   colors. Flat general maps without antialiased text usually qualify.
//! - **RGBA (color type 6)** otherwise, e.g. once a choropleth gradient is
//!   blended in.

use std::collections::HashMap;
use std::io::Write;

use rayon::prelude::*;

use crate::error::RenderError;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Pixel layout of an encoded image.
enum Layout<'a> {
    Indexed {
        palette: &'a [[u8; 4]],
        indices: &'a [u8],
    },
    Rgba(&'a [u8]),
}

impl Layout<'_> {
    fn color_type(&self) -> u8 {
        match self {
            Layout::Indexed { .. } => 3,
            Layout::Rgba(_) => 6,
        }
    }

    fn bytes_per_pixel(&self) -> usize {
        match self {
            Layout::Indexed { .. } => 1,
            Layout::Rgba(_) => 4,
        }
    }

    fn data(&self) -> &[u8] {
        match self {
            Layout::Indexed { indices, .. } => indices,
            Layout::Rgba(pixels) => pixels,
        }
    }
}

/// Encode RGBA pixels, choosing indexed output when the palette fits.
pub fn encode_auto(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    check_len(pixels, width, height)?;

    let palette = if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette {
        Some((palette, indices)) => encode(
            width,
            height,
            Layout::Indexed {
                palette: &palette,
                indices: &indices,
            },
        ),
        None => encode(width, height, Layout::Rgba(pixels)),
    }
}

fn check_len(pixels: &[u8], width: u32, height: u32) -> Result<(), RenderError> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidCanvas { width, height });
    }
    if pixels.len() != expected {
        return Err(RenderError::Encode(format!(
            "expected {} bytes of RGBA data, got {}",
            expected,
            pixels.len()
        )));
    }
    Ok(())
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Sequential palette extraction for small images.
fn extract_palette_sequential(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let packed = pack_color(px);
        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push(packed.to_le_bytes());
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger images.
///
/// Unique colors are first collected per chunk; the palette is only built
/// (and pixels mapped) when the merged set fits in 256 entries.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let chunk_pixels = (pixels.len() / 4 / rayon::current_num_threads()).max(256);

    let unique: Vec<u32> = pixels
        .par_chunks(chunk_pixels * 4)
        .flat_map_iter(|chunk| {
            let mut local: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(4) {
                local.insert(pack_color(px), ());
                if local.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            local.into_keys()
        })
        .collect();

    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(MAX_PALETTE_SIZE);
    for packed in unique {
        if color_to_index.contains_key(&packed) {
            continue;
        }
        if palette.len() >= MAX_PALETTE_SIZE {
            return None;
        }
        color_to_index.insert(packed, palette.len() as u8);
        palette.push(packed.to_le_bytes());
    }

    let indices: Vec<u8> = pixels
        .par_chunks_exact(4)
        .map(|px| color_to_index.get(&pack_color(px)).copied().unwrap_or(0))
        .collect();

    Some((palette, indices))
}

fn encode(width: u32, height: u32, layout: Layout<'_>) -> Result<Vec<u8>, RenderError> {
    let mut png = Vec::with_capacity(layout.data().len() / 4 + 1024);
    png.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(layout.color_type());
    ihdr.extend_from_slice(&[0, 0, 0]); // compression, filter, interlace
    write_chunk(&mut png, b"IHDR", &ihdr);

    if let Layout::Indexed { palette, .. } = &layout {
        let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
        write_chunk(&mut png, b"PLTE", &plte);

        if palette.iter().any(|c| c[3] < 255) {
            let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
            write_chunk(&mut png, b"tRNS", &trns);
        }
    }

    let idat = deflate_scanlines(layout.data(), width as usize * layout.bytes_per_pixel())
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Prefix every scanline with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], stride: usize) -> std::io::Result<Vec<u8>> {
    let rows = data.len() / stride;
    let mut raw = Vec::with_capacity(rows * (stride + 1));
    for row in data.chunks_exact(stride) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&raw)?;
    encoder.finish()
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Read width, height and color type from an encoded PNG header.
pub fn read_header(png: &[u8]) -> Option<(u32, u32, u8)> {
    if png.len() < 33 || png[..8] != SIGNATURE || &png[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(png[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(png[20..24].try_into().ok()?);
    Some((width, height, png[25]))
}
