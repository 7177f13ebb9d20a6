//! Dominant thumbnail colour, picked the way Vibrant-style palette tools do:
//! quantize the image, then take the first named swatch (Vibrant, LightVibrant,
//! DarkVibrant, Muted, LightMuted, DarkMuted) that any palette colour fits.

use crate::error::{FolioError, Result};
use std::path::Path;

const PALETTE_SIZE: u8 = 16;
/// Pixel sampling stride for quantization; 1 reads every pixel.
const QUALITY: u8 = 5;

const WEIGHT_SATURATION: f64 = 3.0;
const WEIGHT_LUMA: f64 = 6.5;
const WEIGHT_POPULATION: f64 = 0.5;

/// `(min, target, max)`
type Band = (f64, f64, f64);

const NORMAL_LUMA: Band = (0.3, 0.5, 0.7);
const LIGHT_LUMA: Band = (0.55, 0.74, 1.0);
const DARK_LUMA: Band = (0.0, 0.26, 0.45);
const VIBRANT_SATURATION: Band = (0.35, 1.0, 1.0);
const MUTED_SATURATION: Band = (0.0, 0.3, 0.4);

struct Target {
    luma: Band,
    saturation: Band,
}

/// In preference order.
const TARGETS: [Target; 6] = [
    Target { luma: NORMAL_LUMA, saturation: VIBRANT_SATURATION },
    Target { luma: LIGHT_LUMA, saturation: VIBRANT_SATURATION },
    Target { luma: DARK_LUMA, saturation: VIBRANT_SATURATION },
    Target { luma: NORMAL_LUMA, saturation: MUTED_SATURATION },
    Target { luma: LIGHT_LUMA, saturation: MUTED_SATURATION },
    Target { luma: DARK_LUMA, saturation: MUTED_SATURATION },
];

/// HSL saturation and lightness, both in `0..=1`.
fn saturation_lightness([r, g, b]: [u8; 3]) -> (f64, f64) {
    let (r, g, b) = (f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;
    if max == min {
        return (0.0, lightness);
    }
    let delta = max - min;
    let saturation = if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    (saturation, lightness)
}

fn within((min, _, max): Band, value: f64) -> bool {
    (min..=max).contains(&value)
}

fn closeness((_, target, _): Band, value: f64) -> f64 {
    1.0 - (value - target).abs()
}

/// Best colour of `palette` for the first swatch any colour fits.
///
/// `palette` is ordered most populous first; rank stands in for population.
pub fn pick(palette: &[[u8; 3]]) -> Option<[u8; 3]> {
    let n = palette.len() as f64;
    TARGETS.iter().find_map(|target| {
        palette
            .iter()
            .enumerate()
            .filter_map(|(rank, &rgb)| {
                let (saturation, luma) = saturation_lightness(rgb);
                if !within(target.saturation, saturation) || !within(target.luma, luma) {
                    return None;
                }
                let score = closeness(target.saturation, saturation) * WEIGHT_SATURATION
                    + closeness(target.luma, luma) * WEIGHT_LUMA
                    + (n - rank as f64) / n * WEIGHT_POPULATION;
                Some((score, rgb))
            })
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, rgb)| rgb)
    })
}

pub fn hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Dominant colour of the image at `path` as `#rrggbb`, `None` when no swatch fits.
pub fn dominant_color(path: &Path) -> Result<Option<String>> {
    let image_error = |message: String| FolioError::Image {
        path: path.to_path_buf(),
        message,
    };

    let image = image::open(path).map_err(|e| image_error(e.to_string()))?.to_rgb8();
    let palette = color_thief::get_palette(
        image.as_raw(),
        color_thief::ColorFormat::Rgb,
        QUALITY,
        PALETTE_SIZE,
    )
    .map_err(|e| image_error(format!("{e:?}")))?;

    let colors: Vec<[u8; 3]> = palette.iter().map(|c| [c.r, c.g, c.b]).collect();
    Ok(pick(&colors).map(hex))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: [u8; 3] = [128, 128, 128];
    const RED: [u8; 3] = [220, 30, 30];

    #[test]
    fn vibrant_beats_a_more_common_muted_colour() {
        assert_eq!(pick(&[GREY, RED]), Some(RED));
    }

    #[test]
    fn falls_back_to_muted_swatches() {
        assert_eq!(pick(&[GREY]), Some(GREY));
        assert_eq!(pick(&[[250, 250, 250]]), Some([250, 250, 250]));
        assert_eq!(pick(&[]), None);
    }

    #[test]
    fn lightness_and_saturation() {
        assert_eq!(saturation_lightness([0, 0, 0]), (0.0, 0.0));
        let (s, l) = saturation_lightness([255, 0, 0]);
        assert!((s - 1.0).abs() < 1e-9);
        assert!((l - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(hex([10, 171, 255]), "#0aabff");
    }

    #[test]
    fn reads_colour_from_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thumb.png");
        image::RgbImage::from_fn(32, 32, |x, y| {
            image::Rgb([180 + (x * 2 % 60) as u8, 20 + (y % 40) as u8, 30])
        })
        .save(&path)
        .unwrap();

        let color = dominant_color(&path).unwrap().unwrap();
        assert_eq!(color.len(), 7);
        let red = u8::from_str_radix(&color[1..3], 16).unwrap();
        let green = u8::from_str_radix(&color[3..5], 16).unwrap();
        assert!(red > green);
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();
        assert!(matches!(dominant_color(&path), Err(FolioError::Image { .. })));
    }
}
