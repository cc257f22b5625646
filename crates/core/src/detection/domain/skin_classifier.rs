//! Rule-based skin colour classification on RGB triples.
//!
//! Deliberately permissive: the detector's temporal smoothing absorbs the
//! occasional false positive, while a missed face cannot be recovered.

/// Brightest channel must reach this value.
const MIN_BRIGHTNESS: u8 = 60;
/// Minimum `max - min` channel spread.
const MIN_CHANNEL_SPREAD: u8 = 15;

/// Normalised red chromaticity band `r / (r + g + b)`.
const RED_CHROMA_BAND: (f32, f32) = (0.36, 0.465);
/// Normalised green chromaticity band `g / (r + g + b)`.
const GREEN_CHROMA_BAND: (f32, f32) = (0.28, 0.363);

/// Pale skin: all channels bright, red and green close together.
const PALE_MIN: [u8; 3] = [221, 211, 171];
const PALE_MAX_RED_GREEN_GAP: u8 = 15;

pub fn is_skin(rgb: [u8; 3]) -> bool {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    if max < MIN_BRIGHTNESS {
        return false;
    }
    if max - min < MIN_CHANNEL_SPREAD {
        return false;
    }
    if r <= g || r <= b {
        return false;
    }

    in_chroma_band(r, g, b) || is_pale_skin(r, g, b)
}

fn in_chroma_band(r: u8, g: u8, b: u8) -> bool {
    let sum = r as f32 + g as f32 + b as f32;
    let rn = r as f32 / sum;
    let gn = g as f32 / sum;
    (RED_CHROMA_BAND.0..=RED_CHROMA_BAND.1).contains(&rn)
        && (GREEN_CHROMA_BAND.0..=GREEN_CHROMA_BAND.1).contains(&gn)
}

fn is_pale_skin(r: u8, g: u8, b: u8) -> bool {
    r >= PALE_MIN[0] && g >= PALE_MIN[1] && b >= PALE_MIN[2] && r - g <= PALE_MAX_RED_GREEN_GAP
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::medium([200, 150, 120])]
    #[case::tan([224, 172, 138])]
    #[case::pale([240, 228, 200])]
    #[case::very_pale([250, 240, 235])]
    fn test_accepts_skin_tones(#[case] rgb: [u8; 3]) {
        assert!(is_skin(rgb), "{rgb:?} should be skin");
    }

    #[rstest]
    #[case::black([0, 0, 0])]
    #[case::white([255, 255, 255])]
    #[case::gray([128, 128, 128])]
    #[case::too_dark([50, 35, 25])]
    #[case::green([50, 200, 50])]
    #[case::blue([40, 60, 200])]
    #[case::pure_red([255, 0, 0])]
    #[case::green_dominant_beige([200, 210, 150])]
    fn test_rejects_non_skin(#[case] rgb: [u8; 3]) {
        assert!(!is_skin(rgb), "{rgb:?} should not be skin");
    }

    #[test]
    fn test_pale_path_accepts_outside_chroma_band() {
        let rgb = [240, 228, 200];
        assert!(!in_chroma_band(rgb[0], rgb[1], rgb[2]));
        assert!(is_pale_skin(rgb[0], rgb[1], rgb[2]));
    }

    #[test]
    fn test_pale_path_needs_balanced_red_green() {
        assert!(!is_pale_skin(255, 230, 180));
        assert!(!is_pale_skin(250, 245, 160));
    }
}
