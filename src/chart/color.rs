//! Continuous color ramps for the heatmap cells and the legend strip.
//!
//! Ramps are lookup tables of evenly spaced sRGB control points sampled from the
//! matplotlib originals. A ramp either interpolates linearly between its points
//! or, when the table is dense enough, picks the bin `t` falls into the way d3's
//! `interpolateInferno` does.

use std::fmt;
use std::fmt::{Display, Formatter};

/// An 8-bit sRGB color, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Builds a color from a `0xrrggbb` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            let value = a as f64 + (b as f64 - a as f64) * t;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb(
            mix(self.0, other.0),
            mix(self.1, other.1),
            mix(self.2, other.2),
        )
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// How a ramp turns `t` into a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sampling {
    /// Linear interpolation between the two neighbouring points.
    Linear,
    /// `points[floor(t * n)]`, clamped to the last point.
    Stepped,
}

/// A continuous color ramp defined by evenly spaced control points.
#[derive(Debug)]
pub struct ColorRamp {
    name: &'static str,
    sampling: Sampling,
    points: &'static [Rgb],
}

impl ColorRamp {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sample the ramp at `t`, clamped to `[0, 1]`. NaN samples the start.
    pub fn sample(&self, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self.points {
            [] => Rgb(0, 0, 0),
            [only] => *only,
            points if self.sampling == Sampling::Stepped => {
                let n = points.len();
                points[((t * n as f64) as usize).min(n - 1)]
            }
            points => {
                let n = points.len();
                let scaled = t * (n - 1) as f64;
                let lo = (scaled as usize).min(n - 2);
                let frac = scaled - lo as f64;
                points[lo].lerp(points[lo + 1], frac)
            }
        }
    }

    /// `steps` colors sampled at `0, 1/steps, 2/steps, ...`, stopping short of 1.
    pub fn swatches(&self, steps: usize) -> Vec<Rgb> {
        (0..steps)
            .map(|i| self.sample(i as f64 / steps as f64))
            .collect()
    }

    /// First and last colors of the ramp.
    pub fn extremes(&self) -> (Rgb, Rgb) {
        (self.sample(0.0), self.sample(1.0))
    }
}

/// Perceptually uniform, dark-to-bright. Near-black for cold, pale yellow for hot.
///
/// The 256-entry matplotlib table, sampled in bins like d3's `interpolateInferno`.
pub static INFERNO: ColorRamp = ColorRamp {
    name: "inferno",
    sampling: Sampling::Stepped,
    points: &[
        Rgb::from_hex(0x000004), // 0   - near-black
        Rgb::from_hex(0x010005),
        Rgb::from_hex(0x010106),
        Rgb::from_hex(0x010108),
        Rgb::from_hex(0x02010a),
        Rgb::from_hex(0x02020c),
        Rgb::from_hex(0x02020e),
        Rgb::from_hex(0x030210),
        Rgb::from_hex(0x040312),
        Rgb::from_hex(0x040314),
        Rgb::from_hex(0x050417),
        Rgb::from_hex(0x060419),
        Rgb::from_hex(0x07051b),
        Rgb::from_hex(0x08051d),
        Rgb::from_hex(0x09061f),
        Rgb::from_hex(0x0a0722),
        Rgb::from_hex(0x0b0724),
        Rgb::from_hex(0x0c0826),
        Rgb::from_hex(0x0d0829),
        Rgb::from_hex(0x0e092b),
        Rgb::from_hex(0x10092d),
        Rgb::from_hex(0x110a30),
        Rgb::from_hex(0x120a32),
        Rgb::from_hex(0x140b34),
        Rgb::from_hex(0x150b37),
        Rgb::from_hex(0x160b39),
        Rgb::from_hex(0x180c3c),
        Rgb::from_hex(0x190c3e),
        Rgb::from_hex(0x1b0c41),
        Rgb::from_hex(0x1c0c43),
        Rgb::from_hex(0x1e0c45),
        Rgb::from_hex(0x1f0c48),
        Rgb::from_hex(0x210c4a),
        Rgb::from_hex(0x230c4c),
        Rgb::from_hex(0x240c4f),
        Rgb::from_hex(0x260c51),
        Rgb::from_hex(0x280b53),
        Rgb::from_hex(0x290b55),
        Rgb::from_hex(0x2b0b57),
        Rgb::from_hex(0x2d0b59),
        Rgb::from_hex(0x2f0a5b),
        Rgb::from_hex(0x310a5c),
        Rgb::from_hex(0x320a5e),
        Rgb::from_hex(0x340a5f),
        Rgb::from_hex(0x360961),
        Rgb::from_hex(0x380962),
        Rgb::from_hex(0x390963),
        Rgb::from_hex(0x3b0964),
        Rgb::from_hex(0x3d0965),
        Rgb::from_hex(0x3e0966),
        Rgb::from_hex(0x400a67),
        Rgb::from_hex(0x420a68),
        Rgb::from_hex(0x440a68),
        Rgb::from_hex(0x450a69),
        Rgb::from_hex(0x470b6a),
        Rgb::from_hex(0x490b6a),
        Rgb::from_hex(0x4a0c6b),
        Rgb::from_hex(0x4c0c6b),
        Rgb::from_hex(0x4d0d6c),
        Rgb::from_hex(0x4f0d6c),
        Rgb::from_hex(0x510e6c),
        Rgb::from_hex(0x520e6d),
        Rgb::from_hex(0x540f6d),
        Rgb::from_hex(0x550f6d),
        Rgb::from_hex(0x57106e),
        Rgb::from_hex(0x59106e),
        Rgb::from_hex(0x5a116e),
        Rgb::from_hex(0x5c126e),
        Rgb::from_hex(0x5d126e),
        Rgb::from_hex(0x5f136e),
        Rgb::from_hex(0x61136e),
        Rgb::from_hex(0x62146e),
        Rgb::from_hex(0x64156e),
        Rgb::from_hex(0x65156e),
        Rgb::from_hex(0x67166e),
        Rgb::from_hex(0x69166e),
        Rgb::from_hex(0x6a176e),
        Rgb::from_hex(0x6c186e),
        Rgb::from_hex(0x6d186e),
        Rgb::from_hex(0x6f196e),
        Rgb::from_hex(0x71196e),
        Rgb::from_hex(0x721a6e),
        Rgb::from_hex(0x741a6e),
        Rgb::from_hex(0x751b6e),
        Rgb::from_hex(0x771c6d),
        Rgb::from_hex(0x781c6d),
        Rgb::from_hex(0x7a1d6d),
        Rgb::from_hex(0x7c1d6d),
        Rgb::from_hex(0x7d1e6d),
        Rgb::from_hex(0x7f1e6c),
        Rgb::from_hex(0x801f6c),
        Rgb::from_hex(0x82206c),
        Rgb::from_hex(0x84206b),
        Rgb::from_hex(0x85216b),
        Rgb::from_hex(0x87216b),
        Rgb::from_hex(0x88226a),
        Rgb::from_hex(0x8a226a),
        Rgb::from_hex(0x8c2369),
        Rgb::from_hex(0x8d2369),
        Rgb::from_hex(0x8f2469),
        Rgb::from_hex(0x902568),
        Rgb::from_hex(0x922568),
        Rgb::from_hex(0x932667),
        Rgb::from_hex(0x952667),
        Rgb::from_hex(0x972766),
        Rgb::from_hex(0x982766),
        Rgb::from_hex(0x9a2865),
        Rgb::from_hex(0x9b2964),
        Rgb::from_hex(0x9d2964),
        Rgb::from_hex(0x9f2a63),
        Rgb::from_hex(0xa02a63),
        Rgb::from_hex(0xa22b62),
        Rgb::from_hex(0xa32c61),
        Rgb::from_hex(0xa52c60),
        Rgb::from_hex(0xa62d60),
        Rgb::from_hex(0xa82e5f),
        Rgb::from_hex(0xa92e5e),
        Rgb::from_hex(0xab2f5e),
        Rgb::from_hex(0xad305d),
        Rgb::from_hex(0xae305c),
        Rgb::from_hex(0xb0315b),
        Rgb::from_hex(0xb1325a),
        Rgb::from_hex(0xb3325a),
        Rgb::from_hex(0xb43359),
        Rgb::from_hex(0xb63458),
        Rgb::from_hex(0xb73557),
        Rgb::from_hex(0xb93556),
        Rgb::from_hex(0xba3655),
        Rgb::from_hex(0xbc3754), // 0.5
        Rgb::from_hex(0xbd3853),
        Rgb::from_hex(0xbf3952),
        Rgb::from_hex(0xc03a51),
        Rgb::from_hex(0xc13a50),
        Rgb::from_hex(0xc33b4f),
        Rgb::from_hex(0xc43c4e),
        Rgb::from_hex(0xc63d4d),
        Rgb::from_hex(0xc73e4c),
        Rgb::from_hex(0xc83f4b),
        Rgb::from_hex(0xca404a),
        Rgb::from_hex(0xcb4149),
        Rgb::from_hex(0xcc4248),
        Rgb::from_hex(0xce4347),
        Rgb::from_hex(0xcf4446),
        Rgb::from_hex(0xd04545),
        Rgb::from_hex(0xd24644),
        Rgb::from_hex(0xd34743),
        Rgb::from_hex(0xd44842),
        Rgb::from_hex(0xd54a41),
        Rgb::from_hex(0xd74b3f),
        Rgb::from_hex(0xd84c3e),
        Rgb::from_hex(0xd94d3d),
        Rgb::from_hex(0xda4e3c),
        Rgb::from_hex(0xdb503b),
        Rgb::from_hex(0xdd513a),
        Rgb::from_hex(0xde5238),
        Rgb::from_hex(0xdf5337),
        Rgb::from_hex(0xe05536),
        Rgb::from_hex(0xe15635),
        Rgb::from_hex(0xe25734),
        Rgb::from_hex(0xe35933),
        Rgb::from_hex(0xe45a31),
        Rgb::from_hex(0xe55c30),
        Rgb::from_hex(0xe65d2f),
        Rgb::from_hex(0xe75e2e),
        Rgb::from_hex(0xe8602d),
        Rgb::from_hex(0xe9612b),
        Rgb::from_hex(0xea632a),
        Rgb::from_hex(0xeb6429),
        Rgb::from_hex(0xeb6628),
        Rgb::from_hex(0xec6726),
        Rgb::from_hex(0xed6925),
        Rgb::from_hex(0xee6a24),
        Rgb::from_hex(0xef6c23),
        Rgb::from_hex(0xef6e21),
        Rgb::from_hex(0xf06f20),
        Rgb::from_hex(0xf1711f),
        Rgb::from_hex(0xf1731d),
        Rgb::from_hex(0xf2741c),
        Rgb::from_hex(0xf3761b),
        Rgb::from_hex(0xf37819),
        Rgb::from_hex(0xf47918),
        Rgb::from_hex(0xf57b17),
        Rgb::from_hex(0xf57d15),
        Rgb::from_hex(0xf67e14),
        Rgb::from_hex(0xf68013),
        Rgb::from_hex(0xf78212),
        Rgb::from_hex(0xf78410),
        Rgb::from_hex(0xf8850f),
        Rgb::from_hex(0xf8870e),
        Rgb::from_hex(0xf8890c),
        Rgb::from_hex(0xf98b0b),
        Rgb::from_hex(0xf98c0a),
        Rgb::from_hex(0xf98e09),
        Rgb::from_hex(0xfa9008),
        Rgb::from_hex(0xfa9207),
        Rgb::from_hex(0xfa9407),
        Rgb::from_hex(0xfb9606),
        Rgb::from_hex(0xfb9706),
        Rgb::from_hex(0xfb9906),
        Rgb::from_hex(0xfb9b06),
        Rgb::from_hex(0xfb9d07),
        Rgb::from_hex(0xfc9f07),
        Rgb::from_hex(0xfca108),
        Rgb::from_hex(0xfca309),
        Rgb::from_hex(0xfca50a),
        Rgb::from_hex(0xfca60c),
        Rgb::from_hex(0xfca80d),
        Rgb::from_hex(0xfcaa0f),
        Rgb::from_hex(0xfcac11),
        Rgb::from_hex(0xfcae12),
        Rgb::from_hex(0xfcb014),
        Rgb::from_hex(0xfcb216),
        Rgb::from_hex(0xfcb418),
        Rgb::from_hex(0xfbb61a),
        Rgb::from_hex(0xfbb81d),
        Rgb::from_hex(0xfbba1f),
        Rgb::from_hex(0xfbbc21),
        Rgb::from_hex(0xfbbe23),
        Rgb::from_hex(0xfac026),
        Rgb::from_hex(0xfac228),
        Rgb::from_hex(0xfac42a),
        Rgb::from_hex(0xfac62d),
        Rgb::from_hex(0xf9c72f),
        Rgb::from_hex(0xf9c932),
        Rgb::from_hex(0xf9cb35),
        Rgb::from_hex(0xf8cd37),
        Rgb::from_hex(0xf8cf3a),
        Rgb::from_hex(0xf7d13d),
        Rgb::from_hex(0xf7d340),
        Rgb::from_hex(0xf6d543),
        Rgb::from_hex(0xf6d746),
        Rgb::from_hex(0xf5d949),
        Rgb::from_hex(0xf5db4c),
        Rgb::from_hex(0xf4dd4f),
        Rgb::from_hex(0xf4df53),
        Rgb::from_hex(0xf4e156),
        Rgb::from_hex(0xf3e35a),
        Rgb::from_hex(0xf3e55d),
        Rgb::from_hex(0xf2e661),
        Rgb::from_hex(0xf2e865),
        Rgb::from_hex(0xf2ea69),
        Rgb::from_hex(0xf1ec6d),
        Rgb::from_hex(0xf1ed71),
        Rgb::from_hex(0xf1ef75),
        Rgb::from_hex(0xf1f179),
        Rgb::from_hex(0xf2f27d),
        Rgb::from_hex(0xf2f482),
        Rgb::from_hex(0xf3f586),
        Rgb::from_hex(0xf3f68a),
        Rgb::from_hex(0xf4f88e),
        Rgb::from_hex(0xf5f992),
        Rgb::from_hex(0xf6fa96),
        Rgb::from_hex(0xf8fb9a),
        Rgb::from_hex(0xf9fc9d),
        Rgb::from_hex(0xfafda1),
        Rgb::from_hex(0xfcffa4), // 1   - pale yellow
    ],
};

/// Perceptually uniform, purple through teal to yellow.
pub static VIRIDIS: ColorRamp = ColorRamp {
    name: "viridis",
    sampling: Sampling::Linear,
    points: &[
        Rgb::from_hex(0x440154),
        Rgb::from_hex(0x482475),
        Rgb::from_hex(0x414487),
        Rgb::from_hex(0x355f8d),
        Rgb::from_hex(0x2a788e),
        Rgb::from_hex(0x21918c),
        Rgb::from_hex(0x22a884),
        Rgb::from_hex(0x44bf70),
        Rgb::from_hex(0x7ad151),
        Rgb::from_hex(0xbddf26),
        Rgb::from_hex(0xfde725),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes_match_palette_ends() {
        assert_eq!(INFERNO.sample(0.0), Rgb(0x00, 0x00, 0x04));
        assert_eq!(INFERNO.sample(1.0), Rgb(0xfc, 0xff, 0xa4));
        assert_eq!(INFERNO.extremes(), (INFERNO.sample(0.0), INFERNO.sample(1.0)));
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        assert_eq!(INFERNO.sample(-3.0), INFERNO.sample(0.0));
        assert_eq!(INFERNO.sample(7.5), INFERNO.sample(1.0));
        assert_eq!(INFERNO.sample(f64::NAN), INFERNO.sample(0.0));
    }

    #[test]
    fn test_inferno_samples_bins_of_the_full_table() {
        assert_eq!(INFERNO.points.len(), 256);
        assert_eq!(INFERNO.sample(0.1), Rgb::from_hex(0x160b39));
        assert_eq!(INFERNO.sample(0.25), Rgb::from_hex(0x57106e));
        assert_eq!(INFERNO.sample(0.5), Rgb::from_hex(0xbc3754));
        assert_eq!(INFERNO.sample(0.7), Rgb::from_hex(0xf37819));
        assert_eq!(INFERNO.sample(0.75), Rgb::from_hex(0xf98e09));
        // Everything in the same 1/256 bin gets the same color.
        assert_eq!(INFERNO.sample(0.5 + 0.5 / 256.0), INFERNO.sample(0.5));
        assert_ne!(INFERNO.sample(0.5 + 1.0 / 256.0), INFERNO.sample(0.5));
    }

    #[test]
    fn test_linear_ramp_interpolates_between_points() {
        assert_eq!(VIRIDIS.sample(0.1), Rgb::from_hex(0x482475));
        assert_eq!(VIRIDIS.sample(0.025), Rgb(0x45, 0x0a, 0x5c));
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Rgb(252, 255, 164).to_string(), "#fcffa4");
        assert_eq!(Rgb(0, 0, 4).to_string(), "#000004");
    }

    #[test]
    fn test_swatches_stop_short_of_one() {
        let swatches = INFERNO.swatches(4);
        assert_eq!(swatches.len(), 4);
        assert_eq!(swatches[0], INFERNO.sample(0.0));
        assert_eq!(swatches[3], INFERNO.sample(0.75));
    }
}
