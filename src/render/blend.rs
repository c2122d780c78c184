//! Per-pixel alpha compositing and blend modes
//!
//! Implements the 26 standard canvas compositing operators over straight
//! (non-premultiplied) RGBA. The Porter-Duff operators follow the general
//! `co = Fa*as*Cs + Fb*ab*Cb` form; blend modes mix the source color with
//! the backdrop (`(1 - ab)*Cs + ab*B(Cb, Cs)`) and then composite
//! source-over. Non-separable modes (hue, saturation, color, luminosity)
//! use the set-luminosity / set-saturation helpers on whole color triples.

use image::Rgba;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Pixel-blending rule applied when drawing a sample image onto existing
/// surface content
///
/// Variants carry the canvas `globalCompositeOperation` names, available
/// through [`CompositeMode::name`] and parsed back via [`FromStr`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeMode {
    /// Source drawn over the destination (the canvas default)
    #[default]
    SourceOver,
    /// Source kept only where the destination is opaque
    SourceIn,
    /// Source kept only where the destination is transparent
    SourceOut,
    /// Source drawn only onto opaque destination, destination kept elsewhere
    SourceAtop,
    /// Destination drawn over the source
    DestinationOver,
    /// Destination kept only where the source is opaque
    DestinationIn,
    /// Destination kept only where the source is transparent
    DestinationOut,
    /// Destination kept only onto opaque source, source kept elsewhere
    DestinationAtop,
    /// Sum of source and destination, clamped per channel
    Lighter,
    /// Source replaces the destination
    Copy,
    /// Source and destination kept where they do not overlap
    Xor,
    /// Product of source and destination channels
    Multiply,
    /// Inverted product of the inverted channels
    Screen,
    /// Multiply or screen depending on the backdrop channel
    Overlay,
    /// Channel-wise minimum
    Darken,
    /// Channel-wise maximum
    Lighten,
    /// Brightens the backdrop toward the source
    ColorDodge,
    /// Darkens the backdrop toward the source
    ColorBurn,
    /// Multiply or screen depending on the source channel
    HardLight,
    /// Soft variant of hard-light
    SoftLight,
    /// Absolute channel difference
    Difference,
    /// Difference with lower contrast
    Exclusion,
    /// Hue of the source with backdrop saturation and luminosity
    Hue,
    /// Saturation of the source with backdrop hue and luminosity
    Saturation,
    /// Hue and saturation of the source with backdrop luminosity
    Color,
    /// Luminosity of the source with backdrop hue and saturation
    Luminosity,
}

/// All compositing modes in canvas declaration order, for UI display
pub const ALL_MODES: [CompositeMode; 26] = [
    CompositeMode::SourceOver,
    CompositeMode::SourceIn,
    CompositeMode::SourceOut,
    CompositeMode::SourceAtop,
    CompositeMode::DestinationOver,
    CompositeMode::DestinationIn,
    CompositeMode::DestinationOut,
    CompositeMode::DestinationAtop,
    CompositeMode::Lighter,
    CompositeMode::Copy,
    CompositeMode::Xor,
    CompositeMode::Multiply,
    CompositeMode::Screen,
    CompositeMode::Overlay,
    CompositeMode::Darken,
    CompositeMode::Lighten,
    CompositeMode::ColorDodge,
    CompositeMode::ColorBurn,
    CompositeMode::HardLight,
    CompositeMode::SoftLight,
    CompositeMode::Difference,
    CompositeMode::Exclusion,
    CompositeMode::Hue,
    CompositeMode::Saturation,
    CompositeMode::Color,
    CompositeMode::Luminosity,
];

impl CompositeMode {
    /// All compositing modes in canvas declaration order
    pub const fn all() -> &'static [Self] {
        &ALL_MODES
    }

    /// Canonical canvas operation name
    pub const fn name(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::SourceIn => "source-in",
            Self::SourceOut => "source-out",
            Self::SourceAtop => "source-atop",
            Self::DestinationOver => "destination-over",
            Self::DestinationIn => "destination-in",
            Self::DestinationOut => "destination-out",
            Self::DestinationAtop => "destination-atop",
            Self::Lighter => "lighter",
            Self::Copy => "copy",
            Self::Xor => "xor",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }

    /// Whether this mode is a Porter-Duff operator rather than a blend mode
    const fn is_porter_duff(self) -> bool {
        matches!(
            self,
            Self::SourceOver
                | Self::SourceIn
                | Self::SourceOut
                | Self::SourceAtop
                | Self::DestinationOver
                | Self::DestinationIn
                | Self::DestinationOut
                | Self::DestinationAtop
                | Self::Lighter
                | Self::Copy
                | Self::Xor
        )
    }
}

impl fmt::Display for CompositeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error produced when parsing an unknown compositing mode name
#[derive(Debug, Clone)]
pub struct UnknownCompositeMode {
    name: String,
}

impl fmt::Display for UnknownCompositeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown compositing mode '{}'", self.name)
    }
}

impl Error for UnknownCompositeMode {}

impl FromStr for CompositeMode {
    type Err = UnknownCompositeMode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ALL_MODES
            .iter()
            .find(|mode| mode.name() == s)
            .copied()
            .ok_or_else(|| UnknownCompositeMode {
                name: s.to_string(),
            })
    }
}

/// Composite one source pixel over one destination pixel
///
/// `alpha` is the global alpha multiplier applied to the source pixel's own
/// alpha before compositing; it does not affect the destination.
pub fn composite_pixel(dst: Rgba<u8>, src: Rgba<u8>, mode: CompositeMode, alpha: f32) -> Rgba<u8> {
    let sa = (f32::from(src[3]) / 255.0) * alpha.clamp(0.0, 1.0);

    // Fast path: an invisible source pixel leaves source-over output unchanged
    if sa <= 0.0 && mode == CompositeMode::SourceOver {
        return dst;
    }

    let sc = [
        f32::from(src[0]) / 255.0,
        f32::from(src[1]) / 255.0,
        f32::from(src[2]) / 255.0,
    ];
    let da = f32::from(dst[3]) / 255.0;
    let dc = [
        f32::from(dst[0]) / 255.0,
        f32::from(dst[1]) / 255.0,
        f32::from(dst[2]) / 255.0,
    ];

    let (out_c, out_a) = if mode.is_porter_duff() {
        porter_duff(dc, da, sc, sa, mode)
    } else {
        blend_then_over(dc, da, sc, sa, mode)
    };

    Rgba([
        (out_c[0] * 255.0).clamp(0.0, 255.0).round() as u8,
        (out_c[1] * 255.0).clamp(0.0, 255.0).round() as u8,
        (out_c[2] * 255.0).clamp(0.0, 255.0).round() as u8,
        (out_a * 255.0).clamp(0.0, 255.0).round() as u8,
    ])
}

/// Porter-Duff compositing with per-operator source/destination fractions
fn porter_duff(
    dc: [f32; 3],
    da: f32,
    sc: [f32; 3],
    sa: f32,
    mode: CompositeMode,
) -> ([f32; 3], f32) {
    // `lighter` is the plus operator: premultiplied sum clamped per channel
    if mode == CompositeMode::Lighter {
        let out_a = (sa + da).min(1.0);
        if out_a <= 0.0 {
            return ([0.0; 3], 0.0);
        }
        let out = [
            (sc[0] * sa + dc[0] * da).min(1.0) / out_a,
            (sc[1] * sa + dc[1] * da).min(1.0) / out_a,
            (sc[2] * sa + dc[2] * da).min(1.0) / out_a,
        ];
        return (out, out_a);
    }

    let (fa, fb) = match mode {
        CompositeMode::SourceOver => (1.0, 1.0 - sa),
        CompositeMode::SourceIn => (da, 0.0),
        CompositeMode::SourceOut => (1.0 - da, 0.0),
        CompositeMode::SourceAtop => (da, 1.0 - sa),
        CompositeMode::DestinationOver => (1.0 - da, 1.0),
        CompositeMode::DestinationIn => (0.0, sa),
        CompositeMode::DestinationOut => (0.0, 1.0 - sa),
        CompositeMode::DestinationAtop => (1.0 - da, sa),
        CompositeMode::Copy => (1.0, 0.0),
        CompositeMode::Xor => (1.0 - da, 1.0 - sa),
        _ => (1.0, 1.0 - sa),
    };

    let out_a = fa * sa + fb * da;
    if out_a <= 0.0 {
        return ([0.0; 3], 0.0);
    }
    let out = [
        (fa * sa * sc[0] + fb * da * dc[0]) / out_a,
        (fa * sa * sc[1] + fb * da * dc[1]) / out_a,
        (fa * sa * sc[2] + fb * da * dc[2]) / out_a,
    ];
    (out, out_a)
}

/// Apply a blend mode against the backdrop, then composite source-over
fn blend_then_over(
    dc: [f32; 3],
    da: f32,
    sc: [f32; 3],
    sa: f32,
    mode: CompositeMode,
) -> ([f32; 3], f32) {
    let blended = match mode {
        CompositeMode::Hue => set_lum(&set_sat(&sc, sat(&dc)), lum(&dc)),
        CompositeMode::Saturation => set_lum(&set_sat(&dc, sat(&sc)), lum(&dc)),
        CompositeMode::Color => set_lum(&sc, lum(&dc)),
        CompositeMode::Luminosity => set_lum(&dc, lum(&sc)),
        _ => [
            blend_channel(dc[0], sc[0], mode),
            blend_channel(dc[1], sc[1], mode),
            blend_channel(dc[2], sc[2], mode),
        ],
    };

    // Mix toward the blended color by backdrop coverage, then source-over
    let mixed = [
        (1.0 - da) * sc[0] + da * blended[0],
        (1.0 - da) * sc[1] + da * blended[1],
        (1.0 - da) * sc[2] + da * blended[2],
    ];

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return ([0.0; 3], 0.0);
    }
    let out = [
        (mixed[0] * sa + dc[0] * da * (1.0 - sa)) / out_a,
        (mixed[1] * sa + dc[1] * da * (1.0 - sa)) / out_a,
        (mixed[2] * sa + dc[2] * da * (1.0 - sa)) / out_a,
    ];
    (out, out_a)
}

/// Separable blend function on one channel pair
fn blend_channel(base: f32, top: f32, mode: CompositeMode) -> f32 {
    match mode {
        CompositeMode::Multiply => base * top,
        CompositeMode::Screen => base + top - base * top,
        CompositeMode::Overlay => hard_light_channel(top, base),
        CompositeMode::Darken => base.min(top),
        CompositeMode::Lighten => base.max(top),
        CompositeMode::ColorDodge => color_dodge_channel(base, top),
        CompositeMode::ColorBurn => color_burn_channel(base, top),
        CompositeMode::HardLight => hard_light_channel(base, top),
        CompositeMode::SoftLight => soft_light_channel(base, top),
        CompositeMode::Difference => (base - top).abs(),
        CompositeMode::Exclusion => base + top - 2.0 * base * top,
        _ => top,
    }
}

fn hard_light_channel(base: f32, top: f32) -> f32 {
    if top <= 0.5 {
        2.0 * base * top
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - top)
    }
}

fn color_dodge_channel(base: f32, top: f32) -> f32 {
    if base <= 0.0 {
        0.0
    } else if top >= 1.0 {
        1.0
    } else {
        (base / (1.0 - top)).min(1.0)
    }
}

fn color_burn_channel(base: f32, top: f32) -> f32 {
    if base >= 1.0 {
        1.0
    } else if top <= 0.0 {
        0.0
    } else {
        1.0 - ((1.0 - base) / top).min(1.0)
    }
}

fn soft_light_channel(base: f32, top: f32) -> f32 {
    if top <= 0.5 {
        base - (1.0 - 2.0 * top) * base * (1.0 - base)
    } else {
        let d = if base <= 0.25 {
            ((16.0 * base - 12.0) * base + 4.0) * base
        } else {
            base.sqrt()
        };
        base + (2.0 * top - 1.0) * (d - base)
    }
}

// Non-separable blend helpers over whole color triples

fn lum(c: &[f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn sat(c: &[f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(&c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 {
        for channel in &mut out {
            *channel = l + (*channel - l) * l / (l - n);
        }
    }
    if x > 1.0 {
        for channel in &mut out {
            *channel = l + (*channel - l) * (1.0 - l) / (x - l);
        }
    }
    out
}

fn set_lum(c: &[f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn set_sat(c: &[f32; 3], s: f32) -> [f32; 3] {
    let lo = c[0].min(c[1]).min(c[2]);
    let hi = c[0].max(c[1]).max(c[2]);
    if hi <= lo {
        return [0.0; 3];
    }
    // Rescales so the max channel lands on `s`, the min on zero, and the
    // mid channel keeps its relative position
    let scale = |v: f32| (v - lo) * s / (hi - lo);
    [scale(c[0]), scale(c[1]), scale(c[2])]
}
