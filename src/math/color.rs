// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

use cgmath::Vector3;
use ordered_float::NotNan;
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

/// A linear RGB color, banning NaN in its components so the type stays `Eq`.
///
/// Channels are not clamped to `[0, 1]` during rendering; radiance accumulates unbounded
/// until [`Rgb::to_saturating_8bit`] clamps at the very end, matching the integrator's
/// habit of adding emission, reflection, and refraction contributions before any clamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(Vector3<NotNan<f32>>);

impl Default for Rgb {
    /// Black, so a builder can derive `Default` and leave a background color unset.
    fn default() -> Rgb {
        Rgb::ZERO
    }
}

impl Rgb {
    pub const ZERO: Rgb = Rgb::from_const(0.0, 0.0, 0.0);
    pub const BLACK: Rgb = Rgb::ZERO;
    pub const WHITE: Rgb = Rgb::from_const(1.0, 1.0, 1.0);

    const fn from_const(r: f32, g: f32, b: f32) -> Rgb {
        // SAFETY: only ever called with the literal constants above, none of which are NaN.
        unsafe {
            Rgb(Vector3::new(
                NotNan::unchecked_new(r),
                NotNan::unchecked_new(g),
                NotNan::unchecked_new(b),
            ))
        }
    }

    /// Panics if any channel is NaN.
    pub fn new(r: f32, g: f32, b: f32) -> Rgb {
        Rgb(Vector3::new(
            NotNan::new(r).expect("Rgb component was NaN"),
            NotNan::new(g).expect("Rgb component was NaN"),
            NotNan::new(b).expect("Rgb component was NaN"),
        ))
    }

    pub fn red(self) -> f32 {
        self.0.x.into_inner()
    }
    pub fn green(self) -> f32 {
        self.0.y.into_inner()
    }
    pub fn blue(self) -> f32 {
        self.0.z.into_inner()
    }

    /// The largest channel value; used for contribution-pruning comparisons.
    pub fn max_channel(self) -> f32 {
        self.red().max(self.green()).max(self.blue())
    }

    /// Componentwise `exp(-self * distance)`, the Beer–Lambert attenuation factor.
    pub fn beer_lambert(absorption: Rgb, distance: f32) -> Rgb {
        Rgb::new(
            (-absorption.red() * distance).exp(),
            (-absorption.green() * distance).exp(),
            (-absorption.blue() * distance).exp(),
        )
    }

    /// Componentwise `self^gamma`, applied before quantization.
    pub fn powf(self, gamma: f32) -> Rgb {
        Rgb::new(
            self.red().max(0.0).powf(gamma),
            self.green().max(0.0).powf(gamma),
            self.blue().max(0.0).powf(gamma),
        )
    }

    pub fn clamp01(self) -> Rgb {
        Rgb::new(self.red().clamp(0.0, 1.0), self.green().clamp(0.0, 1.0), self.blue().clamp(0.0, 1.0))
    }

    /// Quantizes to 8-bit-per-channel, clamping to `[0, 1]` first. `round(255 * c)`.
    pub fn to_saturating_8bit(self) -> [u8; 3] {
        let c = self.clamp01();
        [
            (c.red() * 255.0).round() as u8,
            (c.green() * 255.0).round() as u8,
            (c.blue() * 255.0).round() as u8,
        ]
    }

    /// True if the color is bright enough to be considered "a light" (`r+g+b > 1e-4`).
    pub fn is_emissive(self) -> bool {
        (self.red() + self.green() + self.blue()) > 1e-4
    }
}

impl TryFrom<Vector3<f32>> for Rgb {
    type Error = ordered_float::FloatIsNan;
    fn try_from(v: Vector3<f32>) -> Result<Rgb, Self::Error> {
        Ok(Rgb(Vector3::new(NotNan::new(v.x)?, NotNan::new(v.y)?, NotNan::new(v.z)?)))
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb({}, {}, {})", self.red(), self.green(), self.blue())
    }
}

impl Add for Rgb {
    type Output = Rgb;
    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.red() + rhs.red(), self.green() + rhs.green(), self.blue() + rhs.blue())
    }
}

impl AddAssign for Rgb {
    fn add_assign(&mut self, rhs: Rgb) {
        *self = *self + rhs;
    }
}

impl Sub for Rgb {
    type Output = Rgb;
    fn sub(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.red() - rhs.red(), self.green() - rhs.green(), self.blue() - rhs.blue())
    }
}

/// Componentwise product — two colors modulating each other (e.g. surface color times
/// incoming light), not a dot product.
impl Mul<Rgb> for Rgb {
    type Output = Rgb;
    fn mul(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.red() * rhs.red(), self.green() * rhs.green(), self.blue() * rhs.blue())
    }
}

impl Mul<f32> for Rgb {
    type Output = Rgb;
    fn mul(self, rhs: f32) -> Rgb {
        Rgb::new(self.red() * rhs, self.green() * rhs, self.blue() * rhs)
    }
}
