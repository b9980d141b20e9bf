//! Surface materials.
//!
//! A material is a base color plus a set of behavior flags. The flags are
//! orthogonal toggles that can be OR'ed together; the shading engine
//! evaluates them in a fixed precedence order, so a material carrying
//! several of them always shades the same way.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use lux_math::Vec3;

/// Color type alias (linear RGB, 0-1 for reflectance, unbounded for emission)
pub type Color = Vec3;

/// Behavior toggles of a [`Material`].
///
/// The empty set means plain Phong shading.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaterialFlags(u32);

impl MaterialFlags {
    /// Mirror reflection, blended with the local shading by `reflectivity`.
    pub const REFLECTION: Self = Self(1 << 2);
    /// Transmission through the surface following Snell's law.
    pub const REFRACTION: Self = Self(1 << 3);
    /// Procedural checkerboard modulation of the base color.
    pub const CHECKERED: Self = Self(1 << 4);
    /// Debug output of the surface normal as a color.
    pub const NORMAL: Self = Self(1 << 5);
    /// Monte Carlo indirect diffuse lighting.
    pub const GLOBAL_ILLUM: Self = Self(1 << 7);

    const NAMES: [(Self, &'static str); 5] = [
        (Self::REFLECTION, "reflection"),
        (Self::REFRACTION, "refraction"),
        (Self::CHECKERED, "checkered"),
        (Self::NORMAL, "normal"),
        (Self::GLOBAL_ILLUM, "global_illum"),
    ];

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Look up a flag by its lowercase name (`"reflection"`, `"global_illum"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(flag, _)| *flag)
    }
}

impl BitOr for MaterialFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MaterialFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MaterialFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "MaterialFlags({})", names.join(" | "))
    }
}

/// Material properties of a scene object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Base color (RGB, 0-1)
    pub color: Color,

    /// Emitted radiance; any nonzero channel makes the object a light
    pub emission: Color,

    /// Ambient coefficient
    pub ka: f64,

    /// Diffuse coefficient
    pub kd: f64,

    /// Specular coefficient
    pub ks: f64,

    /// Phong exponent for the specular highlight
    pub shininess: f64,

    /// Weight of the mirrored radiance when `REFLECTION` is set (0-1)
    pub reflectivity: f64,

    /// Relative index of refraction used when `REFRACTION` is set
    pub ior: f64,

    pub flags: MaterialFlags,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::new(0.5, 0.5, 0.5),
            emission: Color::ZERO,
            ka: 0.1,
            kd: 0.9,
            ks: 0.2,
            shininess: 32.0,
            reflectivity: 0.8,
            ior: 1.5,
            flags: MaterialFlags::empty(),
        }
    }
}

impl Material {
    /// Create a Phong material with the given base color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// A material that only emits light.
    pub fn light(emission: Color) -> Self {
        Self {
            color: Color::ZERO,
            emission,
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, flags: MaterialFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    /// Set the ambient, diffuse and specular coefficients.
    pub fn with_coefficients(mut self, ka: f64, kd: f64, ks: f64) -> Self {
        self.ka = ka;
        self.kd = kd;
        self.ks = ks;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f64) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    pub fn with_ior(mut self, ior: f64) -> Self {
        self.ior = ior;
        self
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission.max_element() > 0.0
    }

    #[inline]
    pub fn has(&self, flag: MaterialFlags) -> bool {
        self.flags.contains(flag)
    }
}
