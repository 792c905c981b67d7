//! Mesh materials: base color plus an emissive tint used for selection
//! highlighting.

/// Surface appearance of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color (0xRRGGBB).
    pub color: u32,
    /// Additive emissive tint (0xRRGGBB), 0 when not highlighted.
    pub emissive: u32,
    disposed: bool,
}

impl Material {
    pub fn new(color: u32) -> Self {
        Self {
            color,
            emissive: 0,
            disposed: false,
        }
    }

    pub fn set_emissive(&mut self, emissive: u32) {
        self.emissive = emissive;
    }

    /// Release GPU-side resources. Returns `false` if already released.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Base color plus emissive, as linear RGBA for the shader.
    pub fn shaded_rgba(&self) -> [f32; 4] {
        let base = rgb_to_linear(self.color);
        let glow = rgb_to_linear(self.emissive);
        [
            (base[0] + glow[0]).min(1.0),
            (base[1] + glow[1]).min(1.0),
            (base[2] + glow[2]).min(1.0),
            1.0,
        ]
    }
}

/// Convert 0xRRGGBB (sRGB) into linear RGB components.
pub fn rgb_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_is_idempotent() {
        let mut material = Material::new(0x4f79ff);
        assert!(material.dispose());
        assert!(!material.dispose());
        assert!(material.is_disposed());
    }

    #[test]
    fn test_rgb_to_linear_extremes() {
        assert_eq!(rgb_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = rgb_to_linear(0xffffff);
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_emissive_brightens() {
        let mut material = Material::new(0x202020);
        let plain = material.shaded_rgba();
        material.set_emissive(0x223366);
        let lit = material.shaded_rgba();
        assert!(lit[2] > plain[2]);
    }
}
