//! Per-cell material indices.

/// Material indices of one grid cell, as packed into a face's material
/// raster (red = complex material, green = biome, blue = ore).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialSample {
    /// Ore deposit index.
    pub ore: u8,
    /// Biome index.
    pub biome: u8,
    /// Complex material index; drives ice classification.
    pub complex: u8,
}

impl MaterialSample {
    /// Complex material index of ice sheets.
    pub const ICE_COMPLEX: u8 = 82;
    /// Complex material index of bare default terrain.
    pub const DEFAULT_COMPLEX: u8 = 0;

    /// Unpack an RGB material raster pixel.
    #[inline]
    #[must_use]
    pub fn from_rgb([complex, biome, ore]: [u8; 3]) -> Self {
        Self { ore, biome, complex }
    }

    /// Whether the cell is marked as ice.
    #[must_use]
    pub fn is_ice(self) -> bool {
        self.complex == Self::ICE_COMPLEX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_unpack_in_raster_order() {
        let m = MaterialSample::from_rgb([82, 7, 3]);
        assert_eq!(m.complex, 82);
        assert_eq!(m.biome, 7);
        assert_eq!(m.ore, 3);
        assert!(m.is_ice());
    }
}
