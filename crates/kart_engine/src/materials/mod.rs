//! Surface material tags
//!
//! Maps the per-triangle material ids of a mesh to gameplay surface tags.
//! The ids come from whatever material library the embedding application
//! loads; this module only cares about the handful of names that change how
//! a vehicle behaves.

/// Gameplay classification of a track surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// Regular track surface
    Road,
    /// High-friction surface off the track
    Grass,
    /// Repels the vehicle backwards on contact
    Bounce,
    /// Launches the vehicle forward on contact
    Boost,
    /// Start/finish surface, drives like road
    Checkerboard,
    /// No surface (airborne, or the material is not special)
    #[default]
    None,
}

impl Surface {
    /// Parse a material-library name into a surface tag.
    ///
    /// Unknown names map to [`Surface::None`]; surrounding whitespace is
    /// ignored since material files often carry trailing blanks.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "Road" => Self::Road,
            "Grass" => Self::Grass,
            "Bounce" => Self::Bounce,
            "Boost" => Self::Boost,
            "Checkerboard" => Self::Checkerboard,
            _ => Self::None,
        }
    }

    /// Whether this surface counts as being on the track proper
    pub fn is_road(self) -> bool {
        matches!(self, Self::Road | Self::Checkerboard)
    }
}

/// Lookup table from mesh material id to surface tag
#[derive(Debug, Clone, Default)]
pub struct SurfaceMap {
    surfaces: Vec<Surface>,
}

impl SurfaceMap {
    /// Build the table from material names in id order
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            surfaces: names
                .iter()
                .map(|name| Surface::from_name(name.as_ref()))
                .collect(),
        }
    }

    /// Build the table directly from surface tags in id order
    pub fn from_surfaces(surfaces: Vec<Surface>) -> Self {
        Self { surfaces }
    }

    /// Surface tag for a material id; unknown ids are [`Surface::None`]
    pub fn surface(&self, material: u32) -> Surface {
        self.surfaces
            .get(material as usize)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Surface::from_name("Grass"), Surface::Grass);
        assert_eq!(Surface::from_name("  Boost  "), Surface::Boost);
        assert_eq!(Surface::from_name("Gravel"), Surface::None);
    }

    #[test]
    fn test_is_road() {
        assert!(Surface::Road.is_road());
        assert!(Surface::Checkerboard.is_road());
        assert!(!Surface::Grass.is_road());
        assert!(!Surface::None.is_road());
    }

    #[test]
    fn test_surface_map_lookup() {
        let map = SurfaceMap::from_names(&["Road", "Grass", "Boost"]);
        assert_eq!(map.surface(0), Surface::Road);
        assert_eq!(map.surface(1), Surface::Grass);
        assert_eq!(map.surface(2), Surface::Boost);
        // Out of range ids are not an error
        assert_eq!(map.surface(99), Surface::None);
    }
}
