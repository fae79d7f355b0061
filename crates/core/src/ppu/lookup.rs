//! RGB lookup tables that turn 6-bit NES color indices into displayable colors.

use super::palette::IndexedPalette;
use crate::error::Error;
use crate::graphics::ColorOps;

/// Colors in every lookup table, one per NES color index.
pub const LOOKUP_COLORS: usize = 64;

/// Identifier the built-in table is always registered under.
pub const DEFAULT_LOOKUP_ID: &str = "Default";

// 2C02 master palette, packed as 0xFFRRGGBB.
const NES_DEFAULT_COLORS: [u32; LOOKUP_COLORS] = [
    0xFF6A6D6A, 0xFF001380, 0xFF1E008A, 0xFF39007A, 0xFF550056, 0xFF5A0018, 0xFF4F1000, 0xFF3D1C00,
    0xFF253200, 0xFF003D00, 0xFF004000, 0xFF003924, 0xFF002E55, 0xFF000000, 0xFF000000, 0xFF000000,
    0xFFB9BCB9, 0xFF1850C7, 0xFF4B30E3, 0xFF7322D6, 0xFF951FA9, 0xFF9D285C, 0xFF983700, 0xFF7F4C00,
    0xFF5E6400, 0xFF227700, 0xFF027E02, 0xFF007645, 0xFF006E8A, 0xFF000000, 0xFF000000, 0xFF000000,
    0xFFFFFFFF, 0xFF68A6FF, 0xFF8C9CFF, 0xFFB586FF, 0xFFD975FD, 0xFFE377B9, 0xFFE58D68, 0xFFD49D29,
    0xFFB3AF0C, 0xFF7BC211, 0xFF55CA47, 0xFF46CB81, 0xFF47C1C5, 0xFF4A4D4A, 0xFF000000, 0xFF000000,
    0xFFFFFFFF, 0xFFCCEAFF, 0xFFDDDEFF, 0xFFECDAFF, 0xFFF8D7FE, 0xFFFCD6F5, 0xFFFDDBCF, 0xFFF9E7B5,
    0xFFF1F0AA, 0xFFDAFAA9, 0xFFC9FFBC, 0xFFC3FBD7, 0xFFC4F6F6, 0xFFBEC1BE, 0xFF000000, 0xFF000000,
];

/// A named table of exactly 64 ARGB colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbLookup {
    id: String,
    colors: [u32; LOOKUP_COLORS],
}

impl RgbLookup {
    pub fn new(id: impl Into<String>, colors: &[u32]) -> Result<Self, Error> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::MissingLookupId);
        }
        let colors: [u32; LOOKUP_COLORS] =
            colors.try_into().map_err(|_| Error::SizeContract {
                what: "RGB lookup",
                expected: LOOKUP_COLORS,
                actual: colors.len(),
            })?;
        Ok(Self { id, colors })
    }

    /// Build a table from hex color strings such as `"6A6D6A"`.
    pub fn from_hex<S: AsRef<str>>(id: impl Into<String>, colors: &[S]) -> Result<Self, Error> {
        let parsed = colors
            .iter()
            .map(|c| ColorOps::parse_hex(c.as_ref()).ok_or_else(|| Error::InvalidColor(c.as_ref().to_string())))
            .collect::<Result<Vec<u32>, Error>>()?;
        Self::new(id, &parsed)
    }

    /// The built-in NES master palette registered as `"Default"`.
    pub fn nes_default() -> Self {
        Self {
            id: DEFAULT_LOOKUP_ID.to_string(),
            colors: NES_DEFAULT_COLORS,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn colors(&self) -> &[u32; LOOKUP_COLORS] {
        &self.colors
    }
}

impl IndexedPalette for RgbLookup {
    fn get_color(&self, index: usize) -> u32 {
        self.colors[index]
    }

    fn len(&self) -> usize {
        LOOKUP_COLORS
    }
}

/// Lookup tables resolvable by id. `"Default"` is always present.
#[derive(Debug, Clone)]
pub struct RgbLookupRegistry {
    tables: Vec<RgbLookup>,
}

impl Default for RgbLookupRegistry {
    fn default() -> Self {
        Self {
            tables: vec![RgbLookup::nes_default()],
        }
    }
}

impl RgbLookupRegistry {
    /// Register a table. Returns `false` if the id was already taken, in
    /// which case the earlier table keeps resolving.
    pub fn register(&mut self, lookup: RgbLookup) -> bool {
        if self.contains(lookup.id()) {
            return false;
        }
        self.tables.push(lookup);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tables.iter().any(|t| t.id == id)
    }

    pub fn get(&self, id: &str) -> Result<&RgbLookup, Error> {
        self.tables
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::UnknownLookup(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let lookup = RgbLookup::nes_default();
        assert_eq!(lookup.id(), "Default");
        assert_eq!(lookup.len(), 64);
        assert_eq!(lookup.get_color(0x00), 0xFF6A6D6A);
        assert_eq!(lookup.get_color(0x30), 0xFFFFFFFF);
        assert_eq!(lookup.get_color(0x0F), 0xFF000000);
    }

    #[test]
    fn test_color_index_past_table_fails() {
        let lookup = RgbLookup::nes_default();
        assert_eq!(lookup.color(0x3F), Ok(lookup.get_color(0x3F)));
        assert_eq!(
            lookup.color(0x45),
            Err(Error::Bounds {
                what: "color index",
                offset: 0x45,
                len: 1,
                available: 64
            })
        );
    }

    #[test]
    fn test_size_contract() {
        assert!(matches!(
            RgbLookup::new("Short", &[0u32; 63]),
            Err(Error::SizeContract { expected: 64, actual: 63, .. })
        ));
        assert!(RgbLookup::new("Long", &[0u32; 65]).is_err());
        assert!(RgbLookup::new("Exact", &[0u32; 64]).is_ok());
    }

    #[test]
    fn test_blank_id_rejected() {
        assert_eq!(RgbLookup::new("  ", &[0u32; 64]), Err(Error::MissingLookupId));
    }

    #[test]
    fn test_from_hex() {
        let mut colors = vec!["000000".to_string(); 64];
        colors[5] = "FF00FF".to_string();
        let lookup = RgbLookup::from_hex("Magenta", &colors).unwrap();
        assert_eq!(lookup.get_color(5), 0xFFFF00FF);

        colors[6] = "nope".to_string();
        assert_eq!(
            RgbLookup::from_hex("Magenta", &colors),
            Err(Error::InvalidColor("nope".to_string()))
        );
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = RgbLookupRegistry::default();
        assert!(registry.get("Default").is_ok());
        assert_eq!(
            registry.get("Custom").unwrap_err(),
            Error::UnknownLookup("Custom".to_string())
        );

        assert!(registry.register(RgbLookup::new("Custom", &[0xFF112233; 64]).unwrap()));
        assert_eq!(registry.get("Custom").unwrap().get_color(0), 0xFF112233);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["Default", "Custom"]);
    }

    #[test]
    fn test_registry_first_registration_wins() {
        let mut registry = RgbLookupRegistry::default();
        let shadow = RgbLookup::new("Default", &[0u32; 64]).unwrap();
        assert!(!registry.register(shadow));
        assert_eq!(registry.get("Default").unwrap(), &RgbLookup::nes_default());
    }
}
