//! Color parsing utilities
//!
//! Skin colors are ARGB `u32` values written as hex (`AARRGGBB`,
//! `RRGGBB`, `#` prefix allowed) or as names defined in the skin's
//! color table.

use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// ARGB color value (0xAARRGGBB)
pub type Color = u32;

/// Parse a hex color token into ARGB.
/// `AARRGGBB` is taken as-is, `RRGGBB` becomes fully opaque.
/// Returns None on invalid input.
pub fn parse_argb(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        8 => u32::from_str_radix(hex, 16).ok(),
        6 => u32::from_str_radix(hex, 16).ok().map(|rgb| 0xFF00_0000 | rgb),
        _ => None,
    }
}

/// Named colors declared by a skin
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    colors: HashMap<String, Color>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `<colors><color name="...">AARRGGBB</color></colors>`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read color table: {}", path.display()))?;
        let table = Self::parse(&content)
            .with_context(|| format!("Failed to parse color table: {}", path.display()))?;
        info!("Loaded {} skin colors from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(content)?;
        let mut table = Self::new();
        for node in doc.root_element().children().filter(|n| n.has_tag_name("color")) {
            let (Some(name), Some(text)) = (node.attribute("name"), node.text()) else {
                continue;
            };
            match parse_argb(text) {
                Some(color) => table.insert(name, color),
                None => debug!("Ignoring skin color '{}' with value '{}'", name, text.trim()),
            }
        }
        Ok(table)
    }

    pub fn insert(&mut self, name: &str, color: Color) {
        self.colors.insert(name.to_ascii_lowercase(), color);
    }

    /// Resolve a color token: named colors first, then hex
    pub fn resolve(&self, token: &str) -> Option<Color> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        self.colors
            .get(&token.to_ascii_lowercase())
            .copied()
            .or_else(|| parse_argb(token))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_argb() {
        assert_eq!(parse_argb("FFFF0000"), Some(0xFFFF0000));
        assert_eq!(parse_argb("80ffffff"), Some(0x80FFFFFF));
        assert_eq!(parse_argb("00ff00"), Some(0xFF00FF00));
        assert_eq!(parse_argb("#0000ff"), Some(0xFF0000FF));
        assert_eq!(parse_argb("f00"), None);
        assert_eq!(parse_argb("invalid"), None);
        assert_eq!(parse_argb("+fffffff"), None);
    }

    #[test]
    fn test_color_table_names() {
        let table = ColorTable::parse(
            r#"<colors>
                 <color name="white">FFFFFFFF</color>
                 <color name="Shadow">FF000000</color>
                 <color name="broken">zz</color>
               </colors>"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("white"), Some(0xFFFFFFFF));
        assert_eq!(table.resolve("shadow"), Some(0xFF000000));
        assert_eq!(table.resolve("FF112233"), Some(0xFF112233));
        assert_eq!(table.resolve("broken"), None);
        assert_eq!(table.resolve(""), None);
    }
}
