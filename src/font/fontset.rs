//! Skin font document (Font.xml)
//!
//! ```xml
//! <fonts>
//!   <fontset id="Default" unicode="true">
//!     <font>
//!       <name>font13</name>
//!       <filename>arial.ttf</filename>
//!       <size>20</size>
//!       <style>bold uppercase</style>
//!     </font>
//!   </fontset>
//! </fonts>
//! ```
//!
//! Only unicode font-sets are supported; documents without `<fontset>`
//! (the single-set legacy layout) are rejected.

use super::path::has_glyph_extension;
use super::FontStyle;
use crate::constants::{DEFAULT_ASPECT, DEFAULT_FONT_SIZE, DEFAULT_LINE_SPACING};
use crate::error::{FontError, FontResult};
use log::{debug, info, warn};
use roxmltree::Node;
use std::path::{Path, PathBuf};

/// One `<font>` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FontDeclaration {
    pub name: String,
    /// Glyph file name, lower-cased
    pub file_name: String,
    /// Raw `<color>` token (resolved against the skin color table)
    pub color: Option<String>,
    /// Raw `<shadow>` token
    pub shadow: Option<String>,
    pub size: i32,
    pub style: FontStyle,
    pub line_spacing: f32,
    pub aspect: f32,
}

/// One `<fontset>`
#[derive(Debug, Clone, PartialEq)]
pub struct FontSet {
    pub id: Option<String>,
    pub unicode: bool,
    pub fonts: Vec<FontDeclaration>,
}

/// Parsed font document
#[derive(Debug, Clone)]
pub struct FontDocument {
    path: PathBuf,
    /// Tag of the first element under `<fonts>`
    first_tag: Option<String>,
    sets: Vec<FontSet>,
}

impl FontDocument {
    /// Read and parse a font document
    pub fn open(path: &Path) -> FontResult<Self> {
        info!("Loading fonts from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| FontError::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse document text; `path` is only used in messages
    pub fn parse(content: &str, path: &Path) -> FontResult<Self> {
        let doc = roxmltree::Document::parse(content).map_err(|source| FontError::DocumentParse {
            path: path.to_path_buf(),
            source,
        })?;

        let root = doc.root_element();
        if !root.has_tag_name("fonts") {
            return Err(FontError::InvalidRoot {
                path: path.to_path_buf(),
                found: root.tag_name().name().to_string(),
            });
        }

        let first_tag = root
            .children()
            .find(Node::is_element)
            .map(|node| node.tag_name().name().to_string());
        let sets = root
            .children()
            .filter(|node| node.has_tag_name("fontset"))
            .map(parse_font_set)
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            first_tag,
            sets,
        })
    }

    pub fn font_sets(&self) -> &[FontSet] {
        &self.sets
    }

    /// Select the unicode font-set named `name` (case-insensitive).
    ///
    /// Falls back to the first unicode font-set if there is no unicode
    /// set with that name. A non-unicode set is never selected.
    pub fn select_font_set(&self, name: &str) -> FontResult<&FontSet> {
        self.check_layout()?;

        let mut fallback: Option<&str> = None;
        for set in &self.sets {
            let Some(id) = set.id.as_deref() else {
                continue;
            };
            if fallback.is_none() && set.unicode {
                fallback = Some(id);
            }
            if id.eq_ignore_ascii_case(name) {
                if set.unicode {
                    return Ok(set);
                }
                debug!("Skipping non-unicode <fontset> '{}'", id);
            }
        }

        warn!(
            "{} doesn't have <fontset> with name '{}', defaulting to first fontset",
            self.path.display(),
            name
        );
        fallback
            .and_then(|id| self.find_unicode_set(id))
            .ok_or_else(|| FontError::FontSetNotFound(name.to_string()))
    }

    /// Id of the first unicode font-set
    pub fn first_unicode_font_set(&self) -> FontResult<Option<&str>> {
        self.check_layout()?;
        let found = self
            .sets
            .iter()
            .find(|set| set.unicode && set.id.is_some())
            .and_then(|set| set.id.as_deref());
        if found.is_none() {
            warn!("{} doesn't have <fontset> with attribute unicode=\"true\"", self.path.display());
        }
        Ok(found)
    }

    /// Whether the first font-set named `name` is unicode
    pub fn is_font_set_unicode(&self, name: &str) -> bool {
        self.sets
            .iter()
            .find(|set| set.id.as_deref().is_some_and(|id| id.eq_ignore_ascii_case(name)))
            .is_some_and(|set| set.unicode)
    }

    fn check_layout(&self) -> FontResult<()> {
        match self.first_tag.as_deref() {
            Some("fontset") => Ok(()),
            other => Err(FontError::LegacyDocument {
                found: other.unwrap_or("").to_string(),
            }),
        }
    }

    fn find_unicode_set(&self, id: &str) -> Option<&FontSet> {
        self.sets.iter().find(|set| {
            set.unicode && set.id.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(id))
        })
    }
}

fn parse_font_set(node: Node) -> FontSet {
    let unicode = node
        .attribute("unicode")
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));
    let fonts = node
        .children()
        .filter(|child| child.has_tag_name("font"))
        .filter_map(parse_font)
        .collect();
    FontSet {
        id: node.attribute("id").map(str::to_string),
        unicode,
        fonts,
    }
}

/// Parse a `<font>`; None if the name or a usable filename is missing
fn parse_font(node: Node) -> Option<FontDeclaration> {
    let Some(name) = child_text(node, "name") else {
        debug!("Skipping <font> without <name>");
        return None;
    };
    let Some(file_name) = child_text(node, "filename").map(|f| f.to_lowercase()) else {
        debug!("Skipping font '{}' without <filename>", name);
        return None;
    };
    if !has_glyph_extension(&file_name) {
        warn!("Skipping font '{}': unsupported glyph file '{}'", name, file_name);
        return None;
    }

    let size = child_text(node, "size")
        .and_then(|text| leading_int(&text))
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_FONT_SIZE);
    let style = child_text(node, "style")
        .map(|tokens| FontStyle::from_tokens(&tokens))
        .unwrap_or_default();

    Some(FontDeclaration {
        name,
        file_name,
        color: child_text(node, "color"),
        shadow: child_text(node, "shadow"),
        size,
        style,
        line_spacing: child_parse(node, "linespacing").unwrap_or(DEFAULT_LINE_SPACING),
        aspect: child_parse(node, "aspect").unwrap_or(DEFAULT_ASPECT),
    })
}

fn child_text(node: Node, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Integer prefix of `text` (`"24.5"` → 24, `"12px"` → 12)
fn leading_int(text: &str) -> Option<i32> {
    let end = text
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    text[..end].parse().ok()
}

fn child_parse<T: std::str::FromStr>(node: Node, tag: &str) -> Option<T> {
    child_text(node, tag).and_then(|text| text.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fonts>
  <fontset id="Legacy">
    <font><name>font13</name><filename>legacy.ttf</filename></font>
  </fontset>
  <fontset id="Default" unicode="true">
    <font>
      <name>font10</name>
      <filename>Arial.TTF</filename>
      <size>-3</size>
      <style>bolditalics lowercase</style>
      <linespacing>1.25</linespacing>
      <aspect>0.8</aspect>
      <color>white</color>
      <shadow>FF000000</shadow>
    </font>
    <font><filename>noname.ttf</filename></font>
    <font><name>nofile</name></font>
    <font><name>bitmap</name><filename>font.xpr</filename></font>
    <font><name>font13</name><filename>arial.ttf</filename><size>abc</size></font>
  </fontset>
  <fontset id="Arial" unicode="TRUE">
    <font><name>font13</name><filename>arial.ttf</filename><size>30</size></font>
  </fontset>
</fonts>"#;

    fn doc() -> FontDocument {
        FontDocument::parse(DOC, Path::new("Font.xml")).unwrap()
    }

    #[test]
    fn test_parse_declarations() {
        let doc = doc();
        assert_eq!(doc.font_sets().len(), 3);
        let set = doc.select_font_set("default").unwrap();
        assert_eq!(set.id.as_deref(), Some("Default"));
        assert_eq!(set.fonts.len(), 2);

        let font10 = &set.fonts[0];
        assert_eq!(font10.name, "font10");
        assert_eq!(font10.file_name, "arial.ttf");
        assert_eq!(font10.size, 20);
        assert_eq!(
            font10.style,
            FontStyle::BOLD | FontStyle::ITALICS | FontStyle::LOWERCASE
        );
        assert_eq!(font10.line_spacing, 1.25);
        assert_eq!(font10.aspect, 0.8);
        assert_eq!(font10.color.as_deref(), Some("white"));
        assert_eq!(font10.shadow.as_deref(), Some("FF000000"));

        let font13 = &set.fonts[1];
        assert_eq!(font13.size, 20);
        assert_eq!(font13.style, FontStyle::empty());
        assert_eq!(font13.line_spacing, 1.0);
        assert_eq!(font13.aspect, 1.0);
        assert_eq!(font13.color, None);
    }

    #[test]
    fn test_size_integer_prefix() {
        let doc = FontDocument::parse(
            r#"<fonts><fontset id="Sizes" unicode="true">
                 <font><name>a</name><filename>a.ttf</filename><size>24.5</size></font>
                 <font><name>b</name><filename>a.ttf</filename><size> 18px</size></font>
                 <font><name>c</name><filename>a.ttf</filename><size>-4</size></font>
                 <font><name>d</name><filename>a.ttf</filename><size>+16</size></font>
               </fontset></fonts>"#,
            Path::new("Font.xml"),
        )
        .unwrap();
        let sizes: Vec<i32> = doc.font_sets()[0].fonts.iter().map(|f| f.size).collect();
        assert_eq!(sizes, vec![24, 18, 20, 16]);
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int("-"), None);
    }

    #[test]
    fn test_non_unicode_set_is_skipped() {
        let doc = doc();
        assert!(!doc.is_font_set_unicode("Legacy"));
        let set = doc.select_font_set("Legacy").unwrap();
        assert_eq!(set.id.as_deref(), Some("Default"));
    }

    #[test]
    fn test_unknown_set_falls_back_to_first_unicode() {
        let doc = doc();
        let set = doc.select_font_set("NoSuchSet").unwrap();
        assert_eq!(set.id.as_deref(), Some("Default"));
        assert_eq!(doc.first_unicode_font_set().unwrap(), Some("Default"));
        assert!(doc.is_font_set_unicode("arial"));
    }

    #[test]
    fn test_no_unicode_set() {
        let doc = FontDocument::parse(
            r#"<fonts><fontset id="Old">
                 <font><name>a</name><filename>a.ttf</filename></font>
               </fontset></fonts>"#,
            Path::new("Font.xml"),
        )
        .unwrap();
        assert!(matches!(
            doc.select_font_set("Old"),
            Err(FontError::FontSetNotFound(name)) if name == "Old"
        ));
        assert_eq!(doc.first_unicode_font_set().unwrap(), None);
    }

    #[test]
    fn test_wrong_root() {
        let err = FontDocument::parse("<window/>", Path::new("Font.xml")).unwrap_err();
        assert!(matches!(err, FontError::InvalidRoot { found, .. } if found == "window"));
    }

    #[test]
    fn test_legacy_layout() {
        let doc = FontDocument::parse(
            r#"<fonts><!-- old -->
                 <font><name>font13</name><filename>a.ttf</filename></font>
               </fonts>"#,
            Path::new("Font.xml"),
        )
        .unwrap();
        assert!(matches!(
            doc.select_font_set("Default"),
            Err(FontError::LegacyDocument { found }) if found == "font"
        ));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            FontDocument::parse("<fonts><fontset>", Path::new("Font.xml")),
            Err(FontError::DocumentParse { .. })
        ));
        assert!(matches!(
            FontDocument::open(Path::new("/nonexistent/Font.xml")),
            Err(FontError::DocumentRead { .. })
        ));
    }
}
