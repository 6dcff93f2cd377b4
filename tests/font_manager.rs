//! Font manager against a skin directory on disk

use skinfont::display::{Display, ResolutionInfo};
use skinfont::font::rasterizer::{GlyphBitmap, GlyphFace, GlyphLoader, RasterParams};
use skinfont::font::{FontManager, FontPaths, GuiMessage, Notification, TtfRequest};
use skinfont::skin::{Skin, SkinResolution};
use skinfont::FontError;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

const FONT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fonts>
  <fontset id="Default" unicode="true">
    <font>
      <name>font13</name>
      <filename>arial.ttf</filename>
      <size>20</size>
    </font>
    <font>
      <name>font13_title</name>
      <filename>Arial.ttf</filename>
      <size>20</size>
      <color>highlight</color>
      <style>bold</style>
    </font>
    <font>
      <name>font30</name>
      <filename>arial.ttf</filename>
      <size>30</size>
      <shadow>ff000000</shadow>
    </font>
  </fontset>
  <fontset id="Large" unicode="true">
    <font><name>font13</name><filename>arial.ttf</filename><size>26</size></font>
  </fontset>
</fonts>"#;

const COLORS_XML: &str = r#"<colors>
  <color name="highlight">FFEB9E17</color>
</colors>"#;

struct Face;

impl GlyphFace for Face {
    fn line_height(&self) -> f32 {
        12.0
    }

    fn has_glyph(&self, _ch: char) -> bool {
        true
    }

    fn rasterize(&self, _ch: char) -> Option<GlyphBitmap> {
        None
    }
}

/// Records loaded paths instead of parsing glyph files
#[derive(Clone, Default)]
struct RecordingLoader {
    loads: Rc<RefCell<Vec<PathBuf>>>,
}

impl GlyphLoader for RecordingLoader {
    fn load(&self, path: &Path, _params: &RasterParams) -> anyhow::Result<Box<dyn GlyphFace>> {
        self.loads.borrow_mut().push(path.to_path_buf());
        if !path.exists() {
            anyhow::bail!("missing {}", path.display());
        }
        Ok(Box::new(Face))
    }
}

struct Fixture {
    root: TempDir,
    display: Rc<Display>,
    loader: RecordingLoader,
}

impl Fixture {
    fn new(resolution: ResolutionInfo) -> Self {
        let root = tempfile::tempdir().unwrap();
        let skin = root.path().join("skin");
        fs::create_dir_all(skin.join("720p")).unwrap();
        fs::create_dir_all(skin.join("fonts")).unwrap();
        fs::create_dir_all(skin.join("colors")).unwrap();
        fs::create_dir_all(root.path().join("user")).unwrap();
        fs::create_dir_all(root.path().join("system")).unwrap();
        fs::write(skin.join("720p/Font.xml"), FONT_XML).unwrap();
        fs::write(skin.join("colors/defaults.xml"), COLORS_XML).unwrap();
        fs::write(skin.join("fonts/arial.ttf"), b"glyphs").unwrap();
        fs::write(root.path().join("system/teletext.ttf"), b"glyphs").unwrap();
        fs::write(root.path().join("user/mine.ttf"), b"glyphs").unwrap();

        Self {
            root,
            display: Rc::new(Display::new(resolution)),
            loader: RecordingLoader::default(),
        }
    }

    fn skin_dir(&self) -> PathBuf {
        self.root.path().join("skin")
    }

    fn manager(&self) -> FontManager {
        let skin = Skin::new(
            self.skin_dir(),
            vec![
                SkinResolution::new("720p", 1280, 720),
                SkinResolution::new("1080i", 1920, 1080),
            ],
            "720p",
        );
        let paths = FontPaths::new(
            skin.font_dir(),
            self.root.path().join("user"),
            self.root.path().join("system"),
        );
        FontManager::new(skin, paths, self.display.clone())
            .with_loader(Box::new(self.loader.clone()))
    }

    fn load_count(&self) -> usize {
        self.loader.loads.borrow().len()
    }
}

fn hd() -> ResolutionInfo {
    ResolutionInfo::new(1280, 720, 1.0)
}

#[test]
fn test_load_font_set() {
    let fx = Fixture::new(hd());
    let mut manager = fx.manager();

    assert_eq!(manager.load_fonts("default").unwrap(), 3);
    assert!(manager.fontset_unicode());
    assert_eq!(manager.skin_resolution(), hd());

    let font13 = manager.font(manager.get_font("font13", false).unwrap()).unwrap();
    assert_eq!(font13.size(), 20.0);
    assert_eq!(font13.text_color(), 0);
    assert_eq!(font13.rasterizer().key().as_str(), "arial.ttf_20.000000_1.000000");
    assert_eq!(font13.rasterizer().path(), fx.skin_dir().join("fonts/arial.ttf"));

    let title = manager.font(manager.get_font("font13_title", false).unwrap()).unwrap();
    assert_eq!(title.text_color(), 0xFFEB9E17);
    assert!(Rc::ptr_eq(title.rasterizer(), font13.rasterizer()));

    let font30 = manager.font(manager.get_font("font30", false).unwrap()).unwrap();
    assert_eq!(font30.shadow_color(), 0xFF000000);

    assert_eq!(manager.cache().len(), 2);
    assert_eq!(fx.load_count(), 2);
}

#[test]
fn test_unknown_font_set_uses_first_unicode_set() {
    let fx = Fixture::new(hd());
    let mut manager = fx.manager();
    assert_eq!(manager.load_fonts("NoSuchSet").unwrap(), 3);
    assert!(manager.get_font("font30", false).is_some());
}

#[test]
fn test_fallback_lookup() {
    let fx = Fixture::new(hd());
    let mut manager = fx.manager();
    manager.load_fonts("Large").unwrap();

    let font13 = manager.get_font("font13", false);
    assert!(font13.is_some());
    assert_eq!(manager.get_font("font99", true), font13);
    assert_eq!(manager.get_font("font99", false), None);
    assert_eq!(manager.get_font("-", true), None);
}

#[test]
fn test_missing_font_document() {
    let fx = Fixture::new(hd());
    fs::remove_file(fx.skin_dir().join("720p/Font.xml")).unwrap();
    let mut manager = fx.manager();

    assert!(matches!(manager.load_fonts("Default"), Err(FontError::DocumentRead { .. })));
    assert!(manager.registry().is_empty());
    assert_eq!(manager.first_unicode_font_set(), None);
    assert!(!manager.is_font_set_unicode("Default"));
}

#[test]
fn test_font_set_queries() {
    let fx = Fixture::new(hd());
    let mut manager = fx.manager();
    assert_eq!(manager.first_unicode_font_set().as_deref(), Some("Default"));
    assert!(manager.is_font_set_unicode("large"));
    assert!(!manager.is_font_set_unicode("Missing"));
}

#[test]
fn test_document_for_active_resolution() {
    // No 1080i folder: the 720p document is rescaled up
    let fx = Fixture::new(ResolutionInfo::new(1920, 1080, 1.0));
    let mut manager = fx.manager();
    manager.load_fonts("Default").unwrap();
    let font13 = manager.font(manager.get_font("font13", false).unwrap()).unwrap();
    assert_eq!(font13.rasterizer().key().as_str(), "arial.ttf_30.000000_1.000000");
    assert_eq!(font13.size(), 20.0);

    // With a 1080i folder the document is authored for the display
    let fx = Fixture::new(ResolutionInfo::new(1920, 1080, 1.0));
    fs::create_dir_all(fx.skin_dir().join("1080i")).unwrap();
    fs::write(fx.skin_dir().join("1080i/Font.xml"), FONT_XML).unwrap();
    let mut manager = fx.manager();
    manager.load_fonts("Default").unwrap();
    assert_eq!(manager.skin_resolution(), ResolutionInfo::new(1920, 1080, 1.0));
    let font13 = manager.font(manager.get_font("font13", false).unwrap()).unwrap();
    assert_eq!(font13.rasterizer().key().as_str(), "arial.ttf_20.000000_1.000000");
}

#[test]
fn test_device_loss_and_reset() {
    let fx = Fixture::new(hd());
    let mut manager = fx.manager();
    let broadcasts = Rc::new(RefCell::new(Vec::<Notification>::new()));
    let sink = Rc::clone(&broadcasts);
    manager.set_notification_sink(Box::new(move |n: Notification| sink.borrow_mut().push(n)));

    manager.load_fonts("Default").unwrap();
    let handle = manager.get_font("font13", false).unwrap();
    assert_eq!(fx.load_count(), 2);

    manager.on_message(&GuiMessage::NotifyAll(Notification::RendererLost));
    fx.display.set_resolution(ResolutionInfo::new(1920, 1080, 1.0));
    manager.on_message(&GuiMessage::NotifyAll(Notification::WindowResize));
    assert_eq!(fx.load_count(), 2);
    assert!(broadcasts.borrow().is_empty());

    manager.on_message(&GuiMessage::NotifyAll(Notification::RendererReset));
    assert_eq!(*broadcasts.borrow(), vec![Notification::WindowResize]);

    let font13 = manager.font(handle).unwrap();
    assert_eq!(font13.rasterizer().key().as_str(), "arial.ttf_30.000000_1.000000");
    // 20 and 30 become 30 and 45; the old rasterizers are gone
    assert_eq!(manager.cache().len(), 2);
    assert_eq!(fx.load_count(), 4);
}

#[test]
fn test_substitutes_missing_glyph_file() {
    let fx = Fixture::new(hd());
    let mut manager = fx.manager();
    let handle = manager
        .load_ttf(&TtfRequest::new("symbols", "missing.ttf", 20))
        .unwrap();

    let font = manager.font(handle).unwrap();
    assert_eq!(font.name(), "symbols");
    assert_eq!(font.rasterizer().path(), fx.skin_dir().join("fonts/arial.ttf"));
    assert_eq!(
        fx.loader.loads.borrow()[0],
        fx.root.path().join("system/missing.ttf")
    );
}

#[test]
fn test_clear_and_switch_font_set() {
    let fx = Fixture::new(hd());
    let mut manager = fx.manager();
    manager.load_fonts("Default").unwrap();
    let old = manager.get_font("font13", false).unwrap();

    manager.clear();
    assert!(manager.font(old).is_err());
    assert_eq!(manager.get_font("font13", true), None);

    manager.load_fonts("Large").unwrap();
    let font13 = manager.font(manager.get_font("font13", false).unwrap()).unwrap();
    assert_eq!(font13.size(), 26.0);
    assert_eq!(manager.registry().len(), 1);
    assert_eq!(manager.cache().len(), 1);
}

#[test]
fn test_font_file_options() {
    let fx = Fixture::new(hd());
    let manager = fx.manager();
    let options = manager.font_file_options();
    assert_eq!(
        options,
        vec![
            ("teletext.ttf".to_string(), "teletext.ttf".to_string()),
            ("mine.ttf".to_string(), "mine.ttf".to_string()),
        ]
    );
}
