//! skinfont - inspect a skin's fonts
//!
//! Loads a font-set the way the GUI would and prints the fonts it
//! registered together with the rasterizer each one shares.

use anyhow::{anyhow, Context, Result};
use log::info;
use skinfont::config::Config;
use skinfont::font::FontManager;
use std::path::PathBuf;
use std::rc::Rc;

/// Print help message
fn print_help() {
    println!(
        r#"skinfont {} - skin font manager

USAGE:
    skinfont [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --config PATH           Load settings from PATH
    --skin DIR              Skin root directory (overrides config)
    --font-set NAME         Font-set to load (overrides config)
    --list-files            List glyph files available in settings

CONFIG FILE:
    $SKINFONT_CONFIG
    ~/.config/skinfont/config.toml
    /etc/skinfont/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Value following `flag`, if the flag is present
fn option_value(args: &[String], flag: &str) -> Result<Option<String>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow!("{} requires a value", flag)),
        None => Ok(None),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("skinfont {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut cfg = match option_value(&args, "--config")? {
        Some(path) => Config::load_from_file(&PathBuf::from(path))?,
        None => Config::load(),
    };
    if let Some(skin) = option_value(&args, "--skin")? {
        cfg.skin.path = skin;
    }
    if let Some(font_set) = option_value(&args, "--font-set")? {
        cfg.skin.font_set = font_set;
    }

    let skin = cfg.skin.to_skin();
    let paths = cfg.paths.to_font_paths(&skin);
    let display = Rc::new(cfg.display.to_display());
    info!("Skin: {}", skin.root().display());
    let mut manager = FontManager::new(skin, paths, display);

    if args.iter().any(|a| a == "--list-files") {
        for (label, _) in manager.font_file_options() {
            println!("{}", label);
        }
        return Ok(());
    }

    manager
        .load_fonts(&cfg.skin.font_set)
        .with_context(|| format!("Failed to load font-set '{}'", cfg.skin.font_set))?;

    let source = manager.skin_resolution();
    println!(
        "Font-set '{}' (skin resolution {}x{}, unicode: {})",
        cfg.skin.font_set,
        source.width,
        source.height,
        manager.fontset_unicode()
    );
    for (_, font, origin) in manager.registry().iter() {
        println!(
            "  {:<24} size {:>3}  style {:<24} {}",
            font.name(),
            origin.size,
            format!("{:?}", font.style()),
            font.rasterizer().key()
        );
    }
    println!("{} fonts, {} font files", manager.registry().len(), manager.cache().len());
    Ok(())
}
