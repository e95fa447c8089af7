//! Build script for facebot-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates face.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

mod budget {
    include!("src/budget.rs");
}

/// Largest panel side the firmware heap is sized for
const MAX_SIDE: i64 = 320;

/// Heart pool capacity in facebot-core
const MAX_HEARTS: i64 = 6;

const PALETTE_KEYS: &[&str] = &[
    "background",
    "eye_white",
    "pupil",
    "highlight",
    "mouth",
    "mouth_interior",
    "heart_a",
    "heart_b",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate face.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=face.toml");
    println!("cargo:rerun-if-changed=src/budget.rs");

    let config_path = Path::new("face.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: face.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds face.toml at build time.                    ║\n\
            ║  Please create one in the facebot-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read face.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in face.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_palette(&config, &mut errors);
    validate_hearts(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in face.toml                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=face.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_int(
    table: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    required: bool,
    errors: &mut Vec<String>,
) {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(v)) => errors.push(format!(
            "[{}] {} = {} is outside {}..={}",
            section, key, v, min, max
        )),
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
        None if required => errors.push(format!("[{}] {} is required", section, key)),
        None => {}
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        errors.push("Missing [display] section".to_string());
        return;
    };
    check_int(display, "display", "width", 1, MAX_SIDE, true, errors);
    check_int(display, "display", "height", 1, MAX_SIDE, true, errors);
    if let (Some(w), Some(h)) = (
        display.get("width").and_then(|v| v.as_integer()),
        display.get("height").and_then(|v| v.as_integer()),
    ) {
        if w > 0 && h > 0 && !budget::framebuffer_fits((w * h) as usize) {
            errors.push(format!(
                "[display] {}x{} framebuffer needs {} bytes, heap allows {}",
                w,
                h,
                w * h * 2,
                budget::HEAP_SIZE - budget::HEAP_SLACK
            ));
        }
    }
    if let Some(bl) = display.get("backlight") {
        if !bl.is_bool() {
            errors.push("[display] backlight must be true or false".to_string());
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(timing) = config.get("timing") {
        check_int(timing, "timing", "frame_ms", 1, 1000, false, errors);
        check_int(timing, "timing", "blink_ms", 1, 5000, false, errors);
    }
}

fn validate_palette(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(palette) = config.get("palette").and_then(|p| p.as_table()) else {
        return;
    };
    for (key, value) in palette {
        if !PALETTE_KEYS.contains(&key.as_str()) {
            errors.push(format!("[palette] unknown colour '{}'", key));
            continue;
        }
        let valid = value.as_str().is_some_and(|s| {
            let digits = s.strip_prefix('#').unwrap_or(s);
            digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
        });
        if !valid {
            errors.push(format!("[palette] {} must be \"#RRGGBB\"", key));
        }
    }
}

fn validate_hearts(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(hearts) = config.get("hearts") {
        check_int(hearts, "hearts", "max_visible", 0, MAX_HEARTS, false, errors);
    }
}
