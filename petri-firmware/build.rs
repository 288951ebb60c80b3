//! Build script for petri-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates petri.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("cannot create memory.x");
    f.write_all(memory_x).expect("cannot write memory.x");

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Keys accepted in each section
const SECTIONS: &[(&str, &[&str])] = &[
    ("display", &["address", "frequency"]),
    ("seed", &["channels", "max_polls", "fallback_seed"]),
    ("overlay", &["show_generation", "x", "y"]),
];

/// Validate petri.toml at compile time
///
/// The firmware parser only understands a subset of TOML and drops the whole
/// file on any error; this catches syntax errors, typos and out-of-range
/// values before flashing.
fn validate_config() {
    println!("cargo:rerun-if-changed=petri.toml");

    let config_path = Path::new("petri.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail(&[format!("Failed to read petri.toml: {}", e)]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(&[format!("Invalid TOML syntax in petri.toml: {}", e)]),
    };

    let mut errors = Vec::new();

    for (name, section) in config.as_table().into_iter().flatten() {
        let Some((_, keys)) = SECTIONS.iter().find(|(known, _)| *known == name.as_str()) else {
            errors.push(format!("Unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("Unknown key '{}' in [{}]", key, name));
            }
        }
    }

    let u32_max = i64::from(u32::MAX);
    check_integer(&config, "display", "address", 0..=0x7F, &mut errors);
    check_integer(&config, "display", "frequency", 1..=u32_max, &mut errors);
    check_integer(&config, "seed", "max_polls", 1..=u32_max, &mut errors);
    check_integer(&config, "seed", "fallback_seed", 0..=u32_max, &mut errors);
    check_integer(&config, "overlay", "x", 0..=255, &mut errors);
    check_integer(&config, "overlay", "y", 0..=255, &mut errors);

    match config.get("seed").and_then(|s| s.get("channels")) {
        Some(toml::Value::Array(channels)) => {
            if channels.is_empty() || channels.len() > 8 {
                errors.push("[seed] channels must list 1-8 ADC channels".to_string());
            }
            if channels
                .iter()
                .any(|c| !matches!(c.as_integer(), Some(0..=3)))
            {
                errors.push("[seed] channels must be noise inputs 0-3 (PA0..PA3)".to_string());
            }
        }
        Some(_) => errors.push("[seed] channels must be an array".to_string()),
        None => {}
    }

    match config.get("overlay").and_then(|o| o.get("show_generation")) {
        Some(toml::Value::Boolean(_)) | None => {}
        Some(_) => errors.push("[overlay] show_generation must be true or false".to_string()),
    }

    // The firmware's own parser has the last word, so the build and the
    // board accept exactly the same files
    if errors.is_empty() {
        if let Err(e) = petri_core::config::parse_config(&content) {
            errors.push(format!("Rejected by the firmware parser: {:?}", e));
        }
    }

    if !errors.is_empty() {
        fail(&errors);
    }
}

/// Require `[section] key`, when present, to be an integer within `range`
fn check_integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match config.get(section).and_then(|s| s.get(key)) {
        None => {}
        Some(toml::Value::Integer(value)) if range.contains(value) => {}
        Some(_) => errors.push(format!(
            "[{}] {} must be an integer in {}..={}",
            section,
            key,
            range.start(),
            range.end()
        )),
    }
}

/// Abort the build with a list of configuration errors
fn fail(errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid petri.toml                                       ║\n\
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
