//! Build script for valentine-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml and bakes it into `board_config.rs`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// RP2040 SPI: clk_peri 125 MHz, prescale 2..=254, post-divide 1..=256
const MIN_BUS_HZ: i64 = 1_923;
const MAX_BUS_HZ: i64 = 62_500_000;

/// Glyphs that fit across the 128 px panel at 6 px each
const MAX_LINE_CHARS: usize = 21;
const MAX_LINES: usize = 4;

fn main() {
    setup_linker();
    let config = load_config();
    write_board_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of board.toml
struct BoardConfig {
    clock_hz: u32,
    baudrate: u32,
    banner: String,
    lines: Vec<String>,
}

/// Read and validate board.toml
fn load_config() -> BoardConfig {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the valentine-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let clock_hz = match config.get("bus").and_then(|b| b.get("clock_hz")) {
        Some(toml::Value::Integer(hz)) if (MIN_BUS_HZ..=MAX_BUS_HZ).contains(hz) => *hz as u32,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[bus] clock_hz must be {}-{}",
                MIN_BUS_HZ, MAX_BUS_HZ
            ));
            0
        }
        Some(_) => {
            errors.push("[bus] clock_hz must be an integer".to_string());
            0
        }
        None => {
            errors.push("[bus] missing 'clock_hz'".to_string());
            0
        }
    };

    let terminal = config.get("terminal");

    let baudrate = match terminal.and_then(|t| t.get("baudrate")) {
        Some(toml::Value::Integer(baud)) if (1_200..=921_600).contains(baud) => *baud as u32,
        Some(_) => {
            errors.push("[terminal] baudrate must be 1200-921600".to_string());
            0
        }
        None => 115_200,
    };

    let banner = match terminal.and_then(|t| t.get("banner")) {
        Some(toml::Value::String(s)) => s.clone(),
        Some(_) => {
            errors.push("[terminal] banner must be a string".to_string());
            String::new()
        }
        None => {
            errors.push("[terminal] missing 'banner'".to_string());
            String::new()
        }
    };

    let mut lines = Vec::new();
    match config.get("message").and_then(|m| m.get("lines")) {
        Some(toml::Value::Array(items)) => {
            if items.is_empty() || items.len() > MAX_LINES {
                errors.push(format!("[message] lines must have 1-{} entries", MAX_LINES));
            }
            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(line) if line.chars().count() <= MAX_LINE_CHARS => {
                        lines.push(line.to_string())
                    }
                    Some(_) => errors.push(format!(
                        "[message] line {} longer than {} characters",
                        i, MAX_LINE_CHARS
                    )),
                    None => errors.push(format!("[message] line {} must be a string", i)),
                }
            }
        }
        Some(_) => errors.push("[message] lines must be an array".to_string()),
        None => errors.push("[message] missing 'lines'".to_string()),
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
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

    println!("cargo:warning=board.toml validated successfully");

    BoardConfig {
        clock_hz,
        baudrate,
        banner,
        lines,
    }
}

/// Emit the validated values as Rust constants into OUT_DIR
fn write_board_config(config: &BoardConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("board_config.rs")).unwrap();

    let lines = config
        .lines
        .iter()
        .map(|l| format!("{:?}", l))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(f, "// Generated from board.toml by build.rs").unwrap();
    writeln!(f, "pub const BUS_CLOCK_HZ: u32 = {};", config.clock_hz).unwrap();
    writeln!(f, "pub const TERMINAL_BAUDRATE: u32 = {};", config.baudrate).unwrap();
    writeln!(f, "pub const BANNER: &str = {:?};", config.banner).unwrap();
    writeln!(f, "pub const MESSAGE: &[&str] = &[{}];", lines).unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
