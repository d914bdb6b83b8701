//! Build automation tasks for the led-matrix-mux project.
//!
//! Run with: `cargo xtask <command>`

mod bitmap_gen;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::{Command, ExitCode};

/// Demo binaries, without the `demo_` prefix.
const DEMOS: [&str; 2] = ["diagonal_7x7", "blink_7x7"];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for led-matrix-mux", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: build lib, demos, run host tests, generate docs
    CheckAll,
    /// Build library with specified features
    Build {
        #[arg(long, default_value = "pico1")]
        board: Board,
        #[arg(long, default_value = "arm")]
        arch: Arch,
        /// Log every tick and write over defmt
        #[arg(long)]
        trace: bool,
    },
    /// Build a demo
    Demo {
        /// Demo name (e.g., diagonal_7x7, blink_7x7)
        name: String,
        #[arg(long, default_value = "pico1")]
        board: Board,
        #[arg(long, default_value = "arm")]
        arch: Arch,
        #[arg(long)]
        trace: bool,
    },
    /// Build UF2 firmware file for flashing to Pico
    Uf2 {
        /// Demo name (e.g., diagonal_7x7, blink_7x7)
        name: String,
        #[arg(long, default_value = "pico1")]
        board: Board,
        #[arg(long, default_value = "arm")]
        arch: Arch,
        #[arg(long)]
        trace: bool,
    },
    /// Print a PNG as a packed monochrome bitmap constant
    Bitmap {
        /// PNG file to convert
        path: PathBuf,
        /// Name of the generated constant
        #[arg(long, default_value = "IMAGE")]
        name: String,
        /// Minimum luminance of a lit pixel
        #[arg(long, default_value_t = 128)]
        threshold: u8,
        #[arg(long, default_value = "msb")]
        bit_order: bitmap_gen::BitOrder,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Board {
    Pico1,
    Pico2,
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Board::Pico1 => write!(f, "pico1"),
            Board::Pico2 => write!(f, "pico2"),
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Arch {
    Arm,
    Riscv,
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arch::Arm => write!(f, "arm"),
            Arch::Riscv => write!(f, "riscv"),
        }
    }
}

impl Arch {
    fn target(&self, board: Board) -> Option<&'static str> {
        match (board, self) {
            (Board::Pico1, Arch::Arm) => Some("thumbv6m-none-eabi"),
            (Board::Pico2, Arch::Arm) => Some("thumbv8m.main-none-eabihf"),
            (Board::Pico2, Arch::Riscv) => Some("riscv32imac-unknown-none-elf"),
            (Board::Pico1, Arch::Riscv) => None,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Build { board, arch, trace } => build_lib(board, arch, trace),
        Commands::Demo {
            name,
            board,
            arch,
            trace,
        } => build_demo(&name, board, arch, trace),
        Commands::Uf2 {
            name,
            board,
            arch,
            trace,
        } => build_uf2(&name, board, arch, trace),
        Commands::Bitmap {
            path,
            name,
            threshold,
            bit_order,
        } => match bitmap_gen::generate_bitmap(&path, &name, threshold, bit_order) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{}", format!("Bitmap generation failed: {err}").red());
                ExitCode::FAILURE
            }
        },
    }
}

fn check_all() -> ExitCode {
    let workspace_root = workspace_root();

    for (board, arch) in [
        (Board::Pico1, Arch::Arm),
        (Board::Pico2, Arch::Arm),
        (Board::Pico2, Arch::Riscv),
    ] {
        let Some(target) = arch.target(board) else {
            continue;
        };
        let features = build_features(board, arch, false);
        println!(
            "{}",
            format!("==> Building library ({board}, {arch})...").cyan()
        );
        if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
            "build",
            "--lib",
            "--target",
            target,
            "--features",
            &features,
            "--no-default-features",
        ])) {
            return ExitCode::FAILURE;
        }
    }

    // Demos use the Cortex-M executor entry point
    let board = Board::Pico2;
    let arch = Arch::Arm;
    let Some(target) = arch.target(board) else {
        return ExitCode::FAILURE;
    };
    let features = build_features(board, arch, false);

    println!("\n{}", format!("==> Building demos ({board}, {arch})...").cyan());
    for demo in &DEMOS {
        println!("  {}", format!("- {demo}").bright_black());
        if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
            "build",
            "--bin",
            &format!("demo_{demo}"),
            "--target",
            target,
            "--features",
            &features,
            "--no-default-features",
        ])) {
            return ExitCode::FAILURE;
        }
    }

    println!("\n{}", "==> Building demos with tracing...".cyan());
    let traced_features = build_features(board, arch, true);
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--bins",
        "--target",
        target,
        "--features",
        &traced_features,
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Running host tests...".cyan());
    let host_target = host_target();
    match host_target.as_deref() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    let mut host_test_cmd = Command::new("cargo");
    host_test_cmd
        .current_dir(&workspace_root)
        .args(["test", "--lib", "--tests"]);

    if let Some(target) = host_target {
        host_test_cmd.arg("--target").arg(target);
    }

    host_test_cmd.args(["--no-default-features", "--features", "host"]);

    if !run_command(&mut host_test_cmd) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "doc",
        "--lib",
        "--target",
        target,
        "--no-deps",
        "--features",
        &features,
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed! 🎉".green().bold());
    ExitCode::SUCCESS
}

fn build_lib(board: Board, arch: Arch, trace: bool) -> ExitCode {
    let workspace_root = workspace_root();
    let Some(target) = target_or_report(board, arch) else {
        return ExitCode::FAILURE;
    };
    let features = build_features(board, arch, trace);
    println!(
        "{}",
        format!("Building library with features: {features}").cyan()
    );

    if run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--lib",
        "--target",
        target,
        "--features",
        &features,
        "--no-default-features",
    ])) {
        println!("{}", "Build successful! ✨".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_demo(name: &str, board: Board, arch: Arch, trace: bool) -> ExitCode {
    let workspace_root = workspace_root();
    let Some(target) = target_or_report(board, arch) else {
        return ExitCode::FAILURE;
    };
    let features = build_features(board, arch, trace);
    println!(
        "{}",
        format!("Building demo '{name}' with features: {features}").cyan()
    );

    if run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--bin",
        &format!("demo_{name}"),
        "--target",
        target,
        "--features",
        &features,
        "--no-default-features",
    ])) {
        println!("{}", "Build successful! ✨".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_uf2(name: &str, board: Board, arch: Arch, trace: bool) -> ExitCode {
    let workspace_root = workspace_root();
    let Some(target) = target_or_report(board, arch) else {
        return ExitCode::FAILURE;
    };
    let features = build_features(board, arch, trace);
    let bin = format!("demo_{name}");

    println!(
        "{}",
        format!("Building UF2 for demo '{name}' ({board}/{arch})").cyan()
    );
    println!("  Features: {}", features.bright_black());
    println!("  Target: {}", target.bright_black());

    // Build in release mode for UF2
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--bin",
        &bin,
        "--release",
        "--target",
        target,
        "--features",
        &features,
        "--no-default-features",
    ])) {
        return ExitCode::FAILURE;
    }

    // Convert to UF2 using elf2uf2-rs
    let elf_path = format!("target/{target}/release/{bin}");
    let uf2_path = format!("{name}.uf2");

    println!("\n{}", "Converting to UF2 format...".cyan());

    if run_command(
        Command::new("elf2uf2-rs")
            .current_dir(&workspace_root)
            .args([&elf_path, &uf2_path]),
    ) {
        println!("{}", format!("UF2 created: {uf2_path} 🚀").green().bold());
        println!("{}", "Ready to drag-and-drop to your Pico!".bright_black());
        ExitCode::SUCCESS
    } else {
        println!(
            "{}",
            "Note: Install elf2uf2-rs with: cargo install elf2uf2-rs".yellow()
        );
        ExitCode::FAILURE
    }
}

fn target_or_report(board: Board, arch: Arch) -> Option<&'static str> {
    let target = arch.target(board);
    if target.is_none() {
        eprintln!(
            "{}",
            format!("{board} does not support the {arch} architecture").red()
        );
    }
    target
}

fn build_features(board: Board, arch: Arch, trace: bool) -> String {
    let mut features = vec![board.to_string(), arch.to_string()];
    if trace {
        features.push("display-trace".to_string());
    }
    features.join(",")
}

fn workspace_root() -> PathBuf {
    // `cargo xtask` runs from the workspace root
    std::env::current_dir().expect("Failed to get current directory")
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(host) = line.strip_prefix("host: ") {
            return Some(host.trim().to_string());
        }
    }
    None
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}
