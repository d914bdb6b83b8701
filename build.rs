use std::{env, fs, path::PathBuf};

/// Linker memory layout for each supported target triple prefix.
const MEMORY_LAYOUTS: &[(&str, &str)] = &[
    // Pico 2 ARM (Cortex-M33)
    ("thumbv8m", "memory-pico2.x"),
    // Pico 2 RISC-V (Hazard3)
    ("riscv32imac", "memory-pico2-riscv.x"),
    // Pico 1 (Cortex-M0+)
    ("thumbv6m", "memory-pico1.x"),
];

fn main() {
    let target = env::var("TARGET").unwrap();
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Host builds (tests, docs) link no memory.x
    let Some((_, layout)) = MEMORY_LAYOUTS
        .iter()
        .find(|(prefix, _)| target.starts_with(prefix))
    else {
        return;
    };

    let memory_x =
        fs::read_to_string(layout).unwrap_or_else(|err| panic!("Failed to read {layout}: {err}"));
    fs::write(out_dir.join("memory.x"), memory_x).expect("Failed to write memory.x");
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed={layout}");
}
