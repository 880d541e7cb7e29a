//! Build script - copies the linker script into the output directory
//! so that the linker can find it at link time, and stamps the build
//! time so the watch has a wall-clock reference after flashing.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to OUT_DIR
    fs::copy("memory.x", out_dir.join("memory.x")).unwrap();

    // Tell cargo to look for linker scripts in OUT_DIR
    println!("cargo:rustc-link-search={}", out_dir.display());

    // UTC epoch seconds at build time, picked up by the clock task.
    fs::write(
        out_dir.join("build_epoch.rs"),
        format!(
            "pub const BUILD_EPOCH_SECS: i64 = {};\n",
            chrono::Utc::now().timestamp()
        ),
    )
    .unwrap();

    // Rebuild if the linker script changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
