//! Build script for distance-meter-simulator
//!
//! On Windows, links against an SDL2 copy in `vendor/sdl2/` at the repository
//! root and places `SDL2.dll` next to the built binary. Other platforms use the
//! system SDL2 and need nothing here.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let Some(repo_root) = manifest_dir.parent() else {
        return;
    };
    let sdl2_dir = repo_root.join("vendor").join("sdl2");
    println!("cargo:rerun-if-changed={}", sdl2_dir.display());

    if !sdl2_dir.exists() {
        println!("cargo:warning=No SDL2 found at {}", sdl2_dir.display());
        println!("cargo:warning=Put SDL2.lib and SDL2.dll in vendor/sdl2/ to build on Windows");
        return;
    }

    println!("cargo:rustc-link-search=native={}", sdl2_dir.display());

    if let Some(profile_dir) = env::var("OUT_DIR").ok().as_deref().and_then(profile_dir) {
        copy_dll(&sdl2_dir.join("SDL2.dll"), &profile_dir.join("SDL2.dll"));
    }
}

/// `target/<profile>` for an `OUT_DIR` of `target/<profile>/build/<pkg>/out`.
fn profile_dir(out_dir: &str) -> Option<PathBuf> {
    Path::new(out_dir)
        .ancestors()
        .find(|dir| dir.file_name().is_some_and(|name| name == "debug" || name == "release"))
        .map(Path::to_path_buf)
}

fn copy_dll(
    from: &Path,
    to: &Path,
) {
    if !from.exists() || to.exists() {
        return;
    }
    if let Err(e) = fs::copy(from, to) {
        println!("cargo:warning=Could not copy SDL2.dll: {e}");
    }
}
