use std::{env, path::PathBuf};

const WATCHED_VARIABLES: [&str; 4] = [
    "FFMPEG_DIR",
    "VCPKG_ROOT",
    "VCPKGRS_DYNAMIC",
    "VCPKGRS_TRIPLET",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    // ffmpeg-sys-next finds FFmpeg through pkg-config everywhere else.
    let windows = env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "windows");
    if !windows || env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    for hint in windows_hints() {
        println!("cargo:warning={hint}");
    }
}

fn windows_hints() -> Vec<String> {
    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        return vec![
            "framedump needs the FFmpeg development libraries: install them with vcpkg and set FFMPEG_DIR".to_string(),
        ];
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let installed = PathBuf::from(vcpkg_root).join("installed").join(triplet);
    if !installed.exists() {
        return vec![format!(
            "VCPKG_ROOT is set, but {} does not exist; run `vcpkg install ffmpeg`",
            installed.display()
        )];
    }

    let mut hints = vec![format!(
        "Found vcpkg FFmpeg at {0}; set FFMPEG_DIR={0} to use it explicitly",
        installed.display()
    )];
    if env::var_os("VCPKGRS_DYNAMIC").is_none() {
        hints.push("Set VCPKGRS_DYNAMIC=1 when linking a dynamic vcpkg FFmpeg".to_string());
    }
    hints
}
