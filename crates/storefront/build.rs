//! Build script for the storefront crate.
//!
//! Fingerprints `static/css/main.css` so the stylesheet can be served with
//! a long cache lifetime under a content-addressed name.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters of the SHA-256 digest kept in the file name.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir = PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo"),
    );

    let hash = match fingerprint_css(&manifest_dir) {
        Ok(hash) => hash,
        Err(e) => {
            println!("cargo:warning=CSS fingerprinting skipped: {e}");
            String::new()
        }
    };

    println!("cargo:rustc-env=CSS_HASH={hash}");
}

/// Copy `main.css` to `static/css/derived/main.<hash>.css` and return the hash.
fn fingerprint_css(manifest_dir: &Path) -> std::io::Result<String> {
    let css_path = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = fs::read(&css_path)?;
    let digest = format!("{:x}", Sha256::digest(&content));
    let hash = digest.get(..HASH_LEN).unwrap_or(&digest).to_string();

    let derived_dir = manifest_dir.join("static/css/derived");
    fs::create_dir_all(&derived_dir)?;
    fs::write(derived_dir.join(format!("main.{hash}.css")), &content)?;

    Ok(hash)
}
