//! Web build pre-processing
//!
//! A web bundler's `dist/` output references assets by root-relative URLs
//! (`/assets/app.js`), which resolve to the filesystem root once the page is
//! loaded from `file://`. This rewrites those references to `./` and carries
//! the assets directory along.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::common::fs::copy_dir_recursive;
use crate::error::{self, Result};

const ASSETS_DIR: &str = "assets";
const INDEX_FILE: &str = "index.html";

// Root-relative only: protocol-relative `//host` references are left alone
#[allow(clippy::expect_used)]
static ROOT_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(src|href)="/([^/])"#).expect("literal pattern")
});

#[allow(clippy::expect_used)]
static ROOT_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bfrom "/([^/])"#).expect("literal pattern"));

#[allow(clippy::expect_used)]
static HIGHLIGHT_STYLESHEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link rel="stylesheet" href="[^"]*styles/default\.min\.css">"#)
        .expect("literal pattern")
});

/// What [`prepare_app`] produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedApp {
    pub index: PathBuf,
    pub assets: Option<PathBuf>,
}

/// Rewrite root-relative references in page markup
pub fn rewrite_markup(html: &str) -> String {
    let html = ROOT_ATTRIBUTE.replace_all(html, r#"$1="./$2"#);
    let html = ROOT_IMPORT.replace_all(&html, r#"from "./$1"#);
    HIGHLIGHT_STYLESHEET.replace_all(&html, "").into_owned()
}

/// Prepare `dist_dir` for loading from the bundle into `output_dir`
pub fn prepare_app(dist_dir: &Path, output_dir: &Path) -> Result<PreparedApp> {
    fs::create_dir_all(output_dir).map_err(|e| error::fs::write_failed(output_dir, e))?;

    let assets = copy_assets(&dist_dir.join(ASSETS_DIR), &output_dir.join(ASSETS_DIR))?;

    let index_src = dist_dir.join(INDEX_FILE);
    let html = fs::read_to_string(&index_src).map_err(|e| error::fs::read_failed(&index_src, e))?;

    let index = output_dir.join(INDEX_FILE);
    fs::write(&index, rewrite_markup(&html)).map_err(|e| error::fs::write_failed(&index, e))?;

    Ok(PreparedApp { index, assets })
}

fn copy_assets(src: &Path, dst: &Path) -> Result<Option<PathBuf>> {
    if !src.is_dir() {
        return Ok(None);
    }

    match fs::remove_dir_all(dst) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(error::fs::write_failed(dst, e)),
    }

    copy_dir_recursive(src, dst).map_err(|e| error::bundle::copy_failed(src, dst, e))?;
    Ok(Some(dst.to_path_buf()))
}
