//! Locating the package a backend just produced.
//!
//! Backends of a batch write into shared output directories. A scan only
//! considers files of the package being built, and the artifact of the
//! current invocation is the newest of those, never the first match.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::builder::errors::BuildError;
use crate::util::fs::{glob_files, newest_file};

const SOURCE_SUFFIX: &str = ".src.rpm";
const BINARY_SUFFIX: &str = ".rpm";

/// What kind of package to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A source package (`<name>-*.src.rpm`) directly in the output directory.
    Source,
    /// A binary package (`<name>-*.rpm`, never `*.src.rpm`) anywhere below it.
    Binary,
}

impl ArtifactKind {
    /// Glob pattern for `package`, relative to the output directory.
    pub fn pattern(self, package: &str) -> String {
        let package = Pattern::escape(package);
        match self {
            ArtifactKind::Source => format!("{}-*{}", package, SOURCE_SUFFIX),
            ArtifactKind::Binary => format!("**/{}-*{}", package, BINARY_SUFFIX),
        }
    }

    fn accepts(self, path: &Path) -> bool {
        let is_source = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(SOURCE_SUFFIX));
        match self {
            ArtifactKind::Source => is_source,
            ArtifactKind::Binary => !is_source,
        }
    }
}

/// Package name encoded in an rpm file name.
///
/// Source packages are named `<name>-<version>-<release>.src.rpm`, binary
/// packages `<name>-<version>-<release>.<arch>.rpm`.
pub fn package_name(path: &Path) -> Option<&str> {
    let file = path.file_name()?.to_str()?;
    let nvr = match file.strip_suffix(SOURCE_SUFFIX) {
        Some(nvr) => nvr,
        None => file.strip_suffix(BINARY_SUFFIX)?.rsplit_once('.')?.0,
    };

    let mut parts = nvr.rsplitn(3, '-');
    let _release = parts.next()?;
    let _version = parts.next()?;
    parts.next().filter(|name| !name.is_empty())
}

/// Name of the package a spec file builds.
///
/// Reads a literal `Name:` tag; macro-valued or missing tags fall back to
/// the file name without `.spec`.
pub fn spec_package_name(spec: &Path) -> String {
    let tagged = fs::read_to_string(spec).ok().and_then(|contents| {
        contents.lines().find_map(|line| {
            let (tag, value) = line.split_once(':')?;
            let value = value.trim();
            (tag.trim().eq_ignore_ascii_case("name") && !value.is_empty() && !value.contains('%'))
                .then(|| value.to_string())
        })
    });

    tagged.unwrap_or_else(|| {
        spec.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

/// Find the most recently modified artifact of `kind` for `package` under `dir`.
///
/// Binary scans prefer the package itself and only fall back to its
/// subpackages (`<package>-devel`, ...) when it produced none.
pub fn find_newest_artifact(
    dir: &Path,
    kind: ArtifactKind,
    package: &str,
) -> Result<PathBuf, BuildError> {
    let pattern = kind.pattern(package);
    let not_located = || BuildError::ArtifactNotLocated {
        dir: dir.to_path_buf(),
        pattern: pattern.clone(),
    };

    let candidates: Vec<PathBuf> = glob_files(dir, &[pattern.as_str()])
        .map_err(|e| {
            tracing::warn!("failed to scan {}: {:#}", dir.display(), e);
            not_located()
        })?
        .into_iter()
        .filter(|p| kind.accepts(p))
        .collect();

    let (own, related): (Vec<PathBuf>, Vec<PathBuf>) = candidates
        .into_iter()
        .partition(|p| package_name(p) == Some(package));

    let newest = match kind {
        ArtifactKind::Source => newest_file(own),
        ArtifactKind::Binary => newest_file(own).or_else(|| newest_file(related)),
    };
    newest.ok_or_else(not_located)
}

/// The source package built from `spec` in `dir`.
pub fn find_source_package(dir: &Path, spec: &Path) -> Result<PathBuf, BuildError> {
    find_newest_artifact(dir, ArtifactKind::Source, &spec_package_name(spec))
}

/// The binary package rebuilt from `srpm` somewhere below `dir`.
pub fn find_binary_package(dir: &Path, srpm: &Path) -> Result<PathBuf, BuildError> {
    let package = match package_name(srpm) {
        Some(name) => name.to_string(),
        None => spec_package_name(srpm),
    };
    find_newest_artifact(dir, ArtifactKind::Binary, &package)
}
