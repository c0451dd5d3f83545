//! Cargo project discovery via `cargo metadata`.
//!
//! The metadata protocol (rather than hand-parsing `Cargo.toml`) handles
//! workspace field inheritance, multiple binary targets with `default-run`,
//! and accurate manifest paths.

use cargo_metadata::{MetadataCommand, TargetKind};
use std::path::{Path, PathBuf};

/// A binary target in a Cargo package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoBinary {
    /// Binary name (used with `cargo build --bin <name>`)
    pub name: String,
    /// Absolute path to the source file
    pub src_path: PathBuf,
}

/// The Cargo package skiff is deploying, discovered via
/// `cargo metadata --no-deps`.
///
/// Use [`CargoProject::discover()`] against a real project. Direct struct
/// construction is available for tests; callers must keep the invariant
/// that `default_binary` names an entry in `binaries`.
#[derive(Debug, Clone)]
pub struct CargoProject {
    /// Package name from `[package].name`
    pub name: String,
    /// Resolved version (handles `version.workspace = true`)
    pub version: String,
    /// Absolute path to the package's `Cargo.toml`
    pub manifest_path: PathBuf,
    /// Absolute path to the package directory
    pub package_dir: PathBuf,
    /// All binary targets in this package
    pub binaries: Vec<CargoBinary>,
    /// The binary compiled into the runtime image.
    pub default_binary: String,
}

impl CargoProject {
    /// Discover the Cargo package at the given directory.
    ///
    /// # Errors
    ///
    /// - [`Error::CargoMetadata`](crate::Error::CargoMetadata) if `cargo metadata` fails
    /// - [`Error::NoPackageInDir`](crate::Error::NoPackageInDir) if the directory holds no package
    /// - [`Error::NoBinaryTarget`](crate::Error::NoBinaryTarget) for library-only packages
    /// - [`Error::MultipleBinaries`](crate::Error::MultipleBinaries) when the choice is ambiguous
    pub fn discover(project_dir: &Path) -> crate::Result<Self> {
        let manifest_path = project_dir.join("Cargo.toml");
        tracing::debug!(path = %manifest_path.display(), "running cargo metadata");

        let metadata = MetadataCommand::new()
            .manifest_path(&manifest_path)
            .no_deps()
            .exec()
            .map_err(|e| crate::Error::CargoMetadata {
                manifest_path: manifest_path.clone(),
                detail: e.to_string(),
            })?;

        // Canonicalize for reliable path comparison against manifest parents
        let canonical_dir =
            project_dir
                .canonicalize()
                .map_err(|e| crate::Error::ProjectDirResolve {
                    path: project_dir.to_path_buf(),
                    source: e,
                })?;

        let package = metadata
            .packages
            .iter()
            .find(|p| {
                p.manifest_path
                    .as_std_path()
                    .parent()
                    .and_then(|d| d.canonicalize().ok())
                    .is_some_and(|d| d == canonical_dir)
            })
            .ok_or_else(|| crate::Error::NoPackageInDir {
                dir: canonical_dir.clone(),
                workspace_members: metadata
                    .packages
                    .iter()
                    .filter(|p| metadata.workspace_members.contains(&p.id))
                    .map(|p| p.name.clone())
                    .collect(),
            })?;

        let binaries: Vec<CargoBinary> = package
            .targets
            .iter()
            .filter(|t| t.kind.contains(&TargetKind::Bin))
            .map(|t| CargoBinary {
                name: t.name.clone(),
                src_path: PathBuf::from(t.src_path.as_std_path()),
            })
            .collect();

        let default_binary =
            Self::select_binary(&binaries, package.default_run.as_deref(), &package.name)?;

        let pkg_manifest = PathBuf::from(package.manifest_path.as_std_path());
        let package_dir = pkg_manifest
            .parent()
            .unwrap_or(&canonical_dir)
            .to_path_buf();

        tracing::debug!(
            name = %package.name,
            version = %package.version,
            binary = %default_binary,
            "cargo project discovered"
        );

        Ok(Self {
            name: package.name.clone(),
            version: package.version.to_string(),
            manifest_path: pkg_manifest,
            package_dir,
            binaries,
            default_binary,
        })
    }

    /// Select the binary to ship. Priority: explicit `default-run`, then a
    /// lone binary, then the binary matching the package name.
    fn select_binary(
        binaries: &[CargoBinary],
        default_run: Option<&str>,
        package_name: &str,
    ) -> crate::Result<String> {
        if let Some(name) = default_run
            && binaries.iter().any(|b| b.name == name)
        {
            return Ok(name.to_owned());
        }

        match binaries.len() {
            0 => Err(crate::Error::NoBinaryTarget {
                package: package_name.to_owned(),
            }),
            1 => Ok(binaries[0].name.clone()),
            _ => {
                if binaries.iter().any(|b| b.name == package_name) {
                    return Ok(package_name.to_owned());
                }
                Err(crate::Error::MultipleBinaries {
                    names: binaries.iter().map(|b| b.name.clone()).collect(),
                })
            }
        }
    }
}
