use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// skiff.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkiffConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Cloud Run service name (defaults to Cargo.toml package name)
    pub name: Option<String>,
    /// GCP project ID
    pub gcp_project_id: Option<String>,
    /// Cloud Run region (defaults to us-central1)
    #[serde(default = "default_region")]
    pub region: String,
    /// Artifact Registry location (defaults to the region)
    pub location: Option<String>,
    /// Artifact Registry repository name
    #[serde(default = "default_repository")]
    pub repository: String,
    /// Image name within the repository (defaults to the deployed binary name)
    pub image: Option<String>,
}

/// Toolchain selection for the builder stage.
///
/// `Pinned` builds against a fixed toolchain image so that the same commit
/// produces the same image. `Floating` tracks `rust:latest` and gives up
/// that guarantee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    #[default]
    Pinned,
    Floating,
}

impl BuildProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pinned => "pinned",
            Self::Floating => "floating",
        }
    }
}

impl FromStr for BuildProfile {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "pinned" => Ok(Self::Pinned),
            "floating" => Ok(Self::Floating),
            other => Err(crate::Error::UnknownProfile {
                value: other.to_owned(),
            }),
        }
    }
}

impl std::fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Builder stage toolchain profile
    #[serde(default)]
    pub profile: BuildProfile,
    /// Toolchain image used by the pinned profile
    #[serde(default = "default_pinned_toolchain")]
    pub pinned_toolchain: String,
    /// Toolchain image used by the floating profile
    #[serde(default = "default_floating_toolchain")]
    pub floating_toolchain: String,
    /// Runtime base image
    #[serde(default = "default_runtime_image")]
    pub runtime_image: String,
    /// OS packages installed into the runtime stage via apt-get
    #[serde(default = "default_runtime_packages")]
    pub runtime_packages: Vec<String>,
}

impl BuildConfig {
    /// The builder stage base image for the given profile.
    pub fn toolchain_image(&self, profile: BuildProfile) -> &str {
        match profile {
            BuildProfile::Pinned => &self.pinned_toolchain,
            BuildProfile::Floating => &self.floating_toolchain,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port the deployed service listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            gcp_project_id: None,
            region: default_region(),
            location: None,
            repository: default_repository(),
            image: None,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            profile: BuildProfile::default(),
            pinned_toolchain: default_pinned_toolchain(),
            floating_toolchain: default_floating_toolchain(),
            runtime_image: default_runtime_image(),
            runtime_packages: default_runtime_packages(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl SkiffConfig {
    /// Load from skiff.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &std::path::Path) -> crate::Result<Self> {
        let config_path = project_dir.join("skiff.toml");
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            tracing::debug!(path = %config_path.display(), "skiff.toml not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Artifact Registry location, falling back to the Cloud Run region.
    pub fn registry_location(&self) -> &str {
        self.project
            .location
            .as_deref()
            .unwrap_or(&self.project.region)
    }
}

fn default_region() -> String {
    "us-central1".to_owned()
}

fn default_repository() -> String {
    "containers".to_owned()
}

fn default_pinned_toolchain() -> String {
    "rust:1.84-bookworm".to_owned()
}

fn default_floating_toolchain() -> String {
    "rust:latest".to_owned()
}

fn default_runtime_image() -> String {
    "debian:bookworm-slim".to_owned()
}

fn default_runtime_packages() -> Vec<String> {
    vec![
        "ca-certificates".to_owned(),
        "curl".to_owned(),
        "libssl3".to_owned(),
        "zlib1g".to_owned(),
    ]
}

fn default_port() -> u16 {
    8080
}
