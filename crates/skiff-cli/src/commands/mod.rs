mod deploy;
mod doctor;
mod eject;
mod init;
mod logs;
mod status;

use skiff_core::{CargoProject, SkiffConfig};

pub use deploy::deploy;
pub use doctor::doctor;
pub use eject::eject;
pub use init::init_project;
pub use logs::logs;
pub use status::status;

/// Cloud Run service name: config override, else the Cargo package name.
pub(crate) fn service_name<'a>(config: &'a SkiffConfig, project: &'a CargoProject) -> &'a str {
    config.project.name.as_deref().unwrap_or(&project.name)
}

pub(crate) fn require_gcp_project_id(config: &SkiffConfig) -> anyhow::Result<&str> {
    config.project.gcp_project_id.as_deref().ok_or_else(|| {
        anyhow::anyhow!("gcp_project_id not set in skiff.toml — set [project].gcp_project_id")
    })
}
