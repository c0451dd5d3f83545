use std::path::PathBuf;

use skiff_cloud::GcloudClient;
use skiff_core::{CargoProject, SkiffConfig};

pub async fn status() -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = SkiffConfig::load(&project_dir)?;
    let project_id = super::require_gcp_project_id(&config)?;

    let project = CargoProject::discover(&project_dir)?;
    let service_name = super::service_name(&config, &project);
    let region = &config.project.region;

    let client = GcloudClient::new();
    let output = client
        .describe_service(service_name, project_id, region)
        .await?;

    println!("{output}");
    Ok(())
}
