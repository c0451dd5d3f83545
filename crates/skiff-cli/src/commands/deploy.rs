use std::path::PathBuf;
use std::str::FromStr;

use skiff_build::dockerfile::DockerfileGenerator;
use skiff_build::{context, eject as eject_mod};
use skiff_cloud::{GcloudClient, PipelineDriver, PipelinePlan};
use skiff_core::{BuildProfile, CargoProject, SkiffConfig, Substitutions, vars};

/// Execute the full deploy pipeline.
pub async fn deploy(
    allow_dirty: bool,
    profile: Option<&str>,
    commit: Option<&str>,
) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let client = GcloudClient::new();

    // Dirty check: refuse to deploy uncommitted changes unless --allow-dirty
    if !allow_dirty && context::is_dirty(&project_dir)? {
        anyhow::bail!(
            "uncommitted changes detected.\n\
             Commit your changes, or use `skiff deploy --allow-dirty` to deploy anyway."
        );
    }

    // Load configuration and resolve the variable namespace
    let config = SkiffConfig::load(&project_dir)?;
    let profile = match profile {
        Some(value) => BuildProfile::from_str(value)?,
        None => config.build.profile,
    };
    let project = CargoProject::discover(&project_dir)?;
    let commit = match commit {
        Some(id) => id.to_owned(),
        None => context::head_commit(&project_dir)?,
    };

    let subs = Substitutions::resolve(&config, &project, &commit)?;
    let image = subs.image_ref()?;
    tracing::debug!(image = %image, profile = %profile, "resolved deploy target");

    // Pre-flight checks
    println!("Running pre-flight checks...");
    let project_id = subs.get(vars::PROJECT_ID)?;
    let report = client.check_prerequisites(project_id).await?;

    if report.has_warnings() {
        println!("Warning: the following APIs are not enabled:");
        for api in &report.disabled_apis {
            println!("  - {api}");
        }
        println!("Enable them with: gcloud services enable <api> --project {project_id}");
        anyhow::bail!("required APIs not enabled");
    }

    // Ensure Artifact Registry repository and docker credentials
    println!("Ensuring Artifact Registry repository...");
    client
        .ensure_artifact_repo(
            project_id,
            subs.get(vars::LOCATION)?,
            subs.get(vars::REPOSITORY)?,
        )
        .await?;
    client.configure_docker(&image.registry_host()).await?;

    // Determine Dockerfile content
    let dockerfile_content = if eject_mod::is_ejected(&project_dir) {
        println!("Using ejected Dockerfile from .skiff/Dockerfile");
        eject_mod::load_ejected_dockerfile(&project_dir)?
    } else {
        DockerfileGenerator::new(
            &config.build,
            profile,
            &project.default_binary,
            config.service.port,
        )
        .render()
    };

    // Stage the build context
    println!("Staging build context...");
    let context_dir = context::stage_context(&project_dir, &dockerfile_content)?;

    // Build, push, deploy
    println!("Deploying {image} ({profile} profile)...");
    let mut driver = PipelineDriver::new();
    let report = driver
        .run(&PipelinePlan {
            context_dir,
            subs,
            port: config.service.port,
        })
        .await?;

    println!();
    println!("Deployed: {}", report.image);

    Ok(())
}
