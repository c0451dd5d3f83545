use std::path::PathBuf;

use skiff_build::dockerfile::DockerfileGenerator;
use skiff_core::{CargoProject, SkiffConfig};

pub async fn eject() -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = SkiffConfig::load(&project_dir)?;
    let project = CargoProject::discover(&project_dir)?;

    let generator = DockerfileGenerator::new(
        &config.build,
        config.build.profile,
        &project.default_binary,
        config.service.port,
    );
    let dockerfile = generator.render();

    skiff_build::eject::eject(&project_dir, &dockerfile)?;

    println!("Ejected build config to .skiff/Dockerfile");
    println!("You can now edit it directly. skiff deploy will use this file.");
    Ok(())
}
