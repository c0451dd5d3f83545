use std::path::Path;

/// Initialize skiff in an existing Rust project.
pub async fn init_project() -> anyhow::Result<()> {
    // Must be inside a Cargo project
    if !Path::new("Cargo.toml").exists() {
        anyhow::bail!("Cargo.toml not found. Run this command from a Rust project root.");
    }

    let skiff_toml_path = Path::new("skiff.toml");
    if skiff_toml_path.exists() {
        println!("skiff.toml already exists — nothing to do.");
        return Ok(());
    }

    let skiff_toml = r#"[project]
# gcp_project_id = "your-project-id"
# region = "us-central1"
# location = "us-central1"      # Artifact Registry location (defaults to region)
# repository = "containers"     # Artifact Registry repository
# name = "my-service"           # Cloud Run service name (defaults to package name)
# image = "my-image"            # Image name (defaults to the deployed binary name)

[build]
# profile = "pinned"            # "pinned" (reproducible) or "floating" (rust:latest)
# runtime_packages = ["ca-certificates", "curl", "libssl3", "zlib1g"]

[service]
# port = 8080
"#;
    std::fs::write(skiff_toml_path, skiff_toml)?;
    println!("Created skiff.toml");

    println!();
    println!("Next steps:");
    println!();
    println!("  1. Set your GCP project:");
    println!("     edit skiff.toml and uncomment gcp_project_id");
    println!();
    println!("  2. Check your setup:");
    println!("     skiff doctor");
    println!();
    println!("  3. Deploy:");
    println!("     skiff deploy");

    Ok(())
}
