use std::path::Path;

use skiff_cloud::GcloudClient;
use skiff_core::SkiffConfig;

pub async fn doctor() -> anyhow::Result<()> {
    let config = SkiffConfig::load(Path::new("."));
    let project_id = config
        .as_ref()
        // arch-lint: allow(no-silent-result-drop) reason="doctor must report diagnostics even when skiff.toml is missing or invalid"
        .ok()
        .and_then(|c| c.project.gcp_project_id.as_deref());

    let client = GcloudClient::new();
    let mut report = client.doctor(project_id).await;

    // Config file check
    if Path::new("skiff.toml").exists() {
        report.config_file = skiff_cloud::CheckResult::ok("Found");
    } else {
        report.config_file = skiff_cloud::CheckResult::fail("Not found");
    }

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed — see above for details");
    }

    Ok(())
}
