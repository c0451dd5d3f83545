use crate::executor::{CommandExecutor, RealExecutor};
use crate::process::ProcessError;

/// Ancillary GCP operations client, parameterized over the executor for
/// testability. The pipeline steps themselves live in
/// [`pipeline`](crate::pipeline); this client covers everything around
/// them: preflight, diagnostics, registry setup, status, and logs.
pub struct GcloudClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl GcloudClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for GcloudClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> GcloudClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    async fn gcloud(&self, a: &[&str]) -> Result<String, ProcessError> {
        self.executor.exec("gcloud", &args(a)).await
    }

    // ── Preflight ──

    pub async fn check_prerequisites(
        &self,
        project_id: &str,
    ) -> Result<PreflightReport, PreflightError> {
        let mut report = PreflightReport::default();

        // 1. gcloud CLI available
        match self.gcloud(&["version", "--format", "value(version)"]).await {
            Ok(version) => report.gcloud_version = Some(version.trim().to_owned()),
            Err(_) => return Err(PreflightError::GcloudNotInstalled),
        }

        // 2. docker CLI available (the build and push steps need it)
        match self.executor.exec("docker", &args(&["--version"])).await {
            Ok(version) => report.docker_version = Some(version.trim().to_owned()),
            Err(_) => return Err(PreflightError::DockerNotInstalled),
        }

        // 3. Authenticated
        match self.gcloud(&["auth", "print-access-token", "--quiet"]).await {
            Ok(_) => report.authenticated = true,
            Err(_) => return Err(PreflightError::NotAuthenticated),
        }

        // 4. Project accessible
        match self
            .gcloud(&["projects", "describe", project_id, "--format", "value(name)"])
            .await
        {
            Ok(name) => report.project_name = Some(name.trim().to_owned()),
            Err(_) => return Err(PreflightError::ProjectNotAccessible(project_id.to_owned())),
        }

        // 5. Required APIs enabled
        for api in &["run.googleapis.com", "artifactregistry.googleapis.com"] {
            let enabled = self
                .gcloud(&[
                    "services",
                    "list",
                    "--project",
                    project_id,
                    "--filter",
                    &format!("config.name={api}"),
                    "--format",
                    "value(config.name)",
                ])
                .await
                .map(|out| !out.trim().is_empty())
                .unwrap_or(false);

            if !enabled {
                report.disabled_apis.push((*api).to_owned());
            }
        }

        Ok(report)
    }

    // ── Doctor ──

    /// Run all diagnostic checks without early return.
    /// Returns a report with pass/fail for each check item.
    pub async fn doctor(&self, project_id: Option<&str>) -> DoctorReport {
        let mut report = DoctorReport::default();

        // 1. gcloud CLI
        match self.gcloud(&["version"]).await {
            Ok(v) => {
                // Parse "Google Cloud SDK X.Y.Z" from first line
                let version = v
                    .lines()
                    .next()
                    .and_then(|line| line.strip_prefix("Google Cloud SDK "))
                    .unwrap_or(v.trim());
                report.gcloud = CheckResult::ok(version.trim());
            }
            Err(e) => report.gcloud = CheckResult::fail(&e.to_string()),
        }

        // 2. docker CLI
        match self.executor.exec("docker", &args(&["--version"])).await {
            Ok(v) => {
                let version = v.trim().strip_prefix("Docker version ").unwrap_or(v.trim());
                report.docker = CheckResult::ok(version);
            }
            Err(e) => report.docker = CheckResult::fail(&e.to_string()),
        }

        // 3. Active account
        match self.gcloud(&["config", "get-value", "account"]).await {
            Ok(a) if !a.trim().is_empty() => report.account = CheckResult::ok(a.trim()),
            _ => report.account = CheckResult::fail("no active account"),
        }

        // 4. Project
        let Some(pid) = project_id else {
            report.project = CheckResult::fail("gcp_project_id not set in skiff.toml");
            return report;
        };

        match self
            .gcloud(&["projects", "describe", pid, "--format", "value(name)"])
            .await
        {
            Ok(name) => {
                report.project = CheckResult::ok(&format!("{pid} ({name})", name = name.trim()))
            }
            Err(_) => {
                report.project = CheckResult::fail(&format!("{pid} — not accessible"));
                return report;
            }
        }

        // 5. Billing
        match self
            .gcloud(&[
                "billing",
                "projects",
                "describe",
                pid,
                "--format",
                "value(billingEnabled)",
            ])
            .await
        {
            Ok(v) if v.trim().eq_ignore_ascii_case("true") => {
                report.billing = CheckResult::ok("Enabled");
            }
            _ => report.billing = CheckResult::fail("Billing not enabled"),
        }

        // 6. Required APIs
        let required_apis = [
            ("Cloud Run", "run.googleapis.com"),
            ("Artifact Registry", "artifactregistry.googleapis.com"),
        ];

        for (label, api) in &required_apis {
            let enabled = self
                .gcloud(&[
                    "services",
                    "list",
                    "--project",
                    pid,
                    "--filter",
                    &format!("config.name={api}"),
                    "--format",
                    "value(config.name)",
                ])
                .await
                .map(|out| !out.trim().is_empty())
                .unwrap_or(false);

            report.apis.push(ApiCheck {
                name: label.to_string(),
                result: if enabled {
                    CheckResult::ok("Enabled")
                } else {
                    CheckResult::fail("Not enabled")
                },
            });
        }

        report
    }

    // ── Artifact Registry ──

    /// Ensure the Artifact Registry Docker repository exists, creating it if needed.
    pub async fn ensure_artifact_repo(
        &self,
        project_id: &str,
        location: &str,
        repo_name: &str,
    ) -> Result<(), RegistryError> {
        let exists = self
            .gcloud(&[
                "artifacts",
                "repositories",
                "describe",
                repo_name,
                "--project",
                project_id,
                "--location",
                location,
            ])
            .await
            .is_ok();

        if !exists {
            tracing::info!(repo = repo_name, location, "creating artifact repository");
            self.gcloud(&[
                "artifacts",
                "repositories",
                "create",
                repo_name,
                "--project",
                project_id,
                "--location",
                location,
                "--repository-format",
                "docker",
                "--quiet",
            ])
            .await
            .map_err(|e| RegistryError::EnsureRepo { source: e })?;
        }

        Ok(())
    }

    /// Register docker credentials for the registry host so the push step
    /// can authenticate.
    pub async fn configure_docker(&self, registry_host: &str) -> Result<(), RegistryError> {
        self.gcloud(&["auth", "configure-docker", registry_host, "--quiet"])
            .await
            .map_err(|e| RegistryError::ConfigureDocker { source: e })?;

        Ok(())
    }

    // ── Cloud Run service surfaces ──

    pub async fn describe_service(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
    ) -> Result<String, ServiceError> {
        self.gcloud(&[
            "run",
            "services",
            "describe",
            service_name,
            "--project",
            project_id,
            "--region",
            region,
            "--format",
            "yaml(status)",
        ])
        .await
        .map_err(|e| ServiceError::Describe { source: e })
    }

    pub async fn read_logs(
        &self,
        service_name: &str,
        project_id: &str,
        region: &str,
        limit: u32,
    ) -> Result<(), ServiceError> {
        self.executor
            .exec_streaming(
                "gcloud",
                &args(&[
                    "run",
                    "services",
                    "logs",
                    "read",
                    service_name,
                    "--project",
                    project_id,
                    "--region",
                    region,
                    "--limit",
                    &limit.to_string(),
                ]),
            )
            .await
            .map_err(|e| ServiceError::Logs { source: e })
    }
}

// ── Helper ──

fn args(a: &[&str]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Preflight types ──

#[derive(Debug, Default)]
pub struct PreflightReport {
    pub gcloud_version: Option<String>,
    pub docker_version: Option<String>,
    pub authenticated: bool,
    pub project_name: Option<String>,
    pub disabled_apis: Vec<String>,
}

impl PreflightReport {
    pub fn has_warnings(&self) -> bool {
        !self.disabled_apis.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("gcloud CLI not installed — https://cloud.google.com/sdk/docs/install")]
    GcloudNotInstalled,

    #[error("docker CLI not installed — https://docs.docker.com/engine/install/")]
    DockerNotInstalled,

    #[error("not authenticated — run: gcloud auth login")]
    NotAuthenticated,

    #[error("GCP project '{0}' is not accessible — check project ID and permissions")]
    ProjectNotAccessible(String),
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub gcloud: CheckResult,
    pub docker: CheckResult,
    pub account: CheckResult,
    pub project: CheckResult,
    pub billing: CheckResult,
    pub apis: Vec<ApiCheck>,
    pub config_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.gcloud.passed
            && self.docker.passed
            && self.account.passed
            && self.project.passed
            && self.billing.passed
            && self.config_file.passed
            && self.apis.iter().all(|a| a.result.passed)
    }
}

impl std::fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "[{}] gcloud: {}", self.gcloud.icon(), self.gcloud.detail)?;
        writeln!(f, "[{}] docker: {}", self.docker.icon(), self.docker.detail)?;
        writeln!(
            f,
            "[{}] account: {}",
            self.account.icon(),
            self.account.detail
        )?;
        writeln!(
            f,
            "[{}] project: {}",
            self.project.icon(),
            self.project.detail
        )?;
        writeln!(
            f,
            "[{}] billing: {}",
            self.billing.icon(),
            self.billing.detail
        )?;
        for api in &self.apis {
            writeln!(
                f,
                "[{}] {}: {}",
                api.result.icon(),
                api.name,
                api.result.detail
            )?;
        }
        write!(
            f,
            "[{}] skiff.toml: {}",
            self.config_file.icon(),
            self.config_file.detail
        )
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

#[derive(Debug, Clone)]
pub struct ApiCheck {
    pub name: String,
    pub result: CheckResult,
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to ensure artifact repository")]
    EnsureRepo { source: ProcessError },

    #[error("failed to configure docker credentials for the registry")]
    ConfigureDocker { source: ProcessError },
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to describe service")]
    Describe { source: ProcessError },

    #[error("failed to read service logs")]
    Logs { source: ProcessError },
}
