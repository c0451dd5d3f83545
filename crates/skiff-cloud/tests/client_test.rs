use mockall::mock;
use skiff_cloud::client::{GcloudClient, PreflightError, RegistryError, ServiceError};
use skiff_cloud::executor::CommandExecutor;
use skiff_cloud::process::ProcessError;

mock! {
    Executor {}

    impl CommandExecutor for Executor {
        async fn exec(&self, program: &str, args: &[String]) -> Result<String, ProcessError>;
        async fn exec_streaming(&self, program: &str, args: &[String]) -> Result<(), ProcessError>;
    }
}

fn not_found(program: &str) -> ProcessError {
    ProcessError::NotFound {
        program: program.to_owned(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    }
}

fn command_failed(program: &str, stderr: &str) -> ProcessError {
    ProcessError::CommandFailed {
        program: program.to_owned(),
        args: vec![],
        stderr: stderr.to_owned(),
    }
}

// ── Preflight Tests ──

#[tokio::test]
async fn preflight_all_checks_pass() {
    let mut mock = MockExecutor::new();

    // gcloud version
    mock.expect_exec()
        .withf(|program, args| program == "gcloud" && args.contains(&"version".to_owned()))
        .returning(|_, _| Ok("495.0.0\n".to_owned()));

    // docker version
    mock.expect_exec()
        .withf(|program, _| program == "docker")
        .returning(|_, _| Ok("Docker version 27.3.1, build ce12230\n".to_owned()));

    // auth
    mock.expect_exec()
        .withf(|_, args| args.contains(&"print-access-token".to_owned()))
        .returning(|_, _| Ok("ya29.token\n".to_owned()));

    // project describe
    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"describe".to_owned()) && args.contains(&"projects".to_owned())
        })
        .returning(|_, _| Ok("my-project-name\n".to_owned()));

    // services list (2 API checks)
    mock.expect_exec()
        .withf(|_, args| args.contains(&"services".to_owned()) && args.contains(&"list".to_owned()))
        .returning(|_, args| {
            // Echo the filtered API name to signal it is enabled
            let filter_arg = args.iter().find(|a| a.starts_with("config.name="));
            match filter_arg {
                Some(f) => Ok(format!(
                    "{}\n",
                    f.strip_prefix("config.name=").unwrap_or("")
                )),
                None => Ok(String::new()),
            }
        });

    let client = GcloudClient::with_executor(mock);
    let report = client.check_prerequisites("test-project").await.unwrap();

    assert_eq!(report.gcloud_version.as_deref(), Some("495.0.0"));
    assert_eq!(
        report.docker_version.as_deref(),
        Some("Docker version 27.3.1, build ce12230")
    );
    assert!(report.authenticated);
    assert_eq!(report.project_name.as_deref(), Some("my-project-name"));
    assert!(report.disabled_apis.is_empty());
    assert!(!report.has_warnings());
}

#[tokio::test]
async fn preflight_gcloud_not_installed() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|program, _| program == "gcloud")
        .returning(|program, _| Err(not_found(program)));

    let client = GcloudClient::with_executor(mock);
    let result = client.check_prerequisites("test-project").await;

    assert!(matches!(result, Err(PreflightError::GcloudNotInstalled)));
}

#[tokio::test]
async fn preflight_docker_not_installed() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|program, _| program == "gcloud")
        .returning(|_, _| Ok("495.0.0\n".to_owned()));
    mock.expect_exec()
        .withf(|program, _| program == "docker")
        .returning(|program, _| Err(not_found(program)));

    let client = GcloudClient::with_executor(mock);
    let result = client.check_prerequisites("test-project").await;

    assert!(matches!(result, Err(PreflightError::DockerNotInstalled)));
}

#[tokio::test]
async fn preflight_not_authenticated() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|_, args| args.contains(&"version".to_owned()))
        .returning(|_, _| Ok("495.0.0\n".to_owned()));
    mock.expect_exec()
        .withf(|program, _| program == "docker")
        .returning(|_, _| Ok("Docker version 27.3.1\n".to_owned()));
    mock.expect_exec()
        .withf(|_, args| args.contains(&"print-access-token".to_owned()))
        .returning(|program, _| Err(command_failed(program, "not logged in")));

    let client = GcloudClient::with_executor(mock);
    let result = client.check_prerequisites("test-project").await;

    assert!(matches!(result, Err(PreflightError::NotAuthenticated)));
}

#[tokio::test]
async fn preflight_project_not_accessible() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|_, args| args.contains(&"version".to_owned()))
        .returning(|_, _| Ok("495.0.0\n".to_owned()));
    mock.expect_exec()
        .withf(|program, _| program == "docker")
        .returning(|_, _| Ok("Docker version 27.3.1\n".to_owned()));
    mock.expect_exec()
        .withf(|_, args| args.contains(&"print-access-token".to_owned()))
        .returning(|_, _| Ok("ya29.token\n".to_owned()));
    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"describe".to_owned()) && args.contains(&"projects".to_owned())
        })
        .returning(|program, _| Err(command_failed(program, "not found")));

    let client = GcloudClient::with_executor(mock);
    let result = client.check_prerequisites("bad-project").await;

    assert!(matches!(
        result,
        Err(PreflightError::ProjectNotAccessible(ref p)) if p == "bad-project"
    ));
}

#[tokio::test]
async fn preflight_disabled_apis_reported() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|_, args| args.contains(&"version".to_owned()))
        .returning(|_, _| Ok("495.0.0\n".to_owned()));
    mock.expect_exec()
        .withf(|program, _| program == "docker")
        .returning(|_, _| Ok("Docker version 27.3.1\n".to_owned()));
    mock.expect_exec()
        .withf(|_, args| args.contains(&"print-access-token".to_owned()))
        .returning(|_, _| Ok("ya29.token\n".to_owned()));
    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"describe".to_owned()) && args.contains(&"projects".to_owned())
        })
        .returning(|_, _| Ok("my-project\n".to_owned()));

    // All API checks return empty (disabled)
    mock.expect_exec()
        .withf(|_, args| args.contains(&"services".to_owned()) && args.contains(&"list".to_owned()))
        .returning(|_, _| Ok("\n".to_owned()));

    let client = GcloudClient::with_executor(mock);
    let report = client.check_prerequisites("test-project").await.unwrap();

    assert!(report.has_warnings());
    assert_eq!(report.disabled_apis.len(), 2);
    assert!(
        report
            .disabled_apis
            .contains(&"run.googleapis.com".to_owned())
    );
    assert!(
        report
            .disabled_apis
            .contains(&"artifactregistry.googleapis.com".to_owned())
    );
}

// ── Doctor Tests ──

#[tokio::test]
async fn doctor_reports_failures_without_early_return() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|program, _| program == "gcloud")
        .returning(|program, _| Err(not_found(program)));
    mock.expect_exec()
        .withf(|program, _| program == "docker")
        .returning(|program, _| Err(not_found(program)));

    let client = GcloudClient::with_executor(mock);
    let report = client.doctor(None).await;

    assert!(!report.gcloud.passed);
    assert!(!report.docker.passed);
    assert!(!report.project.passed);
    assert!(!report.all_passed());
}

#[tokio::test]
async fn doctor_parses_sdk_version_line() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|program, args| program == "gcloud" && args == ["version".to_owned()])
        .returning(|_, _| Ok("Google Cloud SDK 512.0.0\nbq 2.1.11\n".to_owned()));
    mock.expect_exec()
        .withf(|program, _| program == "docker")
        .returning(|_, _| Ok("Docker version 27.3.1, build ce12230\n".to_owned()));
    mock.expect_exec()
        .withf(|_, args| args.contains(&"account".to_owned()))
        .returning(|_, _| Ok("dev@example.com\n".to_owned()));

    let client = GcloudClient::with_executor(mock);
    let report = client.doctor(None).await;

    assert!(report.gcloud.passed);
    assert_eq!(report.gcloud.detail, "512.0.0");
    assert!(report.docker.passed);
    assert_eq!(report.docker.detail, "27.3.1, build ce12230");
    assert!(report.account.passed);
    // No project id: project check fails, report still returned
    assert!(!report.project.passed);
}

// ── Artifact Registry Tests ──

#[tokio::test]
async fn ensure_artifact_repo_skips_create_when_exists() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"repositories".to_owned()) && args.contains(&"describe".to_owned())
        })
        .times(1)
        .returning(|_, _| Ok("repo-a\n".to_owned()));
    // No expectation for `create`: calling it fails the test

    let client = GcloudClient::with_executor(mock);
    client
        .ensure_artifact_repo("proj-1", "us-central1", "repo-a")
        .await
        .unwrap();
}

#[tokio::test]
async fn ensure_artifact_repo_creates_when_missing() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"repositories".to_owned()) && args.contains(&"describe".to_owned())
        })
        .returning(|program, _| Err(command_failed(program, "NOT_FOUND")));
    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"repositories".to_owned())
                && args.contains(&"create".to_owned())
                && args.contains(&"--repository-format".to_owned())
                && args.contains(&"docker".to_owned())
        })
        .times(1)
        .returning(|_, _| Ok(String::new()));

    let client = GcloudClient::with_executor(mock);
    client
        .ensure_artifact_repo("proj-1", "us-central1", "repo-a")
        .await
        .unwrap();
}

#[tokio::test]
async fn ensure_artifact_repo_create_failure_is_surfaced() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|_, args| args.contains(&"describe".to_owned()))
        .returning(|program, _| Err(command_failed(program, "NOT_FOUND")));
    mock.expect_exec()
        .withf(|_, args| args.contains(&"create".to_owned()))
        .returning(|program, _| Err(command_failed(program, "PERMISSION_DENIED")));

    let client = GcloudClient::with_executor(mock);
    let result = client
        .ensure_artifact_repo("proj-1", "us-central1", "repo-a")
        .await;

    assert!(matches!(result, Err(RegistryError::EnsureRepo { .. })));
}

#[tokio::test]
async fn configure_docker_targets_registry_host() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|program, args| {
            program == "gcloud"
                && args.contains(&"configure-docker".to_owned())
                && args.contains(&"us-central1-docker.pkg.dev".to_owned())
                && args.contains(&"--quiet".to_owned())
        })
        .times(1)
        .returning(|_, _| Ok(String::new()));

    let client = GcloudClient::with_executor(mock);
    client
        .configure_docker("us-central1-docker.pkg.dev")
        .await
        .unwrap();
}

// ── Service surface Tests ──

#[tokio::test]
async fn describe_service_returns_status_yaml() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|_, args| {
            args.contains(&"services".to_owned())
                && args.contains(&"describe".to_owned())
                && args.contains(&"travel-agency".to_owned())
        })
        .returning(|_, _| Ok("status:\n  url: https://travel-agency-uc.a.run.app\n".to_owned()));

    let client = GcloudClient::with_executor(mock);
    let output = client
        .describe_service("travel-agency", "proj-1", "us-central1")
        .await
        .unwrap();

    assert!(output.contains("travel-agency-uc.a.run.app"));
}

#[tokio::test]
async fn read_logs_passes_limit() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|program, args| {
            program == "gcloud"
                && args.contains(&"logs".to_owned())
                && args.contains(&"--limit".to_owned())
                && args.contains(&"250".to_owned())
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let client = GcloudClient::with_executor(mock);
    client
        .read_logs("travel-agency", "proj-1", "us-central1", 250)
        .await
        .unwrap();
}

#[tokio::test]
async fn read_logs_failure_is_surfaced() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .returning(|program, _| Err(command_failed(program, "permission denied")));

    let client = GcloudClient::with_executor(mock);
    let result = client
        .read_logs("travel-agency", "proj-1", "us-central1", 100)
        .await;

    assert!(matches!(result, Err(ServiceError::Logs { .. })));
}
