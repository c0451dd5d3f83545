use std::path::Path;

/// Ejects the generated Dockerfile into the project directory.
///
/// After ejecting, `skiff deploy` uses `.skiff/Dockerfile` verbatim
/// instead of generating one.
pub fn eject(project_dir: &Path, dockerfile_content: &str) -> Result<(), EjectError> {
    let skiff_dir = project_dir.join(".skiff");
    std::fs::create_dir_all(&skiff_dir).map_err(|e| EjectError::CreateDir {
        path: skiff_dir.clone(),
        source: e,
    })?;

    let dockerfile_path = skiff_dir.join("Dockerfile");
    if dockerfile_path.exists() {
        return Err(EjectError::AlreadyEjected(dockerfile_path));
    }

    std::fs::write(&dockerfile_path, dockerfile_content).map_err(|e| EjectError::Write {
        path: dockerfile_path,
        source: e,
    })?;

    Ok(())
}

/// Check if the project has an ejected Dockerfile.
pub fn is_ejected(project_dir: &Path) -> bool {
    project_dir.join(".skiff").join("Dockerfile").exists()
}

/// Load ejected Dockerfile content.
pub fn load_ejected_dockerfile(project_dir: &Path) -> Result<String, EjectError> {
    let path = project_dir.join(".skiff").join("Dockerfile");
    std::fs::read_to_string(&path).map_err(|e| EjectError::Read { path, source: e })
}

#[derive(Debug, thiserror::Error)]
pub enum EjectError {
    #[error("failed to create .skiff directory at {path}")]
    CreateDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("Dockerfile already ejected at {0} — edit directly or delete to re-eject")]
    AlreadyEjected(std::path::PathBuf),
    #[error("failed to write {path}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read ejected Dockerfile at {path}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}
