//! Fully qualified Artifact Registry image references.
//!
//! A reference has the shape
//! `{location}-docker.pkg.dev/{project}/{repository}/{image}/{service}:{tag}`.
//! The tag is the commit id of the pipeline run, so one reference names one
//! build. Whatever string the build step tags is the string the push and
//! deploy steps must see; [`ImageRef`] is constructed once per run and only
//! ever rendered, never re-derived.

use serde::Serialize;

/// A validated, fully qualified container image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub location: String,
    pub project: String,
    pub repository: String,
    pub image: String,
    pub service: String,
    pub tag: String,
}

impl ImageRef {
    /// Build a reference, validating every component.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidImageRef`](crate::Error::InvalidImageRef) when a path
    /// component is empty or contains characters Artifact Registry rejects,
    /// or when the tag violates the container tag grammar.
    pub fn new(
        location: impl Into<String>,
        project: impl Into<String>,
        repository: impl Into<String>,
        image: impl Into<String>,
        service: impl Into<String>,
        tag: impl Into<String>,
    ) -> crate::Result<Self> {
        let r = Self {
            location: location.into(),
            project: project.into(),
            repository: repository.into(),
            image: image.into(),
            service: service.into(),
            tag: tag.into(),
        };

        validate_component("location", &r.location)?;
        validate_component("project", &r.project)?;
        validate_component("repository", &r.repository)?;
        validate_component("image", &r.image)?;
        validate_component("service", &r.service)?;
        validate_tag(&r.tag)?;

        Ok(r)
    }

    /// The registry hostname, e.g. `us-central1-docker.pkg.dev`.
    pub fn registry_host(&self) -> String {
        format!("{}-docker.pkg.dev", self.location)
    }

    /// The repository path without the tag.
    pub fn repository_path(&self) -> String {
        format!(
            "{host}/{project}/{repository}/{image}/{service}",
            host = self.registry_host(),
            project = self.project,
            repository = self.repository,
            image = self.image,
            service = self.service,
        )
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.repository_path(), self.tag)
    }
}

fn validate_component(field: &'static str, value: &str) -> crate::Result<()> {
    if value.is_empty() {
        return Err(crate::Error::InvalidImageRef {
            field,
            value: value.to_owned(),
            reason: "must not be empty",
        });
    }

    let ok = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'));
    if !ok {
        return Err(crate::Error::InvalidImageRef {
            field,
            value: value.to_owned(),
            reason: "only lowercase letters, digits, '-', '_' and '.' are allowed",
        });
    }

    Ok(())
}

/// Container tag grammar: up to 128 chars of `[A-Za-z0-9_.-]`, not starting
/// with '.' or '-'.
fn validate_tag(value: &str) -> crate::Result<()> {
    if value.is_empty() {
        return Err(crate::Error::InvalidImageRef {
            field: "tag",
            value: value.to_owned(),
            reason: "must not be empty",
        });
    }
    if value.len() > 128 {
        return Err(crate::Error::InvalidImageRef {
            field: "tag",
            value: value.to_owned(),
            reason: "must be at most 128 characters",
        });
    }
    if value.starts_with('.') || value.starts_with('-') {
        return Err(crate::Error::InvalidImageRef {
            field: "tag",
            value: value.to_owned(),
            reason: "must not start with '.' or '-'",
        });
    }

    let ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !ok {
        return Err(crate::Error::InvalidImageRef {
            field: "tag",
            value: value.to_owned(),
            reason: "only letters, digits, '-', '_' and '.' are allowed",
        });
    }

    Ok(())
}
