//! The substitution variable namespace for a pipeline run.
//!
//! Every value a pipeline step interpolates — registry location, project id,
//! repository, image name, service name, region, commit id — is resolved
//! here exactly once, before any step runs. Resolution failures (a missing
//! `gcp_project_id`, a malformed commit id) abort the run before a single
//! external process is spawned. After [`Substitutions::resolve`] returns,
//! the namespace is read-only.
//!
//! Step arguments are written as templates over `${NAME}` placeholders and
//! rendered with [`Substitutions::expand`]; referencing a name that is not
//! in the namespace is an error, not an empty string.

use std::collections::BTreeMap;

use crate::config::SkiffConfig;
use crate::image::ImageRef;
use crate::{CargoProject, Error};

/// Artifact Registry location, e.g. `us-central1`.
pub const LOCATION: &str = "_LOCATION";
/// GCP project id.
pub const PROJECT_ID: &str = "_PROJECT_ID";
/// Artifact Registry repository name.
pub const REPOSITORY: &str = "_REPOSITORY";
/// Image name within the repository.
pub const IMAGE: &str = "_IMAGE";
/// Cloud Run service name.
pub const SERVICE_NAME: &str = "_SERVICE_NAME";
/// Cloud Run region.
pub const REGION: &str = "_REGION";
/// Commit id of the source tree being shipped; becomes the version tag.
pub const COMMIT_SHA: &str = "COMMIT_SHA";

/// Template for the run's fully qualified image reference. Expanding this
/// against a resolved namespace yields exactly [`Substitutions::image_ref`]
/// rendered as a string; the pipeline steps all interpolate this one
/// template so the tag cannot drift between build, push, and deploy.
pub const IMAGE_REF_TEMPLATE: &str =
    "${_LOCATION}-docker.pkg.dev/${_PROJECT_ID}/${_REPOSITORY}/${_IMAGE}/${_SERVICE_NAME}:${COMMIT_SHA}";

/// Immutable, fully resolved variable namespace.
#[derive(Debug, Clone)]
pub struct Substitutions {
    values: BTreeMap<&'static str, String>,
}

impl Substitutions {
    /// Resolve the namespace from configuration, project metadata, and the
    /// run's commit id.
    ///
    /// Defaults: the service name falls back to the package name, the image
    /// name to the deployed binary name, and the registry location to the
    /// Cloud Run region.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingVariable`] when `gcp_project_id` is unset
    /// - [`Error::InvalidVariable`] when a resolved value is empty or the
    ///   commit id is not a plausible revision identifier
    pub fn resolve(
        config: &SkiffConfig,
        project: &CargoProject,
        commit: &str,
    ) -> crate::Result<Self> {
        let project_id =
            config
                .project
                .gcp_project_id
                .as_deref()
                .ok_or(Error::MissingVariable {
                    name: PROJECT_ID,
                    hint: "set [project].gcp_project_id in skiff.toml",
                })?;

        let service_name = config.project.name.as_deref().unwrap_or(&project.name);
        let image = config
            .project
            .image
            .as_deref()
            .unwrap_or(&project.default_binary);

        let mut values = BTreeMap::new();
        values.insert(LOCATION, config.registry_location().to_owned());
        values.insert(PROJECT_ID, project_id.to_owned());
        values.insert(REPOSITORY, config.project.repository.clone());
        values.insert(IMAGE, image.to_owned());
        values.insert(SERVICE_NAME, service_name.to_owned());
        values.insert(REGION, config.project.region.clone());
        values.insert(COMMIT_SHA, commit.to_owned());

        for (name, value) in &values {
            if value.trim().is_empty() {
                return Err(Error::InvalidVariable {
                    name: *name,
                    value: value.clone(),
                    reason: "must not be empty",
                });
            }
        }

        validate_commit(commit)?;

        tracing::debug!(
            location = %values[LOCATION],
            project = %values[PROJECT_ID],
            repository = %values[REPOSITORY],
            image = %values[IMAGE],
            service = %values[SERVICE_NAME],
            region = %values[REGION],
            commit = %values[COMMIT_SHA],
            "substitution variables resolved"
        );

        Ok(Self { values })
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> crate::Result<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownVariable {
                name: name.to_owned(),
            })
    }

    /// Render a template, replacing each `${NAME}` with its resolved value.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownVariable`] for a placeholder not in the namespace
    /// - [`Error::UnterminatedPlaceholder`] for a `${` without closing `}`
    pub fn expand(&self, template: &str) -> crate::Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                return Err(Error::UnterminatedPlaceholder {
                    template: template.to_owned(),
                });
            };
            out.push_str(self.get(&after[..end])?);
            rest = &after[end + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }

    /// The image reference this run builds, pushes, and deploys.
    pub fn image_ref(&self) -> crate::Result<ImageRef> {
        ImageRef::new(
            self.get(LOCATION)?,
            self.get(PROJECT_ID)?,
            self.get(REPOSITORY)?,
            self.get(IMAGE)?,
            self.get(SERVICE_NAME)?,
            self.get(COMMIT_SHA)?,
        )
    }

    /// Iterate over the resolved (name, value) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// A commit id is used verbatim as the version tag, so it must satisfy the
/// tag grammar; additionally reject anything that is not hex-ish to catch
/// accidental branch names early.
fn validate_commit(commit: &str) -> crate::Result<()> {
    if commit.is_empty() {
        return Err(Error::InvalidVariable {
            name: COMMIT_SHA,
            value: commit.to_owned(),
            reason: "must not be empty",
        });
    }
    if commit.len() > 40 {
        return Err(Error::InvalidVariable {
            name: COMMIT_SHA,
            value: commit.to_owned(),
            reason: "must be at most 40 characters",
        });
    }
    if !commit.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidVariable {
            name: COMMIT_SHA,
            value: commit.to_owned(),
            reason: "must be a hexadecimal revision id",
        });
    }

    Ok(())
}
