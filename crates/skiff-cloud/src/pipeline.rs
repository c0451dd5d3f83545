//! The deploy pipeline driver: a fixed, fail-fast sequence of three steps.
//!
//! ```text
//! Init → Building → Pushing → Deploying → Succeeded
//!          │           │          │
//!          └───────────┴──────────┴──→ Failed(step)
//! ```
//!
//! The sequence is encoded explicitly in [`PipelineDriver::plan_steps`];
//! nothing is derived from declaration order elsewhere. All three steps
//! interpolate the same rendered image reference, so the tag the build step
//! applies is byte-identical to the one push publishes and deploy pins.
//! Step N+1 never starts unless step N exited zero. There are no retries
//! and no rollback; a failure surfaces the failing step's identity and the
//! process's own stderr, and leaves any previously running revision alone.

use std::path::PathBuf;

use skiff_core::{ImageRef, Substitutions, vars};

use crate::executor::{CommandExecutor, RealExecutor};
use crate::process::ProcessError;

/// The three pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Build,
    Push,
    Deploy,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Push => "push",
            Self::Deploy => "deploy",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run state. Terminal states are `Succeeded` and `Failed`; there are no
/// transitions out of either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Building,
    Pushing,
    Deploying,
    Succeeded,
    Failed { step: Step },
}

/// Everything a run needs, resolved before the first step.
#[derive(Debug, Clone)]
pub struct PipelinePlan {
    /// Staged build context directory.
    pub context_dir: PathBuf,
    /// The resolved, read-only variable namespace.
    pub subs: Substitutions,
    /// Port the deployed service listens on.
    pub port: u16,
}

/// A fully rendered step: name, program, arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub program: &'static str,
    pub args: Vec<String>,
}

/// Outcome of a successful run, kept for provenance.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The one image reference this run produced, pushed, and deployed.
    pub image: ImageRef,
    /// The executed steps, in order.
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("variable resolution failed before any step ran")]
    Resolution { source: skiff_core::Error },

    #[error("context path is not valid UTF-8: {0}")]
    InvalidContextPath(PathBuf),

    #[error("build step failed")]
    Build { source: ProcessError },

    #[error("push step failed")]
    Push { source: ProcessError },

    #[error("deploy step failed")]
    Deploy { source: ProcessError },
}

impl PipelineError {
    /// The step that failed, if a step ran at all.
    pub fn failed_step(&self) -> Option<Step> {
        match self {
            Self::Build { .. } => Some(Step::Build),
            Self::Push { .. } => Some(Step::Push),
            Self::Deploy { .. } => Some(Step::Deploy),
            Self::Resolution { .. } | Self::InvalidContextPath(_) => None,
        }
    }
}

/// Executes the build → push → deploy sequence against an executor.
pub struct PipelineDriver<E: CommandExecutor = RealExecutor> {
    executor: E,
    state: RunState,
}

impl PipelineDriver<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
            state: RunState::Init,
        }
    }
}

impl Default for PipelineDriver<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> PipelineDriver<E> {
    pub fn with_executor(executor: E) -> Self {
        Self {
            executor,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Render the three steps from the resolved namespace.
    ///
    /// The image reference is expanded once and the same string is placed
    /// into every argument vector that mentions it.
    fn plan_steps(plan: &PipelinePlan) -> Result<Vec<StepRecord>, PipelineError> {
        let context = plan
            .context_dir
            .to_str()
            .ok_or_else(|| PipelineError::InvalidContextPath(plan.context_dir.clone()))?;

        let resolve = |r: Result<String, skiff_core::Error>| {
            r.map_err(|source| PipelineError::Resolution { source })
        };

        let image = resolve(plan.subs.expand(vars::IMAGE_REF_TEMPLATE))?;
        let service = resolve(plan.subs.expand("${_SERVICE_NAME}"))?;
        let region = resolve(plan.subs.expand("${_REGION}"))?;
        let project = resolve(plan.subs.expand("${_PROJECT_ID}"))?;

        Ok(vec![
            StepRecord {
                step: Step::Build,
                program: "docker",
                args: vec![
                    "build".to_owned(),
                    "--tag".to_owned(),
                    image.clone(),
                    context.to_owned(),
                ],
            },
            StepRecord {
                step: Step::Push,
                program: "docker",
                args: vec!["push".to_owned(), image.clone()],
            },
            StepRecord {
                step: Step::Deploy,
                program: "gcloud",
                args: vec![
                    "run".to_owned(),
                    "deploy".to_owned(),
                    service,
                    "--image".to_owned(),
                    image,
                    "--region".to_owned(),
                    region,
                    "--project".to_owned(),
                    project,
                    "--platform".to_owned(),
                    "managed".to_owned(),
                    "--port".to_owned(),
                    plan.port.to_string(),
                    "--quiet".to_owned(),
                ],
            },
        ])
    }

    /// Execute the plan. Returns after the first failure; on success the
    /// report carries the produced image reference and the executed steps.
    pub async fn run(&mut self, plan: &PipelinePlan) -> Result<RunReport, PipelineError> {
        let image = plan
            .subs
            .image_ref()
            .map_err(|source| PipelineError::Resolution { source })?;
        let steps = Self::plan_steps(plan)?;

        for record in &steps {
            self.state = match record.step {
                Step::Build => RunState::Building,
                Step::Push => RunState::Pushing,
                Step::Deploy => RunState::Deploying,
            };
            tracing::info!(step = %record.step, program = record.program, "running pipeline step");

            if let Err(source) = self
                .executor
                .exec_streaming(record.program, &record.args)
                .await
            {
                self.state = RunState::Failed { step: record.step };
                tracing::warn!(step = %record.step, "pipeline step failed");
                return Err(match record.step {
                    Step::Build => PipelineError::Build { source },
                    Step::Push => PipelineError::Push { source },
                    Step::Deploy => PipelineError::Deploy { source },
                });
            }
        }

        self.state = RunState::Succeeded;
        tracing::info!(image = %image, "pipeline succeeded");

        Ok(RunReport { image, steps })
    }
}
