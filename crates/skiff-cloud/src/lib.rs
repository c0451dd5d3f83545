//! External process execution and the deploy pipeline driver.
//!
//! The [`pipeline`] module owns the build → push → deploy sequence; the
//! [`client`] module covers ancillary gcloud operations (preflight, doctor,
//! Artifact Registry repository management, service status and logs). Both
//! are parameterized over [`CommandExecutor`] so tests can substitute mocks
//! for the real `docker` and `gcloud` binaries.

pub mod client;
pub mod executor;
pub mod pipeline;
pub mod process;

pub use client::{
    ApiCheck, CheckResult, DoctorReport, GcloudClient, PreflightError, PreflightReport,
    RegistryError, ServiceError,
};
pub use executor::{CommandExecutor, RealExecutor};
pub use pipeline::{
    PipelineDriver, PipelineError, PipelinePlan, RunReport, RunState, Step, StepRecord,
};
pub use process::ProcessError;
