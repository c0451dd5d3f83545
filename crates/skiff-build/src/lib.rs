//! Dockerfile generation, build context staging, and eject for skiff.
//!
//! # Deploy pipeline
//!
//! ```text
//! skiff deploy
//!   1. Dirty check ── git status --porcelain (skip with --allow-dirty)
//!   2. Commit id   ── git rev-parse HEAD (override with --commit)
//!   3. Dockerfile  ── DockerfileGenerator::render()
//!   4. Context     ── git ls-files → .skiff-context/
//!   5. Pipeline    ── docker build → docker push → gcloud run deploy
//! ```
//!
//! # Context strategy
//!
//! The staged context mirrors the git repository state:
//! - All tracked and untracked (non-ignored) files via `git ls-files`
//! - `.gitignore`d paths are excluded automatically
//! - `.skiff-context/`, `.skiff/`, `.git/` are always excluded
//!
//! # Build profiles
//!
//! The builder stage base image is selected by profile: `pinned` uses a
//! fixed toolchain version, `floating` uses `rust:latest`. The runtime
//! stage is identical under both profiles.

pub mod context;
pub mod dockerfile;
pub mod eject;

pub use dockerfile::DockerfileGenerator;
