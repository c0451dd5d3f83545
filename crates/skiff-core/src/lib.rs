//! Core types and configuration for skiff.
//!
//! This crate defines the `skiff.toml` schema ([`SkiffConfig`]), the
//! substitution variable namespace ([`Substitutions`]), the fully qualified
//! container image identifier ([`ImageRef`]), Cargo project discovery
//! ([`CargoProject`]), and shared error types.

pub mod cargo;
pub mod config;
pub mod error;
pub mod image;
pub mod vars;

pub use cargo::{CargoBinary, CargoProject};
pub use config::{BuildConfig, BuildProfile, ProjectConfig, ServiceConfig, SkiffConfig};
pub use error::{Error, Result};
pub use image::ImageRef;
pub use vars::Substitutions;
