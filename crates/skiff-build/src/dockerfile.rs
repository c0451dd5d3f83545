use skiff_core::{BuildConfig, BuildProfile};

/// Directories under `target/release` that hold intermediate build products.
/// They are deleted after compilation so the runtime stage copies only the
/// release output itself.
const INTERMEDIATE_DIRS: &[&str] = &["build", "deps", "incremental", "examples", ".fingerprint"];

/// Generates the two-stage Dockerfile: a toolchain-heavy builder stage that
/// compiles the release binary, and a minimal runtime stage that receives
/// only the filtered release output.
pub struct DockerfileGenerator<'a> {
    config: &'a BuildConfig,
    profile: BuildProfile,
    binary: &'a str,
    port: u16,
}

impl<'a> DockerfileGenerator<'a> {
    pub fn new(config: &'a BuildConfig, profile: BuildProfile, binary: &'a str, port: u16) -> Self {
        Self {
            config,
            profile,
            binary,
            port,
        }
    }

    pub fn render(&self) -> String {
        let packages = if self.config.runtime_packages.is_empty() {
            String::new()
        } else {
            format!(
                "RUN apt-get update && apt-get install -y --no-install-recommends {} \\\n    && rm -rf /var/lib/apt/lists/*\n",
                self.config.runtime_packages.join(" ")
            )
        };

        let prune = INTERMEDIATE_DIRS
            .iter()
            .map(|d| format!("target/release/{d}"))
            .collect::<Vec<_>>()
            .join(" \\\n        ");

        format!(
            r#"# === Stage 1: Builder ({profile} toolchain) ===
FROM {toolchain} AS builder
WORKDIR /app
COPY . .
RUN cargo build --release --bin {binary}

# Drop intermediate build products; only the release output ships.
RUN rm -rf {prune}

# === Stage 2: Runtime ===
FROM {runtime}
{packages}WORKDIR /app
COPY --from=builder /app/target/release /app
EXPOSE {port}
ENTRYPOINT ["/app/{binary}"]
"#,
            profile = self.profile,
            toolchain = self.config.toolchain_image(self.profile),
            binary = self.binary,
            prune = prune,
            runtime = self.config.runtime_image,
            packages = packages,
            port = self.port,
        )
    }
}
