//! Fixed values for the Maven smoke scenario.

/// Default image builder CLI.
pub const PACK_BINARY: &str = "pack";

/// Default container runtime CLI.
pub const DOCKER_BINARY: &str = "docker";

/// Sample Maven application built by every case.
pub const DEFAULT_SOURCE_DIR: &str = "fixtures/java/maven";

/// Port the sample application listens on inside the container.
pub const CONTAINER_PORT: u16 = 8080;

/// Spring Boot actuator health path.
pub const HEALTH_PATH: &str = "/actuator/health";

/// Substring a healthy response body must contain.
pub const HEALTH_NEEDLE: &str = "UP";

/// Upper bound on health polling, in seconds.
pub const HEALTH_TIMEOUT_SECS: u64 = 60;

/// Delay between two health probes, in milliseconds.
pub const HEALTH_POLL_INTERVAL_MS: u64 = 1000;

/// Numeric group id the build runs with.
pub const BUILD_GROUP_ID: u32 = 123;

/// Image pull policy handed to the builder.
pub const PULL_POLICY: &str = "never";

/// JVM version requested from the JDK buildpack.
pub const JVM_VERSION: &str = "17";

/// Prefix of every generated image and container name.
pub const NAME_PREFIX: &str = "smoke";

/// Buildpacks that must appear in the build log, in this order.
pub const EXPECTED_BUILDPACKS: [&str; 5] = [
    "Paketo Buildpack for CA Certificates",
    "Paketo Buildpack for BellSoft Liberica",
    "Paketo Buildpack for Maven",
    "Paketo Buildpack for Executable JAR",
    "Paketo Buildpack for Spring Boot",
];

/// Environment variable holding comma-separated builder names.
pub const BUILDERS_ENV: &str = "SMOKE_BUILDERS";

/// Application name used in CLI output and reports.
pub const APP_NAME: &str = "maven-smoke";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "smoke";
