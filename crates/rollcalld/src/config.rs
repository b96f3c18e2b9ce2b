use rollcall_core::{PipelineConfig, DEFAULT_TOLERANCE};
use std::path::PathBuf;
use std::time::Duration;

/// Daemon configuration, loaded from `ROLLCALL_*` environment variables.
pub struct Config {
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// Path to the persisted known-face registry blob.
    pub registry_path: PathBuf,
    /// Path to the attendance CSV ledger.
    pub ledger_path: PathBuf,
    /// Directory of labeled seed images enrolled at startup.
    pub seed_dir: PathBuf,
    /// Unix socket of the external face detection/encoding service.
    pub encoder_socket: PathBuf,
    /// Distance tolerance shared by matcher and caches.
    pub tolerance: f32,
    /// Identity whose recognition logs attendance immediately.
    pub self_name: String,
    /// TTL of a prompt-suppression entry.
    pub prompt_ttl: Duration,
    /// Rolling window for per-name ledger writes.
    pub log_cooldown: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("rollcall");

        Self {
            camera_device: std::env::var("ROLLCALL_CAMERA_DEVICE")
                .unwrap_or_else(|_| "/dev/video0".to_string()),
            registry_path: env_path("ROLLCALL_REGISTRY_PATH", data_dir.join("faces.bin")),
            ledger_path: env_path("ROLLCALL_LEDGER_PATH", data_dir.join("attendance.csv")),
            seed_dir: env_path("ROLLCALL_SEED_DIR", data_dir.join("known")),
            encoder_socket: env_path(
                "ROLLCALL_ENCODER_SOCKET",
                PathBuf::from("/run/rollcall/encoder.sock"),
            ),
            tolerance: env_f32("ROLLCALL_TOLERANCE", DEFAULT_TOLERANCE),
            self_name: std::env::var("ROLLCALL_SELF_NAME").unwrap_or_default(),
            prompt_ttl: Duration::from_secs(env_u64("ROLLCALL_PROMPT_TTL_SECS", 5)),
            log_cooldown: Duration::from_secs(env_u64("ROLLCALL_LOG_COOLDOWN_SECS", 300)),
        }
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            tolerance: self.tolerance,
            self_name: self.self_name.clone(),
            prompt_ttl: self.prompt_ttl,
            registry_path: self.registry_path.clone(),
        }
    }
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
