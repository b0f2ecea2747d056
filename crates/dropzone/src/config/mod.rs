pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, validate_config, validate_progress};
pub use schema::{
    Config, LatencyConfig, LinksConfig, ProgressConfig, RecordLatency, SessionLatency,
    DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_SIZE_BYTES,
};
