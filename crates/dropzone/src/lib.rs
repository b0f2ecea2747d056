pub mod broadcast;
pub mod config;
pub mod error;
pub mod logging;
pub mod random;
pub mod record;
pub mod share;
pub mod simulator;
pub mod store;
pub mod validation;

pub use broadcast::{UploadProgressBroadcaster, UploadProgressEvent};
pub use config::{load_config, Config};
pub use error::{ConfigError, DropzoneError, Result};
pub use logging::init_logging;
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use record::{
    derive_links, format_file_size, FileDescriptor, FileRecord, FileStatus, RecordPatch,
};
pub use share::ShareLinkGenerator;
pub use simulator::{BatchReport, BatchUploader, UploadOutcome, UploadSimulator, UploadTask};
pub use store::fixture::load_fixture;
pub use store::{HistoryQuery, RecordRepository, RecordStore, SessionStore};
pub use validation::Validator;
