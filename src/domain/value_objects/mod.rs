pub mod embedding_status;
pub mod file_hash;
pub mod file_kind;
pub mod speaker_role;
pub mod time_bucket;

pub use embedding_status::EmbeddingStatus;
pub use file_hash::FileHash;
pub use file_kind::{FileKind, MAX_FILE_SIZE_BYTES, validate_upload};
pub use speaker_role::SpeakerRole;
pub use time_bucket::TimeBucket;
