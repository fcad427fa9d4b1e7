//! Core domain entities
//!
//! Pure data structures and the normalization logic that operates on them.
//! No I/O here; parsing lives in `format` and persistence in `adapters`.

pub mod normalize;
mod platform;
mod record;
pub mod result;
mod session;
mod summary;

pub use platform::Platform;
pub use record::{
    NormalizedRecord, RawRecord, RawValue, RecordCategory, RecordDraft, ReferenceRecord,
};
pub use session::ImportSession;
pub use summary::{ImportSummary, SummaryMeta};
