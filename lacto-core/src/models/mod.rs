mod draft;
mod ferment;
mod status;
mod tags;
mod unit;

pub use draft::{DraftError, FermentDraft, MAX_NOTES_LEN};
pub use ferment::FermentEntry;
pub use status::FermentStatus;
pub use tags::{TagError, TagSet, MAX_TAGS, MAX_TAG_LEN};
pub use unit::{Unit, UnitKind};
