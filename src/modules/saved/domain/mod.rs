mod saved_record;

pub use saved_record::{SavedRecord, Sluggable};
