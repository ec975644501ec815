//! Shared data model: track types, track records, option maps, errors.

mod enums;
mod media;
mod options;
mod results;

pub use enums::TrackType;
pub use media::TrackRecord;
pub use options::{OptionMap, OptionValue};
pub use results::{MkvError, MkvResult};
