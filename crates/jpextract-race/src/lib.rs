//! Race probability augmentation: defendant name normalisation and
//! delegation to an external name-and-geography model.

mod error;
pub use error::RaceError;

pub mod augment;
pub mod model;
pub mod names;

pub use augment::calculate_race_probs;
pub use model::{CommandModel, DEFAULT_CATEGORIES, RaceModel};
pub use names::{ParsedName, extract_first_defendant_name, strip_defendant_name};
