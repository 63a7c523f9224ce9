pub mod paths;
pub mod pattern;

pub use paths::{extension_of, temp_path_for, TEMP_MARKER};
pub use pattern::BaseNameMatcher;
