pub mod change_classifier;
pub mod version_calculator;

pub use change_classifier::ChangeClassifier;
pub use version_calculator::next_version;
