mod extension_classifier;
mod file_relocator;
mod file_scanner;
mod path_validator;

pub use extension_classifier::{ExtensionClassifier, extension_of, stem_of};
pub use file_relocator::relocate_to_remove;
pub use file_scanner::{REMOVE_DIR_NAME, scan_all_files, scan_sub_directories_deepest_first};
pub use path_validator::{ensure_directory_exists, has_top_level_file, validate_directory_exists};
