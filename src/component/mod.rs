//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod archive_extractor;
pub mod archive_orchestrator;
pub mod batch_driver;
pub mod directory_cleaner;

pub use archive_orchestrator::ArchiveOrchestrator;
pub use batch_driver::BatchDriver;
pub use directory_cleaner::DirectoryCleaner;
