pub mod backup_cleaner;

pub use backup_cleaner::{BackupCleaner, CleanupReport, Confirm, PromptConfirm};
