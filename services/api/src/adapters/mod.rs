pub mod github_backup;
pub mod json_store;

pub use github_backup::GithubBackup;
pub use json_store::JsonFileStore;
