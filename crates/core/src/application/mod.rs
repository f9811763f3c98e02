// Application Layer - Use Cases

pub mod constants;
pub mod deploy;

// Re-exports
pub use deploy::DeployRunner;
