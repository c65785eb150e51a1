pub mod analyzer;
pub mod attachment;
pub mod chat;
pub mod config;
pub mod error;
pub mod state;

// Re-export main types for convenience
pub use analyzer::{AnalyzerClient, Reply};
pub use attachment::Attachment;
pub use chat::{ChatSession, Phase, Submission};
pub use config::Config;
pub use error::{AnalyzerError, AttachError};
pub use state::{Analysis, Message};
