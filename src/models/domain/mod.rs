pub mod quiz;
pub mod session;
pub mod source_document;
pub use quiz::{Quiz, QuizAnswer, QuizQuestion};
pub use session::SessionContext;
pub use source_document::{SourceDocument, SourceKind};
