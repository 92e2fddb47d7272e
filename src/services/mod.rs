pub mod answer_checker;
pub mod content_cache;
pub mod document_extractor;
pub mod knowledge_search;
pub mod model_service;
pub mod output_parser;
pub mod quiz_generation_service;
pub mod session_service;
pub mod source_resolver;
