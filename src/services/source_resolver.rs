use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{SourceDocument, SourceKind},
    services::{
        content_cache::{CacheKey, ContentCache},
        document_extractor::{DocumentExtractor, DocumentFormat, SUPPORTED_EXTENSIONS},
        knowledge_search::KnowledgeSearch,
    },
};

const TOPIC_SEPARATOR: &str = "\n\n";

/// Resolves an upload or a topic into the text a quiz is generated from.
/// Both paths are memoized by input identity.
pub struct SourceResolver {
    extractor: Arc<dyn DocumentExtractor>,
    search: Arc<dyn KnowledgeSearch>,
    file_cache_dir: PathBuf,
    top_k: usize,
    files: ContentCache<SourceDocument>,
    topics: ContentCache<SourceDocument>,
}

impl SourceResolver {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        search: Arc<dyn KnowledgeSearch>,
        file_cache_dir: PathBuf,
        top_k: usize,
        cache_max_entries: usize,
    ) -> Self {
        Self {
            extractor,
            search,
            file_cache_dir,
            top_k,
            files: ContentCache::new("file", cache_max_entries),
            topics: ContentCache::new("topic", cache_max_entries),
        }
    }

    pub async fn resolve_file(&self, name: &str, bytes: &[u8]) -> AppResult<SourceDocument> {
        let file_name = sanitize_file_name(name)?;
        let key = CacheKey::from_parts(&[file_name.as_bytes(), bytes]);

        self.files
            .get_or_try_insert_with(key.clone(), || async {
                let path = self.persist_upload(&file_name, bytes).await?;
                let segments = self.extractor.extract(&path).await?;

                let text = segments
                    .into_iter()
                    .next()
                    .filter(|segment| !segment.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::SourceUnavailable(format!(
                            "no extractable content in '{}'",
                            file_name
                        ))
                    })?;

                Ok(SourceDocument::new(key.as_str(), &file_name, SourceKind::File, text))
            })
            .await
    }

    pub async fn resolve_topic(&self, topic: &str) -> AppResult<SourceDocument> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::ValidationError("topic cannot be empty".to_string()));
        }

        let key = CacheKey::from_parts(&[b"topic", topic.as_bytes()]);

        self.topics
            .get_or_try_insert_with(key.clone(), || async {
                let documents = self.search.search(topic, self.top_k).await?;
                log::info!("Topic '{}' resolved to {} documents", topic, documents.len());

                let text = documents
                    .iter()
                    .map(|doc| doc.content.as_str())
                    .collect::<Vec<_>>()
                    .join(TOPIC_SEPARATOR);

                if text.trim().is_empty() {
                    return Err(AppError::SourceUnavailable(format!(
                        "search for '{}' returned no documents",
                        topic
                    )));
                }

                Ok(SourceDocument::new(key.as_str(), topic, SourceKind::Topic, text))
            })
            .await
    }

    async fn persist_upload(&self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.file_cache_dir).await?;
        let path = self.file_cache_dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Stored upload {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Keeps only the final path component and checks the extension.
pub fn sanitize_file_name(name: &str) -> AppResult<String> {
    let file_name = Path::new(name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::ValidationError(format!("invalid file name '{}'", name)))?;

    if DocumentFormat::from_path(Path::new(file_name)).is_none() {
        return Err(AppError::ValidationError(format!(
            "unsupported file type '{}', expected one of {:?}",
            file_name, SUPPORTED_EXTENSIONS
        )));
    }

    Ok(file_name.to_string())
}
