use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SelectTopicRequest {
    #[validate(length(min = 1, max = 300))]
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FileUploadQuery {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// One selected answer text per question, in quiz order; `null` leaves a question unanswered.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[validate(length(max = 100))]
    pub answers: Vec<Option<String>>,
}
