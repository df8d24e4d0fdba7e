use serde::Deserialize;
use serde_json::Value;

/// Request carrying a single text field
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

/// Extractive question answering over a context passage
#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub question: Option<String>,
    pub context: Option<String>,
}

/// Table question answering
///
/// The browser client sometimes sends the table as a JSON-encoded string
/// rather than an object; both are accepted.
#[derive(Debug, Deserialize)]
pub struct TableQaRequest {
    pub table: Option<Value>,
    pub question: Option<String>,
}

/// Sentence similarity scoring
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityRequest {
    pub source_sentence: Option<String>,
    pub comparison_sentences: Option<Sentences>,
}

/// Comparison sentences as a list or as one newline-delimited block
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Sentences {
    List(Vec<String>),
    Block(String),
}

impl Sentences {
    /// Flatten to a list, splitting blocks on newlines and dropping blanks
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(sentences) => sentences,
            Self::Block(block) => block
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Translation via the chat gateway
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: Option<String>,
    pub target_lang: Option<String>,
}

/// Conversational text generation via the chat gateway
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    /// Prior turns, oldest first
    #[serde(default)]
    pub context: Vec<HistoryMessage>,
}

/// One prior conversation turn
#[derive(Debug, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

/// Zero-shot classification against caller-supplied labels
#[derive(Debug, Deserialize)]
pub struct ZeroShotRequest {
    pub text: Option<String>,
    pub labels: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_accept_array_form() {
        let request: SimilarityRequest = serde_json::from_str(
            r#"{"sourceSentence": "a", "comparisonSentences": ["b", "c"]}"#,
        )
        .unwrap();
        let sentences = request.comparison_sentences.unwrap().into_vec();
        assert_eq!(sentences, ["b", "c"]);
    }

    #[test]
    fn sentences_accept_newline_block() {
        let request: SimilarityRequest = serde_json::from_str(
            r#"{"sourceSentence": "a", "comparisonSentences": "first\n\n  second  \nthird"}"#,
        )
        .unwrap();
        let sentences = request.comparison_sentences.unwrap().into_vec();
        assert_eq!(sentences, ["first", "second", "third"]);
    }

    #[test]
    fn generate_context_defaults_empty() {
        let request: GenerateRequest = serde_json::from_str(r#"{"prompt": "hi"}"#).unwrap();
        assert!(request.context.is_empty());
    }
}
