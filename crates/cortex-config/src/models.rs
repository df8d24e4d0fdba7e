use serde::Deserialize;

/// Model identifiers per task, overridable from the config file
///
/// Defaults match the deployment the gateway was built against. Inference
/// models are repository paths on the inference provider; chat models are
/// gateway model slugs.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelsConfig {
    // audio
    #[serde(default = "d_transcription")]
    pub transcription: String,
    #[serde(default = "d_audio_classification")]
    pub audio_classification: String,
    #[serde(default = "d_audio_generation")]
    pub audio_generation: String,

    // nlp (inference provider)
    #[serde(default = "d_feature_extraction")]
    pub feature_extraction: String,
    #[serde(default = "d_fill_mask")]
    pub fill_mask: String,
    #[serde(default = "d_question_answering")]
    pub question_answering: String,
    #[serde(default = "d_table_qa")]
    pub table_qa: String,
    #[serde(default = "d_sentence_similarity")]
    pub sentence_similarity: String,
    #[serde(default = "d_sentiment")]
    pub sentiment: String,
    #[serde(default = "d_summarization")]
    pub summarization: String,
    #[serde(default = "d_text_to_text")]
    pub text_to_text: String,
    #[serde(default = "d_token_classification")]
    pub token_classification: String,
    #[serde(default = "d_zero_shot")]
    pub zero_shot: String,

    // nlp (chat gateway)
    #[serde(default = "d_chat")]
    pub chat: String,

    // vision
    #[serde(default = "d_caption")]
    pub caption: String,
    #[serde(default = "d_image_classification")]
    pub image_classification: String,
    #[serde(default = "d_object_detection")]
    pub object_detection: String,
    #[serde(default = "d_segmentation")]
    pub segmentation: String,
    #[serde(default = "d_vision_chat")]
    pub vision_chat: String,

    // image generation
    #[serde(default = "d_stable_diffusion")]
    pub stable_diffusion: String,
    #[serde(default = "d_flux")]
    pub flux: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            transcription: d_transcription(),
            audio_classification: d_audio_classification(),
            audio_generation: d_audio_generation(),
            feature_extraction: d_feature_extraction(),
            fill_mask: d_fill_mask(),
            question_answering: d_question_answering(),
            table_qa: d_table_qa(),
            sentence_similarity: d_sentence_similarity(),
            sentiment: d_sentiment(),
            summarization: d_summarization(),
            text_to_text: d_text_to_text(),
            token_classification: d_token_classification(),
            zero_shot: d_zero_shot(),
            chat: d_chat(),
            caption: d_caption(),
            image_classification: d_image_classification(),
            object_detection: d_object_detection(),
            segmentation: d_segmentation(),
            vision_chat: d_vision_chat(),
            stable_diffusion: d_stable_diffusion(),
            flux: d_flux(),
        }
    }
}

fn d_transcription() -> String {
    "openai/whisper-large-v3".into()
}
fn d_audio_classification() -> String {
    "MIT/ast-finetuned-audioset-10-10-0.4593".into()
}
fn d_audio_generation() -> String {
    "facebook/musicgen-small".into()
}
fn d_feature_extraction() -> String {
    "intfloat/multilingual-e5-large".into()
}
fn d_fill_mask() -> String {
    "google-bert/bert-base-uncased".into()
}
fn d_question_answering() -> String {
    "deepset/roberta-base-squad2".into()
}
fn d_table_qa() -> String {
    "google/tapas-large-finetuned-wtq".into()
}
fn d_sentence_similarity() -> String {
    "Snowflake/snowflake-arctic-embed-l-v2.0".into()
}
fn d_sentiment() -> String {
    "ProsusAI/finbert".into()
}
fn d_summarization() -> String {
    "facebook/bart-large-cnn".into()
}
fn d_text_to_text() -> String {
    "facebook/m2m100_418M".into()
}
fn d_token_classification() -> String {
    "blaze999/Medical-NER".into()
}
fn d_zero_shot() -> String {
    "facebook/bart-large-mnli".into()
}
fn d_chat() -> String {
    "google/gemini-2.0-flash-thinking-exp:free".into()
}
fn d_caption() -> String {
    "Salesforce/blip-image-captioning-base".into()
}
fn d_image_classification() -> String {
    "facebook/detr-resnet-50".into()
}
fn d_object_detection() -> String {
    "facebook/detr-resnet-50".into()
}
fn d_segmentation() -> String {
    "mattmdjaga/segformer_b2_clothes".into()
}
fn d_vision_chat() -> String {
    "meta-llama/Llama-3.2-11B-Vision-Instruct".into()
}
fn d_stable_diffusion() -> String {
    "stabilityai/stable-diffusion-xl-base-1.0".into()
}
fn d_flux() -> String {
    "black-forest-labs/FLUX.1-dev".into()
}
