/// Wire types for the batch analyze endpoint
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchAnalyzeRequest<'a> {
    pub folder_id: &'a str,
    pub analyze_specs: Vec<AnalyzeSpec<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalyzeSpec<'a> {
    /// Base64-encoded image bytes
    pub content: String,
    pub features: Vec<Feature<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Feature<'a> {
    #[serde(rename = "type")]
    pub feature_type: &'a str,
    pub text_detection_config: TextDetectionConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TextDetectionConfig<'a> {
    pub language_codes: &'a [String],
    pub model: &'a str,
}

/// Response of the batch analyze endpoint, reduced to the text tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchAnalyzeResponse {
    #[serde(default)]
    pub results: Vec<AnalyzeResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResult {
    #[serde(default)]
    pub results: Vec<FeatureResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResult {
    #[serde(default)]
    pub text_detection: Option<TextAnnotation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextAnnotation {
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Word {
    #[serde(default)]
    pub text: String,
}

/// Space-joins every word of `results[0].results[0].textDetection` in
/// document order, with trailing whitespace trimmed.
///
/// An annotation without pages yields `""`.
///
/// # Errors
/// Describes the missing node when the response lacks the first result or
/// its text detection.
pub fn extract_text(response: &BatchAnalyzeResponse) -> Result<String, String> {
    let feature = response
        .results
        .first()
        .and_then(|result| result.results.first())
        .ok_or_else(|| "response has no results[0].results[0]".to_string())?;
    let annotation = feature
        .text_detection
        .as_ref()
        .ok_or_else(|| "response has no textDetection".to_string())?;

    let words: Vec<&str> = annotation
        .pages
        .iter()
        .flat_map(|page| &page.blocks)
        .flat_map(|block| &block.lines)
        .flat_map(|line| &line.words)
        .map(|word| word.text.as_str())
        .collect();

    Ok(words.join(" ").trim_end().to_string())
}
