//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Remote endpoints
pub const DEFAULT_IDENTITY_URL: &str = "https://iam.api.cloud.yandex.net/iam/v1/tokens";
pub const DEFAULT_VISION_URL: &str = "https://vision.api.cloud.yandex.net/vision/v1/batchAnalyze";
pub const DEFAULT_GPT_URL: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";
pub const DEFAULT_GPT_MODEL_NAME: &str = "yandexgpt-lite";

/// Header carrying the tenant/folder identifier on every API call.
pub const FOLDER_ID_HEADER: &str = "x-folder-id";

// Credential lifecycle
pub const DEFAULT_RENEWAL_MARGIN_SECS: u64 = 300;

// Recognition
pub const DEFAULT_LANGUAGE_CODES: [&str; 2] = ["ru", "en"];
pub const RECOGNITION_MODEL: &str = "page";
pub const TEXT_DETECTION_FEATURE: &str = "TEXT_DETECTION";

// Runtime
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 100;
