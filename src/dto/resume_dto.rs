use serde::{Deserialize, Serialize};

use crate::services::parser_service::ParsedResumeFields;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResumeResponse {
    pub message: String,
    pub resume_url: String,
    pub parsed: ParsedResumeFields,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadLinkResponse {
    pub url: String,
    pub expires_in: u64,
}
