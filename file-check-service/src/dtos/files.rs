use serde::Deserialize;

/// Query string of `GET /check-file`.
#[derive(Debug, Deserialize)]
pub struct CheckFileParams {
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}
