use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactFormRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerFormRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub resume_link: Option<String>,
    pub cover_letter: Option<String>,
}

/// Contact form after validation and trimming.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interest: Option<String>,
    pub message: String,
}

/// Career form after validation and trimming.
#[derive(Debug, Clone)]
pub struct CareerApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub resume_link: Option<String>,
    pub cover_letter: Option<String>,
}
