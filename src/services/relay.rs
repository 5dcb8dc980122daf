use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::error::AppError;
use crate::models::{CareerApplication, ContactSubmission};
use crate::sheets::SheetsClient;

pub const CONTACT_SHEET: &str = "Contact_Form_Submissions";
pub const CAREER_SHEET: &str = "Career_Applications";

const CONTACT_HEADERS: [&str; 6] = ["Timestamp", "Name", "Email", "Phone", "Interest", "Message"];
const CAREER_HEADERS: [&str; 7] = [
    "Timestamp",
    "Full Name",
    "Email",
    "Phone",
    "Position",
    "Resume Link",
    "Cover Letter",
];

/// Relays validated form submissions into the shared spreadsheet, one row
/// per submission. Nothing is stored locally.
#[derive(Clone)]
pub struct FormRelay {
    sheets: Arc<dyn SheetsClient>,
}

impl FormRelay {
    pub fn new(sheets: Arc<dyn SheetsClient>) -> Self {
        Self { sheets }
    }

    pub async fn submit_contact(&self, form: &ContactSubmission) -> Result<(), AppError> {
        let row = vec![
            timestamp(),
            form.name.clone(),
            form.email.clone(),
            form.phone.clone(),
            form.interest.clone().unwrap_or_default(),
            form.message.clone(),
        ];
        self.sheets.append(CONTACT_SHEET, row).await?;
        info!("contact submission appended to {}", CONTACT_SHEET);
        Ok(())
    }

    pub async fn submit_career(&self, form: &CareerApplication) -> Result<(), AppError> {
        let row = vec![
            timestamp(),
            form.full_name.clone(),
            form.email.clone(),
            form.phone.clone(),
            form.position.clone(),
            form.resume_link.clone().unwrap_or_else(|| "N/A".to_string()),
            form.cover_letter.clone().unwrap_or_default(),
        ];
        self.sheets.append(CAREER_SHEET, row).await?;
        info!("career application appended to {}", CAREER_SHEET);
        Ok(())
    }

    /// Creates the two submission sheets and their header rows when missing.
    /// Runs on every start; existing sheets and data are left alone.
    pub async fn ensure_sheets(&self) -> Result<(), AppError> {
        let spreadsheet = self.sheets.get_metadata().await?;
        let existing: Vec<&str> = spreadsheet
            .sheets
            .iter()
            .map(|sheet| sheet.properties.title.as_str())
            .collect();

        for (name, headers) in [
            (CONTACT_SHEET, CONTACT_HEADERS.as_slice()),
            (CAREER_SHEET, CAREER_HEADERS.as_slice()),
        ] {
            if !existing.contains(&name) {
                self.sheets.create_sheet(name).await?;
                info!("created sheet: {}", name);
            }

            let first_row = self.sheets.read_range(&format!("{}!A1:Z1", name)).await?;
            if first_row.is_empty() {
                let header_row = headers.iter().map(|h| h.to_string()).collect();
                self.sheets
                    .write_range(&format!("{}!A1", name), vec![header_row])
                    .await?;
                info!("added headers to {}", name);
            }
        }

        Ok(())
    }
}

// Millisecond precision with a trailing Z, matching the rows already in
// the spreadsheet.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
