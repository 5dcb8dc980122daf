pub mod dto;

use std::collections::BTreeMap;
use std::env;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::AppError;
use dto::{Sheet, SheetProperties, Spreadsheet, ValueRange};

#[derive(Clone, Debug)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub access_token: String,
}

impl SheetsConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let spreadsheet_id = env::var("GOOGLE_SHEETS_SPREADSHEET_ID")
            .map_err(|_| AppError::Config("GOOGLE_SHEETS_SPREADSHEET_ID is not set".to_string()))?;
        let access_token = env::var("GOOGLE_SHEETS_ACCESS_TOKEN")
            .map_err(|_| AppError::Config("GOOGLE_SHEETS_ACCESS_TOKEN is not set".to_string()))?;

        Ok(Self {
            spreadsheet_id,
            access_token,
        })
    }
}

#[async_trait]
pub trait SheetsClient: Send + Sync {
    async fn append(&self, sheet_name: &str, row: Vec<String>) -> Result<(), AppError>;
    async fn get_metadata(&self) -> Result<Spreadsheet, AppError>;
    async fn create_sheet(&self, title: &str) -> Result<(), AppError>;
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, AppError>;
    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> Result<(), AppError>;
}

pub struct GoogleSheetsClient {
    client: Client,
    config: SheetsConfig,
}

impl GoogleSheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn url(&self, suffix: &str) -> String {
        format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}{}",
            self.config.spreadsheet_id, suffix
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.config.access_token)
    }
}

#[async_trait]
impl SheetsClient for GoogleSheetsClient {
    async fn append(&self, sheet_name: &str, row: Vec<String>) -> Result<(), AppError> {
        let url = self.url(&format!("/values/{}!A:Z:append", sheet_name));
        let request_body = ValueRange { values: vec![row] };

        let response = self.client
            .post(&url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .header("Authorization", self.bearer())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Sheets(format!("append request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Sheets(format!("Sheets API error {}: {}", status, body)));
        }

        Ok(())
    }

    async fn get_metadata(&self) -> Result<Spreadsheet, AppError> {
        let url = self.url("");

        let response = self.client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| AppError::Sheets(format!("metadata request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Sheets(format!("Sheets API error {}: {}", status, body)));
        }

        response
            .json::<Spreadsheet>()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to parse spreadsheet metadata: {}", e)))
    }

    async fn create_sheet(&self, title: &str) -> Result<(), AppError> {
        let url = self.url(":batchUpdate");
        let request_body = serde_json::json!({
            "requests": [{
                "addSheet": { "properties": { "title": title } }
            }]
        });

        let response = self.client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Sheets(format!("addSheet request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Sheets(format!("Sheets API error {}: {}", status, body)));
        }

        Ok(())
    }

    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, AppError> {
        let url = self.url(&format!("/values/{}", range));

        let response = self.client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .map_err(|e| AppError::Sheets(format!("read request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Sheets(format!("Sheets API error {}: {}", status, body)));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to parse range response: {}", e)))?;
        Ok(range.values)
    }

    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> Result<(), AppError> {
        let url = self.url(&format!("/values/{}", range));
        let request_body = ValueRange { values };

        let response = self.client
            .put(&url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .header("Authorization", self.bearer())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Sheets(format!("write request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Sheets(format!("Sheets API error {}: {}", status, body)));
        }

        Ok(())
    }
}

/// In-memory double for tests; a missing sheet errors like the live API.
#[derive(Default)]
pub struct InMemorySheetsClient {
    sheets: Mutex<BTreeMap<String, Vec<Vec<String>>>>,
}

impl InMemorySheetsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, sheet_name: &str) -> Vec<Vec<String>> {
        self.sheets
            .lock()
            .unwrap()
            .get(sheet_name)
            .cloned()
            .unwrap_or_default()
    }

    fn sheet_of(range: &str) -> String {
        range.split('!').next().unwrap_or(range).to_string()
    }
}

#[async_trait]
impl SheetsClient for InMemorySheetsClient {
    async fn append(&self, sheet_name: &str, row: Vec<String>) -> Result<(), AppError> {
        let mut sheets = self.sheets.lock().unwrap();
        match sheets.get_mut(sheet_name) {
            Some(rows) => {
                rows.push(row);
                Ok(())
            }
            None => Err(AppError::Sheets(format!("no sheet named {}", sheet_name))),
        }
    }

    async fn get_metadata(&self) -> Result<Spreadsheet, AppError> {
        let sheets = self.sheets.lock().unwrap();
        Ok(Spreadsheet {
            sheets: sheets
                .keys()
                .map(|title| Sheet {
                    properties: SheetProperties {
                        title: title.clone(),
                    },
                })
                .collect(),
        })
    }

    async fn create_sheet(&self, title: &str) -> Result<(), AppError> {
        self.sheets
            .lock()
            .unwrap()
            .entry(title.to_string())
            .or_default();
        Ok(())
    }

    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, AppError> {
        let sheet = Self::sheet_of(range);
        let sheets = self.sheets.lock().unwrap();
        match sheets.get(&sheet) {
            // Only the header row is ever read back; one row is enough.
            Some(rows) => Ok(rows.iter().take(1).cloned().collect()),
            None => Err(AppError::Sheets(format!("no sheet named {}", sheet))),
        }
    }

    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> Result<(), AppError> {
        let sheet = Self::sheet_of(range);
        let mut sheets = self.sheets.lock().unwrap();
        let rows = sheets
            .get_mut(&sheet)
            .ok_or_else(|| AppError::Sheets(format!("no sheet named {}", sheet)))?;
        for (i, row) in values.into_iter().enumerate() {
            if i < rows.len() {
                rows[i] = row;
            } else {
                rows.push(row);
            }
        }
        Ok(())
    }
}
