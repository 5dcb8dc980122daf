use std::env;

use crate::error::AppError;
use crate::sheets::SheetsConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub sheets: SheetsConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("PORT is not a valid port number: {}", raw)))?,
            Err(_) => 5000,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://apexskill.db".to_string());
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::Config("JWT_SECRET is not set".to_string()))?;

        // Both must be present to provision the first admin account.
        let admin_username = env::var("ADMIN_USERNAME").ok();
        let admin_password = env::var("ADMIN_PASSWORD").ok();

        let sheets = SheetsConfig::new_from_env()?;

        Ok(Self {
            port,
            database_url,
            jwt_secret,
            admin_username,
            admin_password,
            sheets,
        })
    }
}
