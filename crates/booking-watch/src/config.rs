use std::env;

use crate::error::{WatchError, WatchResult};

/// Settings for one run, read from the environment.
///
/// Every field is optional at load time. Each one is looked up under its own name uppercased
/// (`altegio_api_url` -> `ALTEGIO_API_URL`), and components check for the fields they need
/// when they run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub altegio_api_url: Option<String>,
    pub altegio_api_key: Option<String>,
    pub altegio_company_id: Option<String>,
    pub altegio_staff_id: Option<String>,
    pub altegio_service_id: Option<String>,

    /// Static text logged when dates are found and email is not configured
    pub dates_found_log_message: Option<String>,

    pub email_from: Option<String>,
    pub email_to: Option<String>,
    pub email_subject: Option<String>,
    /// Body template; `{dates}` is replaced with the reported dates
    pub email_body: Option<String>,

    pub email_smtp_server: Option<String>,
    pub email_smtp_port: Option<String>,
    pub email_username: Option<String>,
    pub email_password: Option<String>,

    pub s3_bucket: Option<String>,
    pub s3_key: Option<String>,

    /// Local snapshot file, used when no S3 bucket is set
    pub dates_filename: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            altegio_api_url: lookup("ALTEGIO_API_URL"),
            altegio_api_key: lookup("ALTEGIO_API_KEY"),
            altegio_company_id: lookup("ALTEGIO_COMPANY_ID"),
            altegio_staff_id: lookup("ALTEGIO_STAFF_ID"),
            altegio_service_id: lookup("ALTEGIO_SERVICE_ID"),
            dates_found_log_message: lookup("DATES_FOUND_LOG_MESSAGE"),
            email_from: lookup("EMAIL_FROM"),
            email_to: lookup("EMAIL_TO"),
            email_subject: lookup("EMAIL_SUBJECT"),
            email_body: lookup("EMAIL_BODY"),
            email_smtp_server: lookup("EMAIL_SMTP_SERVER"),
            email_smtp_port: lookup("EMAIL_SMTP_PORT"),
            email_username: lookup("EMAIL_USERNAME"),
            email_password: lookup("EMAIL_PASSWORD"),
            s3_bucket: lookup("S3_BUCKET"),
            s3_key: lookup("S3_KEY"),
            dates_filename: lookup("DATES_FILENAME"),
        }
    }

    pub fn is_s3(&self) -> bool {
        is_present(&self.s3_bucket)
    }

    pub fn is_file(&self) -> bool {
        is_present(&self.dates_filename)
    }

    pub fn is_email(&self) -> bool {
        is_present(&self.email_smtp_server)
    }

    pub fn is_log_message(&self) -> bool {
        is_present(&self.dates_found_log_message)
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Borrow a setting that must be present, naming the variable when it is not.
///
/// An empty value counts as present; only an unset variable is rejected.
pub fn required<'a>(value: &'a Option<String>, name: &'static str) -> WatchResult<&'a str> {
    value.as_deref().ok_or(WatchError::MissingSetting(name))
}
