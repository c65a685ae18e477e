use serde::Deserialize;

use crate::{
    auth::services::{is_valid_email, normalize_email},
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Deserialize)]
pub struct ReserveRequest {
    pub user_email: String,
    pub workshop_id: i64,
}

impl ReserveRequest {
    pub fn validate(&self) -> AppResult<()> {
        if !is_valid_email(&normalize_email(&self.user_email)) {
            return Err(AppError::Validation("Invalid user_email".into()));
        }
        if self.workshop_id <= 0 {
            return Err(AppError::Validation(
                "workshop_id must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
