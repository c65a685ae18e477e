use sqlx::PgPool;
use time::Date;
use tracing::{info, warn};

use super::{
    dto::{NewWorkshop, SearchQuery},
    repo,
    repo_types::Workshop,
};
use crate::{
    db,
    error::{AppError, AppResult},
};

pub const TITLE_MIN_LEN: usize = 4;
pub const TITLE_MAX_LEN: usize = 100;
pub const CATEGORY_MAX_LEN: usize = 50;
// NUMERIC(10,2), in cents
const PRICE_MIN_CENTS: f64 = 1.0;
const PRICE_MAX_CENTS: f64 = 9_999_999_999.0;

/// Field checks for a new workshop; `today` is the current UTC date.
pub fn validate_new_workshop(new: &NewWorkshop, today: Date) -> AppResult<()> {
    let title_len = new.title.trim().chars().count();
    if !(TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&title_len) {
        return Err(AppError::Validation(format!(
            "Title must be between {TITLE_MIN_LEN} and {TITLE_MAX_LEN} characters"
        )));
    }
    let category_len = new.category.trim().chars().count();
    if category_len == 0 || category_len > CATEGORY_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Category must be between 1 and {CATEGORY_MAX_LEN} characters"
        )));
    }
    if new.date <= today {
        return Err(AppError::Validation(
            "Workshop date must be in the future".into(),
        ));
    }
    if new.max_participants <= 0 {
        return Err(AppError::Validation(
            "max_participants must be greater than 0".into(),
        ));
    }
    // checked after rounding to the stored scale
    let cents = (new.price * 100.0).round();
    if !cents.is_finite() || !(PRICE_MIN_CENTS..=PRICE_MAX_CENTS).contains(&cents) {
        return Err(AppError::Validation(
            "price must be between 0.01 and 99999999.99".into(),
        ));
    }
    Ok(())
}

pub async fn create_workshop(db: &PgPool, new: &NewWorkshop, today: Date) -> AppResult<Workshop> {
    validate_new_workshop(new, today)?;

    let title = new.title.trim();
    if repo::find_by_title(db, title).await?.is_some() {
        warn!(title = %title, "duplicate workshop title");
        return Err(AppError::Conflict(
            "A workshop with this title already exists".into(),
        ));
    }

    let workshop = repo::insert(db, new)
        .await
        .map_err(|e| db::conflict_on_unique(e, "A workshop with this title already exists"))?;

    info!(workshop_id = workshop.id, title = %workshop.title, "workshop created");
    Ok(workshop)
}

pub async fn list_available(db: &PgPool) -> AppResult<Vec<Workshop>> {
    let rows = repo::list_available(db).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound("No workshops available".into()));
    }
    Ok(rows)
}

pub async fn search(db: &PgPool, query: &SearchQuery) -> AppResult<Vec<Workshop>> {
    let pattern = query.keyword().map(db::like_contains);
    let rows = repo::search(db, query.category(), pattern.as_deref()).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound(
            "No workshops match the given filters".into(),
        ));
    }
    Ok(rows)
}
