use sqlx::PgPool;

use super::{dto::NewWorkshop, repo_types::Workshop};

pub(crate) const WORKSHOP_COLUMNS: &str = "id, title, description, category, date, \
     max_participants, current_participants, price::float8 AS price";

pub async fn find_by_title(db: &PgPool, title: &str) -> Result<Option<Workshop>, sqlx::Error> {
    sqlx::query_as::<_, Workshop>(&format!(
        "SELECT {WORKSHOP_COLUMNS} FROM workshops WHERE title = $1"
    ))
    .bind(title)
    .fetch_optional(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Workshop>, sqlx::Error> {
    sqlx::query_as::<_, Workshop>(&format!(
        "SELECT {WORKSHOP_COLUMNS} FROM workshops WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert(db: &PgPool, new: &NewWorkshop) -> Result<Workshop, sqlx::Error> {
    sqlx::query_as::<_, Workshop>(&format!(
        r#"
        INSERT INTO workshops (title, description, category, date, max_participants, price)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {WORKSHOP_COLUMNS}
        "#
    ))
    .bind(new.title.trim())
    .bind(&new.description)
    .bind(new.category.trim())
    .bind(new.date)
    .bind(new.max_participants)
    .bind(new.price)
    .fetch_one(db)
    .await
}

/// Workshops with at least one free place, soonest first.
pub async fn list_available(db: &PgPool) -> Result<Vec<Workshop>, sqlx::Error> {
    sqlx::query_as::<_, Workshop>(&format!(
        r#"
        SELECT {WORKSHOP_COLUMNS}
          FROM workshops
         WHERE current_participants < max_participants
         ORDER BY date ASC, id ASC
        "#
    ))
    .fetch_all(db)
    .await
}

/// Available workshops filtered by exact category and/or a LIKE pattern
/// matched against title and description.
pub async fn search(
    db: &PgPool,
    category: Option<&str>,
    pattern: Option<&str>,
) -> Result<Vec<Workshop>, sqlx::Error> {
    sqlx::query_as::<_, Workshop>(&format!(
        r#"
        SELECT {WORKSHOP_COLUMNS}
          FROM workshops
         WHERE current_participants < max_participants
           AND ($1::text IS NULL OR category = $1)
           AND ($2::text IS NULL OR title ILIKE $2 OR description ILIKE $2)
         ORDER BY date ASC, id ASC
        "#
    ))
    .bind(category)
    .bind(pattern)
    .fetch_all(db)
    .await
}
