use sqlx::{PgConnection, PgPool};

use super::repo_types::Booking;
use crate::workshops::{repo::WORKSHOP_COLUMNS, repo_types::Workshop};

const BOOKING_COLUMNS: &str = "id, user_email, workshop_id, status, payment_status, created_at";

pub async fn user_exists(conn: &mut PgConnection, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1))",
    )
    .bind(email)
    .fetch_one(conn)
    .await
}

/// Load a workshop and hold its row lock until the transaction ends.
pub async fn lock_workshop(
    conn: &mut PgConnection,
    workshop_id: i64,
) -> Result<Option<Workshop>, sqlx::Error> {
    sqlx::query_as::<_, Workshop>(&format!(
        "SELECT {WORKSHOP_COLUMNS} FROM workshops WHERE id = $1 FOR UPDATE"
    ))
    .bind(workshop_id)
    .fetch_optional(conn)
    .await
}

/// Same predicate as the `bookings_active_pair_key` partial index.
pub async fn active_booking_exists(
    conn: &mut PgConnection,
    email: &str,
    workshop_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM bookings
             WHERE user_email = $1 AND workshop_id = $2 AND status <> 'Cancelled'
        )
        "#,
    )
    .bind(email)
    .bind(workshop_id)
    .fetch_one(conn)
    .await
}

pub async fn insert_booking(
    conn: &mut PgConnection,
    email: &str,
    workshop_id: i64,
) -> Result<Booking, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        r#"
        INSERT INTO bookings (user_email, workshop_id)
        VALUES ($1, $2)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(email)
    .bind(workshop_id)
    .fetch_one(conn)
    .await
}

/// Increment the participant count only while a place is free.
/// Returns the number of rows touched: 1 on success, 0 when full.
pub async fn take_seat(conn: &mut PgConnection, workshop_id: i64) -> Result<u64, sqlx::Error> {
    let res = sqlx::query(
        r#"
        UPDATE workshops
           SET current_participants = current_participants + 1
         WHERE id = $1 AND current_participants < max_participants
        "#,
    )
    .bind(workshop_id)
    .execute(conn)
    .await?;
    Ok(res.rows_affected())
}

pub async fn list_by_user(db: &PgPool, email: &str) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_email = $1 ORDER BY id ASC"
    ))
    .bind(email)
    .fetch_all(db)
    .await
}
