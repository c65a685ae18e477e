use sqlx::PgPool;
use tracing::{debug, info};

use super::{dto::ReserveRequest, repo, repo_types::Booking};
use crate::{
    auth::services::{is_valid_email, normalize_email},
    db::{self, Tx},
    error::{AppError, AppResult},
};

const DUPLICATE_BOOKING: &str = "You already have a booking for this workshop";
const NO_CAPACITY: &str = "No places left for this workshop";

/// Book a place for `user_email` in `workshop_id`.
///
/// Every check and write runs in one transaction holding the workshop row
/// lock, so concurrent reservations for the same workshop are serialized and
/// the participant count can never pass `max_participants`.
pub async fn reserve(db: &PgPool, req: &ReserveRequest) -> AppResult<Booking> {
    req.validate()?;
    let email = normalize_email(&req.user_email);
    let workshop_id = req.workshop_id;

    let booking = db::run_atomic(db, move |tx| {
        Box::pin(async move { reserve_in_tx(tx, &email, workshop_id).await })
    })
    .await?;

    info!(
        booking_id = booking.id,
        email = %booking.user_email,
        workshop_id = booking.workshop_id,
        "booking confirmed"
    );
    Ok(booking)
}

async fn reserve_in_tx(tx: &mut Tx, email: &str, workshop_id: i64) -> AppResult<Booking> {
    if !repo::user_exists(&mut **tx, email).await? {
        return Err(AppError::NotFound("User is not registered".into()));
    }

    let workshop = repo::lock_workshop(&mut **tx, workshop_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workshop not found".into()))?;

    if !workshop.has_capacity() {
        debug!(workshop_id, max = workshop.max_participants, "workshop is full");
        return Err(AppError::Capacity(NO_CAPACITY.into()));
    }

    if repo::active_booking_exists(&mut **tx, email, workshop_id).await? {
        return Err(AppError::Conflict(DUPLICATE_BOOKING.into()));
    }

    let booking = repo::insert_booking(&mut **tx, email, workshop_id)
        .await
        .map_err(|e| db::conflict_on_unique(e, DUPLICATE_BOOKING))?;

    let taken = repo::take_seat(&mut **tx, workshop_id).await.map_err(|e| {
        if db::is_check_violation(&e) {
            AppError::Capacity(NO_CAPACITY.into())
        } else {
            AppError::DataStore(e)
        }
    })?;
    if taken != 1 {
        return Err(AppError::Capacity(NO_CAPACITY.into()));
    }

    debug!(
        workshop_id,
        remaining = workshop.remaining() - 1,
        "seat taken"
    );
    Ok(booking)
}

/// All bookings made with `email`, oldest first.
pub async fn list_by_user(db: &PgPool, email: &str) -> AppResult<Vec<Booking>> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    let rows = repo::list_by_user(db, &email).await?;
    if rows.is_empty() {
        return Err(AppError::NotFound("No bookings found".into()));
    }
    Ok(rows)
}
