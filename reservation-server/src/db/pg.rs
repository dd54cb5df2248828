//! PostgreSQL store and directories

use async_trait::async_trait;
use shared::models::{
    Reservation, ReservationStatus, Restaurant, RestaurantTable, StaffMember,
};
use sqlx::PgPool;

use super::{
    BoxError, CasOutcome, ListFilter, NewReservation, ReservationStore, RestaurantDirectory,
    StaffDirectory, StatusUpdate,
};

const RESERVATION_COLUMNS: &str = "id, restaurant_id, table_id, user_id, reservation_time, \
     duration_units, party_size, remarks, status, cancel_reason, review_ref, created_at, updated_at";

/// Optional filters: a NULL parameter disables its clause
const LIST_FILTER: &str = "WHERE ($1::BIGINT IS NULL OR user_id = $1) \
     AND ($2::BIGINT[] IS NULL OR restaurant_id = ANY($2)) \
     AND ($3::SMALLINT[] IS NULL OR status = ANY($3))";

/// `$1` id, `$2` status, `$3` reason, `$4` updated_at, `$5` expected statuses or NULL
fn transition_sql() -> String {
    format!(
        "UPDATE reservations \
         SET status = $2, cancel_reason = $3, updated_at = $4 \
         WHERE id = $1 AND ($5::SMALLINT[] IS NULL OR status = ANY($5)) \
         RETURNING {RESERVATION_COLUMNS}"
    )
}

fn count_sql() -> String {
    format!("SELECT COUNT(*) FROM reservations {LIST_FILTER}")
}

/// `$4` limit, `$5` offset
fn page_sql() -> String {
    format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations {LIST_FILTER} \
         ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5"
    )
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn status_codes(statuses: &[ReservationStatus]) -> Vec<i16> {
        statuses.iter().map(ReservationStatus::code).collect()
    }

    /// Distinguish a failed precondition from a missing row after a CAS miss
    async fn observe(&self, id: i64) -> Result<CasOutcome, BoxError> {
        Ok(match self.find(id).await? {
            Some(row) => CasOutcome::Stale(row),
            None => CasOutcome::Missing,
        })
    }
}

#[async_trait]
impl ReservationStore for PgStore {
    async fn insert(&self, new: NewReservation) -> Result<Reservation, BoxError> {
        let row: Reservation = sqlx::query_as(&format!(
            r#"
            INSERT INTO reservations (
                restaurant_id, table_id, user_id, reservation_time, duration_units,
                party_size, remarks, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(new.restaurant_id)
        .bind(new.table_id)
        .bind(new.user_id)
        .bind(new.reservation_time)
        .bind(new.duration_units)
        .bind(new.party_size)
        .bind(&new.remarks)
        .bind(ReservationStatus::Pending.code())
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find(&self, id: i64) -> Result<Option<Reservation>, BoxError> {
        let row: Option<Reservation> = sqlx::query_as(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn transition(
        &self,
        id: i64,
        expected: Option<&[ReservationStatus]>,
        update: StatusUpdate,
    ) -> Result<CasOutcome, BoxError> {
        let expected: Option<Vec<i16>> = expected.map(Self::status_codes);
        let row: Option<Reservation> = sqlx::query_as(&transition_sql())
        .bind(id)
        .bind(update.status.code())
        .bind(update.stored_reason())
        .bind(update.updated_at)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(CasOutcome::Applied(row)),
            None => self.observe(id).await,
        }
    }

    async fn attach_review(
        &self,
        id: i64,
        review_ref: &str,
        updated_at: i64,
    ) -> Result<CasOutcome, BoxError> {
        let row: Option<Reservation> = sqlx::query_as(&format!(
            r#"
            UPDATE reservations
            SET review_ref = $2, updated_at = $3
            WHERE id = $1 AND status = $4 AND review_ref IS NULL
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(review_ref)
        .bind(updated_at)
        .bind(ReservationStatus::Completed.code())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(CasOutcome::Applied(row)),
            None => self.observe(id).await,
        }
    }

    async fn list(
        &self,
        filter: &ListFilter,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<Reservation>, u64), BoxError> {
        let statuses: Option<Vec<i16>> = filter
            .statuses
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(Self::status_codes);
        let total: i64 = sqlx::query_scalar(&count_sql())
        .bind(filter.user_id)
        .bind(&filter.restaurant_ids)
        .bind(&statuses)
        .fetch_one(&self.pool)
        .await?;

        let rows: Vec<Reservation> = sqlx::query_as(&page_sql())
        .bind(filter.user_id)
        .bind(&filter.restaurant_ids)
        .bind(&statuses)
        .bind(i64::try_from(limit)?)
        .bind(i64::try_from(offset)?)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, u64::try_from(total)?))
    }

    async fn upcoming_for_table(
        &self,
        table_id: i64,
        from: i64,
    ) -> Result<Vec<Reservation>, BoxError> {
        let rows: Vec<Reservation> = sqlx::query_as(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS} FROM reservations
            WHERE table_id = $1 AND reservation_time >= $2 AND status = ANY($3)
            ORDER BY reservation_time ASC, id ASC
            "#
        ))
        .bind(table_id)
        .bind(from)
        .bind(Self::status_codes(&[
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
        ]))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl RestaurantDirectory for PgStore {
    async fn find_restaurant(&self, id: i64) -> Result<Option<Restaurant>, BoxError> {
        let row: Option<Restaurant> =
            sqlx::query_as("SELECT id, owner_id, name, status FROM restaurants WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn find_table(&self, id: i64) -> Result<Option<RestaurantTable>, BoxError> {
        let row: Option<RestaurantTable> = sqlx::query_as(
            "SELECT id, restaurant_id, table_type FROM restaurant_tables WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn restaurant_ids_owned_by(&self, manager_id: i64) -> Result<Vec<i64>, BoxError> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM restaurants WHERE owner_id = $1 ORDER BY id")
                .bind(manager_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids)
    }
}

#[async_trait]
impl StaffDirectory for PgStore {
    async fn assignments_for(&self, staff_user_id: i64) -> Result<Vec<StaffMember>, BoxError> {
        let rows: Vec<StaffMember> = sqlx::query_as(
            "SELECT id, user_id, manager_id, status FROM staff WHERE user_id = $1 ORDER BY id",
        )
        .bind(staff_user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
