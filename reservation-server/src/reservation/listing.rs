//! Reservation listing
//!
//! Paginated, filtered reads inside an already resolved [`Scope`], and
//! enrichment of rows into [`ReservationView`]s.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use shared::PaginatedResponse;
use shared::models::{Reservation, ReservationStatus, ReservationView};

use super::scope::Scope;
use crate::db::{ReservationStore, RestaurantDirectory};
use crate::error::ReservationResult;

/// Listing query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<u32>,
    /// Comma-separated codes or names, e.g. `1,2` or `pending,confirmed`
    pub status: Option<String>,
    #[serde(alias = "restaurantId")]
    pub restaurant_id: Option<i64>,
}

/// Normalized page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Page below 1 becomes 1; size defaults then clamps to `1..=max_size`
    pub fn normalize(page: Option<u32>, page_size: Option<u32>, default_size: u32, max_size: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(default_size).clamp(1, max_size.max(1)),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// Parse a status filter; unknown tokens are logged and skipped
pub fn parse_status_filter(raw: &str) -> Vec<ReservationStatus> {
    let mut statuses = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<ReservationStatus>() {
            Ok(status) if !statuses.contains(&status) => statuses.push(status),
            Ok(_) => {}
            Err(e) => tracing::warn!(token, error = %e, "Ignoring invalid status filter"),
        }
    }
    statuses
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn ReservationStore>,
    directory: Arc<dyn RestaurantDirectory>,
    default_page_size: u32,
    max_page_size: u32,
}

impl ListingService {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        directory: Arc<dyn RestaurantDirectory>,
        default_page_size: u32,
        max_page_size: u32,
    ) -> Self {
        Self {
            store,
            directory,
            default_page_size,
            max_page_size,
        }
    }

    pub async fn list(
        &self,
        scope: &Scope,
        query: &ListQuery,
    ) -> ReservationResult<PaginatedResponse<ReservationView>> {
        let mut filter = scope.to_filter(query.restaurant_id)?;
        filter.statuses = query.status.as_deref().map(parse_status_filter);

        let window = PageRequest::normalize(
            query.page,
            query.page_size,
            self.default_page_size,
            self.max_page_size,
        );

        if filter.restaurant_ids.as_ref().is_some_and(Vec::is_empty) {
            return Ok(PaginatedResponse::empty(window.page, window.page_size));
        }

        let (rows, total) = self
            .store
            .list(&filter, window.offset(), u64::from(window.page_size))
            .await?;
        let views = self.enrich(rows).await;
        Ok(PaginatedResponse::new(
            views,
            total,
            window.page,
            window.page_size,
        ))
    }

    /// Enrich rows; lookups are cached per call and failures leave fields empty
    pub async fn enrich(&self, rows: Vec<Reservation>) -> Vec<ReservationView> {
        let mut restaurant_names: HashMap<i64, Option<String>> = HashMap::new();
        let mut table_types: HashMap<i64, Option<String>> = HashMap::new();
        let mut views = Vec::with_capacity(rows.len());

        for row in rows {
            let restaurant_name = match restaurant_names.get(&row.restaurant_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self.restaurant_name(row.restaurant_id).await;
                    restaurant_names.insert(row.restaurant_id, name.clone());
                    name
                }
            };
            let table_type = match table_types.get(&row.table_id) {
                Some(kind) => kind.clone(),
                None => {
                    let kind = self.table_type(row.table_id).await;
                    table_types.insert(row.table_id, kind.clone());
                    kind
                }
            };
            views.push(ReservationView::new(row, restaurant_name, table_type));
        }
        views
    }

    pub async fn enrich_one(&self, row: Reservation) -> ReservationView {
        let restaurant_name = self.restaurant_name(row.restaurant_id).await;
        let table_type = self.table_type(row.table_id).await;
        ReservationView::new(row, restaurant_name, table_type)
    }

    async fn restaurant_name(&self, id: i64) -> Option<String> {
        match self.directory.find_restaurant(id).await {
            Ok(found) => found.map(|r| r.name),
            Err(e) => {
                tracing::warn!(restaurant_id = id, error = %e, "Restaurant lookup failed during enrichment");
                None
            }
        }
    }

    async fn table_type(&self, id: i64) -> Option<String> {
        match self.directory.find_table(id).await {
            Ok(found) => found.map(|t| t.table_type),
            Err(e) => {
                tracing::warn!(table_id = id, error = %e, "Table lookup failed during enrichment");
                None
            }
        }
    }
}
