//! Scoped listing through the service facade

mod common;

use common::*;
use reservation_server::ReservationError;
use reservation_server::error::Resource;
use reservation_server::auth::Actor;
use reservation_server::reservation::ListQuery;
use shared::models::ReservationStatus;

fn query(status: Option<&str>, restaurant_id: Option<i64>) -> ListQuery {
    ListQuery {
        status: status.map(str::to_string),
        restaurant_id,
        ..Default::default()
    }
}

fn ids<T>(page: &shared::PaginatedResponse<T>, id: impl Fn(&T) -> i64) -> Vec<i64> {
    page.data.iter().map(id).collect()
}

#[tokio::test]
async fn test_each_role_sees_its_scope() {
    let (_, svc) = seeded_service().await;
    let a1 = svc.create(&DINER_A, booking(1, 10, 2)).await.unwrap().reservation.id;
    let b1 = svc.create(&DINER_B, booking(1, 11, 3)).await.unwrap().reservation.id;
    let a2 = svc.create(&DINER_A, booking(2, 20, 4)).await.unwrap().reservation.id;

    let own = svc.list(&DINER_A, &ListQuery::default()).await.unwrap();
    assert_eq!(own.total, 2);
    assert_eq!(ids(&own, |v| v.reservation.id), vec![a2, a1]);

    let managed = svc.list(&MANAGER, &ListQuery::default()).await.unwrap();
    assert_eq!(ids(&managed, |v| v.reservation.id), vec![b1, a1]);

    let other = svc.list(&OTHER_MANAGER, &ListQuery::default()).await.unwrap();
    assert_eq!(ids(&other, |v| v.reservation.id), vec![a2]);

    let staff = svc.list(&STAFF, &ListQuery::default()).await.unwrap();
    assert_eq!(ids(&staff, |v| v.reservation.id), vec![b1, a1]);

    let all = svc.list(&ADMIN, &ListQuery::default()).await.unwrap();
    assert_eq!(ids(&all, |v| v.reservation.id), vec![a2, b1, a1]);
}

#[tokio::test]
async fn test_restaurant_filter_outside_scope_is_forbidden() {
    let (_, svc) = seeded_service().await;
    svc.create(&DINER_A, booking(2, 20, 4)).await.unwrap();

    let err = svc.list(&MANAGER, &query(None, Some(2))).await.unwrap_err();
    assert!(matches!(
        err,
        ReservationError::Forbidden { resource: Resource::Restaurant, id: 2, .. }
    ));

    let err = svc.list(&STAFF, &query(None, Some(2))).await.unwrap_err();
    assert!(matches!(err, ReservationError::Forbidden { .. }));

    // Admin narrows freely
    let narrowed = svc.list(&ADMIN, &query(None, Some(2))).await.unwrap();
    assert_eq!(narrowed.total, 1);
    let none = svc.list(&ADMIN, &query(None, Some(1))).await.unwrap();
    assert_eq!(none.total, 0);
}

#[tokio::test]
async fn test_manager_without_restaurants_gets_empty_page() {
    let (_, svc) = seeded_service().await;
    svc.create(&DINER_A, booking(1, 10, 4)).await.unwrap();

    let page = svc
        .list(&Actor::Manager { manager_id: 300 }, &ListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert!(page.data.is_empty());
    assert_eq!(page.page, 1);
}

#[tokio::test]
async fn test_status_filter() {
    let (_, svc) = seeded_service().await;
    let pending = svc.create(&DINER_A, booking(1, 10, 2)).await.unwrap().reservation.id;
    let confirmed = svc.create(&DINER_A, booking(1, 10, 3)).await.unwrap().reservation.id;
    let rejected = svc.create(&DINER_A, booking(1, 10, 4)).await.unwrap().reservation.id;
    svc.confirm(&MANAGER, confirmed).await.unwrap();
    svc.reject(&MANAGER, rejected, "no staff").await.unwrap();

    let page = svc.list(&ADMIN, &query(Some("1,confirmed"), None)).await.unwrap();
    assert_eq!(ids(&page, |v| v.reservation.id), vec![confirmed, pending]);

    let page = svc.list(&ADMIN, &query(Some("4"), None)).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].status_value, ReservationStatus::Rejected.code());
    assert_eq!(page.data[0].reject_reason.as_deref(), Some("no staff"));

    // Invalid tokens are skipped; nothing valid means no filter
    let page = svc.list(&ADMIN, &query(Some("bogus,99"), None)).await.unwrap();
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn test_pagination_window() {
    let (_, svc) = seeded_service().await;
    let mut created = Vec::new();
    for hour in 1..=25 {
        created.push(svc.create(&DINER_A, booking(1, 10, hour)).await.unwrap().reservation.id);
    }
    created.reverse();

    let page = svc
        .list(
            &DINER_A,
            &ListQuery {
                page: Some(3),
                page_size: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(ids(&page, |v| v.reservation.id), created[20..].to_vec());

    let first = svc
        .list(
            &DINER_A,
            &ListQuery {
                page: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(first.page, 1);
    assert_eq!(first.page_size, 10);
    assert_eq!(ids(&first, |v| v.reservation.id), created[..10].to_vec());

    let clamped = svc
        .list(
            &DINER_A,
            &ListQuery {
                page_size: Some(1000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(clamped.page_size, 100);
    assert_eq!(clamped.data.len(), 25);

    let beyond = svc
        .list(
            &DINER_A,
            &ListQuery {
                page: Some(9),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.total, 25);
}

#[tokio::test]
async fn test_listing_is_repeatable() {
    let (_, svc) = seeded_service().await;
    for hour in 1..=7 {
        let actor = if hour % 2 == 0 { DINER_A } else { DINER_B };
        svc.create(&actor, booking(1, 10, hour)).await.unwrap();
    }
    let q = ListQuery {
        page_size: Some(3),
        page: Some(2),
        ..Default::default()
    };
    let first = svc.list(&MANAGER, &q).await.unwrap();
    let second = svc.list(&MANAGER, &q).await.unwrap();
    assert_eq!(first.total, second.total);
    assert_eq!(
        ids(&first, |v| v.reservation.id),
        ids(&second, |v| v.reservation.id)
    );
}

#[tokio::test]
async fn test_enrichment_degrades_when_restaurant_is_gone() {
    let (store, svc) = seeded_service().await;
    svc.create(&DINER_A, booking(2, 20, 2)).await.unwrap();
    svc.create(&DINER_A, booking(1, 10, 2)).await.unwrap();
    store.remove_restaurant(2).await;

    let page = svc.list(&DINER_A, &ListQuery::default()).await.unwrap();
    assert_eq!(page.total, 2);
    let gone = page
        .data
        .iter()
        .find(|v| v.reservation.restaurant_id == 2)
        .unwrap();
    assert_eq!(gone.restaurant_name, None);
    assert_eq!(gone.table_type.as_deref(), Some("terrace"));
    let kept = page
        .data
        .iter()
        .find(|v| v.reservation.restaurant_id == 1)
        .unwrap();
    assert_eq!(kept.restaurant_name.as_deref(), Some("Blue Door"));
    assert!(!kept.reviewed);
    assert_eq!(kept.status_text, "Pending");
}
