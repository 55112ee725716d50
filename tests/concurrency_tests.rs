//! Tests de carreras: doble despacho y unicidad del número de viaje

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use futures::future;
use uuid::Uuid;

use common::{memory_store, seed_pair, trip_request};
use fleet_dispatch::services::TripService;

#[tokio::test]
async fn test_concurrent_dispatches_exactly_one_wins() {
    let store = memory_store();
    let (vehicle, driver) = seed_pair(&store).await;
    let service = Arc::new(TripService::new(store.clone()));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let service = service.clone();
        let request = trip_request(vehicle.id, driver.id, 10_000.0);
        handles.push(tokio::spawn(async move {
            service.dispatch(request, Uuid::new_v4()).await
        }));
    }

    let mut ok = 0;
    let mut conflicts = 0;
    for result in future::join_all(handles).await {
        match result.unwrap() {
            Ok(_) => ok += 1,
            Err(_) => conflicts += 1,
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(store.list_trips(Default::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_trip_numbers_are_unique_and_monotonic_under_concurrency() {
    let store = memory_store();
    let service = Arc::new(TripService::new(store.clone()));

    // Diez pares vehículo/conductor independientes despachando a la vez
    let mut pairs = Vec::new();
    for _ in 0..10 {
        pairs.push(seed_pair(&store).await);
    }

    let mut handles = Vec::new();
    for (vehicle, driver) in pairs {
        let service = service.clone();
        let request = trip_request(vehicle.id, driver.id, 5_000.0);
        handles.push(tokio::spawn(async move {
            service.dispatch(request, Uuid::new_v4()).await
        }));
    }

    let mut numbers = Vec::new();
    for result in future::join_all(handles).await {
        let trip = result.unwrap().unwrap();
        numbers.push(trip.trip_number);
    }

    let unique: HashSet<_> = numbers.iter().cloned().collect();
    assert_eq!(unique.len(), 10);
    for n in 1..=10 {
        assert!(unique.contains(&format!("TRP-{:06}", n)));
    }
}
