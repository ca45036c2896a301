use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use route_planning::models::route::{NewRoute, RouteFilter, RouteStatus};
use route_planning::models::stop::{Stop, StopType};
use route_planning::repositories::rows::{
    DriverRow, NewRouteRow, NewRouteStopRow, RouteRow, RouteStopRow, VehicleRow,
};
use route_planning::repositories::{InMemoryRouteStore, RouteStore};
use route_planning::services::notifications::{NotificationBuffer, NotificationLevel};
use route_planning::services::route_draft::RouteDraft;
use route_planning::services::route_service::RouteService;
use route_planning::utils::errors::AppError;

fn driver_row(first: Option<&str>, last: Option<&str>) -> DriverRow {
    DriverRow {
        id: Uuid::new_v4(),
        first_name: first.map(str::to_string),
        last_name: last.map(str::to_string),
        email: None,
        phone: None,
        license_number: None,
        status: Some("active".to_string()),
        max_hours: None,
    }
}

fn vehicle_row(name: Option<&str>, vehicle_type: &str) -> VehicleRow {
    VehicleRow {
        id: Uuid::new_v4(),
        name: name.map(str::to_string),
        license_plate: Some("AB-123-CD".to_string()),
        vehicle_type: Some(vehicle_type.to_string()),
        capacity: Some(1200.0),
        status: None,
        fuel_efficiency: None,
    }
}

fn coast_to_coast(name: &str) -> NewRoute {
    let mut draft = RouteDraft::new(name);
    draft.add_stop(Stop::new("a", "New York, NY", StopType::Origin).with_coordinates(40.7128, -74.0060));
    draft.add_stop(Stop::new("b", "Los Angeles, CA", StopType::Destination).with_coordinates(34.0522, -118.2437));
    draft.add_stop(Stop::new("chi", "Chicago, IL", StopType::Waypoint).with_coordinates(41.8781, -87.6298));
    draft.add_stop(Stop::new("den", "Denver, CO", StopType::Waypoint).with_coordinates(39.7392, -104.9903));
    draft.to_new_route()
}

fn service(store: &InMemoryRouteStore) -> (RouteService, Arc<NotificationBuffer>) {
    let notifications = Arc::new(NotificationBuffer::new());
    let service = RouteService::new(Arc::new(store.clone()), notifications.clone());
    (service, notifications)
}

#[tokio::test]
async fn test_save_route_persists_stops_in_order() {
    let store = InMemoryRouteStore::new();
    let driver = driver_row(Some("Maria"), Some("Gonzalez"));
    let vehicle = vehicle_row(Some("Van 1"), "van");
    let (driver_id, vehicle_id) = (driver.id, vehicle.id);
    store.add_driver(driver).await;
    store.add_vehicle(vehicle).await;

    let (service, notifications) = service(&store);
    let mut route = coast_to_coast("Coast to coast");
    route.driver_id = Some(driver_id);
    route.vehicle_id = Some(vehicle_id);
    route.date = NaiveDate::from_ymd_opt(2024, 3, 1);
    route.estimated_cost = Some(Decimal::new(751_500, 2));

    let saved = service.save_route(&route).await.unwrap();

    let ids: Vec<&str> = saved.stops.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["origin", "chi", "den", "destination"]);
    assert_eq!(saved.status, RouteStatus::Planned);
    assert_eq!(saved.estimated_cost, Some(Decimal::new(751_500, 2)));
    assert_eq!(saved.driver.as_ref().unwrap().max_hours, 8);
    assert_eq!(saved.vehicle.as_ref().unwrap().fuel_efficiency, 0.0);

    let rows = store.stop_rows(saved.id).await;
    let order: Vec<(i32, &str)> = rows.iter().map(|r| (r.order_index, r.stop_id.as_str())).collect();
    assert_eq!(order, vec![(0, "origin"), (1, "chi"), (2, "den"), (3, "destination")]);

    let drained = notifications.drain();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].level, NotificationLevel::Success);
}

#[tokio::test]
async fn test_save_route_rejects_invalid_route_without_writing() {
    let store = InMemoryRouteStore::new();
    let (service, notifications) = service(&store);

    let unnamed = coast_to_coast("   ");
    assert!(service.save_route(&unnamed).await.is_none());
    assert_eq!(notifications.last_error().as_deref(), Some("Please enter a route name"));

    let empty = RouteDraft::new("Empty").to_new_route();
    assert!(matches!(
        service.try_save_route(&empty).await,
        Err(AppError::RouteValidation(_))
    ));

    assert_eq!(store.route_count().await, 0);
}

#[tokio::test]
async fn test_save_route_succeeds_with_unreadable_driver() {
    let store = InMemoryRouteStore::new();
    let nameless = driver_row(None, Some("Nameless"));
    let driver_id = nameless.id;
    store.add_driver(nameless).await;

    let (service, notifications) = service(&store);
    let mut route = coast_to_coast("Committed");
    route.driver_id = Some(driver_id);

    let saved = service.save_route(&route).await.unwrap();
    assert!(saved.driver.is_none());
    assert_eq!(saved.stops.len(), 4);
    assert_eq!(store.route_count().await, 1);
    assert!(notifications.last_error().is_none());
}

/// Guarda en memoria pero no puede leer conductores ni vehículos
struct ReferenceLookupFails(InMemoryRouteStore);

#[async_trait]
impl RouteStore for ReferenceLookupFails {
    async fn insert_route(
        &self,
        route: NewRouteRow,
        stops: Vec<NewRouteStopRow>,
    ) -> Result<(RouteRow, Vec<RouteStopRow>), AppError> {
        self.0.insert_route(route, stops).await
    }

    async fn select_routes(&self, filter: &RouteFilter) -> Result<Vec<RouteRow>, AppError> {
        self.0.select_routes(filter).await
    }

    async fn select_stops(&self, route_ids: &[Uuid]) -> Result<Vec<RouteStopRow>, AppError> {
        self.0.select_stops(route_ids).await
    }

    async fn select_drivers(&self, _ids: Option<&[Uuid]>) -> Result<Vec<DriverRow>, AppError> {
        Err(AppError::Internal("drivers offline".to_string()))
    }

    async fn select_vehicles(&self, _ids: Option<&[Uuid]>) -> Result<Vec<VehicleRow>, AppError> {
        Err(AppError::Internal("vehicles offline".to_string()))
    }
}

#[tokio::test]
async fn test_save_route_survives_reference_lookup_failure() {
    let inner = InMemoryRouteStore::new();
    let notifications = Arc::new(NotificationBuffer::new());
    let service = RouteService::new(Arc::new(ReferenceLookupFails(inner.clone())), notifications.clone());

    let mut route = coast_to_coast("Committed");
    route.driver_id = Some(Uuid::new_v4());
    route.vehicle_id = Some(Uuid::new_v4());

    let saved = service.save_route(&route).await.unwrap();
    assert!(saved.driver.is_none());
    assert!(saved.vehicle.is_none());
    assert_eq!(inner.route_count().await, 1);
    assert!(notifications.last_error().is_none());
}

#[tokio::test]
async fn test_fetch_routes_applies_filters() {
    let store = InMemoryRouteStore::new();
    let maria = driver_row(Some("Maria"), Some("Gonzalez"));
    let john = driver_row(Some("John"), Some("Smith"));
    let (maria_id, john_id) = (maria.id, john.id);
    store.add_driver(maria).await;
    store.add_driver(john).await;

    let (service, _) = service(&store);

    let mut first = coast_to_coast("March route");
    first.driver_id = Some(maria_id);
    first.date = NaiveDate::from_ymd_opt(2024, 3, 1);

    let mut second = coast_to_coast("April route");
    second.driver_id = Some(john_id);
    second.date = NaiveDate::from_ymd_opt(2024, 4, 15);
    second.status = RouteStatus::Completed;

    let undated = coast_to_coast("Undated route");

    for route in [&first, &second, &undated] {
        assert!(service.save_route(route).await.is_some());
    }

    let all = service.fetch_routes(None).await;
    assert_eq!(all.len(), 3);
    // más recientes primero
    assert_eq!(all[0].name, "April route");

    let by_driver = RouteFilter { driver: Some("gonz".to_string()), ..Default::default() };
    let names: Vec<String> = service.fetch_routes(Some(&by_driver)).await.into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["March route"]);

    let by_range = RouteFilter {
        date_from: NaiveDate::from_ymd_opt(2024, 3, 1),
        date_to: NaiveDate::from_ymd_opt(2024, 3, 31),
        ..Default::default()
    };
    let names: Vec<String> = service.fetch_routes(Some(&by_range)).await.into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["March route"]);

    let by_status = RouteFilter { status: Some(RouteStatus::Completed), ..Default::default() };
    let routes = service.fetch_routes(Some(&by_status)).await;
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].driver.as_ref().unwrap().first_name, "John");
}

#[tokio::test]
async fn test_fetch_skips_invalid_rows() {
    let store = InMemoryRouteStore::new();
    store.add_driver(driver_row(Some("Maria"), Some("Gonzalez"))).await;
    store.add_driver(driver_row(None, Some("Nameless"))).await;
    store.add_vehicle(vehicle_row(Some("Truck"), "flatbed")).await;
    store.add_vehicle(vehicle_row(None, "van")).await;

    let broken_id = Uuid::new_v4();
    store
        .add_route_row(
            RouteRow {
                id: broken_id,
                name: Some("Broken stops".to_string()),
                route_date: None,
                time_window_start: None,
                time_window_end: None,
                driver_id: None,
                vehicle_id: None,
                optimization_priority: Some("balanced".to_string()),
                constraints: None,
                distance: None,
                duration: None,
                estimated_cost: None,
                status: Some("planned".to_string()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            vec![RouteStopRow {
                route_id: broken_id,
                stop_id: "origin".to_string(),
                order_index: 0,
                address: None,
                stop_type: Some("depot".to_string()),
                latitude: None,
                longitude: None,
                arrival_time: None,
                departure_time: None,
            }],
        )
        .await;

    let (service, notifications) = service(&store);
    assert!(service.save_route(&coast_to_coast("Valid")).await.is_some());

    assert_eq!(service.fetch_drivers().await.len(), 1);
    assert_eq!(service.fetch_vehicles().await.len(), 1);

    let routes = service.fetch_routes(None).await;
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].name, "Valid");
    assert!(notifications.last_error().is_none());
}

struct UnavailableStore;

#[async_trait]
impl RouteStore for UnavailableStore {
    async fn insert_route(
        &self,
        _route: NewRouteRow,
        _stops: Vec<NewRouteStopRow>,
    ) -> Result<(RouteRow, Vec<RouteStopRow>), AppError> {
        Err(AppError::Internal("store offline".to_string()))
    }

    async fn select_routes(&self, _filter: &RouteFilter) -> Result<Vec<RouteRow>, AppError> {
        Err(AppError::Internal("store offline".to_string()))
    }

    async fn select_stops(&self, _route_ids: &[Uuid]) -> Result<Vec<RouteStopRow>, AppError> {
        Err(AppError::Internal("store offline".to_string()))
    }

    async fn select_drivers(&self, _ids: Option<&[Uuid]>) -> Result<Vec<DriverRow>, AppError> {
        Err(AppError::Internal("store offline".to_string()))
    }

    async fn select_vehicles(&self, _ids: Option<&[Uuid]>) -> Result<Vec<VehicleRow>, AppError> {
        Err(AppError::Internal("store offline".to_string()))
    }
}

#[tokio::test]
async fn test_store_failures_become_notifications() {
    let notifications = Arc::new(NotificationBuffer::new());
    let service = RouteService::new(Arc::new(UnavailableStore), notifications.clone());

    assert!(service.save_route(&coast_to_coast("Offline")).await.is_none());
    assert_eq!(notifications.last_error().as_deref(), Some("There was a problem saving the route"));

    assert!(service.fetch_routes(None).await.is_empty());
    assert_eq!(notifications.last_error().as_deref(), Some("There was a problem loading routes"));

    assert!(service.fetch_drivers().await.is_empty());
    assert_eq!(notifications.last_error().as_deref(), Some("There was a problem loading drivers"));

    assert!(service.fetch_vehicles().await.is_empty());
    assert_eq!(notifications.last_error().as_deref(), Some("There was a problem loading vehicles"));

    assert!(matches!(service.try_fetch_routes(None).await, Err(AppError::Internal(_))));
}
