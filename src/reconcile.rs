//! List Reconciliation
//!
//! Derived views computed from freshly fetched lists. Everything here is
//! synchronous and free of I/O; screens call these after each fetch.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;

use crate::models::{CollectionEvent, CollectionPoint, Container, Route, User};

/// Number of collections listed on the overview
pub const RECENT_LIMIT: usize = 10;

// ========================
// Availability
// ========================

/// Containers not referenced by any collection point, in input order
pub fn available_containers(all: &[Container], points: &[CollectionPoint]) -> Vec<Container> {
    let taken: HashSet<u32> = points.iter().filter_map(CollectionPoint::container_id).collect();
    all.iter().filter(|c| !taken.contains(&c.id)).cloned().collect()
}

// ========================
// Per-date views
// ========================

fn local_date<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// Undated events fall on no day
fn happened_on<Tz: TimeZone>(event: &CollectionEvent, date: NaiveDate, tz: &Tz) -> bool {
    event.collected_at.is_some_and(|at| local_date(&at, tz) == date)
}

/// Containers with at least one collection whose date in `tz` is `date`
pub fn collected_count<Tz: TimeZone>(
    containers: &[Container],
    events: &[CollectionEvent],
    date: NaiveDate,
    tz: &Tz,
) -> usize {
    let collected: HashSet<u32> = events
        .iter()
        .filter(|e| happened_on(e, date, tz))
        .filter_map(CollectionEvent::container_id)
        .collect();
    containers.iter().filter(|c| collected.contains(&c.id)).count()
}

/// Collections on `date`, newest first
pub fn events_on_date<Tz: TimeZone>(events: &[CollectionEvent], date: NaiveDate, tz: &Tz) -> Vec<CollectionEvent> {
    let mut on_date: Vec<CollectionEvent> = events
        .iter()
        .filter(|e| happened_on(e, date, tz))
        .cloned()
        .collect();
    sort_newest_first(&mut on_date);
    on_date
}

/// The first `limit` collections of [`events_on_date`]
pub fn recent_events<Tz: TimeZone>(
    events: &[CollectionEvent],
    date: NaiveDate,
    tz: &Tz,
    limit: usize,
) -> Vec<CollectionEvent> {
    let mut recent = events_on_date(events, date, tz);
    recent.truncate(limit);
    recent
}

// ========================
// Route scope
// ========================

/// Route selection on the overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteScope {
    #[default]
    All,
    /// Containers without a collection point, or whose point has no route
    Unassigned,
    Route(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized route selection: {0:?}")]
pub struct ScopeParseError(pub String);

impl RouteScope {
    /// Value used by the `<select>` option for this scope
    pub fn as_value(&self) -> String {
        match self {
            RouteScope::All => "all".to_string(),
            RouteScope::Unassigned => "unassigned".to_string(),
            RouteScope::Route(id) => id.to_string(),
        }
    }

    pub fn matches(&self, container: &Container) -> bool {
        match self {
            RouteScope::All => true,
            RouteScope::Unassigned => container.is_unassigned(),
            RouteScope::Route(id) => container.route_id() == Some(*id),
        }
    }
}

impl FromStr for RouteScope {
    type Err = ScopeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(RouteScope::All),
            "unassigned" => Ok(RouteScope::Unassigned),
            other => other
                .parse::<u32>()
                .map(RouteScope::Route)
                .map_err(|_| ScopeParseError(s.to_string())),
        }
    }
}

pub fn filter_by_scope(containers: &[Container], scope: RouteScope) -> Vec<Container> {
    containers.iter().filter(|c| scope.matches(c)).cloned().collect()
}

/// Points of one route (or all points when `route_id` is `None`), in input order
pub fn points_in_route(points: &[CollectionPoint], route_id: Option<u32>) -> Vec<CollectionPoint> {
    match route_id {
        None => points.to_vec(),
        Some(id) => points.iter().filter(|p| p.route_id() == Some(id)).cloned().collect(),
    }
}

// ========================
// Overview counters
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// Scoped containers collected on the selected date
    pub collected: usize,
    /// Containers in the selected scope
    pub scoped_total: usize,
    pub collections_on_date: usize,
    pub total_containers: usize,
    pub routes: usize,
    pub users: usize,
}

pub fn dashboard_stats<Tz: TimeZone>(
    containers: &[Container],
    events: &[CollectionEvent],
    route_count: usize,
    user_count: usize,
    scope: RouteScope,
    date: NaiveDate,
    tz: &Tz,
) -> DashboardStats {
    let scoped = filter_by_scope(containers, scope);
    DashboardStats {
        collected: collected_count(&scoped, events, date, tz),
        scoped_total: scoped.len(),
        collections_on_date: events
            .iter()
            .filter(|e| happened_on(e, date, tz))
            .count(),
        total_containers: containers.len(),
        routes: route_count,
        users: user_count,
    }
}

// ========================
// Ordering
// ========================

/// Points in route order; ties broken by id
pub fn ordered_points(points: &[CollectionPoint]) -> Vec<CollectionPoint> {
    let mut ordered = points.to_vec();
    ordered.sort_by_key(|p| (p.order, p.id));
    ordered
}

/// Move the point at `from` to `to` (indices into [`ordered_points`]) and
/// renumber the route 1..=n. Returns `(point_id, new_order)` for the points
/// whose order actually changed.
pub fn reorder_points(points: &[CollectionPoint], from: usize, to: usize) -> Vec<(u32, i32)> {
    let mut ordered = ordered_points(points);
    if !leptos_dragdrop::move_index(&mut ordered, from, to) {
        return Vec::new();
    }
    ordered
        .iter()
        .zip(1..)
        .filter(|(point, order)| point.order != *order)
        .map(|(point, order)| (point.id, order))
        .collect()
}

/// Entities listed by backend id
pub trait Keyed {
    fn key(&self) -> u32;
}

impl Keyed for User {
    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for Container {
    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for Route {
    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for CollectionPoint {
    fn key(&self) -> u32 {
        self.id
    }
}

impl Keyed for CollectionEvent {
    fn key(&self) -> u32 {
        self.id
    }
}

/// Ascending id; the order of the users, containers and routes tables
pub fn sort_by_id<T: Keyed>(items: &mut [T]) {
    items.sort_by_key(Keyed::key);
}

/// Descending id; the order of the collections log
pub fn sort_newest_first<T: Keyed>(items: &mut [T]) {
    items.sort_by_key(|item| std::cmp::Reverse(item.key()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp_in, CollectionMethod, ContainerPoint, RouteSummary};
    use chrono::FixedOffset;

    fn container(id: u32, route: Option<u32>) -> Container {
        Container {
            id,
            location: "19.8 -97.3".to_string(),
            place: None,
            qr_code: format!("QR-{}", id),
            nfc_code: format!("NFC-{}", id),
            collected: false,
            updated_at: None,
            collection_point: route.map(|route_id| ContainerPoint {
                id: Some(100 + id),
                order: Some(1),
                route: Some(RouteSummary {
                    id: route_id,
                    name: format!("Ruta {}", route_id),
                    description: None,
                }),
            }),
        }
    }

    fn point(id: u32, route_id: u32, container_id: u32, order: i32) -> CollectionPoint {
        CollectionPoint {
            id,
            order,
            route: Some(RouteSummary {
                id: route_id,
                name: String::new(),
                description: None,
            }),
            container: Some(container(container_id, Some(route_id))),
        }
    }

    fn event(id: u32, container_id: u32, at: &str) -> CollectionEvent {
        CollectionEvent {
            id,
            collected_at: Some(DateTime::parse_from_rfc3339(at).unwrap().with_timezone(&Utc)),
            method: CollectionMethod::Qr,
            collector: None,
            container: Some(container(container_id, None)),
        }
    }

    fn ids<T: Keyed>(items: &[T]) -> Vec<u32> {
        items.iter().map(Keyed::key).collect()
    }

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn central() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    #[test]
    fn test_available_containers_is_set_difference() {
        let all = vec![container(1, None)];
        assert_eq!(ids(&available_containers(&all, &[])), vec![1]);

        let points = vec![point(10, 2, 1, 1)];
        assert!(available_containers(&all, &points).is_empty());
    }

    #[test]
    fn test_available_containers_preserves_order() {
        let all = vec![container(5, None), container(2, None), container(9, None), container(4, None)];
        let points = vec![point(1, 1, 9, 1)];
        assert_eq!(ids(&available_containers(&all, &points)), vec![5, 2, 4]);
    }

    #[test]
    fn test_point_without_container_takes_nothing() {
        let all = vec![container(1, None), container(2, None)];
        let mut empty = point(1, 1, 1, 1);
        empty.container = None;
        assert_eq!(ids(&available_containers(&all, &[empty])), vec![1, 2]);
    }

    #[test]
    fn test_collected_count_same_day_counts_once() {
        let containers = vec![container(1, None), container(2, None)];
        let events = vec![
            event(1, 1, "2024-05-01T08:00:00-06:00"),
            event(2, 1, "2024-05-01T23:00:00-06:00"),
        ];
        assert_eq!(collected_count(&containers, &events, may_first(), &central()), 1);
    }

    #[test]
    fn test_collected_count_ignores_time_of_day() {
        let containers = vec![container(1, None)];
        for time in ["00:00:00", "06:30:00", "12:00:00", "23:59:59"] {
            let events = vec![event(1, 1, &format!("2024-05-01T{}-06:00", time))];
            assert_eq!(collected_count(&containers, &events, may_first(), &central()), 1, "{}", time);
        }
    }

    #[test]
    fn test_collected_count_uses_given_timezone() {
        let containers = vec![container(1, None)];
        // 23:00 at UTC-6 is already the next day in UTC
        let events = vec![event(1, 1, "2024-05-01T23:00:00-06:00")];
        assert_eq!(collected_count(&containers, &events, may_first(), &central()), 1);
        assert_eq!(collected_count(&containers, &events, may_first(), &Utc), 0);
    }

    #[test]
    fn test_offsetless_early_morning_event_counts_for_its_own_day() {
        let containers = vec![container(1, None)];
        let mut early = event(1, 1, "2024-05-01T00:00:00Z");
        early.collected_at = parse_timestamp_in("2024-05-01T02:00:00", &central());

        let events = vec![early];
        assert_eq!(collected_count(&containers, &events, may_first(), &central()), 1);
        assert_eq!(events_on_date(&events, may_first(), &central()).len(), 1);
    }

    #[test]
    fn test_undated_events_match_no_day() {
        let containers = vec![container(1, None), container(2, None)];
        let mut undated = event(2, 2, "2024-05-01T10:00:00-06:00");
        undated.collected_at = None;
        let events = vec![event(1, 1, "2024-05-01T10:00:00-06:00"), undated];

        assert_eq!(collected_count(&containers, &events, may_first(), &central()), 1);
        assert_eq!(ids(&events_on_date(&events, may_first(), &central())), vec![1]);

        let stats = dashboard_stats(&containers, &events, 0, 0, RouteScope::All, may_first(), &central());
        assert_eq!(stats.collections_on_date, 1);
    }

    #[test]
    fn test_collected_count_only_counts_listed_containers() {
        let containers = vec![container(1, None)];
        let events = vec![event(1, 7, "2024-05-01T10:00:00-06:00")];
        assert_eq!(collected_count(&containers, &events, may_first(), &central()), 0);
    }

    #[test]
    fn test_recent_events_newest_first_and_limited() {
        let mut events: Vec<CollectionEvent> = (1..=12)
            .map(|id| event(id, id, "2024-05-01T09:00:00-06:00"))
            .collect();
        events.push(event(13, 1, "2024-04-30T09:00:00-06:00"));

        let recent = recent_events(&events, may_first(), &central(), RECENT_LIMIT);
        assert_eq!(ids(&recent), vec![12, 11, 10, 9, 8, 7, 6, 5, 4, 3]);
        assert_eq!(events_on_date(&events, may_first(), &central()).len(), 12);
    }

    #[test]
    fn test_scope_all_is_identity() {
        let containers = vec![container(3, Some(1)), container(1, None), container(2, Some(2))];
        assert_eq!(filter_by_scope(&containers, RouteScope::All), containers);
    }

    #[test]
    fn test_scope_unassigned_is_idempotent() {
        let mut no_route = container(4, Some(1));
        if let Some(point) = no_route.collection_point.as_mut() {
            point.route = None;
        }
        let containers = vec![container(1, Some(1)), container(2, None), no_route, container(3, Some(2))];

        let once = filter_by_scope(&containers, RouteScope::Unassigned);
        assert_eq!(ids(&once), vec![2, 4]);
        assert_eq!(filter_by_scope(&once, RouteScope::Unassigned), once);
    }

    #[test]
    fn test_scope_route_keeps_matching_containers() {
        let containers = vec![container(1, Some(1)), container(2, Some(2)), container(3, Some(1))];
        assert_eq!(ids(&filter_by_scope(&containers, RouteScope::Route(1))), vec![1, 3]);
        assert!(filter_by_scope(&containers, RouteScope::Route(9)).is_empty());
    }

    #[test]
    fn test_route_scope_parse() {
        assert_eq!("all".parse::<RouteScope>(), Ok(RouteScope::All));
        assert_eq!("unassigned".parse::<RouteScope>(), Ok(RouteScope::Unassigned));
        assert_eq!("17".parse::<RouteScope>(), Ok(RouteScope::Route(17)));
        assert!("ruta".parse::<RouteScope>().is_err());
        assert!("-1".parse::<RouteScope>().is_err());

        for scope in [RouteScope::All, RouteScope::Unassigned, RouteScope::Route(4)] {
            assert_eq!(scope.as_value().parse::<RouteScope>(), Ok(scope));
        }
    }

    #[test]
    fn test_points_in_route() {
        let points = vec![point(1, 1, 10, 1), point(2, 2, 11, 1), point(3, 1, 12, 2)];
        assert_eq!(ids(&points_in_route(&points, Some(1))), vec![1, 3]);
        assert_eq!(ids(&points_in_route(&points, None)), vec![1, 2, 3]);
    }

    #[test]
    fn test_dashboard_stats_scoped() {
        let containers = vec![container(1, Some(1)), container(2, Some(1)), container(3, None)];
        let events = vec![
            event(1, 1, "2024-05-01T07:00:00-06:00"),
            event(2, 3, "2024-05-01T08:00:00-06:00"),
            event(3, 2, "2024-04-29T08:00:00-06:00"),
        ];

        let stats = dashboard_stats(&containers, &events, 2, 5, RouteScope::Route(1), may_first(), &central());
        assert_eq!(
            stats,
            DashboardStats {
                collected: 1,
                scoped_total: 2,
                collections_on_date: 2,
                total_containers: 3,
                routes: 2,
                users: 5,
            }
        );
    }

    #[test]
    fn test_reorder_emits_only_changed_orders() {
        let points = vec![point(1, 1, 10, 1), point(2, 1, 11, 2), point(3, 1, 12, 3), point(4, 1, 13, 4)];
        // move the last point to the second slot
        assert_eq!(reorder_points(&points, 3, 1), vec![(4, 2), (2, 3), (3, 4)]);
        assert!(reorder_points(&points, 2, 2).is_empty());
        assert!(reorder_points(&points, 9, 0).is_empty());
    }

    #[test]
    fn test_reorder_renumbers_unordered_points() {
        // freshly added points carry order 0
        let points = vec![point(1, 1, 10, 0), point(2, 1, 11, 0)];
        assert_eq!(reorder_points(&points, 1, 0), vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn test_sort_helpers() {
        let mut containers = vec![container(3, None), container(1, None), container(2, None)];
        sort_by_id(&mut containers);
        assert_eq!(ids(&containers), vec![1, 2, 3]);

        let mut events: Vec<CollectionEvent> = [1, 5, 3]
            .into_iter()
            .map(|id| event(id, 1, "2024-05-01T07:00:00Z"))
            .collect();
        sort_newest_first(&mut events);
        assert_eq!(ids(&events), vec![5, 3, 1]);
    }
}
