// --- File: crates/salonbook_availability/src/test.rs ---
//! Tests for the in-memory store and the availability orchestration.

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::service::InMemorySalonStore;
    use chrono::{Duration, NaiveDate};
    use salonbook_common::models::{CustomerDetails, NewAppointment};
    use salonbook_common::time::today_in_zone;
    use salonbook_config::{CatalogConfig, ServiceSeed, StaffSeed, WorkingHoursSeed};

    pub const TIME_ZONE: &str = "Europe/Rome";

    const WEEKDAYS: [&str; 7] = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];

    fn every_day(start: &str, end: &str) -> Vec<WorkingHoursSeed> {
        WEEKDAYS
            .iter()
            .map(|weekday| WorkingHoursSeed {
                weekday: weekday.to_string(),
                start_time: start.to_string(),
                end_time: end.to_string(),
            })
            .collect()
    }

    fn service(id: &str, name: &str, duration_min: Option<u32>) -> ServiceSeed {
        ServiceSeed {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price_cents: 2500,
            duration_min,
        }
    }

    /// Anna works 09:00-10:00 and Marco 09:00-09:30, every day.
    pub fn catalog() -> CatalogConfig {
        CatalogConfig {
            services: vec![
                service("cut", "Haircut", Some(30)),
                service("color", "Color", Some(60)),
                service("consult", "Consultation", None),
            ],
            staff: vec![
                StaffSeed {
                    id: "anna".to_string(),
                    name: "Anna".to_string(),
                    specialty: Some("Color".to_string()),
                    hours: every_day("09:00", "10:00"),
                },
                StaffSeed {
                    id: "marco".to_string(),
                    name: "Marco".to_string(),
                    specialty: None,
                    hours: every_day("09:00", "09:30"),
                },
            ],
        }
    }

    pub fn store() -> InMemorySalonStore {
        InMemorySalonStore::from_catalog(&catalog()).unwrap()
    }

    /// A date a week ahead, so bookings are never in the past.
    pub fn next_week() -> NaiveDate {
        today_in_zone(TIME_ZONE).unwrap() + Duration::days(7)
    }

    pub fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Lucia Bianchi".to_string(),
            phone: "+39 333 1234567".to_string(),
            email: Some("lucia@example.com".to_string()),
            birthdate: None,
        }
    }

    pub fn appointment(staff_id: &str, date: NaiveDate, time: &str, duration_min: u32) -> NewAppointment {
        NewAppointment {
            service_id: "cut".to_string(),
            staff_id: staff_id.to_string(),
            customer: customer(),
            date,
            time: time.parse().unwrap(),
            duration_min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{appointment, next_week, store};
    use crate::logic::{compute_availability, compute_availability_any, AvailabilityError};
    use crate::service::InMemorySalonStore;
    use chrono::{Datelike, NaiveDate, Weekday};
    use salonbook_common::models::{
        AppointmentStatus, BusyInterval, ServiceOffering, SlotSets, StaffMember, WorkingWindow,
    };
    use salonbook_common::services::{
        AppointmentStore, AvailabilitySource, BoxFuture, SourceError,
    };
    use salonbook_common::ClockTime;
    use salonbook_config::StraddlePolicy;

    fn labels(sets: &SlotSets) -> (Vec<&str>, Vec<&str>) {
        (
            sets.perfect.iter().map(|s| s.label.as_str()).collect(),
            sets.other.iter().map(|s| s.label.as_str()).collect(),
        )
    }

    /// Source whose backend is unreachable.
    struct UnreachableSource;

    impl AvailabilitySource for UnreachableSource {
        fn get_working_windows(
            &self,
            _staff_id: &str,
            _weekday: Weekday,
        ) -> BoxFuture<'_, Vec<WorkingWindow>, SourceError> {
            Box::pin(async { Err(SourceError::Fetch("connection refused".into())) })
        }

        fn get_busy_intervals(
            &self,
            _staff_id: &str,
            _date: NaiveDate,
        ) -> BoxFuture<'_, Vec<BusyInterval>, SourceError> {
            Box::pin(async { Err(SourceError::Fetch("connection refused".into())) })
        }

        fn get_service(&self, _service_id: &str) -> BoxFuture<'_, ServiceOffering, SourceError> {
            Box::pin(async { Err(SourceError::Fetch("connection refused".into())) })
        }

        fn get_staff(&self, _staff_id: &str) -> BoxFuture<'_, StaffMember, SourceError> {
            Box::pin(async { Err(SourceError::Fetch("connection refused".into())) })
        }

        fn list_services(&self) -> BoxFuture<'_, Vec<ServiceOffering>, SourceError> {
            Box::pin(async { Err(SourceError::Fetch("connection refused".into())) })
        }

        fn list_staff(&self) -> BoxFuture<'_, Vec<StaffMember>, SourceError> {
            Box::pin(async { Err(SourceError::Fetch("connection refused".into())) })
        }
    }

    #[tokio::test]
    async fn test_catalog_is_loaded_in_order() {
        let store = store();
        let services = store.list_services().await.unwrap();
        let ids: Vec<_> = services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["cut", "color", "consult"]);
        assert_eq!(store.get_service_duration("color").await.unwrap(), Some(60));
        assert_eq!(store.get_service_duration("consult").await.unwrap(), None);
        assert_eq!(store.list_staff().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = store();
        assert!(matches!(
            store.get_service("perm").await,
            Err(SourceError::NotFound(_))
        ));
        assert!(matches!(
            store.get_staff("luigi").await,
            Err(SourceError::NotFound(_))
        ));
        assert!(matches!(
            store.get_service_duration("perm").await,
            Err(SourceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_working_windows_are_filtered_by_weekday() {
        let store = InMemorySalonStore::new();
        let t = |s: &str| -> ClockTime { s.parse().unwrap() };
        store
            .add_working_window(WorkingWindow::new("anna", Weekday::Mon, t("09:00"), t("13:00")).unwrap())
            .unwrap();
        store
            .add_working_window(WorkingWindow::new("anna", Weekday::Wed, t("14:00"), t("18:00")).unwrap())
            .unwrap();
        assert_eq!(store.get_working_windows("anna", Weekday::Mon).await.unwrap().len(), 1);
        assert!(store.get_working_windows("anna", Weekday::Sun).await.unwrap().is_empty());
        assert!(store.get_working_windows("nobody", Weekday::Mon).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_overlap_but_accepts_touching() {
        let store = store();
        let date = next_week();
        let first = store.insert_appointment(appointment("anna", date, "09:00", 30)).await.unwrap();
        assert_eq!(first.status, AppointmentStatus::Pending);

        let clash = store.insert_appointment(appointment("anna", date, "09:15", 30)).await;
        assert!(matches!(clash, Err(SourceError::Conflict(_))));

        // Back-to-back, another staff member, another day: all fine
        store.insert_appointment(appointment("anna", date, "09:30", 30)).await.unwrap();
        store.insert_appointment(appointment("marco", date, "09:00", 30)).await.unwrap();
        store
            .insert_appointment(appointment("anna", date.succ_opt().unwrap(), "09:00", 30))
            .await
            .unwrap();
        assert_eq!(store.appointments().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_cancelled_appointments_free_their_time() {
        let store = store();
        let date = next_week();
        let booked = store.insert_appointment(appointment("anna", date, "09:00", 60)).await.unwrap();
        assert_eq!(store.get_busy_intervals("anna", date).await.unwrap().len(), 1);

        store
            .set_appointment_status(&booked.id, AppointmentStatus::Cancelled)
            .unwrap();
        assert!(store.get_busy_intervals("anna", date).await.unwrap().is_empty());
        store.insert_appointment(appointment("anna", date, "09:00", 60)).await.unwrap();
    }

    #[tokio::test]
    async fn test_compute_availability_for_one_staff_member() {
        let store = store();
        let date = next_week();
        let slots = compute_availability(&store, "anna", date, "cut", StraddlePolicy::Clip)
            .await
            .unwrap();
        assert_eq!(labels(&slots), (vec![], vec!["09:00", "09:30"]));

        store.insert_appointment(appointment("anna", date, "09:30", 30)).await.unwrap();
        let slots = compute_availability(&store, "anna", date, "cut", StraddlePolicy::Clip)
            .await
            .unwrap();
        assert_eq!(labels(&slots), (vec!["09:00"], vec![]));

        let slots = compute_availability(&store, "anna", date, "color", StraddlePolicy::Clip)
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_service_without_duration_has_no_availability() {
        let store = store();
        let slots = compute_availability(&store, "anna", next_week(), "consult", StraddlePolicy::Clip)
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_service_or_staff_propagates_not_found() {
        let store = store();
        let date = next_week();
        let err = compute_availability(&store, "anna", date, "perm", StraddlePolicy::Clip)
            .await
            .unwrap_err();
        assert!(matches!(err, AvailabilityError::Source(SourceError::NotFound(_))));

        let err = compute_availability(&store, "luigi", date, "cut", StraddlePolicy::Clip)
            .await
            .unwrap_err();
        assert!(matches!(err, AvailabilityError::Source(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_day_off_has_no_availability() {
        let store = InMemorySalonStore::new();
        store
            .add_service(ServiceOffering {
                id: "cut".into(),
                name: "Haircut".into(),
                description: None,
                price_cents: 2000,
                duration_min: Some(30),
            })
            .unwrap();
        store
            .add_staff(StaffMember {
                id: "anna".into(),
                name: "Anna".into(),
                specialty: None,
            })
            .unwrap();
        let date = next_week();
        let t = |s: &str| -> ClockTime { s.parse().unwrap() };
        store
            .add_working_window(
                WorkingWindow::new("anna", date.weekday().succ(), t("09:00"), t("17:00")).unwrap(),
            )
            .unwrap();
        let slots = compute_availability(&store, "anna", date, "cut", StraddlePolicy::Clip)
            .await
            .unwrap();
        assert!(slots.is_empty());
    }

    #[tokio::test]
    async fn test_any_staff_is_the_union_of_all_staff() {
        let store = store();
        let slots = compute_availability_any(&store, next_week(), "cut", StraddlePolicy::Clip)
            .await
            .unwrap();
        // Marco's 30-minute window makes 09:00 perfect; Anna adds 09:30.
        assert_eq!(labels(&slots), (vec!["09:00"], vec!["09:30"]));
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_no_partial_result() {
        let err = compute_availability(&UnreachableSource, "anna", next_week(), "cut", StraddlePolicy::Clip)
            .await
            .unwrap_err();
        assert!(matches!(err, AvailabilityError::Source(SourceError::Fetch(_))));

        let err = compute_availability_any(&UnreachableSource, next_week(), "cut", StraddlePolicy::Clip)
            .await
            .unwrap_err();
        assert!(matches!(err, AvailabilityError::Source(SourceError::Fetch(_))));
    }
}
