//! Conversion of the configured catalog seed into domain records.

use crate::models::{ModelError, ServiceOffering, StaffMember, WorkingWindow};
use crate::time::{parse_weekday, ClockTime, TimeParseError};
use salonbook_config::models::{ServiceSeed, StaffSeed};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid working hours for staff '{staff_id}': {source}")]
    Time {
        staff_id: String,
        #[source]
        source: TimeParseError,
    },
    #[error(transparent)]
    Window(#[from] ModelError),
}

impl From<&ServiceSeed> for ServiceOffering {
    fn from(seed: &ServiceSeed) -> Self {
        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            description: seed.description.clone(),
            price_cents: seed.price_cents,
            duration_min: seed.duration_min,
        }
    }
}

impl From<&StaffSeed> for StaffMember {
    fn from(seed: &StaffSeed) -> Self {
        Self {
            id: seed.id.clone(),
            name: seed.name.clone(),
            specialty: seed.specialty.clone(),
        }
    }
}

/// Working windows declared for one staff member, validated.
pub fn working_windows(seed: &StaffSeed) -> Result<Vec<WorkingWindow>, CatalogError> {
    let time_error = |source| CatalogError::Time {
        staff_id: seed.id.clone(),
        source,
    };
    seed.hours
        .iter()
        .map(|hours| {
            let weekday = parse_weekday(&hours.weekday).map_err(time_error)?;
            let start: ClockTime = hours.start_time.parse().map_err(time_error)?;
            let end: ClockTime = hours.end_time.parse().map_err(time_error)?;
            Ok(WorkingWindow::new(&seed.id, weekday, start, end)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use salonbook_config::models::WorkingHoursSeed;

    fn staff(hours: Vec<(&str, &str, &str)>) -> StaffSeed {
        StaffSeed {
            id: "giulia".into(),
            name: "Giulia".into(),
            specialty: None,
            hours: hours
                .into_iter()
                .map(|(weekday, start, end)| WorkingHoursSeed {
                    weekday: weekday.into(),
                    start_time: start.into(),
                    end_time: end.into(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_working_windows_from_seed() {
        let windows =
            working_windows(&staff(vec![("monday", "09:00", "13:00"), ("Monday", "14:00", "18:00")]))
                .unwrap();
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().all(|w| w.weekday == Weekday::Mon));
        assert_eq!(windows[1].start_minute(), 14 * 60);
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let err = working_windows(&staff(vec![("funday", "09:00", "13:00")])).unwrap_err();
        assert!(matches!(err, CatalogError::Time { .. }));

        let err = working_windows(&staff(vec![("monday", "13:00", "09:00")])).unwrap_err();
        assert!(matches!(err, CatalogError::Window(ModelError::EmptyWindow { .. })));
    }
}
