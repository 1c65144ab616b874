//! Vehicle models and validation

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Model year of the first production automobile
pub const FIRST_MODEL_YEAR: u16 = 1886;

/// Length of a modern (post-1981) VIN
pub const VIN_LENGTH: usize = 17;

/// A vehicle owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a vehicle.
///
/// `year` is taken as any JSON integer so an out-of-range value is a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: i64,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
}

/// Partial update of a vehicle; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleUpdate {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl NewVehicle {
    /// Validate and normalize the fields.
    ///
    /// Text fields are trimmed, the VIN is upper-cased, and empty optional
    /// fields become `None`.
    pub fn normalize(self) -> StoreResult<Self> {
        Ok(Self {
            make: required_text("make", &self.make)?,
            model: required_text("model", &self.model)?,
            year: model_year(self.year)?.into(),
            vin: self.vin.as_deref().map(normalize_vin).transpose()?.flatten(),
            nickname: optional_text(self.nickname.as_deref()),
        })
    }
}

impl VehicleUpdate {
    /// Validate and normalize whichever fields are present
    pub fn normalize(self) -> StoreResult<Self> {
        Ok(Self {
            make: self.make.as_deref().map(|m| required_text("make", m)).transpose()?,
            model: self.model.as_deref().map(|m| required_text("model", m)).transpose()?,
            year: self.year.map(model_year).transpose()?.map(i64::from),
            vin: self.vin.as_deref().map(normalize_vin).transpose()?.flatten(),
            nickname: self.nickname.as_deref().map(str::trim).map(str::to_string),
        })
    }

    /// Apply this update to a vehicle in place.
    ///
    /// Nothing is changed if the year is out of range.
    pub fn apply(self, vehicle: &mut Vehicle) -> StoreResult<()> {
        let year = self.year.map(model_year).transpose()?;
        if let Some(make) = self.make {
            vehicle.make = make;
        }
        if let Some(model) = self.model {
            vehicle.model = model;
        }
        if let Some(year) = year {
            vehicle.year = year;
        }
        if let Some(vin) = self.vin {
            vehicle.vin = Some(vin);
        }
        // An explicit empty nickname clears it
        if let Some(nickname) = self.nickname {
            vehicle.nickname = if nickname.is_empty() { None } else { Some(nickname) };
        }
        Ok(())
    }
}

fn required_text(field: &str, value: &str) -> StoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::Invalid(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Check a model year against `FIRST_MODEL_YEAR..=next year` and narrow it
pub fn model_year(year: i64) -> StoreResult<u16> {
    let latest = i64::from(Utc::now().year()) + 1;
    if !(i64::from(FIRST_MODEL_YEAR)..=latest).contains(&year) {
        return Err(StoreError::Invalid(format!(
            "year must be between {} and {}",
            FIRST_MODEL_YEAR, latest
        )));
    }
    u16::try_from(year).map_err(|_| StoreError::Invalid(format!("year {} is out of range", year)))
}

/// Normalize a VIN. An empty string means "no VIN" and yields `Ok(None)`.
///
/// VINs are 17 characters of `0-9` and `A-Z` excluding `I`, `O` and `Q`.
pub fn normalize_vin(vin: &str) -> StoreResult<Option<String>> {
    let vin = vin.trim().to_ascii_uppercase();
    if vin.is_empty() {
        return Ok(None);
    }
    if vin.len() != VIN_LENGTH {
        return Err(StoreError::Invalid(format!(
            "VIN must be {} characters, got {}",
            VIN_LENGTH,
            vin.len()
        )));
    }
    if let Some(bad) = vin
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() || matches!(c, 'I' | 'O' | 'Q'))
    {
        return Err(StoreError::Invalid(format!(
            "VIN contains invalid character '{}'",
            bad
        )));
    }
    Ok(Some(vin))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civic() -> NewVehicle {
        NewVehicle {
            make: " Honda ".to_string(),
            model: "Civic".to_string(),
            year: 2019,
            vin: Some("2hgfc2f59kh123456".to_string()),
            nickname: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_normalize_new_vehicle() {
        let v = civic().normalize().unwrap();
        assert_eq!(v.make, "Honda");
        assert_eq!(v.vin.as_deref(), Some("2HGFC2F59KH123456"));
        assert_eq!(v.nickname, None);
    }

    #[test]
    fn test_empty_make_rejected() {
        let mut v = civic();
        v.make = "   ".to_string();
        assert!(matches!(v.normalize(), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn test_year_bounds() {
        let mut v = civic();
        v.year = 1885;
        assert!(v.normalize().is_err());

        let mut v = civic();
        v.year = i64::from(FIRST_MODEL_YEAR);
        assert!(v.normalize().is_ok());

        let mut v = civic();
        v.year = i64::from(Utc::now().year()) + 2;
        assert!(v.normalize().is_err());
    }

    #[test]
    fn test_year_outside_u16_rejected() {
        for year in [70_000, -1, i64::MAX] {
            let mut v = civic();
            v.year = year;
            assert!(
                matches!(v.normalize(), Err(StoreError::Invalid(_))),
                "year {}",
                year
            );
        }
        assert!(model_year(65_536).is_err());
    }

    #[test]
    fn test_vin_rules() {
        assert_eq!(normalize_vin("").unwrap(), None);
        assert!(normalize_vin("SHORT").is_err());
        // 'O' is not allowed
        assert!(normalize_vin("2HGFC2F59KH12345O").is_err());
        assert!(normalize_vin("2HGFC2F59KH12345-").is_err());
        assert_eq!(
            normalize_vin(" wf0xxxgcdx1234567 ").unwrap().as_deref(),
            Some("WF0XXXGCDX1234567")
        );
    }

    #[test]
    fn test_update_apply() {
        let now = Utc::now();
        let mut vehicle = Vehicle {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            year: 2019,
            vin: None,
            nickname: Some("Blue".to_string()),
            created_at: now,
            updated_at: now,
        };

        let update = VehicleUpdate {
            year: Some(2020),
            nickname: Some(String::new()),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        update.apply(&mut vehicle).unwrap();

        assert_eq!(vehicle.year, 2020);
        assert_eq!(vehicle.model, "Civic");
        assert_eq!(vehicle.nickname, None);
    }

    #[test]
    fn test_update_with_bad_year_changes_nothing() {
        let now = Utc::now();
        let mut vehicle = Vehicle {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            year: 2019,
            vin: None,
            nickname: None,
            created_at: now,
            updated_at: now,
        };
        let update = VehicleUpdate {
            make: Some("Acura".to_string()),
            year: Some(70_000),
            ..Default::default()
        };
        assert!(update.apply(&mut vehicle).is_err());
        assert_eq!(vehicle.make, "Honda");
        assert_eq!(vehicle.year, 2019);
    }
}
