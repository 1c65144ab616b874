//! Scan models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::obd::{Reading, ScanReport, TroubleCode};

/// A stored diagnostic scan of one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub readings: Vec<Reading>,
    pub trouble_codes: Vec<TroubleCode>,
    pub statuses: Vec<String>,
    pub unrecognized: Vec<String>,
    /// Last value seen per reading key
    pub latest: BTreeMap<String, f64>,
}

/// Data required to store a scan
#[derive(Debug, Clone)]
pub struct NewScan {
    pub vehicle_id: Uuid,
    pub notes: Option<String>,
    pub report: ScanReport,
}

/// Compact view of a scan for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub reading_count: usize,
    pub trouble_code_count: usize,
}

impl Scan {
    /// Build a scan owned by `owner_id` from decoded adapter output
    pub fn new(owner_id: Uuid, new: NewScan) -> Self {
        let ScanReport {
            readings,
            trouble_codes,
            statuses,
            unrecognized,
            latest,
        } = new.report;

        Self {
            id: Uuid::new_v4(),
            vehicle_id: new.vehicle_id,
            owner_id,
            created_at: Utc::now(),
            notes: new.notes,
            readings,
            trouble_codes,
            statuses,
            unrecognized,
            latest,
        }
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            id: self.id,
            vehicle_id: self.vehicle_id,
            created_at: self.created_at,
            reading_count: self.readings.len(),
            trouble_code_count: self.trouble_codes.len(),
        }
    }
}
