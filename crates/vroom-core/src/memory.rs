//! In-memory implementation of [`VroomStore`]
//!
//! All tables live behind one lock so that cascades (deleting a vehicle
//! together with its scans) are atomic. Locks are never held across an
//! `.await`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    model_year, normalize_email, NewScan, NewUser, NewVehicle, Scan, User, UserCredentials,
    Vehicle, VehicleUpdate,
};
use crate::store::VroomStore;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, UserCredentials>,
    /// Normalized email → user id
    emails: HashMap<String, Uuid>,
    vehicles: HashMap<Uuid, Vehicle>,
    scans: HashMap<Uuid, Scan>,
}

impl Tables {
    fn owned_vehicle(&self, owner_id: Uuid, vehicle_id: Uuid) -> StoreResult<&Vehicle> {
        self.vehicles
            .get(&vehicle_id)
            .filter(|v| v.owner_id == owner_id)
            .ok_or_else(|| StoreError::VehicleNotFound(vehicle_id.to_string()))
    }

    fn vin_taken(&self, owner_id: Uuid, vin: &str, except: Option<Uuid>) -> bool {
        self.vehicles.values().any(|v| {
            v.owner_id == owner_id && v.vin.as_deref() == Some(vin) && Some(v.id) != except
        })
    }
}

/// Process-local store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VroomStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let email = normalize_email(&new.email);
        let mut tables = self.tables.write();
        if tables.emails.contains_key(&email) {
            return Err(StoreError::Conflict(format!(
                "An account with email {} already exists",
                email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            name: new.name,
            created_at: Utc::now(),
        };
        tables.emails.insert(email, user.id);
        tables.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(user)
    }

    async fn user_credentials_by_email(
        &self,
        email: &str,
    ) -> StoreResult<Option<UserCredentials>> {
        let tables = self.tables.read();
        Ok(tables
            .emails
            .get(&normalize_email(email))
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn get_user(&self, user_id: Uuid) -> StoreResult<User> {
        self.tables
            .read()
            .users
            .get(&user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
    }

    async fn create_vehicle(&self, owner_id: Uuid, new: NewVehicle) -> StoreResult<Vehicle> {
        let mut tables = self.tables.write();
        if let Some(vin) = new.vin.as_deref() {
            if tables.vin_taken(owner_id, vin, None) {
                return Err(StoreError::Conflict(format!(
                    "A vehicle with VIN {} is already registered",
                    vin
                )));
            }
        }

        let year = model_year(new.year)?;
        let now = Utc::now();
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            owner_id,
            make: new.make,
            model: new.model,
            year,
            vin: new.vin,
            nickname: new.nickname,
            created_at: now,
            updated_at: now,
        };
        tables.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn list_vehicles(&self, owner_id: Uuid) -> StoreResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .tables
            .read()
            .vehicles
            .values()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect();
        vehicles.sort_by_key(|v| (v.created_at, v.id));
        Ok(vehicles)
    }

    async fn get_vehicle(&self, owner_id: Uuid, vehicle_id: Uuid) -> StoreResult<Vehicle> {
        self.tables
            .read()
            .owned_vehicle(owner_id, vehicle_id)
            .cloned()
    }

    async fn update_vehicle(
        &self,
        owner_id: Uuid,
        vehicle_id: Uuid,
        update: VehicleUpdate,
    ) -> StoreResult<Vehicle> {
        let mut tables = self.tables.write();
        tables.owned_vehicle(owner_id, vehicle_id)?;
        if let Some(vin) = update.vin.as_deref() {
            if tables.vin_taken(owner_id, vin, Some(vehicle_id)) {
                return Err(StoreError::Conflict(format!(
                    "A vehicle with VIN {} is already registered",
                    vin
                )));
            }
        }

        let vehicle = tables
            .vehicles
            .get_mut(&vehicle_id)
            .ok_or_else(|| StoreError::VehicleNotFound(vehicle_id.to_string()))?;
        update.apply(vehicle)?;
        vehicle.updated_at = Utc::now();
        Ok(vehicle.clone())
    }

    async fn delete_vehicle(&self, owner_id: Uuid, vehicle_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write();
        tables.owned_vehicle(owner_id, vehicle_id)?;
        tables.vehicles.remove(&vehicle_id);
        tables.scans.retain(|_, scan| scan.vehicle_id != vehicle_id);
        Ok(())
    }

    async fn create_scan(&self, owner_id: Uuid, new: NewScan) -> StoreResult<Scan> {
        let mut tables = self.tables.write();
        tables.owned_vehicle(owner_id, new.vehicle_id)?;
        let scan = Scan::new(owner_id, new);
        tables.scans.insert(scan.id, scan.clone());
        Ok(scan)
    }

    async fn list_scans(
        &self,
        owner_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> StoreResult<Vec<Scan>> {
        let tables = self.tables.read();
        if let Some(vehicle_id) = vehicle_id {
            tables.owned_vehicle(owner_id, vehicle_id)?;
        }

        let mut scans: Vec<Scan> = tables
            .scans
            .values()
            .filter(|s| s.owner_id == owner_id)
            .filter(|s| vehicle_id.map_or(true, |id| s.vehicle_id == id))
            .cloned()
            .collect();
        scans.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(scans)
    }

    async fn get_scan(&self, owner_id: Uuid, scan_id: Uuid) -> StoreResult<Scan> {
        self.tables
            .read()
            .scans
            .get(&scan_id)
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| StoreError::ScanNotFound(scan_id.to_string()))
    }

    async fn delete_scan(&self, owner_id: Uuid, scan_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let owned = tables
            .scans
            .get(&scan_id)
            .is_some_and(|s| s.owner_id == owner_id);
        if !owned {
            return Err(StoreError::ScanNotFound(scan_id.to_string()));
        }
        tables.scans.remove(&scan_id);
        Ok(())
    }
}
