//! VroomStore trait - the storage abstraction behind the HTTP handlers
//!
//! Every vehicle and scan operation takes the owner's id. Implementations
//! must treat a resource owned by someone else exactly like a missing one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{
    NewScan, NewUser, NewVehicle, Scan, User, UserCredentials, Vehicle, VehicleUpdate,
};

#[async_trait]
pub trait VroomStore: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Register a user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;

    /// Look up a user and their password hash by (normalized) email
    async fn user_credentials_by_email(&self, email: &str)
        -> StoreResult<Option<UserCredentials>>;

    async fn get_user(&self, user_id: Uuid) -> StoreResult<User>;

    // =========================================================================
    // Vehicles
    // =========================================================================

    /// Register a vehicle. Fails with `Conflict` if the owner already has
    /// a vehicle with the same VIN.
    async fn create_vehicle(&self, owner_id: Uuid, new: NewVehicle) -> StoreResult<Vehicle>;

    /// List the owner's vehicles, oldest first
    async fn list_vehicles(&self, owner_id: Uuid) -> StoreResult<Vec<Vehicle>>;

    async fn get_vehicle(&self, owner_id: Uuid, vehicle_id: Uuid) -> StoreResult<Vehicle>;

    async fn update_vehicle(
        &self,
        owner_id: Uuid,
        vehicle_id: Uuid,
        update: VehicleUpdate,
    ) -> StoreResult<Vehicle>;

    /// Delete a vehicle and all of its scans
    async fn delete_vehicle(&self, owner_id: Uuid, vehicle_id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Scans
    // =========================================================================

    /// Store a scan. Fails with `VehicleNotFound` unless the vehicle
    /// belongs to the owner.
    async fn create_scan(&self, owner_id: Uuid, new: NewScan) -> StoreResult<Scan>;

    /// List the owner's scans, newest first, optionally for one vehicle
    async fn list_scans(&self, owner_id: Uuid, vehicle_id: Option<Uuid>)
        -> StoreResult<Vec<Scan>>;

    async fn get_scan(&self, owner_id: Uuid, scan_id: Uuid) -> StoreResult<Scan>;

    async fn delete_scan(&self, owner_id: Uuid, scan_id: Uuid) -> StoreResult<()>;
}
