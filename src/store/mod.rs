// src/store/mod.rs

use async_trait::async_trait;

use crate::models::{
    AppointmentListRow, DoctorLabel, DoctorRow, NewPatient, PatientRow, Slot, SpecialityId,
    SpecialityRow,
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage gateway. Handlers only ever see this trait, through `AppState`.
///
/// The two writes that race in a naive check-then-insert
/// (`ensure_speciality`, `insert_appointment`) must be single conditional
/// writes backed by a uniqueness guarantee.
#[async_trait]
pub trait ClinicStore: Send + Sync + 'static {
    /// Argon2 PHC string for `usuario`, if the user exists.
    async fn credential_hash(&self, usuario: &str) -> StoreResult<Option<String>>;

    async fn insert_patient(&self, patient: &NewPatient) -> StoreResult<PatientRow>;
    async fn list_patients(&self) -> StoreResult<Vec<PatientRow>>;
    async fn patient_name(&self, patient_id: i64) -> StoreResult<Option<String>>;

    /// Get-or-create by exact name. `created` tells whether this call wrote the row.
    async fn ensure_speciality(&self, nombre: &str) -> StoreResult<SpecialityId>;
    async fn list_specialities(&self) -> StoreResult<Vec<SpecialityRow>>;

    async fn insert_doctor(
        &self,
        nombre: &str,
        especialidad: &str,
        disponibilidad: bool,
    ) -> StoreResult<i64>;
    async fn list_doctors(&self, especialidad: Option<&str>) -> StoreResult<Vec<DoctorRow>>;
    async fn doctor_label(&self, doctor_id: i64) -> StoreResult<Option<DoctorLabel>>;

    async fn count_slot(&self, slot: &Slot) -> StoreResult<i64>;
    /// Inserts unless the slot is already booked. `None` means the slot was taken.
    async fn insert_appointment(&self, patient_id: i64, slot: &Slot) -> StoreResult<Option<i64>>;
    async fn list_appointments(&self) -> StoreResult<Vec<AppointmentListRow>>;
}
