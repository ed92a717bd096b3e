// src/store/memory.rs
//
// In-process ClinicStore used by the test suite. One mutex guards every
// table, so each trait call is atomic the same way the SQL statements are.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{
    AppointmentListRow, DoctorLabel, DoctorRow, NewPatient, PatientRow, Slot, SpecialityId,
    SpecialityRow,
};
use crate::store::{ClinicStore, StoreResult};

#[derive(Debug, Clone)]
struct AppointmentRecord {
    id: i64,
    paciente_id: i64,
    slot: Slot,
}

#[derive(Default)]
struct Tables {
    users: Vec<(String, String)>,
    patients: Vec<PatientRow>,
    doctors: Vec<DoctorRow>,
    specialities: Vec<SpecialityRow>,
    appointments: Vec<AppointmentRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, usuario: &str, clave_hash: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .users
            .push((usuario.to_string(), clave_hash.to_string()));
        self
    }

    pub fn speciality_count(&self) -> usize {
        self.tables.lock().unwrap().specialities.len()
    }

    pub fn appointment_count(&self) -> usize {
        self.tables.lock().unwrap().appointments.len()
    }
}

// ids start at 1 like BIGSERIAL
fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn credential_hash(&self, usuario: &str) -> StoreResult<Option<String>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users
            .iter()
            .find(|(u, _)| u == usuario)
            .map(|(_, h)| h.clone()))
    }

    async fn insert_patient(&self, patient: &NewPatient) -> StoreResult<PatientRow> {
        let mut t = self.tables.lock().unwrap();
        let row = PatientRow {
            id: next_id(t.patients.len()),
            nombre: patient.nombre.clone(),
            documento: patient.documento.clone(),
            telefono: patient.telefono.clone(),
        };
        t.patients.push(row.clone());
        Ok(row)
    }

    async fn list_patients(&self) -> StoreResult<Vec<PatientRow>> {
        Ok(self.tables.lock().unwrap().patients.clone())
    }

    async fn patient_name(&self, patient_id: i64) -> StoreResult<Option<String>> {
        let t = self.tables.lock().unwrap();
        Ok(t.patients
            .iter()
            .find(|p| p.id == patient_id)
            .map(|p| p.nombre.clone()))
    }

    async fn ensure_speciality(&self, nombre: &str) -> StoreResult<SpecialityId> {
        let mut t = self.tables.lock().unwrap();
        if let Some(existing) = t.specialities.iter().find(|s| s.nombre == nombre) {
            return Ok(SpecialityId {
                id: existing.id,
                created: false,
            });
        }
        let id = next_id(t.specialities.len());
        t.specialities.push(SpecialityRow {
            id,
            nombre: nombre.to_string(),
        });
        Ok(SpecialityId { id, created: true })
    }

    async fn list_specialities(&self) -> StoreResult<Vec<SpecialityRow>> {
        let mut rows = self.tables.lock().unwrap().specialities.clone();
        rows.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        Ok(rows)
    }

    async fn insert_doctor(
        &self,
        nombre: &str,
        especialidad: &str,
        disponibilidad: bool,
    ) -> StoreResult<i64> {
        let mut t = self.tables.lock().unwrap();
        let id = next_id(t.doctors.len());
        t.doctors.push(DoctorRow {
            id,
            nombre: nombre.to_string(),
            especialidad: especialidad.to_string(),
            disponibilidad,
        });
        Ok(id)
    }

    async fn list_doctors(&self, especialidad: Option<&str>) -> StoreResult<Vec<DoctorRow>> {
        let t = self.tables.lock().unwrap();
        Ok(t.doctors
            .iter()
            .filter(|d| especialidad.is_none_or(|esp| d.especialidad == esp))
            .cloned()
            .collect())
    }

    async fn doctor_label(&self, doctor_id: i64) -> StoreResult<Option<DoctorLabel>> {
        let t = self.tables.lock().unwrap();
        Ok(t.doctors.iter().find(|d| d.id == doctor_id).map(|d| DoctorLabel {
            nombre: d.nombre.clone(),
            especialidad: d.especialidad.clone(),
        }))
    }

    async fn count_slot(&self, slot: &Slot) -> StoreResult<i64> {
        let t = self.tables.lock().unwrap();
        Ok(t.appointments.iter().filter(|a| a.slot == *slot).count() as i64)
    }

    async fn insert_appointment(&self, patient_id: i64, slot: &Slot) -> StoreResult<Option<i64>> {
        let mut t = self.tables.lock().unwrap();
        if t.appointments.iter().any(|a| a.slot == *slot) {
            return Ok(None);
        }
        let id = next_id(t.appointments.len());
        t.appointments.push(AppointmentRecord {
            id,
            paciente_id: patient_id,
            slot: *slot,
        });
        Ok(Some(id))
    }

    async fn list_appointments(&self) -> StoreResult<Vec<AppointmentListRow>> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<AppointmentListRow> = t
            .appointments
            .iter()
            .filter_map(|a| {
                let p = t.patients.iter().find(|p| p.id == a.paciente_id)?;
                let d = t.doctors.iter().find(|d| d.id == a.slot.medico_id)?;
                Some(AppointmentListRow {
                    id: a.id,
                    fecha: a.slot.fecha,
                    hora: a.slot.hora,
                    paciente: p.nombre.clone(),
                    medico: d.nombre.clone(),
                    especialidad: d.especialidad.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.fecha
                .cmp(&a.fecha)
                .then(b.hora.cmp(&a.hora))
                .then(b.id.cmp(&a.id))
        });
        Ok(rows)
    }
}
