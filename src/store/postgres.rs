// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{
    AppointmentListRow, DoctorLabel, DoctorRow, NewPatient, PatientRow, Slot, SpecialityId,
    SpecialityRow,
};
use crate::store::{ClinicStore, StoreResult};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn speciality_id(&self, nombre: &str) -> StoreResult<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id
            FROM especialidades
            WHERE nombre = $1
            "#,
        )
        .bind(nombre)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }
}

#[async_trait]
impl ClinicStore for PgStore {
    async fn credential_hash(&self, usuario: &str) -> StoreResult<Option<String>> {
        let hash: Option<String> = sqlx::query_scalar(
            r#"
            SELECT clave_hash
            FROM usuarios
            WHERE usuario = $1
            "#,
        )
        .bind(usuario)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn insert_patient(&self, patient: &NewPatient) -> StoreResult<PatientRow> {
        let row: PatientRow = sqlx::query_as::<_, PatientRow>(
            r#"
            INSERT INTO pacientes (nombre, documento, telefono)
            VALUES ($1, $2, $3)
            RETURNING id, nombre, documento, telefono
            "#,
        )
        .bind(&patient.nombre)
        .bind(&patient.documento)
        .bind(&patient.telefono)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_patients(&self) -> StoreResult<Vec<PatientRow>> {
        let rows: Vec<PatientRow> = sqlx::query_as::<_, PatientRow>(
            r#"
            SELECT id, nombre, documento, telefono
            FROM pacientes
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn patient_name(&self, patient_id: i64) -> StoreResult<Option<String>> {
        let nombre: Option<String> = sqlx::query_scalar(
            r#"
            SELECT nombre
            FROM pacientes
            WHERE id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(nombre)
    }

    async fn ensure_speciality(&self, nombre: &str) -> StoreResult<SpecialityId> {
        // Existing names are a plain read: no row lock, no sequence value spent
        if let Some(id) = self.speciality_id(nombre).await? {
            return Ok(SpecialityId { id, created: false });
        }

        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO especialidades (nombre)
            VALUES ($1)
            ON CONFLICT (nombre) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(nombre)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(id) = inserted {
            return Ok(SpecialityId { id, created: true });
        }

        // A concurrent registration inserted the same name first
        let id = self
            .speciality_id(nombre)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(SpecialityId { id, created: false })
    }

    async fn list_specialities(&self) -> StoreResult<Vec<SpecialityRow>> {
        let rows: Vec<SpecialityRow> = sqlx::query_as::<_, SpecialityRow>(
            r#"
            SELECT id, nombre
            FROM especialidades
            ORDER BY nombre ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert_doctor(
        &self,
        nombre: &str,
        especialidad: &str,
        disponibilidad: bool,
    ) -> StoreResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO medicos (nombre, especialidad, disponibilidad)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(nombre)
        .bind(especialidad)
        .bind(disponibilidad)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_doctors(&self, especialidad: Option<&str>) -> StoreResult<Vec<DoctorRow>> {
        let rows: Vec<DoctorRow> = match especialidad {
            Some(esp) => {
                sqlx::query_as::<_, DoctorRow>(
                    r#"
                    SELECT id, nombre, especialidad, disponibilidad
                    FROM medicos
                    WHERE especialidad = $1
                    ORDER BY id ASC
                    "#,
                )
                .bind(esp)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DoctorRow>(
                    r#"
                    SELECT id, nombre, especialidad, disponibilidad
                    FROM medicos
                    ORDER BY id ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    async fn doctor_label(&self, doctor_id: i64) -> StoreResult<Option<DoctorLabel>> {
        let row: Option<DoctorLabel> = sqlx::query_as::<_, DoctorLabel>(
            r#"
            SELECT nombre, especialidad
            FROM medicos
            WHERE id = $1
            "#,
        )
        .bind(doctor_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count_slot(&self, slot: &Slot) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM citas
            WHERE medico_id = $1
              AND fecha = $2
              AND hora = $3
            "#,
        )
        .bind(slot.medico_id)
        .bind(slot.fecha)
        .bind(slot.hora)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn insert_appointment(&self, patient_id: i64, slot: &Slot) -> StoreResult<Option<i64>> {
        // citas_slot_key makes the slot check and the write one atomic step
        let id: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO citas (paciente_id, medico_id, fecha, hora)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (medico_id, fecha, hora) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(patient_id)
        .bind(slot.medico_id)
        .bind(slot.fecha)
        .bind(slot.hora)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_appointments(&self) -> StoreResult<Vec<AppointmentListRow>> {
        let rows: Vec<AppointmentListRow> = sqlx::query_as::<_, AppointmentListRow>(
            r#"
            SELECT
              c.id,
              c.fecha,
              c.hora,
              p.nombre AS paciente,
              m.nombre AS medico,
              m.especialidad AS especialidad
            FROM citas c
            JOIN pacientes p ON p.id = c.paciente_id
            JOIN medicos m ON m.id = c.medico_id
            ORDER BY c.fecha DESC, c.hora DESC, c.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
