// src/booking.rs
//
// Speciality get-or-create, doctor registration, the slot check and
// appointment booking. Everything here goes through `ClinicStore`.

use crate::models::{BookAppointmentRequest, BookedAppointment, DoctorCreated, NewDoctor, Slot};
use crate::store::{ClinicStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("slot already booked")]
    SlotTaken,
    #[error("patient or doctor not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub async fn ensure_speciality(store: &dyn ClinicStore, nombre: &str) -> Result<i64, StoreError> {
    let speciality = store.ensure_speciality(nombre).await?;
    if speciality.created {
        tracing::info!(speciality_id = speciality.id, nombre, "speciality created");
    }
    Ok(speciality.id)
}

/// The doctor keeps the speciality *name*, not its id; `especialidades` is
/// only a registry of known names. A failed doctor insert leaves the
/// speciality row in place.
pub async fn register_doctor(
    store: &dyn ClinicStore,
    doctor: NewDoctor,
) -> Result<DoctorCreated, StoreError> {
    ensure_speciality(store, &doctor.especialidad).await?;

    let id = store
        .insert_doctor(&doctor.nombre, &doctor.especialidad, doctor.estado)
        .await?;

    Ok(DoctorCreated {
        id,
        nombre: doctor.nombre,
        especialidad: doctor.especialidad,
        estado: doctor.estado,
    })
}

/// Exact match on all three fields; appointments are points in time.
pub async fn is_slot_taken(store: &dyn ClinicStore, slot: &Slot) -> Result<bool, StoreError> {
    Ok(store.count_slot(slot).await? > 0)
}

pub async fn book_appointment(
    store: &dyn ClinicStore,
    req: BookAppointmentRequest,
) -> Result<BookedAppointment, BookingError> {
    let slot = req.slot();

    // 1) Unknown patient/doctor wins over a busy slot
    let paciente = store.patient_name(req.paciente_id).await?;
    let medico = store.doctor_label(req.medico_id).await?;
    let (Some(paciente), Some(medico)) = (paciente, medico) else {
        return Err(BookingError::NotFound);
    };

    // 2) Cheap rejection before writing
    if is_slot_taken(store, &slot).await? {
        return Err(BookingError::SlotTaken);
    }

    // 3) Conditional insert; None means a concurrent booking got there first
    let Some(id) = store.insert_appointment(req.paciente_id, &slot).await? else {
        tracing::warn!(
            medico_id = slot.medico_id,
            fecha = %slot.fecha,
            hora = %slot.hora,
            "slot taken between check and insert"
        );
        return Err(BookingError::SlotTaken);
    };

    Ok(BookedAppointment {
        id,
        paciente_id: req.paciente_id,
        medico_id: req.medico_id,
        fecha: slot.fecha,
        hora: slot.hora,
        paciente,
        medico: medico.nombre,
        especialidad: medico.especialidad,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::models::NewPatient;
    use crate::store::memory::MemoryStore;

    fn doctor(nombre: &str, especialidad: &str) -> NewDoctor {
        NewDoctor {
            nombre: nombre.into(),
            especialidad: especialidad.into(),
            estado: true,
        }
    }

    fn request(paciente_id: i64, medico_id: i64, day: u32, hour: u32) -> BookAppointmentRequest {
        BookAppointmentRequest {
            paciente_id,
            medico_id,
            fecha: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            hora: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_patient(&NewPatient {
                nombre: "Ana".into(),
                documento: "111".into(),
                telefono: "555".into(),
            })
            .await
            .unwrap();
        register_doctor(&store, doctor("Dr. Lee", "Cardiology")).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_new_speciality_created_once() {
        let store = MemoryStore::new();
        let created = register_doctor(&store, doctor("Dr. Lee", "Cardiology")).await.unwrap();
        assert_eq!(created.especialidad, "Cardiology");
        assert_eq!(store.speciality_count(), 1);

        register_doctor(&store, doctor("Dr. Kim", "Cardiology")).await.unwrap();
        assert_eq!(store.speciality_count(), 1);

        // exact, case-sensitive match
        register_doctor(&store, doctor("Dr. Roe", "cardiology")).await.unwrap();
        assert_eq!(store.speciality_count(), 2);
    }

    #[tokio::test]
    async fn test_doctor_keeps_speciality_label() {
        let store = MemoryStore::new();
        register_doctor(&store, doctor("Dr. Lee", "  Neuro ")).await.unwrap();
        let doctors = store.list_doctors(None).await.unwrap();
        assert_eq!(doctors[0].especialidad, "  Neuro ");
    }

    #[tokio::test]
    async fn test_free_slot_books() {
        let store = seeded().await;
        let req = request(1, 1, 1, 9);
        assert!(!is_slot_taken(&store, &req.slot()).await.unwrap());

        let booked = book_appointment(&store, req.clone()).await.unwrap();
        assert_eq!(booked.id, 1);
        assert_eq!(booked.paciente, "Ana");
        assert_eq!(booked.medico, "Dr. Lee");
        assert_eq!(booked.especialidad, "Cardiology");
        assert!(is_slot_taken(&store, &req.slot()).await.unwrap());
    }

    #[tokio::test]
    async fn test_taken_slot_rejected_without_insert() {
        let store = seeded().await;
        book_appointment(&store, request(1, 1, 1, 9)).await.unwrap();

        let err = book_appointment(&store, request(1, 1, 1, 9)).await.unwrap_err();
        assert!(matches!(err, BookingError::SlotTaken));
        assert_eq!(store.appointment_count(), 1);

        // different hour is a different slot
        book_appointment(&store, request(1, 1, 1, 10)).await.unwrap();
        assert_eq!(store.appointment_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_patient_or_doctor_is_not_found() {
        let store = seeded().await;
        book_appointment(&store, request(1, 1, 1, 9)).await.unwrap();

        // even on the already-booked slot
        let err = book_appointment(&store, request(99, 1, 1, 9)).await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound));

        let err = book_appointment(&store, request(1, 42, 2, 9)).await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound));
        assert_eq!(store.appointment_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_bookings_never_double_book() {
        let store: Arc<dyn ClinicStore> = Arc::new(seeded().await);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                book_appointment(store.as_ref(), request(1, 1, 3, 11)).await
            }));
        }

        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(BookingError::SlotTaken) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(store.count_slot(&request(1, 1, 3, 11).slot()).await.unwrap(), 1);
    }
}
