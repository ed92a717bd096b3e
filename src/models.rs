use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::store::ClinicStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClinicStore>,
}

impl AppState {
    pub fn new<S: ClinicStore>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/* -------------------------
   API DTOs
--------------------------*/

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub usuario: String,
    pub clave: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub nombre: String,
    pub documento: String,
    pub telefono: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDoctor {
    pub nombre: String,
    pub especialidad: String,
    /// Stored as medicos.disponibilidad.
    #[serde(alias = "disponibilidad", deserialize_with = "availability::deserialize")]
    pub estado: bool,
}

#[derive(Debug, Serialize)]
pub struct DoctorCreated {
    pub id: i64,
    pub nombre: String,
    pub especialidad: String,
    pub estado: bool,
}

#[derive(Debug, Deserialize)]
pub struct DoctorFilter {
    pub especialidad: Option<String>,
}

/// A bookable position: one doctor at one date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct Slot {
    #[serde(deserialize_with = "lenient_id::deserialize")]
    pub medico_id: i64,
    pub fecha: NaiveDate,
    #[serde(with = "hhmm")]
    pub hora: NaiveTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    #[serde(deserialize_with = "lenient_id::deserialize")]
    pub paciente_id: i64,
    #[serde(deserialize_with = "lenient_id::deserialize")]
    pub medico_id: i64,
    pub fecha: NaiveDate,
    #[serde(with = "hhmm")]
    pub hora: NaiveTime,
}

impl BookAppointmentRequest {
    pub fn slot(&self) -> Slot {
        Slot {
            medico_id: self.medico_id,
            fecha: self.fecha,
            hora: self.hora,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookedAppointment {
    pub id: i64,
    pub paciente_id: i64,
    pub medico_id: i64,
    pub fecha: NaiveDate,
    #[serde(with = "hhmm")]
    pub hora: NaiveTime,
    pub paciente: String,
    pub medico: String,
    pub especialidad: String,
}

#[derive(Debug, Serialize)]
pub struct BookAppointmentResponse {
    pub success: bool,
    pub message: String,
    pub appointment: BookedAppointment,
}

#[derive(Debug, Serialize)]
pub struct SlotStatus {
    pub ocupada: bool,
}

/* -------------------------
   DB Row Models
--------------------------*/

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PatientRow {
    pub id: i64,
    pub nombre: String,
    pub documento: String,
    pub telefono: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DoctorRow {
    pub id: i64,
    pub nombre: String,
    pub especialidad: String,
    pub disponibilidad: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SpecialityRow {
    pub id: i64,
    pub nombre: String,
}

/// Result of a speciality get-or-create.
#[derive(Debug, Clone, Copy)]
pub struct SpecialityId {
    pub id: i64,
    pub created: bool,
}

/// Display fields of a doctor used when composing a booking.
#[derive(Debug, Clone, FromRow)]
pub struct DoctorLabel {
    pub nombre: String,
    pub especialidad: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AppointmentListRow {
    pub id: i64,
    pub fecha: NaiveDate,
    #[serde(with = "hhmm")]
    pub hora: NaiveTime,
    pub paciente: String,
    pub medico: String,
    pub especialidad: String,
}

/* -------------------------
   Helpers
--------------------------*/

/// Times travel as "HH:MM" (seconds accepted on input, dropped on output when zero).
pub mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
    }

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        let fmt = if t.second() == 0 && t.nanosecond() == 0 {
            "%H:%M"
        } else {
            "%H:%M:%S"
        };
        s.collect_str(&t.format(fmt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(|e| de::Error::custom(format!("invalid hora {raw:?}: {e}")))
    }
}

/// Ids come from HTML forms as often as from typed clients: accept 7 or "7".
pub mod lenient_id {
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match RawId::deserialize(d)? {
            RawId::Int(n) => Ok(n),
            RawId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid id {s:?}"))),
        }
    }
}

/// Availability arrives as a boolean or as a status word from the frontend.
pub mod availability {
    use serde::{Deserialize, Deserializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAvailability {
        Flag(bool),
        Number(i64),
        Text(String),
    }

    pub fn parse(raw: &str) -> Option<bool> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "disponible" | "activo" => Some(true),
            "false" | "0" | "no disponible" | "inactivo" => Some(false),
            _ => None,
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match RawAvailability::deserialize(d)? {
            RawAvailability::Flag(b) => Ok(b),
            RawAvailability::Number(n) => Ok(n != 0),
            RawAvailability::Text(s) => {
                parse(&s).ok_or_else(|| de::Error::custom(format!("invalid estado {s:?}")))
            }
        }
    }
}
