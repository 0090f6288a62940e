//! Physical location of a report
use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, FormData};

/// Keys the location occupies in the flat `form_data` mapping.
pub const LOCATION_KEYS: [&str; 6] = [
    "pabellon_id",
    "pabellon_nombre",
    "pabellon_descripcion",
    "salon_id",
    "salon_nombre",
    "salon_capacidad",
];

/// Building (`pabellones` row).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pabellon {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// Room (`salones` row).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salon {
    pub id: i64,
    pub pabellon_id: i64,
    pub nombre: String,
    #[serde(default)]
    pub capacidad: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLocation {
    pub pabellon: Pabellon,
    pub salon: Salon,
}

impl SelectedLocation {
    pub fn new(pabellon: Pabellon, salon: Salon) -> Self {
        Self { pabellon, salon }
    }

    pub fn is_consistent(&self) -> bool {
        self.salon.pabellon_id == self.pabellon.id
    }

    /// Write the six location keys into `data`, overwriting same-named keys.
    /// Missing text is stored as `""` and a missing capacity as `0`.
    pub fn merge_into(&self, data: &mut FormData) {
        let entries: [(&str, FieldValue); 6] = [
            (LOCATION_KEYS[0], self.pabellon.id.into()),
            (LOCATION_KEYS[1], self.pabellon.nombre.clone().into()),
            (LOCATION_KEYS[2], self.pabellon.descripcion.clone().unwrap_or_default().into()),
            (LOCATION_KEYS[3], self.salon.id.into()),
            (LOCATION_KEYS[4], self.salon.nombre.clone().into()),
            (LOCATION_KEYS[5], self.salon.capacidad.unwrap_or(0).into()),
        ];
        for (key, value) in entries {
            data.insert(key, value);
        }
    }
}
