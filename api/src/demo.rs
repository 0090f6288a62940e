//! Demo catalog for the in-memory backend

use reporta_store::{InMemoryStore, Row};
use serde_json::{json, Value};

use crate::services::tables;

fn rows(values: Value) -> Vec<Row> {
    match values {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Seed areas, forms, locations, students and operators.
///
/// Operators: `admin`/`admin123` (admin), `mantenimiento`/`mant123`
/// (area 1), `ti`/`ti123` (area 2).
pub fn seed(store: &InMemoryStore) {
    store.seed(tables::AREAS, rows(json!([
        {"id": 1, "nombre": "Mantenimiento", "descripcion": "Infraestructura, electricidad y mobiliario", "image_url": null},
        {"id": 2, "nombre": "Tecnologías de la Información", "descripcion": "Equipos y conectividad", "image_url": null},
        {"id": 3, "nombre": "Limpieza", "descripcion": null, "image_url": null},
    ])));

    store.seed(tables::AREA_FIELDS, rows(json!([
        {"id": 1, "area_id": 1, "field_name": "tipo_incidencia", "field_type": "select", "field_label": "Tipo de incidencia",
         "is_required": true, "options": "tipos_mantenimiento", "placeholder": null, "order_index": 1},
        {"id": 2, "area_id": 1, "field_name": "descripcion", "field_type": "textarea", "field_label": "Descripción",
         "is_required": true, "options": null, "placeholder": "Describe el problema", "order_index": 2},
        {"id": 3, "area_id": 1, "field_name": "fecha", "field_type": "date", "field_label": "Fecha del incidente",
         "is_required": false, "options": null, "placeholder": null, "order_index": 3},
        {"id": 4, "area_id": 1, "field_name": "foto", "field_type": "image", "field_label": "Foto",
         "is_required": false, "options": null, "placeholder": null, "order_index": 4},
        {"id": 5, "area_id": 2, "field_name": "equipo", "field_type": "select", "field_label": "Equipo",
         "is_required": true, "options": "[\"Proyector\",\"Computadora\",\"Impresora\",\"otros\"]", "placeholder": null, "order_index": 1},
        {"id": 6, "area_id": 2, "field_name": "detalle", "field_type": "textarea", "field_label": "Detalle",
         "is_required": true, "options": null, "placeholder": null, "order_index": 2},
        {"id": 7, "area_id": 2, "field_name": "evidencia", "field_type": "file", "field_label": "Evidencia",
         "is_required": false, "options": null, "placeholder": null, "order_index": 3},
        {"id": 8, "area_id": 3, "field_name": "descripcion", "field_type": "textarea", "field_label": "Descripción",
         "is_required": true, "options": null, "placeholder": null, "order_index": 1},
    ])));

    store.seed(tables::SELECTION_OPTIONS, rows(json!([
        {"id": 1, "area_id": 1, "group_name": "tipos_mantenimiento", "option_value": "electrico", "option_label": "Eléctrico", "order_index": 0},
        {"id": 2, "area_id": 1, "group_name": "tipos_mantenimiento", "option_value": "sanitario", "option_label": "Sanitario", "order_index": 1},
        {"id": 3, "area_id": 1, "group_name": "tipos_mantenimiento", "option_value": "mobiliario", "option_label": "Mobiliario", "order_index": 2},
        {"id": 4, "area_id": 1, "group_name": "tipos_mantenimiento", "option_value": "otros", "option_label": "Otros", "order_index": 3},
    ])));

    store.seed(tables::PABELLONES, rows(json!([
        {"id": 1, "nombre": "Pabellón A", "descripcion": "Facultad de Ingeniería"},
        {"id": 2, "nombre": "Pabellón B", "descripcion": null},
    ])));

    store.seed(tables::SALONES, rows(json!([
        {"id": 101, "pabellon_id": 1, "nombre": "A-101", "capacidad": 40},
        {"id": 102, "pabellon_id": 1, "nombre": "A-102", "capacidad": 35},
        {"id": 201, "pabellon_id": 2, "nombre": "B-201", "capacidad": null},
    ])));

    store.seed(tables::ALUMNOS, rows(json!([
        {"id": 1, "dni": "12345678", "codigo": "U20201234", "nombre": "Ana Torres"},
        {"id": 2, "dni": "87654321", "codigo": "U20195678", "nombre": null},
    ])));

    store.seed(tables::ADMIN_USER, rows(json!([
        {"id": 1, "username": "admin", "password": "admin123", "role": "admin", "area_id": null},
        {"id": 2, "username": "mantenimiento", "password": "mant123", "role": "area", "area_id": 1},
        {"id": 3, "username": "ti", "password": "ti123", "role": "area", "area_id": 2},
    ])));

    tracing::info!("seeded demo catalog");
}
