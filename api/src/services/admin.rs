//! Area administration

use reporta_forms::{Area, AreaFieldRow, FieldType, OptionSource, SelectionOption};
use reporta_store::{from_row, from_rows, Filter, Row};
use serde_json::{json, Value};

use super::{catalog, tables};
use crate::error::{ApiError, ApiResult};
use crate::models::{AreaCreate, AreaUpdate, FieldCreate, FieldDto, OptionCreate};
use crate::ApiState;

fn required(value: &str, what: &str) -> ApiResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::BadRequest(format!("{what} is required")));
    }
    Ok(value.to_string())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn object(value: Value) -> Row {
    match value {
        Value::Object(row) => row,
        _ => Row::new(),
    }
}

pub async fn create_area(state: &ApiState, input: AreaCreate) -> ApiResult<Area> {
    let record = object(json!({
        "nombre": required(&input.nombre, "nombre")?,
        "descripcion": blank_to_none(input.descripcion),
        "image_url": Value::Null,
    }));
    let area: Area = from_row(state.store.insert(tables::AREAS, record).await?)?;
    tracing::info!(area_id = area.id, nombre = %area.nombre, "area created");
    Ok(area)
}

pub async fn update_area(state: &ApiState, area_id: i64, input: AreaUpdate) -> ApiResult<Area> {
    let mut patch = Row::new();
    if let Some(nombre) = input.nombre {
        patch.insert("nombre".into(), Value::from(required(&nombre, "nombre")?));
    }
    if let Some(descripcion) = input.descripcion {
        patch.insert("descripcion".into(), json!(blank_to_none(Some(descripcion))));
    }
    if patch.is_empty() {
        return catalog::get_area(state, area_id).await;
    }
    let row = state
        .store
        .update(tables::AREAS, patch, &Filter::new().eq("id", area_id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("area {area_id}")))?;
    Ok(from_row(row)?)
}

/// Remove an area with its fields and options. Its reports stay.
pub async fn delete_area(state: &ApiState, area_id: i64) -> ApiResult<u64> {
    catalog::get_area(state, area_id).await?;
    let by_area = Filter::new().eq("area_id", area_id);
    let fields = state.store.delete(tables::AREA_FIELDS, &by_area).await?;
    let options = state.store.delete(tables::SELECTION_OPTIONS, &by_area).await?;
    let deleted = state.store.delete(tables::AREAS, &Filter::new().eq("id", area_id)).await?;
    let reports_kept = area_submission_ids(state, area_id).await?.len();
    tracing::info!(area_id, fields, options, reports_kept, "area deleted");
    Ok(deleted)
}

pub async fn add_field(state: &ApiState, area_id: i64, input: FieldCreate) -> ApiResult<FieldDto> {
    catalog::get_area(state, area_id).await?;
    let field_name = required(&input.field_name, "field_name")?;
    if !field_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ApiError::BadRequest(format!(
            "field_name {field_name:?} may only contain letters, digits and underscores"
        )));
    }
    let field_type = FieldType::parse(&input.field_type)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown field_type {:?}", input.field_type)))?;
    let options = blank_to_none(input.options);
    if field_type == FieldType::Select && options.as_deref().and_then(OptionSource::parse).is_none() {
        return Err(ApiError::BadRequest("select fields need options".into()));
    }

    let existing = catalog::field_rows(state, area_id).await?;
    if existing.iter().any(|f| f.field_name == field_name) {
        return Err(ApiError::BadRequest(format!("area {area_id} already has a field {field_name}")));
    }

    let record = object(json!({
        "area_id": area_id,
        "field_name": field_name,
        "field_type": field_type.as_str(),
        "field_label": required(&input.field_label, "field_label")?,
        "is_required": input.is_required,
        "options": options,
        "placeholder": blank_to_none(input.placeholder),
        "order_index": input.order_index,
    }));
    let row: AreaFieldRow = from_row(state.store.insert(tables::AREA_FIELDS, record).await?)?;
    tracing::info!(area_id, field = %row.field_name, "field added");
    Ok(row.into())
}

pub async fn delete_field(state: &ApiState, field_id: i64) -> ApiResult<u64> {
    let deleted = state.store.delete(tables::AREA_FIELDS, &Filter::new().eq("id", field_id)).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("field {field_id}")));
    }
    Ok(deleted)
}

pub async fn list_options(state: &ApiState, area_id: i64) -> ApiResult<Vec<SelectionOption>> {
    catalog::get_area(state, area_id).await?;
    catalog::area_options(state, area_id).await
}

pub async fn add_option(state: &ApiState, area_id: i64, input: OptionCreate) -> ApiResult<SelectionOption> {
    catalog::get_area(state, area_id).await?;
    let option_value = required(&input.option_value, "option_value")?;
    let option_label = blank_to_none(input.option_label).unwrap_or_else(|| option_value.clone());
    let record = object(json!({
        "area_id": area_id,
        "group_name": required(&input.group_name, "group_name")?,
        "option_value": option_value,
        "option_label": option_label,
        "order_index": input.order_index,
    }));
    Ok(from_row(state.store.insert(tables::SELECTION_OPTIONS, record).await?)?)
}

pub async fn delete_option(state: &ApiState, option_id: i64) -> ApiResult<u64> {
    let deleted = state
        .store
        .delete(tables::SELECTION_OPTIONS, &Filter::new().eq("id", option_id))
        .await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("option {option_id}")));
    }
    Ok(deleted)
}

/// Fields of an area as stored, for the administration screens.
pub async fn list_fields(state: &ApiState, area_id: i64) -> ApiResult<Vec<FieldDto>> {
    catalog::get_area(state, area_id).await?;
    let rows = catalog::field_rows(state, area_id).await?;
    Ok(rows.into_iter().map(FieldDto::from).collect())
}

/// Ids of the reports filed under an area.
pub async fn area_submission_ids(state: &ApiState, area_id: i64) -> ApiResult<Vec<i64>> {
    #[derive(serde::Deserialize)]
    struct IdOnly {
        id: i64,
    }
    let query = reporta_store::Query::new().filter(Filter::new().eq("area_id", area_id));
    let rows: Vec<IdOnly> = from_rows(state.store.select(tables::AREA_SUBMISSIONS, &query).await?)?;
    Ok(rows.into_iter().map(|r| r.id).collect())
}
