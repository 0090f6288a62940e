//! Areas, forms and the location catalog

use reporta_forms::{Area, AreaFieldRow, FormDefinition, Pabellon, Salon, SelectedLocation, SelectionOption};
use reporta_store::{from_row, from_rows, Filter, Order, Query};

use super::tables;
use crate::error::{ApiError, ApiResult};
use crate::ApiState;

pub async fn list_areas(state: &ApiState) -> ApiResult<Vec<Area>> {
    let rows = state
        .store
        .select(tables::AREAS, &Query::new().order(Order::asc("nombre")))
        .await?;
    Ok(from_rows(rows)?)
}

pub async fn get_area(state: &ApiState, area_id: i64) -> ApiResult<Area> {
    let query = Query::new().filter(Filter::new().eq("id", area_id)).page(0, 1);
    let row = state
        .store
        .select(tables::AREAS, &query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("area {area_id}")))?;
    Ok(from_row(row)?)
}

pub async fn field_rows(state: &ApiState, area_id: i64) -> ApiResult<Vec<AreaFieldRow>> {
    let query = Query::new()
        .filter(Filter::new().eq("area_id", area_id))
        .order(Order::asc("order_index"));
    Ok(from_rows(state.store.select(tables::AREA_FIELDS, &query).await?)?)
}

pub async fn area_options(state: &ApiState, area_id: i64) -> ApiResult<Vec<SelectionOption>> {
    let query = Query::new()
        .filter(Filter::new().eq("area_id", area_id))
        .order(Order::asc("group_name"))
        .order(Order::asc("order_index"));
    Ok(from_rows(state.store.select(tables::SELECTION_OPTIONS, &query).await?)?)
}

/// Field descriptors of the area with their option lists resolved.
pub async fn load_form(state: &ApiState, area_id: i64) -> ApiResult<FormDefinition> {
    let rows = field_rows(state, area_id).await?;
    let options = area_options(state, area_id).await?;
    Ok(FormDefinition::from_rows(rows, &options))
}

pub async fn list_pabellones(state: &ApiState) -> ApiResult<Vec<Pabellon>> {
    let rows = state
        .store
        .select(tables::PABELLONES, &Query::new().order(Order::asc("nombre")))
        .await?;
    Ok(from_rows(rows)?)
}

pub async fn list_salones(state: &ApiState, pabellon_id: i64) -> ApiResult<Vec<Salon>> {
    let query = Query::new()
        .filter(Filter::new().eq("pabellon_id", pabellon_id))
        .order(Order::asc("nombre"));
    Ok(from_rows(state.store.select(tables::SALONES, &query).await?)?)
}

async fn find_one<T: serde::de::DeserializeOwned>(state: &ApiState, table: &str, id: i64) -> ApiResult<Option<T>> {
    let query = Query::new().filter(Filter::new().eq("id", id)).page(0, 1);
    match state.store.select(table, &query).await?.into_iter().next() {
        Some(row) => Ok(Some(from_row(row)?)),
        None => Ok(None),
    }
}

/// Load the chosen pabellón and salón. `None` when either was not chosen;
/// whether the pair belongs together is left to validation.
pub async fn resolve_location(
    state: &ApiState,
    pabellon_id: Option<i64>,
    salon_id: Option<i64>,
) -> ApiResult<Option<SelectedLocation>> {
    let (Some(pabellon_id), Some(salon_id)) = (pabellon_id, salon_id) else {
        return Ok(None);
    };
    let pabellon: Pabellon = find_one(state, tables::PABELLONES, pabellon_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("pabellon {pabellon_id}")))?;
    let salon: Salon = find_one(state, tables::SALONES, salon_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("salon {salon_id}")))?;
    Ok(Some(SelectedLocation::new(pabellon, salon)))
}
