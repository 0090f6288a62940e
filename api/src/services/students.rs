//! Student verification

use reporta_forms::Student;
use reporta_store::{from_row, Filter, Query};

use super::tables;
use crate::error::{ApiError, ApiResult};
use crate::ApiState;

/// Look the student up by DNI and university code.
pub async fn verify(state: &ApiState, dni: &str, codigo: &str) -> ApiResult<Student> {
    let (dni, codigo) = (dni.trim(), codigo.trim());
    if dni.is_empty() || codigo.is_empty() {
        return Err(ApiError::BadRequest("dni and codigo are required".into()));
    }

    let query = Query::new()
        .filter(Filter::new().eq("dni", dni).eq("codigo", codigo))
        .page(0, 1);
    let row = state
        .store
        .select(tables::ALUMNOS, &query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            tracing::info!(dni, "student verification failed");
            ApiError::NotFound("student with that DNI and code".into())
        })?;
    Ok(from_row(row)?)
}
