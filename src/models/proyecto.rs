use crate::error::AppError;
use crate::models::{id_from_int_or_str, non_null, nullable, nullable_date, opt_id_from_int_or_str};
use crate::service::validation::{self, Validate, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoProyecto {
    #[serde(rename = "Planificación")]
    Planificacion,
    #[serde(rename = "En Progreso")]
    EnProgreso,
    Finalizado,
}

/// Body of `POST /api/proyectos`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NuevoProyecto {
    #[serde(deserialize_with = "id_from_int_or_str")]
    pub cliente_id: i64,
    pub nombre_proyecto: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub fecha_inicio: String,
    #[serde(default, deserialize_with = "nullable_date", skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<EstadoProyecto>,
}

impl Validate for NuevoProyecto {
    fn validate(&self) -> Result<(), AppError> {
        validation::positive_id("cliente_id", self.cliente_id)?;
        validation::non_blank("nombre_proyecto", &self.nombre_proyecto, MAX_NAME_LEN)?;
        if let Some(d) = &self.descripcion {
            validation::max_len("descripcion", d, MAX_DESCRIPTION_LEN)?;
        }
        let inicio = validation::date("fecha_inicio", &self.fecha_inicio)?;
        if let Some(Some(fin)) = &self.fecha_fin {
            let fin = validation::date("fecha_fin", fin)?;
            validation::date_order(inicio, fin)?;
        }
        Ok(())
    }
}

/// Body of `PUT /api/proyectos/{id}`: any subset of project fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProyectoPatch {
    #[serde(default, deserialize_with = "opt_id_from_int_or_str", skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<i64>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub nombre_proyecto: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<Option<String>>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub fecha_inicio: Option<String>,
    #[serde(default, deserialize_with = "nullable_date", skip_serializing_if = "Option::is_none")]
    pub fecha_fin: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub estado: Option<Option<EstadoProyecto>>,
}

impl Validate for ProyectoPatch {
    fn validate(&self) -> Result<(), AppError> {
        if *self == ProyectoPatch::default() {
            return Err(AppError::Validation("body must contain at least one project field".into()));
        }
        if let Some(id) = self.cliente_id {
            validation::positive_id("cliente_id", id)?;
        }
        if let Some(v) = &self.nombre_proyecto {
            validation::non_blank("nombre_proyecto", v, MAX_NAME_LEN)?;
        }
        if let Some(Some(d)) = &self.descripcion {
            validation::max_len("descripcion", d, MAX_DESCRIPTION_LEN)?;
        }
        let inicio = self
            .fecha_inicio
            .as_deref()
            .map(|d| validation::date("fecha_inicio", d))
            .transpose()?;
        let fin = match &self.fecha_fin {
            Some(Some(d)) => Some(validation::date("fecha_fin", d)?),
            _ => None,
        };
        // Only checkable when both dates arrive together; the stored row is not consulted.
        if let (Some(inicio), Some(fin)) = (inicio, fin) {
            validation::date_order(inicio, fin)?;
        }
        Ok(())
    }
}
