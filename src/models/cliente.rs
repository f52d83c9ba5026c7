use crate::error::AppError;
use crate::models::{non_null, nullable};
use crate::service::validation::{self, Validate, MAX_NAME_LEN};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoCliente {
    Activo,
    Inactivo,
}

/// Body of `POST /api/clientes`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NuevoCliente {
    pub nombre_contacto: String,
    pub empresa: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<EstadoCliente>,
}

impl Validate for NuevoCliente {
    fn validate(&self) -> Result<(), AppError> {
        validation::non_blank("nombre_contacto", &self.nombre_contacto, MAX_NAME_LEN)?;
        validation::non_blank("empresa", &self.empresa, MAX_NAME_LEN)?;
        validation::email("email", &self.email)?;
        if let Some(tel) = &self.telefono {
            validation::phone("telefono", tel)?;
        }
        Ok(())
    }
}

/// Body of `PUT /api/clientes/{id}`: any subset of client fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientePatch {
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub nombre_contacto: Option<String>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub empresa: Option<String>,
    #[serde(default, deserialize_with = "non_null", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub telefono: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub estado: Option<Option<EstadoCliente>>,
}

impl Validate for ClientePatch {
    fn validate(&self) -> Result<(), AppError> {
        if *self == ClientePatch::default() {
            return Err(AppError::Validation("body must contain at least one client field".into()));
        }
        if let Some(v) = &self.nombre_contacto {
            validation::non_blank("nombre_contacto", v, MAX_NAME_LEN)?;
        }
        if let Some(v) = &self.empresa {
            validation::non_blank("empresa", v, MAX_NAME_LEN)?;
        }
        if let Some(v) = &self.email {
            validation::email("email", v)?;
        }
        if let Some(Some(v)) = &self.telefono {
            validation::phone("telefono", v)?;
        }
        Ok(())
    }
}
