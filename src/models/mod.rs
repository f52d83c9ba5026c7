//! Request payloads: explicit schemas for what clients may send.

pub mod cliente;
pub mod proyecto;

pub use cliente::{ClientePatch, EstadoCliente, NuevoCliente};
pub use proyecto::{EstadoProyecto, NuevoProyecto, ProyectoPatch};

use crate::error::AppError;
use crate::store::Row;
use serde::{Deserialize, Deserializer, Serialize};

/// Serialize a payload into the column map sent to the store.
pub fn to_row<T: Serialize>(payload: &T) -> Result<Row, AppError> {
    match serde_json::to_value(payload) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::BadRequest("payload must serialize to an object".into())),
        Err(e) => Err(AppError::BadRequest(e.to_string())),
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`). Use with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

/// Absent stays `None`; an explicit `null` is a data error. For patch fields the store requires.
pub(crate) fn non_null<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d)?
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("field may not be null"))
}

/// Like `nullable`, but an empty string also clears the field (HTML forms send "" for empty dates).
pub(crate) fn nullable_date<'de, D>(d: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<String>::deserialize(d)?;
    Ok(Some(v.filter(|s| !s.trim().is_empty())))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Text(String),
}

/// Integer id that may arrive as a number or as a numeric string (as HTML selects send it).
pub(crate) fn id_from_int_or_str<'de, D>(d: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match IdRepr::deserialize(d)? {
        IdRepr::Int(n) => Ok(n),
        IdRepr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer id, got \"{}\"", s))),
    }
}

pub(crate) fn opt_id_from_int_or_str<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_int_or_str(d).map(Some)
}
