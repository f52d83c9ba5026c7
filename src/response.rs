//! Response bodies for routes that do not return rows as-is.

use crate::store::Row;
use serde::Serialize;

pub const LIVENESS_STATUS: &str = "API TechSolutions operando 🚀";
pub const STATUS_SUCCESS: &str = "success";

#[derive(Serialize)]
pub struct Liveness {
    pub status: &'static str,
}

/// `PUT /api/clientes/{id}` wraps the updated rows.
#[derive(Serialize)]
pub struct StatusData {
    pub status: &'static str,
    pub data: Vec<Row>,
}

/// `DELETE /api/clientes/{id}`.
#[derive(Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: &'static str,
}

/// `DELETE /api/proyectos/{id}`.
#[derive(Serialize)]
pub struct Message {
    pub message: &'static str,
}

pub fn status_data(data: Vec<Row>) -> StatusData {
    StatusData {
        status: STATUS_SUCCESS,
        data,
    }
}

pub fn status_message(message: &'static str) -> StatusMessage {
    StatusMessage {
        status: STATUS_SUCCESS,
        message,
    }
}
