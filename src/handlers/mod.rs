//! HTTP handlers for clients, projects and tasks.

pub mod clientes;
pub mod proyectos;
pub mod tareas;
