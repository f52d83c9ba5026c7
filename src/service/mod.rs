//! Request validation and the per-resource operations behind the handlers.

mod gateway;
pub mod validation;
pub use gateway::GatewayService;
pub use validation::Validate;
