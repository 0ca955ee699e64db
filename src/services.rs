pub mod auth;
pub mod auditoria_service;
pub mod captacao_service;
pub mod cliente_service;
pub mod historico_service;
pub mod link_service;
pub mod usuario_service;
