pub mod auditoria;
pub mod auth;
pub mod captacao;
pub mod cliente;
pub mod historico;
pub mod link;
pub mod permissao;
