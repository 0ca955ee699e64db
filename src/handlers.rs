pub mod auth;
pub mod captacoes;
pub mod clientes;
pub mod health;
pub mod links;
pub mod logs;
pub mod usuarios;
