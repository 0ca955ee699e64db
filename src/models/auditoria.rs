// src/models/auditoria.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

// Códigos de ação gravados em `logs_auditoria.acao`
pub mod acao {
    pub const LOGIN: &str = "LOGIN";
    pub const CRIAR: &str = "CRIAR";
    pub const EDITAR: &str = "EDITAR";
    pub const DELETAR: &str = "DELETAR";
    pub const ATRIBUIR_CLIENTE: &str = "ATRIBUIR_CLIENTE";
    pub const DESATRIBUIR_CLIENTE: &str = "DESATRIBUIR_CLIENTE";
    pub const MESCLAR: &str = "MESCLAR";
}

pub mod modulo {
    pub const AUTH: &str = "AUTH";
    pub const CLIENTES: &str = "CLIENTES";
    pub const USUARIOS: &str = "USUARIOS";
    pub const LINKS: &str = "LINKS";
    pub const CAPTACOES: &str = "CAPTACOES";
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LogAuditoria {
    pub id: i64,
    pub usuario_id: Option<i64>,
    // Nome do usuário na hora da consulta (JOIN); None se a conta não existe mais
    pub usuario_nome: Option<String>,
    pub cliente_id: Option<i64>,
    #[schema(example = "EDITAR")]
    pub acao: String,
    #[schema(example = "CLIENTES")]
    pub modulo: String,
    pub descricao: String,
    pub criado_em: NaiveDateTime,
}

// Entrada a ser gravada
#[derive(Debug, Clone)]
pub struct NovoLog<'a> {
    pub usuario_id: Option<i64>,
    pub cliente_id: Option<i64>,
    pub acao: &'a str,
    pub modulo: &'a str,
    pub descricao: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LogsQuery {
    #[param(example = "CLIENTES")]
    pub modulo: Option<String>,
    pub cliente_id: Option<i64>,
    #[param(example = 100)]
    pub limite: Option<i64>,
}
