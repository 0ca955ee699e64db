// src/models/historico.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::cliente::StatusCliente;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoEvento {
    Criado,
    StatusAlterado,
    Atribuido,
    Desatribuido,
}

// Linha da tabela `cliente_eventos`. Append-only.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EventoCliente {
    pub sequencia: i64,
    pub cliente_id: i64,
    pub tipo: TipoEvento,
    pub valor_anterior: Option<String>,
    pub valor_novo: Option<String>,
    pub ator_id: Option<i64>,
    pub ator_nome: Option<String>,
    pub criado_em: NaiveDateTime,
}

// Evento ainda não gravado
#[derive(Debug, Clone, PartialEq)]
pub struct NovoEvento {
    pub tipo: TipoEvento,
    pub valor_anterior: Option<String>,
    pub valor_novo: Option<String>,
}

impl NovoEvento {
    pub fn criado(status: StatusCliente) -> Self {
        Self {
            tipo: TipoEvento::Criado,
            valor_anterior: None,
            valor_novo: Some(status.as_str().to_string()),
        }
    }

    pub fn status_alterado(de: StatusCliente, para: StatusCliente) -> Self {
        Self {
            tipo: TipoEvento::StatusAlterado,
            valor_anterior: Some(de.as_str().to_string()),
            valor_novo: Some(para.as_str().to_string()),
        }
    }

    // Para atribuições os valores guardam o nome do corretor (anterior / novo).
    pub fn atribuido(anterior: Option<String>, novo: String) -> Self {
        Self {
            tipo: TipoEvento::Atribuido,
            valor_anterior: anterior,
            valor_novo: Some(novo),
        }
    }

    pub fn desatribuido(anterior: Option<String>) -> Self {
        Self {
            tipo: TipoEvento::Desatribuido,
            valor_anterior: anterior,
            valor_novo: None,
        }
    }
}

// --- Histórico de atribuições ---

#[derive(Debug, Serialize, ToSchema)]
pub struct PrimeiraAtribuicao {
    pub corretor_nome: String,
    pub atribuido_por: Option<String>,
    pub data: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemAtribuicao {
    #[schema(example = "ATRIBUIR_CLIENTE")]
    pub acao: String,
    pub descricao: String,
    pub usuario_logado: Option<String>,
    pub data: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoricoAtribuicoes {
    pub cliente_id: i64,
    pub cliente_nome: String,
    pub data_cadastro: NaiveDateTime,
    pub primeira_atribuicao: Option<PrimeiraAtribuicao>,
    // Atribuições e remoções posteriores à primeira, em ordem cronológica
    pub atribuicoes: Vec<ItemAtribuicao>,
}

// --- Histórico de status ---

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemStatus {
    pub status_anterior: Option<StatusCliente>,
    pub status: StatusCliente,
    pub descricao: String,
    pub usuario: Option<String>,
    pub data: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoricoStatus {
    pub cliente_id: i64,
    pub cliente_nome: String,
    pub status_atual: StatusCliente,
    pub cliente_criado_em: NaiveDateTime,
    pub status_inicial: StatusCliente,
    // Ordem cronológica (mais antiga primeiro)
    pub historico_status: Vec<ItemStatus>,
}
