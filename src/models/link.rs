// src/models/link.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::auth::CorretorResumo;

// O que sai do banco (tabela corretor_links)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CorretorLink {
    pub id: i64,
    #[schema(example = "Tabela de lançamentos")]
    pub titulo: String,
    #[schema(example = "https://drive.example.com/tabela.pdf")]
    pub url: String,
    pub descricao: Option<String>,
    pub criado_por: Option<i64>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

// Linha do JOIN link_assignments x usuarios
#[derive(Debug, Clone, FromRow)]
pub struct LinkAssignmentRow {
    pub link_id: i64,
    pub corretor_id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: Option<String>,
}

// Resposta completa (Link + corretores vinculados)
#[derive(Debug, Serialize, ToSchema)]
pub struct LinkResponse {
    #[serde(flatten)]
    pub link: CorretorLink,
    pub corretores: Vec<CorretorResumo>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLinkPayload {
    #[validate(length(min = 1, message = "Selecione ao menos um corretor."))]
    pub corretor_ids: Vec<i64>,

    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub titulo: String,

    #[validate(url(message = "URL inválida."))]
    pub url: String,

    pub descricao: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLinkPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub titulo: Option<String>,

    #[validate(url(message = "URL inválida."))]
    pub url: Option<String>,

    pub descricao: Option<String>,

    // Quando presente, substitui todos os vínculos do link
    #[validate(length(min = 1, message = "Selecione ao menos um corretor."))]
    pub corretor_ids: Option<Vec<i64>>,

    // Formato antigo (um único corretor); ignorado se `corretor_ids` vier
    pub corretor_id: Option<i64>,
}

impl UpdateLinkPayload {
    pub fn corretores_alvo(&self) -> Option<Vec<i64>> {
        self.corretor_ids
            .clone()
            .or_else(|| self.corretor_id.map(|id| vec![id]))
    }
}
