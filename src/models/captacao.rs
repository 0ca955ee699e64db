// src/models/captacao.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Prioridade {
    Media,
    Alta,
    Imediata,
}

impl Prioridade {
    // Maior peso = aparece primeiro na listagem
    pub fn peso(self) -> u8 {
        match self {
            Prioridade::Imediata => 3,
            Prioridade::Alta => 2,
            Prioridade::Media => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Captacao {
    pub id: i64,
    #[schema(example = "Apartamento 3 quartos")]
    pub titulo: String,
    #[schema(example = "Zona Sul")]
    pub regiao: String,
    pub valor_estimado: Option<f64>,
    pub prioridade: Prioridade,
    pub objetivo: Option<String>,
    pub observacoes: Option<String>,
    pub usuario_id: Option<i64>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCaptacaoPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub titulo: String,
    #[validate(length(min = 1, message = "A região é obrigatória."))]
    pub regiao: String,
    pub valor_estimado: Option<f64>,
    pub prioridade: Prioridade,
    pub objetivo: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCaptacaoPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub titulo: Option<String>,
    #[validate(length(min = 1, message = "A região é obrigatória."))]
    pub regiao: Option<String>,
    pub valor_estimado: Option<f64>,
    pub prioridade: Option<Prioridade>,
    pub objetivo: Option<String>,
    pub observacoes: Option<String>,
}
