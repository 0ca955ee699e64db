// src/models/cliente.rs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StatusCliente {
    Novo,
    EmAtendimento,
    Prioridade,
    #[sqlx(rename = "pré-atendido")]
    #[serde(rename = "pré-atendido", alias = "pre-atendido")]
    PreAtendido,
    Finalizado,
}

impl StatusCliente {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCliente::Novo => "novo",
            StatusCliente::EmAtendimento => "em-atendimento",
            StatusCliente::Prioridade => "prioridade",
            StatusCliente::PreAtendido => "pré-atendido",
            StatusCliente::Finalizado => "finalizado",
        }
    }

    // Rótulo exibido nas descrições de log
    pub fn rotulo(self) -> &'static str {
        match self {
            StatusCliente::Novo => "Novo",
            StatusCliente::EmAtendimento => "Em Atendimento",
            StatusCliente::Prioridade => "Prioridade",
            StatusCliente::PreAtendido => "Pré-Atendido",
            StatusCliente::Finalizado => "Finalizado",
        }
    }

    /// Aceita também os rótulos legados gravados nas descrições antigas ("N/A" = novo).
    pub fn parse_legado(valor: &str) -> Option<Self> {
        let normalizado = valor.trim().to_lowercase().replace(' ', "-");
        match normalizado.as_str() {
            "n/a" | "novo" => Some(StatusCliente::Novo),
            "em-atendimento" => Some(StatusCliente::EmAtendimento),
            "prioridade" => Some(StatusCliente::Prioridade),
            "pré-atendido" | "pre-atendido" => Some(StatusCliente::PreAtendido),
            "finalizado" | "inativo" => Some(StatusCliente::Finalizado),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Interesse {
    Alugar,
    Comprar,
    Vender,
}

// --- CLIENTE ---

/// Mantém só os dígitos: "(11) 98765-4321" e "11 987654321" viram a mesma chave.
pub fn normalizar_telefone(telefone: &str) -> String {
    telefone.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cliente {
    pub id: i64,
    #[schema(example = "Maria da Silva")]
    pub nome: String,
    #[schema(example = "(11) 98765-4321")]
    pub telefone: String,
    pub email: Option<String>,
    pub interesse: Interesse,
    #[schema(example = 350000.0)]
    pub valor: Option<f64>,
    pub status: StatusCliente,
    pub observacoes: Option<String>,
    pub data_atribuicao: Option<NaiveDateTime>,
    // Quem cadastrou
    pub usuario_id: Option<i64>,
    // Corretor responsável
    pub atribuido_a: Option<i64>,
    pub atribuido_a_nome: Option<String>,
    pub primeiro_contato: Option<NaiveDate>,
    pub ultimo_contato: Option<NaiveDate>,
    pub criado_em: NaiveDateTime,
    pub atualizado_em: NaiveDateTime,
}

// `length(min = 1)` aceitaria "   ", que vira "" depois do trim
fn validar_nome_preenchido(nome: &str) -> Result<(), ValidationError> {
    if nome.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("O nome é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

// Distingue "campo ausente" (None) de "campo enviado como null" (Some(None)).
fn campo_anulavel<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClientePayload {
    #[validate(custom(function = "validar_nome_preenchido"))]
    #[schema(example = "Maria da Silva")]
    pub nome: String,

    #[validate(length(min = 8, message = "O telefone precisa ter ao menos 8 caracteres."))]
    #[schema(example = "(11) 98765-4321")]
    pub telefone: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub interesse: Interesse,
    pub valor: Option<f64>,
    pub status: StatusCliente,
    pub observacoes: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2025-01-20")]
    pub primeiro_contato: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-01-20")]
    pub ultimo_contato: Option<NaiveDate>,

    // Cadastra mesmo com telefone repetido
    #[serde(default)]
    pub force: bool,
}

// Patch parcial. Campos anuláveis aceitam `null` para limpar o valor.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClientePayload {
    #[validate(custom(function = "validar_nome_preenchido"))]
    pub nome: Option<String>,

    #[validate(length(min = 8, message = "O telefone precisa ter ao menos 8 caracteres."))]
    pub telefone: Option<String>,

    #[serde(default, deserialize_with = "campo_anulavel")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,

    pub interesse: Option<Interesse>,

    #[serde(default, deserialize_with = "campo_anulavel")]
    #[schema(value_type = Option<f64>)]
    pub valor: Option<Option<f64>>,

    pub status: Option<StatusCliente>,

    #[serde(default, deserialize_with = "campo_anulavel")]
    #[schema(value_type = Option<String>)]
    pub observacoes: Option<Option<String>>,

    #[serde(default, deserialize_with = "campo_anulavel")]
    #[schema(value_type = Option<String>, format = Date)]
    pub primeiro_contato: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "campo_anulavel")]
    #[schema(value_type = Option<String>, format = Date)]
    pub ultimo_contato: Option<Option<NaiveDate>>,
}

impl UpdateClientePayload {
    /// Verdadeiro se o patch mexe em algum campo fora do conjunto liberado a corretores/editores.
    pub fn toca_campos_restritos(&self) -> bool {
        self.nome.is_some() || self.telefone.is_some() || self.email.is_some()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AtribuirClientePayload {
    // `null` remove a atribuição
    #[schema(example = 3)]
    pub corretor_id: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DuplicadosQuery {
    #[param(example = "11987654321")]
    pub telefone: String,
}

// Resultado do cadastro: duplicidade não é erro, é um desfecho possível.
#[derive(Debug)]
pub enum ResultadoCriacao {
    Criado(Cliente),
    Duplicado(Vec<Cliente>),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DuplicadoResponse {
    #[schema(example = "Cliente duplicado")]
    pub error: String,
    pub duplicatas: Vec<Cliente>,
    #[serde(rename = "allowForce")]
    pub allow_force: bool,
}

// --- AGENDAMENTO ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Agendamento {
    pub id: i64,
    pub cliente_id: i64,
    pub usuario_id: Option<i64>,
    pub data_hora: NaiveDateTime,
    #[schema(example = "visita")]
    pub tipo: String,
    #[schema(example = "agendado")]
    pub status: String,
    pub observacoes: Option<String>,
    pub criado_em: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAgendamentoPayload {
    #[schema(value_type = String, example = "2025-02-01T14:30:00")]
    pub data_hora: NaiveDateTime,
    #[validate(length(min = 1, message = "O tipo é obrigatório."))]
    #[schema(example = "visita")]
    pub tipo: String,
    pub observacoes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_pre_atendido_mantem_acento() {
        assert_eq!(
            serde_json::to_string(&StatusCliente::PreAtendido).unwrap(),
            "\"pré-atendido\""
        );
        let s: StatusCliente = serde_json::from_str("\"em-atendimento\"").unwrap();
        assert_eq!(s, StatusCliente::EmAtendimento);
    }

    #[test]
    fn nome_em_branco_nao_passa_na_validacao() {
        let payload: CreateClientePayload = serde_json::from_str(
            r#"{"nome": "   ", "telefone": "11987654321", "interesse": "comprar", "status": "novo"}"#,
        )
        .unwrap();
        let erros = payload.validate().unwrap_err();
        assert!(erros.field_errors().contains_key("nome"));

        let patch = UpdateClientePayload {
            nome: Some("\t ".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = UpdateClientePayload {
            nome: Some("Ana".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn telefone_curto_tem_mensagem_de_tamanho() {
        let payload: CreateClientePayload = serde_json::from_str(
            r#"{"nome": "Ana", "telefone": "1234", "interesse": "comprar", "status": "novo"}"#,
        )
        .unwrap();
        let erros = payload.validate().unwrap_err();
        let mensagem = erros.field_errors()["telefone"][0].message.clone().unwrap();
        assert_eq!(mensagem, "O telefone precisa ter ao menos 8 caracteres.");
    }

    #[test]
    fn parse_legado_trata_na_como_novo() {
        assert_eq!(StatusCliente::parse_legado("N/A"), Some(StatusCliente::Novo));
        assert_eq!(StatusCliente::parse_legado("Em Atendimento"), Some(StatusCliente::EmAtendimento));
        assert_eq!(StatusCliente::parse_legado("qualquer"), None);
    }

    #[test]
    fn patch_distingue_ausente_de_nulo() {
        let patch: UpdateClientePayload =
            serde_json::from_str(r#"{"observacoes": null, "status": "finalizado"}"#).unwrap();
        assert_eq!(patch.observacoes, Some(None));
        assert_eq!(patch.email, None);
        assert_eq!(patch.status, Some(StatusCliente::Finalizado));
        assert!(!patch.toca_campos_restritos());
    }
}
