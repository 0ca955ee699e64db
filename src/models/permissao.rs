// src/models/permissao.rs
//
// Tabela de capacidades fixa. Toda checagem de cargo do sistema passa por `pode`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::auth::Cargo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Recurso {
    Clientes,
    Usuarios,
    Logs,
    Links,
    Captacoes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Acao {
    Criar,
    Ler,
    Atualizar,
    Deletar,
    GerenciarAdmins,
}

use Acao::*;

const CRUD: &[Acao] = &[Criar, Ler, Atualizar, Deletar];

/// Ações permitidas a um cargo sobre um recurso.
pub fn acoes_permitidas(cargo: Cargo, recurso: Recurso) -> &'static [Acao] {
    match (cargo, recurso) {
        (Cargo::HeadAdmin, Recurso::Usuarios) => &[Criar, Ler, Atualizar, Deletar, GerenciarAdmins],
        (Cargo::HeadAdmin, Recurso::Logs) | (Cargo::Admin, Recurso::Logs) => &[Ler],
        (Cargo::HeadAdmin, _) | (Cargo::Admin, _) => CRUD,

        // Para clientes e links o corretor fica restrito ao próprio escopo (ver serviços).
        (Cargo::Corretor, Recurso::Clientes) => CRUD,
        (Cargo::Corretor, Recurso::Links) => CRUD,
        (Cargo::Corretor, Recurso::Usuarios) | (Cargo::Corretor, Recurso::Captacoes) => &[Ler],
        (Cargo::Corretor, Recurso::Logs) => &[],

        (Cargo::Editor, Recurso::Clientes) => &[Criar, Atualizar],
        (Cargo::Editor, _) => &[],

        (Cargo::Visualizar, Recurso::Clientes) => &[Ler],
        (Cargo::Visualizar, _) => &[],
    }
}

pub fn pode(cargo: Cargo, recurso: Recurso, acao: Acao) -> bool {
    acoes_permitidas(cargo, recurso).contains(&acao)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_admin_gerencia_admins_mas_admin_nao() {
        assert!(pode(Cargo::HeadAdmin, Recurso::Usuarios, GerenciarAdmins));
        assert!(!pode(Cargo::Admin, Recurso::Usuarios, GerenciarAdmins));
        assert!(pode(Cargo::Admin, Recurso::Usuarios, Deletar));
    }

    #[test]
    fn corretor_le_usuarios_e_opera_clientes() {
        assert!(pode(Cargo::Corretor, Recurso::Usuarios, Ler));
        assert!(!pode(Cargo::Corretor, Recurso::Usuarios, Criar));
        for acao in CRUD {
            assert!(pode(Cargo::Corretor, Recurso::Clientes, *acao));
        }
        assert!(!pode(Cargo::Corretor, Recurso::Logs, Ler));
    }

    #[test]
    fn editor_e_visualizador() {
        assert!(pode(Cargo::Editor, Recurso::Clientes, Criar));
        assert!(pode(Cargo::Editor, Recurso::Clientes, Atualizar));
        assert!(!pode(Cargo::Editor, Recurso::Clientes, Deletar));
        assert!(!pode(Cargo::Editor, Recurso::Usuarios, Ler));

        assert!(pode(Cargo::Visualizar, Recurso::Clientes, Ler));
        assert!(!pode(Cargo::Visualizar, Recurso::Clientes, Atualizar));
        assert!(!pode(Cargo::Visualizar, Recurso::Usuarios, Ler));
    }
}
