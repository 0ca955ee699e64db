// src/services/link_service.rs

use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    common::error::AppError,
    db::{AuditoriaRepository, LinkRepository, UserRepository},
    models::{
        auditoria::{acao, modulo, NovoLog},
        auth::{Cargo, CorretorResumo, StatusUsuario, Usuario},
        link::{CorretorLink, CreateLinkPayload, LinkResponse, UpdateLinkPayload},
        permissao::{pode, Acao, Recurso},
    },
};

#[derive(Clone)]
pub struct LinkService {
    pool: SqlitePool,
    repo: LinkRepository,
    usuarios: UserRepository,
    auditoria: AuditoriaRepository,
}

fn exigir(ator: &Usuario, acao: Acao) -> Result<(), AppError> {
    if pode(ator.cargo, Recurso::Links, acao) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

// Lista sem repetição, na ordem crescente
fn normalizar_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl LinkService {
    pub fn new(pool: SqlitePool, repo: LinkRepository, usuarios: UserRepository, auditoria: AuditoriaRepository) -> Self {
        Self {
            pool,
            repo,
            usuarios,
            auditoria,
        }
    }

    // Todos os ids precisam ser corretores ativos; corretor só vincula a si mesmo.
    async fn validar_corretores(
        &self,
        conn: &mut SqliteConnection,
        ids: &[i64],
        ator: &Usuario,
    ) -> Result<(), AppError> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput("Selecione ao menos um corretor.".into()));
        }
        if ator.cargo.is_corretor() && ids.iter().any(|id| *id != ator.id) {
            return Err(AppError::OutOfScope);
        }

        for id in ids {
            let valido = self
                .usuarios
                .find_by_id(&mut *conn, *id)
                .await?
                .is_some_and(|u| u.cargo == Cargo::Corretor && u.status == StatusUsuario::Ativo);
            if !valido {
                return Err(AppError::InvalidInput(format!(
                    "O usuário {} não é um corretor ativo.",
                    id
                )));
            }
        }
        Ok(())
    }

    async fn montar_respostas(&self, links: Vec<CorretorLink>) -> Result<Vec<LinkResponse>, AppError> {
        let ids: Vec<i64> = links.iter().map(|l| l.id).collect();

        let mut por_link: HashMap<i64, Vec<CorretorResumo>> = HashMap::new();
        for row in self.repo.list_assignments(&ids).await? {
            por_link.entry(row.link_id).or_default().push(CorretorResumo {
                id: row.corretor_id,
                nome: row.nome,
                email: row.email,
                telefone: row.telefone,
            });
        }

        Ok(links
            .into_iter()
            .map(|link| {
                let corretores = por_link.remove(&link.id).unwrap_or_default();
                LinkResponse { link, corretores }
            })
            .collect())
    }

    async fn montar_resposta(&self, link: CorretorLink) -> Result<LinkResponse, AppError> {
        let mut respostas = self.montar_respostas(vec![link]).await?;
        respostas.pop().ok_or(AppError::LinkNotFound)
    }

    async fn carregar_editavel(&self, id: i64, ator: &Usuario) -> Result<CorretorLink, AppError> {
        let link = self.repo.find_by_id(id).await?.ok_or(AppError::LinkNotFound)?;
        if ator.cargo.is_corretor() && link.criado_por != Some(ator.id) {
            return Err(AppError::OutOfScope);
        }
        Ok(link)
    }

    /// Admin vê todos os links; corretor vê os vinculados a ele.
    pub async fn listar(&self, ator: &Usuario) -> Result<Vec<LinkResponse>, AppError> {
        exigir(ator, Acao::Ler)?;
        let links = if ator.cargo.is_admin() {
            self.repo.list_all().await?
        } else {
            self.repo.list_do_corretor(ator.id).await?
        };
        self.montar_respostas(links).await
    }

    pub async fn listar_do_corretor(&self, corretor_id: i64, ator: &Usuario) -> Result<Vec<LinkResponse>, AppError> {
        exigir(ator, Acao::Ler)?;
        if !ator.cargo.is_admin() && ator.id != corretor_id {
            return Err(AppError::OutOfScope);
        }
        let links = self.repo.list_do_corretor(corretor_id).await?;
        self.montar_respostas(links).await
    }

    pub async fn criar(&self, payload: &CreateLinkPayload, ator: &Usuario) -> Result<LinkResponse, AppError> {
        exigir(ator, Acao::Criar)?;
        let corretor_ids = normalizar_ids(&payload.corretor_ids);

        let mut tx = self.pool.begin().await?;
        self.validar_corretores(&mut *tx, &corretor_ids, ator).await?;

        let link = self
            .repo
            .create_link(
                &mut *tx,
                payload.titulo.trim(),
                payload.url.trim(),
                payload.descricao.as_deref(),
                ator.id,
            )
            .await?;
        self.repo.replace_assignments(&mut *tx, link.id, &corretor_ids).await?;

        self.auditoria
            .registrar(
                &mut *tx,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: None,
                    acao: acao::CRIAR,
                    modulo: modulo::LINKS,
                    descricao: format!("Link \"{}\" criado para {} corretor(es)", link.titulo, corretor_ids.len()),
                },
            )
            .await?;

        tx.commit().await?;
        self.montar_resposta(link).await
    }

    pub async fn atualizar(&self, id: i64, patch: &UpdateLinkPayload, ator: &Usuario) -> Result<LinkResponse, AppError> {
        exigir(ator, Acao::Atualizar)?;
        let mut link = self.carregar_editavel(id, ator).await?;

        if let Some(titulo) = &patch.titulo {
            link.titulo = titulo.trim().to_string();
        }
        if let Some(url) = &patch.url {
            link.url = url.trim().to_string();
        }
        if let Some(descricao) = &patch.descricao {
            link.descricao = Some(descricao.clone()).filter(|d| !d.trim().is_empty());
        }

        let mut tx = self.pool.begin().await?;

        if let Some(alvo) = patch.corretores_alvo() {
            let corretor_ids = normalizar_ids(&alvo);
            self.validar_corretores(&mut *tx, &corretor_ids, ator).await?;
            self.repo.replace_assignments(&mut *tx, link.id, &corretor_ids).await?;
        }

        let link = self.repo.update_link(&mut *tx, &link).await?;
        self.auditoria
            .registrar(
                &mut *tx,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: None,
                    acao: acao::EDITAR,
                    modulo: modulo::LINKS,
                    descricao: format!("Link \"{}\" atualizado", link.titulo),
                },
            )
            .await?;

        tx.commit().await?;
        self.montar_resposta(link).await
    }

    pub async fn deletar(&self, id: i64, ator: &Usuario) -> Result<(), AppError> {
        exigir(ator, Acao::Deletar)?;
        let link = self.carregar_editavel(id, ator).await?;

        self.repo.delete_link(id).await?;
        self.auditoria
            .registrar(
                &self.pool,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: None,
                    acao: acao::DELETAR,
                    modulo: modulo::LINKS,
                    descricao: format!("Link \"{}\" excluído", link.titulo),
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_sem_repeticao() {
        assert_eq!(normalizar_ids(&[4, 2, 4, 3, 2]), vec![2, 3, 4]);
    }
}
