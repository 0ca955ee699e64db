// src/services/cliente_service.rs

use chrono::{NaiveDateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{
        cliente_repo::GrupoNome, AgendamentoRepository, AuditoriaRepository, ClienteRepository,
        EventoRepository, UserRepository,
    },
    models::{
        auditoria::{acao, modulo, NovoLog},
        auth::{Cargo, StatusUsuario, Usuario},
        cliente::{
            Agendamento, Cliente, CreateAgendamentoPayload, CreateClientePayload, ResultadoCriacao,
            StatusCliente, UpdateClientePayload,
        },
        historico::NovoEvento,
        permissao::{pode, Acao, Recurso},
    },
};

pub use crate::models::cliente::normalizar_telefone;

/// Colunas que apontam para `clientes.id`. A mesclagem repassa todas elas para o registro mantido.
pub const REFERENCIAS_CLIENTE: &[(&str, &str)] = &[
    ("agendamentos", "cliente_id"),
    ("logs_auditoria", "cliente_id"),
    ("cliente_eventos", "cliente_id"),
];

// Estado final de um update + o que precisa ser registrado
#[derive(Debug)]
pub struct PlanoAtualizacao {
    pub cliente: Cliente,
    pub eventos: Vec<NovoEvento>,
    pub transicao: Option<(StatusCliente, StatusCliente)>,
    pub restritos_ignorados: bool,
}

/// Aplica o patch sobre o estado atual seguindo as regras de cargo e de status.
///
/// - Só admins alteram nome, telefone e e-mail; para os demais cargos esses campos são ignorados.
/// - Ir para `finalizado` remove a atribuição na mesma escrita.
/// - Sair de `finalizado` atribui o cliente ao ator quando ele é corretor; para admins a
///   atribuição fica como está.
pub fn planejar_atualizacao(
    atual: &Cliente,
    patch: &UpdateClientePayload,
    ator: &Usuario,
    agora: NaiveDateTime,
) -> PlanoAtualizacao {
    let mut cliente = atual.clone();
    let mut eventos = Vec::new();

    let campos_restritos_liberados = ator.cargo.is_admin();
    let restritos_ignorados = !campos_restritos_liberados && patch.toca_campos_restritos();

    if campos_restritos_liberados {
        if let Some(nome) = &patch.nome {
            cliente.nome = nome.trim().to_string();
        }
        if let Some(telefone) = &patch.telefone {
            cliente.telefone = telefone.trim().to_string();
        }
        if let Some(email) = &patch.email {
            cliente.email = email.clone().filter(|e| !e.trim().is_empty());
        }
    }

    if let Some(interesse) = patch.interesse {
        cliente.interesse = interesse;
    }
    if let Some(valor) = patch.valor {
        cliente.valor = valor;
    }
    if let Some(observacoes) = &patch.observacoes {
        cliente.observacoes = observacoes.clone();
    }
    if let Some(primeiro_contato) = patch.primeiro_contato {
        cliente.primeiro_contato = primeiro_contato;
    }
    if let Some(ultimo_contato) = patch.ultimo_contato {
        cliente.ultimo_contato = ultimo_contato;
    }

    let mut transicao = None;
    if let Some(novo) = patch.status.filter(|s| *s != atual.status) {
        let anterior = atual.status;
        cliente.status = novo;
        transicao = Some((anterior, novo));
        eventos.push(NovoEvento::status_alterado(anterior, novo));

        if novo == StatusCliente::Finalizado {
            if cliente.atribuido_a.is_some() {
                eventos.push(NovoEvento::desatribuido(cliente.atribuido_a_nome.clone()));
            }
            cliente.atribuido_a = None;
            cliente.atribuido_a_nome = None;
            cliente.data_atribuicao = None;
        } else if anterior == StatusCliente::Finalizado && ator.cargo.is_corretor() {
            eventos.push(NovoEvento::atribuido(
                cliente.atribuido_a_nome.clone(),
                ator.nome.clone(),
            ));
            cliente.atribuido_a = Some(ator.id);
            cliente.atribuido_a_nome = Some(ator.nome.clone());
            cliente.data_atribuicao = Some(agora);
        }
    }

    PlanoAtualizacao {
        cliente,
        eventos,
        transicao,
        restritos_ignorados,
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ResultadoMesclagem {
    pub mantido_id: i64,
    pub nome: String,
    pub removidos: Vec<i64>,
    pub referencias_movidas: u64,
}

#[derive(Clone)]
pub struct ClienteService {
    pool: SqlitePool,
    repo: ClienteRepository,
    eventos: EventoRepository,
    auditoria: AuditoriaRepository,
    usuarios: UserRepository,
    agendamentos: AgendamentoRepository,
}

impl ClienteService {
    pub fn new(
        pool: SqlitePool,
        repo: ClienteRepository,
        eventos: EventoRepository,
        auditoria: AuditoriaRepository,
        usuarios: UserRepository,
        agendamentos: AgendamentoRepository,
    ) -> Self {
        Self {
            pool,
            repo,
            eventos,
            auditoria,
            usuarios,
            agendamentos,
        }
    }

    fn exigir(ator: &Usuario, acao: Acao) -> Result<(), AppError> {
        if pode(ator.cargo, Recurso::Clientes, acao) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    // Corretor só enxerga o que cadastrou ou o que está atribuído a ele
    fn no_escopo(ator: &Usuario, cliente: &Cliente) -> bool {
        match ator.cargo {
            Cargo::Corretor => {
                cliente.usuario_id == Some(ator.id) || cliente.atribuido_a == Some(ator.id)
            }
            _ => true,
        }
    }

    fn agora() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn listar(&self, ator: &Usuario) -> Result<Vec<Cliente>, AppError> {
        Self::exigir(ator, Acao::Ler)?;
        match ator.cargo {
            Cargo::Corretor => self.repo.list_do_corretor(ator.id).await,
            _ => self.repo.list_all().await,
        }
    }

    pub async fn obter(&self, id: i64, ator: &Usuario) -> Result<Cliente, AppError> {
        Self::exigir(ator, Acao::Ler)?;
        self.carregar_no_escopo(id, ator).await
    }

    async fn carregar_no_escopo(&self, id: i64, ator: &Usuario) -> Result<Cliente, AppError> {
        let cliente = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        if !Self::no_escopo(ator, &cliente) {
            return Err(AppError::OutOfScope);
        }
        Ok(cliente)
    }

    /// Todos os clientes com o mesmo telefone (comparação só por dígitos).
    pub async fn buscar_duplicados_por_telefone(
        &self,
        telefone: &str,
        ator: &Usuario,
    ) -> Result<Vec<Cliente>, AppError> {
        if !pode(ator.cargo, Recurso::Clientes, Acao::Criar) && !pode(ator.cargo, Recurso::Clientes, Acao::Ler) {
            return Err(AppError::PermissionDenied);
        }

        let digitos = normalizar_telefone(telefone);
        if digitos.is_empty() {
            return Err(AppError::InvalidInput("Informe um telefone para a busca.".into()));
        }
        self.repo.find_by_telefone(&self.pool, &digitos).await
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn criar(&self, payload: &CreateClientePayload, ator: &Usuario) -> Result<ResultadoCriacao, AppError> {
        Self::exigir(ator, Acao::Criar)?;

        let digitos = normalizar_telefone(&payload.telefone);
        if digitos.is_empty() {
            return Err(AppError::InvalidInput("O telefone é obrigatório.".into()));
        }

        let mut tx = self.pool.begin().await?;

        let duplicatas = self.repo.find_by_telefone(&mut *tx, &digitos).await?;
        if !duplicatas.is_empty() && !payload.force {
            tracing::info!(
                "Cadastro de '{}' barrado: {} cliente(s) com o mesmo telefone",
                payload.nome,
                duplicatas.len()
            );
            return Ok(ResultadoCriacao::Duplicado(duplicatas));
        }

        let cliente = self.repo.create_cliente(&mut *tx, payload, ator.id).await?;

        self.eventos
            .append(
                &mut *tx,
                cliente.id,
                &NovoEvento::criado(cliente.status),
                Some(ator.id),
                Some(&ator.nome),
            )
            .await?;

        let descricao = if duplicatas.is_empty() {
            format!("Cliente \"{}\" cadastrado", cliente.nome)
        } else {
            format!("Cliente \"{}\" cadastrado com telefone duplicado (forçado)", cliente.nome)
        };
        self.auditoria
            .registrar(
                &mut *tx,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: Some(cliente.id),
                    acao: acao::CRIAR,
                    modulo: modulo::CLIENTES,
                    descricao,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!("✓ Cliente {} cadastrado por {}", cliente.id, ator.username);
        Ok(ResultadoCriacao::Criado(cliente))
    }

    pub async fn atualizar(
        &self,
        id: i64,
        patch: &UpdateClientePayload,
        ator: &Usuario,
    ) -> Result<Cliente, AppError> {
        Self::exigir(ator, Acao::Atualizar)?;

        let mut tx = self.pool.begin().await?;

        let atual = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        if !Self::no_escopo(ator, &atual) {
            tracing::warn!("{} tentou editar o cliente {} fora do seu escopo", ator.username, id);
            return Err(AppError::OutOfScope);
        }

        let plano = planejar_atualizacao(&atual, patch, ator, Self::agora());
        if plano.restritos_ignorados {
            tracing::debug!("Campos restritos ignorados na edição do cliente {} por {}", id, ator.username);
        }

        let cliente = self.repo.update_cliente(&mut *tx, &plano.cliente).await?;

        for evento in &plano.eventos {
            self.eventos
                .append(&mut *tx, cliente.id, evento, Some(ator.id), Some(&ator.nome))
                .await?;
        }

        let descricao = match plano.transicao {
            Some((de, para)) => format!(
                "Status do cliente \"{}\" alterado de \"{}\" para \"{}\"",
                cliente.nome,
                de.rotulo(),
                para.rotulo()
            ),
            None => format!("Cliente \"{}\" atualizado", cliente.nome),
        };
        self.auditoria
            .registrar(
                &mut *tx,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: Some(cliente.id),
                    acao: acao::EDITAR,
                    modulo: modulo::CLIENTES,
                    descricao,
                },
            )
            .await?;

        tx.commit().await?;
        Ok(cliente)
    }

    pub async fn deletar(&self, id: i64, ator: &Usuario) -> Result<(), AppError> {
        Self::exigir(ator, Acao::Deletar)?;

        let mut tx = self.pool.begin().await?;

        let cliente = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        // Corretor só exclui o que ele mesmo cadastrou
        if ator.cargo.is_corretor() && cliente.usuario_id != Some(ator.id) {
            tracing::warn!("{} tentou excluir o cliente {} sem ser o autor do cadastro", ator.username, id);
            return Err(AppError::OutOfScope);
        }

        self.repo.delete_cliente(&mut *tx, id).await?;
        self.auditoria
            .registrar(
                &mut *tx,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: Some(id),
                    acao: acao::DELETAR,
                    modulo: modulo::CLIENTES,
                    descricao: format!("Cliente \"{}\" excluído", cliente.nome),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!("Cliente {} excluído por {}", id, ator.username);
        Ok(())
    }

    /// Atribui o cliente a um corretor ativo, ou remove a atribuição quando `corretor_id` é `None`.
    pub async fn atribuir(
        &self,
        id: i64,
        corretor_id: Option<i64>,
        ator: &Usuario,
    ) -> Result<Cliente, AppError> {
        if !ator.cargo.is_admin() {
            tracing::warn!("{} tentou atribuir o cliente {} sem ser admin", ator.username, id);
            return Err(AppError::PermissionDenied);
        }

        let mut tx = self.pool.begin().await?;

        let mut cliente = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        let (evento, log_acao, descricao) = match corretor_id {
            Some(corretor_id) => {
                let corretor = self
                    .usuarios
                    .find_by_id(&mut *tx, corretor_id)
                    .await?
                    .filter(|u| u.cargo == Cargo::Corretor && u.status == StatusUsuario::Ativo)
                    .ok_or_else(|| AppError::InvalidInput("O usuário informado não é um corretor ativo.".into()))?;

                let evento = NovoEvento::atribuido(cliente.atribuido_a_nome.clone(), corretor.nome.clone());
                cliente.atribuido_a = Some(corretor.id);
                cliente.atribuido_a_nome = Some(corretor.nome.clone());
                cliente.data_atribuicao = Some(Self::agora());

                (
                    evento,
                    acao::ATRIBUIR_CLIENTE,
                    format!("Cliente \"{}\" atribuído ao corretor \"{}\"", cliente.nome, corretor.nome),
                )
            }
            None => {
                if cliente.atribuido_a.is_none() {
                    return Ok(cliente);
                }
                let anterior = cliente.atribuido_a_nome.take();
                cliente.atribuido_a = None;
                cliente.data_atribuicao = None;

                let descricao = format!(
                    "Atribuição do cliente \"{}\" removida (corretor anterior: \"{}\")",
                    cliente.nome,
                    anterior.as_deref().unwrap_or("-")
                );
                (NovoEvento::desatribuido(anterior), acao::DESATRIBUIR_CLIENTE, descricao)
            }
        };

        let cliente = self.repo.update_cliente(&mut *tx, &cliente).await?;
        self.eventos
            .append(&mut *tx, cliente.id, &evento, Some(ator.id), Some(&ator.nome))
            .await?;
        self.auditoria
            .registrar(
                &mut *tx,
                &NovoLog {
                    usuario_id: Some(ator.id),
                    cliente_id: Some(cliente.id),
                    acao: log_acao,
                    modulo: modulo::CLIENTES,
                    descricao,
                },
            )
            .await?;

        tx.commit().await?;
        Ok(cliente)
    }

    // =========================================================================
    //  AGENDAMENTOS
    // =========================================================================

    pub async fn listar_agendamentos(&self, cliente_id: i64, ator: &Usuario) -> Result<Vec<Agendamento>, AppError> {
        self.obter(cliente_id, ator).await?;
        self.agendamentos.list_by_cliente(cliente_id).await
    }

    pub async fn criar_agendamento(
        &self,
        cliente_id: i64,
        payload: &CreateAgendamentoPayload,
        ator: &Usuario,
    ) -> Result<Agendamento, AppError> {
        Self::exigir(ator, Acao::Atualizar)?;
        self.carregar_no_escopo(cliente_id, ator).await?;
        self.agendamentos.create(cliente_id, ator.id, payload).await
    }

    // =========================================================================
    //  MANUTENÇÃO: MESCLAGEM DE DUPLICADOS POR NOME
    // =========================================================================

    pub async fn listar_grupos_duplicados(&self) -> Result<Vec<GrupoNome>, AppError> {
        self.repo.list_grupos_por_nome().await
    }

    /// Mantém o cadastro mais antigo do grupo, repassa as referências dos demais para ele e
    /// exclui o resto. Tudo ou nada.
    pub async fn mesclar_grupo_duplicado(
        &self,
        ids: &[i64],
        ator_id: Option<i64>,
    ) -> Result<ResultadoMesclagem, AppError> {
        // Id repetido não pode reaparecer entre os removidos
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() < 2 {
            return Err(AppError::InvalidInput("Um grupo de duplicados precisa de ao menos dois clientes.".into()));
        }

        let mut tx = self.pool.begin().await?;

        let mut clientes = Vec::with_capacity(ids.len());
        for id in &ids {
            let cliente = self
                .repo
                .find_by_id(&mut *tx, *id)
                .await?
                .ok_or(AppError::ClientNotFound)?;
            clientes.push(cliente);
        }

        let nome_grupo = clientes[0].nome.trim().to_lowercase();
        if clientes.iter().any(|c| c.nome.trim().to_lowercase() != nome_grupo) {
            return Err(AppError::InvalidInput("Os clientes do grupo não têm o mesmo nome.".into()));
        }

        clientes.sort_by_key(|c| (c.criado_em, c.id));
        let mantido = clientes.remove(0);

        let mut removidos = Vec::with_capacity(clientes.len());
        let mut referencias_movidas = 0;
        for duplicado in &clientes {
            for (tabela, coluna) in REFERENCIAS_CLIENTE {
                referencias_movidas += self
                    .repo
                    .repontar_referencia(&mut *tx, tabela, coluna, duplicado.id, mantido.id)
                    .await?;
            }
            self.repo.delete_cliente(&mut *tx, duplicado.id).await?;
            removidos.push(duplicado.id);
        }

        self.auditoria
            .registrar(
                &mut *tx,
                &NovoLog {
                    usuario_id: ator_id,
                    cliente_id: Some(mantido.id),
                    acao: acao::MESCLAR,
                    modulo: modulo::CLIENTES,
                    descricao: format!(
                        "Duplicados de \"{}\" mesclados no cliente {} (removidos: {:?})",
                        mantido.nome, mantido.id, removidos
                    ),
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Grupo '{}' mesclado: mantido {}, removidos {:?}, {} referência(s) movida(s)",
            mantido.nome,
            mantido.id,
            removidos,
            referencias_movidas
        );

        Ok(ResultadoMesclagem {
            mantido_id: mantido.id,
            nome: mantido.nome,
            removidos,
            referencias_movidas,
        })
    }

    /// Mescla todos os grupos de nomes repetidos. Cada grupo é uma transação própria.
    pub async fn mesclar_todos(&self, ator_id: Option<i64>) -> Result<Vec<ResultadoMesclagem>, AppError> {
        let mut resultados = Vec::new();
        for grupo in self.repo.list_grupos_por_nome().await? {
            let ids: Vec<i64> = self
                .repo
                .list_por_nome(&grupo.nome)
                .await?
                .iter()
                .map(|c| c.id)
                .collect();
            if ids.len() < 2 {
                continue;
            }
            resultados.push(self.mesclar_grupo_duplicado(&ids, ator_id).await?);
        }
        Ok(resultados)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cliente::Interesse;
    use chrono::NaiveDate;

    fn data(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    fn usuario(id: i64, nome: &str, cargo: Cargo) -> Usuario {
        Usuario {
            id,
            nome: nome.into(),
            email: format!("{}@teste.com", id),
            username: format!("user{}", id),
            senha: String::new(),
            cargo,
            status: StatusUsuario::Ativo,
            telefone: None,
            departamento: None,
            ultimo_acesso: None,
            criado_em: data(1),
            atualizado_em: data(1),
        }
    }

    fn cliente(status: StatusCliente) -> Cliente {
        Cliente {
            id: 10,
            nome: "Maria".into(),
            telefone: "(11) 98765-4321".into(),
            email: None,
            interesse: Interesse::Comprar,
            valor: Some(100_000.0),
            status,
            observacoes: None,
            data_atribuicao: Some(data(2)),
            usuario_id: Some(1),
            atribuido_a: Some(5),
            atribuido_a_nome: Some("Carlos".into()),
            primeiro_contato: None,
            ultimo_contato: None,
            criado_em: data(1),
            atualizado_em: data(1),
        }
    }

    #[test]
    fn normaliza_telefone_para_digitos() {
        assert_eq!(normalizar_telefone("(11) 98765-4321"), "11987654321");
        assert_eq!(normalizar_telefone("+55 11.98765.4321"), "5511987654321");
        assert_eq!(normalizar_telefone("sem número"), "");
    }

    #[test]
    fn finalizar_limpa_atribuicao() {
        let atual = cliente(StatusCliente::EmAtendimento);
        let patch = UpdateClientePayload {
            status: Some(StatusCliente::Finalizado),
            ..Default::default()
        };
        let plano = planejar_atualizacao(&atual, &patch, &usuario(2, "Ana", Cargo::Admin), data(3));

        assert_eq!(plano.cliente.status, StatusCliente::Finalizado);
        assert_eq!(plano.cliente.atribuido_a, None);
        assert_eq!(plano.cliente.atribuido_a_nome, None);
        assert_eq!(plano.cliente.data_atribuicao, None);
        assert_eq!(
            plano.eventos,
            vec![
                NovoEvento::status_alterado(StatusCliente::EmAtendimento, StatusCliente::Finalizado),
                NovoEvento::desatribuido(Some("Carlos".into())),
            ]
        );
    }

    #[test]
    fn reativacao_por_corretor_atribui_ao_ator() {
        let mut atual = cliente(StatusCliente::Finalizado);
        atual.atribuido_a = None;
        atual.atribuido_a_nome = None;
        atual.data_atribuicao = None;

        let patch = UpdateClientePayload {
            status: Some(StatusCliente::EmAtendimento),
            ..Default::default()
        };
        let corretor = usuario(7, "Bruno", Cargo::Corretor);
        let plano = planejar_atualizacao(&atual, &patch, &corretor, data(4));

        assert_eq!(plano.cliente.atribuido_a, Some(7));
        assert_eq!(plano.cliente.atribuido_a_nome.as_deref(), Some("Bruno"));
        assert_eq!(plano.cliente.data_atribuicao, Some(data(4)));
        assert_eq!(plano.eventos.len(), 2);
    }

    #[test]
    fn reativacao_por_admin_nao_mexe_na_atribuicao() {
        let atual = cliente(StatusCliente::Finalizado);
        let patch = UpdateClientePayload {
            status: Some(StatusCliente::Novo),
            ..Default::default()
        };
        let plano = planejar_atualizacao(&atual, &patch, &usuario(2, "Ana", Cargo::HeadAdmin), data(4));

        assert_eq!(plano.cliente.atribuido_a, atual.atribuido_a);
        assert_eq!(plano.cliente.data_atribuicao, atual.data_atribuicao);
        assert_eq!(plano.transicao, Some((StatusCliente::Finalizado, StatusCliente::Novo)));
    }

    #[test]
    fn corretor_nao_altera_campos_restritos() {
        let atual = cliente(StatusCliente::Novo);
        let patch = UpdateClientePayload {
            nome: Some("Outro Nome".into()),
            telefone: Some("11999990000".into()),
            valor: Some(None),
            observacoes: Some(Some("ligar amanhã".into())),
            ..Default::default()
        };
        let plano = planejar_atualizacao(&atual, &patch, &usuario(5, "Carlos", Cargo::Corretor), data(3));

        assert!(plano.restritos_ignorados);
        assert_eq!(plano.cliente.nome, "Maria");
        assert_eq!(plano.cliente.telefone, atual.telefone);
        assert_eq!(plano.cliente.valor, None);
        assert_eq!(plano.cliente.observacoes.as_deref(), Some("ligar amanhã"));
        assert!(plano.eventos.is_empty());
        assert_eq!(plano.transicao, None);
    }

    #[test]
    fn mesmo_status_nao_gera_evento() {
        let atual = cliente(StatusCliente::Prioridade);
        let patch = UpdateClientePayload {
            status: Some(StatusCliente::Prioridade),
            ..Default::default()
        };
        let plano = planejar_atualizacao(&atual, &patch, &usuario(2, "Ana", Cargo::Admin), data(3));
        assert!(plano.eventos.is_empty());
        assert!(plano.transicao.is_none());
    }
}
