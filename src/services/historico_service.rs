// src/services/historico_service.rs
//
// Históricos de atribuição e de status, montados a partir de `cliente_eventos`.

use crate::{
    common::error::AppError,
    db::EventoRepository,
    models::{
        auditoria::acao,
        auth::Usuario,
        cliente::{Cliente, StatusCliente},
        historico::{
            EventoCliente, HistoricoAtribuicoes, HistoricoStatus, ItemAtribuicao, ItemStatus,
            PrimeiraAtribuicao, TipoEvento,
        },
    },
    services::cliente_service::ClienteService,
};

fn descrever_atribuicao(evento: &EventoCliente) -> String {
    match (evento.tipo, evento.valor_anterior.as_deref(), evento.valor_novo.as_deref()) {
        (TipoEvento::Atribuido, Some(anterior), Some(novo)) => {
            format!("Cliente reatribuído de \"{}\" para \"{}\"", anterior, novo)
        }
        (TipoEvento::Atribuido, None, Some(novo)) => format!("Cliente atribuído a \"{}\"", novo),
        (TipoEvento::Desatribuido, Some(anterior), _) => {
            format!("Atribuição removida (corretor anterior: \"{}\")", anterior)
        }
        _ => "Atribuição removida".to_string(),
    }
}

/// `eventos` precisa estar em ordem de sequência.
pub fn montar_historico_atribuicoes(cliente: &Cliente, eventos: &[EventoCliente]) -> HistoricoAtribuicoes {
    let data_cadastro = eventos
        .iter()
        .find(|e| e.tipo == TipoEvento::Criado)
        .map(|e| e.criado_em)
        .unwrap_or(cliente.criado_em);

    let mut movimentos = eventos
        .iter()
        .filter(|e| matches!(e.tipo, TipoEvento::Atribuido | TipoEvento::Desatribuido))
        .skip_while(|e| e.tipo != TipoEvento::Atribuido);

    let primeira_atribuicao = match movimentos.next() {
        Some(primeiro) => Some(PrimeiraAtribuicao {
            corretor_nome: primeiro.valor_novo.clone().unwrap_or_default(),
            atribuido_por: primeiro.ator_nome.clone(),
            data: primeiro.criado_em,
        }),
        // Cadastro antigo, atribuído antes de existir a tabela de eventos
        None => match (&cliente.atribuido_a_nome, cliente.data_atribuicao) {
            (Some(nome), Some(data)) => Some(PrimeiraAtribuicao {
                corretor_nome: nome.clone(),
                atribuido_por: None,
                data,
            }),
            _ => None,
        },
    };

    let atribuicoes = movimentos
        .map(|e| ItemAtribuicao {
            acao: match e.tipo {
                TipoEvento::Atribuido => acao::ATRIBUIR_CLIENTE,
                _ => acao::DESATRIBUIR_CLIENTE,
            }
            .to_string(),
            descricao: descrever_atribuicao(e),
            usuario_logado: e.ator_nome.clone(),
            data: e.criado_em,
        })
        .collect();

    HistoricoAtribuicoes {
        cliente_id: cliente.id,
        cliente_nome: cliente.nome.clone(),
        data_cadastro,
        primeira_atribuicao,
        atribuicoes,
    }
}

/// `eventos` precisa estar em ordem de sequência.
pub fn montar_historico_status(cliente: &Cliente, eventos: &[EventoCliente]) -> HistoricoStatus {
    let criado = eventos.iter().find(|e| e.tipo == TipoEvento::Criado);

    let transicoes: Vec<(&EventoCliente, Option<StatusCliente>, StatusCliente)> = eventos
        .iter()
        .filter(|e| e.tipo == TipoEvento::StatusAlterado)
        .filter_map(|e| {
            let para = e.valor_novo.as_deref().and_then(StatusCliente::parse_legado)?;
            let de = e.valor_anterior.as_deref().and_then(StatusCliente::parse_legado);
            Some((e, de, para))
        })
        .collect();

    // Sem evento de cadastro, o status inicial é o "de" da transição mais antiga ("novo" se ausente).
    let status_inicial = criado
        .and_then(|e| e.valor_novo.as_deref())
        .and_then(StatusCliente::parse_legado)
        .or_else(|| {
            transicoes
                .first()
                .map(|(_, de, _)| de.unwrap_or(StatusCliente::Novo))
        })
        .unwrap_or(cliente.status);

    let mut historico_status = Vec::with_capacity(transicoes.len() + 1);
    historico_status.push(ItemStatus {
        status_anterior: None,
        status: status_inicial,
        descricao: format!("Cliente cadastrado com status \"{}\"", status_inicial.rotulo()),
        usuario: criado.and_then(|e| e.ator_nome.clone()),
        data: criado.map(|e| e.criado_em).unwrap_or(cliente.criado_em),
    });

    for (evento, de, para) in transicoes {
        let descricao = format!(
            "Status alterado de \"{}\" para \"{}\"",
            de.map(StatusCliente::rotulo).unwrap_or("N/A"),
            para.rotulo()
        );
        historico_status.push(ItemStatus {
            status_anterior: de,
            status: para,
            descricao,
            usuario: evento.ator_nome.clone(),
            data: evento.criado_em,
        });
    }

    HistoricoStatus {
        cliente_id: cliente.id,
        cliente_nome: cliente.nome.clone(),
        status_atual: cliente.status,
        cliente_criado_em: cliente.criado_em,
        status_inicial,
        historico_status,
    }
}

#[derive(Clone)]
pub struct HistoricoService {
    clientes: ClienteService,
    eventos: EventoRepository,
}

impl HistoricoService {
    pub fn new(clientes: ClienteService, eventos: EventoRepository) -> Self {
        Self { clientes, eventos }
    }

    pub async fn historico_atribuicoes(&self, cliente_id: i64, ator: &Usuario) -> Result<HistoricoAtribuicoes, AppError> {
        let cliente = self.clientes.obter(cliente_id, ator).await?;
        let eventos = self
            .eventos
            .list_by_cliente(
                cliente_id,
                &[TipoEvento::Criado, TipoEvento::Atribuido, TipoEvento::Desatribuido],
            )
            .await?;
        Ok(montar_historico_atribuicoes(&cliente, &eventos))
    }

    pub async fn historico_status(&self, cliente_id: i64, ator: &Usuario) -> Result<HistoricoStatus, AppError> {
        let cliente = self.clientes.obter(cliente_id, ator).await?;
        let eventos = self
            .eventos
            .list_by_cliente(cliente_id, &[TipoEvento::Criado, TipoEvento::StatusAlterado])
            .await?;
        Ok(montar_historico_status(&cliente, &eventos))
    }
}
