pub mod user_repo;
pub use user_repo::UserRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod evento_repo;
pub use evento_repo::EventoRepository;
pub mod auditoria_repo;
pub use auditoria_repo::AuditoriaRepository;
pub mod agendamento_repo;
pub use agendamento_repo::AgendamentoRepository;
pub mod link_repo;
pub use link_repo::LinkRepository;
pub mod captacao_repo;
pub use captacao_repo::CaptacaoRepository;

pub mod seed;
