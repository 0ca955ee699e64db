use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use concretizza::{
    common::db_utils,
    config::{AppState, Config},
    criar_router,
    db::{seed::seed_usuarios_padrao, UserRepository},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

// Cost mínimo do bcrypt: os testes não precisam de hash lento
const BCRYPT_COST_TESTE: u32 = 4;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let pool = db_utils::pool_em_memoria()
            .await
            .expect("Failed to create in-memory test db");

        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "segredo-de-teste".to_string(),
            port: 0,
            seed_usuarios: true,
            jwt_expiracao_horas: 1,
            bcrypt_cost: BCRYPT_COST_TESTE,
        };

        seed_usuarios_padrao(&UserRepository::new(pool.clone()), BCRYPT_COST_TESTE)
            .await
            .expect("Failed to seed default users");

        let state = AppState::from_pool(pool.clone(), &config);
        let router = criar_router(state.clone());

        Self { router, pool, state }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;

        if status != StatusCode::OK {
            panic!("Login failed in test helper: status {} body {}", status, body);
        }
        body["token"].as_str().expect("No token in body").to_string()
    }

    /// Cria um corretor ativo (via head-admin) e devolve (id, token).
    pub async fn criar_corretor(&self, username: &str) -> (i64, String) {
        let head = self.login("head", "123456").await;
        let (status, body) = self
            .request(
                "POST",
                "/api/usuarios",
                Some(&head),
                Some(json!({
                    "nome": format!("Corretor {}", username),
                    "email": format!("{}@concretizza.com", username),
                    "username": username,
                    "password": "senha123",
                    "cargo": "corretor"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "corretor não criado: {}", body);

        let id = body["id"].as_i64().unwrap();
        let token = self.login(username, "senha123").await;
        (id, token)
    }

    /// Cadastra um cliente e devolve o id. Falha se a API não responder 201.
    pub async fn criar_cliente(&self, token: &str, nome: &str, telefone: &str) -> i64 {
        let (status, body) = self
            .request(
                "POST",
                "/api/clientes",
                Some(token),
                Some(json!({
                    "nome": nome,
                    "telefone": telefone,
                    "interesse": "comprar",
                    "status": "novo",
                    "valor": 250000.0
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "cliente não criado: {}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn contar(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
