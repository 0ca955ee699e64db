mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_head_admin_semeado() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "head", "password": "123456" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["usuario"]["cargo"], "head-admin");
    assert_eq!(body["usuario"]["username"], "head");
    assert!(body["usuario"].get("senha").is_none());

    // Login fica registrado na auditoria e no último acesso
    let logins = app
        .contar("SELECT COUNT(*) FROM logs_auditoria WHERE acao = 'LOGIN'")
        .await;
    assert_eq!(logins, 1);
    let com_acesso = app
        .contar("SELECT COUNT(*) FROM usuarios WHERE username = 'head' AND ultimo_acesso IS NOT NULL")
        .await;
    assert_eq!(com_acesso, 1);
}

#[tokio::test]
async fn test_login_com_senha_errada_retorna_401() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "head", "password": "errada" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Usuário ou senha inválidos.");
}

#[tokio::test]
async fn test_clientes_sem_authorization_retorna_401() {
    let app = TestApp::new().await;

    let (status, _) = app.request("GET", "/api/clientes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("GET", "/api/clientes", Some("token-invalido"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Esquema diferente de Bearer também é 401
    let req = Request::builder()
        .method("GET")
        .uri("/api/clientes")
        .header(header::AUTHORIZATION, "Basic aGVhZDoxMjM0NTY=")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mensagem_de_erro_em_ingles() {
    let app = TestApp::new().await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/clientes")
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Missing or invalid authentication token.");
}

#[tokio::test]
async fn test_register_cria_corretor_e_recusa_username_repetido() {
    let app = TestApp::new().await;

    let payload = json!({
        "nome": "Maria Corretora",
        "email": "maria@concretizza.com",
        "username": "maria",
        "password": "segura123"
    });
    let (status, body) = app
        .request("POST", "/api/auth/register", None, Some(payload.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().is_some());

    let token = app.login("maria", "segura123").await;
    let (status, me) = app.request("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["cargo"], "corretor");
    assert_eq!(me["status"], "ativo");

    // Mesmo username, e-mail diferente
    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "nome": "Outra Maria",
                "email": "outra@concretizza.com",
                "username": "maria",
                "password": "segura123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Este nome de usuário já está em uso.");

    // E-mail repetido
    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "nome": "Terceira",
                "email": "maria@concretizza.com",
                "username": "terceira",
                "password": "segura123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Este e-mail já está em uso.");
}

#[tokio::test]
async fn test_register_valida_campos() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "nome": "X",
                "email": "nao-e-email",
                "username": "xy",
                "password": "123"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["email"].is_array());
    assert!(body["details"]["password"].is_array());
}

#[tokio::test]
async fn test_usuario_inativo_nao_loga() {
    let app = TestApp::new().await;
    let head = app.login("head", "123456").await;
    let (corretor_id, _) = app.criar_corretor("inativo").await;

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/usuarios/{}", corretor_id),
            Some(&head),
            Some(json!({ "status": "inativo" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "inativo", "password": "senha123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_e_publico() {
    let app = TestApp::new().await;
    let (status, body) = app.request("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}
