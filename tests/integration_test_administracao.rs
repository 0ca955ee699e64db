mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

fn novo_usuario(username: &str, cargo: &str) -> serde_json::Value {
    json!({
        "nome": format!("Usuário {}", username),
        "email": format!("{}@concretizza.com", username),
        "username": username,
        "password": "senha123",
        "cargo": cargo
    })
}

#[tokio::test]
async fn test_admin_nao_gerencia_administradores() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "123456").await;
    let head = app.login("head", "123456").await;

    for cargo in ["admin", "head-admin"] {
        let (status, _) = app
            .request("POST", "/api/usuarios", Some(&admin), Some(novo_usuario("novoadm", cargo)))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "admin criou cargo {}", cargo);
    }

    let head_id: i64 = sqlx::query_scalar("SELECT id FROM usuarios WHERE username = 'head'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/usuarios/{}", head_id),
            Some(&admin),
            Some(json!({ "nome": "Renomeado" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Apenas o head-admin pode gerenciar contas de administradores."
    );

    // Head-admin pode
    let (status, body) = app
        .request("POST", "/api/usuarios", Some(&head), Some(novo_usuario("novoadm", "admin")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cargo"], "admin");

    // Admin comum cria cargos operacionais
    let (status, _) = app
        .request("POST", "/api/usuarios", Some(&admin), Some(novo_usuario("novoed", "editor")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_ninguem_se_exclui() {
    let app = TestApp::new().await;
    let head = app.login("head", "123456").await;

    let (_, me) = app.request("GET", "/api/auth/me", Some(&head), None).await;
    let head_id = me["id"].as_i64().unwrap();

    let (status, body) = app
        .request("DELETE", &format!("/api/usuarios/{}", head_id), Some(&head), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Você não pode excluir a sua própria conta.");
    assert_eq!(
        app.contar("SELECT COUNT(*) FROM usuarios WHERE username = 'head'")
            .await,
        1
    );
}

#[tokio::test]
async fn test_admin_nao_muda_o_proprio_cargo() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "123456").await;
    let (_, me) = app.request("GET", "/api/auth/me", Some(&admin), None).await;
    let admin_id = me["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/usuarios/{}", admin_id),
            Some(&admin),
            Some(json!({ "cargo": "head-admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Dados cadastrais próprios podem mudar
    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/usuarios/{}", admin_id),
            Some(&admin),
            Some(json!({ "telefone": "11999990000" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["telefone"], "11999990000");
    assert_eq!(body["cargo"], "admin");
}

#[tokio::test]
async fn test_usuarios_so_para_administradores() {
    let app = TestApp::new().await;
    let (corretor_id, corretor) = app.criar_corretor("zeca").await;
    let viewer = app.login("viewer", "123456").await;

    let (status, _) = app.request("GET", "/api/usuarios", Some(&corretor), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Lista de corretores ativos é aberta ao corretor
    let (status, body) = app.request("GET", "/api/corretores", Some(&corretor), None).await;
    assert_eq!(status, StatusCode::OK);
    let corretores = body.as_array().unwrap();
    assert_eq!(corretores.len(), 1);
    assert_eq!(corretores[0]["id"], corretor_id);

    let (status, _) = app.request("GET", "/api/corretores", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_links_de_corretores() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "123456").await;
    let (ana_id, ana) = app.criar_corretor("ana").await;
    let (beto_id, beto) = app.criar_corretor("beto").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/links",
            Some(&admin),
            Some(json!({
                "corretor_ids": [ana_id, ana_id],
                "titulo": "Tabela de lançamentos",
                "url": "https://drive.example.com/tabela.pdf"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["titulo"], "Tabela de lançamentos");
    assert_eq!(body["corretores"].as_array().unwrap().len(), 1);
    let link_id = body["id"].as_i64().unwrap();

    let (status, body) = app.request("GET", "/api/corretores/links", Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], link_id);

    let (status, body) = app.request("GET", "/api/corretores/links", Some(&beto), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // Corretor não consulta os links de outro
    let (status, _) = app
        .request("GET", &format!("/api/corretores/{}/links", ana_id), Some(&beto), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Nem edita link criado pelo admin
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/corretores/links/{}", link_id),
            Some(&ana),
            Some(json!({ "titulo": "Outro" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reatribuição pelo admin troca o conjunto de corretores
    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/corretores/links/{}", link_id),
            Some(&admin),
            Some(json!({ "corretor_id": beto_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["corretores"][0]["id"], beto_id);

    let (status, _) = app
        .request("DELETE", &format!("/api/corretores/links/{}", link_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.contar("SELECT COUNT(*) FROM link_assignments").await, 0);
}

#[tokio::test]
async fn test_link_invalido() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "123456").await;
    let (ana_id, ana) = app.criar_corretor("ana").await;
    let (beto_id, _) = app.criar_corretor("beto").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/links",
            Some(&admin),
            Some(json!({ "corretor_ids": [ana_id], "titulo": "Sem URL", "url": "nao-e-url" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["url"].is_array());

    let (status, _) = app
        .request(
            "POST",
            "/api/links",
            Some(&admin),
            Some(json!({ "corretor_ids": [], "titulo": "Ninguém", "url": "https://x.example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Corretor só cria link para si mesmo
    let (status, _) = app
        .request(
            "POST",
            "/api/links",
            Some(&ana),
            Some(json!({ "corretor_ids": [beto_id], "titulo": "Meu", "url": "https://x.example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            "POST",
            "/api/links",
            Some(&ana),
            Some(json!({ "corretor_ids": [ana_id], "titulo": "Meu", "url": "https://x.example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.contar("SELECT COUNT(*) FROM corretor_links").await, 1);
}

#[tokio::test]
async fn test_captacoes_ordenadas_por_prioridade() {
    let app = TestApp::new().await;
    let admin = app.login("admin", "123456").await;
    let (_, corretor) = app.criar_corretor("duda").await;

    for (titulo, prioridade) in [("Casa", "media"), ("Sala", "imediata"), ("Loja", "alta"), ("Lote", "imediata")] {
        let (status, _) = app
            .request(
                "POST",
                "/api/captacoes",
                Some(&admin),
                Some(json!({ "titulo": titulo, "regiao": "Centro", "prioridade": prioridade })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = app
        .request(
            "POST",
            "/api/captacoes",
            Some(&corretor),
            Some(json!({ "titulo": "Negada", "regiao": "Centro", "prioridade": "alta" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request("GET", "/api/captacoes", Some(&corretor), None).await;
    assert_eq!(status, StatusCode::OK);
    let titulos: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["titulo"].as_str().unwrap())
        .collect();
    // Mesma prioridade: mais recente primeiro
    assert_eq!(titulos, vec!["Lote", "Sala", "Loja", "Casa"]);
}

#[tokio::test]
async fn test_logs_de_auditoria() {
    let app = TestApp::new().await;
    let head = app.login("head", "123456").await;
    let (_, corretor) = app.criar_corretor("nina").await;
    app.criar_cliente(&corretor, "Com Log", "11955550000").await;

    let (status, _) = app.request("GET", "/api/logs", Some(&corretor), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request("GET", "/api/logs", Some(&head), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());

    let (status, body) = app
        .request("GET", "/api/logs?modulo=CLIENTES", Some(&head), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let logs = body.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["acao"], "CRIAR");
    assert_eq!(logs[0]["usuario_nome"], "Corretor nina");
}
