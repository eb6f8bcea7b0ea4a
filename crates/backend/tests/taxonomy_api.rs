use backend::routes::build_app;
use backend::shared::data::db::{install, open_in_memory};
use serde_json::{json, Value};
use std::path::Path;
use tokio::net::TcpListener;

async fn spawn_app() -> String {
    install(open_in_memory().await.unwrap()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_app(Path::new("static")))
            .await
            .unwrap();
    });
    format!("http://{}", addr)
}

async fn body(resp: reqwest::Response) -> Value {
    resp.json::<Value>().await.unwrap()
}

// One scenario per file: the connection is process-wide
#[tokio::test]
async fn taxonomy_endpoints() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let health = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "ok");

    // --- categories ---
    let resp = client
        .post(format!("{base}/api/categorias"))
        .json(&json!({"nome": "  Cidades ", "tipo": "cidade"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created = body(resp).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["nome"], "Cidades");
    assert_eq!(created["data"]["ativo"], true);
    let cities = created["data"]["id"].as_i64().unwrap();

    let resp = client
        .post(format!("{base}/api/categorias"))
        .json(&json!({"nome": "Cidades"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let conflict = body(resp).await;
    assert_eq!(conflict["success"], false);
    assert!(conflict["message"].as_str().unwrap().contains("já existe"));

    let resp = client
        .post(format!("{base}/api/categorias"))
        .json(&json!({"nome": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{base}/api/categorias"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(body(resp).await["success"], false);

    let resp = client
        .get(format!("{base}/api/categorias/9999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .get(format!("{base}/api/categorias/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // --- subcategories ---
    let resp = client
        .post(format!("{base}/api/subcategorias"))
        .json(&json!({"nome": "Campinas", "categoria_id": cities}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let sub = body(resp).await;
    assert_eq!(sub["data"]["categoria_nome"], "Cidades");
    let campinas = sub["data"]["id"].as_i64().unwrap();

    let resp = client
        .get(format!("{base}/api/subcategorias/{campinas}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched = body(resp).await;
    assert_eq!(fetched["data"]["nome"], "Campinas");
    assert_eq!(fetched["data"]["categoria_id"], cities);

    let resp = client
        .get(format!("{base}/api/subcategorias/9999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{base}/api/subcategorias"))
        .json(&json!({"nome": "Campinas", "categoria_id": cities}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let resp = client
        .post(format!("{base}/api/subcategorias"))
        .json(&json!({"nome": "Santos", "categoria_id": 9999}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .put(format!("{base}/api/subcategorias/{campinas}"))
        .json(&json!({"descricao": "Interior de SP"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(body(resp).await["data"]["descricao"], "Interior de SP");

    let listed = body(
        client
            .get(format!("{base}/api/subcategorias?categoria_id={cities}"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let found = body(
        client
            .get(format!("{base}/api/subcategorias/buscar?q=camp"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(found["data"][0]["nome"], "Campinas");

    // nested listing only carries active children
    let categories = body(
        client
            .get(format!("{base}/api/categorias"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(categories["data"][0]["subcategorias"][0]["nome"], "Campinas");

    let resp = client
        .put(format!("{base}/api/subcategorias/{campinas}/arquivar"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let categories = body(
        client
            .get(format!("{base}/api/categorias"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert!(categories["data"][0]["subcategorias"]
        .as_array()
        .unwrap()
        .is_empty());

    // --- archive and search ---
    let resp = client
        .put(format!("{base}/api/categorias/{cities}/arquivar"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let found = body(
        client
            .get(format!("{base}/api/categorias/buscar?q=cid"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert!(found["data"].as_array().unwrap().is_empty());

    // --- seed ---
    let resp = client
        .post(format!("{base}/api/categorias/testdata"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let seeded = body(resp).await;
    assert!(seeded["data"]["categorias_criadas"].as_u64().unwrap() > 0);

    let again = body(
        client
            .post(format!("{base}/api/categorias/testdata"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(again["data"]["categorias_criadas"], 0);
}
