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

fn prospect(name: &str) -> Value {
    json!({
        "tipo_pessoa": "PF",
        "cpf_cnpj": "529.982.247-25",
        "nome_razao_social": name,
        "data_entrada": "2024-03-01",
        "nome_responsavel": "Carlos Lima",
        "celular": "(21) 3456-7890",
        "email": "carlos@example.com"
    })
}

async fn post(client: &reqwest::Client, url: String, payload: &Value) -> (u16, Value) {
    let resp = client.post(url).json(payload).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn get(client: &reqwest::Client, url: String) -> (u16, Value) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn put(client: &reqwest::Client, url: String, payload: Option<&Value>) -> (u16, Value) {
    let mut req = client.put(url);
    if let Some(p) = payload {
        req = req.json(p);
    }
    let resp = req.send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

// One scenario per file: the connection is process-wide
#[tokio::test]
async fn prospect_and_pendency_endpoints() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let (_, consultants) = post(
        &client,
        format!("{base}/api/categorias"),
        &json!({"nome": "Consultores", "tipo": "consultor"}),
    )
    .await;
    let consultant_id = consultants["data"]["id"].as_i64().unwrap();

    // --- prospects: numbering ---
    let (status, first) = post(&client, format!("{base}/api/prospeccoes"), &prospect("Cliente A")).await;
    assert_eq!(status, 201);
    assert_eq!(first["success"], true);
    assert_eq!(first["data"]["numero_contrato"], "0001");
    assert_eq!(first["data"]["arquivado"], false);
    let first_id = first["data"]["id"].as_i64().unwrap();

    let mut explicit = prospect("Cliente B");
    explicit["numero_contrato"] = json!("0010");
    explicit["consultor_id"] = json!(consultant_id);
    let (status, second) = post(&client, format!("{base}/api/prospeccoes"), &explicit).await;
    assert_eq!(status, 201);
    assert_eq!(second["data"]["numero_contrato"], "0010");
    assert_eq!(second["data"]["consultor"]["nome"], "Consultores");
    let second_id = second["data"]["id"].as_i64().unwrap();

    let (_, third) = post(&client, format!("{base}/api/prospeccoes"), &prospect("Cliente C")).await;
    assert_eq!(third["data"]["numero_contrato"], "0011");

    let (status, dup) = post(&client, format!("{base}/api/prospeccoes"), &explicit).await;
    assert_eq!(status, 409);
    assert_eq!(dup["success"], false);

    // --- prospects: validation ---
    let mut bad = prospect("Cliente D");
    bad["cpf_cnpj"] = json!("111.111.111-11");
    let (status, invalid) = post(&client, format!("{base}/api/prospeccoes"), &bad).await;
    assert_eq!(status, 400);
    assert_eq!(invalid["message"], "CPF inválido");

    let mut bad = prospect("Cliente D");
    bad["celular"] = json!("21 3456-7890");
    let (status, _) = post(&client, format!("{base}/api/prospeccoes"), &bad).await;
    assert_eq!(status, 400);

    let mut bad = prospect("Cliente D");
    bad["cidade_id"] = json!(9999);
    let (status, missing_ref) = post(&client, format!("{base}/api/prospeccoes"), &bad).await;
    assert_eq!(status, 400);
    assert!(missing_ref["message"].as_str().unwrap().contains("cidade_id"));

    // --- prospects: listing ---
    let (status, page) = get(&client, format!("{base}/api/prospeccoes?per_page=2")).await;
    assert_eq!(status, 200);
    assert_eq!(page["data"]["total"], 3);
    assert_eq!(page["data"]["pages"], 2);
    assert_eq!(page["data"]["current_page"], 1);
    assert_eq!(page["data"]["items"].as_array().unwrap().len(), 2);

    let (_, found) = get(&client, format!("{base}/api/prospeccoes?search=Cliente%20B")).await;
    assert_eq!(found["data"]["total"], 1);
    assert_eq!(found["data"]["items"][0]["id"], second_id);

    let (status, _) = get(&client, format!("{base}/api/prospeccoes?page=abc")).await;
    assert_eq!(status, 400);

    // --- prospects: update, archive, delete ---
    let (status, updated) = put(
        &client,
        format!("{base}/api/prospeccoes/{first_id}"),
        Some(&json!({"nome_responsavel": "Ana Paula", "consultor_id": consultant_id})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["data"]["nome_responsavel"], "Ana Paula");
    assert_eq!(updated["data"]["numero_contrato"], "0001");

    let (status, _) = put(
        &client,
        format!("{base}/api/prospeccoes/{first_id}"),
        Some(&json!({"email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = put(&client, format!("{base}/api/prospeccoes/{first_id}/arquivar"), None).await;
    assert_eq!(status, 200);
    let (_, active) = get(&client, format!("{base}/api/prospeccoes")).await;
    assert_eq!(active["data"]["total"], 2);
    let (_, archived) = get(&client, format!("{base}/api/prospeccoes?arquivado=true")).await;
    assert_eq!(archived["data"]["total"], 1);
    assert_eq!(archived["data"]["items"][0]["arquivado"], true);

    let (status, _) = put(&client, format!("{base}/api/prospeccoes/{first_id}/desarquivar"), None).await;
    assert_eq!(status, 200);

    let resp = client
        .delete(format!("{base}/api/prospeccoes/{second_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let (status, _) = get(&client, format!("{base}/api/prospeccoes/{second_id}")).await;
    assert_eq!(status, 404);
    let resp = client
        .delete(format!("{base}/api/prospeccoes/{second_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // numbers are never reused
    let (_, next) = post(&client, format!("{base}/api/prospeccoes"), &prospect("Cliente E")).await;
    assert_eq!(next["data"]["numero_contrato"], "0012");

    // --- pendencies ---
    let (status, pendency) = post(
        &client,
        format!("{base}/api/pendencias"),
        &json!({
            "data_prevista": "2024-04-10",
            "descricao": "Enviar proposta revisada",
            "colaborador_id": consultant_id
        }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(pendency["data"]["visto_gerencia"], false);
    assert_eq!(pendency["data"]["colaborador"]["nome"], "Consultores");
    let pendency_id = pendency["data"]["id"].as_i64().unwrap();

    let (status, _) = post(
        &client,
        format!("{base}/api/pendencias"),
        &json!({"data_prevista": "2024-04-01", "descricao": "Ligar para o cliente"}),
    )
    .await;
    assert_eq!(status, 201);

    let (status, _) = post(
        &client,
        format!("{base}/api/pendencias"),
        &json!({"descricao": "sem data"}),
    )
    .await;
    assert_eq!(status, 400);

    // earliest due date first
    let (_, list) = get(&client, format!("{base}/api/pendencias")).await;
    assert_eq!(list["data"]["total"], 2);
    assert_eq!(list["data"]["items"][0]["data_prevista"], "2024-04-01");

    let (status, seen) = put(
        &client,
        format!("{base}/api/pendencias/{pendency_id}"),
        Some(&json!({"visto_gerencia": true, "data_finalizacao": "2024-04-09"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(seen["data"]["visto_gerencia"], true);
    assert_eq!(seen["data"]["data_finalizacao"], "2024-04-09");

    let (status, _) = put(&client, format!("{base}/api/pendencias/{pendency_id}/arquivar"), None).await;
    assert_eq!(status, 200);
    let (_, list) = get(&client, format!("{base}/api/pendencias?search=proposta")).await;
    assert_eq!(list["data"]["total"], 0);
    let (_, list) = get(&client, format!("{base}/api/pendencias?search=proposta&arquivado=true")).await;
    assert_eq!(list["data"]["total"], 1);

    let (status, _) = get(&client, format!("{base}/api/pendencias/9999")).await;
    assert_eq!(status, 404);
}
