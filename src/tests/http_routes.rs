// End-to-end through the axum router: mock provider <- gateway <- router <- reqwest.

#[cfg(test)]
mod tests {
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::{json, Value};

    use crate::observability::metrics::get_metrics;
    use crate::server::server::{router, AppState};
    use crate::serving::ServingNormalizer;
    use crate::tests::common::{build_reqwest_client, mock_gateway, mock_settings, mock_token_endpoint, spawn_axum, API_PATH};

    async fn spawn_app(server: &MockServer) -> (tokio::task::JoinHandle<()>, String) {
        let mut settings = mock_settings(server);
        settings.metrics.is_enabled = true;
        let state = AppState::new(get_metrics().await, mock_gateway(server), ServingNormalizer::default());
        let (handle, addr) = spawn_axum(router(&settings, state)).await;
        (handle, format!("http://{}", addr))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn health_and_token_preview() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "abcdefghijklmnopqrstuvwxyz", 3_600).await;
        let (handle, base) = spawn_app(&server).await;
        let client = build_reqwest_client();

        let health: Value = client.get(format!("{}/health", base)).send().await.unwrap().json().await.unwrap();
        assert_eq!(health, json!({"ok": true}));

        let preview: Value = client.post(format!("{}/auth/token", base)).send().await.unwrap().json().await.unwrap();
        assert_eq!(preview["success"], true);
        assert_eq!(preview["token_type"], "Bearer");
        assert_eq!(preview["access_token_preview"], "abcdefghijkl...(26 chars)");
        assert!(preview.get("access_token").is_none());
        assert!(preview["seconds_until_expiry"].as_u64().unwrap() <= 3_600);

        let raw: Value = client
            .post(format!("{}/auth/token", base))
            .json(&json!({"raw": "true"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(raw["access_token"], "abcdefghijklmnopqrstuvwxyz");

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn food_search_requires_search_term() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "tok", 3_600).await;
        let data_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(API_PATH)
                    .query_param("method", "foods.search")
                    .query_param("search_expression", "idli")
                    .query_param("max_results", "10")
                    .query_param("page_number", "2");
                then.status(200).json_body(json!({"foods": {"food": []}}));
            })
            .await;
        let (handle, base) = spawn_app(&server).await;
        let client = build_reqwest_client();

        let missing = client.get(format!("{}/foods?search=%20", base)).send().await.unwrap();
        assert_eq!(missing.status(), 400);

        let found = client
            .get(format!("{}/foods?search=idli&limit=oops&page=2", base))
            .send()
            .await
            .unwrap();
        assert_eq!(found.status(), 200);
        let body: Value = found.json().await.unwrap();
        assert_eq!(body, json!({"success": true, "data": {"foods": {"food": []}}}));
        assert_eq!(data_mock.calls_async().await, 1);

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn provider_errors_map_to_status_and_details() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "tok", 3_600).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(API_PATH).query_param("method", "recipe.get");
                then.status(404).json_body(json!({"message": "recipe not found"}));
            })
            .await;
        let (handle, base) = spawn_app(&server).await;

        let response = build_reqwest_client().get(format!("{}/recipe/42", base)).send().await.unwrap();
        assert_eq!(response.status(), 404);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"],
            "FatSecret request failed for method recipe.get (HTTP 404 Not Found): recipe not found"
        );
        assert_eq!(body["details"], json!({"message": "recipe not found"}));

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn food_servings_route_returns_reference_portions() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "tok", 3_600).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(API_PATH).query_param("method", "food.get").query_param("food_id", "7");
                then.status(200).json_body(json!({
                    "food": {
                        "food_id": "7",
                        "food_name": "Chapati",
                        "servings": {"serving": {
                            "metric_serving_amount": "60.000",
                            "metric_serving_unit": "g",
                            "calories": "180",
                            "protein": "6"
                        }}
                    }
                }));
            })
            .await;
        let (handle, base) = spawn_app(&server).await;
        let client = build_reqwest_client();

        let body: Value = client
            .get(format!("{}/food/7/servings", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let data = &body["data"];
        assert_eq!(data["category"], "roti");
        assert_eq!(data["original_servings"].as_array().unwrap().len(), 1);
        assert_eq!(data["reference_equivalents"][0]["nutrition"]["calories"]["scaled"], "90.0");
        assert_eq!(data["reference_equivalents"][1]["equivalent_to"], "60.0 g");
        assert_eq!(data["food"]["food"]["servings"]["serving"][1]["calories"], "180.00");

        let metrics = client.get(format!("{}/metrics", base)).send().await.unwrap().text().await.unwrap();
        assert!(metrics.contains("nutrigateway_servings_normalized_total"));

        handle.abort();
    }
}
