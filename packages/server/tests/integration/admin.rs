use uuid::Uuid;

use crate::common::{TestApp, leaf_bytes, routes};

#[tokio::test]
async fn farmer_cannot_use_admin_routes() {
    let app = TestApp::spawn().await;
    let farmer = app.farmer("Ravi");

    for path in [routes::ADMIN_FARMERS, routes::ADMIN_STATS] {
        let res = app.get(path, Some(&farmer.token)).await;
        assert_eq!(res.status, 403, "{path}");
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

#[tokio::test]
async fn farmers_appear_once_they_submit_data() {
    let app = TestApp::spawn().await;
    let admin = app.admin();
    let ravi = app.farmer("Ravi");
    let meena = app.farmer("Meena");
    let data = leaf_bytes(1);

    app.create_prediction(&[("a.jpg", &data)], &ravi.token).await;
    app.create_prediction(&[("b.jpg", &data)], &ravi.token).await;
    app.create_farm("Hill Plot", &meena.token).await;

    let res = app.get(routes::ADMIN_FARMERS, Some(&admin.token)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["count"], 2);
    let emails: Vec<&str> = res.body["farmers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&"ravi@example.com"));
    assert!(emails.contains(&"meena@example.com"));
}

#[tokio::test]
async fn farmer_detail_includes_farms_predictions_and_stats() {
    let app = TestApp::spawn().await;
    let admin = app.admin();
    let farmer = app.farmer("Ravi");
    let (a, b) = (leaf_bytes(1), leaf_bytes(2));

    app.create_farm("North Field", &farmer.token).await;
    app.create_prediction(&[("a.jpg", &a)], &farmer.token).await;
    app.create_prediction(&[("sick.jpg", &b)], &farmer.token).await;
    app.create_prediction(&[("a.jpg", &a), ("sick.jpg", &b)], &farmer.token)
        .await;

    let res = app
        .get(&routes::admin_farmer(farmer.id), Some(&admin.token))
        .await;

    assert_eq!(res.status, 200, "{}", res.text());
    assert_eq!(res.body["farmer"]["name"], "Ravi");
    assert_eq!(res.body["farms"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["predictions"].as_array().unwrap().len(), 3);
    assert_eq!(res.body["stats"]["totalFarms"], 1);
    assert_eq!(res.body["stats"]["totalPredictions"], 3);
    assert_eq!(res.body["stats"]["healthyPredictions"], 1);
    assert_eq!(res.body["stats"]["diseasedPredictions"], 1);
}

#[tokio::test]
async fn unknown_farmer_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.admin();

    let res = app
        .get(&routes::admin_farmer(Uuid::now_v7()), Some(&admin.token))
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_ids_are_validation_errors() {
    let app = TestApp::spawn().await;
    let admin = app.admin();

    for path in [
        "/api/v1/admin/farmers/ravi".to_string(),
        routes::admin_prediction("not-a-uuid"),
    ] {
        let res = app.get(&path, Some(&admin.token)).await;
        assert_eq!(res.status, 400, "{path}");
        assert_eq!(res.body["code"], "VALIDATION_ERROR", "{path}");
    }
}

#[tokio::test]
async fn admin_lists_a_farmers_predictions() {
    let app = TestApp::spawn().await;
    let admin = app.admin();
    let ravi = app.farmer("Ravi");
    let meena = app.farmer("Meena");
    let data = leaf_bytes(1);

    app.create_prediction(&[("a.jpg", &data)], &ravi.token).await;
    app.create_prediction(&[("b.jpg", &data)], &meena.token).await;

    let res = app
        .get(&routes::admin_farmer_predictions(ravi.id), Some(&admin.token))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["count"], 1);
    assert_eq!(res.body["predictions"][0]["ownerId"], ravi.id.to_string());
}

#[tokio::test]
async fn admin_reads_any_prediction() {
    let app = TestApp::spawn().await;
    let admin = app.admin();
    let farmer = app.farmer("Ravi");
    let data = leaf_bytes(1);
    let created = app.create_prediction(&[("a.jpg", &data)], &farmer.token).await;
    let id = created["id"].as_str().unwrap();

    let res = app.get(&routes::admin_prediction(id), Some(&admin.token)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["id"], id);
    assert_eq!(res.body["ownerId"], farmer.id.to_string());

    let missing = app
        .get(
            &routes::admin_prediction(&Uuid::now_v7().to_string()),
            Some(&admin.token),
        )
        .await;
    assert_eq!(missing.status, 404);
}

#[tokio::test]
async fn admin_cannot_use_farmer_prediction_routes() {
    let app = TestApp::spawn().await;
    let admin = app.admin();

    let res = app.get(routes::PREDICTIONS, Some(&admin.token)).await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn stats_summarise_the_whole_service() {
    let app = TestApp::spawn().await;
    let admin = app.admin();
    let ravi = app.farmer("Ravi");
    let meena = app.farmer("Meena");
    let (a, b) = (leaf_bytes(1), leaf_bytes(2));

    app.create_farm("North Field", &ravi.token).await;
    app.create_prediction(&[("a.jpg", &a)], &ravi.token).await;
    app.create_prediction(&[("sick.jpg", &b)], &ravi.token).await;
    app.create_prediction(&[("a.jpg", &a), ("sick.jpg", &b)], &ravi.token)
        .await;
    let latest = app.create_prediction(&[("a.jpg", &a)], &meena.token).await;

    let res = app.get(routes::ADMIN_STATS, Some(&admin.token)).await;

    assert_eq!(res.status, 200, "{}", res.text());
    let stats = &res.body["stats"];
    assert_eq!(stats["totalFarmers"], 2);
    assert_eq!(stats["totalFarms"], 1);
    assert_eq!(stats["totalPredictions"], 4);
    assert_eq!(stats["recentFarmers"], 2);
    assert_eq!(stats["predictionStats"]["healthy"], 2);
    assert_eq!(stats["predictionStats"]["diseased"], 1);
    assert_eq!(stats["predictionStats"]["mixed"], 1);

    let recent = res.body["recentPredictions"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["id"], latest["id"]);
    assert_eq!(recent[0]["owner"]["name"], "Meena");

    let top = res.body["topFarmers"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["farmerId"], ravi.id.to_string());
    assert_eq!(top[0]["predictionCount"], 3);
    assert_eq!(top[0]["email"], "ravi@example.com");
    assert_eq!(top[1]["predictionCount"], 1);
}

#[tokio::test]
async fn recent_predictions_are_capped_at_ten() {
    let app = TestApp::spawn().await;
    let admin = app.admin();
    let farmer = app.farmer("Ravi");
    let data = leaf_bytes(1);

    for _ in 0..12 {
        app.create_prediction(&[("a.jpg", &data)], &farmer.token).await;
    }

    let res = app.get(routes::ADMIN_STATS, Some(&admin.token)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["stats"]["totalPredictions"], 12);
    assert_eq!(res.body["recentPredictions"].as_array().unwrap().len(), 10);
}
