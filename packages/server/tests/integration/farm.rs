use serde_json::json;
use uuid::Uuid;

use crate::common::{TestApp, routes};

mod create {
    use super::*;

    #[tokio::test]
    async fn farmer_registers_a_farm_with_defaults() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .post_json(
                routes::FARMS,
                &json!({"farmName": " North Field ", "location": "Nashik", "area": 2.5}),
                &farmer.token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text());
        assert_eq!(res.body["farmerId"], farmer.id.to_string());
        assert_eq!(res.body["farmName"], "North Field");
        assert_eq!(res.body["areaUnit"], "acres");
        assert_eq!(res.body["cropType"], "Tomato");
        assert!(res.body["soilType"].is_null());
        assert!(res.body["irrigationType"].is_null());
    }

    #[tokio::test]
    async fn all_optional_fields_are_stored() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .post_json(
                routes::FARMS,
                &json!({
                    "farmName": "River Plot",
                    "location": "Satara",
                    "area": 1200,
                    "areaUnit": "square meters",
                    "cropType": "Cherry tomato",
                    "soilType": "Loam",
                    "irrigationType": "drip",
                    "description": "Greenhouse rows",
                }),
                &farmer.token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text());
        assert_eq!(res.body["areaUnit"], "square meters");
        assert_eq!(res.body["cropType"], "Cherry tomato");
        assert_eq!(res.body["irrigationType"], "drip");
        assert_eq!(res.body["description"], "Greenhouse rows");
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .post_json(
                routes::FARMS,
                &json!({"location": "Nashik", "area": 1}),
                &farmer.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn negative_area_is_rejected() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .post_json(
                routes::FARMS,
                &json!({"farmName": "A", "location": "B", "area": -3}),
                &farmer.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_irrigation_type_is_rejected() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .post_json(
                routes::FARMS,
                &json!({"farmName": "A", "location": "B", "area": 1, "irrigationType": "rain"}),
                &farmer.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn admin_cannot_register_a_farm() {
        let app = TestApp::spawn().await;
        let admin = app.admin();

        let res = app
            .post_json(
                routes::FARMS,
                &json!({"farmName": "A", "location": "B", "area": 1}),
                &admin.token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod manage {
    use super::*;

    #[tokio::test]
    async fn list_contains_only_own_farms() {
        let app = TestApp::spawn().await;
        let ravi = app.farmer("Ravi");
        let meena = app.farmer("Meena");
        app.create_farm("North Field", &ravi.token).await;
        app.create_farm("South Field", &ravi.token).await;
        app.create_farm("Hill Plot", &meena.token).await;

        let res = app.get(routes::FARMS, Some(&ravi.token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["count"], 2);
        let names: Vec<&str> = res.body["farms"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["farmName"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"North Field"));
        assert!(names.contains(&"South Field"));
    }

    #[tokio::test]
    async fn owner_reads_a_farm() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let id = app.create_farm("North Field", &farmer.token).await;

        let res = app.get(&routes::farm(&id), Some(&farmer.token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["location"], "Nashik");
    }

    #[tokio::test]
    async fn other_farmer_cannot_read_update_or_delete() {
        let app = TestApp::spawn().await;
        let owner = app.farmer("Ravi");
        let other = app.farmer("Meena");
        let id = app.create_farm("North Field", &owner.token).await;

        let read = app.get(&routes::farm(&id), Some(&other.token)).await;
        assert_eq!(read.status, 403);
        assert_eq!(read.body["code"], "FORBIDDEN");

        let update = app
            .put_json(&routes::farm(&id), &json!({"farmName": "Mine"}), &other.token)
            .await;
        assert_eq!(update.status, 403);

        let delete = app.delete(&routes::farm(&id), &other.token).await;
        assert_eq!(delete.status, 403);

        let unchanged = app.get(&routes::farm(&id), Some(&owner.token)).await;
        assert_eq!(unchanged.body["farmName"], "North Field");
    }

    #[tokio::test]
    async fn partial_update_changes_only_given_fields() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let created = app
            .post_json(
                routes::FARMS,
                &json!({
                    "farmName": "North Field",
                    "location": "Nashik",
                    "area": 2.5,
                    "soilType": "Clay",
                    "description": "Old orchard",
                }),
                &farmer.token,
            )
            .await;
        let id = created.body["id"].as_str().unwrap();

        let res = app
            .put_json(
                &routes::farm(id),
                &json!({"area": 3.0, "areaUnit": "hectares", "soilType": null}),
                &farmer.token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text());
        assert_eq!(res.body["farmName"], "North Field");
        assert_eq!(res.body["area"], 3.0);
        assert_eq!(res.body["areaUnit"], "hectares");
        assert!(res.body["soilType"].is_null());
        assert_eq!(res.body["description"], "Old orchard");
    }

    #[tokio::test]
    async fn update_with_blank_name_is_rejected() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let id = app.create_farm("North Field", &farmer.token).await;

        let res = app
            .put_json(&routes::farm(&id), &json!({"farmName": "  "}), &farmer.token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn owner_deletes_a_farm() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let id = app.create_farm("North Field", &farmer.token).await;

        let res = app.delete(&routes::farm(&id), &farmer.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Farm deleted successfully");

        let gone = app.get(&routes::farm(&id), Some(&farmer.token)).await;
        assert_eq!(gone.status, 404);
        assert_eq!(gone.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_farm_is_not_found() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .get(&routes::farm(&Uuid::now_v7().to_string()), Some(&farmer.token))
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn malformed_farm_id_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app.get(&routes::farm("12345"), Some(&farmer.token)).await;

        assert_eq!(res.status, 400, "{}", res.text());
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}
