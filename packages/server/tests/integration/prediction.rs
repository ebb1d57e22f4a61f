use serde_json::json;
use uuid::Uuid;

use crate::common::{ClassifierMode, MAX_IMAGE_SIZE, TestApp, leaf_bytes, routes};

mod upload {
    use super::*;

    #[tokio::test]
    async fn healthy_and_diseased_images_yield_a_mixed_record() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let (a, b) = (leaf_bytes(1), leaf_bytes(2));

        let res = app
            .predict(
                &[("leaf.jpg", &a), ("sick-leaf.jpg", &b)],
                &[("notes", "north rows")],
                Some(&farmer.token),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text());
        assert_eq!(res.body["ownerId"], farmer.id.to_string());
        assert_eq!(res.body["overallStatus"], "mixed");
        assert_eq!(res.body["healthyCount"], 1);
        assert_eq!(res.body["diseasedCount"], 1);
        assert_eq!(res.body["notes"], "north rows");
        assert!(res.body["farm"].is_null());

        let predictions = res.body["predictions"].as_array().unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0]["imageIndex"], 0);
        assert_eq!(predictions[0]["predictedClass"], "Tomato___healthy");
        assert_eq!(predictions[1]["predictedClass"], "Tomato___Late_blight");

        let images = res.body["images"].as_array().unwrap();
        assert_eq!(images[0]["filename"], "leaf.jpg");
        assert_eq!(images[1]["size"], b.len());
    }

    #[tokio::test]
    async fn all_healthy_images_yield_a_healthy_record() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let (a, b) = (leaf_bytes(1), leaf_bytes(2));

        let body = app
            .create_prediction(&[("a.jpg", &a), ("b.jpg", &b)], &farmer.token)
            .await;

        assert_eq!(body["overallStatus"], "healthy");
        assert_eq!(body["healthyCount"], 2);
        assert_eq!(body["diseasedCount"], 0);
    }

    #[tokio::test]
    async fn stored_images_land_in_the_image_directory() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let data = leaf_bytes(7);

        let body = app.create_prediction(&[("a.jpg", &data)], &farmer.token).await;

        let path = body["images"][0]["path"].as_str().unwrap();
        assert!(path.starts_with(app.images_dir.to_str().unwrap()));
        assert_eq!(std::fs::read(path).unwrap(), data);
    }

    #[tokio::test]
    async fn empty_upload_is_an_invalid_batch() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .predict(&[], &[("notes", "nothing")], Some(&farmer.token))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_BATCH");

        let list = app.get(routes::PREDICTIONS, Some(&farmer.token)).await;
        assert_eq!(list.body["count"], 0);
    }

    #[tokio::test]
    async fn non_multipart_body_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .post_json(routes::PREDICT, &json!({ "images": [] }), &farmer.token)
            .await;

        assert_eq!(res.status, 400, "{}", res.text());
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].is_string());

        let list = app.get(routes::PREDICTIONS, Some(&farmer.token)).await;
        assert_eq!(list.body["count"], 0);
    }

    #[tokio::test]
    async fn more_than_ten_images_are_rejected() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let data = leaf_bytes(3);
        let images: Vec<(&str, &[u8])> = (0..11).map(|_| ("leaf.jpg", data.as_slice())).collect();

        let res = app.predict(&images, &[], Some(&farmer.token)).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let list = app.get(routes::PREDICTIONS, Some(&farmer.token)).await;
        assert_eq!(list.body["count"], 0);
    }

    #[tokio::test]
    async fn oversized_image_is_rejected() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let big = vec![0u8; MAX_IMAGE_SIZE as usize + 1];

        let res = app
            .predict(&[("big.jpg", &big)], &[], Some(&farmer.token))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_farm_id_is_rejected() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let data = leaf_bytes(1);

        let res = app
            .predict(
                &[("a.jpg", &data)],
                &[("farmId", "not-a-uuid")],
                Some(&farmer.token),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn upload_linked_to_an_owned_farm_embeds_it() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let farm_id = app.create_farm("North Field", &farmer.token).await;
        let data = leaf_bytes(1);

        let res = app
            .predict(&[("a.jpg", &data)], &[("farmId", &farm_id)], Some(&farmer.token))
            .await;

        assert_eq!(res.status, 201, "{}", res.text());
        assert_eq!(res.body["farm"]["id"], farm_id);
        assert_eq!(res.body["farm"]["farmName"], "North Field");
        assert_eq!(res.body["farm"]["location"], "Nashik");
    }

    #[tokio::test]
    async fn upload_linked_to_another_farmers_farm_is_forbidden() {
        let app = TestApp::spawn().await;
        let owner = app.farmer("Ravi");
        let other = app.farmer("Meena");
        let farm_id = app.create_farm("North Field", &owner.token).await;
        let data = leaf_bytes(1);

        let res = app
            .predict(&[("a.jpg", &data)], &[("farmId", &farm_id)], Some(&other.token))
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn upload_linked_to_unknown_farm_is_not_found() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let data = leaf_bytes(1);
        let missing = Uuid::now_v7().to_string();

        let res = app
            .predict(&[("a.jpg", &data)], &[("farmId", &missing)], Some(&farmer.token))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod classifier_failures {
    use super::*;

    async fn assert_fallback(mode: ClassifierMode, count: usize) {
        let app = TestApp::spawn_with(mode).await;
        let farmer = app.farmer("Ravi");
        let payloads: Vec<Vec<u8>> = (0..count as u8).map(leaf_bytes).collect();
        let images: Vec<(&str, &[u8])> =
            payloads.iter().map(|p| ("leaf.jpg", p.as_slice())).collect();

        let res = app.predict(&images, &[], Some(&farmer.token)).await;

        assert_eq!(res.status, 201, "{}", res.text());
        assert_eq!(res.body["overallStatus"], "diseased");
        assert_eq!(res.body["healthyCount"], 0);
        assert_eq!(res.body["diseasedCount"], count);

        let predictions = res.body["predictions"].as_array().unwrap();
        assert_eq!(predictions.len(), count);
        for (i, p) in predictions.iter().enumerate() {
            assert_eq!(p["imageIndex"], i);
            assert_eq!(p["predictedClass"], "ML_SERVICE_UNAVAILABLE");
            assert_eq!(p["confidence"], 0.0);
        }
    }

    #[tokio::test]
    async fn slow_classifier_falls_back_for_every_image() {
        assert_fallback(ClassifierMode::Slow, 3).await;
    }

    #[tokio::test]
    async fn unreachable_classifier_falls_back() {
        assert_fallback(ClassifierMode::Offline, 2).await;
    }

    #[tokio::test]
    async fn incomplete_classifier_answer_falls_back() {
        assert_fallback(ClassifierMode::Truncated, 2).await;
    }
}

mod history {
    use super::*;

    #[tokio::test]
    async fn list_returns_only_own_records_newest_first() {
        let app = TestApp::spawn().await;
        let ravi = app.farmer("Ravi");
        let meena = app.farmer("Meena");
        let data = leaf_bytes(1);

        let first = app.create_prediction(&[("a.jpg", &data)], &ravi.token).await;
        let second = app.create_prediction(&[("b.jpg", &data)], &ravi.token).await;
        app.create_prediction(&[("c.jpg", &data)], &meena.token).await;

        let res = app.get(routes::PREDICTIONS, Some(&ravi.token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["count"], 2);
        let list = res.body["predictions"].as_array().unwrap();
        assert_eq!(list[0]["id"], second["id"]);
        assert_eq!(list[1]["id"], first["id"]);
    }

    #[tokio::test]
    async fn owner_can_read_a_record() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let data = leaf_bytes(1);
        let created = app.create_prediction(&[("a.jpg", &data)], &farmer.token).await;
        let id = created["id"].as_str().unwrap();

        let res = app.get(&routes::prediction(id), Some(&farmer.token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["overallStatus"], "healthy");
    }

    #[tokio::test]
    async fn other_farmer_cannot_read_or_delete_a_record() {
        let app = TestApp::spawn().await;
        let owner = app.farmer("Ravi");
        let other = app.farmer("Meena");
        let data = leaf_bytes(1);
        let created = app.create_prediction(&[("a.jpg", &data)], &owner.token).await;
        let id = created["id"].as_str().unwrap();

        let read = app.get(&routes::prediction(id), Some(&other.token)).await;
        assert_eq!(read.status, 403);
        assert_eq!(read.body["code"], "FORBIDDEN");

        let delete = app.delete(&routes::prediction(id), &other.token).await;
        assert_eq!(delete.status, 403);

        let still_there = app.get(&routes::prediction(id), Some(&owner.token)).await;
        assert_eq!(still_there.status, 200);
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let res = app
            .get(
                &routes::prediction(&Uuid::now_v7().to_string()),
                Some(&farmer.token),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_record_id_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");

        let read = app
            .get(&routes::prediction("not-a-uuid"), Some(&farmer.token))
            .await;
        assert_eq!(read.status, 400, "{}", read.text());
        assert_eq!(read.body["code"], "VALIDATION_ERROR");

        let delete = app
            .delete(&routes::prediction("not-a-uuid"), &farmer.token)
            .await;
        assert_eq!(delete.status, 400);
        assert_eq!(delete.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn owner_can_delete_a_record() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let data = leaf_bytes(1);
        let created = app.create_prediction(&[("a.jpg", &data)], &farmer.token).await;
        let id = created["id"].as_str().unwrap();

        let res = app.delete(&routes::prediction(id), &farmer.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Prediction deleted successfully");

        let gone = app.get(&routes::prediction(id), Some(&farmer.token)).await;
        assert_eq!(gone.status, 404);

        let again = app.delete(&routes::prediction(id), &farmer.token).await;
        assert_eq!(again.status, 404);
    }

    #[tokio::test]
    async fn deleting_a_farm_leaves_linked_records_with_no_farm() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let farm_id = app.create_farm("North Field", &farmer.token).await;
        let data = leaf_bytes(1);
        let created = app
            .predict(&[("a.jpg", &data)], &[("farmId", &farm_id)], Some(&farmer.token))
            .await;
        let id = created.body["id"].as_str().unwrap();

        let deleted = app.delete(&routes::farm(&farm_id), &farmer.token).await;
        assert_eq!(deleted.status, 200);

        let res = app.get(&routes::prediction(id), Some(&farmer.token)).await;
        assert_eq!(res.status, 200);
        assert!(res.body["farm"].is_null());
    }
}

mod images {
    use super::*;

    #[tokio::test]
    async fn owner_downloads_the_uploaded_bytes() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let (a, b) = (leaf_bytes(1), leaf_bytes(2));
        let created = app
            .create_prediction(&[("a.jpg", &a), ("b.png", &b)], &farmer.token)
            .await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .get(&routes::prediction_image(id, 1), Some(&farmer.token))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.bytes, b);
        assert_eq!(res.headers["content-type"], "image/png");
        assert!(
            res.headers["content-disposition"]
                .to_str()
                .unwrap()
                .contains("b.png")
        );
    }

    #[tokio::test]
    async fn admin_can_download_any_image() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let admin = app.admin();
        let data = leaf_bytes(4);
        let created = app.create_prediction(&[("a.jpg", &data)], &farmer.token).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .get(&routes::prediction_image(id, 0), Some(&admin.token))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.bytes, data);
    }

    #[tokio::test]
    async fn out_of_range_index_is_not_found() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let data = leaf_bytes(1);
        let created = app.create_prediction(&[("a.jpg", &data)], &farmer.token).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .get(&routes::prediction_image(id, 5), Some(&farmer.token))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn non_numeric_index_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let farmer = app.farmer("Ravi");
        let data = leaf_bytes(1);
        let created = app.create_prediction(&[("a.jpg", &data)], &farmer.token).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .get(
                &format!("{}/images/first", routes::prediction(id)),
                Some(&farmer.token),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn other_farmer_cannot_download() {
        let app = TestApp::spawn().await;
        let owner = app.farmer("Ravi");
        let other = app.farmer("Meena");
        let data = leaf_bytes(1);
        let created = app.create_prediction(&[("a.jpg", &data)], &owner.token).await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .get(&routes::prediction_image(id, 0), Some(&other.token))
            .await;

        assert_eq!(res.status, 403);
    }
}
