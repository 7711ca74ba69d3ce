use serde_json::json;

use crate::common::{TestApp, routes};

mod entry {
    use super::*;

    #[tokio::test]
    async fn totals_and_status_are_computed_on_create() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;

        let res = app
            .post_with_token(
                routes::RESULTS,
                &json!({
                    "registration_id": reg,
                    "gk": 90,
                    "science": 85,
                    "mathematics": 95,
                    "logical_reasoning": 80,
                    "current_affairs": 70,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["total"], 420);
        assert_eq!(res.body["percentage"], 84.0);
        assert_eq!(res.body["result_status"], "PASS");
        assert_eq!(res.body["exam_year_id"], fx.exam_year_id);
    }

    #[tokio::test]
    async fn client_supplied_total_is_ignored() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;

        let res = app
            .post_with_token(
                routes::RESULTS,
                &json!({
                    "registration_id": reg,
                    "gk": 10,
                    "science": 10,
                    "mathematics": 10,
                    "logical_reasoning": 10,
                    "current_affairs": 10,
                    "total": 500,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["total"], 50);
        assert_eq!(res.body["result_status"], "FAIL");
    }

    #[tokio::test]
    async fn score_above_hundred_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;

        let res = app
            .post_with_token(
                routes::RESULTS,
                &json!({
                    "registration_id": reg,
                    "gk": 101,
                    "science": 0,
                    "mathematics": 0,
                    "logical_reasoning": 0,
                    "current_affairs": 0,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn second_result_for_a_registration_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;
        app.enter_result(&token, reg, [50, 50, 50, 50, 50]).await;

        let res = app
            .post_with_token(
                routes::RESULTS,
                &json!({
                    "registration_id": reg,
                    "gk": 60,
                    "science": 60,
                    "mathematics": 60,
                    "logical_reasoning": 60,
                    "current_affairs": 60,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn unknown_registration_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::RESULTS,
                &json!({
                    "registration_id": 4242,
                    "gk": 1,
                    "science": 1,
                    "mathematics": 1,
                    "logical_reasoning": 1,
                    "current_affairs": 1,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod correction {
    use super::*;

    #[tokio::test]
    async fn partial_update_recomputes_from_merged_scores() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;
        let id = app.enter_result(&token, reg, [80, 75, 70, 60, 65]).await;

        let res = app
            .patch_with_token(&routes::result(id), &json!({"mathematics": 100}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["mathematics"], 100);
        assert_eq!(res.body["gk"], 80);
        assert_eq!(res.body["total"], 380);
        assert_eq!(res.body["percentage"], 76.0);
    }

    #[tokio::test]
    async fn empty_update_returns_result_unchanged() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;
        let id = app.enter_result(&token, reg, [80, 75, 70, 60, 65]).await;

        let res = app
            .patch_with_token(&routes::result(id), &json!({}), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 350);
    }

    #[tokio::test]
    async fn update_rejects_out_of_range_score() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;
        let id = app.enter_result(&token, reg, [80, 75, 70, 60, 65]).await;

        let res = app
            .patch_with_token(&routes::result(id), &json!({"science": -1}), &token)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn manager_can_enter_but_not_correct() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let fx = app.fixture(&admin).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;
        let manager = app.create_user_with_role("clerk", "manager").await;

        let id = app.enter_result(&manager, reg, [50, 50, 50, 50, 50]).await;
        let res = app
            .patch_with_token(&routes::result(id), &json!({"gk": 60}), &manager)
            .await;
        assert_eq!(res.status, 403);

        let res = app.delete_with_token(&routes::result(id), &manager).await;
        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let reg = app.register(&fx, "Anu Das", 7, "R1").await;
        let id = app.enter_result(&token, reg, [50, 50, 50, 50, 50]).await;

        let first = app.delete_with_token(&routes::result(id), &token).await;
        assert_eq!(first.status, 204);
        let second = app.delete_with_token(&routes::result(id), &token).await;
        assert_eq!(second.status, 404);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn list_sorts_by_total() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let low = app.register(&fx, "Low Scorer", 7, "R1").await;
        let high = app.register(&fx, "High Scorer", 7, "R2").await;
        app.enter_result(&token, low, [10, 10, 10, 10, 10]).await;
        app.enter_result(&token, high, [90, 90, 90, 90, 90]).await;

        let res = app
            .get_with_token(
                &format!("{}?sort_by=total&sort_order=desc", routes::RESULTS),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["pagination"]["total"], 2);
        assert_eq!(res.body["data"][0]["registration_id"], high);
        assert_eq!(res.body["data"][1]["registration_id"], low);
    }

    #[tokio::test]
    async fn list_filters_by_school() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let other = app.create_school(&token, fx.district_id, "Other School").await;
        let here = app.register(&fx, "Anu Das", 7, "R1").await;
        let there = app
            .try_register(fx.exam_year_id, fx.district_id, other, "Bina Das", 7, "R1")
            .await
            .id();
        app.enter_result(&token, here, [50, 50, 50, 50, 50]).await;
        app.enter_result(&token, there, [60, 60, 60, 60, 60]).await;

        let res = app
            .get_with_token(&format!("{}?school_id={other}", routes::RESULTS), &token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["registration_id"], there);
    }

    #[tokio::test]
    async fn huge_page_number_returns_empty_page() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let id = app.register(&fx, "Anu Das", 7, "R1").await;
        app.enter_result(&token, id, [50, 50, 50, 50, 50]).await;

        let res = app
            .get_with_token(
                &format!("{}?page={}&per_page=100", routes::RESULTS, u64::MAX),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["pagination"]["page"], 1_000_000);
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"].as_array().map(Vec::len), Some(0));
    }
}
