use serde_json::json;

use crate::common::{Fixture, TestApp, routes};

/// Group A: Bina 450, Anu 420, Chandan 400. Group B: Esha 300, Farhan 200.
async fn seed_results(app: &TestApp, token: &str) -> Fixture {
    let fx = app.fixture(token).await;
    let candidates = [
        ("Anu", 7, "r1", [90, 90, 80, 80, 80]),
        ("Bina", 7, "R2", [90, 90, 90, 90, 90]),
        ("Chandan", 8, "R3", [80, 80, 80, 80, 80]),
        ("Esha", 10, "R4", [60, 60, 60, 60, 60]),
        ("Farhan", 11, "R5", [40, 40, 40, 40, 40]),
    ];
    for (name, class, roll, scores) in candidates {
        let reg = app.register(&fx, name, class, roll).await;
        app.enter_result(token, reg, scores).await;
    }
    fx
}

mod refs {
    use super::*;

    #[tokio::test]
    async fn only_active_reference_data_is_listed() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let hidden = app.create_district(&token, "Barpeta").await;
        let res = app
            .patch_with_token(
                &routes::district(hidden),
                &json!({"status": "inactive"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_without_token(routes::PUBLIC_DISTRICTS).await;
        assert_eq!(res.status, 200, "{}", res.text);
        let districts = res.body.as_array().unwrap();
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0]["id"], fx.district_id);

        let res = app
            .get_without_token(&format!(
                "{}?district_id={}",
                routes::PUBLIC_SCHOOLS,
                fx.district_id
            ))
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body[0]["name"], "Cotton School");
    }

    #[tokio::test]
    async fn active_exam_year_is_the_newest_active_one() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get_without_token(routes::PUBLIC_ACTIVE_YEAR).await;
        assert_eq!(res.status, 404);

        app.create_exam_year(&token, 2024).await;
        let newest = app.create_exam_year(&token, 2025).await;
        let res = app
            .patch_with_token(
                &routes::exam_year(newest),
                &json!({"status": "archived"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let res = app.get_without_token(routes::PUBLIC_ACTIVE_YEAR).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["year"], 2024);

        let res = app.get_without_token(routes::PUBLIC_EXAM_YEARS).await;
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }
}

mod top_by_group {
    use super::*;

    #[tokio::test]
    async fn groups_appear_in_display_order() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = seed_results(&app, &token).await;

        let res = app
            .get_without_token(&format!("{}?year={}", routes::TOP_BY_GROUP, fx.year))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["year"], fx.year);
        let groups = res.body["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["group"], "A");
        assert_eq!(groups[0]["toppers"][0]["full_name"], "Bina");
        assert_eq!(groups[0]["toppers"].as_array().unwrap().len(), 3);
        assert_eq!(groups[1]["group"], "B");
        assert_eq!(groups[1]["toppers"][1]["full_name"], "Farhan");
    }

    #[tokio::test]
    async fn year_without_results_reports_not_published() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;

        let res = app
            .get_without_token(&format!("{}?year={}", routes::TOP_BY_GROUP, fx.year))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NO_RESULTS");
    }

    #[tokio::test]
    async fn unknown_year_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&format!("{}?year=2099", routes::TOP_BY_GROUP))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod by_school {
    use super::*;

    #[tokio::test]
    async fn school_is_found_by_names_case_insensitively() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = seed_results(&app, &token).await;

        let res = app
            .get_without_token(&format!(
                "{}?year={}&district=kamrup&school=COTTON%20SCHOOL",
                routes::BY_SCHOOL,
                fx.year
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["school_id"], fx.school_id);
        assert_eq!(res.body["district_name"], "Kamrup");
        let results = res.body["results"].as_array().unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[0]["full_name"], "Bina");
        assert_eq!(results[4]["result_status"], "FAIL");
    }

    #[tokio::test]
    async fn school_without_results_is_an_empty_list() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;

        let res = app
            .get_without_token(&format!(
                "{}?year={}&school_id={}",
                routes::BY_SCHOOL,
                fx.year,
                fx.school_id
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn school_must_be_identified() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;

        let res = app
            .get_without_token(&format!("{}?year={}&district=Kamrup", routes::BY_SCHOOL, fx.year))
            .await;

        assert_eq!(res.status, 400);
    }
}

mod lookup {
    use super::*;

    #[tokio::test]
    async fn lookup_returns_result_with_exam_wide_rank() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = seed_results(&app, &token).await;

        let res = app
            .get_without_token(&format!(
                "{}?year={}&district=Kamrup&school=Cotton%20School&roll_no=R1",
                routes::LOOKUP,
                fx.year
            ))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["full_name"], "Anu");
        assert_eq!(res.body["rank_global"], 2);
        assert_eq!(res.body["total"], 420);
        assert_eq!(res.body["result_status"], "PASS");
        assert_eq!(res.body["medium"], "English");
        assert_eq!(res.body["scores"]["mathematics"], 80);
    }

    #[tokio::test]
    async fn unknown_roll_number_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = seed_results(&app, &token).await;

        let res = app
            .get_without_token(&format!(
                "{}?year={}&district=Kamrup&school=Cotton%20School&roll_no=R99",
                routes::LOOKUP,
                fx.year
            ))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn registered_candidate_without_result_is_not_published() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        app.register(&fx, "Anu", 7, "R1").await;

        let res = app
            .get_without_token(&format!(
                "{}?year={}&district=Kamrup&school=Cotton%20School&roll_no=R1",
                routes::LOOKUP,
                fx.year
            ))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NO_RESULTS");
    }

    #[tokio::test]
    async fn lookups_are_rate_limited_per_client() {
        let app = TestApp::spawn_with(|config| config.rate_limit.public_requests = 1).await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let path = format!(
            "{}?year={}&district=Kamrup&school=Cotton%20School&roll_no=R1",
            routes::LOOKUP,
            fx.year
        );

        let first = app.get_from_ip(&path, "10.0.0.1").await;
        assert_eq!(first.status, 404);
        let second = app.get_from_ip(&path, "10.0.0.1").await;
        assert_eq!(second.status, 429);
        assert!(second.retry_after.is_some());

        let other_client = app.get_from_ip(&path, "10.0.0.2").await;
        assert_eq!(other_client.status, 404);
    }

    #[tokio::test]
    async fn new_clients_are_refused_once_limiter_is_full() {
        let app = TestApp::spawn_with(|config| config.rate_limit.max_tracked_clients = 2).await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;
        let path = format!(
            "{}?year={}&district=Kamrup&school=Cotton%20School&roll_no=R1",
            routes::LOOKUP,
            fx.year
        );

        assert_eq!(app.get_from_ip(&path, "10.0.0.1").await.status, 404);
        assert_eq!(app.get_from_ip(&path, "10.0.0.2").await.status, 404);
        let spoofed = app.get_from_ip(&path, "10.0.0.3").await;
        assert_eq!(spoofed.status, 429);
        assert_eq!(spoofed.body["code"], "RATE_LIMITED");

        assert_eq!(app.get_from_ip(&path, "10.0.0.1").await.status, 404);
        assert_eq!(app.rate_limiter.len(), 2);
    }
}

mod hall_of_fame {
    use super::*;

    #[tokio::test]
    async fn hall_of_fame_lists_year_toppers() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = seed_results(&app, &token).await;

        let res = app
            .get_without_token(&format!("{}?year={}", routes::HALL_OF_FAME, fx.year))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        let toppers = res.body["toppers"].as_array().unwrap();
        assert_eq!(toppers.len(), 3);
        assert_eq!(toppers[0]["full_name"], "Bina");
        assert_eq!(toppers[0]["rank_global"], 1);
    }

    #[tokio::test]
    async fn group_filter_keeps_exam_wide_ranks() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = seed_results(&app, &token).await;

        let res = app
            .get_without_token(&format!("{}?year={}&group=b", routes::HALL_OF_FAME, fx.year))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["group"], "B");
        assert_eq!(res.body["toppers"][0]["full_name"], "Esha");
        assert_eq!(res.body["toppers"][0]["rank_global"], 4);
    }

    #[tokio::test]
    async fn empty_year_is_an_empty_list() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let fx = app.fixture(&token).await;

        let res = app
            .get_without_token(&format!("{}?year={}", routes::HALL_OF_FAME, fx.year))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["toppers"].as_array().unwrap().is_empty());
    }
}
