/// Integration tests for `/api/schools` and `/api/assignments`.

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use serde_json::{Value, json};

use huxley::models::{assignment, delegate, school};

#[macro_use]
mod common;
use common::*;

// ---------------------------------------------------------------------------
// Schools
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_create_school_makes_caller_advisor() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    let app = test_app!(pool);

    let body = json!({ "name": "Berkeley High", "city": "Berkeley", "advisor": 999 });
    let req = api_request(Method::POST, "/api/schools", Some(body.clone()), None);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let cookie = login!(app, "advisor");
    let req = api_request(Method::POST, "/api/schools", Some(body.clone()), Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["advisor"], advisor.id);
    assert_eq!(created["name"], "Berkeley High");
    assert_eq!(created["address"], "");

    let req = api_request(Method::GET, "/api/users/me", None, Some(&cookie));
    let me: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(me["school"], created["id"]);

    let req = api_request(Method::POST, "/api/schools", Some(body), Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["details"], "You already advise a school.");
}

#[actix_web::test]
async fn test_create_school_requires_name() {
    let db = setup_test_db().await;
    let pool = db.pool();
    new_user(pool, "advisor").await;
    let app = test_app!(pool);
    let cookie = login!(app, "advisor");

    let req = api_request(Method::POST, "/api/schools", Some(json!({ "name": "   " })), Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_school_detail_permissions() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    new_user(pool, "other").await;
    new_superuser(pool, "root").await;
    let s = new_school(pool, advisor.id, "Berkeley High").await;
    let uri = format!("/api/schools/{}", s.id);

    let app = test_app!(pool);
    let req = api_request(Method::GET, &uri, None, None);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    for (username, expected) in [
        ("advisor", StatusCode::OK),
        ("other", StatusCode::FORBIDDEN),
        ("root", StatusCode::OK),
    ] {
        let app = test_app!(pool);
        let cookie = login!(app, username);
        let req = api_request(Method::GET, &uri, None, Some(&cookie));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), expected, "GET as {username}");
    }
}

#[actix_web::test]
async fn test_patch_school_keeps_other_fields() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    let s = new_school(pool, advisor.id, "Berkeley High").await;
    let app = test_app!(pool);
    let cookie = login!(app, "advisor");

    let uri = format!("/api/schools/{}", s.id);
    let req = api_request(Method::PATCH, &uri, Some(json!({ "city": "Oakland" })), Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = school::find_by_id(pool, s.id).await.expect("query").expect("exists");
    assert_eq!(stored.city, "Oakland");
    assert_eq!(stored.name, "Berkeley High");
    assert_eq!(stored.address, "1 School Lane");
    assert_eq!(stored.advisor_id, advisor.id);
}

#[actix_web::test]
async fn test_school_sub_collections() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    let other = new_user(pool, "other").await;
    let s = new_school(pool, advisor.id, "Berkeley High").await;
    let other_school = new_school(pool, other.id, "Albany High").await;
    let a = new_assignment(pool, s.id).await;
    new_delegate(pool, s.id, Some(a.id)).await;
    new_delegate(pool, s.id, None).await;
    new_delegate(pool, other_school.id, None).await;

    let app = test_app!(pool);
    let cookie = login!(app, "advisor");

    let req = api_request(Method::GET, &format!("/api/schools/{}/assignments", s.id), None, Some(&cookie));
    let assignments: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(assignments.as_array().map(Vec::len), Some(1));
    assert_eq!(assignments[0]["id"], a.id);

    let req = api_request(Method::GET, &format!("/api/schools/{}/delegates", s.id), None, Some(&cookie));
    let delegates: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(delegates.as_array().map(Vec::len), Some(2));

    let req = api_request(
        Method::GET,
        &format!("/api/schools/{}/delegates", other_school.id),
        None,
        Some(&cookie),
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_delete_school_cascades() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    let s = new_school(pool, advisor.id, "Berkeley High").await;
    let a = new_assignment(pool, s.id).await;
    let d = new_delegate(pool, s.id, Some(a.id)).await;

    let app = test_app!(pool);
    let cookie = login!(app, "advisor");
    let req = api_request(Method::DELETE, &format!("/api/schools/{}", s.id), None, Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert!(school::find_by_id(pool, s.id).await.expect("query").is_none());
    assert!(assignment::find_by_id(pool, a.id).await.expect("query").is_none());
    assert!(delegate::find_by_id(pool, d.id).await.expect("query").is_none());
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_only_superusers_create_assignments() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    new_superuser(pool, "root").await;
    let s = new_school(pool, advisor.id, "Berkeley High").await;
    let body = json!({ "committee": "SPECPOL", "country": "Chile", "school": s.id });

    let app = test_app!(pool);
    let cookie = login!(app, "advisor");
    let req = api_request(Method::POST, "/api/assignments", Some(body.clone()), Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let app = test_app!(pool);
    let cookie = login!(app, "root");
    let req = api_request(Method::POST, "/api/assignments", Some(body), Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["school"], s.id);
    assert_eq!(created["rejected"], false);

    let bad = json!({ "committee": "SPECPOL", "country": "Chile", "school": 4242 });
    let req = api_request(Method::POST, "/api/assignments", Some(bad), Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_advisor_reads_but_cannot_modify_assignment() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    new_user(pool, "other").await;
    let s = new_school(pool, advisor.id, "Berkeley High").await;
    let a = new_assignment(pool, s.id).await;
    let uri = format!("/api/assignments/{}", a.id);

    let app = test_app!(pool);
    let cookie = login!(app, "advisor");
    let req = api_request(Method::GET, &uri, None, Some(&cookie));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["committee"], "DISEC");

    let req = api_request(Method::PATCH, &uri, Some(json!({ "rejected": true })), Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = api_request(Method::DELETE, &uri, None, Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let app = test_app!(pool);
    let cookie = login!(app, "other");
    let req = api_request(Method::GET, &uri, None, Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_superuser_updates_assignment() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    new_superuser(pool, "root").await;
    let s = new_school(pool, advisor.id, "Berkeley High").await;
    let a = new_assignment(pool, s.id).await;
    let uri = format!("/api/assignments/{}", a.id);

    let app = test_app!(pool);
    let cookie = login!(app, "root");

    let req = api_request(Method::PATCH, &uri, Some(json!({ "rejected": true })), Some(&cookie));
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["rejected"], true);
    assert_eq!(body["country"], "Kenya");

    let req = api_request(
        Method::PUT,
        &uri,
        Some(json!({ "committee": "ECOSOC", "country": "Peru" })),
        Some(&cookie),
    );
    let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
    assert_eq!(body["committee"], "ECOSOC");
    assert_eq!(body["rejected"], false);
}

#[actix_web::test]
async fn test_deleting_assignment_keeps_delegate() {
    let db = setup_test_db().await;
    let pool = db.pool();
    let advisor = new_user(pool, "advisor").await;
    new_superuser(pool, "root").await;
    let s = new_school(pool, advisor.id, "Berkeley High").await;
    let a = new_assignment(pool, s.id).await;
    let d = new_delegate(pool, s.id, Some(a.id)).await;

    let app = test_app!(pool);
    let cookie = login!(app, "root");
    let req = api_request(Method::DELETE, &format!("/api/assignments/{}", a.id), None, Some(&cookie));
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let kept = delegate::find_by_id(pool, d.id).await.expect("query").expect("delegate survives");
    assert_eq!(kept.assignment_id, None);
}
