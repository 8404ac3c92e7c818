use actix_web::{
    http::{header::ContentType, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use drinks_engine::{
    test_utils::{prepare_test_db, seed_drink},
    DrinkApi,
    DrinkApiError,
    DrinkManagement,
    SqliteDatabase,
};
use serde_json::{json, Value};

use super::{
    helpers::{bearer, send_request, valid_token},
    mocks::MockDrinkStore,
};
use crate::routes::configure_drink_routes;

const ALL_PERMISSIONS: [&str; 4] = ["get:drinks-detail", "post:drinks", "patch:drinks", "delete:drinks"];

fn espresso() -> Value {
    json!([{"color": "red", "name": "espresso", "parts": 1}])
}

fn latte() -> Value {
    json!([{"color": "brown", "name": "espresso", "parts": 1}, {"color": "white", "name": "steamed milk", "parts": 3}])
}

fn sqlite_app(db: SqliteDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(DrinkApi::new(db)));
        configure_drink_routes::<SqliteDatabase>(cfg);
    }
}

fn mock_app(store: MockDrinkStore) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(DrinkApi::new(store)));
        configure_drink_routes::<MockDrinkStore>(cfg);
    }
}

async fn seeded_db() -> SqliteDatabase {
    let db = prepare_test_db().await;
    seed_drink(&db, "Espresso", espresso()).await;
    seed_drink(&db, "Latte", latte()).await;
    db
}

fn detail() -> TestRequest {
    TestRequest::get().uri("/drinks-detail").insert_header(bearer(&valid_token(&ALL_PERMISSIONS)))
}

fn post(body: Value) -> TestRequest {
    TestRequest::post().uri("/drinks").insert_header(bearer(&valid_token(&ALL_PERMISSIONS))).set_json(body)
}

fn patch(id: &str, body: Value) -> TestRequest {
    TestRequest::patch()
        .uri(&format!("/drinks/{id}"))
        .insert_header(bearer(&valid_token(&ALL_PERMISSIONS)))
        .set_json(body)
}

fn delete(id: &str) -> TestRequest {
    TestRequest::delete().uri(&format!("/drinks/{id}")).insert_header(bearer(&valid_token(&ALL_PERMISSIONS)))
}

fn assert_error(status: StatusCode, body: &Value, expected: StatusCode) {
    assert_eq!(status, expected, "body: {body}");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], expected.as_u16());
    assert!(body["message"].is_string(), "body: {body}");
}

//----------------------------------------------   Listing  ----------------------------------------------------

#[actix_web::test]
async fn public_menu_hides_ingredient_names() {
    let db = seeded_db().await;
    let (status, body) = send_request(TestRequest::get().uri("/drinks"), sqlite_app(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "drinks": [
                {"id": 1, "title": "Espresso", "recipe": [{"color": "red", "parts": 1}]},
                {"id": 2, "title": "Latte", "recipe": [{"color": "brown", "parts": 1}, {"color": "white", "parts": 3}]}
            ]
        })
    );
    assert!(!body.to_string().contains("\"name\""));
}

#[actix_web::test]
async fn detail_list_includes_ingredient_names() {
    let db = seeded_db().await;
    let (status, body) = send_request(detail(), sqlite_app(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["drinks"][0], json!({"id": 1, "title": "Espresso", "recipe": espresso()}));
    assert_eq!(body["drinks"][1]["recipe"], latte());
}

#[actix_web::test]
async fn detail_list_requires_its_permission() {
    let db = seeded_db().await;
    let token = valid_token(&["post:drinks", "patch:drinks", "delete:drinks"]);
    let req = TestRequest::get().uri("/drinks-detail").insert_header(bearer(&token));
    let (status, body) = send_request(req, sqlite_app(db)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn detail_list_storage_failure_is_unprocessable() {
    let mut store = MockDrinkStore::new();
    store.expect_fetch_all_drinks().returning(|| Err(DrinkApiError::DatabaseError("disk I/O error".into())));
    let (status, body) = send_request(detail(), mock_app(store)).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn public_menu_storage_failure_is_a_server_error() {
    let mut store = MockDrinkStore::new();
    store.expect_fetch_all_drinks().returning(|| Err(DrinkApiError::DatabaseError("disk I/O error".into())));
    let (status, body) = send_request(TestRequest::get().uri("/drinks"), mock_app(store)).await;
    assert_error(status, &body, StatusCode::INTERNAL_SERVER_ERROR);
}

//----------------------------------------------   Create  ----------------------------------------------------

#[actix_web::test]
async fn create_then_fetch_returns_the_same_recipe() {
    let db = prepare_test_db().await;
    let req = post(json!({"title": "Espresso", "recipe": espresso()}));
    let (status, body) = send_request(req, sqlite_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "drinks": [{"id": 1, "title": "Espresso", "recipe": espresso()}]}));

    let (status, body) = send_request(detail(), sqlite_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"], espresso());

    let stored = db.fetch_drink(1).await.unwrap().unwrap();
    assert_eq!(stored.recipe, r#"[{"color":"red","name":"espresso","parts":1}]"#);
}

#[actix_web::test]
async fn create_accepts_a_serialized_recipe() {
    let db = prepare_test_db().await;
    let body = json!({"title": "Latte", "recipe": latte().to_string()});
    let (status, body) = send_request(post(body), sqlite_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"], latte());
    let (_, body) = send_request(detail(), sqlite_app(db)).await;
    assert_eq!(body["drinks"][0]["recipe"], latte());
}

#[actix_web::test]
async fn create_without_authorization_header_is_a_bad_request() {
    let db = prepare_test_db().await;
    let req = TestRequest::post().uri("/drinks").set_json(json!({"title": "Espresso", "recipe": espresso()}));
    let (status, body) = send_request(req, sqlite_app(db.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "authorization_header_missing");
    assert!(db.fetch_all_drinks().await.unwrap().is_empty());
}

#[actix_web::test]
async fn create_with_only_read_permission_is_forbidden() {
    let db = prepare_test_db().await;
    let token = valid_token(&["get:drinks-detail"]);
    let req = TestRequest::post()
        .uri("/drinks")
        .insert_header(bearer(&token))
        .set_json(json!({"title": "Espresso", "recipe": espresso()}));
    let (status, body) = send_request(req, sqlite_app(db)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn create_with_invalid_input_is_unprocessable() {
    let db = prepare_test_db().await;
    for body in [
        json!({"title": "Espresso"}),
        json!({"recipe": espresso()}),
        json!({"title": "Espresso", "recipe": "[{\"color\": \"red\""}),
        json!({"title": "Espresso", "recipe": [{"color": "red", "name": "espresso", "parts": 0}]}),
        json!({"title": "Espresso", "recipe": []}),
    ] {
        let (status, body) = send_request(post(body), sqlite_app(db.clone())).await;
        assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
    }
    assert!(db.fetch_all_drinks().await.unwrap().is_empty());
}

#[actix_web::test]
async fn create_duplicate_title_is_unprocessable() {
    let db = seeded_db().await;
    let (status, body) = send_request(post(json!({"title": "Espresso", "recipe": espresso()})), sqlite_app(db)).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn create_with_malformed_json_is_a_bad_request() {
    let store = MockDrinkStore::new();
    let req = TestRequest::post()
        .uri("/drinks")
        .insert_header(bearer(&valid_token(&ALL_PERMISSIONS)))
        .insert_header(ContentType::json())
        .set_payload("{\"title\": ");
    let (status, body) = send_request(req, mock_app(store)).await;
    assert_error(status, &body, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_storage_failure_is_unprocessable() {
    let mut store = MockDrinkStore::new();
    store.expect_insert_drink().returning(|_| Err(DrinkApiError::DatabaseError("database is locked".into())));
    let (status, body) = send_request(post(json!({"title": "Espresso", "recipe": espresso()})), mock_app(store)).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

//----------------------------------------------   Update  ----------------------------------------------------

#[actix_web::test]
async fn update_title_only() {
    let db = seeded_db().await;
    let (status, body) = send_request(patch("1", json!({"title": "Doppio"})), sqlite_app(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "drinks": [{"id": 1, "title": "Doppio", "recipe": espresso()}]}));
}

#[actix_web::test]
async fn update_recipe_without_title_keeps_title_and_applies_recipe() {
    let db = seeded_db().await;
    let recipe = json!([{"color": "black", "name": "ristretto", "parts": 2}]);
    let (status, body) = send_request(patch("1", json!({"recipe": recipe})), sqlite_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "Espresso");
    assert_eq!(body["drinks"][0]["recipe"], recipe);

    let (status, body) =
        send_request(patch("1", json!({"title": "", "recipe": latte().to_string()})), sqlite_app(db)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "Espresso");
    assert_eq!(body["drinks"][0]["recipe"], latte());
}

#[actix_web::test]
async fn update_with_nothing_to_change_does_not_write() {
    let mut store = MockDrinkStore::new();
    store.expect_fetch_drink().returning(|id| {
        Ok(Some(drinks_engine::db_types::Drink {
            id,
            title: "Espresso".into(),
            recipe: r#"[{"color":"red","name":"espresso","parts":1}]"#.into(),
        }))
    });
    store.expect_update_drink().never();
    let (status, body) = send_request(patch("7", json!({"title": null})), mock_app(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["id"], 7);
}

#[actix_web::test]
async fn update_missing_drink_is_not_found() {
    let db = seeded_db().await;
    let (status, body) = send_request(patch("42", json!({"title": "Ghost"})), sqlite_app(db.clone())).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
    let (status, body) = send_request(patch("latte", json!({"title": "Ghost"})), sqlite_app(db)).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_with_invalid_recipe_is_unprocessable() {
    let db = seeded_db().await;
    let (status, body) = send_request(patch("1", json!({"recipe": 12})), sqlite_app(db.clone())).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
    let (_, body) = send_request(detail(), sqlite_app(db)).await;
    assert_eq!(body["drinks"][0]["recipe"], espresso());
}

#[actix_web::test]
async fn update_storage_failure_is_unprocessable() {
    let mut store = MockDrinkStore::new();
    store.expect_fetch_drink().returning(|id| {
        Ok(Some(drinks_engine::db_types::Drink { id, title: "Espresso".into(), recipe: espresso().to_string() }))
    });
    store.expect_update_drink().returning(|_, _| Err(DrinkApiError::DatabaseError("UNIQUE constraint failed".into())));
    let (status, body) = send_request(patch("1", json!({"title": "Latte"})), mock_app(store)).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

//----------------------------------------------   Delete  ----------------------------------------------------

#[actix_web::test]
async fn delete_drink() {
    let db = seeded_db().await;
    let (status, body) = send_request(delete("2"), sqlite_app(db.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "deleted": 2}));
    let (_, body) = send_request(TestRequest::get().uri("/drinks"), sqlite_app(db.clone())).await;
    assert_eq!(body["drinks"].as_array().unwrap().len(), 1);
    // Deleting again is never a success
    let (status, body) = send_request(delete("2"), sqlite_app(db)).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_nonexistent_drink_is_always_not_found() {
    let db = prepare_test_db().await;
    for _ in 0..3 {
        let (status, body) = send_request(delete("99"), sqlite_app(db.clone())).await;
        assert_error(status, &body, StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn delete_requires_its_permission() {
    let db = seeded_db().await;
    let token = valid_token(&["get:drinks-detail", "post:drinks", "patch:drinks"]);
    let req = TestRequest::delete().uri("/drinks/1").insert_header(bearer(&token));
    let (status, body) = send_request(req, sqlite_app(db.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "unauthorized");
    assert!(db.fetch_drink(1).await.unwrap().is_some());
}

#[actix_web::test]
async fn delete_storage_failure_is_unprocessable() {
    let mut store = MockDrinkStore::new();
    store.expect_fetch_drink().returning(|id| {
        Ok(Some(drinks_engine::db_types::Drink { id, title: "Espresso".into(), recipe: espresso().to_string() }))
    });
    store.expect_delete_drink().returning(|_| Err(DrinkApiError::DatabaseError("database is locked".into())));
    let (status, body) = send_request(delete("1"), mock_app(store)).await;
    assert_error(status, &body, StatusCode::UNPROCESSABLE_ENTITY);
}

//----------------------------------------------   Misc  ----------------------------------------------------

#[actix_web::test]
async fn unknown_route_is_not_found() {
    let db = prepare_test_db().await;
    let (status, body) = send_request(TestRequest::get().uri("/cocktails"), sqlite_app(db)).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unsupported_method_on_known_path_is_not_found() {
    let db = seeded_db().await;
    let (status, body) = send_request(TestRequest::put().uri("/drinks"), sqlite_app(db.clone())).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
    let (status, body) = send_request(TestRequest::post().uri("/drinks/1"), sqlite_app(db.clone())).await;
    assert_error(status, &body, StatusCode::NOT_FOUND);
    assert_eq!(db.fetch_all_drinks().await.unwrap().len(), 2);
}
