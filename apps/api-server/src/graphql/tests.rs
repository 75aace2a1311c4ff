use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use folio_core::domain::PostFilter;
use folio_core::pagination::PageRequest;
use folio_core::ports::{PostRepository, UserRepository};
use folio_infra::database::seed;

use super::loader::Loader;
use crate::handlers::configure_routes;
use crate::state::test_state;

macro_rules! graphql_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

fn gql(query: &str, variables: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/graphql")
        .set_json(json!({ "query": query, "variables": variables }))
}

#[actix_web::test]
async fn test_create_and_query_through_graphql() {
    let app = graphql_app!(test_state().await);

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            r#"mutation($input: CreateUserInput!) { createUser(input: $input) { id name avatarUrl createdAt } }"#,
            json!({ "input": { "name": "Grace" } }),
        )
        .to_request(),
    )
    .await;
    assert!(body.get("errors").is_none(), "{body}");
    let user = &body["data"]["createUser"];
    assert_eq!(user["name"], "Grace");
    assert!(user["avatarUrl"].is_null());
    assert!(user["createdAt"].as_str().unwrap().ends_with('Z'));
    let user_id = user["id"].as_str().unwrap().to_string();

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            r#"mutation { createCategory(input: { name: "Development", slug: "dev" }) { id } }"#,
            json!({}),
        )
        .to_request(),
    )
    .await;
    let category_id = body["data"]["createCategory"]["id"].as_str().unwrap().to_string();

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            r#"mutation($input: CreatePostInput!) { createPost(input: $input) { id published } }"#,
            json!({ "input": {
                "title": "Hello",
                "content": "First post",
                "authorId": user_id,
                "categoryId": category_id,
            }}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["data"]["createPost"]["published"], false);

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            r#"{ posts(limit: 5, filters: { categorySlug: "dev" }) {
                    posts { title author { name } category { slug } comments { id } }
                    pagination { page limit hasMore }
                } }"#,
            json!({}),
        )
        .to_request(),
    )
    .await;
    let connection = &body["data"]["posts"];
    assert_eq!(connection["pagination"], json!({ "page": 1, "limit": 5, "hasMore": false }));
    assert_eq!(connection["posts"][0]["author"]["name"], "Grace");
    assert_eq!(connection["posts"][0]["category"]["slug"], "dev");
    assert_eq!(connection["posts"][0]["comments"], json!([]));

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            r#"{ categoryBySlug(slug: "dev") { name posts { title } } }"#,
            json!({}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["data"]["categoryBySlug"]["posts"][0]["title"], "Hello");
}

#[actix_web::test]
async fn test_mutation_errors_carry_codes() {
    let app = graphql_app!(test_state().await);

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            r#"mutation($id: ID!) { updateUser(id: $id, input: { name: "Nobody" }) { id } }"#,
            json!({ "id": uuid::Uuid::new_v4() }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["errors"][0]["message"], "User not found");
    assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            r#"mutation { createCategory(input: { name: "Bad", slug: "Not A Slug" }) { id } }"#,
            json!({}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
    assert!(body["errors"][0]["extensions"]["validation"]["slug"].is_array());

    let body: Value = test::call_and_read_body_json(
        &app,
        gql(
            r#"mutation($id: ID!) { deleteComment(id: $id) }"#,
            json!({ "id": uuid::Uuid::new_v4() }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(body["data"]["deleteComment"], false);
}

#[actix_web::test]
async fn test_create_post_published_defaults_to_false() {
    let state = test_state().await;
    seed::seed(state.database.db().unwrap()).await.unwrap();
    let users = state.repos.users.list(PageRequest::default()).await.unwrap();
    let posts = state
        .repos
        .posts
        .list(&PostFilter::default(), PageRequest::default())
        .await
        .unwrap();
    let app = graphql_app!(state);

    let mutation = r#"mutation($input: CreatePostInput!) { createPost(input: $input) { published } }"#;
    let mut input = json!({
        "title": "Draft",
        "content": "Not ready yet",
        "authorId": users[0].id,
        "categoryId": posts[0].category_id,
    });

    let body: Value =
        test::call_and_read_body_json(&app, gql(mutation, json!({ "input": input })).to_request())
            .await;
    assert!(body.get("errors").is_none(), "{body}");
    assert_eq!(body["data"]["createPost"]["published"], false);

    input["published"] = Value::Null;
    let body: Value =
        test::call_and_read_body_json(&app, gql(mutation, json!({ "input": input })).to_request())
            .await;
    assert!(body.get("errors").is_none(), "{body}");
    assert_eq!(body["data"]["createPost"]["published"], false);

    input["published"] = json!(true);
    let body: Value =
        test::call_and_read_body_json(&app, gql(mutation, json!({ "input": input })).to_request())
            .await;
    assert_eq!(body["data"]["createPost"]["published"], true);
}

#[actix_web::test]
async fn test_malformed_query_is_400() {
    let app = graphql_app!(test_state().await);

    let resp = test::call_service(&app, gql("{ users { ", json!({})).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_graphiql_page() {
    let app = graphql_app!(test_state().await);

    let req = test::TestRequest::get().uri("/graphql").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = test::read_body(resp).await;
    assert!(std::str::from_utf8(&html).unwrap().contains("graphiql"));
}

#[tokio::test]
async fn test_loader_batches_registered_keys() {
    let state = test_state().await;
    seed::seed(state.database.db().unwrap()).await.unwrap();

    let page = PageRequest::new(Some(1), Some(10)).unwrap();
    let posts = state.repos.posts.list(&PostFilter::default(), page).await.unwrap();
    assert_eq!(posts.len(), 7);

    let loader = Loader::new(state.repos.clone());
    loader.register_posts(&posts).await;

    for post in &posts {
        let author = loader.user(post.author_id).await.unwrap().unwrap();
        assert_eq!(author.id, post.author_id);
        let category = loader.category(post.category_id).await.unwrap().unwrap();
        assert_eq!(category.id, post.category_id);
    }
    // One query per relation kind, however many posts asked.
    assert_eq!(loader.batches(), 2);

    let counts: usize = futures::future::join_all(
        posts.iter().map(|post| loader.comments_by_post(post.id)),
    )
    .await
    .into_iter()
    .map(|comments| comments.unwrap().len())
    .sum();
    assert_eq!(counts, 9);
    assert_eq!(loader.batches(), 3);
}

#[tokio::test]
async fn test_loader_primes_parents() {
    let state = test_state().await;
    seed::seed(state.database.db().unwrap()).await.unwrap();

    let users = state.repos.users.list(PageRequest::default()).await.unwrap();
    let loader = Loader::new(state.repos.clone());
    loader.prime_user(&users[0]).await;

    let cached = loader.user(users[0].id).await.unwrap();
    assert_eq!(cached.as_ref(), Some(&users[0]));
    assert_eq!(loader.batches(), 0);

    // Unregistered keys still load, alone.
    let missing = loader.user(uuid::Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
    assert_eq!(loader.batches(), 1);
}
