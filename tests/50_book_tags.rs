mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn casing_variants_collapse_to_one_tag() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (token, _) = app.register("a@x.com").await?;
    let id = app.create_titled(&token, "Dune").await?;
    let uri = format!("/books/{id}/tags");

    let res = app.post(&uri, &token, json!({ "tags": ["Fiction", " fiction "] })).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["message"], "Added 1 tag(s)");
    assert_eq!(res.data()["book_id"], id);
    assert_eq!(res.data()["tags"].as_array().map(Vec::len), Some(1));
    assert_eq!(res.data()["tags"][0]["name"], "fiction");

    // Attaching again adds nothing
    let res = app.post(&uri, &token, json!({ "tags": ["FICTION"] })).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["message"], "Added 0 tag(s)");
    assert_eq!(res.data()["tags"].as_array().map(Vec::len), Some(1));

    let res = app.get("/tags", &token).await?;
    assert_eq!(res.data().as_array().map(Vec::len), Some(1));
    assert_eq!(res.data()[0]["books_count"], 1);
    Ok(())
}

#[tokio::test]
async fn attach_reports_full_tag_list() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (token, _) = app.register("a@x.com").await?;
    let id = app.create_titled(&token, "Dune").await?;
    let uri = format!("/books/{id}/tags");

    app.post(&uri, &token, json!({ "tags": ["sci-fi"] })).await?;
    let res = app.post(&uri, &token, json!({ "tags": ["classic", "sci-fi"] })).await?;
    assert_eq!(res.body["message"], "Added 1 tag(s)");
    let names: Vec<&str> = res.data()["tags"]
        .as_array()
        .map(|tags| tags.iter().filter_map(|t| t["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, ["classic", "sci-fi"]);

    let res = app.get(&format!("/books/{id}"), &token).await?;
    assert_eq!(res.data()["tags"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn empty_tag_list_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (token, _) = app.register("a@x.com").await?;
    let id = app.create_titled(&token, "Dune").await?;
    let uri = format!("/books/{id}/tags");

    for body in [json!({}), json!({ "tags": [] }), json!({ "tags": ["  ", ""] })] {
        let res = app.post(&uri, &token, body).await?;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.error(), Some("No tags provided"));
    }

    let res = app.get("/tags", &token).await?;
    assert_eq!(res.data(), &json!([]));
    Ok(())
}

#[tokio::test]
async fn detach_removes_only_the_link() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (token, _) = app.register("a@x.com").await?;
    let id = app.create_titled(&token, "Dune").await?;
    let res = app
        .post(&format!("/books/{id}/tags"), &token, json!({ "tags": ["sci-fi", "classic"] }))
        .await?;
    let sci_fi = res.data()["tags"]
        .as_array()
        .and_then(|tags| tags.iter().find(|t| t["name"] == "sci-fi"))
        .and_then(|t| t["id"].as_i64())
        .expect("sci-fi tag");
    let uri = format!("/books/{id}/tags/{sci_fi}");

    let res = app.delete(&uri, &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Tag removed from book");
    assert_eq!(res.data()["tags"], json!([{ "id": res.data()["tags"][0]["id"], "name": "classic" }]));

    // The tag itself survives
    let res = app.get("/tags", &token).await?;
    assert_eq!(res.data().as_array().map(Vec::len), Some(2));

    let res = app.delete(&uri, &token).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), Some("Tag not found on this book"));
    Ok(())
}

#[tokio::test]
async fn unknown_tag_or_book_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (token, _) = app.register("a@x.com").await?;
    let id = app.create_titled(&token, "Dune").await?;

    let res = app.delete(&format!("/books/{id}/tags/999"), &token).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), Some("Tag not found on this book"));

    let res = app.post("/books/999/tags", &token, json!({ "tags": ["x"] })).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error(), Some("Book not found"));
    Ok(())
}

#[tokio::test]
async fn cannot_untag_another_users_book() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (alice, _) = app.register("alice@x.com").await?;
    let (bob, _) = app.register("bob@x.com").await?;
    let id = app.create_titled(&alice, "Dune").await?;
    let res = app
        .post(&format!("/books/{id}/tags"), &alice, json!({ "tags": ["mine"] }))
        .await?;
    let tag_id = res.data()["tags"][0]["id"].as_i64().expect("tag id");

    let res = app.delete(&format!("/books/{id}/tags/{tag_id}"), &bob).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get(&format!("/books/{id}"), &alice).await?;
    assert_eq!(res.data()["tags"][0]["name"], "mine");
    Ok(())
}

#[tokio::test]
async fn tags_are_per_user() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (alice, _) = app.register("alice@x.com").await?;
    let (bob, _) = app.register("bob@x.com").await?;
    let a = app.create_titled(&alice, "A").await?;
    let b = app.create_titled(&bob, "B").await?;

    let ra = app.post(&format!("/books/{a}/tags"), &alice, json!({ "tags": ["fiction"] })).await?;
    let rb = app.post(&format!("/books/{b}/tags"), &bob, json!({ "tags": ["fiction"] })).await?;
    assert_ne!(ra.data()["tags"][0]["id"], rb.data()["tags"][0]["id"]);
    Ok(())
}

#[tokio::test]
async fn concurrent_attach_creates_one_tag() -> Result<()> {
    let app = TestApp::spawn().await?;
    let (token, _) = app.register("a@x.com").await?;
    let first = app.create_titled(&token, "First").await?;
    let second = app.create_titled(&token, "Second").await?;

    let first_uri = format!("/books/{first}/tags");
    let second_uri = format!("/books/{second}/tags");

    let (a, b) = tokio::join!(
        app.post(&first_uri, &token, json!({ "tags": ["New"] })),
        app.post(&second_uri, &token, json!({ "tags": ["new"] })),
    );
    assert_eq!(a?.status, StatusCode::CREATED);
    assert_eq!(b?.status, StatusCode::CREATED);

    let res = app.get("/tags", &token).await?;
    assert_eq!(res.data().as_array().map(Vec::len), Some(1));
    assert_eq!(res.data()[0]["books_count"], 2);
    Ok(())
}
