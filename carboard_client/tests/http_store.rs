//! Round-trips `HttpStore` against an in-process axum stand-in for the
//! remote store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use carboard_client::HttpStore;
use carboard_core::models::{Category, Comment, EditItemInput, Item, NewComment, NewItem};
use carboard_core::remote::RemoteStore;

#[derive(Default)]
struct Tables {
    items: HashMap<String, Item>,
    comments: HashMap<String, Comment>,
}

type Shared = Arc<Mutex<Tables>>;

async fn list_items(State(state): State<Shared>) -> Json<Vec<Item>> {
    let tables = state.lock().unwrap();
    Json(tables.items.values().cloned().collect())
}

async fn get_item(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Item>, StatusCode> {
    let tables = state.lock().unwrap();
    tables
        .items
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_item(State(state): State<Shared>, Json(input): Json<NewItem>) -> Json<Item> {
    let item = Item {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        description: input.description,
        image_data: input.image_data,
        category: input.category,
        vote_count: 0,
        secret: input.secret,
        repost_of: input.repost_of,
        created_at: Utc::now(),
    };
    state
        .lock()
        .unwrap()
        .items
        .insert(item.id.clone(), item.clone());
    Json(item)
}

async fn patch_item(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> StatusCode {
    let mut tables = state.lock().unwrap();
    let Some(item) = tables.items.get_mut(&id) else {
        return StatusCode::NOT_FOUND;
    };
    if let Some(votes) = patch.get("vote_count").and_then(|v| v.as_u64()) {
        item.vote_count = votes as u32;
        return StatusCode::NO_CONTENT;
    }
    match serde_json::from_value::<EditItemInput>(patch) {
        Ok(edit) => {
            item.title = edit.title;
            item.description = edit.description;
            item.image_data = edit.image_data;
            item.category = edit.category;
            StatusCode::NO_CONTENT
        }
        Err(_) => StatusCode::BAD_REQUEST,
    }
}

async fn delete_item(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    state.lock().unwrap().items.remove(&id);
    StatusCode::NO_CONTENT
}

async fn list_comments(State(state): State<Shared>, Path(id): Path<String>) -> Json<Vec<Comment>> {
    let tables = state.lock().unwrap();
    let mut comments: Vec<Comment> = tables
        .comments
        .values()
        .filter(|comment| comment.item_id == id)
        .cloned()
        .collect();
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(comments)
}

async fn create_comment(
    State(state): State<Shared>,
    Json(input): Json<NewComment>,
) -> Json<Comment> {
    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        item_id: input.item_id,
        content: input.content,
        secret: input.secret,
        created_at: Utc::now(),
    };
    state
        .lock()
        .unwrap()
        .comments
        .insert(comment.id.clone(), comment.clone());
    Json(comment)
}

async fn get_comment(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Comment>, StatusCode> {
    let tables = state.lock().unwrap();
    tables
        .comments
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn patch_comment(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> StatusCode {
    let mut tables = state.lock().unwrap();
    let Some(comment) = tables.comments.get_mut(&id) else {
        return StatusCode::NOT_FOUND;
    };
    match patch.get("content").and_then(|v| v.as_str()) {
        Some(content) => {
            comment.content = content.to_string();
            StatusCode::NO_CONTENT
        }
        None => StatusCode::BAD_REQUEST,
    }
}

async fn delete_comment(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    state.lock().unwrap().comments.remove(&id);
    StatusCode::NO_CONTENT
}

fn router() -> Router {
    let state: Shared = Shared::default();
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(get_item).patch(patch_item).delete(delete_item),
        )
        .route("/items/:id/comments", get(list_comments))
        .route("/comments", post(create_comment))
        .route(
            "/comments/:id",
            get(get_comment).patch(patch_comment).delete(delete_comment),
        )
        .with_state(state)
}

/// Binds an ephemeral port, then serves from a background thread with
/// its own runtime so the test body can use the blocking client.
fn start_mock_remote() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    listener.set_nonblocking(true).expect("nonblocking");
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            axum::serve(listener, router()).await.expect("serve");
        });
    });
    format!("http://{addr}")
}

#[test]
fn items_round_trip_through_the_http_adapter() {
    let store = HttpStore::new(start_mock_remote()).expect("store");

    let created = store
        .insert_item(&NewItem {
            title: "Civic Type R".into(),
            description: "track build".into(),
            category: Category::Build,
            secret: "k1".into(),
            ..NewItem::default()
        })
        .expect("insert");
    assert_eq!(created.vote_count, 0);

    let listed = store.list_items().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Civic Type R");

    store.update_vote_count(&created.id, 5).expect("vote");
    let fetched = store.get_item(&created.id).expect("get").expect("present");
    assert_eq!(fetched.vote_count, 5);

    store
        .update_item(
            &created.id,
            &EditItemInput {
                title: "Civic Type R (sold)".into(),
                description: "track build".into(),
                image_data: None,
                category: Category::Build,
            },
        )
        .expect("edit");
    let fetched = store.get_item(&created.id).expect("get").expect("present");
    assert_eq!(fetched.title, "Civic Type R (sold)");
    // The vote patch and the edit patch touch disjoint fields.
    assert_eq!(fetched.vote_count, 5);

    store.delete_item(&created.id).expect("delete");
    assert!(store.get_item(&created.id).expect("get").is_none());
}

#[test]
fn comments_round_trip_and_missing_rows_are_none() {
    let store = HttpStore::new(start_mock_remote()).expect("store");

    assert!(store.get_item("ghost").expect("get").is_none());
    assert!(store.get_comment("ghost").expect("get").is_none());

    let item = store
        .insert_item(&NewItem {
            title: "MX-5".into(),
            secret: "k1".into(),
            ..NewItem::default()
        })
        .expect("insert item");

    let comment = store
        .insert_comment(&NewComment {
            item_id: item.id.clone(),
            content: "clean".into(),
            secret: "c1".into(),
        })
        .expect("insert comment");

    store
        .update_comment(&comment.id, "very clean")
        .expect("update comment");
    let listed = store.list_comments(&item.id).expect("list comments");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].content, "very clean");

    store.delete_comment(&comment.id).expect("delete comment");
    assert!(store.list_comments(&item.id).expect("list").is_empty());
}
