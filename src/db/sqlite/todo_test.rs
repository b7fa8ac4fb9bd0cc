//! Tests for SqliteTodoRepository.

use chrono::{Duration, Utc};

use crate::db::{
    CategoryRepository, Database, ErrorKind, NewTodo, Priority, SqliteDatabase, TodoRepository,
    TodoUpdate,
};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn update_with(title: &str, priority: Option<i64>) -> TodoUpdate {
    TodoUpdate {
        title: title.to_string(),
        description: String::new(),
        category_id: None,
        priority,
        due_date: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_create_applies_defaults() {
    let db = setup_db().await;

    let todo = db
        .todos()
        .create("Water the plants")
        .await
        .expect("Create should succeed");

    assert!(todo.id > 0);
    assert_eq!(todo.title, "Water the plants");
    assert_eq!(todo.description, "");
    assert_eq!(todo.category_id, None);
    assert_eq!(todo.category, None);
    assert_eq!(todo.priority, Priority::Low);
    assert_eq!(todo.due_date, None);
    assert!(!todo.completed);
    assert_eq!(todo.created_at, todo.updated_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_create_with_category_joins_projection() {
    let db = setup_db().await;
    let category = db
        .categories()
        .create("Garden", "#00ff00")
        .await
        .unwrap();

    let todo = db
        .todos()
        .create_with_category("Mow the lawn", Some(category.id))
        .await
        .expect("Create should succeed");

    assert_eq!(todo.category_id, Some(category.id));
    let summary = todo.category.expect("Category should be joined");
    assert_eq!(summary.id, category.id);
    assert_eq!(summary.name, "Garden");
    assert_eq!(summary.color, "#00ff00");
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_create_with_category_and_priority() {
    let db = setup_db().await;

    let todo = db
        .todos()
        .create_with_category_and_priority("File taxes", None, 3)
        .await
        .expect("Create should succeed");

    assert_eq!(todo.priority, Priority::High);
    assert_eq!(todo.category_id, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_create_clamps_out_of_range_priority() {
    let db = setup_db().await;
    let todos = db.todos();

    let too_high = todos
        .create_with_category_and_priority("Too high", None, 5)
        .await
        .unwrap();
    assert_eq!(too_high.priority, Priority::Low);

    let too_low = todos
        .create_full(NewTodo {
            priority: 0,
            ..NewTodo::new("Too low")
        })
        .await
        .unwrap();
    assert_eq!(too_low.priority, Priority::Low);

    let stored: i64 = sqlx::query_scalar("SELECT priority FROM todos WHERE id = ?")
        .bind(too_high.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_create_full_stores_every_field() {
    let db = setup_db().await;
    let category = db.categories().create("Admin", "").await.unwrap();
    let due = Utc::now() + Duration::days(3);

    let todo = db
        .todos()
        .create_full(NewTodo {
            title: "Renew passport".to_string(),
            description: "Bring two photos".to_string(),
            category_id: Some(category.id),
            priority: 2,
            due_date: Some(due),
        })
        .await
        .expect("Create should succeed");

    assert_eq!(todo.title, "Renew passport");
    assert_eq!(todo.description, "Bring two photos");
    assert_eq!(todo.category_id, Some(category.id));
    assert_eq!(todo.priority, Priority::Medium);
    // Stored with microsecond precision
    let stored_due = todo.due_date.expect("Due date should be stored");
    assert!((stored_due - due).num_microseconds().unwrap().abs() < 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_create_with_unknown_category_is_rejected() {
    let db = setup_db().await;

    let err = db
        .todos()
        .create_with_category("Orphan", Some(9999))
        .await
        .expect_err("Dangling category should be rejected");

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(db.todos().list().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_get_nonexistent_returns_not_found() {
    let db = setup_db().await;

    let err = db.todos().get(9999).await.expect_err("Get should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_toggle_twice_restores_state() {
    let db = setup_db().await;
    let todos = db.todos();

    let original = todos.create("Flip me").await.unwrap();

    let once = todos.toggle(original.id).await.expect("Toggle should succeed");
    assert!(once.completed);
    assert!(once.updated_at > original.updated_at);

    let twice = todos.toggle(original.id).await.expect("Toggle should succeed");
    assert_eq!(twice.completed, original.completed);
    assert!(twice.updated_at > once.updated_at);
    assert_eq!(twice.created_at, original.created_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_toggle_nonexistent_returns_not_found() {
    let db = setup_db().await;

    let err = db.todos().toggle(9999).await.expect_err("Toggle should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_update_without_priority_keeps_it() {
    let db = setup_db().await;
    let todos = db.todos();

    let todo = todos
        .create_with_category_and_priority("Keep priority", None, 3)
        .await
        .unwrap();

    let updated = todos
        .update(todo.id, update_with("Renamed", None))
        .await
        .expect("Update should succeed");

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.priority, Priority::High);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_update_with_priority_overwrites_it() {
    let db = setup_db().await;
    let todos = db.todos();

    let todo = todos
        .create_with_category_and_priority("Change priority", None, 3)
        .await
        .unwrap();

    let updated = todos
        .update(todo.id, update_with("Change priority", Some(2)))
        .await
        .expect("Update should succeed");

    assert_eq!(updated.priority, Priority::Medium);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_update_overwrites_other_fields_unconditionally() {
    let db = setup_db().await;
    let todos = db.todos();
    let category = db.categories().create("Reading", "").await.unwrap();

    let todo = todos
        .create_full(NewTodo {
            title: "Read a book".to_string(),
            description: "Something long".to_string(),
            category_id: Some(category.id),
            priority: 2,
            due_date: Some(Utc::now() + Duration::days(7)),
        })
        .await
        .unwrap();

    let updated = todos
        .update(todo.id, update_with("Read an article", None))
        .await
        .expect("Update should succeed");

    assert_eq!(updated.title, "Read an article");
    assert_eq!(updated.description, "");
    assert_eq!(updated.category_id, None);
    assert_eq!(updated.category, None);
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.priority, Priority::Medium);
    assert!(updated.updated_at > todo.updated_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_update_clamps_out_of_range_priority() {
    let db = setup_db().await;
    let todos = db.todos();

    let todo = todos
        .create_with_category_and_priority("Clamp on update", None, 3)
        .await
        .unwrap();

    let updated = todos
        .update(todo.id, update_with("Clamp on update", Some(9)))
        .await
        .unwrap();
    assert_eq!(updated.priority, Priority::Low);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_update_nonexistent_returns_not_found() {
    let db = setup_db().await;

    let err = db
        .todos()
        .update(9999, update_with("Ghost", None))
        .await
        .expect_err("Update should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_delete() {
    let db = setup_db().await;
    let todos = db.todos();

    let todo = todos.create("Delete me").await.unwrap();
    todos.delete(todo.id).await.expect("Delete should succeed");

    let err = todos.get(todo.id).await.expect_err("Todo should be gone");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = todos
        .delete(todo.id)
        .await
        .expect_err("Second delete should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_list_orders_by_urgency() {
    let db = setup_db().await;
    let todos = db.todos();
    let now = Utc::now();

    let done = todos
        .create_with_category_and_priority("D: done", None, 3)
        .await
        .unwrap();
    todos.toggle(done.id).await.unwrap();

    let undated = todos
        .create_with_category_and_priority("C: undated", None, 3)
        .await
        .unwrap();

    let upcoming = todos
        .create_full(NewTodo {
            priority: 3,
            due_date: Some(now + Duration::days(1)),
            ..NewTodo::new("B: due tomorrow")
        })
        .await
        .unwrap();

    let overdue = todos
        .create_full(NewTodo {
            priority: 1,
            due_date: Some(now - Duration::days(1)),
            ..NewTodo::new("A: due yesterday")
        })
        .await
        .unwrap();

    let ids: Vec<i64> = todos
        .list()
        .await
        .expect("List should succeed")
        .iter()
        .map(|t| t.id)
        .collect();

    assert_eq!(ids, vec![overdue.id, upcoming.id, undated.id, done.id]);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_list_breaks_ties_by_due_date_then_priority_then_recency() {
    let db = setup_db().await;
    let todos = db.todos();
    let due = Utc::now() + Duration::days(2);

    let later_due = todos
        .create_full(NewTodo {
            priority: 3,
            due_date: Some(due + Duration::hours(1)),
            ..NewTodo::new("Later due")
        })
        .await
        .unwrap();
    let same_due_low = todos
        .create_full(NewTodo {
            priority: 1,
            due_date: Some(due),
            ..NewTodo::new("Same due, low")
        })
        .await
        .unwrap();
    let same_due_high = todos
        .create_full(NewTodo {
            priority: 3,
            due_date: Some(due),
            ..NewTodo::new("Same due, high")
        })
        .await
        .unwrap();

    let older_undated = todos.create("Older undated").await.unwrap();
    let newer_undated = todos.create("Newer undated").await.unwrap();

    let ids: Vec<i64> = todos.list().await.unwrap().iter().map(|t| t.id).collect();

    assert_eq!(
        ids,
        vec![
            same_due_high.id,
            same_due_low.id,
            later_due.id,
            newer_undated.id,
            older_undated.id,
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_search_matches_description_only_todo() {
    let db = setup_db().await;
    let todos = db.todos();

    todos.create("Buy groceries").await.unwrap();
    let target = todos
        .create_full(NewTodo {
            description: "remember the zucchini".to_string(),
            ..NewTodo::new("Cook dinner")
        })
        .await
        .unwrap();
    todos.create("Call mom").await.unwrap();

    let results = todos
        .search("zucchini")
        .await
        .expect("Search should succeed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, target.id);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_search_matches_title_substring_and_keeps_order() {
    let db = setup_db().await;
    let todos = db.todos();

    let low = todos
        .create_with_category_and_priority("Report draft", None, 1)
        .await
        .unwrap();
    let high = todos
        .create_with_category_and_priority("Final report", None, 3)
        .await
        .unwrap();
    todos.create("Unrelated").await.unwrap();

    let ids: Vec<i64> = todos
        .search("report")
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();

    // LIKE is case-insensitive for ASCII; priority orders within the bucket
    assert_eq!(ids, vec![high.id, low.id]);
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_search_treats_wildcards_literally() {
    let db = setup_db().await;
    let todos = db.todos();

    let discount = todos.create("Use 50% coupon").await.unwrap();
    todos.create("Use 50 coupons").await.unwrap();

    let results = todos.search("50%").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, discount.id);

    let none = todos.search("_").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn todo_list_reflects_category_rename() {
    let db = setup_db().await;
    let categories = db.categories();

    let category = categories.create("Old name", "#111111").await.unwrap();
    let todo = db
        .todos()
        .create_with_category("Follows rename", Some(category.id))
        .await
        .unwrap();

    categories
        .update(category.id, "New name", "#222222")
        .await
        .unwrap();

    let fetched = db.todos().get(todo.id).await.unwrap();
    let summary = fetched.category.unwrap();
    assert_eq!(summary.name, "New name");
    assert_eq!(summary.color, "#222222");
}
