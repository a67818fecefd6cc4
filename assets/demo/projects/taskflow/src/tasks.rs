use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use anyhow::Result;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub assignee_id: Option<i64>,
    pub project_id: i64,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i64>,
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<i64>,
    pub due_date: Option<String>,
}

pub async fn list_tasks(db: &SqlitePool, project_id: i64) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as!(
        Task,
        "SELECT * FROM tasks WHERE project_id = ? ORDER BY created_at DESC",
        project_id
    )
    .fetch_all(db)
    .await?;
    Ok(tasks)
}

pub async fn create_task(db: &SqlitePool, project_id: i64, req: CreateTask) -> Result<Task> {
    let task = sqlx::query_as!(
        Task,
        r#"
        INSERT INTO tasks (title, description, status, assignee_id, project_id, due_date,
                           created_at, updated_at)
        VALUES (?, ?, 'open', ?, ?, ?, datetime('now'), datetime('now'))
        RETURNING *
        "#,
        req.title, req.description, req.assignee_id, project_id, req.due_date
    )
    .fetch_one(db)
    .await?;
    Ok(task)
}

pub async fn update_task(db: &SqlitePool, id: i64, req: UpdateTask) -> Result<Option<Task>> {
    let task = sqlx::query_as!(
        Task,
        r#"
        UPDATE tasks SET
            title       = COALESCE(?, title),
            description = COALESCE(?, description),
            status      = COALESCE(?, status),
            assignee_id = COALESCE(?, assignee_id),
            due_date    = COALESCE(?, due_date),
            updated_at  = datetime('now')
        WHERE id = ?
        RETURNING *
        "#,
        req.title, req.description, req.status, req.assignee_id, req.due_date, id
    )
    .fetch_optional(db)
    .await?;
    Ok(task)
}

pub async fn search_tasks(db: &SqlitePool, project_id: i64, query: &str) -> Result<Vec<Task>> {
    let pattern = format!("%{query}%");
    let tasks = sqlx::query_as!(
        Task,
        r#"
        SELECT * FROM tasks
        WHERE project_id = ?
          AND (title LIKE ? OR description LIKE ?)
        ORDER BY updated_at DESC
        "#,
        project_id, pattern, pattern
    )
    .fetch_all(db)
    .await?;
    Ok(tasks)
}
