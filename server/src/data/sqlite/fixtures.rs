//! Test fixtures for seeding an in-memory inventory

use sqlx::SqlitePool;

use crate::data::types::{Filter, Tag};

/// Resource seed; `id` is assigned explicitly so tests can exclude by id
pub struct SeedResource<'a> {
    pub id: i64,
    pub provider: &'a str,
    pub account: &'a str,
    pub service: &'a str,
    pub region: &'a str,
    pub name: &'a str,
    pub cost: f64,
    pub tags: &'a [(&'a str, &'a str)],
}

impl Default for SeedResource<'_> {
    fn default() -> Self {
        Self {
            id: 0,
            provider: "AWS",
            account: "111111111111",
            service: "EC2",
            region: "eu-west-1",
            name: "",
            cost: 0.0,
            tags: &[],
        }
    }
}

pub async fn insert_resource(pool: &SqlitePool, seed: SeedResource<'_>) {
    let tags: Vec<Tag> = seed
        .tags
        .iter()
        .map(|(k, v)| Tag {
            key: k.to_string(),
            value: v.to_string(),
        })
        .collect();

    sqlx::query(
        r#"
        INSERT INTO resources
            (id, resource_id, provider, account, service, region, name,
             created_at, fetched_at, cost, metadata, tags, link)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, '{}', ?, '')
        "#,
    )
    .bind(seed.id)
    .bind(format!("res-{}", seed.id))
    .bind(seed.provider)
    .bind(seed.account)
    .bind(seed.service)
    .bind(seed.region)
    .bind(seed.name)
    .bind("2024-05-01T12:00:00Z")
    .bind("2024-05-02T08:30:00Z")
    .bind(seed.cost)
    .bind(serde_json::to_string(&tags).unwrap())
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_view(pool: &SqlitePool, id: i64, filters: &[Filter], exclude: &[i64]) {
    sqlx::query("INSERT INTO views (id, name, filters, exclude) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(format!("view-{}", id))
        .bind(serde_json::to_string(filters).unwrap())
        .bind(serde_json::to_string(exclude).unwrap())
        .execute(pool)
        .await
        .unwrap();
}
