use crate::backend::traits::{FavoriteRepository, PropertyRepository};
use crate::backend::types::BackendConfig;
use crate::models::{NewProperty, Property};
use crate::search::{Clause, Literal, Order, PropertyQuery};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

const PROPERTIES: &str = "properties";
const FAVORITES: &str = "favorites";

/// Property columns plus the embedded landlord summary
const PROPERTY_SELECT: &str = "*,landlord:profiles(full_name,phone,profile_image,verified)";

/// Client for the hosted PostgREST API
pub struct RestBackend {
    client: Client,
    config: BackendConfig,
}

#[derive(Debug, Deserialize)]
struct FavoriteRow {
    property_id: String,
}

impl RestBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("rental-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.config.bearer())
    }

    async fn send(builder: RequestBuilder, action: &str) -> Result<Response> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to {}", action))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned status {} while trying to {}", status, action);
            anyhow::bail!("Failed to {}: {} {}", action, status, body);
        }

        Ok(response)
    }
}

/// Render a clause as a PostgREST query parameter
pub fn render_clause(clause: &Clause) -> (String, String) {
    let value = match clause {
        Clause::Eq { value, .. } => format!("eq.{}", value),
        Clause::Gte { value, .. } => format!("gte.{}", value),
        Clause::Lte { value, .. } => format!("lte.{}", value),
        Clause::ILike { pattern, .. } => format!("ilike.{}", pattern),
        Clause::In { values, .. } => {
            let items: Vec<String> = values.iter().map(render_list_item).collect();
            format!("in.({})", items.join(","))
        }
    };
    (clause.column().to_string(), value)
}

fn render_list_item(value: &Literal) -> String {
    match value {
        Literal::Text(text) => {
            let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", escaped)
        }
        other => other.to_string(),
    }
}

fn render_query(query: &PropertyQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), PROPERTY_SELECT.to_string())];
    params.extend(query.clauses.iter().map(render_clause));
    if let Some(Order::NewestFirst) = query.order {
        params.push(("order".to_string(), "created_at.desc".to_string()));
    }
    params
}

#[async_trait]
impl PropertyRepository for RestBackend {
    async fn fetch(&self, query: &PropertyQuery) -> Result<Vec<Property>> {
        let params = render_query(query);
        debug!(
            "Fetching {} with {} clauses",
            self.table_url(PROPERTIES),
            query.clauses.len()
        );

        let response = Self::send(
            self.request(Method::GET, PROPERTIES).query(&params),
            "fetch properties",
        )
        .await?;

        let properties: Vec<Property> = response
            .json()
            .await
            .context("Failed to decode properties")?;

        info!("Fetched {} properties", properties.len());
        Ok(properties)
    }

    async fn get(&self, id: &str) -> Result<Option<Property>> {
        let response = Self::send(
            self.request(Method::GET, PROPERTIES).query(&[
                ("select", PROPERTY_SELECT.to_string()),
                ("id", format!("eq.{}", id)),
                ("limit", "1".to_string()),
            ]),
            "fetch property",
        )
        .await?;

        let rows: Vec<Property> = response
            .json()
            .await
            .context("Failed to decode property")?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, property: NewProperty) -> Result<Property> {
        let response = Self::send(
            self.request(Method::POST, PROPERTIES)
                .header("Prefer", "return=representation")
                .json(&property),
            "insert property",
        )
        .await?;

        let rows: Vec<Property> = response
            .json()
            .await
            .context("Failed to decode inserted property")?;

        let row = rows
            .into_iter()
            .next()
            .context("Insert returned no rows")?;
        info!("Inserted property {}", row.id);
        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        Self::send(
            self.request(Method::DELETE, PROPERTIES)
                .query(&[("id", format!("eq.{}", id))]),
            "delete property",
        )
        .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Supabase"
    }
}

#[async_trait]
impl FavoriteRepository for RestBackend {
    async fn list(&self, user_id: &str) -> Result<Vec<String>> {
        let response = Self::send(
            self.request(Method::GET, FAVORITES).query(&[
                ("select", "property_id".to_string()),
                ("user_id", format!("eq.{}", user_id)),
            ]),
            "fetch favorites",
        )
        .await?;

        let rows: Vec<FavoriteRow> = response
            .json()
            .await
            .context("Failed to decode favorites")?;
        Ok(rows.into_iter().map(|row| row.property_id).collect())
    }

    async fn insert(&self, user_id: &str, property_id: &str) -> Result<()> {
        Self::send(
            self.request(Method::POST, FAVORITES)
                .header("Prefer", "return=minimal")
                .json(&json!({
                    "user_id": user_id,
                    "property_id": property_id,
                })),
            "add favorite",
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str, property_id: &str) -> Result<()> {
        Self::send(
            self.request(Method::DELETE, FAVORITES).query(&[
                ("user_id", format!("eq.{}", user_id)),
                ("property_id", format!("eq.{}", property_id)),
            ]),
            "remove favorite",
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_properties;
    use crate::models::PropertyType;
    use crate::search::SearchFilters;
    use httpmock::prelude::*;
    use std::collections::BTreeSet;

    fn backend(server: &MockServer) -> RestBackend {
        backend_with_token(server, None)
    }

    fn backend_with_token(server: &MockServer, access_token: Option<&str>) -> RestBackend {
        RestBackend::new(BackendConfig {
            url: server.base_url(),
            anon_key: "anon".to_string(),
            access_token: access_token.map(str::to_string),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn sample_row() -> serde_json::Value {
        serde_json::to_value(&sample_properties()[0]).unwrap()
    }

    #[test]
    fn renders_postgrest_operators() {
        let clause = Clause::In {
            column: "property_type",
            values: vec![
                Literal::Text("shared-room".to_string()),
                Literal::Text("a \"b\"".to_string()),
            ],
        };
        assert_eq!(
            render_clause(&clause),
            (
                "property_type".to_string(),
                "in.(\"shared-room\",\"a \\\"b\\\"\")".to_string()
            )
        );

        let clause = Clause::In {
            column: "bedrooms",
            values: vec![Literal::Int(1), Literal::Int(3)],
        };
        assert_eq!(render_clause(&clause).1, "in.(1,3)");

        let clause = Clause::Eq {
            column: "parking",
            value: Literal::Bool(false),
        };
        assert_eq!(render_clause(&clause).1, "eq.false");
    }

    #[tokio::test]
    async fn fetch_sends_clauses_as_query_parameters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/properties")
                    .query_param("select", PROPERTY_SELECT)
                    .query_param("available", "eq.true")
                    .query_param("city", "ilike.%Delhi%")
                    .query_param("bedrooms", "in.(2)")
                    .query_param("property_type", "in.(\"apartment\")")
                    .query_param("order", "created_at.desc")
                    .header("apikey", "anon")
                    .header("Authorization", "Bearer anon");
                then.status(200).json_body(json!([sample_row()]));
            })
            .await;

        let filters = SearchFilters {
            city: "Delhi".to_string(),
            bedrooms: BTreeSet::from([2]),
            property_types: BTreeSet::from([PropertyType::Apartment]),
            ..SearchFilters::default()
        };

        let properties = backend(&server)
            .fetch(&PropertyQuery::from_filters(&filters))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].id, sample_properties()[0].id);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/properties");
                then.status(500).body("database unavailable");
            })
            .await;

        let err = backend(&server)
            .fetch(&PropertyQuery::from_filters(&SearchFilters::default()))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("500"), "{}", message);
        assert!(message.contains("database unavailable"), "{}", message);
    }

    #[tokio::test]
    async fn get_returns_none_for_empty_result() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/properties")
                    .query_param("id", "eq.missing")
                    .query_param("limit", "1");
                then.status(200).json_body(json!([]));
            })
            .await;

        let found = backend(&server).get("missing").await.unwrap();
        mock.assert_async().await;
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn signed_in_requests_carry_the_user_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/favorites")
                    .header("apikey", "anon")
                    .header("Authorization", "Bearer user-jwt");
                then.status(200).json_body(json!([{ "property_id": "p1" }]));
            })
            .await;

        let ids = backend_with_token(&server, Some("user-jwt"))
            .list("u1")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(ids, vec!["p1"]);
    }

    #[tokio::test]
    async fn insert_asks_for_representation() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/properties")
                    .header("Prefer", "return=representation");
                then.status(201).json_body(json!([sample_row()]));
            })
            .await;

        let draft = crate::data::sample_listing_draft();
        let new_property = draft.into_new_property("owner-1");
        let row = PropertyRepository::insert(&backend(&server), new_property)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(row.id, sample_properties()[0].id);
    }

    #[tokio::test]
    async fn favorites_round_trip_through_the_api() {
        let server = MockServer::start_async().await;
        let list = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/favorites")
                    .query_param("select", "property_id")
                    .query_param("user_id", "eq.u1");
                then.status(200)
                    .json_body(json!([{ "property_id": "p1" }, { "property_id": "p2" }]));
            })
            .await;
        let add = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/favorites")
                    .json_body(json!({ "user_id": "u1", "property_id": "p3" }));
                then.status(201);
            })
            .await;
        let remove = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/rest/v1/favorites")
                    .query_param("user_id", "eq.u1")
                    .query_param("property_id", "eq.p1");
                then.status(204);
            })
            .await;

        let backend = backend(&server);
        let ids = backend.list("u1").await.unwrap();
        assert_eq!(ids, vec!["p1".to_string(), "p2".to_string()]);

        FavoriteRepository::insert(&backend, "u1", "p3").await.unwrap();
        FavoriteRepository::delete(&backend, "u1", "p1").await.unwrap();

        list.assert_async().await;
        add.assert_async().await;
        remove.assert_async().await;
    }
}
