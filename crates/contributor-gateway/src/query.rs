use serde::de::DeserializeOwned;

use crate::error::GatewayError;
use crate::{Gateway, rpc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Read query against a named collection: select all columns, optional
/// equality/OR filters, optional ordering and row limit.
///
/// Renders to PostgREST-style query parameters, e.g.
/// `?select=*&order=created_at.desc&limit=50`.
pub struct QueryBuilder {
    gateway: Gateway,
    table: String,
    filters: Vec<(String, String)>,
    or_group: Option<String>,
    order: Option<(String, Order)>,
    limit: Option<u32>,
}

impl QueryBuilder {
    pub(crate) fn new(gateway: Gateway, table: &str) -> Self {
        Self {
            gateway,
            table: table.to_string(),
            filters: Vec::new(),
            or_group: None,
            order: None,
            limit: None,
        }
    }

    /// Equality filter on a column.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Disjunction of equality filters, rendered as one `or=(...)` parameter.
    pub fn or_eq<I, C, V>(mut self, filters: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: AsRef<str>,
        V: ToString,
    {
        let rendered: Vec<String> = filters
            .into_iter()
            .map(|(column, value)| format!("{}.eq.{}", column.as_ref(), value.to_string()))
            .collect();
        self.or_group = Some(format!("({})", rendered.join(",")));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(self.filters.iter().cloned());
        if let Some(group) = &self.or_group {
            pairs.push(("or".to_string(), group.clone()));
        }
        if let Some((column, order)) = &self.order {
            let direction = match order {
                Order::Ascending => "asc",
                Order::Descending => "desc",
            };
            pairs.push(("order".to_string(), format!("{column}.{direction}")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Execute the read and decode the rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<T, GatewayError> {
        let url = self.gateway.endpoint(&format!("rest/v1/{}", self.table))?;
        let response = self
            .gateway
            .authed(self.gateway.http().get(url))
            .query(&self.query_pairs())
            .send()
            .await?;
        rpc::decode(response).await
    }
}
