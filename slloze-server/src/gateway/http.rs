//! HTTP resource gateway
//!
//! REST client for the upstream resource service. Maps HTTP status codes
//! onto [`GatewayError`], keeping 501 separate from real failures.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use shared::AppError;
use shared::models::{Order, OrderStatus, PaymentMethod, PaymentMethodDraft, Restaurant};

use super::{GatewayError, GatewayResult, PaymentScope, ResourceGateway};

/// HTTP gateway client
///
/// Holds a shared connection pool and an optional service token that is
/// attached as a bearer credential to every request.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn scope_path(scope: &PaymentScope) -> String {
        match scope {
            PaymentScope::User(user_id) => format!("/users/{}/payment-methods", user_id),
            PaymentScope::Global => "/payment-methods".to_string(),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> GatewayResult<T> {
        let mut request = request;
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::NOT_FOUND => GatewayError::NotFound,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
                StatusCode::NOT_IMPLEMENTED => GatewayError::NotImplemented,
                other => GatewayError::Protocol(format!("unexpected status {}", other)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))
    }

    async fn send_empty(&self, request: reqwest::RequestBuilder) -> GatewayResult<()> {
        let mut request = request;
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::NOT_FOUND => GatewayError::NotFound,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
                StatusCode::NOT_IMPLEMENTED => GatewayError::NotImplemented,
                other => GatewayError::Protocol(format!("unexpected status {}", other)),
            });
        }

        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        self.send(self.client.put(self.url(path)).json(body)).await
    }
}

#[async_trait]
impl ResourceGateway for HttpGateway {
    async fn list_restaurants(&self) -> GatewayResult<Vec<Restaurant>> {
        self.get("/restaurants").await
    }

    async fn get_restaurant(&self, id: &str) -> GatewayResult<Restaurant> {
        self.get(&format!("/restaurants/{}", id)).await
    }

    async fn list_orders(&self) -> GatewayResult<Vec<Order>> {
        self.get("/orders").await
    }

    async fn get_order(&self, id: &str) -> GatewayResult<Order> {
        self.get(&format!("/orders/{}", id)).await
    }

    async fn create_order(&self, order: Order) -> GatewayResult<Order> {
        self.post("/orders", &order).await
    }

    async fn set_order_status(&self, id: &str, status: OrderStatus) -> GatewayResult<Order> {
        #[derive(Serialize)]
        struct StatusUpdate {
            status: OrderStatus,
        }
        self.put(&format!("/orders/{}/status", id), &StatusUpdate { status })
            .await
    }

    async fn list_payment_methods(
        &self,
        scope: &PaymentScope,
    ) -> GatewayResult<Vec<PaymentMethod>> {
        self.get(&Self::scope_path(scope)).await
    }

    async fn create_payment_method(
        &self,
        scope: &PaymentScope,
        draft: PaymentMethodDraft,
    ) -> GatewayResult<PaymentMethod> {
        self.post(&Self::scope_path(scope), &draft).await
    }

    async fn update_payment_method(
        &self,
        scope: &PaymentScope,
        method: PaymentMethod,
    ) -> GatewayResult<PaymentMethod> {
        let path = format!("{}/{}", Self::scope_path(scope), method.id);
        self.put(&path, &method).await
    }

    async fn delete_payment_method(&self, scope: &PaymentScope, id: &str) -> GatewayResult<()> {
        let path = format!("{}/{}", Self::scope_path(scope), id);
        self.send_empty(self.client.delete(self.url(&path))).await
    }
}
