//! Host integration seams: server logout notification and sign-in redirect

use async_trait::async_trait;
use serde_json::json;

/// Notifies the server that an identity has logged out.
///
/// Fire-and-forget: the manager logs a failure and proceeds with local
/// cleanup regardless, so implementations should not retry indefinitely.
#[async_trait]
pub trait LogoutNotifier: Send + Sync {
    async fn notify_logout(&self, identity: &str) -> anyhow::Result<()>;
}

/// Navigates the user to the sign-in entry point after logout.
///
/// Supplied by the host page; must not fail from the manager's point of
/// view.
pub trait SignInRedirect: Send + Sync {
    fn redirect_to_sign_in(&self, identity: &str);
}

/// `POST`s the logged-out identity to a configured endpoint. No response
/// body is required; any non-success status is reported as an error for
/// the manager to log.
pub struct HttpLogoutNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLogoutNotifier {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LogoutNotifier for HttpLogoutNotifier {
    async fn notify_logout(&self, identity: &str) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "identity": identity }))
            .send()
            .await?;

        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_notify_posts_identity() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .and(body_json(json!({ "identity": "alice" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier =
            HttpLogoutNotifier::new(reqwest::Client::new(), format!("{}/auth/logout", server.uri()));

        notifier.notify_logout("alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_notify_surfaces_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier =
            HttpLogoutNotifier::new(reqwest::Client::new(), format!("{}/auth/logout", server.uri()));

        assert!(notifier.notify_logout("alice").await.is_err());
    }

    #[tokio::test]
    async fn test_notify_surfaces_unreachable_endpoint() {
        // Port 9 (discard) is a safe never-listening target.
        let notifier =
            HttpLogoutNotifier::new(reqwest::Client::new(), "http://127.0.0.1:9/auth/logout");

        assert!(notifier.notify_logout("alice").await.is_err());
    }
}
