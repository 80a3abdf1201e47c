//! 인증 토큰 관리.
//!
//! 서버 로그인으로 `SessionContext`를 생성하고, 로그아웃 시 폐기한다.
//! 다른 컴포넌트는 전역 상태가 아니라 이 매니저가 돌려준 컨텍스트를 전달받는다.

use serde::Deserialize;
use shopkeeper_core::error::CoreError;
use shopkeeper_core::models::session::{SessionContext, UserProfile};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::extract_detail;

/// 서버 응답 — 로그인 (`POST /login`)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    user: UserProfile,
}

/// 토큰 매니저 — 로그인/로그아웃, 현재 세션 컨텍스트 보관
#[derive(Clone)]
pub struct TokenManager {
    base_url: String,
    client: reqwest::Client,
    state: Arc<RwLock<Option<SessionContext>>>,
}

impl TokenManager {
    /// 새 토큰 매니저 생성 (미인증 상태)
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// 이미 발급된 컨텍스트로 생성 (저장된 토큰 복원)
    pub fn with_context(base_url: &str, context: SessionContext) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(context))),
            ..Self::new(base_url)
        }
    }

    /// 이메일/비밀번호 로그인 → 세션 컨텍스트 생성
    ///
    /// 서버는 OAuth2 password form(`username`, `password`)을 받는다.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionContext, CoreError> {
        let url = format!("{}/login", self.base_url);
        let form = [("username", email), ("password", password)];

        let resp = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("로그인 요청 실패: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(CoreError::Auth {
                message: format!("로그인 실패 ({status})"),
                detail: extract_detail(&text),
            });
        }

        let token_resp: TokenResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::auth(format!("토큰 파싱 실패: {e}")))?;

        let context = SessionContext {
            access_token: token_resp.access_token,
            token_type: token_resp
                .token_type
                .unwrap_or_else(|| "bearer".to_string()),
            user: token_resp.user,
        };

        *self.state.write().await = Some(context.clone());

        info!(
            "로그인 성공: user_id={}, shop={}",
            context.user.id,
            context.user.shop_name.as_deref().unwrap_or("-")
        );
        Ok(context)
    }

    /// 현재 세션 컨텍스트 (미인증이면 None)
    pub async fn current(&self) -> Option<SessionContext> {
        self.state.read().await.clone()
    }

    /// 요청에 실을 액세스 토큰 반환
    pub async fn get_token(&self) -> Result<String, CoreError> {
        self.state
            .read()
            .await
            .as_ref()
            .map(|c| c.access_token.clone())
            .ok_or_else(|| CoreError::auth("인증되지 않음"))
    }

    /// 로그아웃 — 컨텍스트 폐기 후 이전 컨텍스트 반환
    ///
    /// 서버에는 토큰 폐기 API가 없으므로 로컬 상태만 지운다.
    pub async fn logout(&self) -> Option<SessionContext> {
        let previous = self.state.write().await.take();
        if let Some(ctx) = &previous {
            debug!("로그아웃 완료: user_id={}", ctx.user.id);
        }
        previous
    }

    /// 현재 인증 상태 확인
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_BODY: &str = r#"{
        "access_token": "jwt_abc",
        "token_type": "bearer",
        "user": {"id": 7, "name": "Ahmed", "email": "ahmed@shop.pk", "role": "shopkeeper", "shop_name": "Ahmed Store"}
    }"#;

    #[test]
    fn token_manager_trailing_slash() {
        let tm = TokenManager::new("http://localhost:8000/");
        assert_eq!(tm.base_url, "http://localhost:8000");
    }

    #[tokio::test]
    async fn unauthenticated_get_token_fails() {
        let tm = TokenManager::new("http://localhost:8000");
        assert!(tm.get_token().await.is_err());
        assert!(!tm.is_authenticated().await);
        assert!(tm.current().await.is_none());
    }

    #[tokio::test]
    async fn login_success_creates_context() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/login")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("username".into(), "ahmed@shop.pk".into()),
                mockito::Matcher::UrlEncoded("password".into(), "pass".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LOGIN_BODY)
            .create_async()
            .await;

        let tm = TokenManager::new(&server.url());
        let context = tm.login("ahmed@shop.pk", "pass").await.unwrap();

        assert_eq!(context.user.id, 7);
        assert_eq!(context.access_token, "jwt_abc");
        assert_eq!(tm.get_token().await.unwrap(), "jwt_abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn login_failure_uses_server_detail() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/login")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"Incorrect email or password"}"#)
            .create_async()
            .await;

        let tm = TokenManager::new(&server.url());
        let err = tm.login("bad@shop.pk", "wrong").await.unwrap_err();

        assert!(matches!(err, CoreError::Auth { .. }));
        assert_eq!(err.user_detail(), Some("Incorrect email or password"));
        assert!(!tm.is_authenticated().await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn login_failure_network() {
        let tm = TokenManager::new("http://127.0.0.1:1");
        let result = tm.login("ahmed@shop.pk", "pass").await;
        assert!(matches!(result, Err(CoreError::Network(_))));
    }

    #[tokio::test]
    async fn logout_tears_down_context() {
        let context = SessionContext {
            access_token: "jwt".to_string(),
            token_type: "bearer".to_string(),
            user: UserProfile {
                id: 1,
                name: "Sara".to_string(),
                email: "sara@shop.pk".to_string(),
                role: "shopkeeper".to_string(),
                shop_name: None,
            },
        };
        let tm = TokenManager::with_context("http://localhost:8000", context);
        assert!(tm.is_authenticated().await);

        let previous = tm.logout().await;
        assert_eq!(previous.map(|c| c.user.id), Some(1));
        assert!(!tm.is_authenticated().await);
        assert!(tm.logout().await.is_none());
    }
}
