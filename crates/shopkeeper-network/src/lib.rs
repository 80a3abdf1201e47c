//! # shopkeeper-network
//!
//! ShopKeeperAI 서버와의 REST 통신 어댑터.
//! 로그인으로 `SessionContext`를 만들고, 그 토큰으로 명령 해석/재고 알림/번역
//! 포트를 구현한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use shopkeeper_network::auth::TokenManager;
//! use shopkeeper_network::http_client::HttpShopClient;
//!
//! let tm = Arc::new(TokenManager::new("http://localhost:8000"));
//! let context = tm.login("ahmed@shop.pk", "password").await?;
//! let client = HttpShopClient::new("http://localhost:8000", tm, Duration::from_secs(30))?;
//! ```

pub mod auth;
pub mod http_client;

/// FastAPI 에러 본문(`{"detail": "..."}`)에서 문자열 상세 추출
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
