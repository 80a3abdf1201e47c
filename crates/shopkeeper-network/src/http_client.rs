//! HTTP REST API 클라이언트.
//!
//! `CommandInterpreter` + `StockNotificationSource` + `Translator` 포트 구현.
//! Bearer 인증 헤더 자동 주입, 조회성 요청만 재시도한다.

use async_trait::async_trait;
use shopkeeper_core::error::CoreError;
use shopkeeper_core::models::product::StockNotification;
use shopkeeper_core::ports::api_client::{
    CommandInterpreter, CommandResponse, StockNotificationSource, TranslationResponse, Translator,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::TokenManager;
use crate::extract_detail;

/// 기본 재시도 횟수
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Retry-After 헤더가 없을 때 대기 시간 (초)
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// 재시도 가능한 에러인지 판별
fn is_retryable(error: &CoreError) -> bool {
    matches!(
        error,
        CoreError::Network(_) | CoreError::ServiceUnavailable { .. } | CoreError::RateLimit { .. }
    )
}

/// REST API 클라이언트
pub struct HttpShopClient {
    client: reqwest::Client,
    base_url: String,
    token_manager: Arc<TokenManager>,
    max_retries: u32,
}

impl HttpShopClient {
    /// 새 HTTP API 클라이언트 생성
    pub fn new(
        base_url: &str,
        token_manager: Arc<TokenManager>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_manager,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// 재시도 횟수 설정
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Authorization 헤더가 포함된 요청 빌더 반환
    async fn authorized_request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, CoreError> {
        let token = self.token_manager.get_token().await?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self.client.request(method, &url).bearer_auth(token))
    }

    /// 전송 실패 매핑 (타임아웃 구분)
    fn map_send_error(&self, what: &str, e: reqwest::Error) -> CoreError {
        if e.is_timeout() {
            CoreError::Network(format!("{what} 타임아웃: {e}"))
        } else {
            CoreError::Network(format!("{what} 요청 실패: {e}"))
        }
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    ///
    /// 서버 본문의 `detail`을 에러에 담아 사용자 메시지로 쓸 수 있게 한다.
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let status_code = status.as_u16();
        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        let detail = extract_detail(&text);

        match status_code {
            401 => Err(CoreError::Auth {
                message: format!("인증 실패 ({status_code})"),
                detail,
            }),
            429 => Err(CoreError::RateLimit {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            }),
            503 => Err(CoreError::ServiceUnavailable {
                message: text.chars().take(200).collect(),
                detail,
            }),
            _ => Err(CoreError::Remote {
                status: status_code,
                detail,
            }),
        }
    }

    /// 재시도가 포함된 요청 실행
    ///
    /// exponential backoff: 1s → 2s → 4s
    async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut last_error = CoreError::Internal("요청 실패".to_string());
        let mut delay = Duration::from_secs(1);

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !is_retryable(&e) || attempt == self.max_retries {
                        return Err(e);
                    }

                    warn!(
                        "요청 실패 (시도 {}/{}): {e}, {delay:?} 후 재시도",
                        attempt + 1,
                        self.max_retries + 1
                    );

                    if let CoreError::RateLimit { retry_after_secs } = &e {
                        delay = Duration::from_secs(*retry_after_secs);
                    }

                    last_error = e;
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(30));
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl CommandInterpreter for HttpShopClient {
    async fn submit_command(&self, text: &str) -> Result<CommandResponse, CoreError> {
        debug!("명령 전송: {} 글자", text.chars().count());

        // 판매/구매 기록은 멱등이 아니므로 재시도하지 않는다
        let req = self
            .authorized_request(reqwest::Method::POST, "/chat")
            .await?;

        let body = serde_json::json!({ "message": text });
        let resp = req
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error("명령 전송", e))?;

        let resp = self.check_response(resp).await?;
        let command: CommandResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("명령 응답 파싱 실패: {e}")))?;

        debug!("명령 응답 수신: data={}", command.data.is_some());
        Ok(command)
    }
}

#[async_trait]
impl StockNotificationSource for HttpShopClient {
    async fn get_low_stock_snapshot(&self) -> Result<StockNotification, CoreError> {
        self.execute_with_retry(|| async {
            let req = self
                .authorized_request(reqwest::Method::GET, "/notifications/low-stock")
                .await?;

            let resp = req
                .send()
                .await
                .map_err(|e| self.map_send_error("재고 알림 조회", e))?;

            let resp = self.check_response(resp).await?;
            let snapshot: StockNotification = resp
                .json()
                .await
                .map_err(|e| CoreError::Internal(format!("재고 알림 파싱 실패: {e}")))?;

            debug!(
                "재고 알림 수신: 품절 {}, 부족 {}",
                snapshot.out_of_stock.len(),
                snapshot.low_stock.len()
            );
            Ok(snapshot)
        })
        .await
    }
}

#[async_trait]
impl Translator for HttpShopClient {
    async fn translate(&self, text: &str) -> Result<TranslationResponse, CoreError> {
        self.execute_with_retry(|| async {
            let req = self
                .authorized_request(reqwest::Method::POST, "/translate")
                .await?;

            let body = serde_json::json!({ "text": text });
            let resp = req
                .json(&body)
                .send()
                .await
                .map_err(|e| self.map_send_error("번역", e))?;

            let resp = self.check_response(resp).await?;
            resp.json::<TranslationResponse>()
                .await
                .map_err(|e| CoreError::Internal(format!("번역 응답 파싱 실패: {e}")))
        })
        .await
    }
}
