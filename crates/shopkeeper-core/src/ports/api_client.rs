//! 원격 API 포트.
//!
//! 구현: `shopkeeper-network` crate (reqwest)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::product::StockNotification;

/// 명령 해석 서비스 응답 (`POST /chat`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// 봇 응답 텍스트 (서버 필드명은 `response`)
    #[serde(alias = "response")]
    pub message: String,
    /// 구조화되지 않은 원시 페이로드
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// 번역 서비스 응답 (`POST /translate`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// 번역된 텍스트
    pub translated_text: String,
    /// 원문
    #[serde(default)]
    pub original_text: Option<String>,
}

/// 자연어 명령 해석 서비스
#[async_trait]
pub trait CommandInterpreter: Send + Sync {
    /// 사용자 명령 전송
    ///
    /// 서버 측에서 판매/구매/인보이스 등을 기록하므로 멱등이 아니다.
    async fn submit_command(&self, text: &str) -> Result<CommandResponse, CoreError>;
}

/// 재고 알림 조회 서비스
#[async_trait]
pub trait StockNotificationSource: Send + Sync {
    /// 품절/재고 부족 스냅샷 조회
    async fn get_low_stock_snapshot(&self) -> Result<StockNotification, CoreError>;
}

/// 번역 서비스 (영어 → 우르두어)
#[async_trait]
pub trait Translator: Send + Sync {
    /// 텍스트 번역
    async fn translate(&self, text: &str) -> Result<TranslationResponse, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_response_accepts_server_field_name() {
        let json = r#"{"response": "📦 Your Inventory (1 items)", "data": [{"name": "Rice"}]}"#;
        let resp: CommandResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.message, "📦 Your Inventory (1 items)");
        assert!(resp.data.is_some());
    }

    #[test]
    fn command_response_without_data() {
        let json = r#"{"message": "Please specify the selling price."}"#;
        let resp: CommandResponse = serde_json::from_str(json).unwrap();
        assert!(resp.data.is_none());
    }
}
