//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 명령 타임아웃, 재고 알림 임계값, 로컬 저장소 경로 등
//! 런타임 설정을 정의한다. `config` crate를 통해 파일/환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 채팅 세션 설정
    #[serde(default)]
    pub chat: ChatConfig,
    /// 재고 알림 패널 설정
    #[serde(default)]
    pub notification: NotificationConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API 서버 기본 URL (예: "http://localhost:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// 재시도 가능한 조회 요청의 최대 재시도 횟수
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

// ============================================================
// 채팅 설정
// ============================================================

/// 채팅 세션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// 명령 처리 대기 한도 (밀리초). 전송 계층 타임아웃과 별개로 적용
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    /// 재고 카드에서 "부족" 표시 기준 (알림 패널 기준과 독립)
    #[serde(default = "default_low_stock_threshold")]
    pub inventory_low_stock_threshold: i64,
    /// 재고 카드에 표시할 최대 행 수
    #[serde(default = "default_max_items_per_group")]
    pub inventory_preview_rows: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: default_command_timeout_ms(),
            inventory_low_stock_threshold: default_low_stock_threshold(),
            inventory_preview_rows: default_max_items_per_group(),
        }
    }
}

// ============================================================
// 알림 패널 설정
// ============================================================

/// 재고 알림 패널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 패널 "재고 부족" 기준 (재고 카드 기준과 독립)
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    /// 그룹별 최대 표시 항목 수
    #[serde(default = "default_max_items_per_group")]
    pub max_items_per_group: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: default_low_stock_threshold(),
            max_items_per_group: default_max_items_per_group(),
        }
    }
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite 파일 경로 (None이면 플랫폼 데이터 디렉토리)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 서버 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// 명령 처리 타임아웃을 Duration으로 반환
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.chat.command_timeout_ms)
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_max_retries() -> u32 {
    3
}
fn default_command_timeout_ms() -> u64 {
    30_000
}
fn default_low_stock_threshold() -> i64 {
    10
}
fn default_max_items_per_group() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"notification":{"low_stock_threshold":3}}"#).unwrap();
        assert_eq!(config.notification.low_stock_threshold, 3);
        assert_eq!(config.notification.max_items_per_group, 5);
        assert_eq!(config.chat.inventory_low_stock_threshold, 10);
        assert_eq!(config.server.base_url, "http://localhost:8000");
    }

    #[test]
    fn thresholds_are_independent() {
        let mut config = AppConfig::default_config();
        config.notification.low_stock_threshold = 5;
        assert_eq!(config.chat.inventory_low_stock_threshold, 10);
    }

    #[test]
    fn durations() {
        let config = AppConfig::default_config();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.command_timeout(), Duration::from_secs(30));
    }
}
