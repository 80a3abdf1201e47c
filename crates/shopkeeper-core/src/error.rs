//! ShopKeeperAI 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환한다.
//! 세션 레이어에서는 어떤 에러도 치명적이지 않다 (로컬 복구).

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 유효성 검증, 원격 호출, 저장소 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패 (빈 명령 등)
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 이전 명령이 아직 처리 중 (세션당 하나만 허용)
    #[error("이전 명령 처리 중")]
    CommandInFlight,

    /// 인증 실패 (토큰 없음, 자격증명 오류 등)
    #[error("인증 에러: {message}")]
    Auth {
        /// 내부 로그용 사유
        message: String,
        /// 서버가 보낸 `detail` 문자열 (있으면)
        detail: Option<String>,
    },

    /// 네트워크 에러 (연결 실패)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 서버가 비성공 상태 코드를 반환
    #[error("API 에러 ({status}): {}", detail.as_deref().unwrap_or("상세 없음"))]
    Remote {
        /// HTTP 상태 코드
        status: u16,
        /// 서버가 보낸 `detail` 문자열 (있으면)
        detail: Option<String>,
    },

    /// Rate Limit 초과 (429)
    #[error("요청 한도 초과, {retry_after_secs}초 후 재시도")]
    RateLimit {
        /// 재시도 대기 시간 (초)
        retry_after_secs: u64,
    },

    /// 서비스 일시 불가 (503)
    #[error("서비스 일시 불가: {message}")]
    ServiceUnavailable {
        /// 내부 로그용 사유 (응답 본문 일부 포함 가능)
        message: String,
        /// 서버가 보낸 `detail` 문자열 (있으면)
        detail: Option<String>,
    },

    /// 요청 타임아웃
    #[error("요청 타임아웃: {timeout_ms}ms 초과")]
    Timeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// 키-값 저장소 읽기/쓰기 실패
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 빈 입력 검증 에러 헬퍼
    pub fn empty(field: &str) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: "빈 값".to_string(),
        }
    }

    /// 서버 상세 없는 인증 에러 헬퍼
    pub fn auth(message: impl Into<String>) -> Self {
        CoreError::Auth {
            message: message.into(),
            detail: None,
        }
    }

    /// 사용자에게 보여줄 수 있는 서버 측 상세 메시지
    ///
    /// 서버가 명시적으로 보낸 `detail`만 반환한다. 내부 에러 문자열은 노출하지 않는다.
    pub fn user_detail(&self) -> Option<&str> {
        match self {
            CoreError::Remote { detail, .. }
            | CoreError::Auth { detail, .. }
            | CoreError::ServiceUnavailable { detail, .. } => {
                detail.as_deref().filter(|d| !d.trim().is_empty())
            }
            _ => None,
        }
    }
}
