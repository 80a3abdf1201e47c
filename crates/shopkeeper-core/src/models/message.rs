//! 채팅 메시지 모델.
//!
//! 한 번의 대화 턴. 사용자 또는 봇이 작성하며 구조화 데이터를 선택적으로 가진다.
//! 세션 로그는 이 구조체의 JSON 배열로 영속화된다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::variant::Variant;

/// 메시지 작성자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// 사용자 입력
    User,
    /// 시스템(봇) 응답
    Bot,
}

/// 채팅 메시지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// 작성자 종류
    pub kind: MessageKind,
    /// 본문 텍스트
    pub text: String,
    /// 분류된 구조화 데이터 (봇 응답에 데이터가 있을 때만)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<Variant>,
    /// 에러 응답 여부
    #[serde(default)]
    pub is_error: bool,
    /// 작성 시각
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// 사용자 메시지 생성
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            text: text.into(),
            structured_data: None,
            is_error: false,
            timestamp: Utc::now(),
        }
    }

    /// 봇 응답 메시지 생성
    pub fn bot(text: impl Into<String>, structured_data: Option<Variant>) -> Self {
        Self {
            kind: MessageKind::Bot,
            text: text.into(),
            structured_data,
            is_error: false,
            timestamp: Utc::now(),
        }
    }

    /// 봇 에러 메시지 생성
    pub fn bot_error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::bot(text, None)
        }
    }

    /// 렌더링용 변형. 구조화 데이터가 없으면 `PlainText`
    pub fn variant(&self) -> &Variant {
        self.structured_data.as_ref().unwrap_or(&Variant::PlainText)
    }

    /// 사용자 메시지 여부
    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        let user = Message::user("Sold 5kg rice at 80");
        assert!(user.is_user());
        assert!(!user.is_error);
        assert_eq!(user.variant(), &Variant::PlainText);

        let error = Message::bot_error("Failed to process message");
        assert_eq!(error.kind, MessageKind::Bot);
        assert!(error.is_error);
        assert!(error.structured_data.is_none());
    }

    #[test]
    fn plain_message_omits_structured_data() {
        let json = serde_json::to_value(Message::user("Show inventory")).unwrap();
        assert!(json.get("structured_data").is_none());
        assert_eq!(json["kind"], "user");
    }

    #[test]
    fn timestamp_roundtrip_is_exact() {
        let original = vec![Message::user("a"), Message::bot("b", None)];
        let json = serde_json::to_string(&original).unwrap();
        let restored: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }
}
