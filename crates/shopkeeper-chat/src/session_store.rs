//! 세션 메시지 로그 저장소.
//!
//! 대화 로그의 유일한 소유자. 시작 시 휘발성 저장소에서 한 번 복원하고,
//! 모든 변경을 즉시 기록(write-through)한다. 저장 실패 시 메모리 전용 모드로 강등.

use shopkeeper_core::error::CoreError;
use shopkeeper_core::models::message::Message;
use shopkeeper_core::models::session::SessionContext;
use shopkeeper_core::ports::kv_store::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 대화 로그 저장 키 (사용자 ID로 분리됨)
pub const HISTORY_KEY: &str = "chatHistory";

/// 새 세션의 첫 봇 메시지
pub const WELCOME_TEXT: &str = "👋 Welcome to ShopKeeperAI! I'm your intelligent shop assistant.\n\n\
I can help you with:\n\
• Recording sales and purchases\n\
• Managing inventory\n\
• Creating invoices\n\
• Daily summaries and reports\n\
• Reorder suggestions\n\
• Translating bills to Urdu\n\n\
Try typing something like \"Sold 5kg rice at 80\" or \"Show my inventory\"";

/// 환영 메시지 생성
pub fn welcome_message() -> Message {
    Message::bot(WELCOME_TEXT, None)
}

/// 세션 저장소
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    messages: Vec<Message>,
    /// 저장 실패 후 메모리 전용 모드
    degraded: bool,
}

impl SessionStore {
    /// 저장된 로그 복원. 실패하지 않는다
    ///
    /// 읽기 실패, 파싱 실패, 빈 목록은 모두 환영 메시지 하나로 시작한다.
    /// 환영 메시지는 첫 변경 전까지 저장하지 않는다.
    pub fn initialize(context: &SessionContext, storage: Arc<dyn KeyValueStore>) -> Self {
        let key = context.scoped_key(HISTORY_KEY);

        let restored = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Message>>(&raw) {
                Ok(messages) if !messages.is_empty() => Some(messages),
                Ok(_) => {
                    debug!("저장된 로그가 비어 있음: {key}");
                    None
                }
                Err(e) => {
                    warn!("대화 로그 파싱 실패, 새 세션 시작: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("대화 로그 읽기 실패, 새 세션 시작: {e}");
                None
            }
        };

        let messages = match restored {
            Some(messages) => {
                info!("대화 로그 복원: {}건", messages.len());
                messages
            }
            None => vec![welcome_message()],
        };

        Self {
            storage,
            key,
            messages,
            degraded: false,
        }
    }

    /// 메시지 추가 후 전체 로그 기록
    ///
    /// 타임스탬프는 직전 메시지보다 앞서지 않도록 보정한다.
    pub fn append(&mut self, mut message: Message) {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }
        self.messages.push(message);
        self.persist();
    }

    /// 환영 메시지만 남기고 저장된 항목 삭제
    pub fn clear(&mut self) {
        self.messages = vec![welcome_message()];
        match self.storage.remove(&self.key) {
            Ok(()) => {
                if self.degraded {
                    info!("저장소 복구됨, 기록 재개");
                }
                self.degraded = false;
            }
            Err(e) => warn!("대화 로그 삭제 실패: {e}"),
        }
        debug!("대화 로그 초기화");
    }

    fn persist(&mut self) {
        if self.degraded {
            return;
        }

        let result = serde_json::to_string(&self.messages)
            .map_err(CoreError::from)
            .and_then(|json| self.storage.set(&self.key, &json));

        if let Err(e) = result {
            warn!("대화 로그 저장 실패, 메모리 전용 모드로 전환: {e}");
            self.degraded = true;
        }
    }

    /// 현재 로그 스냅샷
    pub fn messages(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// 메모리 전용 모드 여부
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// 사용자가 보낸 메시지 수
    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_user()).count()
    }

    /// 저장 키
    pub fn key(&self) -> &str {
        &self.key
    }
}
