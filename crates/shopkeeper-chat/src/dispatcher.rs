//! 명령 디스패처.
//!
//! 사용자 입력 → 낙관적 사용자 메시지 추가 → 명령 해석 서비스 호출 →
//! 응답 분류 → 봇 메시지 추가 → (필요 시) 재고 알림 갱신.
//!
//! 세션당 동시 1건만 처리한다. 처리 중 제출은 대기열 없이 즉시 거부된다.

use parking_lot::Mutex;
use shopkeeper_core::config::ChatConfig;
use shopkeeper_core::error::CoreError;
use shopkeeper_core::models::message::Message;
use shopkeeper_core::models::variant::Variant;
use shopkeeper_core::ports::api_client::CommandInterpreter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::classifier::classify_optional;
use crate::refresh::StockRefreshScheduler;
use crate::session_store::SessionStore;

/// 실패 상세가 없을 때 표시 문구
pub const GENERIC_FAILURE: &str = "Sorry, something went wrong. Please try again.";

/// 명령 대기 한도 초과 시 표시 문구
pub const TIMEOUT_FAILURE: &str = "The request took too long. Please try again.";

/// 입력창 빠른 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickCommand {
    /// 재고 보기
    Inventory,
    /// 오늘 매출 요약
    Summary,
    /// 재주문 추천
    LowStock,
}

impl QuickCommand {
    pub const ALL: [QuickCommand; 3] = [
        QuickCommand::Inventory,
        QuickCommand::Summary,
        QuickCommand::LowStock,
    ];

    /// 서버로 보낼 명령 텍스트
    pub fn text(&self) -> &'static str {
        match self {
            QuickCommand::Inventory => "Show inventory",
            QuickCommand::Summary => "Today sales summary",
            QuickCommand::LowStock => "What should I reorder?",
        }
    }

    /// 버튼 라벨
    pub fn label(&self) -> &'static str {
        match self {
            QuickCommand::Inventory => "📦 Inventory",
            QuickCommand::Summary => "📊 Summary",
            QuickCommand::LowStock => "⚠️ Low Stock",
        }
    }
}

/// 제출 결과
#[derive(Debug)]
pub enum SubmitOutcome {
    /// 정상 응답. 재고 변경 명령이면 갱신 태스크 핸들 포함
    Replied {
        reply: Message,
        refresh: Option<JoinHandle<()>>,
    },
    /// 실패 응답 (에러 봇 메시지가 로그에 추가됨)
    Failed(Message),
    /// 응답 도착 전 세션이 해제되어 버려짐
    Discarded,
}

/// 처리 중 플래그 해제 가드
pub(crate) struct BusyGuard<'a>(pub(crate) &'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// 채팅 세션 — 세션 저장소 + 명령 디스패처
pub struct ChatSession {
    interpreter: Arc<dyn CommandInterpreter>,
    store: Mutex<SessionStore>,
    scheduler: Option<StockRefreshScheduler>,
    command_timeout: Duration,
    busy: AtomicBool,
    detached: AtomicBool,
}

impl ChatSession {
    /// 새 세션 생성
    pub fn new(
        interpreter: Arc<dyn CommandInterpreter>,
        store: SessionStore,
        config: &ChatConfig,
    ) -> Self {
        Self {
            interpreter,
            store: Mutex::new(store),
            scheduler: None,
            command_timeout: Duration::from_millis(config.command_timeout_ms),
            busy: AtomicBool::new(false),
            detached: AtomicBool::new(false),
        }
    }

    /// 재고 알림 갱신 스케줄러 연결
    pub fn with_refresh(mut self, scheduler: StockRefreshScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// 명령 제출
    ///
    /// 빈 입력, 처리 중 제출, 해제된 세션은 네트워크 호출 없이 에러를 돌려주며
    /// 로그는 변하지 않는다. 그 외 원격 실패는 에러 봇 메시지로 기록된다.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::empty("message"));
        }
        if self.is_detached() {
            return Err(CoreError::Validation {
                field: "session".to_string(),
                message: "해제된 세션".to_string(),
            });
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("처리 중 제출 거부");
            return Err(CoreError::CommandInFlight);
        }
        let _busy = BusyGuard(&self.busy);

        self.store.lock().append(Message::user(text));

        let result = match tokio::time::timeout(
            self.command_timeout,
            self.interpreter.submit_command(text),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout {
                timeout_ms: self.command_timeout.as_millis() as u64,
            }),
        };

        if self.is_detached() {
            debug!("세션 해제 후 도착한 응답 폐기");
            return Ok(SubmitOutcome::Discarded);
        }

        match result {
            Ok(response) => {
                let variant = classify_optional(response.data.as_ref());
                debug!("응답 분류: {}", variant.tag());

                // 분류되지 않은 페이로드는 버린다
                let structured = match variant {
                    Variant::PlainText => None,
                    other => Some(other),
                };
                let reply = Message::bot(response.message, structured);
                self.store.lock().append(reply.clone());

                let refresh = self
                    .scheduler
                    .as_ref()
                    .and_then(|scheduler| scheduler.maybe_schedule(text));

                Ok(SubmitOutcome::Replied { reply, refresh })
            }
            Err(e) => {
                warn!("명령 처리 실패: {e}");
                let reply = Message::bot_error(failure_text(&e));
                self.store.lock().append(reply.clone());
                Ok(SubmitOutcome::Failed(reply))
            }
        }
    }

    /// 빠른 명령 제출
    pub async fn submit_quick(&self, command: QuickCommand) -> Result<SubmitOutcome, CoreError> {
        self.submit(command.text()).await
    }

    /// 처리 중 여부 (입력 비활성화 판단용)
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// 세션 해제. 이후 도착하는 응답은 로그에 반영되지 않는다
    pub fn detach(&self) {
        if !self.detached.swap(true, Ordering::AcqRel) {
            info!("채팅 세션 해제");
        }
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    /// 로그 초기화 (환영 메시지만 남김)
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// 로그 스냅샷
    pub fn messages(&self) -> Vec<Message> {
        self.store.lock().messages()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn user_message_count(&self) -> usize {
        self.store.lock().user_message_count()
    }

    /// 저장소가 메모리 전용 모드인지
    pub fn is_degraded(&self) -> bool {
        self.store.lock().is_degraded()
    }
}

/// 사용자에게 보여줄 실패 문구
fn failure_text(error: &CoreError) -> String {
    match error {
        CoreError::Timeout { .. } => TIMEOUT_FAILURE.to_string(),
        other => other
            .user_detail()
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification_panel::NotificationPanel;
    use crate::test_support::{make_context, MockInterpreter, MockStockSource};
    use serde_json::json;
    use shopkeeper_core::config::NotificationConfig;
    use shopkeeper_core::models::message::MessageKind;
    use shopkeeper_core::models::product::StockNotification;
    use shopkeeper_storage::memory::MemoryKvStore;
    use tokio::sync::Notify;

    fn make_session(interpreter: Arc<MockInterpreter>) -> ChatSession {
        let store = SessionStore::initialize(&make_context(1), Arc::new(MemoryKvStore::new()));
        ChatSession::new(interpreter, store, &ChatConfig::default())
    }

    #[tokio::test]
    async fn user_message_precedes_reply() {
        let interpreter = Arc::new(MockInterpreter::replying(
            "📊 Today's Summary",
            Some(json!({"total_sales": 12500, "total_profit": 2800, "top_selling_item": "Rice"})),
        ));
        let session = make_session(interpreter.clone());

        let outcome = session.submit("  Today sales summary  ").await.unwrap();
        let SubmitOutcome::Replied { reply, refresh } = outcome else {
            panic!("정상 응답이어야 함");
        };
        assert!(refresh.is_none());
        assert!(matches!(reply.variant(), Variant::DailySummary { .. }));

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].kind, MessageKind::User);
        assert_eq!(messages[1].text, "Today sales summary");
        assert_eq!(messages[2].kind, MessageKind::Bot);
        assert_eq!(messages[2].text, "📊 Today's Summary");
        assert!(!session.is_busy());
        assert_eq!(interpreter.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_call() {
        let interpreter = Arc::new(MockInterpreter::default());
        let session = make_session(interpreter.clone());

        let err = session.submit("   ").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(session.len(), 1);
        assert_eq!(interpreter.call_count(), 0);
    }

    #[tokio::test]
    async fn submit_while_busy_is_rejected() {
        let gate = Arc::new(Notify::new());
        let interpreter = Arc::new(MockInterpreter::gated(gate.clone()));
        let session = Arc::new(make_session(interpreter.clone()));

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.submit("Show inventory").await }
        });
        while !session.is_busy() || interpreter.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        let len_before = session.len();
        let err = session.submit("Sold 5kg rice at 80").await.unwrap_err();
        assert!(matches!(err, CoreError::CommandInFlight));
        assert_eq!(session.len(), len_before);
        assert_eq!(interpreter.call_count(), 1);

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(!session.is_busy());
        assert_eq!(session.len(), 3);
    }

    #[tokio::test]
    async fn remote_failure_becomes_error_message() {
        let interpreter = Arc::new(MockInterpreter::failing(CoreError::Remote {
            status: 500,
            detail: Some("Failed to process message".to_string()),
        }));
        let session = make_session(interpreter);

        let outcome = session.submit("Sold 5kg rice at 80").await.unwrap();
        let SubmitOutcome::Failed(reply) = outcome else {
            panic!("실패 응답이어야 함");
        };
        assert!(reply.is_error);
        assert_eq!(reply.text, "Failed to process message");
        assert!(!session.is_busy());

        let messages = session.messages();
        assert!(messages[1].is_user());
        assert!(messages[2].is_error);
    }

    #[tokio::test]
    async fn network_failure_uses_generic_text() {
        let interpreter = Arc::new(MockInterpreter::failing(CoreError::Network(
            "connection refused".to_string(),
        )));
        let session = make_session(interpreter);

        let SubmitOutcome::Failed(reply) = session.submit("Show inventory").await.unwrap() else {
            panic!("실패 응답이어야 함");
        };
        assert_eq!(reply.text, GENERIC_FAILURE);
    }

    #[tokio::test(start_paused = true)]
    async fn command_timeout_becomes_error_message() {
        let gate = Arc::new(Notify::new());
        let interpreter = Arc::new(MockInterpreter::gated(gate));
        let store = SessionStore::initialize(&make_context(1), Arc::new(MemoryKvStore::new()));
        let config = ChatConfig {
            command_timeout_ms: 50,
            ..ChatConfig::default()
        };
        let session = ChatSession::new(interpreter, store, &config);

        let SubmitOutcome::Failed(reply) = session.submit("Show inventory").await.unwrap() else {
            panic!("실패 응답이어야 함");
        };
        assert_eq!(reply.text, TIMEOUT_FAILURE);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn detached_session_discards_response() {
        let gate = Arc::new(Notify::new());
        let interpreter = Arc::new(MockInterpreter::gated(gate.clone()));
        let session = Arc::new(make_session(interpreter.clone()));

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.submit("Sold 5kg rice at 80").await }
        });
        while interpreter.call_count() == 0 {
            tokio::task::yield_now().await;
        }

        session.detach();
        let len_after_detach = session.len();
        gate.notify_one();

        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome, SubmitOutcome::Discarded));
        assert_eq!(session.len(), len_after_detach);
        assert!(session.submit("Show inventory").await.is_err());
    }

    #[tokio::test]
    async fn refresh_fires_only_for_trigger_words() {
        let interpreter = Arc::new(MockInterpreter::default());
        let source = Arc::new(MockStockSource::with_snapshot(StockNotification::default()));
        let panel = Arc::new(NotificationPanel::new(
            source.clone(),
            NotificationConfig::default(),
        ));
        let session =
            make_session(interpreter).with_refresh(StockRefreshScheduler::new(panel));

        let SubmitOutcome::Replied { refresh, .. } = session.submit("Show inventory").await.unwrap()
        else {
            panic!("정상 응답이어야 함");
        };
        assert!(refresh.is_none());

        let SubmitOutcome::Replied { refresh, .. } =
            session.submit("Sold 5kg rice at 80").await.unwrap()
        else {
            panic!("정상 응답이어야 함");
        };
        refresh.unwrap().await.unwrap();
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_command_never_refreshes() {
        let interpreter = Arc::new(MockInterpreter::failing(CoreError::Network(
            "down".to_string(),
        )));
        let source = Arc::new(MockStockSource::default());
        let panel = Arc::new(NotificationPanel::new(
            source.clone(),
            NotificationConfig::default(),
        ));
        let session =
            make_session(interpreter).with_refresh(StockRefreshScheduler::new(panel));

        session.submit("Sold 5kg rice at 80").await.unwrap();
        tokio::task::yield_now().await;
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn quick_commands_use_fixed_text() {
        let interpreter = Arc::new(MockInterpreter::default());
        let session = make_session(interpreter);

        session.submit_quick(QuickCommand::LowStock).await.unwrap();
        assert_eq!(session.messages()[1].text, "What should I reorder?");
        assert_eq!(QuickCommand::ALL.len(), 3);
    }

    #[tokio::test]
    async fn clear_resets_to_seed() {
        let interpreter = Arc::new(MockInterpreter::default());
        let session = make_session(interpreter);
        session.submit("Show inventory").await.unwrap();
        assert_eq!(session.user_message_count(), 1);

        session.clear();
        assert_eq!(session.len(), 1);
        assert_eq!(session.user_message_count(), 0);
    }
}
