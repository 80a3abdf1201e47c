//! 재고 알림 갱신 트리거.
//!
//! 성공한 명령의 텍스트에 재고를 바꿀 만한 단어가 있으면
//! 알림 패널을 백그라운드에서 다시 조회한다 (fire-and-forget).

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::notification_panel::NotificationPanel;

/// 재고 변경 단어 목록
pub const TRIGGER_VOCABULARY: [&str; 4] = ["sold", "invoice", "sale", "bought"];

/// 갱신 트리거 판정 (소문자 변환 후 부분 문자열 일치)
#[derive(Debug, Clone, Copy)]
pub struct RefreshTrigger {
    vocabulary: &'static [&'static str],
}

impl Default for RefreshTrigger {
    fn default() -> Self {
        Self {
            vocabulary: &TRIGGER_VOCABULARY,
        }
    }
}

impl RefreshTrigger {
    /// 트리거 단어 목록
    pub fn vocabulary(&self) -> &'static [&'static str] {
        self.vocabulary
    }

    /// 텍스트가 트리거 단어를 포함하는지
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.vocabulary.iter().any(|word| lower.contains(word))
    }
}

/// 재고 알림 갱신 스케줄러
pub struct StockRefreshScheduler {
    trigger: RefreshTrigger,
    panel: Arc<NotificationPanel>,
}

impl StockRefreshScheduler {
    pub fn new(panel: Arc<NotificationPanel>) -> Self {
        Self {
            trigger: RefreshTrigger::default(),
            panel,
        }
    }

    /// 트리거 일치 시 패널 갱신 태스크 생성
    ///
    /// 호출자는 핸들을 기다리지 않아도 된다. 실패는 로그로만 남는다.
    pub fn maybe_schedule(&self, text: &str) -> Option<JoinHandle<()>> {
        if !self.trigger.matches(text) {
            return None;
        }

        debug!("재고 변경 명령 감지, 알림 갱신 예약");
        let panel = self.panel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = panel.refresh().await {
                warn!("백그라운드 재고 알림 갱신 실패: {e}");
            }
        }))
    }

    pub fn trigger(&self) -> &RefreshTrigger {
        &self.trigger
    }
}
