//! 번역 위젯 (영어 → 우르두어).

use parking_lot::Mutex;
use shopkeeper_core::error::CoreError;
use shopkeeper_core::ports::api_client::Translator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::dispatcher::BusyGuard;

/// 번역 실패 시 표시 문구
pub const TRANSLATION_FAILED: &str = "Translation failed. Please try again.";

/// 번역 위젯
pub struct TranslationWidget {
    translator: Arc<dyn Translator>,
    busy: AtomicBool,
    last: Mutex<Option<String>>,
}

impl TranslationWidget {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            busy: AtomicBool::new(false),
            last: Mutex::new(None),
        }
    }

    /// 번역 요청. 실패하면 안내 문구를 결과로 돌려준다
    ///
    /// 빈 입력과 처리 중 요청만 에러.
    pub async fn translate(&self, text: &str) -> Result<String, CoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::empty("text"));
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CoreError::CommandInFlight);
        }

        let result = {
            let _busy = BusyGuard(&self.busy);
            self.translator.translate(text).await
        };

        let shown = match result {
            Ok(resp) => {
                debug!("번역 완료: {} 글자", resp.translated_text.chars().count());
                resp.translated_text
            }
            Err(e) => {
                warn!("번역 실패: {e}");
                TRANSLATION_FAILED.to_string()
            }
        };

        *self.last.lock() = Some(shown.clone());
        Ok(shown)
    }

    /// 마지막 번역 결과
    pub fn last_translation(&self) -> Option<String> {
        self.last.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}
