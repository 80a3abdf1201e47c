//! 단위 테스트용 포트 목(mock).

use async_trait::async_trait;
use parking_lot::Mutex;
use shopkeeper_core::error::CoreError;
use shopkeeper_core::models::product::{Product, StockNotification};
use shopkeeper_core::models::session::{SessionContext, UserProfile};
use shopkeeper_core::ports::api_client::{
    CommandInterpreter, CommandResponse, StockNotificationSource, TranslationResponse, Translator,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn make_context(user_id: i64) -> SessionContext {
    SessionContext {
        access_token: "jwt".to_string(),
        token_type: "bearer".to_string(),
        user: UserProfile {
            id: user_id,
            name: "Ahmed".to_string(),
            email: "ahmed@shop.pk".to_string(),
            role: "shopkeeper".to_string(),
            shop_name: Some("Ahmed General Store".to_string()),
        },
    }
}

pub fn product(name: &str, stock: i64) -> Product {
    Product {
        name: name.to_string(),
        stock,
        cost_price: 0.0,
        selling_price: None,
    }
}

/// 응답을 순서대로 돌려주는 명령 해석기. `gate`가 있으면 통지 전까지 대기
#[derive(Default)]
pub struct MockInterpreter {
    responses: Mutex<VecDeque<Result<CommandResponse, CoreError>>>,
    pub calls: AtomicUsize,
    pub gate: Option<Arc<Notify>>,
}

impl MockInterpreter {
    pub fn replying(message: &str, data: Option<serde_json::Value>) -> Self {
        let mock = Self::default();
        mock.push_ok(message, data);
        mock
    }

    pub fn failing(error: CoreError) -> Self {
        let mock = Self::default();
        mock.responses.lock().push_back(Err(error));
        mock
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_ok(&self, message: &str, data: Option<serde_json::Value>) {
        self.responses.lock().push_back(Ok(CommandResponse {
            message: message.to_string(),
            data,
        }));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandInterpreter for MockInterpreter {
    async fn submit_command(&self, text: &str) -> Result<CommandResponse, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses.lock().pop_front().unwrap_or_else(|| {
            Ok(CommandResponse {
                message: format!("echo: {text}"),
                data: None,
            })
        })
    }
}

/// 재고 알림 소스 목
#[derive(Default)]
pub struct MockStockSource {
    pub snapshot: Mutex<Option<StockNotification>>,
    pub calls: AtomicUsize,
}

impl MockStockSource {
    pub fn with_snapshot(snapshot: StockNotification) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StockNotificationSource for MockStockSource {
    async fn get_low_stock_snapshot(&self) -> Result<StockNotification, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot
            .lock()
            .clone()
            .ok_or_else(|| CoreError::Network("connection refused".to_string()))
    }
}

/// 번역기 목 (None이면 실패)
pub struct MockTranslator {
    pub reply: Option<String>,
    pub calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(reply: Option<&str>) -> Self {
        Self {
            reply: reply.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<TranslationResponse, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(reply) => Ok(TranslationResponse {
                translated_text: reply.clone(),
                original_text: Some(text.to_string()),
            }),
            None => Err(CoreError::Remote {
                status: 500,
                detail: Some("Translation service error".to_string()),
            }),
        }
    }
}
