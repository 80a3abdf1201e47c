//! 봇 응답 구조화 데이터 변형.
//!
//! 분류기가 원시 페이로드에서 한 번 결정하는 닫힌 태그 유니온.
//! 렌더링은 항상 태그로 분기하며 원시 필드를 다시 검사하지 않는다.

use serde::{Deserialize, Serialize};

use crate::models::product::Product;

/// 구조화된 봇 응답 변형
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Variant {
    /// 인보이스 생성 결과
    InvoiceResult {
        invoice_number: String,
        #[serde(default)]
        customer_name: Option<String>,
        total_amount: f64,
    },
    /// 재고 목록
    InventorySnapshot { items: Vec<Product> },
    /// 일일 요약
    DailySummary {
        total_sales: f64,
        total_profit: f64,
        #[serde(default)]
        top_selling_item: Option<String>,
        #[serde(default)]
        low_stock_items: Option<Vec<String>>,
    },
    /// 구조화 데이터 없음 (메시지 텍스트만 표시)
    PlainText,
}

impl Variant {
    /// 로그용 태그 이름
    pub fn tag(&self) -> &'static str {
        match self {
            Variant::InvoiceResult { .. } => "invoice_result",
            Variant::InventorySnapshot { .. } => "inventory_snapshot",
            Variant::DailySummary { .. } => "daily_summary",
            Variant::PlainText => "plain_text",
        }
    }
}
