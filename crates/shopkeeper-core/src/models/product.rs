//! 재고 모델.
//!
//! 상품과 재고 알림 스냅샷. 서버 응답은 가격 필드를 생략할 수 있으므로
//! 모든 수치 필드에 기본값을 둔다.

use serde::{Deserialize, Serialize};

/// 상품 (재고 목록/알림 항목)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 상품명
    pub name: String,
    /// 현재 재고 수량
    #[serde(default)]
    pub stock: i64,
    /// 원가
    #[serde(default)]
    pub cost_price: f64,
    /// 판매가 (미설정 가능)
    #[serde(default)]
    pub selling_price: Option<f64>,
}

impl Product {
    /// 표시용 단가: 판매가가 있으면 판매가, 없으면 원가
    pub fn display_price(&self) -> f64 {
        self.selling_price.unwrap_or(self.cost_price)
    }

    /// 품절 여부
    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }
}

/// 재고 알림 스냅샷 (`GET /notifications/low-stock`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockNotification {
    /// 품절 상품
    #[serde(default)]
    pub out_of_stock: Vec<Product>,
    /// 재고 부족 상품
    #[serde(default)]
    pub low_stock: Vec<Product>,
    /// 전체 알림 수
    #[serde(default)]
    pub total_alerts: u32,
}
