//! 메시지 프레젠터.
//!
//! Message → 표시용 데이터 변환. 카드는 `Variant` 태그로만 결정하며
//! 원시 필드를 다시 검사하지 않는다.

use chrono::Local;
use shopkeeper_core::config::ChatConfig;
use shopkeeper_core::models::message::Message;
use shopkeeper_core::models::variant::Variant;
use std::fmt::Write;

use crate::notification_panel::{AlertGroupView, StockAlertsView};

/// 표시 설정
#[derive(Debug, Clone, Copy)]
pub struct PresenterConfig {
    /// 재고 카드 "부족" 표시 기준
    pub low_stock_threshold: i64,
    /// 재고 카드 최대 행 수
    pub preview_rows: usize,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

impl From<&ChatConfig> for PresenterConfig {
    fn from(config: &ChatConfig) -> Self {
        Self {
            low_stock_threshold: config.inventory_low_stock_threshold,
            preview_rows: config.inventory_preview_rows,
        }
    }
}

/// 재고 카드 행
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRowView {
    pub name: String,
    pub stock: i64,
    pub price_text: String,
    pub is_low_stock: bool,
}

/// 구조화 데이터 카드
#[derive(Debug, Clone, PartialEq)]
pub enum CardView {
    Invoice {
        invoice_number: String,
        customer_name: Option<String>,
        total_text: String,
    },
    Inventory {
        item_count: usize,
        rows: Vec<InventoryRowView>,
        /// 표시되지 않은 항목 수
        more: usize,
    },
    Summary {
        sales_text: String,
        profit_text: String,
        top_seller: Option<String>,
        low_stock: Vec<String>,
    },
}

/// 표시용 메시지
#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    /// 작성자 라벨
    pub author: &'static str,
    /// 작성자 아이콘
    pub avatar: &'static str,
    pub text: String,
    /// 로컬 시각 (HH:MM)
    pub time_text: String,
    pub is_error: bool,
    pub card: Option<CardView>,
}

/// Message → MessageView 변환
pub fn present(message: &Message, config: &PresenterConfig) -> MessageView {
    let (author, avatar) = if message.is_user() {
        ("You", "👤")
    } else {
        ("ShopKeeperAI", "🤖")
    };

    MessageView {
        author,
        avatar,
        text: message.text.clone(),
        time_text: message
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string(),
        is_error: message.is_error,
        card: card_for(message.variant(), config),
    }
}

/// 여러 메시지 일괄 변환
pub fn present_all(messages: &[Message], config: &PresenterConfig) -> Vec<MessageView> {
    messages.iter().map(|m| present(m, config)).collect()
}

fn card_for(variant: &Variant, config: &PresenterConfig) -> Option<CardView> {
    match variant {
        Variant::InvoiceResult {
            invoice_number,
            customer_name,
            total_amount,
        } => Some(CardView::Invoice {
            invoice_number: invoice_number.clone(),
            customer_name: customer_name.clone(),
            total_text: format_rupees(*total_amount),
        }),
        Variant::InventorySnapshot { items } => {
            let rows = items
                .iter()
                .take(config.preview_rows)
                .map(|item| InventoryRowView {
                    name: item.name.clone(),
                    stock: item.stock,
                    price_text: format!("Rs.{}/-", item.display_price()),
                    is_low_stock: item.stock < config.low_stock_threshold,
                })
                .collect::<Vec<_>>();
            Some(CardView::Inventory {
                item_count: items.len(),
                more: items.len() - rows.len(),
                rows,
            })
        }
        Variant::DailySummary {
            total_sales,
            total_profit,
            top_selling_item,
            low_stock_items,
        } => Some(CardView::Summary {
            sales_text: format_rupees(*total_sales),
            profit_text: format_rupees(*total_profit),
            top_seller: top_selling_item.clone(),
            low_stock: low_stock_items.clone().unwrap_or_default(),
        }),
        Variant::PlainText => None,
    }
}

/// 금액 표기 (`Rs.1234.50/-`)
pub fn format_rupees(amount: f64) -> String {
    format!("Rs.{amount:.2}/-")
}

/// 터미널 출력용 텍스트
pub fn render_text(view: &MessageView) -> String {
    let mut out = String::new();
    let marker = if view.is_error { " ⚠️" } else { "" };
    let _ = writeln!(
        out,
        "{} {} [{}]{}",
        view.avatar, view.author, view.time_text, marker
    );
    for line in view.text.lines() {
        let _ = writeln!(out, "  {line}");
    }

    match &view.card {
        Some(CardView::Invoice {
            invoice_number,
            customer_name,
            total_text,
        }) => {
            let _ = writeln!(out, "  📄 Invoice Created");
            let _ = writeln!(out, "     Invoice #  {invoice_number}");
            if let Some(customer) = customer_name {
                let _ = writeln!(out, "     Customer   {customer}");
            }
            let _ = writeln!(out, "     Total      {total_text}");
        }
        Some(CardView::Inventory {
            item_count,
            rows,
            more,
        }) => {
            let _ = writeln!(out, "  📦 Inventory ({item_count} items)");
            let _ = writeln!(out, "     {:<20} {:>8} {:>12}", "Product", "Stock", "Price");
            for row in rows {
                let flag = if row.is_low_stock { " ↓" } else { "" };
                let _ = writeln!(
                    out,
                    "     {:<20} {:>8} {:>12}{}",
                    row.name, row.stock, row.price_text, flag
                );
            }
            if *more > 0 {
                let _ = writeln!(out, "     +{more} more items");
            }
        }
        Some(CardView::Summary {
            sales_text,
            profit_text,
            top_seller,
            low_stock,
        }) => {
            let _ = writeln!(out, "  📊 Daily Summary");
            let _ = writeln!(out, "     Total Sales  {sales_text}");
            let _ = writeln!(out, "     Profit       {profit_text}");
            if let Some(top) = top_seller {
                let _ = writeln!(out, "     Top Seller   {top}");
            }
            if !low_stock.is_empty() {
                let _ = writeln!(out, "     ⚠️ Low stock: {}", low_stock.join(", "));
            }
        }
        None => {}
    }

    out
}

/// 빠른 통계 터미널 출력
pub fn render_stats(user_messages: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 Quick Stats");
    let _ = writeln!(out, "   💬 {user_messages} Messages");
    out
}

/// 재고 알림 패널 터미널 출력
pub fn render_alerts(view: &StockAlertsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "⚠️ Stock Alerts ({})", view.total_alerts);
    render_group(&mut out, "🚫 Out of Stock", &view.out_of_stock);
    render_group(&mut out, "⚡ Low Stock", &view.low_stock);
    out
}

fn render_group(out: &mut String, title: &str, group: &AlertGroupView) {
    if group.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {title} ({})", group.total);
    for item in &group.items {
        let _ = writeln!(out, "     {:<20} {} units", item.name, item.stock.max(0));
    }
    if group.hidden > 0 {
        let _ = writeln!(out, "     +{} more items", group.hidden);
    }
}
