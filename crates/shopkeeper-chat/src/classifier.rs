//! 응답 분류기.
//!
//! 원시 페이로드 → `Variant` 순수 함수. 규칙은 순서대로 검사하며 처음 일치한 규칙이 이긴다:
//!
//! 1. 객체에 truthy `invoice_number` → `InvoiceResult`
//! 2. 비어있지 않은 배열, 첫 원소에 truthy `name` → `InventorySnapshot`
//! 3. 객체에 `total_sales` 키 존재 (null 포함) → `DailySummary`
//! 4. 그 외 → `PlainText`
//!
//! 서버는 snake_case를 보내지만 camelCase 키도 받는다.

use serde_json::{Map, Value};
use shopkeeper_core::models::product::Product;
use shopkeeper_core::models::variant::Variant;

/// 페이로드 분류
pub fn classify(payload: &Value) -> Variant {
    if let Some(variant) = as_invoice(payload) {
        return variant;
    }
    if let Some(variant) = as_inventory(payload) {
        return variant;
    }
    if let Some(variant) = as_summary(payload) {
        return variant;
    }
    Variant::PlainText
}

/// 선택적 페이로드 분류. 없으면 `PlainText`
pub fn classify_optional(payload: Option<&Value>) -> Variant {
    payload.map(classify).unwrap_or(Variant::PlainText)
}

fn as_invoice(payload: &Value) -> Option<Variant> {
    let obj = payload.as_object()?;
    let number = field(obj, "invoice_number", "invoiceNumber").filter(|v| is_truthy(v))?;

    Some(Variant::InvoiceResult {
        invoice_number: text_of(number).unwrap_or_else(|| number.to_string()),
        customer_name: field(obj, "customer_name", "customerName")
            .filter(|v| is_truthy(v))
            .and_then(text_of),
        total_amount: field(obj, "total_amount", "totalAmount")
            .and_then(number_of)
            .unwrap_or(0.0),
    })
}

fn as_inventory(payload: &Value) -> Option<Variant> {
    let items = payload.as_array()?;
    let first = items.first()?.as_object()?;
    first.get("name").filter(|v| is_truthy(v))?;

    let items = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(product_of)
        .collect();
    Some(Variant::InventorySnapshot { items })
}

fn as_summary(payload: &Value) -> Option<Variant> {
    let obj = payload.as_object()?;
    let total_sales = field(obj, "total_sales", "totalSales")?;

    let low_stock_items = field(obj, "low_stock_items", "lowStockItems")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(o) => o.get("name").and_then(text_of),
                    other => text_of(other),
                })
                .collect()
        });

    Some(Variant::DailySummary {
        total_sales: number_of(total_sales).unwrap_or(0.0),
        total_profit: field(obj, "total_profit", "totalProfit")
            .and_then(number_of)
            .unwrap_or(0.0),
        top_selling_item: field(obj, "top_selling_item", "topSellingItem")
            .filter(|v| is_truthy(v))
            .and_then(text_of),
        low_stock_items,
    })
}

fn product_of(obj: &Map<String, Value>) -> Option<Product> {
    let name = obj
        .get("name")
        .filter(|v| is_truthy(v))
        .and_then(text_of)?;

    Some(Product {
        name,
        stock: obj
            .get("stock")
            .and_then(number_of)
            .map(|n| n as i64)
            .unwrap_or(0),
        cost_price: field(obj, "cost_price", "costPrice")
            .and_then(number_of)
            .unwrap_or(0.0),
        selling_price: field(obj, "selling_price", "sellingPrice").and_then(number_of),
    })
}

/// snake_case 우선, 없으면 camelCase
fn field<'a>(obj: &'a Map<String, Value>, snake: &str, camel: &str) -> Option<&'a Value> {
    obj.get(snake).or_else(|| obj.get(camel))
}

/// null, false, 0, NaN, "" 는 falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 유한한 수만 받는다. NaN, inf는 JSON으로 저장되지 않는다
fn number_of(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}
