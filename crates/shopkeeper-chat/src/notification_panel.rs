//! 재고 알림 패널.
//!
//! 마운트 시 한 번, 이후 명시적 갱신 요청마다 스냅샷을 받아온다.
//! 갱신 실패 시 이전 스냅샷을 유지한다. 대화 로그에는 관여하지 않는다.

use parking_lot::RwLock;
use shopkeeper_core::config::NotificationConfig;
use shopkeeper_core::error::CoreError;
use shopkeeper_core::models::product::{Product, StockNotification};
use shopkeeper_core::ports::api_client::StockNotificationSource;
use std::sync::Arc;
use tracing::{debug, warn};

/// 알림 항목 표시 데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertItemView {
    pub name: String,
    pub stock: i64,
}

/// 알림 그룹 (표시 한도까지 잘린 목록 + 생략된 수)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertGroupView {
    pub items: Vec<AlertItemView>,
    /// 그룹 전체 항목 수
    pub total: usize,
    /// 표시되지 않은 항목 수 ("+N more items")
    pub hidden: usize,
}

impl AlertGroupView {
    fn from_products<'a>(products: impl Iterator<Item = &'a Product>, limit: usize) -> Self {
        let all: Vec<&Product> = products.collect();
        let total = all.len();
        let items = all
            .into_iter()
            .take(limit)
            .map(|p| AlertItemView {
                name: p.name.clone(),
                stock: p.stock,
            })
            .collect::<Vec<_>>();
        let hidden = total - items.len();
        Self {
            items,
            total,
            hidden,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// 패널 표시 데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAlertsView {
    /// 서버가 보고한 전체 알림 수
    pub total_alerts: u32,
    /// 품절 (재고 ≤ 0)
    pub out_of_stock: AlertGroupView,
    /// 재고 부족 (0 < 재고 < 패널 기준)
    pub low_stock: AlertGroupView,
}

/// 재고 알림 패널
pub struct NotificationPanel {
    source: Arc<dyn StockNotificationSource>,
    config: NotificationConfig,
    snapshot: RwLock<Option<StockNotification>>,
}

impl NotificationPanel {
    /// 새 패널 생성 (스냅샷 없음)
    pub fn new(source: Arc<dyn StockNotificationSource>, config: NotificationConfig) -> Self {
        Self {
            source,
            config,
            snapshot: RwLock::new(None),
        }
    }

    /// 최초 조회
    pub async fn mount(&self) -> Result<(), CoreError> {
        debug!("재고 알림 패널 마운트");
        self.fetch().await
    }

    /// 재조회
    pub async fn refresh(&self) -> Result<(), CoreError> {
        debug!("재고 알림 갱신");
        self.fetch().await
    }

    async fn fetch(&self) -> Result<(), CoreError> {
        match self.source.get_low_stock_snapshot().await {
            Ok(snapshot) => {
                debug!("재고 알림 {}건", snapshot.total_alerts);
                *self.snapshot.write() = Some(snapshot);
                Ok(())
            }
            Err(e) => {
                warn!("재고 알림 조회 실패, 이전 스냅샷 유지: {e}");
                Err(e)
            }
        }
    }

    /// 현재 스냅샷
    pub fn snapshot(&self) -> Option<StockNotification> {
        self.snapshot.read().clone()
    }

    /// 표시 데이터. 서버 `total_alerts`가 0이면 None (패널 숨김)
    ///
    /// 그룹은 패널 자체 기준으로 다시 나눈다. 서버 분류나 재고 카드 기준과 무관.
    pub fn view(&self) -> Option<StockAlertsView> {
        let guard = self.snapshot.read();
        let snapshot = guard.as_ref().filter(|s| s.total_alerts > 0)?;

        let threshold = self.config.low_stock_threshold;
        let limit = self.config.max_items_per_group;
        let all = || snapshot.out_of_stock.iter().chain(snapshot.low_stock.iter());

        let out_of_stock =
            AlertGroupView::from_products(all().filter(|p| p.is_out_of_stock()), limit);
        let low_stock = AlertGroupView::from_products(
            all().filter(|p| !p.is_out_of_stock() && p.stock < threshold),
            limit,
        );

        Some(StockAlertsView {
            total_alerts: snapshot.total_alerts,
            out_of_stock,
            low_stock,
        })
    }

    /// 패널 설정
    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }
}
