//! 온보딩 튜토리얼 상태 기계.
//!
//! `Step_0 … Step_{N-1}` → `Completed`. 되돌아가는 전이는 없다.
//! 완료 플래그는 영구 저장소에 남아 이후 실행에서는 튜토리얼을 건너뛴다.

use shopkeeper_core::models::onboarding::{OnboardingState, TutorialStep};
use shopkeeper_core::ports::kv_store::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 완료 플래그 키
pub const ONBOARDING_KEY: &str = "onboardingComplete";

/// 튜토리얼 단계
pub const TUTORIAL_STEPS: [TutorialStep; 5] = [
    TutorialStep {
        icon: "👋",
        title: "Welcome to ShopKeeperAI!",
        content: "Your intelligent shop management assistant. Let's get you started with a quick tour.",
    },
    TutorialStep {
        icon: "💬",
        title: "Chat with AI",
        content: "Simply type commands like \"Sold 5 rice at 80\" or \"Show inventory\". Our AI understands natural language!",
    },
    TutorialStep {
        icon: "📦",
        title: "Track Inventory",
        content: "Keep track of all your products. Get alerts when stock is running low.",
    },
    TutorialStep {
        icon: "📄",
        title: "Create Invoices",
        content: "Generate professional invoices instantly by saying \"Invoice for Ahmed: 5 rice at 80\"",
    },
    TutorialStep {
        icon: "📊",
        title: "View Reports",
        content: "Check your daily sales, profits, and top-selling items anytime.",
    },
];

/// 온보딩 코디네이터
pub struct OnboardingCoordinator {
    durable: Arc<dyn KeyValueStore>,
    steps: &'static [TutorialStep],
    state: OnboardingState,
}

impl OnboardingCoordinator {
    /// 완료 플래그를 먼저 읽고 시작 상태 결정
    ///
    /// 읽기 실패 시에는 튜토리얼을 보여준다.
    pub fn initialize(durable: Arc<dyn KeyValueStore>) -> Self {
        let completed = match durable.get(ONBOARDING_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("온보딩 플래그 읽기 실패: {e}");
                false
            }
        };

        let state = if completed {
            debug!("온보딩 완료됨, 튜토리얼 생략");
            OnboardingState::completed()
        } else {
            OnboardingState::start()
        };

        Self {
            durable,
            steps: &TUTORIAL_STEPS,
            state,
        }
    }

    /// 다음 단계. 마지막 단계에서는 완료
    pub fn next(&mut self) -> OnboardingState {
        if self.state.completed {
            return self.state;
        }
        if self.is_last_step() {
            self.complete();
        } else {
            self.state.step += 1;
        }
        self.state
    }

    /// 튜토리얼 건너뛰기
    pub fn skip(&mut self) -> OnboardingState {
        if !self.state.completed {
            debug!("온보딩 건너뜀: step={}", self.state.step);
            self.complete();
        }
        self.state
    }

    fn complete(&mut self) {
        self.state = OnboardingState::completed();
        if let Err(e) = self.durable.set(ONBOARDING_KEY, "true") {
            warn!("온보딩 완료 플래그 저장 실패: {e}");
        }
        info!("온보딩 완료");
    }

    pub fn state(&self) -> OnboardingState {
        self.state
    }

    /// 현재 표시할 단계. 완료 상태면 None
    pub fn current_step(&self) -> Option<&TutorialStep> {
        if self.state.completed {
            return None;
        }
        self.steps.get(self.state.step)
    }

    pub fn is_last_step(&self) -> bool {
        !self.state.completed && self.state.step + 1 == self.steps.len()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeeper_storage::memory::MemoryKvStore;

    #[test]
    fn first_run_starts_at_step_zero() {
        let coordinator = OnboardingCoordinator::initialize(Arc::new(MemoryKvStore::new()));
        assert_eq!(coordinator.state(), OnboardingState::start());
        assert_eq!(coordinator.current_step().unwrap().icon, "👋");
        assert_eq!(coordinator.step_count(), 5);
    }

    #[test]
    fn next_walks_to_completed() {
        let durable = Arc::new(MemoryKvStore::new());
        let mut coordinator = OnboardingCoordinator::initialize(durable.clone());

        for expected in 1..5 {
            assert_eq!(coordinator.next().step, expected);
        }
        assert!(coordinator.is_last_step());
        assert_eq!(coordinator.current_step().unwrap().title, "View Reports");

        assert!(coordinator.next().completed);
        assert!(coordinator.current_step().is_none());
        assert_eq!(durable.get(ONBOARDING_KEY).unwrap().as_deref(), Some("true"));

        // 종료 상태에서는 아무 변화 없음
        assert_eq!(coordinator.next(), OnboardingState::completed());
        assert_eq!(coordinator.skip(), OnboardingState::completed());
    }

    #[test]
    fn skip_from_any_step() {
        let durable = Arc::new(MemoryKvStore::new());
        let mut coordinator = OnboardingCoordinator::initialize(durable.clone());
        coordinator.next();

        assert!(coordinator.skip().completed);
        assert!(durable.contains(ONBOARDING_KEY));
    }

    #[test]
    fn persisted_completion_suppresses_tutorial() {
        let durable = Arc::new(MemoryKvStore::new());
        let mut first = OnboardingCoordinator::initialize(durable.clone());
        first.skip();

        let second = OnboardingCoordinator::initialize(durable);
        assert!(second.is_completed());
        assert!(second.current_step().is_none());
    }

    #[test]
    fn flag_write_failure_still_completes() {
        let durable = Arc::new(MemoryKvStore::new());
        durable.set_fail_writes(true);
        let mut coordinator = OnboardingCoordinator::initialize(durable.clone());

        assert!(coordinator.skip().completed);
        assert!(!durable.contains(ONBOARDING_KEY));
    }

    #[test]
    fn read_failure_shows_tutorial() {
        let durable = Arc::new(MemoryKvStore::new());
        durable.set("onboardingComplete", "true").unwrap();
        durable.set_fail_reads(true);

        let coordinator = OnboardingCoordinator::initialize(durable);
        assert!(!coordinator.is_completed());
    }
}
