//! 온보딩 튜토리얼 상태.

use serde::{Deserialize, Serialize};

/// 온보딩 상태 (현재 단계 + 완료 여부)
///
/// `completed`가 true이면 `step`은 의미가 없다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingState {
    /// 현재 단계 (0부터)
    pub step: usize,
    /// 튜토리얼 종료 여부 (완료 또는 건너뜀)
    pub completed: bool,
}

impl OnboardingState {
    /// 첫 단계 상태
    pub fn start() -> Self {
        Self::default()
    }

    /// 종료 상태
    pub fn completed() -> Self {
        Self {
            step: 0,
            completed: true,
        }
    }
}

/// 튜토리얼 단계 표시 데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialStep {
    /// 아이콘 이모지
    pub icon: &'static str,
    /// 제목
    pub title: &'static str,
    /// 본문
    pub content: &'static str,
}
