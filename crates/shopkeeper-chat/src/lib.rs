//! # shopkeeper-chat
//!
//! 대화형 세션 관리자.
//! 세션 로그 소유, 명령 디스패치(동시 1건), 응답 분류,
//! 재고 알림 갱신 트리거, 온보딩 튜토리얼, 번역 위젯.

pub mod classifier;
pub mod dispatcher;
pub mod notification_panel;
pub mod onboarding;
pub mod presenter;
pub mod refresh;
pub mod session_store;
pub mod translation;

#[cfg(test)]
pub(crate) mod test_support;
