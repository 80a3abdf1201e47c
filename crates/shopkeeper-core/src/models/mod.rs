//! ShopKeeperAI 도메인 모델.
//!
//! 채팅 세션, 응답 변형, 재고, 온보딩, 인증 컨텍스트 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod message;
pub mod onboarding;
pub mod product;
pub mod session;
pub mod variant;
