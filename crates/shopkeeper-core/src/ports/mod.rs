//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `shopkeeper-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 원격 호출 포트는 `async_trait` 매크로로 object safety를 보장하고,
//! 키-값 저장소 포트는 브라우저 저장소처럼 동기 인터페이스로 둔다.

pub mod api_client;
pub mod kv_store;
