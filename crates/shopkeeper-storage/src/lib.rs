//! # shopkeeper-storage
//!
//! 로컬 키-값 저장소 어댑터.
//! `KeyValueStore` 포트를 인메모리와 SQLite 두 가지로 구현한다.
//!
//! ## 모듈
//! - `memory`: 프로세스 수명 동안만 유지되는 저장소 (테스트, 휘발성 세션)
//! - `sqlite`: 범위(세션/영구)별로 분리된 SQLite 저장소
//! - `migration`: 스키마 마이그레이션

pub mod memory;
pub mod migration;
pub mod sqlite;
