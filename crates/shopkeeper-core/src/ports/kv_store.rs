//! 키-값 저장소 포트.
//!
//! 구현: `shopkeeper-storage` crate (인메모리, rusqlite)
//!
//! 세션 범위(휘발성)와 영구 범위 두 인스턴스가 주입된다.

use crate::error::CoreError;

/// 문자열 키-값 저장소
pub trait KeyValueStore: Send + Sync {
    /// 값 조회 (없으면 `None`)
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (덮어쓰기)
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 키 삭제 (없어도 성공)
    fn remove(&self, key: &str) -> Result<(), CoreError>;

    /// 이 저장소 범위의 모든 키 삭제 (세션 종료)
    fn clear(&self) -> Result<(), CoreError>;
}
