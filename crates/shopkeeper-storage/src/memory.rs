//! 인메모리 키-값 저장소.
//!
//! 프로세스가 끝나면 사라진다. 쓰기 실패를 흉내 낼 수 있어
//! 저장소 장애 경로 테스트에도 쓴다.

use parking_lot::RwLock;
use shopkeeper_core::error::CoreError;
use shopkeeper_core::ports::kv_store::KeyValueStore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// 인메모리 저장소 — `KeyValueStore` 포트 구현
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryKvStore {
    /// 빈 저장소 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 쓰기 실패 모드 전환 (용량 초과/저장소 불가 상황 재현)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// 읽기 실패 모드 전환
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// 저장된 키 수
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 키 존재 여부
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("저장 용량 초과".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("저장소 읽기 불가".to_string()));
        }
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.check_writable()?;
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.check_writable()?;
        self.entries.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.check_writable()?;
        self.entries.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryKvStore::new();
        assert!(store.get("chatHistory:1").unwrap().is_none());

        store.set("chatHistory:1", "[]").unwrap();
        assert_eq!(store.get("chatHistory:1").unwrap().as_deref(), Some("[]"));

        store.remove("chatHistory:1").unwrap();
        assert!(!store.contains("chatHistory:1"));
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn failing_writes_keep_previous_value() {
        let store = MemoryKvStore::new();
        store.set("k", "v1").unwrap();
        store.set_fail_writes(true);

        assert!(matches!(store.set("k", "v2"), Err(CoreError::Storage(_))));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));
    }

    #[test]
    fn failing_reads() {
        let store = MemoryKvStore::new();
        store.set_fail_reads(true);
        assert!(store.get("k").is_err());
    }

    #[test]
    fn clear_empties_store() {
        let store = MemoryKvStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.len(), 2);
        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
