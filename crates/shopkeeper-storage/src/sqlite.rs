//! SQLite 키-값 저장소 어댑터.
//!
//! `KeyValueStore` 포트 구현. 하나의 DB 파일을 범위(scope)로 나눠
//! 세션 저장소(로그아웃 시 비움)와 영구 저장소(온보딩 완료 플래그 등)로 쓴다.

use rusqlite::{params, Connection, OptionalExtension};
use shopkeeper_core::error::CoreError;
use shopkeeper_core::ports::kv_store::KeyValueStore;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::migration;

/// 저장소 범위
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvScope {
    /// 세션 범위 — 로그아웃/세션 종료 시 삭제
    Session,
    /// 영구 범위 — 세션을 넘어 유지
    Durable,
}

impl KvScope {
    fn as_str(self) -> &'static str {
        match self {
            KvScope::Session => "session",
            KvScope::Durable => "durable",
        }
    }
}

/// SQLite 저장소 — `KeyValueStore` 포트 구현
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
    scope: KvScope,
}

impl SqliteKvStore {
    /// 파일 기반 SQLite 저장소 생성
    pub fn open(path: &Path, scope: KvScope) -> Result<Self, CoreError> {
        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        // 세션/영구 범위가 같은 파일을 별도 연결로 연다
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA busy_timeout=5000;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        info!(
            "SQLite 저장소 초기화: {} (scope={})",
            path.display(),
            scope.as_str()
        );

        Ok(Self {
            conn: Mutex::new(conn),
            scope,
        })
    }

    /// 인메모리 SQLite 저장소 생성 (테스트용)
    pub fn open_in_memory(scope: KvScope) -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
            scope,
        })
    }

    /// 저장소 범위
    pub fn scope(&self) -> KvScope {
        self.scope
    }

    fn with_conn<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, rusqlite::Error>,
        what: &str,
    ) -> Result<T, CoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CoreError::Storage(format!("잠금 획득 실패: {e}")))?;
        op(&conn).map_err(|e| CoreError::Storage(format!("{what} 실패: {e}")))
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let scope = self.scope.as_str();
        self.with_conn(
            |conn| {
                conn.query_row(
                    "SELECT value FROM kv_entries WHERE scope = ?1 AND key = ?2",
                    params![scope, key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
            },
            "값 조회",
        )
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let scope = self.scope.as_str();
        self.with_conn(
            |conn| {
                conn.execute(
                    "INSERT INTO kv_entries (scope, key, value, updated_at)
                     VALUES (?1, ?2, ?3, datetime('now'))
                     ON CONFLICT(scope, key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![scope, key, value],
                )
            },
            "값 저장",
        )?;
        debug!("kv 저장: scope={scope}, key={key}, {}바이트", value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let scope = self.scope.as_str();
        self.with_conn(
            |conn| {
                conn.execute(
                    "DELETE FROM kv_entries WHERE scope = ?1 AND key = ?2",
                    params![scope, key],
                )
            },
            "값 삭제",
        )?;
        debug!("kv 삭제: scope={scope}, key={key}");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        let scope = self.scope.as_str();
        let removed = self.with_conn(
            |conn| conn.execute("DELETE FROM kv_entries WHERE scope = ?1", params![scope]),
            "범위 삭제",
        )?;
        info!("kv 범위 삭제: scope={scope}, {removed}개");
        Ok(())
    }
}
