//! 인증 세션 컨텍스트.
//!
//! 로그인 시 생성되어 하위 컴포넌트로 명시적으로 전달되고,
//! 로그아웃 시 폐기된다. 전역 상태로 두지 않는다.

use serde::{Deserialize, Serialize};

/// 로그인한 사용자 정보 (`POST /login` 응답의 `user`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// 사용자 ID
    pub id: i64,
    /// 이름
    pub name: String,
    /// 이메일
    pub email: String,
    /// 역할 ("shopkeeper" | "admin")
    #[serde(default = "default_role")]
    pub role: String,
    /// 상점 이름
    #[serde(default)]
    pub shop_name: Option<String>,
}

fn default_role() -> String {
    "shopkeeper".to_string()
}

/// 인증 세션 컨텍스트
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// 액세스 토큰 (JWT)
    pub access_token: String,
    /// 토큰 종류 (보통 "bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// 사용자 정보
    pub user: UserProfile,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl SessionContext {
    /// 세션 범위 저장소 키 (사용자별 분리)
    pub fn scoped_key(&self, key: &str) -> String {
        format!("{key}:{}", self.user.id)
    }
}

// 토큰이 로그에 찍히지 않도록 Debug를 직접 구현
impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}
