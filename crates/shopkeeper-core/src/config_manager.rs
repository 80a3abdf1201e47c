//! 설정 파일 관리.
//!
//! 플랫폼별 설정 디렉토리의 JSON 파일 + `SHOPKEEPER__*` 환경변수를
//! `config` crate로 겹쳐 로드하고, 변경 시 파일로 저장한다.

use crate::config::AppConfig;
use crate::error::CoreError;
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 환경변수 접두사 (`SHOPKEEPER__SERVER__BASE_URL` 형태)
const ENV_PREFIX: &str = "SHOPKEEPER";

/// 환경변수 구분자
const ENV_SEPARATOR: &str = "__";

/// 설정 관리자
///
/// 설정 파일의 로드/저장 및 런타임 설정 변경을 관리한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로로 설정 관리자 생성
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// 지정된 경로로 설정 관리자 생성
    ///
    /// 설정 파일이 없으면 기본 설정을 생성하고 저장한다.
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("설정 디렉토리 생성: {}", parent.display());
            }
        }

        if !config_path.exists() {
            Self::save_to_file(&config_path, &AppConfig::default_config())?;
            info!("기본 설정 파일 생성: {}", config_path.display());
        }

        let config = Self::load_layered(&config_path, None)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// 현재 설정 반환 (복제본)
    pub fn get(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// 설정 업데이트 및 파일 저장
    pub fn update(&self, new_config: AppConfig) -> Result<(), CoreError> {
        Self::save_to_file(&self.config_path, &new_config)?;
        *self.config.write() = new_config;
        debug!("설정 저장 완료: {}", self.config_path.display());
        Ok(())
    }

    /// 특정 필드만 업데이트
    pub fn update_with<F>(&self, updater: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.get();
        updater(&mut config);
        self.update(config.clone())?;
        Ok(config)
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 설정 다시 로드
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = Self::load_layered(&self.config_path, None)?;
        *self.config.write() = config;
        info!("설정 다시 로드 완료");
        Ok(())
    }

    /// 플랫폼별 설정 디렉토리 경로
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// 데이터 디렉토리 경로 (SQLite 등)
    pub fn data_dir() -> Result<PathBuf, CoreError> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs, CoreError> {
        ProjectDirs::from("com", "shopkeeper-ai", "shopkeeper")
            .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
    }

    /// 파일 → 환경변수 순으로 겹쳐 로드
    ///
    /// `env`가 주어지면 프로세스 환경 대신 해당 맵을 사용한다 (테스트용).
    fn load_layered(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> Result<AppConfig, CoreError> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(env);

        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .add_source(environment)
            .build()
            .map_err(|e| {
                CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
            })?
            .try_deserialize::<AppConfig>()
            .map_err(|e| {
                CoreError::Config(format!("설정 파일 파싱 실패: {}: {}", path.display(), e))
            })?;

        debug!("설정 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 파일에 설정 저장
    fn save_to_file(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {}", e)))?;

        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("설정 파일 저장 실패: {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}
