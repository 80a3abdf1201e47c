//! # shopkeeper-app
//!
//! ShopKeeperAI 터미널 클라이언트 진입점.
//! 설정 로드 → 로그인 → 저장소 준비 → 온보딩 → 재고 알림 → 채팅 루프.

mod repl;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use shopkeeper_chat::dispatcher::ChatSession;
use shopkeeper_chat::notification_panel::NotificationPanel;
use shopkeeper_chat::onboarding::OnboardingCoordinator;
use shopkeeper_chat::presenter::PresenterConfig;
use shopkeeper_chat::refresh::StockRefreshScheduler;
use shopkeeper_chat::session_store::SessionStore;
use shopkeeper_chat::translation::TranslationWidget;
use shopkeeper_core::config::AppConfig;
use shopkeeper_core::config_manager::ConfigManager;
use shopkeeper_network::auth::TokenManager;
use shopkeeper_network::http_client::HttpShopClient;
use shopkeeper_storage::sqlite::{KvScope, SqliteKvStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::repl::{ExitReason, InputLines, Repl};

/// ShopKeeperAI 터미널 클라이언트
///
/// 자연어 명령으로 판매, 재고, 인보이스를 관리하는 상점 도우미
#[derive(Parser, Debug)]
#[command(name = "shopkeeper")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 서버 URL 지정 (기본: 설정 파일 값)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 로그인 이메일
    #[arg(long, short = 'e')]
    email: Option<String>,

    /// 로그인 비밀번호
    #[arg(long, env = "SHOPKEEPER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// 데이터 저장 경로 (기본: 플랫폼 데이터 디렉토리)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn")]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

/// 데이터베이스 경로 결정
///
/// 우선순위: CLI `--data-dir` → 설정 `storage.db_path` → 플랫폼 데이터 디렉토리
fn resolve_db_path(data_dir: Option<&PathBuf>, config: &AppConfig) -> Result<PathBuf> {
    if let Some(dir) = data_dir {
        return Ok(dir.join("shopkeeper.db"));
    }
    if let Some(path) = &config.storage.db_path {
        return Ok(path.clone());
    }
    Ok(ConfigManager::data_dir()?.join("shopkeeper.db"))
}

/// 설정 로드 + CLI 오버라이드
fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {}", manager.config_path().display());

    let mut config = manager.get();
    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    Ok(config)
}

/// 입력에서 한 줄 읽기 (프롬프트 출력)
async fn prompt_line(lines: &mut InputLines, prompt: &str) -> Result<String> {
    use std::io::Write;
    print!("{prompt}");
    let _ = std::io::stdout().flush();
    lines
        .next_line()
        .await?
        .map(|l| l.trim().to_string())
        .ok_or_else(|| anyhow!("입력이 종료되었습니다"))
}

fn print_banner(config: &AppConfig) {
    println!();
    println!("🏪 ShopKeeperAI — your intelligent shop assistant");
    println!("   server: {}", config.server.base_url);
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "shopkeeper={0},shopkeeper_app={0},shopkeeper_core={0},shopkeeper_network={0},shopkeeper_storage={0},shopkeeper_chat={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config = load_config(&args)?;
    print_banner(&config);
    info!("ShopKeeperAI 클라이언트 시작");

    let mut lines = repl::stdin_lines();

    // 로그인
    let email = match &args.email {
        Some(email) => email.clone(),
        None => prompt_line(&mut lines, "Email: ").await?,
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => prompt_line(&mut lines, "Password: ").await?,
    };

    let tokens = Arc::new(TokenManager::new(&config.server.base_url));
    let context = match tokens.login(&email, &password).await {
        Ok(context) => context,
        Err(e) => {
            let detail = e.user_detail().unwrap_or("Login failed").to_string();
            println!("❌ {detail}");
            return Err(anyhow!("로그인 실패: {e}"));
        }
    };
    println!(
        "Welcome back, {}{}",
        context.user.name,
        context
            .user
            .shop_name
            .as_deref()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default()
    );

    let client = Arc::new(
        HttpShopClient::new(&config.server.base_url, tokens.clone(), config.request_timeout())?
            .with_max_retries(config.server.max_retries),
    );

    // 저장소: 같은 파일, 세션/영구 범위 분리
    let db_path = resolve_db_path(args.data_dir.as_ref(), &config)?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("데이터 디렉토리 생성 실패: {}", parent.display()))?;
    }
    let session_kv = Arc::new(SqliteKvStore::open(&db_path, KvScope::Session)?);
    let durable_kv = Arc::new(SqliteKvStore::open(&db_path, KvScope::Durable)?);

    // 온보딩
    let mut onboarding = OnboardingCoordinator::initialize(durable_kv.clone());
    repl::run_onboarding(&mut onboarding, &mut lines).await?;

    // 재고 알림 패널
    let panel = Arc::new(NotificationPanel::new(
        client.clone(),
        config.notification.clone(),
    ));
    if let Err(e) = panel.mount().await {
        warn!("재고 알림 초기 조회 실패: {e}");
    }

    // 채팅 세션
    let store = SessionStore::initialize(&context, session_kv.clone());
    let session = Arc::new(
        ChatSession::new(client.clone(), store, &config.chat)
            .with_refresh(StockRefreshScheduler::new(panel.clone())),
    );

    let repl = Repl {
        session,
        panel,
        translation: TranslationWidget::new(client),
        tokens,
        session_kv,
        presenter: PresenterConfig::from(&config.chat),
    };

    let reason = repl.run(&mut lines).await?;
    info!("ShopKeeperAI 클라이언트 종료: {reason:?}");
    if reason == ExitReason::Interrupted {
        println!();
    }
    Ok(())
}
