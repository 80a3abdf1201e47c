//! 터미널 채팅 루프.
//!
//! 한 줄 입력 → 슬래시 명령 또는 채팅 명령 제출. 명령 처리 중에는 입력을 받지 않는다.

use anyhow::Result;
use shopkeeper_chat::dispatcher::{ChatSession, QuickCommand, SubmitOutcome};
use shopkeeper_chat::notification_panel::NotificationPanel;
use shopkeeper_chat::onboarding::OnboardingCoordinator;
use shopkeeper_chat::presenter::{
    present, present_all, render_alerts, render_stats, render_text, PresenterConfig,
};
use shopkeeper_chat::translation::TranslationWidget;
use shopkeeper_core::error::CoreError;
use shopkeeper_core::models::message::Message;
use shopkeeper_core::ports::kv_store::KeyValueStore;
use shopkeeper_network::auth::TokenManager;
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};

/// 입력 한 줄의 해석 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// 채팅 명령 제출
    Chat(String),
    Quick(QuickCommand),
    Clear,
    Refresh,
    Alerts,
    Stats,
    Translate(String),
    Help,
    Logout,
    Quit,
    /// 빈 줄
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Chat(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name.to_lowercase().as_str() {
            "inventory" => ReplCommand::Quick(QuickCommand::Inventory),
            "summary" => ReplCommand::Quick(QuickCommand::Summary),
            "reorder" => ReplCommand::Quick(QuickCommand::LowStock),
            "clear" => ReplCommand::Clear,
            "refresh" => ReplCommand::Refresh,
            "alerts" => ReplCommand::Alerts,
            "stats" => ReplCommand::Stats,
            "translate" => ReplCommand::Translate(arg.to_string()),
            "help" => ReplCommand::Help,
            "logout" => ReplCommand::Logout,
            "quit" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// 표준 입력 줄 단위 리더
pub type InputLines = Lines<BufReader<Stdin>>;

/// 표준 입력 리더 생성
pub fn stdin_lines() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

/// 첫 실행 튜토리얼 (n = 다음, s = 건너뛰기)
pub async fn run_onboarding(
    coordinator: &mut OnboardingCoordinator,
    lines: &mut InputLines,
) -> Result<()> {
    let total = coordinator.step_count();
    while let Some(step) = coordinator.current_step() {
        let index = coordinator.state().step + 1;
        println!();
        println!("{}  {} ({index}/{total})", step.icon, step.title);
        println!("   {}", step.content);
        if coordinator.is_last_step() {
            print!("[Enter] Let's Start! 🚀 > ");
        } else {
            print!("[n] Next →  [s] Skip Tour > ");
        }
        flush_stdout();

        let Some(line) = lines.next_line().await? else {
            // 입력이 끝나면 튜토리얼을 닫는다
            coordinator.skip();
            break;
        };
        match line.trim().to_lowercase().as_str() {
            "s" | "skip" if !coordinator.is_last_step() => {
                coordinator.skip();
            }
            _ => {
                coordinator.next();
            }
        }
    }
    println!();
    Ok(())
}

/// 루프 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    Logout,
    Interrupted,
    EndOfInput,
}

/// 채팅 루프 구성 요소
pub struct Repl {
    pub session: Arc<ChatSession>,
    pub panel: Arc<NotificationPanel>,
    pub translation: TranslationWidget,
    pub tokens: Arc<TokenManager>,
    pub session_kv: Arc<dyn KeyValueStore>,
    pub presenter: PresenterConfig,
}

impl Repl {
    /// 입력이 끝나거나 종료 명령이 올 때까지 실행
    pub async fn run(&self, lines: &mut InputLines) -> Result<ExitReason> {
        self.print_history();
        self.print_alerts();
        print_help();

        loop {
            print_prompt();
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C 수신");
                    self.session.detach();
                    return Ok(ExitReason::Interrupted);
                }
            };
            let Some(line) = line else {
                self.session.detach();
                return Ok(ExitReason::EndOfInput);
            };

            match ReplCommand::parse(&line) {
                ReplCommand::Empty => {}
                ReplCommand::Chat(text) => {
                    if self.submit_interruptible(&text).await {
                        return Ok(ExitReason::Interrupted);
                    }
                }
                ReplCommand::Quick(command) => {
                    if self.submit_interruptible(command.text()).await {
                        return Ok(ExitReason::Interrupted);
                    }
                }
                ReplCommand::Clear => {
                    self.session.clear();
                    println!("🗑️ Chat cleared.");
                    self.print_history();
                }
                ReplCommand::Refresh => {
                    if let Err(e) = self.panel.refresh().await {
                        println!("Could not refresh stock alerts: {e}");
                    }
                    self.print_alerts();
                }
                ReplCommand::Alerts => self.print_alerts(),
                ReplCommand::Stats => {
                    println!("{}", render_stats(self.session.user_message_count()));
                }
                ReplCommand::Translate(text) => match self.translation.translate(&text).await {
                    Ok(translated) => println!("🌐 {translated}"),
                    Err(_) => println!("Usage: /translate <text>"),
                },
                ReplCommand::Help => print_help(),
                ReplCommand::Logout => {
                    self.logout().await;
                    return Ok(ExitReason::Logout);
                }
                ReplCommand::Quit => {
                    self.session.detach();
                    return Ok(ExitReason::Quit);
                }
                ReplCommand::Unknown(name) => {
                    println!("Unknown command: /{name} (type /help)");
                }
            }
        }
    }

    /// 명령 제출. 응답 대기 중 Ctrl+C가 오면 세션을 분리하고 true 반환
    async fn submit_interruptible(&self, text: &str) -> bool {
        if until_interrupted(self.submit(text), tokio::signal::ctrl_c())
            .await
            .is_some()
        {
            return false;
        }
        info!("응답 대기 중 Ctrl+C 수신");
        self.session.detach();
        true
    }

    async fn submit(&self, text: &str) {
        println!("⏳ ...");
        match self.session.submit(text).await {
            Ok(SubmitOutcome::Replied { reply, .. }) | Ok(SubmitOutcome::Failed(reply)) => {
                self.print_message(&reply);
            }
            Ok(SubmitOutcome::Discarded) => debug!("응답 폐기됨"),
            Err(CoreError::CommandInFlight) => println!("Please wait for the previous command."),
            Err(e) => debug!("제출 거부: {e}"),
        }
    }

    /// 세션 범위 저장소를 비우고 토큰 폐기
    async fn logout(&self) {
        self.session.detach();
        if let Err(e) = self.session_kv.clear() {
            warn!("세션 저장소 정리 실패: {e}");
        }
        self.tokens.logout().await;
        println!("👋 Logged out.");
    }

    fn print_message(&self, message: &Message) {
        println!("{}", render_text(&present(message, &self.presenter)));
    }

    fn print_history(&self) {
        for view in present_all(&self.session.messages(), &self.presenter) {
            println!("{}", render_text(&view));
        }
    }

    fn print_alerts(&self) {
        match self.panel.view() {
            Some(view) => println!("{}", render_alerts(&view)),
            None => debug!("표시할 재고 알림 없음"),
        }
    }
}

/// 작업과 중단 신호 경합. 중단되면 None
async fn until_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future,
) -> Option<T> {
    tokio::select! {
        out = work => Some(out),
        _ = interrupt => None,
    }
}

fn print_prompt() {
    print!("> ");
    flush_stdout();
}

fn flush_stdout() {
    use std::io::Write;
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!("Commands:");
    for command in QuickCommand::ALL {
        let slash = match command {
            QuickCommand::Inventory => "/inventory",
            QuickCommand::Summary => "/summary",
            QuickCommand::LowStock => "/reorder",
        };
        println!("  {slash:<18} {} ({})", command.label(), command.text());
    }
    println!("  /clear             clear chat history");
    println!("  /refresh           refresh stock alerts");
    println!("  /alerts            show stock alerts");
    println!("  /stats             show quick stats");
    println!("  /translate <text>  translate to Urdu");
    println!("  /logout            log out and forget this session");
    println!("  /quit              exit");
    println!();
}
