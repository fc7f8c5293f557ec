//! GitForge Setup Wizard
//!
//! `gitforge config` 대화형 설정 마법사
//! - Provider / 모델 / API 키 / 이모지 설정
//! - 빈 API 키 입력은 기존 키 유지

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use gitforge_foundation::{Error, GitForgeConfig, ProviderType, Result};
use std::io::{self, Write};
use std::time::Duration;

/// 마법사에서 수집한 응답
#[derive(Debug, Clone, PartialEq)]
pub struct WizardAnswers {
    pub provider: ProviderType,
    pub model: String,
    /// Raw key input; empty means "keep the stored key"
    pub api_key: String,
    pub emoji: bool,
}

/// `gitforge config`
pub fn run() -> Result<()> {
    let current = GitForgeConfig::load_global()?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();

    let answers = run_wizard_inner(&mut stdout, &current);

    // 터미널 복구
    terminal::disable_raw_mode()?;
    execute!(stdout, cursor::Show)?;
    println!();

    let Some(answers) = answers? else {
        println!("Cancelled.");
        return Err(Error::Cancelled);
    };

    let updated = apply_answers(&current, answers);
    updated.save_global()?;
    print_summary(&updated);

    Ok(())
}

fn run_wizard_inner(
    stdout: &mut io::Stdout,
    current: &GitForgeConfig,
) -> Result<Option<WizardAnswers>> {
    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    print_header(stdout)?;

    // 1. Provider 선택
    let Some(provider) = select_provider(stdout, current.provider)? else {
        return Ok(None);
    };

    // 2. 모델 입력
    let default_model = current
        .model
        .clone()
        .filter(|_| provider == current.provider)
        .unwrap_or_else(|| provider.default_model().to_string());
    let Some(model) = input_model(stdout, &default_model)? else {
        return Ok(None);
    };

    // 3. API 키 입력
    let Some(api_key) = input_api_key(stdout, provider, current)? else {
        return Ok(None);
    };

    // 4. 이모지 설정
    let Some(emoji) = select_emoji(stdout, current.emoji)? else {
        return Ok(None);
    };

    Ok(Some(WizardAnswers {
        provider,
        model,
        api_key,
        emoji,
    }))
}

fn print_header(stdout: &mut io::Stdout) -> Result<()> {
    execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("╔══════════════════════════════════════════════════╗\r\n"),
        Print("║          🔧 GitForge 설정 마법사                  ║\r\n"),
        Print("╚══════════════════════════════════════════════════╝\r\n"),
        ResetColor,
        Print("\r\n")
    )?;
    Ok(())
}

fn is_cancel(code: KeyCode, modifiers: KeyModifiers) -> bool {
    code == KeyCode::Esc
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

fn select_provider(
    stdout: &mut io::Stdout,
    current: ProviderType,
) -> Result<Option<ProviderType>> {
    let providers = ProviderType::all();
    let mut selected = providers.iter().position(|p| *p == current).unwrap_or(0);

    loop {
        execute!(stdout, cursor::MoveTo(0, 5), Clear(ClearType::FromCursorDown))?;

        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print("1. Provider 선택 (↑↓ 이동, Enter 선택, Esc 취소)\r\n\r\n"),
            ResetColor
        )?;

        for (i, p) in providers.iter().enumerate() {
            if i == selected {
                execute!(
                    stdout,
                    SetForegroundColor(Color::Green),
                    Print(format!("   ▶ {}\r\n", p.name())),
                    ResetColor
                )?;
            } else {
                execute!(stdout, Print(format!("     {}\r\n", p.name())))?;
            }
        }

        stdout.flush()?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    _ if is_cancel(key.code, key.modifiers) => return Ok(None),
                    KeyCode::Up => {
                        if selected > 0 {
                            selected -= 1;
                        }
                    }
                    KeyCode::Down => {
                        if selected < providers.len() - 1 {
                            selected += 1;
                        }
                    }
                    KeyCode::Enter => {
                        return Ok(Some(providers[selected]));
                    }
                    _ => {}
                }
            }
        }
    }
}

fn input_model(stdout: &mut io::Stdout, default_model: &str) -> Result<Option<String>> {
    execute!(stdout, cursor::MoveTo(0, 5), Clear(ClearType::FromCursorDown))?;

    execute!(
        stdout,
        SetForegroundColor(Color::Yellow),
        Print("2. 모델 선택\r\n\r\n"),
        ResetColor,
        Print(format!("   기본값: {}\r\n", default_model)),
        Print("   Enter: 기본값 사용 / 모델명 입력:\r\n\r\n"),
        Print("   Model: "),
        cursor::Show
    )?;
    stdout.flush()?;

    let mut input = String::new();

    loop {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    _ if is_cancel(key.code, key.modifiers) => {
                        execute!(stdout, cursor::Hide)?;
                        return Ok(None);
                    }
                    KeyCode::Enter => {
                        execute!(stdout, cursor::Hide)?;
                        if input.is_empty() {
                            return Ok(Some(default_model.to_string()));
                        }
                        return Ok(Some(input));
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                        execute!(stdout, Print(c))?;
                        stdout.flush()?;
                    }
                    KeyCode::Backspace => {
                        if !input.is_empty() {
                            input.pop();
                            execute!(stdout, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                            stdout.flush()?;
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn input_api_key(
    stdout: &mut io::Stdout,
    provider: ProviderType,
    current: &GitForgeConfig,
) -> Result<Option<String>> {
    execute!(stdout, cursor::MoveTo(0, 5), Clear(ClearType::FromCursorDown))?;

    execute!(
        stdout,
        SetForegroundColor(Color::Yellow),
        Print("3. API 키 입력\r\n\r\n"),
        ResetColor
    )?;

    // 저장된 키 또는 환경변수 키 안내
    if let Some(key) = current.api_key.as_deref().filter(|k| !k.is_empty()) {
        execute!(
            stdout,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("   저장된 키: {}\r\n", mask_key(key))),
            ResetColor,
            Print("   Enter: 기존 키 유지 / 새 키 입력:\r\n\r\n")
        )?;
    } else if let Ok(key) = std::env::var(provider.env_key()) {
        if !key.is_empty() {
            execute!(
                stdout,
                SetForegroundColor(Color::DarkGrey),
                Print(format!(
                    "   환경변수 {} 발견: {}\r\n",
                    provider.env_key(),
                    mask_key(&key)
                )),
                ResetColor,
                Print("   Enter: 환경변수 사용 / 새 키 입력:\r\n\r\n")
            )?;
        }
    }

    execute!(stdout, Print("   API Key: "), cursor::Show)?;
    stdout.flush()?;

    let mut input = String::new();

    loop {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    _ if is_cancel(key.code, key.modifiers) => {
                        execute!(stdout, cursor::Hide)?;
                        return Ok(None);
                    }
                    KeyCode::Enter => {
                        execute!(stdout, cursor::Hide)?;
                        return Ok(Some(input));
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                        execute!(stdout, Print("*"))?;
                        stdout.flush()?;
                    }
                    KeyCode::Backspace => {
                        if !input.is_empty() {
                            input.pop();
                            execute!(stdout, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                            stdout.flush()?;
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn select_emoji(stdout: &mut io::Stdout, current: bool) -> Result<Option<bool>> {
    let options = [
        ("Yes - 커밋 메시지에 gitmoji 포함", true),
        ("No - 텍스트만", false),
    ];
    let mut selected = if current { 0 } else { 1 };

    loop {
        execute!(stdout, cursor::MoveTo(0, 5), Clear(ClearType::FromCursorDown))?;

        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print("4. 커밋 이모지 (↑↓ 이동, Enter 선택)\r\n\r\n"),
            ResetColor
        )?;

        for (i, (label, _)) in options.iter().enumerate() {
            if i == selected {
                execute!(
                    stdout,
                    SetForegroundColor(Color::Green),
                    Print(format!("   ▶ {}\r\n", label)),
                    ResetColor
                )?;
            } else {
                execute!(stdout, Print(format!("     {}\r\n", label)))?;
            }
        }

        stdout.flush()?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    _ if is_cancel(key.code, key.modifiers) => return Ok(None),
                    KeyCode::Up => {
                        if selected > 0 {
                            selected -= 1;
                        }
                    }
                    KeyCode::Down => {
                        if selected < options.len() - 1 {
                            selected += 1;
                        }
                    }
                    KeyCode::Enter => {
                        return Ok(Some(options[selected].1));
                    }
                    _ => {}
                }
            }
        }
    }
}

// ============================================================================
// Answer application
// ============================================================================

/// Fold wizard answers into the stored config
///
/// Every field takes the new value except the API key: a blank entry keeps
/// the previously stored key.
fn apply_answers(current: &GitForgeConfig, answers: WizardAnswers) -> GitForgeConfig {
    let api_key = if answers.api_key.is_empty() {
        current.api_key.clone()
    } else {
        Some(answers.api_key)
    };

    GitForgeConfig {
        version: current.version,
        provider: answers.provider,
        model: Some(answers.model),
        api_key,
        emoji: answers.emoji,
    }
}

fn mask_key(key: &str) -> String {
    if key.len() < 8 {
        return "****".to_string();
    }
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}

fn print_summary(config: &GitForgeConfig) {
    println!("✓ Configuration saved");
    println!("  Provider: {}", config.provider.name());
    println!("  Model:    {}", config.effective_model());
    match config.api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => println!("  API key:  {}", mask_key(key)),
        None => println!("  API key:  (not set - {} is used)", config.provider.env_key()),
    }
    println!("  Emoji:    {}", if config.emoji { "on" } else { "off" });
}
