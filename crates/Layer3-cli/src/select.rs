//! Interactive template picker
//!
//! 템플릿 다중 선택 루프 (raw mode, 타이핑 필터)

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use gitforge_foundation::Result;
use std::io::{self, Write};
use std::time::Duration;

/// 완료 선택지 (목록 맨 앞에 고정)
pub const DONE_CHOICE: &str = "Done (finish selection)";

const VISIBLE_ROWS: usize = 15;

/// How the picker ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Loop finished; the selection may be empty
    Selected(Vec<String>),
    /// User interrupted with Ctrl+C
    Cancelled,
}

/// Run the picker over the available template names
///
/// Raw mode is restored on every exit path, including cancellation.
pub fn pick_templates(available: &[String]) -> Result<SelectionOutcome> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;

    let result = run_picker(&mut stdout, available);

    terminal::disable_raw_mode()?;
    execute!(stdout, cursor::Show)?;
    println!();

    result
}

fn run_picker(stdout: &mut io::Stdout, available: &[String]) -> Result<SelectionOutcome> {
    let mut state = SelectionState::new(available.to_vec());

    loop {
        render(stdout, &state)?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(SelectionOutcome::Cancelled);
            }
            KeyCode::Up => state.move_up(),
            KeyCode::Down => state.move_down(),
            KeyCode::Enter => {
                if state.pick() {
                    return Ok(SelectionOutcome::Selected(state.into_selected()));
                }
            }
            KeyCode::Esc => return Ok(SelectionOutcome::Selected(Vec::new())),
            KeyCode::Backspace => state.pop_filter(),
            KeyCode::Char(c) => state.push_filter(c),
            _ => {}
        }
    }
}

fn render(stdout: &mut io::Stdout, state: &SelectionState) -> Result<()> {
    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    execute!(
        stdout,
        SetForegroundColor(Color::Yellow),
        Print("템플릿 선택 (↑↓ 이동, Enter 선택, 타이핑 필터, Esc 완료, Ctrl+C 취소)\r\n\r\n"),
        ResetColor
    )?;

    execute!(stdout, Print(format!("   필터: {}\r\n", state.filter())))?;
    let selected_line = if state.selected().is_empty() {
        "(없음)".to_string()
    } else {
        state.selected().join(", ")
    };
    execute!(stdout, Print(format!("   선택됨: {}\r\n\r\n", selected_line)))?;

    let entries = state.entries();
    let cursor_at = state.cursor();
    let start = cursor_at
        .saturating_sub(VISIBLE_ROWS / 2)
        .min(entries.len().saturating_sub(VISIBLE_ROWS));
    let end = (start + VISIBLE_ROWS).min(entries.len());

    for (i, entry) in entries.iter().enumerate().take(end).skip(start) {
        if i == cursor_at {
            execute!(
                stdout,
                SetForegroundColor(Color::Green),
                Print(format!("   ▶ {}\r\n", entry)),
                ResetColor
            )?;
        } else {
            execute!(stdout, Print(format!("     {}\r\n", entry)))?;
        }
    }
    if end < entries.len() {
        execute!(
            stdout,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("     ... {} more\r\n", entries.len() - end)),
            ResetColor
        )?;
    }

    stdout.flush()?;
    Ok(())
}

// ============================================================================
// Selection State
// ============================================================================

/// Picker state, kept separate from the render loop
#[derive(Debug)]
pub struct SelectionState {
    available: Vec<String>,
    selected: Vec<String>,
    filter: String,
    cursor: usize,
}

impl SelectionState {
    pub fn new(available: Vec<String>) -> Self {
        Self {
            available,
            selected: Vec::new(),
            filter: String::new(),
            cursor: 0,
        }
    }

    /// Choices currently offered: the finish sentinel first, then the
    /// not-yet-selected names matching the filter
    pub fn entries(&self) -> Vec<String> {
        let filter = self.filter.to_lowercase();
        let mut entries = vec![DONE_CHOICE.to_string()];
        entries.extend(
            self.available
                .iter()
                .filter(|name| !self.selected.contains(name))
                .filter(|name| filter.is_empty() || name.to_lowercase().contains(&filter))
                .cloned(),
        );
        entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn into_selected(self) -> Vec<String> {
        self.selected
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.entries().len() {
            self.cursor += 1;
        }
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.clamp_cursor();
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.clamp_cursor();
    }

    /// Apply Enter on the cursor row. Returns true when the loop is done.
    pub fn pick(&mut self) -> bool {
        let entries = self.entries();
        let choice = entries[self.cursor].clone();
        if choice == DONE_CHOICE {
            return true;
        }

        self.add(&choice);
        self.filter.clear();
        self.cursor = 0;
        false
    }

    /// Adding an already-selected name is a no-op
    pub fn add(&mut self, name: &str) {
        if !self.selected.iter().any(|s| s == name) {
            self.selected.push(name.to_string());
        }
    }

    fn clamp_cursor(&mut self) {
        let max = self.entries().len() - 1;
        if self.cursor > max {
            self.cursor = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(names: &[&str]) -> SelectionState {
        SelectionState::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_done_choice_pinned_first() {
        let state = state_with(&["Node", "Python"]);
        let entries = state.entries();
        assert_eq!(entries[0], DONE_CHOICE);
        assert_eq!(entries[1..], ["Node", "Python"]);
    }

    #[test]
    fn test_offered_excludes_selected() {
        let mut state = state_with(&["Node", "Python"]);
        state.add("Python");
        assert!(!state.entries().contains(&"Python".to_string()));
        assert!(state.entries().contains(&"Node".to_string()));
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut state = state_with(&["Node", "Python"]);
        state.add("Python");
        state.add("Python");
        assert_eq!(state.selected(), ["Python"]);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut state = state_with(&["Node", "Python", "Rust"]);
        for c in "PY".chars() {
            state.push_filter(c);
        }
        let entries = state.entries();
        assert_eq!(entries, [DONE_CHOICE.to_string(), "Python".to_string()]);
    }

    #[test]
    fn test_pick_done_finishes() {
        let mut state = state_with(&["Node"]);
        assert!(state.pick());
        assert!(state.selected().is_empty());
    }

    #[test]
    fn test_pick_adds_and_resets_filter() {
        let mut state = state_with(&["Node", "Python"]);
        state.push_filter('n');
        state.move_down();
        assert!(!state.pick());
        assert_eq!(state.selected(), ["Node"]);
        assert_eq!(state.filter(), "");
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_cursor_clamps_when_filter_narrows() {
        let mut state = state_with(&["Node", "Python", "Rust"]);
        state.move_down();
        state.move_down();
        state.move_down();
        assert_eq!(state.cursor(), 3);

        for c in "rust".chars() {
            state.push_filter(c);
        }
        // Sentinel plus one match remain.
        assert_eq!(state.entries().len(), 2);
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_selection_preserves_pick_order() {
        let mut state = state_with(&["Node", "Python", "Rust"]);
        state.add("Rust");
        state.add("Node");
        assert_eq!(state.selected(), ["Rust", "Node"]);
    }
}
