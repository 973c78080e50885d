//! Player: drives scripted reveals in the terminal.
//!
//! Reveals a `Script` line by line in the terminal. The player owns the real
//! clock: it feeds elapsed wall time into a `ManualScheduler`, which fires the
//! engine's frame tasks, then paints whatever the surface now holds.

pub mod script;
pub mod surface;

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::config::PlayerConfig;
use crate::engine::RevealEngine;
use crate::host::{BufferSurface, ManualScheduler, SharedSurface};
use crate::menubar::print_menu;

use script::Script;
use surface::TerminalSurface;

/// Row the revealed text starts on; row 0 holds the menu bar.
const TEXT_ROW: u16 = 2;

/// Longest the event loop sleeps between frames.
const MAX_IDLE: Duration = Duration::from_millis(50);

pub struct Player {
    script: Script,
    config: PlayerConfig,
    engine: RevealEngine,
    scheduler: ManualScheduler,
    surface: Rc<RefCell<TerminalSurface>>,
    current_line: usize,
    /// When the current line finished revealing.
    finished_at: Option<Instant>,
}

impl Player {
    pub fn new(script: Script, config: PlayerConfig) -> Self {
        let surface = Rc::new(RefCell::new(TerminalSurface::new(
            TEXT_ROW,
            config.style.clone(),
        )));
        Self {
            script,
            config,
            engine: RevealEngine::new(),
            scheduler: ManualScheduler::new(),
            surface,
            current_line: 0,
            finished_at: None,
        }
    }

    /// Play the script in the terminal.
    ///
    /// Sets up the terminal, enters the event loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        if self.script.lines.is_empty() {
            bail!("Script has no lines");
        }
        let (_, term_h) = terminal::size()?;
        if term_h < TEXT_ROW + 2 {
            bail!("Terminal too small: need {} rows, have {}", TEXT_ROW + 2, term_h);
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.render_menubar(stdout)?;
        self.start_line(0);
        let mut last = Instant::now();

        loop {
            let timeout = self
                .scheduler
                .next_due_in()
                .unwrap_or(MAX_IDLE)
                .min(MAX_IDLE);

            if event::poll(timeout)? {
                match event::read()? {
                    event::Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                        use event::KeyCode::*;
                        match key.code {
                            Char('q') | Esc => break,
                            Char('r') => self.start_line(self.current_line),
                            Char(' ') | Enter => {
                                if self.current_line + 1 < self.script.lines.len() {
                                    self.start_line(self.current_line + 1);
                                }
                            }
                            _ => {}
                        }
                    }
                    event::Event::Resize(_, _) => {
                        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
                        self.render_menubar(stdout)?;
                        self.surface.borrow_mut().mark_dirty();
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            self.scheduler.advance(now - last);
            last = now;

            self.advance_script(now);

            if self.surface.borrow_mut().paint(stdout)? {
                self.render_status(stdout)?;
            }
            stdout.flush()?;
        }

        Ok(())
    }

    fn start_line(&mut self, index: usize) {
        self.current_line = index;
        self.finished_at = None;
        let cps = self
            .script
            .chars_per_second
            .unwrap_or(self.config.chars_per_second);
        let text = self.script.lines[index].text.clone();
        let surface: SharedSurface = self.surface.clone();
        self.engine
            .reveal_auto(&mut self.scheduler, surface, &text, cps);
    }

    /// Move on to the next line once the current one has finished and held.
    fn advance_script(&mut self, now: Instant) {
        if self.engine.is_active(&self.scheduler) {
            return;
        }
        let finished_at = *self.finished_at.get_or_insert(now);
        let hold = self.script.lines[self.current_line]
            .hold_ms
            .unwrap_or(self.config.hold_ms);
        let next = self.current_line + 1;
        if next < self.script.lines.len() && now - finished_at >= Duration::from_millis(hold) {
            self.start_line(next);
        }
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
        )?;
        print_menu(
            stdout,
            &[("Space", "next line"), ("r", "replay"), ("q", "quit")],
        )?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let (_, term_h) = terminal::size()?;
        let status_y = term_h.saturating_sub(1);

        let status = format!(
            " Line {}/{} ",
            self.current_line + 1,
            self.script.lines.len(),
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        Ok(())
    }
}

/// Reveal `raw` headlessly and collect every distinct frame it shows, in
/// order. Stops after `max_frames` scheduler steps even if still animating.
pub fn record_frames(
    engine: &mut RevealEngine,
    raw: &str,
    chars_per_second: f64,
    max_frames: usize,
) -> Vec<String> {
    let mut scheduler = ManualScheduler::new();
    let buffer = BufferSurface::shared();
    let surface: SharedSurface = buffer.clone();
    engine.reveal_auto(&mut scheduler, surface, raw, chars_per_second);

    let mut steps = 0;
    while let Some(dt) = scheduler.next_due_in() {
        if steps >= max_frames {
            tracing::warn!(max_frames, "frame cap reached, reveal cut short");
            engine.cancel(&mut scheduler);
            break;
        }
        scheduler.advance(dt);
        steps += 1;
    }

    let mut frames: Vec<String> = buffer.borrow().history().to_vec();
    frames.dedup();
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::strip_markup;

    #[test]
    fn records_score_reveal_until_final_text() {
        let mut engine = RevealEngine::with_seed(1);
        let frames = record_frames(&mut engine, "Score: {CRAZY}42{/CRAZY} pts", 30.0, 10_000);
        assert!(frames.len() > 2);
        assert_eq!(frames.last().map(String::as_str), Some("Score: 42 pts"));
        assert!(frames.iter().all(|f| f.starts_with("Score: ") && f.ends_with(" pts")));
    }

    #[test]
    fn records_typewriter_for_plain_text() {
        let mut engine = RevealEngine::with_seed(1);
        let frames = record_frames(&mut engine, "abc", 10.0, 100);
        assert_eq!(frames, vec!["", "a", "ab", "abc"]);
    }

    #[test]
    fn frame_cap_cuts_reveal_short() {
        let mut engine = RevealEngine::with_seed(1);
        let frames = record_frames(&mut engine, "{CRAZY cycles=10}ZZZZ{/CRAZY}", 30.0, 5);
        assert_eq!(frames.len(), 6);
        assert_ne!(strip_markup(frames.last().unwrap()), "ZZZZ");
    }
}
