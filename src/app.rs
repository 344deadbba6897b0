use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ContentError;
use crate::event::AppEvent;
use crate::generator::{self, ContentSource, FixedText, PassageSource};
use crate::keyboard::model::{
    ENTER_CODE, KeyboardModel, SHIFT_LEFT_CODE, SHIFT_RIGHT_CODE, TAB_CODE,
};
use crate::session::input::{Key, Step};
use crate::session::passage::Passage;
use crate::session::result::SessionResult;
use crate::session::typing::TypingSession;
use crate::share::{self, SharedResult};
use crate::store::progress::ProgressStore;
use crate::store::schema::{OverallStats, PassageStats};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Typing,
    Result,
    History,
    ConfirmClear,
    Shared,
}

pub struct App {
    pub screen: AppScreen,
    pub session: TypingSession,
    pub keyboard: KeyboardModel,
    pub config: Config,
    pub theme: &'static Theme,
    pub source: ContentSource,
    /// Text from `--file`; overrides `source` while set.
    pub fixed_text: Option<String>,
    pub last_result: Option<SessionResult>,
    pub share_link: Option<String>,
    /// Bests for the passage just finished, including that attempt.
    pub passage_best: Option<PassageStats>,
    pub shared: Option<SharedResult>,
    pub history: Vec<SessionResult>,
    pub overall: OverallStats,
    pub status: Option<String>,
    pub loading: bool,
    pub last_step_error: bool,
    pub should_quit: bool,
    store: ProgressStore,
    tx: mpsc::Sender<AppEvent>,
    request: u64,
    previous_screen: AppScreen,
}

impl App {
    pub fn new(config: Config, store: ProgressStore, tx: mpsc::Sender<AppEvent>) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(theme));
        Self {
            screen: AppScreen::Typing,
            session: TypingSession::new(Passage::default()),
            keyboard: config.keyboard(),
            source: config.source,
            config,
            theme,
            fixed_text: None,
            last_result: None,
            share_link: None,
            passage_best: None,
            shared: None,
            history: Vec::new(),
            overall: OverallStats::default(),
            status: None,
            loading: false,
            last_step_error: false,
            should_quit: false,
            store,
            tx,
            request: 0,
            previous_screen: AppScreen::Typing,
        }
    }

    pub fn store_mut(&mut self) -> &mut ProgressStore {
        &mut self.store
    }

    /// Start loading the next passage. Remote sources fetch on a background
    /// thread and report back with [`AppEvent::PassageLoaded`]; the current
    /// session stays on screen, disarmed, until then.
    pub fn request_passage(&mut self) {
        self.request += 1;
        let request = self.request;
        let mut source: Box<dyn PassageSource + Send> = match &self.fixed_text {
            Some(text) => Box::new(FixedText(text.clone())),
            None => generator::source_for(self.source, &self.config),
        };

        if self.fixed_text.is_none() && self.source.is_remote() {
            self.session.disarm();
            self.loading = true;
            self.status = Some(format!("Loading {}...", self.source.label()));
            let tx = self.tx.clone();
            thread::spawn(move || {
                let result = source.fetch();
                let _ = tx.send(AppEvent::PassageLoaded { request, result });
            });
        } else {
            let result = source.fetch();
            self.on_passage_loaded(request, result);
        }
    }

    /// Swap in a freshly fetched passage. The whole session is replaced in
    /// one assignment; a failed or stale fetch leaves it untouched.
    pub fn on_passage_loaded(&mut self, request: u64, result: Result<String, ContentError>) {
        if request != self.request {
            debug!(request, current = self.request, "discarding stale passage");
            return;
        }
        self.loading = false;
        let passage = result.and_then(|text| {
            let passage = Passage::build(&text);
            if passage.is_empty() {
                Err(ContentError::Empty)
            } else {
                Ok(passage)
            }
        });
        match passage {
            Ok(passage) => {
                debug!(passage = passage.id(), targets = passage.len(), "passage loaded");
                self.session = TypingSession::new(passage);
                self.screen = AppScreen::Typing;
                self.status = None;
                self.last_step_error = false;
            }
            Err(e) => {
                warn!(error = %e, source = ?self.source, "passage fetch failed");
                self.status = Some(format!("Could not load passage: {e}"));
                self.session.arm();
            }
        }
    }

    pub fn type_key(&mut self, code: &str, key: Key) {
        if self.screen != AppScreen::Typing {
            return;
        }
        let step = self.session.handle_keystroke(&self.keyboard, code, key);
        if let Step::Typed(typed) = step {
            self.last_step_error = !typed.correct;
            if typed.finished {
                self.finish_session();
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.screen == AppScreen::Typing && self.session.handle_backspace() {
            self.last_step_error = false;
        }
    }

    fn finish_session(&mut self) {
        let result = SessionResult::from_session(&self.session, Utc::now());
        self.passage_best = None;
        if self.config.tracking_enabled && !self.session.passage().is_empty() {
            match self.store.save_result(result.clone()) {
                Ok(record) => {
                    self.passage_best = record.per_passage_stats.get(&result.passage_id).cloned();
                }
                Err(e) => {
                    warn!(error = %e, "failed to save result");
                    self.status = Some(format!("Could not save result: {e}"));
                }
            }
        }
        let token = share::encode(
            result.score,
            result.wpm,
            result.accuracy,
            result.timestamp.timestamp_millis(),
        );
        self.share_link = Some(share::share_url(&self.config.share_base_url, &token));
        info!(wpm = result.wpm, accuracy = result.accuracy, score = result.score, "session complete");
        self.last_result = Some(result);
        self.screen = AppScreen::Result;
    }

    /// Abandon the current attempt and type the same passage again.
    pub fn restart(&mut self) {
        self.session.restart();
        self.last_step_error = false;
        self.screen = AppScreen::Typing;
    }

    pub fn cycle_source(&mut self) {
        self.fixed_text = None;
        self.source = self.source.next();
        self.request_passage();
    }

    pub fn go_to_history(&mut self) {
        let limit = self.config.history_limit;
        let loaded = self
            .store
            .get_progress()
            .and_then(|record| Ok((record.overall_stats, self.store.recent_history(limit)?)));
        match loaded {
            Ok((overall, history)) => {
                self.overall = overall;
                self.history = history;
            }
            Err(e) => {
                warn!(error = %e, "failed to load progress");
                self.status = Some(format!("Could not load history: {e}"));
            }
        }
        if self.screen != AppScreen::History && self.screen != AppScreen::ConfirmClear {
            self.previous_screen = self.screen;
        }
        self.screen = AppScreen::History;
    }

    pub fn leave_history(&mut self) {
        self.screen = self.previous_screen;
    }

    pub fn request_clear(&mut self) {
        self.screen = AppScreen::ConfirmClear;
    }

    pub fn confirm_clear(&mut self) {
        if let Err(e) = self.store.clear_progress() {
            warn!(error = %e, "failed to clear progress");
            self.status = Some(format!("Could not clear history: {e}"));
        }
        self.go_to_history();
    }

    pub fn cancel_clear(&mut self) {
        self.screen = AppScreen::History;
    }

    /// Show a result decoded from a share link. A bad link only sets a status line.
    pub fn show_shared(&mut self, url_or_token: &str) {
        let decoded = share::token_from_url(url_or_token)
            .ok_or(crate::error::ShareError::MissingSeparator)
            .and_then(share::decode);
        match decoded {
            Ok(shared) => {
                self.shared = Some(shared);
                self.previous_screen = self.screen;
                self.screen = AppScreen::Shared;
            }
            Err(e) => {
                warn!(error = %e, "ignoring invalid shared result");
                self.status = Some("Shared result link is invalid".to_string());
            }
        }
    }

    pub fn close_shared(&mut self) {
        self.screen = AppScreen::Typing;
    }

    pub fn live_wpm(&self) -> Option<u32> {
        self.session.live_wpm(Instant::now())
    }
}

/// Physical code and logical key for a terminal key event, if it is typing input.
pub fn translate_key(model: &KeyboardModel, key: &KeyEvent) -> Option<(&'static str, Key)> {
    match key.code {
        KeyCode::Char(ch) => {
            // Kitty-protocol terminals may report a shifted key as its base
            // character plus SHIFT.
            let ch = if key.modifiers.contains(KeyModifiers::SHIFT) {
                model.shifted_for(ch).unwrap_or(ch)
            } else {
                ch
            };
            Some((model.input_code_for(ch), Key::Char(ch)))
        }
        KeyCode::Enter => Some((ENTER_CODE, Key::Enter)),
        KeyCode::Tab => Some((TAB_CODE, Key::Char('\t'))),
        KeyCode::Modifier(ModifierKeyCode::LeftShift) => Some((SHIFT_LEFT_CODE, Key::Shift)),
        KeyCode::Modifier(ModifierKeyCode::RightShift) => Some((SHIFT_RIGHT_CODE, Key::Shift)),
        _ => None,
    }
}
