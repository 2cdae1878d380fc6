//! Letter Hunt entry point
//!
//! Wires the round engine to the browser (DOM targets, speech, storage), or
//! runs a scripted headless game natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, MouseEvent};

    use letter_hunt::audio::{Announcer, AudioManager, SoundEffect, SpeechAnnouncer};
    use letter_hunt::highscores::{HighScores, MAX_HIGH_SCORES, ScoresStore};
    use letter_hunt::settings::Settings;
    use letter_hunt::sim::{Effect, Event, FeedbackState, GameState, Phase, dispatch};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        announcer: SpeechAnnouncer,
        audio: AudioManager,
        scores: HighScores,
        last_time: f64,
        /// Round number currently drawn in the play area (0 = none)
        drawn_round: u32,
        /// Final score waiting to be submitted
        unsaved_score: Option<u64>,
    }

    impl Game {
        fn new(settings: Settings, seed: u64, width: f32, height: f32) -> Self {
            let mut announcer = SpeechAnnouncer::new();
            announcer.set_volume(settings.effective_volume());
            announcer.set_rate(settings.speech_rate);
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());
            audio.set_enabled(settings.feedback_sounds);

            Self {
                state: GameState::with_viewport(settings.engine_config(), seed, width, height),
                settings,
                announcer,
                audio,
                scores: HighScores::load(),
                last_time: 0.0,
                drawn_round: 0,
                unsaved_score: None,
            }
        }

        /// Feed one event to the engine and carry out its effects
        fn handle(&mut self, event: Event) {
            for effect in dispatch(&mut self.state, event) {
                self.apply(effect);
            }
            self.render();
        }

        fn apply(&mut self, effect: Effect) {
            match effect {
                Effect::RoundStarted { number } => {
                    log::debug!("Round {number} ready");
                    set_text("status", "");
                }
                Effect::Announce(symbol) => self.announcer.announce(symbol),
                Effect::CancelAnnouncement => self.announcer.cancel(),
                Effect::Feedback { state, .. } => match state {
                    FeedbackState::Correct => self.audio.play(SoundEffect::Correct),
                    FeedbackState::Incorrect => self.audio.play(SoundEffect::Incorrect),
                    FeedbackState::None => {}
                },
                Effect::ScoreChanged(score) => set_text("hud-score", &score.to_string()),
                Effect::RoundCleared => {}
                Effect::GameOver { score, stats } => {
                    self.audio.play(SoundEffect::GameOver);
                    set_text("final-score", &score.to_string());
                    set_text(
                        "final-accuracy",
                        &format!("{:.0}%", stats.accuracy() * 100.0),
                    );
                    set_text("final-streak", &stats.best_streak.to_string());
                    self.unsaved_score = (score > 0).then_some(score);
                    set_hidden("game-over", false);
                    render_leaderboard(&self.scores);
                }
                Effect::RoundFailed(e) => {
                    log::warn!("{e}");
                    set_text("status", "Make the window a little bigger to keep playing");
                }
            }
        }

        fn submit_score(&mut self, name: &str) {
            let Some(score) = self.unsaved_score else { return };
            match self.scores.submit(name, score) {
                Ok(rank) => {
                    self.unsaved_score = None;
                    if rank.is_some() {
                        self.audio.play(SoundEffect::HighScore);
                    }
                    let message = match rank {
                        Some(rank) => format!("Saved! You placed #{rank}"),
                        None => format!("Saved! Top {MAX_HIGH_SCORES} not reached this time"),
                    };
                    set_text("submit-status", &message);
                    render_leaderboard(&self.scores);
                }
                Err(e) if e.is_retryable() => {
                    log::warn!("{e}");
                    set_text("submit-status", "Could not save your score - try again");
                }
                Err(e) => set_text("submit-status", &e.to_string()),
            }
        }

        /// Sync the play area with the current round
        fn render(&mut self) {
            let Some(document) = document() else { return };
            let Some(area) = document.get_element_by_id("play-area") else {
                return;
            };

            let round = self.state.round().filter(|r| !r.is_cleared());
            let number = round.map(|r| r.number).unwrap_or(0);
            if number != self.drawn_round {
                area.set_inner_html("");
                if let Some(round) = round {
                    let size = self.state.config().sizing.target_size;
                    for target in &round.targets {
                        if let Ok(el) = document.create_element("button") {
                            let _ = el.set_attribute("class", "target");
                            let _ = el.set_attribute("data-id", &target.id.to_string());
                            let _ = el.set_attribute(
                                "style",
                                &format!(
                                    "left:{}px;top:{}px;width:{size}px;height:{size}px",
                                    target.pos.x - size / 2.0,
                                    target.pos.y - size / 2.0,
                                ),
                            );
                            el.set_text_content(Some(&target.symbol.to_string()));
                            let _ = area.append_child(&el);
                        }
                    }
                }
                self.drawn_round = number;
            }

            if let Some(round) = round {
                for target in &round.targets {
                    let class = match target.feedback {
                        FeedbackState::None => "target",
                        FeedbackState::Correct => "target correct",
                        FeedbackState::Incorrect => "target incorrect",
                    };
                    let selector = format!("#play-area [data-id=\"{}\"]", target.id);
                    if let Some(el) = document.query_selector(&selector).ok().flatten() {
                        if el.get_attribute("class").as_deref() != Some(class) {
                            let _ = el.set_attribute("class", class);
                        }
                    }
                }
            }

            let phase = self.state.phase();
            set_hidden("start-btn", phase != Phase::Idle);
            set_hidden("new-round-btn", phase == Phase::Idle);
            set_hidden("replay-btn", phase == Phase::Idle);
            set_hidden("end-btn", phase == Phase::Idle);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = if hidden {
                el.class_list().add_1("hidden")
            } else {
                el.class_list().remove_1("hidden")
            };
        }
    }

    fn render_leaderboard(scores: &HighScores) {
        let Some(document) = document() else { return };
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return;
        };
        list.set_inner_html("");
        let entries = match scores.fetch_top(MAX_HIGH_SCORES) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("{e}");
                return;
            }
        };
        for entry in entries {
            if let Ok(li) = document.create_element("li") {
                // Names are user input: text content only
                li.set_text_content(Some(&format!("{} - {}", entry.name, entry.score)));
                let _ = list.append_child(&li);
            }
        }
    }

    fn viewport_size() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (0.0, 0.0);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Letter Hunt starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let (width, height) = viewport_size();
        let game = Rc::new(RefCell::new(Game::new(settings, seed, width, height)));
        log::info!("Game initialized with seed: {}", seed);

        setup_play_area(game.clone());
        setup_resize(game.clone());
        setup_buttons(game.clone());
        render_leaderboard(&game.borrow().scores);
        game.borrow_mut().render();

        request_animation_frame(game);

        log::info!("Letter Hunt running!");
    }

    /// One delegated listener for every target button
    fn setup_play_area(game: Rc<RefCell<Game>>) {
        let Some(area) = document().and_then(|d| d.get_element_by_id("play-area")) else {
            log::error!("#play-area missing");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let id = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("data-id"))
                .and_then(|id| id.parse::<u32>().ok());
            if let Some(target_id) = id {
                game.borrow_mut().handle(Event::Click { target_id });
            }
        });
        let _ = area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = viewport_size();
            game.borrow_mut().handle(Event::Resize { width, height });
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(id: &str, game: Rc<RefCell<Game>>, action: impl Fn(&mut Game) + 'static) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            action(&mut *game.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click("start-btn", game.clone(), |g| {
            set_hidden("game-over", true);
            g.handle(Event::NewGame);
            g.handle(Event::Start);
        });
        on_click("new-round-btn", game.clone(), |g| g.handle(Event::NewRound));
        on_click("replay-btn", game.clone(), |g| g.handle(Event::Replay));
        on_click("end-btn", game.clone(), |g| g.handle(Event::EndGame));
        on_click("mute-btn", game.clone(), |g| {
            g.settings.muted = !g.settings.muted;
            let vol = g.settings.effective_volume();
            g.announcer.set_volume(vol);
            g.audio.set_volume(vol);
            g.settings.save();
            log::info!("Muted: {}", g.settings.muted);
        });
        on_click("submit-score-btn", game, |g| {
            let name = document()
                .and_then(|d| d.get_element_by_id("player-name"))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            g.submit_score(&name);
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let dt_ms = if g.last_time > 0.0 { time - g.last_time } else { 0.0 };
            g.last_time = time;
            g.handle(Event::Advance { dt_ms });
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Letter Hunt (native) starting...");
    log::info!("Native mode plays a scripted game - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(7);
    if let Err(e) = headless::play(seed, 10) {
        log::error!("Demo stopped: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use letter_hunt::RoundError;
    use letter_hunt::audio::{Announcer, SilentAnnouncer};
    use letter_hunt::highscores::{HighScores, ScoresStore};
    use letter_hunt::settings::Settings;
    use letter_hunt::sim::{Effect, Event, GameState, Phase, dispatch};

    /// Frame length used to drive timers (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Chance the scripted player picks the right letter
    const ACCURACY: f64 = 0.8;
    /// Ten seconds of frames
    const MAX_WAIT_FRAMES: u32 = 600;

    /// Carry out effects; a failed round ends the scripted game after the
    /// remaining effects are applied
    fn apply(
        effects: Vec<Effect>,
        announcer: &mut SilentAnnouncer,
    ) -> Result<Option<u64>, RoundError> {
        let mut final_score = None;
        let mut failure = None;
        for effect in effects {
            match effect {
                Effect::Announce(symbol) => announcer.announce(symbol),
                Effect::CancelAnnouncement => announcer.cancel(),
                Effect::GameOver { score, .. } => final_score = Some(score),
                Effect::RoundFailed(err) => failure = Some(err),
                other => log::debug!("{other:?}"),
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(final_score),
        }
    }

    /// Advance frame by frame until `done` holds (or give up)
    fn run_frames(
        state: &mut GameState,
        announcer: &mut SilentAnnouncer,
        done: impl Fn(&GameState, &SilentAnnouncer) -> bool,
    ) -> Result<(), RoundError> {
        for _ in 0..MAX_WAIT_FRAMES {
            if done(state, announcer) {
                return Ok(());
            }
            apply(dispatch(state, Event::Advance { dt_ms: FRAME_MS }), announcer)?;
        }
        log::warn!("Gave up waiting after {MAX_WAIT_FRAMES} frames in {:?}", state.phase());
        Ok(())
    }

    /// Play `rounds` rounds with a scripted player, then submit the score
    pub fn play(seed: u64, rounds: u32) -> Result<(), RoundError> {
        let settings = Settings::load();
        let mut state = GameState::with_viewport(settings.engine_config(), seed, 1280.0, 800.0);
        let mut announcer = SilentAnnouncer::new();
        let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);

        apply(dispatch(&mut state, Event::Start), &mut announcer)?;

        for _ in 0..rounds {
            // Let the announcement play before answering
            run_frames(&mut state, &mut announcer, |_, a| a.is_speaking())?;

            let Some(round) = state.round() else { break };
            let Some(symbol) = round.target_symbol else { break };
            let wants_hit = player.random_bool(ACCURACY);
            let pick = round
                .targets
                .iter()
                .find(|t| (t.symbol == symbol) == wants_hit)
                .or_else(|| round.targets.first())
                .map(|t| t.id);
            let Some(target_id) = pick else { break };

            apply(dispatch(&mut state, Event::Click { target_id }), &mut announcer)?;
            announcer.cancel();
            run_frames(&mut state, &mut announcer, |s, _| s.phase() == Phase::Active)?;
        }

        let score = apply(dispatch(&mut state, Event::EndGame), &mut announcer)?.unwrap_or(0);
        let stats = state.stats();
        println!(
            "Seed {seed}: score {score}, {} hits / {} misses, best streak {}",
            stats.hits, stats.misses, stats.best_streak
        );

        let mut scores = HighScores::load();
        match scores.submit("headless", score) {
            Ok(Some(rank)) => println!("Leaderboard rank #{rank}"),
            Ok(None) => println!("Did not place on the leaderboard"),
            Err(e) => log::warn!("{e}"),
        }
        Ok(())
    }
}
