//! Letter announcements and feedback tones
//!
//! The announcer speaks the round's letter with the Web Speech API. Speech is
//! fire-and-forget: if the browser has no synthesizer the game keeps going
//! visually. Tones are procedurally generated with Web Audio.

use crate::sim::Symbol;

/// Speaks the letter to find
pub trait Announcer {
    /// Start speaking, replacing anything still being spoken
    fn announce(&mut self, symbol: Symbol);
    /// Stop speaking (no-op if silent)
    fn cancel(&mut self);
    /// False when announcements are silently dropped
    fn is_available(&self) -> bool {
        true
    }
}

/// Utterance text for a letter.
///
/// A lone uppercase letter with a full stop is read as the letter name rather
/// than as a word ("A" vs "a").
pub fn spoken_text(symbol: Symbol) -> String {
    let upper: String = symbol.to_uppercase().collect();
    format!("{upper}.")
}

/// Announcer that only logs; used natively and when speech is unavailable
#[derive(Debug, Default)]
pub struct SilentAnnouncer {
    last: Option<Symbol>,
    speaking: bool,
}

impl SilentAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently announced letter
    pub fn last(&self) -> Option<Symbol> {
        self.last
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }
}

impl Announcer for SilentAnnouncer {
    fn announce(&mut self, symbol: Symbol) {
        log::info!("Announce: {}", spoken_text(symbol));
        self.last = Some(symbol);
        self.speaking = true;
    }

    fn cancel(&mut self) {
        self.speaking = false;
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Clicked the announced letter
    Correct,
    /// Clicked some other letter
    Incorrect,
    /// Game ended
    GameOver,
    /// Score placed on the leaderboard
    HighScore,
}

#[cfg(target_arch = "wasm32")]
pub use web::{AudioManager, SpeechAnnouncer};

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{
        AudioContext, GainNode, OscillatorNode, OscillatorType, SpeechSynthesis,
        SpeechSynthesisUtterance,
    };

    use super::{Announcer, SoundEffect, spoken_text};
    use crate::sim::Symbol;

    /// Web Speech announcer
    pub struct SpeechAnnouncer {
        synth: Option<SpeechSynthesis>,
        volume: f32,
        rate: f32,
    }

    impl Default for SpeechAnnouncer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl SpeechAnnouncer {
        pub fn new() -> Self {
            let synth = web_sys::window().and_then(|w| w.speech_synthesis().ok());
            if synth.is_none() {
                log::warn!("Speech synthesis unavailable - letters will not be spoken");
            }
            Self {
                synth,
                volume: 0.8,
                rate: 0.9,
            }
        }

        /// Set volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        /// Set speech rate (0.5 - 2.0)
        pub fn set_rate(&mut self, rate: f32) {
            self.rate = rate.clamp(0.5, 2.0);
        }
    }

    impl Announcer for SpeechAnnouncer {
        fn announce(&mut self, symbol: Symbol) {
            let Some(synth) = &self.synth else { return };
            if self.volume <= 0.0 {
                return;
            }

            synth.cancel();
            match SpeechSynthesisUtterance::new_with_text(&spoken_text(symbol)) {
                Ok(utterance) => {
                    utterance.set_volume(self.volume);
                    utterance.set_rate(self.rate);
                    synth.speak(&utterance);
                }
                Err(_) => log::warn!("Could not create utterance for '{symbol}'"),
            }
        }

        fn cancel(&mut self) {
            if let Some(synth) = &self.synth {
                synth.cancel();
            }
        }

        fn is_available(&self) -> bool {
            self.synth.is_some()
        }
    }

    /// Feedback tone player
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        enabled: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - tones disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                enabled: true,
            }
        }

        /// Set volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if !self.enabled || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = self.volume;
            match effect {
                SoundEffect::Correct => {
                    self.play_sequence(ctx, vol, &[660.0, 880.0], 0.08, OscillatorType::Triangle)
                }
                SoundEffect::Incorrect => self.play_buzz(ctx, vol),
                SoundEffect::GameOver => self.play_sequence(
                    ctx,
                    vol,
                    &[400.0, 350.0, 300.0, 200.0],
                    0.2,
                    OscillatorType::Sine,
                ),
                SoundEffect::HighScore => self.play_sequence(
                    ctx,
                    vol,
                    &[500.0, 600.0, 700.0, 800.0, 1000.0],
                    0.08,
                    OscillatorType::Triangle,
                ),
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short notes one after another
        fn play_sequence(
            &self,
            ctx: &AudioContext,
            vol: f32,
            freqs: &[f32],
            spacing: f64,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in freqs.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }

        /// Wrong letter - low falling buzz
        fn play_buzz(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }
    }
}
