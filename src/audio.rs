//! Audio cues using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Audio is cosmetic: a missing `AudioContext` just means silence.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Card turned face up
    Flip,
    /// Pair matched
    Match,
    /// Pair did not match
    Mismatch,
    /// Board cleared
    Win,
    /// Board cleared with a new best score
    NewBest,
}

impl SoundEffect {
    /// Cue for a game event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::CardFlipped { .. } => SoundEffect::Flip,
            GameEvent::PairMatched { .. } => SoundEffect::Match,
            GameEvent::PairMismatched { .. } => SoundEffect::Mismatch,
            GameEvent::Won { .. } => SoundEffect::Win,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Flip => self.play_flip(ctx, vol),
                SoundEffect::Match => self.play_match(ctx, vol),
                SoundEffect::Mismatch => self.play_mismatch(ctx, vol),
                SoundEffect::Win => self.play_win(ctx, vol),
                SoundEffect::NewBest => self.play_new_best(ctx, vol),
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

        /// Play a rising or falling run of short notes
        fn play_run(
            &self,
            ctx: &AudioContext,
            vol: f32,
            notes: &[f32],
            spacing: f64,
            length: f64,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * spacing;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + length)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + length + 0.05).ok();
                }
            }
        }

        /// Flip - short papery tick
        fn play_flip(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.frequency().set_value_at_time(900.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(500.0, t + 0.06)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }

        /// Match - happy ding
        fn play_match(&self, ctx: &AudioContext, vol: f32) {
            self.play_run(ctx, vol, &[600.0, 900.0], 0.08, 0.15, OscillatorType::Sine);
        }

        /// Mismatch - low buzz
        fn play_mismatch(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(120.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Win - triumphant fanfare
        fn play_win(&self, ctx: &AudioContext, vol: f32) {
            self.play_run(
                ctx,
                vol,
                &[400.0, 500.0, 600.0, 800.0],
                0.1,
                0.4,
                OscillatorType::Triangle,
            );
        }

        /// New best - celebratory
        fn play_new_best(&self, ctx: &AudioContext, vol: f32) {
            self.play_run(
                ctx,
                vol,
                &[500.0, 600.0, 700.0, 800.0, 1000.0],
                0.08,
                0.25,
                OscillatorType::Triangle,
            );
        }
    }
}
