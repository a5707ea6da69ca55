//! The vinyl player: gestures and the host button driving the deck.
//!
//! Every method is a synchronous event handler. The web layer calls
//! them from DOM / Telegram callbacks; tests call them directly.

use crate::backend::AudioBackend;
use crate::chrome::{self, Host, ImpactStyle, NotificationType, Surface};
use crate::config::PlayerConfig;
use crate::deck::{Deck, PlaybackState};
use crate::error::{LoadError, VinylError};
use crate::gesture::{self, GestureTracker, Point, ScratchMotion};

pub struct VinylPlayer<B: AudioBackend, H: Host, S: Surface> {
    deck: Deck<B>,
    host: H,
    surface: S,
    tracker: GestureTracker,
    config: PlayerConfig,
}

impl<B: AudioBackend, H: Host, S: Surface> VinylPlayer<B, H, S> {
    /// Build the player and put the host chrome in its initial state:
    /// viewport expanded, "Play" button shown, disk sized and paused.
    pub fn new(backend: B, host: H, surface: S, config: PlayerConfig) -> Result<Self, VinylError> {
        config.validate()?;
        let deck = Deck::new(backend, &config)?;
        let mut player = VinylPlayer {
            deck,
            host,
            surface,
            tracker: GestureTracker::new(),
            config,
        };

        player.surface.set_disk_paused(true);
        player.viewport_changed();
        player.host.expand()?;
        player.host.set_button_label(chrome::PLAY_LABEL)?;
        player.host.show_button()?;
        player.theme_changed()?;
        Ok(player)
    }

    pub fn deck(&self) -> &Deck<B> {
        &self.deck
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub fn playback(&self) -> PlaybackState {
        self.deck.playback()
    }

    pub fn asset_loaded(&mut self, buffer: B::Buffer) {
        self.deck.install(buffer);
        log::info!("track ready: {}", self.config.asset_url);
    }

    /// The load is not retried; play requests stay no-ops afterwards.
    pub fn asset_failed(&mut self, error: &LoadError) {
        log::error!("Error loading audio from {}: {error}", self.config.asset_url);
    }

    /// Host button click. The deck and the disk are updated before the
    /// host chrome, so a throwing host call leaves them consistent.
    pub fn toggle(&mut self) -> Result<PlaybackState, VinylError> {
        let (label, feedback) = match self.deck.playback() {
            PlaybackState::Stopped => {
                if self.deck.play()? {
                    (Some(chrome::STOP_LABEL), NotificationType::Success)
                } else {
                    (None, NotificationType::Error)
                }
            }
            PlaybackState::Playing => {
                self.deck.stop()?;
                (Some(chrome::PLAY_LABEL), NotificationType::Success)
            }
        };
        self.sync_paused();

        if let Some(label) = label {
            self.host.set_button_label(label)?;
        }
        self.host.notify(feedback)?;
        Ok(self.deck.playback())
    }

    pub fn touch_start(&mut self, point: Point) -> Result<(), VinylError> {
        let angle = gesture::angle_around(self.surface.disk_center(), point);
        self.tracker.begin(angle);
        self.deck.scratch_begin()?;
        self.surface.set_disk_paused(true);
        self.host.impact(ImpactStyle::Medium)
    }

    /// Returns the motion applied, or `None` outside a gesture.
    pub fn touch_move(&mut self, point: Point) -> Result<Option<ScratchMotion>, VinylError> {
        if !self.tracker.is_active() {
            return Ok(None);
        }
        let angle = gesture::angle_around(self.surface.disk_center(), point);
        let Some(motion) = self.tracker.update(angle) else {
            return Ok(None);
        };

        self.deck.scratch(motion.delta);
        self.surface
            .rotate_disk(Some(gesture::to_degrees(motion.angle)));
        if motion.delta.abs() > self.config.haptic_threshold {
            self.host.impact(ImpactStyle::Light)?;
        }
        Ok(Some(motion))
    }

    /// Touch released anywhere in the document. Ignored outside a gesture.
    pub fn touch_end(&mut self) -> Result<(), VinylError> {
        if !self.tracker.end() {
            return Ok(());
        }
        self.deck.scratch_end()?;
        self.surface.rotate_disk(None);
        self.sync_paused();
        self.host.notify(NotificationType::Success)
    }

    pub fn theme_changed(&mut self) -> Result<(), VinylError> {
        let theme = self.host.theme()?;
        self.surface.apply_theme(&theme);
        Ok(())
    }

    /// Resize the disk for the current viewport. Returns the new edge length.
    pub fn viewport_changed(&mut self) -> f64 {
        let size = chrome::disk_size(
            self.surface.viewport_width(),
            self.config.disk_viewport_fraction,
            self.config.max_disk_size,
        );
        self.surface.set_disk_size(size);
        size
    }

    // The disk spins only while the record plays and no finger holds it.
    fn sync_paused(&mut self) {
        let paused = !self.deck.is_playing() || self.tracker.is_active();
        self.surface.set_disk_paused(paused);
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::sync::Arc;

    use super::*;
    use crate::chrome::Theme;
    use crate::deck::DeckState;
    use crate::dsp::{OfflineGraph, SampleBuffer};

    #[derive(Debug, Default)]
    struct FakeHost {
        expanded: bool,
        shown: bool,
        label: String,
        impacts: Vec<ImpactStyle>,
        notifications: Vec<NotificationType>,
        theme: Theme,
        /// Haptic calls throw, as they do on clients without the API.
        haptics_throw: bool,
    }

    impl FakeHost {
        fn haptics(&self) -> Result<(), VinylError> {
            if self.haptics_throw {
                return Err(VinylError::Host("HapticFeedback is not supported".to_string()));
            }
            Ok(())
        }
    }

    impl Host for FakeHost {
        fn expand(&mut self) -> Result<(), VinylError> {
            self.expanded = true;
            Ok(())
        }

        fn set_button_label(&mut self, label: &str) -> Result<(), VinylError> {
            self.label = label.to_string();
            Ok(())
        }

        fn show_button(&mut self) -> Result<(), VinylError> {
            self.shown = true;
            Ok(())
        }

        fn impact(&mut self, style: ImpactStyle) -> Result<(), VinylError> {
            self.haptics()?;
            self.impacts.push(style);
            Ok(())
        }

        fn notify(&mut self, kind: NotificationType) -> Result<(), VinylError> {
            self.haptics()?;
            self.notifications.push(kind);
            Ok(())
        }

        fn theme(&self) -> Result<Theme, VinylError> {
            Ok(self.theme.clone())
        }
    }

    #[derive(Debug)]
    struct FakeSurface {
        center: Point,
        rotation: Option<f64>,
        paused: bool,
        size: f64,
        viewport: f64,
        theme: Theme,
    }

    impl Default for FakeSurface {
        fn default() -> Self {
            FakeSurface {
                center: Point::new(200.0, 200.0),
                rotation: None,
                paused: false,
                size: 0.0,
                viewport: 400.0,
                theme: Theme::default(),
            }
        }
    }

    impl Surface for FakeSurface {
        fn disk_center(&self) -> Point {
            self.center
        }

        fn rotate_disk(&mut self, degrees: Option<f64>) {
            self.rotation = degrees;
        }

        fn set_disk_paused(&mut self, paused: bool) {
            self.paused = paused;
        }

        fn set_disk_size(&mut self, px: f64) {
            self.size = px;
        }

        fn viewport_width(&self) -> f64 {
            self.viewport
        }

        fn apply_theme(&mut self, theme: &Theme) {
            self.theme = theme.clone();
        }
    }

    type TestPlayer = VinylPlayer<OfflineGraph, FakeHost, FakeSurface>;

    fn track() -> Arc<SampleBuffer> {
        let data = (0..800)
            .map(|i| (2.0 * PI * 200.0 * i as f64 / 8000.0).sin())
            .collect();
        Arc::new(SampleBuffer::new(data, 8000))
    }

    fn player() -> TestPlayer {
        VinylPlayer::new(
            OfflineGraph::new(8000.0),
            FakeHost::default(),
            FakeSurface::default(),
            PlayerConfig::default(),
        )
        .unwrap()
    }

    fn loaded_player() -> TestPlayer {
        let mut p = player();
        p.asset_loaded(track());
        p
    }

    /// A point on a circle of radius 100 around the fake disk center.
    fn at(angle: f64) -> Point {
        Point::new(200.0 + 100.0 * angle.cos(), 200.0 + 100.0 * angle.sin())
    }

    #[test]
    fn construction_sets_up_the_host() {
        let p = player();
        assert!(p.host().expanded);
        assert!(p.host().shown);
        assert_eq!(p.host().label, "Play");
        assert!(p.surface().paused);
        assert!((p.surface().size - 360.0).abs() < 1e-9);
        assert_eq!(p.deck().state(), DeckState::Idle);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PlayerConfig {
            max_disk_size: -5.0,
            ..PlayerConfig::default()
        };
        let result = VinylPlayer::new(
            OfflineGraph::new(8000.0),
            FakeHost::default(),
            FakeSurface::default(),
            config,
        );
        assert!(matches!(result, Err(VinylError::Config(_))));
    }

    #[test]
    fn toggle_sequence_has_no_drift() {
        let mut p = loaded_player();

        assert_eq!(p.toggle().unwrap(), PlaybackState::Playing);
        assert_eq!(p.host().label, "Stop");
        assert!(!p.surface().paused);
        let first_sources = p.deck().backend().audible_sources();

        assert_eq!(p.toggle().unwrap(), PlaybackState::Stopped);
        assert_eq!(p.host().label, "Play");
        assert!(p.surface().paused);
        assert_eq!(p.deck().backend().audible_sources(), 0);

        assert_eq!(p.toggle().unwrap(), PlaybackState::Playing);
        assert_eq!(p.host().label, "Stop");
        assert!(!p.surface().paused);
        assert_eq!(p.deck().backend().audible_sources(), first_sources);

        assert_eq!(
            p.host().notifications,
            vec![NotificationType::Success; 3]
        );
    }

    #[test]
    fn load_failure_keeps_toggles_harmless() {
        let mut p = player();
        p.asset_failed(&LoadError::Status {
            url: "/audio/track.mp3".to_string(),
            status: 404,
        });

        for _ in 0..3 {
            assert_eq!(p.toggle().unwrap(), PlaybackState::Stopped);
            assert_eq!(p.host().label, "Play");
        }
        assert_eq!(p.deck().state(), DeckState::Idle);
        assert_eq!(p.host().notifications, vec![NotificationType::Error; 3]);
        assert_eq!(p.deck().backend().source_count(), 0);
    }

    #[test]
    fn touch_start_grabs_the_record() {
        let mut p = loaded_player();
        p.toggle().unwrap();
        p.touch_start(at(0.5)).unwrap();

        assert!(p.tracker().is_active());
        assert!((p.tracker().state().previous_angle - 0.5).abs() < 1e-9);
        assert_eq!(p.host().impacts, vec![ImpactStyle::Medium]);
        assert!(p.surface().paused);

        let src = *p.deck().source().unwrap();
        assert_eq!(p.deck().backend().playback_rate(src), 0.0);
    }

    #[test]
    fn touch_move_scratches_and_rotates() {
        let mut p = loaded_player();
        p.toggle().unwrap();
        p.touch_start(at(0.0)).unwrap();

        let motion = p.touch_move(at(0.3)).unwrap().unwrap();
        assert!((motion.delta - 0.3).abs() < 1e-9);

        let src = *p.deck().source().unwrap();
        let bp = *p.deck().scratch_filter();
        let g = p.deck().backend();
        assert!((g.playback_rate(src) - 3.0).abs() < 1e-9);
        assert!((g.filter_frequency(bp) - 1600.0).abs() < 1e-6);

        let rotation = p.surface().rotation.unwrap();
        assert!((rotation - 0.3 * 180.0 / PI).abs() < 1e-6);
        assert_eq!(p.host().impacts.last(), Some(&ImpactStyle::Light));
    }

    #[test]
    fn small_moves_do_not_buzz() {
        let mut p = loaded_player();
        p.touch_start(at(0.0)).unwrap();
        p.touch_move(at(0.05)).unwrap().unwrap();
        assert_eq!(p.host().impacts, vec![ImpactStyle::Medium]);
    }

    #[test]
    fn scratching_across_the_seam_is_a_small_step() {
        let mut p = loaded_player();
        p.toggle().unwrap();
        p.touch_start(at(PI - 0.02)).unwrap();
        let motion = p.touch_move(at(-PI + 0.02)).unwrap().unwrap();
        assert!((motion.delta - 0.04).abs() < 1e-6, "delta {}", motion.delta);
    }

    #[test]
    fn gesture_end_resets_rate_and_filter() {
        let mut p = loaded_player();
        p.toggle().unwrap();
        p.touch_start(at(0.0)).unwrap();
        for angle in [0.4, 1.5, -2.8, 3.0, -0.1, 0.2] {
            p.touch_move(at(angle)).unwrap();
        }
        p.touch_end().unwrap();

        let src = *p.deck().source().unwrap();
        let bp = *p.deck().scratch_filter();
        let g = p.deck().backend();
        assert_eq!(g.playback_rate(src), 1.0);
        assert_eq!(g.filter_frequency(bp), 1000.0);
        assert_eq!(g.route_of(src), p.deck().lowpass().copied());
        assert_eq!(p.surface().rotation, None);
        assert!(!p.surface().paused);
        assert_eq!(p.host().notifications.last(), Some(&NotificationType::Success));
    }

    #[test]
    fn gesture_without_playback_only_moves_visuals() {
        let mut p = loaded_player();
        p.touch_start(at(0.0)).unwrap();
        p.touch_move(at(1.0)).unwrap().unwrap();
        assert!(p.surface().rotation.is_some());
        assert_eq!(p.deck().backend().source_count(), 0);

        p.touch_end().unwrap();
        assert!(p.surface().paused);
        assert_eq!(p.deck().state(), DeckState::Loaded);
    }

    #[test]
    fn stray_touch_events_are_ignored() {
        let mut p = loaded_player();
        assert!(p.touch_move(at(1.0)).unwrap().is_none());
        p.touch_end().unwrap();
        assert!(p.host().notifications.is_empty());
        assert!(p.host().impacts.is_empty());
        assert_eq!(p.surface().rotation, None);
    }

    #[test]
    fn theme_change_copies_host_colors() {
        let mut p = player();
        p.host.theme = Theme {
            background: Some("#101010".to_string()),
            foreground: Some("#fafafa".to_string()),
        };
        p.theme_changed().unwrap();
        assert_eq!(p.surface().theme.background.as_deref(), Some("#101010"));
        assert_eq!(p.surface().theme.foreground.as_deref(), Some("#fafafa"));
    }

    #[test]
    fn viewport_change_caps_the_disk() {
        let mut p = player();
        p.surface.viewport = 1200.0;
        assert_eq!(p.viewport_changed(), 600.0);
        assert_eq!(p.surface().size, 600.0);

        p.surface.viewport = 320.0;
        assert!((p.viewport_changed() - 288.0).abs() < 1e-9);
    }

    #[test]
    fn move_of_exactly_the_threshold_does_not_buzz() {
        // Same arithmetic the handler performs, so the delta is bit-exact.
        let center = FakeSurface::default().center;
        let from = gesture::angle_around(center, at(0.0));
        let to = gesture::angle_around(center, at(0.1));
        let delta = gesture::wrap_angle(to - from);

        let config = PlayerConfig {
            haptic_threshold: delta.abs(),
            ..PlayerConfig::default()
        };
        let mut p = VinylPlayer::new(
            OfflineGraph::new(8000.0),
            FakeHost::default(),
            FakeSurface::default(),
            config,
        )
        .unwrap();
        p.touch_start(at(0.0)).unwrap();
        let motion = p.touch_move(at(0.1)).unwrap().unwrap();

        assert_eq!(motion.delta.abs(), p.config.haptic_threshold);
        assert_eq!(p.host().impacts, vec![ImpactStyle::Medium]);
    }

    #[test]
    fn throwing_haptics_surface_as_host_errors() {
        let mut p = loaded_player();
        p.host.haptics_throw = true;

        let err = p.toggle().unwrap_err();
        assert!(matches!(err, VinylError::Host(_)));
        // The deck, the disk and the label moved on before the haptic call.
        assert_eq!(p.playback(), PlaybackState::Playing);
        assert_eq!(p.host().label, "Stop");
        assert!(!p.surface().paused);

        assert!(p.touch_start(at(0.0)).is_err());
        assert!(p.tracker().is_active());
        assert!(p.touch_move(at(0.5)).is_err());
        assert!(p.touch_end().is_err());
        let src = *p.deck().source().unwrap();
        assert_eq!(p.deck().backend().playback_rate(src), 1.0);

        p.host.haptics_throw = false;
        assert_eq!(p.toggle().unwrap(), PlaybackState::Stopped);
        assert_eq!(p.host().label, "Play");
        assert_eq!(p.host().notifications, vec![NotificationType::Success]);
    }
}
