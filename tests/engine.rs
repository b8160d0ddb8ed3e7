mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_pwm_dimmer::color::hsv2rgb_rainbow;
    use myrtio_pwm_dimmer::{
        ColorChannel, Command, Dimmer, DimmerConfig, EffectMode, EffectPhase, Feedback,
        GammaTable, Hsv, OutputDriver, RgbPercent,
    };

    #[derive(Default)]
    struct RecordingDriver {
        duty: [u16; 5],
        writes: usize,
    }

    impl OutputDriver for RecordingDriver {
        fn set_channel(&mut self, channel: ColorChannel, duty: u16) {
            self.duty[channel.index()] = duty;
            self.writes += 1;
        }
    }

    fn dimmer() -> Dimmer<RecordingDriver> {
        Dimmer::new(RecordingDriver::default(), &DimmerConfig::default())
    }

    fn command(property: &str, value: &str) -> Command {
        Command::parse_write(property, value).unwrap()
    }

    /// Tick `count` times, spaced `step_ms` apart, collecting feedback
    fn run_ticks(
        dimmer: &mut Dimmer<RecordingDriver>,
        start_ms: u64,
        step_ms: u64,
        count: u64,
    ) -> Vec<(u64, Feedback)> {
        let mut feedback = Vec::new();
        for i in 0..count {
            if let Some(reply) = dimmer.tick(Instant::from_millis(start_ms + i * step_ms)) {
                feedback.push((i, reply));
            }
        }
        feedback
    }

    #[test]
    fn test_boot_defaults() {
        let dimmer = dimmer();
        let idle = GammaTable::PWM_1024.correct(60);

        assert_eq!(dimmer.mode(), EffectMode::Fade);
        assert_eq!(dimmer.phase(), EffectPhase::Done);
        assert_eq!(dimmer.timing().transition(), Duration::from_millis(5000));
        for channel in ColorChannel::ALL {
            assert_eq!(dimmer.current()[channel], 60);
            assert_eq!(dimmer.target()[channel], 60);
        }
        assert_eq!(dimmer.driver().duty, [idle; 5]);
        assert_eq!(dimmer.driver().writes, 5);
        assert!(
            dimmer
                .current()
                .iter()
                .map(|(channel, _)| channel)
                .eq(ColorChannel::ALL)
        );
    }

    #[test]
    fn test_rgb_fade_reaches_target_in_400_ticks() {
        let mut dimmer = dimmer();
        assert!(dimmer.handle(command("rgb", "50,0,0")).is_empty());
        assert_eq!(dimmer.phase(), EffectPhase::StartFade);

        let feedback = run_ticks(&mut dimmer, 0, 13, 400);

        assert_eq!(
            feedback,
            vec![(399, Feedback::Rgb(RgbPercent::new(50, 0, 0)))]
        );
        assert_eq!(dimmer.phase(), EffectPhase::Done);
        assert_eq!(dimmer.current().rgb(), RgbPercent::new(50, 0, 0));
        assert_eq!(dimmer.current()[ColorChannel::White1], 60);
        assert_eq!(dimmer.current()[ColorChannel::White2], 60);

        let gamma = GammaTable::PWM_1024;
        assert_eq!(
            dimmer.driver().duty,
            [
                gamma.correct(50),
                0,
                0,
                gamma.correct(60),
                gamma.correct(60)
            ]
        );
    }

    #[test]
    fn test_fade_is_throttled() {
        let mut dimmer = dimmer();
        dimmer.handle(command("rgb", "0,0,0"));

        // Polling faster than the 12ms wait only executes every other poll
        run_ticks(&mut dimmer, 0, 7, 100);
        assert_eq!(dimmer.crossfade().tick_index(), 50);
        assert_eq!(dimmer.phase(), EffectPhase::DoFade);
    }

    #[test]
    fn test_new_color_supersedes_running_fade() {
        let mut dimmer = dimmer();
        dimmer.handle(command("rgb", "0,0,0"));
        run_ticks(&mut dimmer, 0, 13, 200);
        let halfway = dimmer.current().rgb();
        assert!(halfway.r < 60 && halfway.r > 0);

        assert!(dimmer.handle(command("rgb", "100,100,100")).is_empty());
        assert_eq!(dimmer.phase(), EffectPhase::StartFade);

        let feedback = run_ticks(&mut dimmer, 10_000, 13, 400);
        assert_eq!(
            feedback,
            vec![(399, Feedback::Rgb(RgbPercent::new(100, 100, 100)))]
        );
    }

    #[test]
    fn test_single_color_channel_refades() {
        let mut dimmer = dimmer();
        assert!(dimmer.handle(command("green", "10")).is_empty());
        assert_eq!(dimmer.target().rgb(), RgbPercent::new(60, 10, 60));

        let feedback = run_ticks(&mut dimmer, 0, 13, 400);
        assert_eq!(
            feedback,
            vec![(399, Feedback::Rgb(RgbPercent::new(60, 10, 60)))]
        );
    }

    #[test]
    fn test_white_channels_are_set_directly() {
        let mut dimmer = dimmer();
        assert_eq!(
            dimmer.handle(command("white1", "30")).as_slice(),
            [Feedback::Level(ColorChannel::White1, 30)]
        );
        assert_eq!(dimmer.current()[ColorChannel::White1], 30);
        assert_eq!(dimmer.phase(), EffectPhase::Done);
        assert_eq!(
            dimmer.driver().duty[ColorChannel::White1.index()],
            GammaTable::PWM_1024.correct(30)
        );
    }

    #[test]
    fn test_mode_none_applies_immediately() {
        let mut dimmer = dimmer();
        assert_eq!(
            dimmer.handle(command("effect", "none")).as_slice(),
            [
                Feedback::Mode(EffectMode::None),
                Feedback::Rgb(RgbPercent::new(60, 60, 60))
            ]
        );
        assert_eq!(
            dimmer.handle(command("hsv", "0,100,100")).as_slice(),
            [Feedback::Rgb(RgbPercent::new(100, 0, 0))]
        );
        assert_eq!(dimmer.current().rgb(), RgbPercent::new(100, 0, 0));
        assert_eq!(dimmer.phase(), EffectPhase::Done);
        assert_eq!(dimmer.driver().duty[0], 1024);
        assert_eq!(dimmer.tick(Instant::from_millis(0)), None);
    }

    #[test]
    fn test_mode_none_cancels_running_fade() {
        let mut dimmer = dimmer();
        dimmer.handle(command("rgb", "0,0,0"));
        run_ticks(&mut dimmer, 0, 13, 10);

        assert_eq!(
            dimmer.handle(command("effect", "none")).as_slice(),
            [
                Feedback::Mode(EffectMode::None),
                Feedback::Rgb(RgbPercent::new(0, 0, 0))
            ]
        );
        assert_eq!(dimmer.current().rgb(), RgbPercent::new(0, 0, 0));
        assert_eq!(dimmer.phase(), EffectPhase::Done);
        assert_eq!(dimmer.tick(Instant::from_millis(1000)), None);
    }

    #[test]
    fn test_fade_mode_with_zero_transition_lands_pending_color() {
        let mut dimmer = dimmer();
        dimmer.handle(command("hsv", "0,100,100"));
        dimmer.handle(command("effect", "fast"));
        run_ticks(&mut dimmer, 0, 51, 3);
        dimmer.handle(command("speed", "0"));
        let landed = dimmer.current().rgb();

        assert_eq!(
            dimmer.handle(command("effect", "fade")).as_slice(),
            [Feedback::Mode(EffectMode::Fade), Feedback::Rgb(landed)]
        );
        assert_eq!(dimmer.phase(), EffectPhase::Done);
    }

    #[test]
    fn test_fade_mode_with_transition_reports_mode_only() {
        let mut dimmer = dimmer();
        assert_eq!(
            dimmer.handle(command("effect", "fade")).as_slice(),
            [Feedback::Mode(EffectMode::Fade)]
        );
        assert_eq!(dimmer.phase(), EffectPhase::StartFade);
    }

    #[test]
    fn test_zero_transition_fades_immediately() {
        let mut dimmer = dimmer();
        assert_eq!(
            dimmer.handle(command("speed", "0")).as_slice(),
            [Feedback::Speed(Duration::from_millis(0))]
        );
        assert_eq!(
            dimmer.handle(command("rgb", "10,20,30")).as_slice(),
            [Feedback::Rgb(RgbPercent::new(10, 20, 30))]
        );
        assert_eq!(dimmer.phase(), EffectPhase::Done);
    }

    #[test]
    fn test_speed_changes_wait() {
        let mut dimmer = dimmer();
        dimmer.handle(command("speed", "800"));
        assert_eq!(dimmer.timing().wait(), Duration::from_millis(2));

        dimmer.handle(command("effect", "fast"));
        assert_eq!(dimmer.timing().wait(), Duration::from_millis(8));
    }

    #[test]
    fn test_fast_cycle_advances_hue_every_tick() {
        let mut dimmer = dimmer();
        dimmer.handle(command("hsv", "0,100,100"));
        assert_eq!(
            dimmer.handle(command("effect", "fast")).as_slice(),
            [Feedback::Mode(EffectMode::FastCycle)]
        );
        assert_eq!(dimmer.phase(), EffectPhase::DoFade);
        assert_eq!(dimmer.timing().wait(), Duration::from_millis(50));
        assert_eq!(dimmer.hsv().hue, 0);

        for i in 1..=10u8 {
            let now = Instant::from_millis(u64::from(i) * 51);
            assert_eq!(dimmer.tick(now), None);
            assert_eq!(dimmer.hsv().hue, i);

            let expected = RgbPercent::from_rgb(hsv2rgb_rainbow(Hsv {
                hue: i,
                sat: 255,
                val: 255,
            }));
            assert_eq!(dimmer.current().rgb(), expected);
            assert_eq!(dimmer.target().rgb(), expected);
        }
        assert_eq!(dimmer.phase(), EffectPhase::DoFade);
    }

    #[test]
    fn test_cycle_hue_wraps() {
        let mut dimmer = dimmer();
        dimmer.handle(command("hsv", "0,100,100"));
        dimmer.handle(command("effect", "slow"));
        assert_eq!(dimmer.timing().wait(), Duration::from_millis(2));

        let feedback = run_ticks(&mut dimmer, 0, 3, 300);
        assert!(feedback.is_empty());
        assert_eq!(dimmer.hsv().hue, (300 % 256) as u8);
        assert_eq!(dimmer.phase(), EffectPhase::DoFade);
    }

    #[test]
    fn test_cycle_is_throttled() {
        let mut dimmer = dimmer();
        dimmer.handle(command("effect", "fast"));
        let hue = dimmer.hsv().hue;

        dimmer.tick(Instant::from_millis(1000));
        dimmer.tick(Instant::from_millis(1010));
        dimmer.tick(Instant::from_millis(1050));
        assert_eq!(dimmer.hsv().hue, hue.wrapping_add(1));

        dimmer.tick(Instant::from_millis(1051));
        assert_eq!(dimmer.hsv().hue, hue.wrapping_add(2));
    }

    #[test]
    fn test_color_during_cycle_moves_base() {
        let mut dimmer = dimmer();
        dimmer.handle(command("effect", "fast"));
        run_ticks(&mut dimmer, 0, 51, 5);

        assert!(dimmer.handle(command("hsv", "225,100,100")).is_empty());
        assert_eq!(dimmer.hsv().hue, 160);
        dimmer.tick(Instant::from_millis(1000));
        assert_eq!(dimmer.hsv().hue, 161);
    }

    #[test]
    fn test_malformed_command_leaves_state_unchanged() {
        let dimmer = dimmer();
        let before = *dimmer.state();

        assert!(Command::parse_write("hsv", "abc").is_err());
        assert!(Command::parse_write("effect", "strobe").is_err());

        assert_eq!(*dimmer.state(), before);
        assert_eq!(dimmer.mode(), EffectMode::Fade);
    }

    #[test]
    fn test_back_to_fade_from_cycle() {
        let mut dimmer = dimmer();
        dimmer.handle(command("hsv", "0,100,100"));
        dimmer.handle(command("effect", "fast"));
        run_ticks(&mut dimmer, 0, 51, 3);

        dimmer.handle(command("effect", "fade"));
        assert_eq!(dimmer.phase(), EffectPhase::StartFade);
        assert_eq!(dimmer.timing().wait(), Duration::from_millis(12));

        dimmer.handle(command("rgb", "0,0,100"));
        let feedback = run_ticks(&mut dimmer, 1000, 13, 400);
        assert_eq!(
            feedback,
            vec![(399, Feedback::Rgb(RgbPercent::new(0, 0, 100)))]
        );
    }

    #[test]
    fn test_time_until_next_tick() {
        let mut dimmer = dimmer();
        assert_eq!(dimmer.time_until_next_tick(Instant::from_millis(0)), None);

        dimmer.handle(command("rgb", "0,0,0"));
        assert_eq!(
            dimmer.time_until_next_tick(Instant::from_millis(0)),
            Some(Duration::from_millis(0))
        );
        dimmer.tick(Instant::from_millis(0));
        assert_eq!(
            dimmer.time_until_next_tick(Instant::from_millis(4)),
            Some(Duration::from_millis(9))
        );
    }

    #[test]
    fn test_feedback_text() {
        let rgb = Feedback::Rgb(RgbPercent::new(50, 0, 0));
        assert_eq!(rgb.property().as_str(), "rgb");
        assert_eq!(rgb.value().as_str(), "50,0,0");

        let mode = Feedback::Mode(EffectMode::SlowCycle);
        assert_eq!(mode.property().as_str(), "effect");
        assert_eq!(mode.value().as_str(), "slow");

        let level = Feedback::Level(ColorChannel::White2, 100);
        assert_eq!(level.property().as_str(), "white2");
        assert_eq!(level.value().as_str(), "100");

        let speed = Feedback::Speed(Duration::from_millis(600_000));
        assert_eq!(speed.value().as_str(), "600000");

        let full = Feedback::Rgb(RgbPercent::new(100, 100, 100));
        assert_eq!(full.value().as_str(), "100,100,100");
    }
}
