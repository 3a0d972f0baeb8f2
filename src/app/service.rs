//! The control loop body, hardware-free.
//!
//! `AppService` owns the domain state (command filter, speed controller,
//! motion driver) and is driven by a single thread calling [`tick`]
//! with a monotonic millisecond clock. All I/O goes through the port
//! traits, so the whole loop runs unchanged against host mocks.
//!
//! Per tick, in order:
//! 1. drain at most one decoded IR frame through the command filter;
//! 2. handle at most one inbound link line;
//! 3. advance the motion driver with the current duty;
//! 4. on the report period, sample the climate sensor, feed the
//!    automatic path, and publish one status line.
//!
//! [`tick`]: AppService::tick

use log::{info, warn};

use crate::config::{SpeedUnit, SystemConfig};
use crate::control::speed::SpeedController;
use crate::link;
use crate::motion::MotionDriver;
use crate::remote::filter::CommandFilter;
use crate::remote::keys::{self, KeyAction};
use crate::units::Duty;

use super::commands::LinkCommand;
use super::events::{AppEvent, StatusReport};
use super::ports::{ActuatorPort, EventSink, IrPort, LinkPort, SensorPort};

pub struct AppService<M: MotionDriver> {
    config: SystemConfig,
    filter: CommandFilter,
    speed: SpeedController,
    motion: M,
    last_report_ms: u32,
    reported_once: bool,
}

impl<M: MotionDriver> AppService<M> {
    pub fn new(config: SystemConfig, motion: M) -> Self {
        Self {
            config,
            filter: CommandFilter::new(),
            speed: SpeedController::new(),
            motion,
            last_report_ms: 0,
            reported_once: false,
        }
    }

    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    pub fn filter(&self) -> &CommandFilter {
        &self.filter
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// One-time startup announcement.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!(
            "[APP] control loop starting (threshold {:.1}C, actuator {:?})",
            self.config.auto_threshold_c, self.config.actuator
        );
        sink.emit(&AppEvent::Started);
    }

    /// One pass of the control loop. Non-blocking.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort + IrPort),
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) {
        self.service_remote(hw, sink);
        self.service_link(link, sink);

        self.motion
            .update(self.speed.duty(), self.speed.mode(), now_ms, hw);

        if !self.reported_once
            || now_ms.wrapping_sub(self.last_report_ms) >= self.config.report_interval_ms
        {
            self.last_report_ms = now_ms;
            self.reported_once = true;
            self.report(hw, link, sink);
        }
    }

    fn service_remote(&mut self, hw: &mut impl IrPort, sink: &mut impl EventSink) {
        let Some(event) = hw.try_decode() else {
            return;
        };

        let was_locked = self.filter.is_locked();
        if self.filter.accept(&event) {
            if !was_locked {
                if let Some(identity) = self.filter.lock_identity() {
                    sink.emit(&AppEvent::RemoteLocked(identity));
                }
            }
            self.dispatch_key(event.command, event.repeat, sink);
        }
        hw.resume();
    }

    fn dispatch_key(&mut self, command: u8, repeat: bool, sink: &mut impl EventSink) {
        match keys::action_for(command, repeat) {
            Some(KeyAction::SetPercent(p)) => {
                self.speed.set_percent(i32::from(p.get()));
                self.emit_speed_changed(sink);
            }
            Some(KeyAction::Adjust(delta)) => {
                self.speed.adjust_percent(delta);
                self.emit_speed_changed(sink);
            }
            Some(KeyAction::ToggleMode) => {
                self.speed.toggle_mode();
                sink.emit(&AppEvent::ModeChanged(self.speed.mode()));
            }
            None => {}
        }
    }

    fn service_link(&mut self, link: &mut impl LinkPort, sink: &mut impl EventSink) {
        let Some(line) = link.poll_line() else {
            return;
        };

        match link::parse_command(&line) {
            Some(LinkCommand::SetMode(mode)) => {
                self.speed.set_mode(mode);
                sink.emit(&AppEvent::ModeChanged(mode));
                self.ack(link, mode.tag());
            }
            Some(LinkCommand::SetSpeed(raw)) => {
                let percent = match self.config.link_speed_unit {
                    SpeedUnit::Duty => i32::from(Duty::clamped(raw).to_percent().get()),
                    SpeedUnit::Percent => raw,
                };
                self.speed.set_percent(percent);
                self.emit_speed_changed(sink);
                self.ack(link, "SPEED");
            }
            // Unknown lines are ignored, same as receiver noise.
            None => {}
        }
    }

    fn ack(&mut self, link: &mut impl LinkPort, what: &str) {
        let mut line = super::ports::LinkLine::new();
        let _ = core::fmt::Write::write_fmt(
            &mut line,
            format_args!("OK: {} speed={}%", what, self.speed.percent().get()),
        );
        if link.send_line(&line).is_err() {
            warn!("[LNK] ack dropped");
        }
    }

    fn emit_speed_changed(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::SpeedChanged {
            percent: self.speed.percent().get(),
            mode: self.speed.mode(),
        });
    }

    fn report(
        &mut self,
        hw: &mut impl SensorPort,
        link: &mut impl LinkPort,
        sink: &mut impl EventSink,
    ) {
        let reading = hw.read_climate();
        if !reading.is_complete() {
            warn!("[ENV] climate read failed");
            sink.emit(&AppEvent::SensorReadFailed);
            return;
        }

        self.speed.apply_automatic(reading.temperature_c);

        let report = StatusReport {
            temperature_c: reading.temperature_c,
            humidity_pct: reading.humidity_pct,
            threshold_c: self.config.auto_threshold_c,
            mode: self.speed.mode(),
            speed_percent: self.speed.percent().get(),
        };

        if let Err(e) = link.send_line(&link::format_status(&report)) {
            warn!("[LNK] status dropped: {e}");
        }
        sink.emit(&AppEvent::Status(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::LinkLine;
    use crate::control::speed::Mode;
    use crate::motion::DirectDriver;
    use crate::remote::{IrCommand, IrProtocol};
    use crate::sensors::ClimateReading;

    struct MockHw {
        temperature_c: f32,
        humidity_pct: f32,
        ir_queue: std::collections::VecDeque<IrCommand>,
        resumes: usize,
        duties: Vec<u8>,
    }

    impl MockHw {
        fn new() -> Self {
            Self {
                temperature_c: 25.0,
                humidity_pct: 50.0,
                ir_queue: Default::default(),
                resumes: 0,
                duties: Vec::new(),
            }
        }

        fn press(&mut self, command: u8) {
            self.ir_queue.push_back(IrCommand {
                protocol: IrProtocol::Nec,
                address: 0xEF00,
                command,
                repeat: false,
                overflow: false,
            });
        }
    }

    impl SensorPort for MockHw {
        fn read_climate(&mut self) -> ClimateReading {
            ClimateReading {
                temperature_c: self.temperature_c,
                humidity_pct: self.humidity_pct,
            }
        }
    }

    impl IrPort for MockHw {
        fn try_decode(&mut self) -> Option<IrCommand> {
            self.ir_queue.pop_front()
        }
        fn resume(&mut self) {
            self.resumes += 1;
        }
    }

    impl ActuatorPort for MockHw {
        fn set_angle(&mut self, _degrees: u8) {}
        fn set_duty(&mut self, duty: u8) {
            self.duties.push(duty);
        }
    }

    #[derive(Default)]
    struct MockLink {
        inbound: std::collections::VecDeque<LinkLine>,
        sent: Vec<String>,
    }

    impl MockLink {
        fn inject(&mut self, line: &str) {
            let mut l = LinkLine::new();
            l.push_str(line).unwrap();
            self.inbound.push_back(l);
        }
    }

    impl LinkPort for MockLink {
        fn poll_line(&mut self) -> Option<LinkLine> {
            self.inbound.pop_front()
        }
        fn send_line(&mut self, line: &str) -> Result<(), crate::error::LinkError> {
            self.sent.push(line.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct VecSink {
        events: Vec<AppEvent>,
    }

    impl EventSink for VecSink {
        fn emit(&mut self, event: &AppEvent) {
            self.events.push(event.clone());
        }
    }

    fn direct_service() -> AppService<DirectDriver> {
        let config = SystemConfig {
            actuator: crate::config::ActuatorKind::Direct,
            ..SystemConfig::default()
        };
        AppService::new(config, DirectDriver::new())
    }

    #[test]
    fn ir_digit_press_sets_manual_speed_and_resumes_receiver() {
        let mut svc = direct_service();
        let mut hw = MockHw::new();
        let mut link = MockLink::default();
        let mut sink = VecSink::default();

        hw.press(keys::CMD_DIGIT_5);
        svc.tick(0, &mut hw, &mut link, &mut sink);

        assert_eq!(svc.speed().percent().get(), 50);
        assert_eq!(svc.speed().mode(), Mode::Manual);
        assert_eq!(hw.resumes, 1, "receiver must be re-armed after a frame");
        assert!(svc.filter().is_locked());
        assert!(sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::RemoteLocked(_))));
        assert!(sink.events.iter().any(
            |e| matches!(e, AppEvent::SpeedChanged { percent: 50, mode: Mode::Manual })
        ));
    }

    #[test]
    fn rejected_frame_still_resumes_but_changes_nothing() {
        let mut svc = direct_service();
        let mut hw = MockHw::new();
        let mut link = MockLink::default();
        let mut sink = VecSink::default();

        hw.ir_queue.push_back(IrCommand {
            protocol: IrProtocol::Unknown,
            address: 0xEF00,
            command: keys::CMD_DIGIT_5,
            repeat: false,
            overflow: false,
        });
        svc.tick(0, &mut hw, &mut link, &mut sink);

        assert_eq!(hw.resumes, 1);
        assert_eq!(svc.speed().mode(), Mode::Auto);
        assert!(!svc.filter().is_locked());
    }

    #[test]
    fn link_speed_command_is_interpreted_as_duty_by_default() {
        let mut svc = direct_service();
        let mut hw = MockHw::new();
        let mut link = MockLink::default();
        let mut sink = VecSink::default();

        // 128/255 truncates to 50%.
        link.inject("SPEED:128");
        svc.tick(0, &mut hw, &mut link, &mut sink);

        assert_eq!(svc.speed().percent().get(), 50);
        assert_eq!(svc.speed().mode(), Mode::Manual);
        assert!(link.sent.iter().any(|l| l.starts_with("OK: SPEED")));
    }

    #[test]
    fn link_speed_command_clamps_out_of_range_values() {
        let mut svc = direct_service();
        let mut hw = MockHw::new();
        let mut link = MockLink::default();
        let mut sink = VecSink::default();

        link.inject("SPEED:9000");
        svc.tick(0, &mut hw, &mut link, &mut sink);
        assert_eq!(svc.speed().percent().get(), 100);

        link.inject("SPEED:-4");
        svc.tick(1, &mut hw, &mut link, &mut sink);
        assert_eq!(svc.speed().percent().get(), 0);
    }

    #[test]
    fn link_mode_commands_do_not_touch_speed() {
        let mut svc = direct_service();
        let mut hw = MockHw::new();
        let mut link = MockLink::default();
        let mut sink = VecSink::default();

        link.inject("SPEED:255");
        svc.tick(0, &mut hw, &mut link, &mut sink);
        assert_eq!(svc.speed().percent().get(), 100);

        link.inject("auto");
        svc.tick(1, &mut hw, &mut link, &mut sink);
        assert_eq!(svc.speed().mode(), Mode::Auto);
        assert_eq!(svc.speed().percent().get(), 100);
        assert!(sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::ModeChanged(Mode::Auto))));
    }

    #[test]
    fn report_period_drives_automatic_speed_and_status_line() {
        let mut svc = direct_service();
        let mut hw = MockHw::new();
        let mut link = MockLink::default();
        let mut sink = VecSink::default();

        hw.temperature_c = 30.5;
        hw.humidity_pct = 61.0;

        // First tick always reports.
        svc.tick(0, &mut hw, &mut link, &mut sink);
        assert_eq!(svc.speed().percent().get(), 45);
        assert_eq!(
            link.sent.last().unwrap(),
            "Temp: 30.5C | Hum: 61.0% | Set: 28.0C | Mode: AUTO | Speed: 45%"
        );

        // Within the period: no further status.
        let sent_before = link.sent.len();
        svc.tick(1999, &mut hw, &mut link, &mut sink);
        assert_eq!(link.sent.len(), sent_before);

        // Period elapsed: a fresh sample is taken.
        hw.temperature_c = 33.0;
        svc.tick(2000, &mut hw, &mut link, &mut sink);
        assert_eq!(svc.speed().percent().get(), 100);
        assert_eq!(link.sent.len(), sent_before + 1);
    }

    #[test]
    fn failed_climate_read_skips_status_and_keeps_speed() {
        let mut svc = direct_service();
        let mut hw = MockHw::new();
        let mut link = MockLink::default();
        let mut sink = VecSink::default();

        hw.temperature_c = 31.5;
        svc.tick(0, &mut hw, &mut link, &mut sink);
        assert_eq!(svc.speed().percent().get(), 70);

        hw.temperature_c = f32::NAN;
        hw.humidity_pct = f32::NAN;
        let sent_before = link.sent.len();
        svc.tick(2000, &mut hw, &mut link, &mut sink);

        assert_eq!(svc.speed().percent().get(), 70, "speed must survive a bad read");
        assert_eq!(link.sent.len(), sent_before, "no status line on failure");
        assert!(sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::SensorReadFailed)));
    }

    #[test]
    fn direct_actuator_receives_current_duty_every_tick() {
        let mut svc = direct_service();
        let mut hw = MockHw::new();
        let mut link = MockLink::default();
        let mut sink = VecSink::default();

        link.inject("SPEED:255");
        svc.tick(0, &mut hw, &mut link, &mut sink);
        svc.tick(10, &mut hw, &mut link, &mut sink);

        assert_eq!(hw.duties, vec![255, 255]);
    }
}
