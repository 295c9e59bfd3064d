//! Single-threaded cooperative control loop.
//!
//! ```text
//!  ┌─────────── step() ───────────┐
//!  │ now = clock.now_ms()          │  one timestamp per pass
//!  │ drain dashboard (≤ N msgs)    │──▶ AppService::handle ──▶ fan out
//!  │ drain broker    (≤ N msgs)    │──▶ AppService::handle ──▶ fan out
//!  │ tick arming channels          │──▶ AppService::tick   ──▶ fan out
//!  └───────────────────────────────┘
//!        sleep(loop_period_ms)
//! ```
//!
//! The loop owns the hardware adapter, so actuators are only ever touched
//! from this thread.  Shutdown (everything off) runs on every way out of
//! the loop, including unwinding through `Drop`.

use log::{info, warn};

use crate::app::ports::{ActuatorPort, Clock, EventSink, RemoteLink};
use crate::app::service::AppService;
use crate::remote::{Outbox, RemoteKind};

/// Upper bound on inbound messages handled per link per pass, so a chatty
/// remote cannot starve the arming tick.
pub const MAX_DRAIN_PER_LINK: usize = 8;

pub struct ControlLoop<H, C, S, D, B>
where
    H: ActuatorPort,
    C: Clock,
    S: EventSink,
    D: RemoteLink,
    B: RemoteLink,
{
    app: AppService,
    hw: H,
    clock: C,
    sink: S,
    dashboard: D,
    broker: B,
    period_ms: u32,
}

impl<H, C, S, D, B> ControlLoop<H, C, S, D, B>
where
    H: ActuatorPort,
    C: Clock,
    S: EventSink,
    D: RemoteLink,
    B: RemoteLink,
{
    /// Wire everything together and start the service (all actuators off).
    pub fn new(
        mut app: AppService,
        mut hw: H,
        clock: C,
        mut sink: S,
        dashboard: D,
        broker: B,
        period_ms: u32,
    ) -> Self {
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            clock,
            sink,
            dashboard,
            broker,
            period_ms,
        }
    }

    /// One pass: drain both links, then tick with the same timestamp.
    pub fn step(&mut self) {
        let now = self.clock.now_ms();

        for _ in 0..MAX_DRAIN_PER_LINK {
            let Some(msg) = self.dashboard.poll() else { break };
            let out = self.app.handle(&msg, now, &mut self.hw, &mut self.sink);
            fan_out(&out, &mut self.dashboard, &mut self.broker);
        }

        for _ in 0..MAX_DRAIN_PER_LINK {
            let Some(msg) = self.broker.poll() else { break };
            let out = self.app.handle(&msg, now, &mut self.hw, &mut self.sink);
            fan_out(&out, &mut self.dashboard, &mut self.broker);
        }

        let out = self.app.tick(now, &mut self.hw, &mut self.sink);
        fan_out(&out, &mut self.dashboard, &mut self.broker);
    }

    /// Step at `loop_period_ms` until `should_stop` returns true, then shut
    /// down.
    pub fn run(&mut self, mut should_stop: impl FnMut() -> bool) {
        info!("control loop running, period {} ms", self.period_ms);
        while !should_stop() {
            self.step();
            self.clock.sleep_ms(self.period_ms);
        }
        self.shutdown();
    }

    /// All actuators off.  Safe to call more than once.
    pub fn shutdown(&mut self) {
        let now = self.clock.now_ms();
        self.app.shutdown(now, &mut self.hw, &mut self.sink);
    }

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn dashboard(&self) -> &D {
        &self.dashboard
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }
}

impl<H, C, S, D, B> Drop for ControlLoop<H, C, S, D, B>
where
    H: ActuatorPort,
    C: Clock,
    S: EventSink,
    D: RemoteLink,
    B: RemoteLink,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Route each outbound message to the link of matching kind.  Failures are
/// transient: logged, and repaired by the resync after reconnection.
fn fan_out(outbox: &Outbox, dashboard: &mut impl RemoteLink, broker: &mut impl RemoteLink) {
    for msg in outbox {
        let res = match msg.kind() {
            RemoteKind::Dashboard => dashboard.send(msg),
            RemoteKind::Broker => broker.send(msg),
        };
        if let Err(e) = res {
            warn!("{} send failed: {e}", msg.kind());
        }
    }
}
