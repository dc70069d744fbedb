//! RTIC-based firmware entry point for the camera slider.
//!
//! The Step Timer ISR (`stepper_isr`, bound to TIM2) is the highest-priority
//! hardware task and the system's sole real-time actor: on every expiration
//! it drives `SliderController::on_step_tick`, which emits one pulse,
//! reprograms the timer, and recomputes the ramp. The Deferred-Action Timer
//! (`deferred_isr`, bound to TIM3) runs at a lower priority and re-enters
//! the command surface with any queued follow-up move once the ramp
//! reaches HALT.
//!
//! The LCD/menu UI, rotary-encoder debouncing, the homing sequence, and the
//! UART debug sink are all out of scope for this core and are not
//! implemented here; `jog_task` stands in for "something that calls
//! `move_to`", the way a menu or a host command would.

#![allow(unused_imports)]

#[rtic::app(device = stm32f4xx_hal::pac, dispatchers = [EXTI2])]
mod app {
    use stm32f4xx_hal::{
        gpio::{gpioa, gpiob, Edge, Input, Output, PushPull},
        pac::{TIM2, TIM3},
        prelude::*,
        timer::{CounterUs, Event as TimerEvent},
    };
    use rtic_monotonics::systick::*;

    use driver_drv8825::Drv8825;
    use slider_motion::{DeferredTimer, MoveMode, RailConfig, SliderController, StepTimer};

    /// Rail length: 150 cm of travel, 1.8deg/200-step motor, eighth
    /// microstepping, 2 cm per belt-pulley revolution.
    const MAX_LENGTH_CM: f32 = 150.0;
    const STEPS_PER_REV: f32 = 200.0 * 8.0;
    const CM_PER_REV: f32 = 2.0;

    type StepPin = gpioa::PA0<Output<PushPull>>;
    type DirPin = gpioa::PA1<Output<PushPull>>;
    type EnablePin = gpioa::PA2<Output<PushPull>>;
    type Ms0Pin = gpioa::PA3<Output<PushPull>>;
    type Ms1Pin = gpioa::PA4<Output<PushPull>>;
    type Ms2Pin = gpioa::PA5<Output<PushPull>>;
    type JogButtonPin = gpiob::PB1<Input>;

    /// Busy-spin delay for the DRV8825's nanosecond-scale pulse-width and
    /// settle-time requirements — cheap enough at those durations that a
    /// cycle-counted spin is preferable to arming a whole peripheral for it.
    pub struct CycleDelay {
        cycles_per_ns: f32,
    }

    impl embedded_hal::delay::DelayNs for CycleDelay {
        fn delay_ns(&mut self, ns: u32) {
            cortex_m::asm::delay((ns as f32 * self.cycles_per_ns) as u32);
        }
    }

    type Driver = Drv8825<StepPin, DirPin, EnablePin, Ms0Pin, Ms1Pin, Ms2Pin, CycleDelay>;

    /// Wraps the hardware step timer in a local newtype so the orphan rule
    /// lets us implement the (foreign) `StepTimer` trait for the (foreign)
    /// `CounterUs` type here, in the firmware crate.
    pub struct HwStepTimer {
        tim: CounterUs<TIM2>,
        running: bool,
    }

    impl StepTimer for HwStepTimer {
        fn start(&mut self, cn: u32) {
            self.tim.clear_interrupt(TimerEvent::Update);
            self.tim.start(cn.micros()).ok();
            self.running = true;
        }
        fn set_interval(&mut self, cn: u32) {
            self.tim.clear_interrupt(TimerEvent::Update);
            self.tim.start(cn.micros()).ok();
        }
        fn stop(&mut self) {
            self.tim.cancel().ok();
            self.running = false;
        }
        fn is_running(&self) -> bool {
            self.running
        }
    }

    pub struct HwDeferredTimer {
        tim: CounterUs<TIM3>,
    }

    impl DeferredTimer for HwDeferredTimer {
        fn arm_once(&mut self, ticks: u32) {
            self.tim.clear_interrupt(TimerEvent::Update);
            // A short, fixed one-shot; `ticks` is taken directly as
            // microseconds here.
            self.tim.start(ticks.micros()).ok();
        }
    }

    type Controller = SliderController<Driver, HwStepTimer, HwDeferredTimer>;

    // `controller` is touched by three tasks at three different priorities
    // (the step ISR, the deferred-action ISR, and the jog button), so it
    // lives behind RTIC's priority-ceiling lock rather than as a `#[local]`
    // resource, which only one task may own.
    #[shared]
    struct Shared {
        controller: Controller,
    }

    #[local]
    struct Local {
        jog_button: JogButtonPin,
    }

    #[init]
    fn init(mut cx: init::Context) -> (Shared, Local) {
        defmt::info!("slider-firmware init");
        let dp = cx.device;

        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.use_hse(8.MHz()).sysclk(168.MHz()).freeze();

        let systick_mono_token = rtic_monotonics::create_systick_token!();
        Systick::start(cx.core.SYST, clocks.hclk().0, systick_mono_token);

        let gpioa = dp.GPIOA.split();
        let step = gpioa.pa0.into_push_pull_output();
        let dir = gpioa.pa1.into_push_pull_output();
        let enable = gpioa.pa2.into_push_pull_output();
        let m0 = gpioa.pa3.into_push_pull_output();
        let m1 = gpioa.pa4.into_push_pull_output();
        let m2 = gpioa.pa5.into_push_pull_output();

        let gpiob = dp.GPIOB.split();
        let mut jog_button = gpiob.pb1.into_pull_up_input();

        let mut syscfg = dp.SYSCFG.constrain();
        jog_button.make_interrupt_source(&mut syscfg);
        jog_button.enable_interrupt(&mut cx.device.EXTI);
        jog_button.trigger_on_edge(&mut cx.device.EXTI, Edge::Falling);

        let delay = CycleDelay { cycles_per_ns: clocks.hclk().raw() as f32 / 1_000_000_000.0 };
        let mut driver = Driver::new(step, dir, enable, m0, m1, m2, delay);
        driver.set_microsteps(driver_drv8825::Microsteps::Eighth).ok();

        let mut step_timer = dp.TIM2.counter_us(&clocks);
        step_timer.listen(TimerEvent::Update);
        let mut deferred_timer = dp.TIM3.counter_us(&clocks);
        deferred_timer.listen(TimerEvent::Update);

        let max_count = RailConfig::max_count_from_rail(MAX_LENGTH_CM, STEPS_PER_REV, CM_PER_REV);
        let cfg = RailConfig::eighth_step_default(max_count);

        let controller = SliderController::new(
            cfg,
            driver,
            HwStepTimer { tim: step_timer, running: false },
            HwDeferredTimer { tim: deferred_timer },
        );

        defmt::info!("rail is {} steps long", max_count);

        (Shared { controller }, Local { jog_button })
    }

    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }

    /// Step Timer ISR — the system's real-time actor. Highest priority.
    #[task(binds = TIM2, shared = [controller], priority = 4)]
    fn stepper_isr(mut cx: stepper_isr::Context) {
        cx.shared.controller.lock(|controller| controller.on_step_tick());
    }

    /// Deferred-Action Timer ISR — re-enters the command surface with any
    /// queued follow-up move, outside the Step Timer ISR.
    #[task(binds = TIM3, shared = [controller], priority = 2)]
    fn deferred_isr(mut cx: deferred_isr::Context) {
        cx.shared.controller.lock(|controller| controller.on_deferred_tick());
    }

    /// Placeholder stand-in for the menu/UI layer this core doesn't own: a
    /// single button that jogs the slider forward by a fixed distance,
    /// demonstrating the command-surface entry point a real UI would call.
    #[task(binds = EXTI1, local = [jog_button], shared = [controller], priority = 1)]
    fn jog_task(mut cx: jog_task::Context) {
        cx.local.jog_button.clear_interrupt_pending_bit();
        cx.shared
            .controller
            .lock(|controller| controller.move_to(2_000, MoveMode::Rel, true).ok());
    }
}
