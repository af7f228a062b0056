mod scheduler;
mod session;
mod step_timer;

pub use scheduler::{
    next_delay, Clock, DriftCorrectedScheduler, Firing, SchedulerHandle, TokioClock,
};
pub use session::{TimerSession, TICK_PERIOD};
pub use step_timer::{
    SchedulerCommand, Stage, StepTimer, TickOutcome, Transition, BONUS_SECONDS,
    NORMAL_CUE_RATE, RESET_SECONDS, SLOW_CUE_RATE, WARNING_THRESHOLD,
};
