use std::sync::Arc;

/// Mission log stream port.
///
/// Progress, per-goal outcomes and load failures are reported through this
/// sink only; it is an observability channel and never feeds back into
/// control flow, so none of the methods can fail.
pub trait MissionLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn MissionLogger>;
