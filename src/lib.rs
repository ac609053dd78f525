pub mod assets;
pub mod buffers;
pub mod config;
pub mod consts;
pub mod coprocessor;
pub mod dispatch;
pub mod handshake;
pub mod host;
#[cfg(feature = "image_shared_memory")]
pub mod image_export;
pub mod input;
pub mod link;
pub mod shared_memory;
pub mod timing;

pub use config::Config;
pub use coprocessor::Coprocessor;
pub use dispatch::{Mode, Routine};
pub use host::{FrameReport, Host, HostStats, PhaseOutcome};
pub use input::InputState;
pub use link::{CoprocHandle, Link};
pub use timing::TvStandard;
