pub mod compiler;
pub mod config;
pub mod directive;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod state;

pub use compiler::{Placer, compile, compile_commands};
pub use config::PlacementConfig;
pub use directive::{BlockKind, ClearDirective, Directive, Facing, PlacementDirective, Position};
pub use dispatch::{
    CancelFlag, DispatchConfig, DispatchOutcome, DispatchReport, Dispatcher, Injector,
    WriterInjector, wait_for_focus,
};
pub use error::{DispatchError, InjectError};
pub use state::PlacementState;
