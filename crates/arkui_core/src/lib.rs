//! ArkUI Engine Core
//!
//! Shared primitives used by the resource subsystem and the components built on it:
//!
//! - **Color**: RGBA color with ARGB packing and `#AARRGGBB` parsing
//! - **Dimension**: a length value tagged with its unit (`px`, `vp`, `fp`, `lpx`, `%`)
//! - **Task posting**: the [`TaskExecutor`] seam used to push work onto the UI or a
//!   background thread, plus the tokio-backed default
//!
//! # Example
//!
//! ```rust
//! use arkui_core::{Color, Dimension, DimensionUnit};
//!
//! let color: Color = "#FF0A59F7".parse().unwrap();
//! assert_eq!(color.to_argb(), 0xFF0A59F7);
//!
//! let width: Dimension = "16vp".parse().unwrap();
//! assert_eq!(width.unit, DimensionUnit::Vp);
//! ```

pub mod color;
pub mod dimension;
pub mod executor;

pub use color::{Color, ColorParseError};
pub use dimension::{Dimension, DimensionParseError, DimensionUnit};
pub use executor::{ManualTaskExecutor, Task, TaskExecutor, TaskType};

#[cfg(feature = "tokio-executor")]
pub use executor::TokioTaskExecutor;
