//! Public API layer (Facade) for seifa-core.
//!
//! [`SeifaCore`] owns the panel store and the current [`DataContext`]
//! snapshot and exposes the vectorized interpolation query.
//!
//! # Quick Start
//!
//! ```ignore
//! use seifa_core::api::{Arg, SeifaCoreBuilder};
//!
//! let core = SeifaCoreBuilder::new(settings).build()?;
//!
//! // Scalar in, scalar out
//! let v = core.interpolate("31-10-1996", "ascot", "ieo_score", Some("Greater Bendigo".into()))?;
//!
//! // Sequences broadcast against scalars
//! let vs = core.interpolate(vec![1986, 1991, 1996], "kew", "ier_score", None)?;
//! ```

mod args;
mod builder;
mod context;
mod core;

pub use args::{broadcast_len, Arg, Interpolated};
pub use builder::SeifaCoreBuilder;
pub use context::DataContext;
pub use self::core::SeifaCore;
